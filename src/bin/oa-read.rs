// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  oa-read.rs - List and print matrices stored in a container.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use oamatrix::Matrix;
use oamatrix::container::Container;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The container file to open.
    #[arg(short, long, env = "OAMATRIX_CONTAINER", default_value = "oamatrix.oamx")]
    container: PathBuf,
    /// The design to print as CSV. The key list is only printed if this key
    /// exists.
    key: Option<String>,
}

fn write_csv(matrix: &Matrix) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(io::stdout().lock());
    for row in matrix.rows() {
        writer.write_record(row.iter().map(u32::to_string))?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let container = match Container::open(&args.container) {
        Ok(c) => c,
        Err(error) => {
            eprintln!("Error opening container {:?}: {}", &args.container, error);
            return ExitCode::FAILURE;
        }
    };

    // Look the key up first so a bad key fails before anything is printed.
    let selected = match &args.key {
        Some(key) => match container.get(key) {
            Ok(m) => Some((key, m)),
            Err(error) => {
                eprintln!("Error reading {:?}: {}", key, error);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    for key in container.keys() {
        println!("{}", key);
    }

    let Some((key, matrix)) = selected else {
        return ExitCode::SUCCESS;
    };

    let (rows, columns) = matrix.shape();
    println!();
    println!("{} ({} x {})", key, rows, columns);
    if let Err(error) = write_csv(matrix) {
        eprintln!("Error writing {:?}: {}", key, error);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
