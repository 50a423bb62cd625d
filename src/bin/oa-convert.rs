// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  oa-convert.rs - Convert an orthogonal-array catalogue into a container.
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

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use oamatrix::catalogue::convert_file;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The design catalogue to read.
    #[arg(short, long, env = "OAMATRIX_INPUT", default_value = "ts723_Designs.txt")]
    input: PathBuf,
    /// The container file to write.
    #[arg(short, long, env = "OAMATRIX_OUTPUT", default_value = "oamatrix.oamx")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match convert_file(&args.input, &args.output) {
        Ok(summary) => {
            println!(
                "{} designs ({} rows) written to {}",
                summary.designs,
                summary.rows,
                args.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error converting {:?}: {}", &args.input, error);
            ExitCode::FAILURE
        }
    }
}
