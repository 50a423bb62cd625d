// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Decoder library for orthogonal-array design catalogues.
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

/*!
 * # `oamatrix` Crate
 *
 * A library for decoding catalogues of orthogonal-array designs (such as the
 * SAS `ts723_Designs.txt` listing) into named integer matrices, and for
 * storing those matrices in a single keyed container file.
 *
 * The pipeline:
 *
 * 1. [header]: Parses design header lines like `2^12 12^1     n=24`.
 * 2. [decoder]: Decodes fixed-width data rows under a header's column groups.
 * 3. [catalogue]: Walks the catalogue and hands finished designs to a
 *    [store::MatrixStore].
 * 4. [container]: Writes and reads the keyed container file.
 *
 * ## Usage Example
 *
 * ```no_run
 * use oamatrix::catalogue::convert_file;
 * use oamatrix::container::Container;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Convert the catalogue
 *     let summary = convert_file("ts723_Designs.txt", "oamatrix.oamx")?;
 *     println!("{} designs", summary.designs);
 *
 *     // Read one design back
 *     let container = Container::open("oamatrix.oamx")?;
 *     let matrix = container.get("2^3")?;
 *     for row in matrix.rows() {
 *         println!("{:?}", row);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

pub mod catalogue;
pub mod container;
pub mod decoder;
pub mod error;
pub mod header;
pub mod matrix;
pub mod store;

pub use error::{Error, FormatError};
pub use matrix::Matrix;
