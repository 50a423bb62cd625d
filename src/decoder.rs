// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/decoder.rs - Fixed-width row decoder for orthogonal-array catalogues.
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

use crate::error::FormatError;
use crate::header::ColumnGroup;

/// Decodes one data row into a cell per design column.
///
/// The row is consumed left to right in column-group order: each group
/// contributes `repeat_count` cells of [ColumnGroup::digit_width] characters.
/// Anything after the last decoded column (a row label, for instance) is
/// ignored.
///
/// # Arguments
///
/// * `line` - The raw data row.
/// * `column_groups` - The column groups of the active design header.
///
/// # Returns
///
/// A `Result` containing the decoded cells, or a [FormatError::TruncatedRow]
/// or [FormatError::CorruptCell].
pub fn decode_row(line: &str, column_groups: &[ColumnGroup]) -> Result<Vec<u32>, FormatError> {
    let needed: usize = column_groups.iter().map(ColumnGroup::width).sum();
    if line.len() < needed {
        return Err(FormatError::TruncatedRow {
            needed,
            found: line.len(),
        });
    }

    let mut row = Vec::with_capacity(column_groups.iter().map(|g| g.repeat_count as usize).sum());
    let mut p = 0;
    for group in column_groups {
        let digit = group.digit_width();
        for _ in 0..group.repeat_count {
            let column = row.len();
            row.push(decode_cell(line, p, p + digit, column)?);
            p += digit;
        }
    }

    Ok(row)
}

fn decode_cell(line: &str, start: usize, end: usize, column: usize) -> Result<u32, FormatError> {
    let corrupt = || FormatError::CorruptCell {
        column,
        cell: String::from_utf8_lossy(&line.as_bytes()[start..end]).to_string(),
    };

    // Two-digit fields may be blank-padded.
    let cell = line.get(start..end).ok_or_else(corrupt)?.trim();
    if cell.is_empty() || !cell.bytes().all(|b| b.is_ascii_digit()) {
        return Err(corrupt());
    }
    cell.parse::<u32>().map_err(|_| corrupt())
}
