// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for the orthogonal-array matrix library.
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

/// A problem with the content of a design catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// A header line could not be split into a name, a row count, and
    /// `level^repeat` column groups.
    #[error("malformed header {header:?}: {reason}")]
    MalformedHeader {
        /// The offending header text.
        header: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A data row ended before every column was decoded.
    #[error("truncated row: need {needed} characters, found {found}")]
    TruncatedRow {
        /// Characters required by the active column groups.
        needed: usize,
        /// Characters actually present.
        found: usize,
    },
    /// A fixed-width cell did not hold an unsigned integer.
    #[error("corrupt cell {cell:?} in column {column}")]
    CorruptCell {
        /// Zero-based output column of the cell.
        column: usize,
        /// The raw cell text.
        cell: String,
    },
    /// A data row appeared before any header line.
    #[error("data row before the first design header")]
    RowBeforeHeader,
}

/// Errors returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The catalogue content is malformed at the given line.
    #[error("line {line}: {source}")]
    Format {
        /// 1-based line number in the catalogue.
        line: usize,
        /// The underlying format problem.
        #[source]
        source: FormatError,
    },
    /// Reading the catalogue or writing the container failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The container file is not a valid matrix container.
    #[error("invalid container: {0}")]
    InvalidContainer(String),
    /// The requested key is not present in the container.
    #[error("no matrix named {0:?}")]
    UnknownKey(String),
    /// A row did not match the column count of its matrix.
    #[error("row has {found} cells, matrix has {expected} columns")]
    RaggedRow {
        /// Column count of the matrix.
        expected: usize,
        /// Length of the rejected row.
        found: usize,
    },
}
