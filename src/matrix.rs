// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/matrix.rs - Rectangular integer matrix for decoded designs.
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

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A rectangular matrix of unsigned integers, stored row-major.
///
/// The column count is fixed when the matrix is created; every row pushed
/// afterwards must have exactly that many cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct Matrix {
    columns: usize,
    cells: Vec<u32>,
}

/// Serialized form of a [Matrix]; checked for rectangularity on the way in.
#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    columns: usize,
    cells: Vec<u32>,
}

impl TryFrom<MatrixRepr> for Matrix {
    type Error = Error;

    fn try_from(repr: MatrixRepr) -> Result<Self, Error> {
        Matrix::from_cells(repr.columns, repr.cells)
    }
}

impl From<Matrix> for MatrixRepr {
    fn from(matrix: Matrix) -> Self {
        Self {
            columns: matrix.columns,
            cells: matrix.cells,
        }
    }
}

impl Matrix {
    /// Creates an empty matrix with `columns` columns.
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            cells: Vec::new(),
        }
    }

    /// Builds a matrix from a list of rows.
    ///
    /// All rows must have `columns` cells.
    pub fn from_rows<R: AsRef<[u32]>>(columns: usize, rows: &[R]) -> Result<Self, Error> {
        let mut matrix = Self::new(columns);
        for row in rows {
            matrix.push_row(row.as_ref())?;
        }
        Ok(matrix)
    }

    /// Builds a matrix from row-major cells.
    fn from_cells(columns: usize, cells: Vec<u32>) -> Result<Self, Error> {
        if columns == 0 && !cells.is_empty() {
            return Err(Error::RaggedRow {
                expected: 0,
                found: cells.len(),
            });
        }
        if columns != 0 && cells.len() % columns != 0 {
            return Err(Error::RaggedRow {
                expected: columns,
                found: cells.len() % columns,
            });
        }
        Ok(Self { columns, cells })
    }

    /// Appends one row.
    pub fn push_row(&mut self, row: &[u32]) -> Result<(), Error> {
        if row.len() != self.columns {
            return Err(Error::RaggedRow {
                expected: self.columns,
                found: row.len(),
            });
        }
        self.cells.extend_from_slice(row);
        Ok(())
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.cells.len() / self.columns
        }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.columns)
    }

    /// Returns `true` if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The row at `index`, if any.
    pub fn row(&self, index: usize) -> Option<&[u32]> {
        if index >= self.row_count() {
            return None;
        }
        let start = index * self.columns;
        self.cells.get(start..start + self.columns)
    }

    /// Iterates over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        // chunks() rejects a zero size; a zero-column matrix has no rows anyway.
        self.cells.chunks(self.columns.max(1))
    }

    /// Copies the matrix into a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.rows().map(<[u32]>::to_vec).collect()
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }
}
