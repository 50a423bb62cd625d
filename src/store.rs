// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/store.rs - Keyed matrix store interface.
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

use std::collections::BTreeMap;

use crate::error::Error;
use crate::matrix::Matrix;

/// A destination for finished design matrices, keyed by design name.
///
/// Storing under a key that already exists replaces the earlier matrix.
pub trait MatrixStore {
    /// Stores `matrix` under `key`.
    fn create(&mut self, key: &str, matrix: Matrix) -> Result<(), Error>;

    /// Pushes everything stored so far to the backing medium.
    fn flush(&mut self) -> Result<(), Error>;
}

/// A [MatrixStore] that keeps matrices in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    matrices: BTreeMap<String, Matrix>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.matrices.keys().map(String::as_str)
    }

    /// The matrix stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Matrix> {
        self.matrices.get(key)
    }

    /// Number of stored matrices.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Consumes the store, returning its contents.
    pub fn into_inner(self) -> BTreeMap<String, Matrix> {
        self.matrices
    }
}

impl MatrixStore for MemoryStore {
    fn create(&mut self, key: &str, matrix: Matrix) -> Result<(), Error> {
        self.matrices.insert(key.to_string(), matrix);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut store = MemoryStore::new();
        store
            .create("2^3", Matrix::from_rows(3, &[[0, 0, 0]]).unwrap())
            .unwrap();
        store
            .create("2^3", Matrix::from_rows(3, &[[1, 1, 0]]).unwrap())
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("2^3").unwrap().to_rows(), vec![vec![1, 1, 0]]);

        let matrices = store.into_inner();
        assert_eq!(matrices.keys().collect::<Vec<_>>(), vec!["2^3"]);
        assert_eq!(matrices["2^3"].shape(), (1, 3));
    }
}
