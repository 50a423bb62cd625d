// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/container.rs - Keyed matrix container file reader and writer.
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
 * # `container` Module
 *
 * A container file holds any number of named integer matrices. The layout is
 * a small fixed header followed by a zlib-compressed payload:
 *
 * | Offset | Size | Field                                  |
 * |--------|------|----------------------------------------|
 * | 0      | 4    | Magic, `OAMX`                          |
 * | 4      | 2    | Format version (little-endian), `1`    |
 * | 6      | 4    | Uncompressed payload length (LE)       |
 * | 10     | ...  | zlib stream                            |
 *
 * The payload is a CBOR map from design name to matrix, in key order. Each
 * matrix is stored as its column count and its row-major cells; a matrix
 * whose cells do not fill whole rows is rejected on load.
 *
 * ## Usage Example
 *
 * ```no_run
 * use oamatrix::container::Container;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let container = Container::open("oamatrix.oamx")?;
 *     for key in container.keys() {
 *         println!("{}", key);
 *     }
 *
 *     let matrix = container.get("2^3")?;
 *     println!("{:?}", matrix.shape());
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::BTreeMap;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use tracing::debug;

use crate::error::Error;
use crate::matrix::Matrix;
use crate::store::MatrixStore;

const MAGIC: &[u8; 4] = b"OAMX";
const VERSION: u16 = 1;
const HEADER_LEN: usize = 10;

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidContainer(reason.into())
}

fn encode(matrices: &BTreeMap<String, Matrix>) -> Result<Vec<u8>, Error> {
    let mut payload = Vec::new();
    ciborium::into_writer(matrices, &mut payload)
        .map_err(|e| invalid(format!("cannot encode payload: {e}")))?;
    let payload_len = u32::try_from(payload.len())
        .map_err(|_| invalid(format!("payload of {} bytes is too large", payload.len())))?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&payload)?;
    let compressed = encoder.finish()?;

    let mut out = Vec::with_capacity(HEADER_LEN + compressed.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&payload_len.to_le_bytes());
    out.extend_from_slice(&compressed);
    Ok(out)
}

fn decompress(capacity: usize, data: &[u8]) -> Result<Vec<u8>, Error> {
    // Read at most one byte past the declared length so an oversized stream is
    // detected without inflating all of it.
    let mut decoder = ZlibDecoder::new(data).take(capacity as u64 + 1);
    let mut buffer = Vec::with_capacity(capacity.min(data.len().saturating_mul(64)));
    let s = decoder
        .read_to_end(&mut buffer)
        .map_err(|e| invalid(format!("bad zlib stream: {e}")))?;
    if s != capacity {
        return Err(invalid("decompressed size mismatch"));
    }
    Ok(buffer)
}

fn decode_payload(payload: &[u8]) -> Result<BTreeMap<String, Matrix>, Error> {
    ciborium::from_reader(payload).map_err(|e| invalid(format!("bad payload: {e}")))
}

/// A container opened for reading.
#[derive(Debug, Clone)]
pub struct Container {
    matrices: BTreeMap<String, Matrix>,
}

impl Container {
    /// Opens and fully loads the container at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;

        Self::from_bytes(&buffer)
    }

    /// Parses a container from its serialized bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < HEADER_LEN {
            return Err(invalid("file too short"));
        }
        if &data[0..4] != MAGIC {
            return Err(invalid("bad magic"));
        }

        let version = u16::from_le_bytes([data[4], data[5]]);
        if version != VERSION {
            return Err(invalid(format!("unsupported version {version}")));
        }

        let payload_len = u32::from_le_bytes([data[6], data[7], data[8], data[9]]) as usize;
        let payload = decompress(payload_len, &data[HEADER_LEN..])?;

        Ok(Self {
            matrices: decode_payload(&payload)?,
        })
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.matrices.keys().map(String::as_str)
    }

    /// The matrix stored under `key`.
    pub fn get(&self, key: &str) -> Result<&Matrix, Error> {
        self.matrices
            .get(key)
            .ok_or_else(|| Error::UnknownKey(key.to_string()))
    }

    /// Number of matrices in the container.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Returns `true` if the container holds no matrices.
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}

/// Opens the container at `path` and returns the matrix named `key`.
pub fn read_matrix<P: AsRef<Path>>(path: P, key: &str) -> Result<Matrix, Error> {
    let mut container = Container::open(path)?;
    container
        .matrices
        .remove(key)
        .ok_or_else(|| Error::UnknownKey(key.to_string()))
}

/// A file-backed [MatrixStore].
///
/// The file is created when the writer is created. Matrices are kept in
/// memory and the whole container is rewritten on every
/// [flush](MatrixStore::flush).
#[derive(Debug)]
pub struct ContainerWriter {
    file: File,
    path: PathBuf,
    matrices: BTreeMap<String, Matrix>,
}

impl ContainerWriter {
    /// Creates (or truncates) the container file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            file,
            path,
            matrices: BTreeMap::new(),
        })
    }

    /// Path of the container file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and syncs the container to disk.
    pub fn close(mut self) -> Result<(), Error> {
        self.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

impl MatrixStore for ContainerWriter {
    fn create(&mut self, key: &str, matrix: Matrix) -> Result<(), Error> {
        self.matrices.insert(key.to_string(), matrix);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        let bytes = encode(&self.matrices)?;
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&bytes)?;
        self.file.flush()?;
        debug!(
            path = %self.path.display(),
            matrices = self.matrices.len(),
            bytes = bytes.len(),
            "container written"
        );
        Ok(())
    }
}
