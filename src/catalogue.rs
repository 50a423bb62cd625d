// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/catalogue.rs - Catalogue driver for orthogonal-array design files.
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
 * # `catalogue` Module
 *
 * This module walks a design catalogue line by line, splitting it into
 * designs and handing each finished design to a [MatrixStore].
 *
 * ## Usage Example
 *
 * ```
 * use oamatrix::catalogue::decode_catalogue;
 * use oamatrix::store::MemoryStore;
 *
 * let text = "2^3     n=4\n000\n011\n101\n110\n";
 * let mut store = MemoryStore::new();
 * let summary = decode_catalogue(text.as_bytes(), &mut store).unwrap();
 *
 * assert_eq!(summary.designs, 1);
 * assert_eq!(store.get("2^3").unwrap().shape(), (4, 3));
 * ```
 */

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::container::ContainerWriter;
use crate::decoder::decode_row;
use crate::error::{Error, FormatError};
use crate::header::{DesignHeader, is_header_line};
use crate::matrix::Matrix;
use crate::store::MatrixStore;

/// A design whose rows have all been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Design {
    /// The header that opened the design.
    pub header: DesignHeader,
    /// The decoded rows.
    pub matrix: Matrix,
}

#[derive(Debug, Default)]
enum DecoderState {
    #[default]
    NoDesign,
    InDesign {
        header: DesignHeader,
        matrix: Matrix,
    },
}

impl DecoderState {
    fn into_design(self) -> Option<Design> {
        match self {
            DecoderState::NoDesign => None,
            DecoderState::InDesign { header, matrix } => Some(Design { header, matrix }),
        }
    }
}

/// Line-at-a-time catalogue decoder.
///
/// Feeding a header line closes the design in progress and returns it;
/// [finish](CatalogueDecoder::finish) returns the last one at end of input.
///
/// On a malformed header the design in progress is left untouched, since all
/// of its rows have already been read. On a bad data row the design in
/// progress is discarded.
#[derive(Debug, Default)]
pub struct CatalogueDecoder {
    state: DecoderState,
    line_number: usize,
}

impl CatalogueDecoder {
    /// Creates a decoder that has not seen any header yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines fed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The header of the design in progress.
    pub fn current_header(&self) -> Option<&DesignHeader> {
        match &self.state {
            DecoderState::NoDesign => None,
            DecoderState::InDesign { header, .. } => Some(header),
        }
    }

    /// Processes one catalogue line.
    ///
    /// # Returns
    ///
    /// A `Result` containing the design closed by this line, if it was a
    /// header line following another design, or an [Error::Format] carrying
    /// the line number.
    pub fn feed(&mut self, line: &str) -> Result<Option<Design>, Error> {
        self.line_number += 1;
        let line_number = self.line_number;
        let format_error = |source| Error::Format {
            line: line_number,
            source,
        };

        if line.trim().is_empty() {
            return Ok(None);
        }

        if is_header_line(line) {
            let header = DesignHeader::parse(line).map_err(format_error)?;
            debug!(line = line_number, name = %header.name, "design header");
            let matrix = Matrix::new(header.column_count());
            let previous = std::mem::replace(
                &mut self.state,
                DecoderState::InDesign { header, matrix },
            );
            return Ok(previous.into_design());
        }

        match &mut self.state {
            DecoderState::NoDesign => Err(format_error(FormatError::RowBeforeHeader)),
            DecoderState::InDesign { header, matrix } => {
                match decode_row(line, &header.column_groups) {
                    Ok(row) => {
                        matrix.push_row(&row)?;
                        Ok(None)
                    }
                    Err(source) => {
                        self.state = DecoderState::NoDesign;
                        Err(format_error(source))
                    }
                }
            }
        }
    }

    /// Ends the input, returning the design in progress, if any.
    pub fn finish(&mut self) -> Option<Design> {
        std::mem::take(&mut self.state).into_design()
    }
}

/// Totals for one catalogue conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Designs handed to the store, duplicates included.
    pub designs: usize,
    /// Data rows decoded across all stored designs.
    pub rows: usize,
}

fn store_design<S: MatrixStore + ?Sized>(
    store: &mut S,
    design: Design,
    summary: &mut ConversionSummary,
) -> Result<(), Error> {
    let Design { header, matrix } = design;
    let (rows, columns) = matrix.shape();

    if let Some(declared) = header.declared_row_count() {
        if declared != rows {
            warn!(name = %header.name, declared, rows, "row count differs from header");
        }
    }

    info!(name = %header.name, rows, columns, "storing design");
    debug!(name = %header.name, matrix = ?matrix.to_rows());

    store.create(&header.name, matrix)?;
    summary.designs += 1;
    summary.rows += rows;
    Ok(())
}

/// Decodes a whole catalogue into `store`.
///
/// Designs completed before a fatal error remain in the store; the error is
/// returned after they have been stored.
///
/// # Arguments
///
/// * `reader` - The catalogue text.
/// * `store` - Where finished designs go, keyed by design name.
///
/// # Returns
///
/// A `Result` containing the [ConversionSummary] or the first error.
pub fn decode_catalogue<R: BufRead, S: MatrixStore + ?Sized>(
    reader: R,
    store: &mut S,
) -> Result<ConversionSummary, Error> {
    let mut decoder = CatalogueDecoder::new();
    let mut summary = ConversionSummary::default();

    for line in reader.lines() {
        let line = line?;
        match decoder.feed(&line) {
            Ok(Some(design)) => store_design(store, design, &mut summary)?,
            Ok(None) => (),
            Err(error) => {
                if let Some(design) = decoder.finish() {
                    store_design(store, design, &mut summary)?;
                }
                return Err(error);
            }
        }
    }

    if let Some(design) = decoder.finish() {
        store_design(store, design, &mut summary)?;
    }

    Ok(summary)
}

/// Converts the catalogue at `input` into a container file at `output`.
///
/// The container is closed even when decoding fails, so designs read before
/// the failure are kept. If both decoding and closing fail, the decode error
/// is returned and the close error is logged.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<ConversionSummary, Error> {
    let file = File::open(input.as_ref())?;
    let mut writer = ContainerWriter::create(output.as_ref())?;
    let path = writer.path().to_path_buf();

    let result = decode_catalogue(BufReader::new(file), &mut writer);
    let summary = match (result, writer.close()) {
        (Ok(summary), Ok(())) => summary,
        (Ok(_), Err(close_error)) => return Err(close_error),
        (Err(decode_error), Ok(())) => return Err(decode_error),
        (Err(decode_error), Err(close_error)) => {
            error!(
                output = %path.display(),
                error = %close_error,
                "container not written, designs decoded before the failure are lost"
            );
            return Err(decode_error);
        }
    };

    info!(
        input = %input.as_ref().display(),
        output = %output.as_ref().display(),
        designs = summary.designs,
        rows = summary.rows,
        "conversion complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::Level;

    use super::*;
    use crate::store::MemoryStore;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` with warnings and errors captured as plain text.
    fn with_captured_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let value = tracing::subscriber::with_default(subscriber, f);
        (value, logs.text())
    }

    fn decode(text: &str) -> (Result<ConversionSummary, Error>, MemoryStore) {
        let mut store = MemoryStore::new();
        let result = decode_catalogue(text.as_bytes(), &mut store);
        (result, store)
    }

    #[test]
    fn test_single_design() {
        let (result, store) = decode("2^3     n=4\n000\n011\n101\n110\n");
        assert_eq!(
            result.unwrap(),
            ConversionSummary {
                designs: 1,
                rows: 4
            }
        );
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["2^3"]);
        assert_eq!(
            store.get("2^3").unwrap().to_rows(),
            vec![vec![0, 0, 0], vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]]
        );
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let (result, store) = decode("\r\n2^2 n=2\r\n\r\n01\r\n   \r\n10\r\n\r\n");
        assert_eq!(result.unwrap().rows, 2);
        assert_eq!(store.get("2^2").unwrap().to_rows(), vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn test_multiple_designs_and_widths() {
        let text = "2^12 12^1     n=2\n\
                    101101000111 3\n\
                    01001011100010 trailing\n\
                    3^2 n=1\n\
                    21\n";
        let (result, store) = decode(text);
        assert_eq!(result.unwrap().designs, 2);
        assert_eq!(
            store.get("2^12 12^1").unwrap().to_rows(),
            vec![
                vec![1, 0, 1, 1, 0, 1, 0, 0, 0, 1, 1, 1, 3],
                vec![0, 1, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 10],
            ]
        );
        assert_eq!(store.get("3^2").unwrap().to_rows(), vec![vec![2, 1]]);
    }

    #[test]
    fn test_empty_design_between_headers() {
        let (result, store) = decode("2^2 n=4\n\n3^1 n=3\n0\n1\n2\n");
        assert!(result.is_ok());
        let empty = store.get("2^2").unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.shape(), (0, 2));
        assert_eq!(store.get("3^1").unwrap().shape(), (3, 1));
    }

    #[test]
    fn test_duplicate_name_keeps_later_design() {
        let (result, store) = decode("2^2 n=1\n00\n2^2 n=1\n11\n");
        assert_eq!(result.unwrap().designs, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("2^2").unwrap().to_rows(), vec![vec![1, 1]]);
    }

    #[test]
    fn test_row_before_header() {
        let (result, store) = decode("\n0101\n2^4 n=1\n");
        assert!(matches!(
            result,
            Err(Error::Format {
                line: 2,
                source: FormatError::RowBeforeHeader
            })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_header_keeps_earlier_designs() {
        let (result, store) = decode("2^2 n=1\n01\n2x3 n=4\n000\n");
        assert!(matches!(
            result,
            Err(Error::Format {
                line: 3,
                source: FormatError::MalformedHeader { .. }
            })
        ));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["2^2"]);
        assert_eq!(store.get("2^2").unwrap().to_rows(), vec![vec![0, 1]]);
    }

    #[test]
    fn test_truncated_row_discards_design() {
        let (result, store) = decode("2^2 n=1\n01\n2^4 n=2\n0110\n01\n");
        assert!(matches!(
            result,
            Err(Error::Format {
                line: 5,
                source: FormatError::TruncatedRow { needed: 4, found: 2 }
            })
        ));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["2^2"]);
    }

    #[test]
    fn test_decoder_transitions() {
        let mut decoder = CatalogueDecoder::new();
        assert!(decoder.current_header().is_none());
        assert_eq!(decoder.feed("2^1 n=1").unwrap(), None);
        assert_eq!(decoder.current_header().unwrap().name, "2^1");
        assert_eq!(decoder.feed("1").unwrap(), None);

        let closed = decoder.feed("3^1 n=1").unwrap().unwrap();
        assert_eq!(closed.header.name, "2^1");
        assert_eq!(closed.matrix.to_rows(), vec![vec![1]]);

        let last = decoder.finish().unwrap();
        assert_eq!(last.header.name, "3^1");
        assert!(last.matrix.is_empty());
        assert!(decoder.finish().is_none());
        assert_eq!(decoder.line_number(), 3);
    }

    #[test]
    fn test_empty_input() {
        let (result, store) = decode("\n\n");
        assert_eq!(result.unwrap(), ConversionSummary::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_row_count_mismatch_warns() {
        let ((result, _), logs) = with_captured_warnings(|| decode("2^2 n=3\n01\n10\n"));
        assert!(result.is_ok());
        assert!(logs.contains("row count differs from header"), "{logs}");
        assert!(logs.contains("declared=3"), "{logs}");
        assert!(logs.contains("rows=2"), "{logs}");
    }

    #[test]
    fn test_matching_row_count_is_silent() {
        let ((result, _), logs) =
            with_captured_warnings(|| decode("2^2 n=2\n01\n10\n2^1 n=4 (run sizes)\n1\n"));
        assert!(result.is_ok());
        assert!(logs.is_empty(), "{logs}");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unwritable_container_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("designs.txt");
        std::fs::write(&input, "2^2 n=1\n01\n2^4 n=1\n01\n").unwrap();

        let (result, logs) = with_captured_warnings(|| convert_file(&input, "/dev/full"));
        assert!(matches!(
            result,
            Err(Error::Format {
                line: 4,
                source: FormatError::TruncatedRow { .. }
            })
        ));
        assert!(logs.contains("container not written"), "{logs}");
        assert!(logs.contains("/dev/full"), "{logs}");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unwritable_container_after_clean_decode() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("designs.txt");
        std::fs::write(&input, "2^2 n=1\n01\n").unwrap();

        assert!(matches!(
            convert_file(&input, "/dev/full"),
            Err(Error::Io(_))
        ));
    }
}
