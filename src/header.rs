// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/header.rs - Design header parser for orthogonal-array catalogues.
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
 * # `header` Module
 *
 * This module parses design header lines such as `2^12 12^1     n=24` into a
 * [DesignHeader]: the design name, the declared row count, and the ordered
 * list of [ColumnGroup]s that fixes the layout of every data row that follows.
 *
 * ## Usage Example
 *
 * ```
 * use oamatrix::header::DesignHeader;
 *
 * let header = DesignHeader::parse("2^12 12^1     n=24").unwrap();
 * assert_eq!(header.name, "2^12 12^1");
 * assert_eq!(header.declared_row_count(), Some(24));
 * assert_eq!(header.column_count(), 13);
 * ```
 */

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FormatError;

static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"n=[0-9]+").unwrap());

/// Returns `true` if `line` looks like a design header (contains `n=<digits>`).
pub fn is_header_line(line: &str) -> bool {
    HEADER_PATTERN.is_match(line)
}

/// A run of columns sharing one symbol alphabet, written `level^repeat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnGroup {
    /// Number of distinct symbol values in these columns.
    pub symbol_level: u32,
    /// Number of output columns this group contributes.
    pub repeat_count: u32,
}

impl ColumnGroup {
    /// Characters used per cell in a data row.
    ///
    /// Alphabets of up to ten symbols fit in one digit; larger alphabets are
    /// packed as two-digit fields.
    pub fn digit_width(&self) -> usize {
        if self.symbol_level <= 10 { 1 } else { 2 }
    }

    /// Characters this group consumes from a data row.
    pub fn width(&self) -> usize {
        self.digit_width() * self.repeat_count as usize
    }

    fn from_token(token: &str, header: &str) -> Result<Self, FormatError> {
        let malformed = |reason: String| FormatError::MalformedHeader {
            header: header.to_string(),
            reason,
        };

        let mut parts = token.split('^');
        let (level, repeat) = match (parts.next(), parts.next(), parts.next()) {
            (Some(level), Some(repeat), None) => (level, repeat),
            _ => return Err(malformed(format!("token {token:?} is not level^repeat"))),
        };

        let symbol_level = level
            .parse::<u32>()
            .map_err(|_| malformed(format!("bad symbol level {level:?}")))?;
        let repeat_count = repeat
            .parse::<u32>()
            .map_err(|_| malformed(format!("bad repeat count {repeat:?}")))?;

        if symbol_level < 2 {
            return Err(malformed(format!("symbol level {symbol_level} is below 2")));
        }
        if repeat_count < 1 {
            return Err(malformed(format!("repeat count of {token:?} is zero")));
        }

        Ok(Self {
            symbol_level,
            repeat_count,
        })
    }
}

/// The parsed form of one header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignHeader {
    /// The header text before `n=`, used verbatim as the storage key.
    pub name: String,
    /// The text after `n=`, as written.
    pub declared_rows: String,
    /// Column groups in the order they appear in the name.
    pub column_groups: Vec<ColumnGroup>,
}

impl DesignHeader {
    /// Parses a header line.
    ///
    /// The line is split at the first `n=`. The trimmed text before it is the
    /// design name and is tokenized on single spaces into `level^repeat`
    /// column groups; the trimmed text after it is the declared row count.
    ///
    /// # Arguments
    ///
    /// * `line` - A line for which [is_header_line] returned `true`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the parsed header or a
    /// [FormatError::MalformedHeader].
    pub fn parse(line: &str) -> Result<Self, FormatError> {
        let (name, declared_rows) = line
            .split_once("n=")
            .ok_or_else(|| FormatError::MalformedHeader {
                header: line.trim().to_string(),
                reason: "missing n=".to_string(),
            })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(FormatError::MalformedHeader {
                header: line.trim().to_string(),
                reason: "empty design name".to_string(),
            });
        }

        let column_groups = name
            .split(' ')
            .map(|token| ColumnGroup::from_token(token, name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            declared_rows: declared_rows.trim().to_string(),
            column_groups,
        })
    }

    /// The declared row count, if it is a plain integer.
    pub fn declared_row_count(&self) -> Option<usize> {
        self.declared_rows.parse().ok()
    }

    /// Number of integer cells in every row of this design.
    pub fn column_count(&self) -> usize {
        self.column_groups
            .iter()
            .map(|g| g.repeat_count as usize)
            .sum()
    }

    /// Number of characters a data row must have for this design.
    pub fn row_width(&self) -> usize {
        self.column_groups.iter().map(ColumnGroup::width).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_header_line() {
        assert!(is_header_line("2^12 12^1     n=24"));
        assert!(is_header_line("2^3 n=4\n"));
        assert!(!is_header_line("101101000111 3"));
        assert!(!is_header_line("2^3 n="));
        assert!(!is_header_line(""));
    }

    #[test]
    fn test_parse_two_groups() {
        let header = DesignHeader::parse("2^12 12^1     n=24").unwrap();
        assert_eq!(header.name, "2^12 12^1");
        assert_eq!(header.declared_rows, "24");
        assert_eq!(
            header.column_groups,
            vec![
                ColumnGroup {
                    symbol_level: 2,
                    repeat_count: 12
                },
                ColumnGroup {
                    symbol_level: 12,
                    repeat_count: 1
                },
            ]
        );
        assert_eq!(header.column_count(), 13);
        assert_eq!(header.row_width(), 14);
    }

    #[test]
    fn test_parse_keeps_group_order() {
        let header = DesignHeader::parse("3^4 2^1 n=9").unwrap();
        let levels: Vec<u32> = header.column_groups.iter().map(|g| g.symbol_level).collect();
        assert_eq!(levels, vec![3, 2]);
    }

    #[test]
    fn test_digit_width() {
        for level in 2..=10 {
            let group = ColumnGroup {
                symbol_level: level,
                repeat_count: 1,
            };
            assert_eq!(group.digit_width(), 1, "level {level}");
        }
        for level in [11, 12, 36] {
            let group = ColumnGroup {
                symbol_level: level,
                repeat_count: 3,
            };
            assert_eq!(group.digit_width(), 2, "level {level}");
            assert_eq!(group.width(), 6);
        }
    }

    #[test]
    fn test_declared_row_count_is_metadata() {
        let header = DesignHeader::parse("2^3 n=4 (resolution III)").unwrap();
        assert_eq!(header.declared_rows, "4 (resolution III)");
        assert_eq!(header.declared_row_count(), None);
    }

    #[test]
    fn test_missing_caret() {
        let err = DesignHeader::parse("2^3 4 n=8").unwrap_err();
        assert!(matches!(err, FormatError::MalformedHeader { .. }));
    }

    #[test]
    fn test_missing_row_marker() {
        let err = DesignHeader::parse("2^3").unwrap_err();
        assert!(matches!(err, FormatError::MalformedHeader { .. }));
    }

    #[test]
    fn test_invalid_groups() {
        for line in ["1^3 n=4", "2^0 n=4", "x^3 n=4", "2^3^1 n=4", "n=4", "2^3  3^1 n=9"] {
            assert!(
                DesignHeader::parse(line).is_err(),
                "expected {line:?} to be rejected"
            );
        }
    }
}
