// cigarmap: Query to reference coordinate projection through CIGAR alignments.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use std::io::Write;

use crate::QueryResult;
use crate::error::Result;

/// How a missing reference position is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissValue {
    /// Leave the field empty.
    #[default]
    Empty,
    /// Write `-1`.
    Sentinel,
}

impl std::str::FromStr for MissValue {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "empty" | "" => Ok(MissValue::Empty),
            "-1" | "sentinel" => Ok(MissValue::Sentinel),
            _ => Err(format!("'{}' is not a valid MissValue", s)),
        }
    }
}

/// Format a single query result
///
/// Writes `original_index`, `sequence_id`, `query_position`, `chromosome`
/// and `reference_position` separated by tabs and terminated by a newline.
/// The chromosome is empty for a miss and the position is written as given
/// by `miss`.
///
pub fn format_result_line<W: Write>(
    result: &QueryResult,
    miss: MissValue,
    conn: &mut W,
) -> Result<()> {
    let separator: char = '\t';
    let mut formatted: String = String::new();

    formatted += &result.original_index.to_string();
    formatted.push(separator);
    formatted += &result.sequence_id;
    formatted.push(separator);
    formatted += &result.query_position.to_string();
    formatted.push(separator);

    match (result.reference_position, miss) {
        (Some(pos), _) => {
            formatted += &result.chromosome;
            formatted.push(separator);
            formatted += &pos.to_string();
        },
        (None, MissValue::Empty) => {
            formatted.push(separator);
        },
        (None, MissValue::Sentinel) => {
            formatted.push(separator);
            formatted += "-1";
        },
    }
    formatted += "\n";

    conn.write_all(formatted.as_bytes())?;
    Ok(())
}
