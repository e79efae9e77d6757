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
use crate::AlignmentRecord;
use crate::error::Error;
use crate::error::Result;
use crate::parser::split_fields;

const TABLE: &str = "alignment";

/// Parse a line from an alignment table
///
/// Reads the four tab-separated fields `sequence_id`, `chromosome`,
/// `ref_start` and `cigar`. `ref_start` must be a 0-based non-negative
/// integer. `line_no` is only used in error messages.
///
pub fn read_alignment(
    line: &str,
    line_no: usize,
) -> Result<AlignmentRecord> {
    let fields = split_fields(TABLE, line, 4, line_no)?;

    let ref_start = fields[2].trim().parse::<u64>().map_err(|_| {
        Error::invalid_row(TABLE, line_no, format!("ref_start '{}' is not a non-negative integer", fields[2]))
    })?;

    Ok(AlignmentRecord {
        sequence_id: fields[0].to_string(),
        chromosome: fields[1].to_string(),
        ref_start,
        cigar: fields[3].trim().to_string(),
    })
}
