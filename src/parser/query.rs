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
use crate::QueryRequest;
use crate::error::Error;
use crate::error::Result;
use crate::parser::split_fields;

const TABLE: &str = "query";

/// Parse a line from a query table
///
/// Reads the two tab-separated fields `sequence_id` and `query_position`.
/// `original_index` is the position of the row in the table.
///
pub fn read_query(
    line: &str,
    original_index: usize,
    line_no: usize,
) -> Result<QueryRequest> {
    let fields = split_fields(TABLE, line, 2, line_no)?;

    let query_position = fields[1].trim().parse::<i64>().map_err(|_| {
        Error::invalid_row(TABLE, line_no, format!("query_position '{}' is not an integer", fields[1]))
    })?;

    Ok(QueryRequest {
        original_index,
        sequence_id: fields[0].to_string(),
        query_position,
    })
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn read_query_line() {
        use super::read_query;
        use crate::QueryRequest;

        let got = read_query("TR1\t13", 7, 9).unwrap();
        let expected = QueryRequest { original_index: 7, sequence_id: "TR1".to_string(), query_position: 13 };

        assert_eq!(got, expected);
    }

    #[test]
    fn read_query_not_a_number() {
        use super::read_query;
        use crate::error::Error;

        let got = read_query("TR1\tthirteen", 0, 4);
        match got {
            Err(Error::InvalidRow { table, line, reason }) => {
                assert_eq!(table, "query");
                assert_eq!(line, 4);
                assert!(reason.contains("thirteen"));
            },
            other => panic!("expected InvalidRow, got {:?}", other),
        }
    }
}
