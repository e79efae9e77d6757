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

//! Streaming parsers for the tab-separated alignment and query tables.
//!
//! Both tables have no header line. Blank lines are skipped and Windows line
//! endings are accepted. Rows are read one line at a time, so the parsers can
//! consume tables that do not fit in memory.
//!
//! ## Usage
//!
//! ```rust
//! use cigarmap::parser::{AlignmentParser, QueryParser};
//! use std::io::Cursor;
//!
//! let mut alignments = Cursor::new(b"TR1\tCHR1\t3\t8M7D6M2I2M11D7M\nTR2\tCHR2\t10\t20M\n".to_vec());
//! let records = AlignmentParser::new(&mut alignments).collect::<Result<Vec<_>, _>>().unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].ref_start, 3);
//!
//! let mut queries = Cursor::new(b"TR1\t4\nTR2\t0\n".to_vec());
//! let requests = QueryParser::new(&mut queries).collect::<Result<Vec<_>, _>>().unwrap();
//! assert_eq!(requests[1].original_index, 1);
//! assert_eq!(requests[1].sequence_id, "TR2");
//! ```
//!

// Table specific implementations
pub mod alignment;
pub mod query;

use crate::AlignmentRecord;
use crate::QueryRequest;
use crate::error::Error;
use crate::error::Result;

use crate::parser::alignment::read_alignment;
use crate::parser::query::read_query;

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

const SEPARATOR: char = '\t';

/// Split `line` on tabs and check that it has exactly `n_fields` fields.
pub(crate) fn split_fields<'l>(
    table: &'static str,
    line: &'l str,
    n_fields: usize,
    line_no: usize,
) -> Result<Vec<&'l str>> {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    if fields.len() != n_fields {
        return Err(Error::invalid_row(table, line_no, format!("expected {} tab-separated fields, found {}", n_fields, fields.len())));
    }
    Ok(fields)
}

/// Reads non-blank lines and tracks their 1-based line numbers.
struct LineReader<'a, R: Read> {
    reader: BufReader<&'a mut R>,
    buf: String,
    line_no: usize,
}

impl<'a, R: Read> LineReader<'a, R> {
    fn new(
        conn: &'a mut R,
    ) -> Self {
        LineReader { reader: BufReader::new(conn), buf: String::new(), line_no: 0 }
    }

    fn next_line(
        &mut self,
    ) -> Option<Result<(usize, &str)>> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let trimmed = self.buf.trim_end_matches(['\n', '\r']);
                    if trimmed.trim().is_empty() {
                        continue;
                    }
                    let len = trimmed.len();
                    return Some(Ok((self.line_no, &self.buf[..len])));
                },
                Err(e) => return Some(Err(Error::from(e))),
            }
        }
    }
}

/// Iterator over the [AlignmentRecord]s in an alignment table.
///
/// Each row is `sequence_id, chromosome, ref_start, cigar`. The CIGAR string
/// is not decoded here, so an invalid CIGAR only affects its own record
/// later on.
///
pub struct AlignmentParser<'a, R: Read> {
    lines: LineReader<'a, R>,
}

impl<'a, R: Read> AlignmentParser<'a, R> {
    pub fn new(
        conn: &'a mut R,
    ) -> Self {
        AlignmentParser { lines: LineReader::new(conn) }
    }
}

impl<R: Read> Iterator for AlignmentParser<'_, R> {
    type Item = Result<AlignmentRecord>;

    fn next(
        &mut self,
    ) -> Option<Result<AlignmentRecord>> {
        let next = self.lines.next_line()?;
        Some(next.and_then(|(line_no, line)| read_alignment(line, line_no)))
    }
}

/// Iterator over the [QueryRequest]s in a query table.
///
/// Each row is `sequence_id, query_position`. The `original_index` of a
/// request is the 0-based count of rows before it.
///
pub struct QueryParser<'a, R: Read> {
    lines: LineReader<'a, R>,
    index: usize,
}

impl<'a, R: Read> QueryParser<'a, R> {
    pub fn new(
        conn: &'a mut R,
    ) -> Self {
        QueryParser { lines: LineReader::new(conn), index: 0 }
    }
}

impl<R: Read> Iterator for QueryParser<'_, R> {
    type Item = Result<QueryRequest>;

    fn next(
        &mut self,
    ) -> Option<Result<QueryRequest>> {
        let next = self.lines.next_line()?;
        let original_index = self.index;
        self.index += 1;
        Some(next.and_then(|(line_no, line)| read_query(line, original_index, line_no)))
    }
}

/// Read a whole alignment table into memory.
pub fn read_alignments<R: Read>(
    conn: &mut R,
) -> Result<Vec<AlignmentRecord>> {
    AlignmentParser::new(conn).collect()
}

/// Read a whole query table into memory.
pub fn read_queries<R: Read>(
    conn: &mut R,
) -> Result<Vec<QueryRequest>> {
    QueryParser::new(conn).collect()
}
