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

//! Printer for outputting [QueryResult] records as tab-separated rows.
//!
//! Can be used to format any iterator over [QueryResult] data. Returns 1 line
//! at a time using next(). The printer does not reorder its input, pass the
//! results in `original_index` order as returned by
//! [QueryExecutor](crate::executor::QueryExecutor).
//!
//! ## Usage
//!
//! ```rust
//! use cigarmap::QueryResult;
//! use cigarmap::printer::{MissValue, Printer};
//! use std::io::{Cursor, Write};
//!
//! let data = vec![
//!     QueryResult { original_index: 0, sequence_id: "TR1".to_string(), query_position: 13, chromosome: "CHR1".to_string(), reference_position: Some(23) },
//!     QueryResult { original_index: 1, sequence_id: "TR2".to_string(), query_position: 4, chromosome: String::new(), reference_position: None },
//! ];
//!
//! let mut iter = data.into_iter();
//! let mut printer = Printer::new(&mut iter, MissValue::Empty);
//!
//! let mut output: Cursor<Vec<u8>> = Cursor::new(Vec::new());
//! for line in printer.by_ref() {
//!     output.write_all(&line).unwrap();
//! }
//!
//! let mut expected: Vec<u8> = Vec::new();
//! expected.append(&mut b"0\tTR1\t13\tCHR1\t23\n".to_vec());
//! expected.append(&mut b"1\tTR2\t4\t\t\n".to_vec());
//!
//! assert_eq!(output.get_ref(), &expected);
//! ```
//!

use crate::QueryResult;

pub mod results;

pub use results::format_result_line;
pub use results::MissValue;

pub struct Printer<'a, I: Iterator> where I: Iterator<Item=QueryResult> {
    records: &'a mut I,
    pub miss: MissValue,
    index: usize,
}

impl<'a, I: Iterator> Printer<'a, I> where I: Iterator<Item=QueryResult> {
    pub fn new(
        records: &'a mut I,
        miss: MissValue,
    ) -> Self {
        Printer{ records, miss, index: 0 }
    }

    /// Number of lines printed so far.
    pub fn lines_printed(&self) -> usize {
        self.index
    }
}

impl<I: Iterator> Iterator for Printer<'_, I> where I: Iterator<Item=QueryResult> {
    type Item = Vec<u8>;

    fn next(
        &mut self,
    ) -> Option<Vec<u8>> {
        let record = self.records.next()?;
        let mut out: Vec<u8> = Vec::new();
        // Writing into a Vec<u8> cannot fail.
        format_result_line(&record, self.miss, &mut out).ok()?;
        self.index += 1;
        Some(out)
    }
}
