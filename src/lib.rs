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

//! cigarmap is a library and a command-line client for projecting positions
//! on a query sequence (a transcript or a read) onto the reference genome it
//! was aligned to.
//!
//! The input is a set of alignments, one per query sequence, each given as a
//! chromosome, a 0-based start position and a
//! [CIGAR](https://samtools.github.io/hts-specs/SAMv1.pdf) string, and a list of
//! `(sequence id, query position)` lookups. The output is the reference
//! chromosome and position of every lookup, in the order the lookups were
//! given.
//!
//! ## Usage
//!
//! ### Command line
//!
//! ```text
//! cigarmap --alignment alignments.tsv --query queries.tsv --outdir query_results
//! ```
//!
//! writes `query_results/query_results_<timestamp>.txt` and a run log under
//! `query_results/scratch/`. Alignments with an invalid CIGAR string, or
//! whose coordinates do not fit in 64 bits, are skipped and listed in the
//! log; lookups against them are reported as not found.
//!
//! ### Rust API
//!
//! [query_from_read_to_write] runs the whole pipeline on anything that
//! implements [Read] and [Write]. The individual steps are available as:
//!
//!   - [cigar::decode]: tokenize a CIGAR string.
//!   - [index::build]: build the [CoordinateMap](index::CoordinateMap) of one [AlignmentRecord].
//!   - [AlignmentIndex](index::AlignmentIndex): coordinate maps keyed by sequence id.
//!   - [PositionResolver](resolver::PositionResolver): look up a [QueryRequest] in an index.
//!   - [QueryExecutor](executor::QueryExecutor): build the index and resolve all requests on a worker pool.
//!   - [AlignmentParser](parser::AlignmentParser) and [QueryParser](parser::QueryParser): read the input tables.
//!   - [Printer](printer::Printer) and [write_results]: format results as output rows.
//!
//! ## Table formats
//!
//! All tables are tab-separated without a header line.
//!
//! | Table     | Columns                                                                        |
//! | :-------- | :----------------------------------------------------------------------------- |
//! | alignment | `sequence_id`, `chromosome`, `ref_start` (0-based), `cigar`                     |
//! | query     | `sequence_id`, `query_position`                                                 |
//! | output    | `original_index`, `sequence_id`, `query_position`, `chromosome`, `reference_position` |
//!
//! `original_index` is the 0-based row of the lookup in the query table.
//! A lookup that is not found has an empty `chromosome` and
//! `reference_position`.
//!

use std::io::Read;
use std::io::Write;

pub mod cigar;
pub mod error;
pub mod executor;
pub mod index;
pub mod parser;
pub mod printer;
pub mod resolver;

pub use error::BuildError;
pub use error::Error;
pub use error::ParseError;

use executor::QueryExecutor;
use executor::RunConfig;
use executor::RunReport;
use printer::MissValue;
use printer::Printer;

/// One alignment of a query sequence to the reference.
///
/// `cigar` is kept as text and decoded when the index is built, so that an
/// invalid CIGAR only affects its own record.
///
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AlignmentRecord {
    pub sequence_id: String,
    pub chromosome: String,
    /// 0-based start of the alignment on the reference.
    pub ref_start: u64,
    pub cigar: String,
}

/// A lookup of `query_position` on `sequence_id`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryRequest {
    /// Position of the request in the caller's input.
    pub original_index: usize,
    pub sequence_id: String,
    pub query_position: i64,
}

/// Answer to a [QueryRequest].
///
/// `chromosome` is empty and `reference_position` is None if the lookup was
/// not found.
///
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryResult {
    pub original_index: usize,
    pub sequence_id: String,
    pub query_position: i64,
    pub chromosome: String,
    pub reference_position: Option<u64>,
}

impl QueryResult {
    pub fn hit(
        request: &QueryRequest,
        chromosome: &str,
        reference_position: u64,
    ) -> Self {
        QueryResult {
            original_index: request.original_index,
            sequence_id: request.sequence_id.clone(),
            query_position: request.query_position,
            chromosome: chromosome.to_string(),
            reference_position: Some(reference_position),
        }
    }

    pub fn miss(
        request: &QueryRequest,
    ) -> Self {
        QueryResult {
            original_index: request.original_index,
            sequence_id: request.sequence_id.clone(),
            query_position: request.query_position,
            chromosome: String::new(),
            reference_position: None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.reference_position.is_some()
    }
}

/// Resolve all lookups in a query table against an alignment table.
///
/// Reads the alignment table from `alignments` and the query table from
/// `queries`, runs both phases of [QueryExecutor] with `config` and writes one
/// output row per query row to `conn_out` in query table order.
///
/// Returns the [RunReport] of the run.
///
/// ## Errors
///
/// Malformed table rows and IO errors are returned as [Error]. Alignments
/// that cannot be built are not errors, they are listed in
/// [RunReport::skipped].
///
/// ## Usage
///
/// ```rust
/// use cigarmap::query_from_read_to_write;
/// use cigarmap::executor::RunConfig;
/// use cigarmap::printer::MissValue;
/// use std::io::Cursor;
///
/// let mut alignments = Cursor::new(b"TR1\tCHR1\t3\t8M7D6M2I2M11D7M\nTR2\tCHR2\t0\t5Z\n".to_vec());
/// let mut queries = Cursor::new(b"TR1\t13\nTR2\t1\nTR3\t0\n".to_vec());
///
/// let mut output: Vec<u8> = Vec::new();
/// let report = query_from_read_to_write(&RunConfig::default(), MissValue::Empty, &mut alignments, &mut queries, &mut output).unwrap();
///
/// let mut expected: Vec<u8> = Vec::new();
/// expected.append(&mut b"0\tTR1\t13\tCHR1\t23\n".to_vec());
/// expected.append(&mut b"1\tTR2\t1\t\t\n".to_vec());
/// expected.append(&mut b"2\tTR3\t0\t\t\n".to_vec());
///
/// assert_eq!(output, expected);
/// assert_eq!(report.skipped.len(), 1);
/// assert_eq!(report.results.len(), 3);
/// ```
///
pub fn query_from_read_to_write<A: Read, Q: Read, W: Write>(
    config: &RunConfig,
    miss: MissValue,
    alignments: &mut A,
    queries: &mut Q,
    conn_out: &mut W,
) -> Result<RunReport, Error> {
    let records = parser::read_alignments(alignments)?;
    let requests = parser::read_queries(queries)?;

    let executor = QueryExecutor::new(config)?;
    let report = executor.run(&records, &requests);

    write_results(&report.results, miss, conn_out)?;

    Ok(report)
}

/// Write `results` to `conn_out` as output rows, in the order given.
///
/// Returns the number of rows written.
///
pub fn write_results<W: Write>(
    results: &[QueryResult],
    miss: MissValue,
    conn_out: &mut W,
) -> Result<usize, Error> {
    let mut records = results.iter().cloned();
    let mut printer = Printer::new(&mut records, miss);
    for line in printer.by_ref() {
        conn_out.write_all(&line)?;
    }
    conn_out.flush()?;

    Ok(printer.lines_printed())
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn query_result_hit_and_miss() {
        use super::{QueryRequest, QueryResult};

        let request = QueryRequest { original_index: 3, sequence_id: "TR1".to_string(), query_position: 13 };

        let hit = QueryResult::hit(&request, "CHR1", 23);
        assert!(hit.is_hit());
        assert_eq!(hit.chromosome, "CHR1");
        assert_eq!(hit.original_index, 3);

        let miss = QueryResult::miss(&request);
        assert!(!miss.is_hit());
        assert!(miss.chromosome.is_empty());
        assert_eq!(miss.query_position, 13);
    }

    #[test]
    fn query_from_read_to_write_end_to_end() {
        use super::query_from_read_to_write;
        use crate::executor::RunConfig;
        use crate::printer::MissValue;
        use std::io::Cursor;

        let mut alignments = Cursor::new(b"TR1\tCHR1\t3\t8M7D6M2I2M11D7M\n".to_vec());
        let mut queries = Cursor::new(b"TR1\t13\n".to_vec());

        let mut output: Vec<u8> = Vec::new();
        let report = query_from_read_to_write(&RunConfig { threads: Some(1) }, MissValue::Empty, &mut alignments, &mut queries, &mut output).unwrap();

        assert_eq!(output, b"0\tTR1\t13\tCHR1\t23\n".to_vec());
        assert_eq!(report.n_hits, 1);
        assert_eq!(report.n_misses, 0);
    }

    #[test]
    fn query_from_read_to_write_malformed_row() {
        use super::query_from_read_to_write;
        use crate::Error;
        use crate::executor::RunConfig;
        use crate::printer::MissValue;
        use std::io::Cursor;

        let mut alignments = Cursor::new(b"TR1\tCHR1\tthree\t10M\n".to_vec());
        let mut queries = Cursor::new(b"TR1\t0\n".to_vec());

        let mut output: Vec<u8> = Vec::new();
        let got = query_from_read_to_write(&RunConfig::default(), MissValue::Empty, &mut alignments, &mut queries, &mut output);

        assert!(matches!(got, Err(Error::InvalidRow { table: "alignment", line: 1, .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn write_results_counts_rows() {
        use super::{write_results, QueryRequest, QueryResult};
        use crate::printer::MissValue;

        let request = QueryRequest { original_index: 0, sequence_id: "TR1".to_string(), query_position: 13 };
        let results = vec![QueryResult::hit(&request, "CHR1", 23), QueryResult::miss(&request)];

        let mut output: Vec<u8> = Vec::new();
        let got = write_results(&results, MissValue::Sentinel, &mut output).unwrap();

        assert_eq!(got, 2);
        assert_eq!(output, b"0\tTR1\t13\tCHR1\t23\n0\tTR1\t13\t\t-1\n".to_vec());
    }
}
