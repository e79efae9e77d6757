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

//! Two-phase parallel execution of a batch of queries.
//!
//! 1. Build: every [AlignmentRecord] is turned into a
//!    [CoordinateMap](crate::index::CoordinateMap) on the worker pool. Records
//!    with an invalid CIGAR are skipped and reported in [RunReport::skipped].
//! 2. Query: every [QueryRequest] is resolved against the finished
//!    [AlignmentIndex] on the worker pool.
//!
//! The index is only borrowed immutably once the build phase has returned.
//! Results are returned in `original_index` order regardless of how the
//! workers were scheduled.
//!
//! ## Usage
//!
//! ```rust
//! use cigarmap::{AlignmentRecord, QueryRequest};
//! use cigarmap::executor::{QueryExecutor, RunConfig};
//!
//! let records = vec![
//!     AlignmentRecord { sequence_id: "TR1".to_string(), chromosome: "CHR1".to_string(), ref_start: 3, cigar: "8M7D6M2I2M11D7M".to_string() },
//!     AlignmentRecord { sequence_id: "TR2".to_string(), chromosome: "CHR2".to_string(), ref_start: 10, cigar: "5Z".to_string() },
//! ];
//! let queries = vec![
//!     QueryRequest { original_index: 0, sequence_id: "TR1".to_string(), query_position: 13 },
//!     QueryRequest { original_index: 1, sequence_id: "TR2".to_string(), query_position: 0 },
//! ];
//!
//! let executor = QueryExecutor::new(&RunConfig { threads: Some(2) }).unwrap();
//! let report = executor.run(&records, &queries);
//!
//! assert_eq!(report.results[0].reference_position, Some(23));
//! assert_eq!(report.results[1].reference_position, None);
//! assert_eq!(report.skipped.len(), 1);
//! ```
//!
use std::io::Write;

use rayon::prelude::*;

use crate::AlignmentRecord;
use crate::QueryRequest;
use crate::QueryResult;
use crate::error::BuildError;
use crate::error::Result;
use crate::index::build;
use crate::index::AlignmentIndex;
use crate::resolver::PositionResolver;

/// Worker pool settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of worker threads, None uses all available hardware threads.
    pub threads: Option<usize>,
}

/// An alignment record left out of the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 0-based position of the record in the alignment input.
    pub row: usize,
    pub sequence_id: String,
    pub error: BuildError,
}

/// Everything produced by [QueryExecutor::run].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Results in `original_index` order.
    pub results: Vec<QueryResult>,
    pub skipped: Vec<SkippedRecord>,
    pub n_alignments: usize,
    pub n_indexed: usize,
    pub n_hits: usize,
    pub n_misses: usize,
}

impl RunReport {
    /// Write a plain text summary of the run followed by one line per
    /// skipped alignment record.
    pub fn write_log<W: Write>(
        &self,
        conn: &mut W,
    ) -> std::io::Result<()> {
        writeln!(conn, "alignments\t{}", self.n_alignments)?;
        writeln!(conn, "indexed_sequences\t{}", self.n_indexed)?;
        writeln!(conn, "skipped_alignments\t{}", self.skipped.len())?;
        writeln!(conn, "queries\t{}", self.results.len())?;
        writeln!(conn, "found\t{}", self.n_hits)?;
        writeln!(conn, "not_found\t{}", self.n_misses)?;
        for skipped in &self.skipped {
            writeln!(conn, "skipped alignment row {} ({}): {}", skipped.row, skipped.sequence_id, skipped.error)?;
        }
        Ok(())
    }
}

pub struct QueryExecutor {
    pool: rayon::ThreadPool,
}

impl QueryExecutor {
    pub fn new(
        config: &RunConfig,
    ) -> Result<Self> {
        // rayon treats 0 as "pick automatically"
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads.unwrap_or(0))
            .thread_name(|idx| format!("cigarmap-worker-{}", idx))
            .build()?;
        Ok(QueryExecutor { pool })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Build phase.
    ///
    /// Builds the coordinate maps of `records` in parallel and merges them
    /// into an [AlignmentIndex] once all workers are done. Records sharing a
    /// sequence id are merged in input order, so the last one in `records`
    /// wins.
    ///
    /// A record that cannot be built (invalid CIGAR, coordinates past
    /// `u64::MAX`, too long to allocate) does not stop the others, it is
    /// returned as a [SkippedRecord] instead.
    ///
    pub fn build_index(
        &self,
        records: &[AlignmentRecord],
    ) -> (AlignmentIndex, Vec<SkippedRecord>) {
        let built: Vec<_> = self.pool.install(|| {
            records.par_iter().map(build).collect()
        });

        let mut index = AlignmentIndex::with_capacity(records.len());
        let mut skipped: Vec<SkippedRecord> = Vec::new();
        for (row, (record, result)) in records.iter().zip(built).enumerate() {
            match result {
                Ok(map) => {
                    if index.insert(map).is_some() {
                        log::warn!("Duplicate sequence id {} on alignment row {}, replacing the earlier alignment", record.sequence_id, row);
                    }
                },
                Err(error) => {
                    log::warn!("Skipping alignment row {} ({}): {}", row, record.sequence_id, error);
                    skipped.push(SkippedRecord { row, sequence_id: record.sequence_id.clone(), error });
                },
            }
        }

        (index, skipped)
    }

    /// Query phase.
    ///
    /// Resolves `queries` in parallel against the finished `index` and
    /// returns the results sorted by `original_index`.
    ///
    pub fn resolve_all(
        &self,
        index: &AlignmentIndex,
        queries: &[QueryRequest],
    ) -> Vec<QueryResult> {
        let resolver = PositionResolver::new(index);
        self.pool.install(|| {
            let mut results: Vec<QueryResult> = queries.par_iter().map(|request| resolver.resolve(request)).collect();
            results.par_sort_by_key(|result| result.original_index);
            results
        })
    }

    /// Run both phases.
    pub fn run(
        &self,
        records: &[AlignmentRecord],
        queries: &[QueryRequest],
    ) -> RunReport {
        log::info!("Indexing {} alignments on {} threads", records.len(), self.num_threads());
        let (index, skipped) = self.build_index(records);
        log::info!("Indexed {} sequences, skipped {} alignments", index.len(), skipped.len());

        log::info!("Resolving {} queries", queries.len());
        let results = self.resolve_all(&index, queries);
        let n_hits = results.iter().filter(|result| result.is_hit()).count();
        let n_misses = results.len() - n_hits;
        log::info!("Resolved {} queries, {} not found", n_hits, n_misses);

        RunReport {
            n_alignments: records.len(),
            n_indexed: index.len(),
            results, skipped,
            n_hits, n_misses,
        }
    }
}
