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

//! Resolve query coordinates against a built [AlignmentIndex].
//!
//! A lookup that finds nothing is a normal outcome: the returned
//! [QueryResult] has an empty chromosome and no reference position.
//!
//! When the query position falls inside a deletion or skipped region several
//! reference positions share it; the first one in alignment order is
//! returned.
//!
use crate::QueryRequest;
use crate::QueryResult;
use crate::index::AlignmentIndex;

/// Read-only view of an [AlignmentIndex] used during the query phase.
#[derive(Clone, Copy, Debug)]
pub struct PositionResolver<'a> {
    index: &'a AlignmentIndex,
}

impl<'a> PositionResolver<'a> {
    pub fn new(
        index: &'a AlignmentIndex,
    ) -> Self {
        PositionResolver { index }
    }

    /// Chromosome and reference position for `query_position` on `sequence_id`.
    ///
    /// Returns None if the sequence is not indexed. The position is None if
    /// `query_position` is negative or does not occur in the coordinate map.
    ///
    pub fn resolve_position(
        &self,
        sequence_id: &str,
        query_position: i64,
    ) -> Option<(&'a str, Option<u64>)> {
        let map = self.index.get(sequence_id)?;
        let ref_position = u64::try_from(query_position)
            .ok()
            .and_then(|pos| map.reference_position(pos));
        Some((map.chromosome(), ref_position))
    }

    pub fn resolve(
        &self,
        request: &QueryRequest,
    ) -> QueryResult {
        match self.resolve_position(&request.sequence_id, request.query_position) {
            Some((chromosome, Some(reference_position))) => {
                QueryResult::hit(request, chromosome, reference_position)
            },
            Some((_, None)) => {
                log::debug!("Query position {} not found in {}", request.query_position, request.sequence_id);
                QueryResult::miss(request)
            },
            None => {
                log::debug!("Sequence id {} not found in alignments", request.sequence_id);
                QueryResult::miss(request)
            },
        }
    }
}
