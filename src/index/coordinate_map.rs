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
use crate::cigar::decode;
use crate::cigar::CigarOp;
use crate::cigar::OpCategory;
use crate::error::BuildError;

/// Per-base correspondence between query and reference coordinates.
///
/// `ref_positions[i]` and `query_positions[i]` were produced by the same
/// CIGAR base. `query_positions` is non-decreasing.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoordinateMap {
    sequence_id: String,
    chromosome: String,
    ref_positions: Vec<u64>,
    query_positions: Vec<u64>,
    query_end: u64,
    ref_end: u64,
    ref_start: u64,
}

impl CoordinateMap {
    /// Walk `ops` starting from `ref_start` on the reference and 0 on the query.
    ///
    /// The cursor ends and the number of pairs are checked before anything is
    /// allocated. Fails if either cursor would run past `u64::MAX` or the pairs
    /// cannot be allocated.
    ///
    pub fn from_ops(
        sequence_id: &str,
        chromosome: &str,
        ref_start: u64,
        ops: &[CigarOp],
    ) -> Result<Self, BuildError> {
        let overflow = |axis: &'static str| {
            BuildError::CoordinateOverflow { sequence_id: sequence_id.to_string(), axis }
        };

        let mut total: usize = 0;
        let mut ref_end = ref_start;
        let mut query_end = 0_u64;
        for op in ops {
            let n = op.len as u64;
            total = total.saturating_add(op.len);
            match op.category() {
                OpCategory::MatchLike => {
                    ref_end = ref_end.checked_add(n).ok_or_else(|| overflow("reference"))?;
                    query_end = query_end.checked_add(n).ok_or_else(|| overflow("query"))?;
                },
                OpCategory::RefOnly => {
                    ref_end = ref_end.checked_add(n).ok_or_else(|| overflow("reference"))?;
                },
                OpCategory::QueryOnly => {
                    query_end = query_end.checked_add(n).ok_or_else(|| overflow("query"))?;
                },
                OpCategory::Neither => {},
            }
        }

        let allocation = || BuildError::Allocation { sequence_id: sequence_id.to_string(), len: total };
        let mut ref_positions: Vec<u64> = Vec::new();
        let mut query_positions: Vec<u64> = Vec::new();
        ref_positions.try_reserve_exact(total).map_err(|_| allocation())?;
        query_positions.try_reserve_exact(total).map_err(|_| allocation())?;

        // Both cursors stay within the ends checked above.
        let mut ref_cursor = ref_start;
        let mut query_cursor = 0_u64;

        for op in ops {
            let n = op.len as u64;
            match op.category() {
                OpCategory::MatchLike => {
                    ref_positions.extend(ref_cursor..(ref_cursor + n));
                    query_positions.extend(query_cursor..(query_cursor + n));
                    ref_cursor += n;
                    query_cursor += n;
                },
                OpCategory::RefOnly => {
                    ref_positions.extend(ref_cursor..(ref_cursor + n));
                    query_positions.extend(std::iter::repeat(query_cursor).take(op.len));
                    ref_cursor += n;
                },
                OpCategory::QueryOnly => {
                    ref_positions.extend(std::iter::repeat(ref_cursor).take(op.len));
                    query_positions.extend(query_cursor..(query_cursor + n));
                    query_cursor += n;
                },
                OpCategory::Neither => {
                    ref_positions.extend(std::iter::repeat(ref_cursor).take(op.len));
                    query_positions.extend(std::iter::repeat(query_cursor).take(op.len));
                },
            }
        }
        debug_assert_eq!(ref_positions.len(), query_positions.len());
        debug_assert_eq!((ref_cursor, query_cursor), (ref_end, query_end));

        Ok(CoordinateMap {
            sequence_id: sequence_id.to_string(),
            chromosome: chromosome.to_string(),
            ref_positions, query_positions,
            query_end, ref_end, ref_start,
        })
    }

    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn ref_positions(&self) -> &[u64] {
        &self.ref_positions
    }

    pub fn query_positions(&self) -> &[u64] {
        &self.query_positions
    }

    /// Number of (reference, query) pairs.
    pub fn len(&self) -> usize {
        self.query_positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.query_positions.is_empty()
    }

    /// Number of query bases consumed by the alignment, clips included.
    pub fn query_length(&self) -> u64 {
        self.query_end
    }

    /// Number of reference bases consumed by the alignment.
    pub fn reference_span(&self) -> u64 {
        self.ref_end - self.ref_start
    }

    /// Reference coordinate of the first pair whose query coordinate is `query_position`.
    ///
    /// Binary searches for the left boundary of the run of equal query
    /// coordinates, so inside a deletion or skipped region this is the
    /// earliest traversed reference position.
    ///
    /// Returns None if `query_position` does not occur in the map.
    ///
    pub fn reference_position(
        &self,
        query_position: u64,
    ) -> Option<u64> {
        let idx = self.query_positions.partition_point(|pos| *pos < query_position);
        match self.query_positions.get(idx) {
            Some(pos) if *pos == query_position => Some(self.ref_positions[idx]),
            _ => None,
        }
    }
}

/// Build the [CoordinateMap] of a single alignment record.
///
/// Decodes `record.cigar` and walks the operations from `record.ref_start`.
/// Fails with [BuildError::Cigar] if the CIGAR string is invalid, or with
/// the errors of [CoordinateMap::from_ops] if the alignment does not fit.
///
pub fn build(
    record: &AlignmentRecord,
) -> Result<CoordinateMap, BuildError> {
    let ops = decode(&record.cigar)?;
    CoordinateMap::from_ops(&record.sequence_id, &record.chromosome, record.ref_start, &ops)
}
