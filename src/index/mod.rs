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

//! Coordinate maps and the index holding one map per sequence.
//!
//! [build] turns an [AlignmentRecord](crate::AlignmentRecord) into a
//! [CoordinateMap]. An [AlignmentIndex] is filled with these during the build
//! phase and only read afterwards.
//!
//! ## Usage
//!
//! ```rust
//! use cigarmap::AlignmentRecord;
//! use cigarmap::index::{build, AlignmentIndex};
//!
//! let record = AlignmentRecord {
//!     sequence_id: "TR1".to_string(),
//!     chromosome: "CHR1".to_string(),
//!     ref_start: 3,
//!     cigar: "8M7D6M2I2M11D7M".to_string(),
//! };
//!
//! let mut index = AlignmentIndex::new();
//! index.insert(build(&record).unwrap());
//!
//! let map = index.get("TR1").unwrap();
//! assert_eq!(map.reference_position(13), Some(23));
//! ```
//!

pub mod coordinate_map;

pub use coordinate_map::build;
pub use coordinate_map::CoordinateMap;

use std::collections::HashMap;

/// Coordinate maps keyed by sequence id.
#[derive(Clone, Debug, Default)]
pub struct AlignmentIndex {
    maps: HashMap<String, CoordinateMap>,
}

impl AlignmentIndex {
    pub fn new() -> Self {
        AlignmentIndex { maps: HashMap::new() }
    }

    pub fn with_capacity(
        capacity: usize,
    ) -> Self {
        AlignmentIndex { maps: HashMap::with_capacity(capacity) }
    }

    /// Insert `map` under its sequence id.
    ///
    /// Returns the map that was replaced if the sequence id was already
    /// present.
    ///
    pub fn insert(
        &mut self,
        map: CoordinateMap,
    ) -> Option<CoordinateMap> {
        self.maps.insert(map.sequence_id().to_string(), map)
    }

    pub fn get(
        &self,
        sequence_id: &str,
    ) -> Option<&CoordinateMap> {
        self.maps.get(sequence_id)
    }

    pub fn contains(
        &self,
        sequence_id: &str,
    ) -> bool {
        self.maps.contains_key(sequence_id)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = &CoordinateMap> {
        self.maps.values()
    }
}

impl FromIterator<CoordinateMap> for AlignmentIndex {
    fn from_iter<T: IntoIterator<Item = CoordinateMap>>(iter: T) -> Self {
        let mut index = AlignmentIndex::new();
        for map in iter {
            if index.insert(map).is_some() {
                log::warn!("Duplicate sequence id, keeping the last alignment");
            }
        }
        index
    }
}
