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

//! Decoder for [CIGAR](https://samtools.github.io/hts-specs/SAMv1.pdf) strings.
//!
//! A CIGAR string is a run-length encoding of an alignment as `<length><operator>`
//! tokens. The nine SAM operators are mapped to
//! [Kind](noodles_sam::alignment::record::cigar::op::Kind) and grouped by which
//! sequences they consume:
//!
//! | Operator  | Kind                               | Consumes            | [OpCategory]              |
//! | :-------: | :--------------------------------- | :------------------ | :------------------------ |
//! | M, =, X   | Match, SequenceMatch, SequenceMismatch | query & reference | [MatchLike](OpCategory::MatchLike) |
//! | D, N      | Deletion, Skip                     | reference           | [RefOnly](OpCategory::RefOnly)     |
//! | I, S      | Insertion, SoftClip                | query               | [QueryOnly](OpCategory::QueryOnly) |
//! | H, P      | HardClip, Pad                      | neither             | [Neither](OpCategory::Neither)     |
//!
//! ## Usage
//!
//! ```rust
//! use cigarmap::cigar::{decode, OpCategory};
//!
//! let ops = decode("8M7D6M").unwrap();
//!
//! assert_eq!(ops.len(), 3);
//! assert_eq!(ops[1].len, 7);
//! assert_eq!(ops[1].category(), OpCategory::RefOnly);
//!
//! assert!(decode("5Z").is_err());
//! ```
//!

use std::fmt;
use std::str::FromStr;

use noodles_sam::alignment::record::cigar::op::Kind;

use crate::error::ParseError;

/// How an operator moves the reference and query cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCategory {
    /// Advances both reference and query.
    MatchLike,
    /// Advances the reference only (deletion, skipped region).
    RefOnly,
    /// Advances the query only (insertion, soft clip).
    QueryOnly,
    /// Advances neither (hard clip, padding).
    Neither,
}

impl From<Kind> for OpCategory {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => OpCategory::MatchLike,
            Kind::Deletion | Kind::Skip => OpCategory::RefOnly,
            Kind::Insertion | Kind::SoftClip => OpCategory::QueryOnly,
            Kind::HardClip | Kind::Pad => OpCategory::Neither,
        }
    }
}

/// Operator letter to [Kind]. Returns None for anything outside `MIDNSHP=X`.
pub(crate) fn kind_from_char(
    c: char,
) -> Option<Kind> {
    match c {
        'M' => Some(Kind::Match),
        'I' => Some(Kind::Insertion),
        'D' => Some(Kind::Deletion),
        'N' => Some(Kind::Skip),
        'S' => Some(Kind::SoftClip),
        'H' => Some(Kind::HardClip),
        'P' => Some(Kind::Pad),
        '=' => Some(Kind::SequenceMatch),
        'X' => Some(Kind::SequenceMismatch),
        _ => None,
    }
}

/// [Kind] to its operator letter.
pub(crate) fn kind_to_char(
    kind: Kind,
) -> char {
    match kind {
        Kind::Match => 'M',
        Kind::Insertion => 'I',
        Kind::Deletion => 'D',
        Kind::Skip => 'N',
        Kind::SoftClip => 'S',
        Kind::HardClip => 'H',
        Kind::Pad => 'P',
        Kind::SequenceMatch => '=',
        Kind::SequenceMismatch => 'X',
    }
}

/// A single `<length><operator>` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub len: usize,
    pub kind: Kind,
}

impl CigarOp {
    pub fn new(
        kind: Kind,
        len: usize,
    ) -> Self {
        CigarOp { len, kind }
    }

    pub fn category(
        &self,
    ) -> OpCategory {
        OpCategory::from(self.kind)
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.len, kind_to_char(self.kind))
    }
}

/// Decoded CIGAR string, operations in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CigarString(Vec<CigarOp>);

impl CigarString {
    pub fn ops(
        &self,
    ) -> &[CigarOp] {
        &self.0
    }

    pub fn iter(
        &self,
    ) -> std::slice::Iter<'_, CigarOp> {
        self.0.iter()
    }

    pub fn is_empty(
        &self,
    ) -> bool {
        self.0.is_empty()
    }

    /// Total number of bases described, summed over all operations.
    pub fn total_len(
        &self,
    ) -> usize {
        self.0.iter().map(|op| op.len).sum()
    }
}

impl From<Vec<CigarOp>> for CigarString {
    fn from(ops: Vec<CigarOp>) -> Self {
        CigarString(ops)
    }
}

impl FromStr for CigarString {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CigarString(decode(s)?))
    }
}

impl fmt::Display for CigarString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "*");
        }
        for op in &self.0 {
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CigarString {
    type Item = &'a CigarOp;
    type IntoIter = std::slice::Iter<'a, CigarOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Decode a CIGAR string into its operations.
///
/// Tokenizes `cigar` as repeated runs of ASCII digits followed by a single
/// operator letter. The SAM placeholder `*` decodes to no operations.
///
/// ## Errors
///
/// Returns a [ParseError] naming the offending token if
///   - an operator is not one of `MIDNSHP=X`,
///   - an operator has no length in front of it,
///   - the string ends in a length without an operator,
///   - a length does not fit in `usize`.
///
pub fn decode(
    cigar: &str,
) -> Result<Vec<CigarOp>, ParseError> {
    if cigar == "*" {
        return Ok(Vec::new());
    }

    let mut ops: Vec<CigarOp> = Vec::new();
    let mut token_start = 0;

    for (idx, c) in cigar.char_indices() {
        if c.is_ascii_digit() {
            continue;
        }
        let token_end = idx + c.len_utf8();
        let token = &cigar[token_start..token_end];
        let digits = &cigar[token_start..idx];

        if digits.is_empty() {
            return Err(ParseError::new(token, cigar));
        }
        let kind = kind_from_char(c).ok_or_else(|| ParseError::new(token, cigar))?;
        let len = digits.parse::<usize>().map_err(|_| ParseError::new(token, cigar))?;

        ops.push(CigarOp::new(kind, len));
        token_start = token_end;
    }

    if token_start < cigar.len() {
        return Err(ParseError::new(&cigar[token_start..], cigar));
    }

    Ok(ops)
}
