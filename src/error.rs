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

//! Error types returned by the library.
//!
//! Lookup misses are not errors: they are represented as a [QueryResult](crate::QueryResult)
//! without a reference position.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// A CIGAR string could not be decoded.
///
/// Carries the offending token and the full CIGAR string it came from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid CIGAR token '{token}' in '{cigar}'")]
pub struct ParseError {
    pub token: String,
    pub cigar: String,
}

impl ParseError {
    pub fn new(
        token: &str,
        cigar: &str,
    ) -> Self {
        ParseError { token: token.to_string(), cigar: cigar.to_string() }
    }
}

/// An alignment record could not be turned into a coordinate map.
///
/// Only the failing record is affected, the build phase skips it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Cigar(#[from] ParseError),

    #[error("alignment '{sequence_id}' runs past the largest representable {axis} coordinate")]
    CoordinateOverflow { sequence_id: String, axis: &'static str },

    #[error("could not allocate {len} coordinate pairs for alignment '{sequence_id}'")]
    Allocation { sequence_id: String, len: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {table} row on line {line}: {reason}")]
    InvalidRow { table: &'static str, line: usize, reason: String },

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Attach `path` to an IO error so the diagnostic names the file.
    pub fn file(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Error::File { path: path.into(), source }
    }

    /// Name the file an error came from.
    ///
    /// IO errors become [Error::File], table errors are wrapped in
    /// [Error::Input]. Errors that already carry a path are returned as is.
    pub fn with_path(
        self,
        path: impl Into<PathBuf>,
    ) -> Self {
        match self {
            Error::Io(source) => Error::File { path: path.into(), source },
            Error::File { .. } | Error::Input { .. } => self,
            other => Error::Input { path: path.into(), source: Box::new(other) },
        }
    }

    pub(crate) fn invalid_row(
        table: &'static str,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidRow { table, line, reason: reason.into() }
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn parse_error_names_token_and_cigar() {
        use super::ParseError;

        let err = ParseError::new("5Z", "10M5Z");
        assert_eq!(err.to_string(), "invalid CIGAR token '5Z' in '10M5Z'");
    }

    #[test]
    fn file_error_names_path() {
        use super::Error;
        use std::io::ErrorKind;

        let err = Error::file("data/missing.tsv", std::io::Error::new(ErrorKind::NotFound, "no such file"));
        assert_eq!(err.to_string(), "data/missing.tsv: no such file");
    }

    #[test]
    fn invalid_row_names_line() {
        use super::Error;

        let err = Error::invalid_row("alignment", 7, "expected 4 fields, found 3");
        assert_eq!(err.to_string(), "invalid alignment row on line 7: expected 4 fields, found 3");
    }

    #[test]
    fn with_path_names_input_file() {
        use super::Error;
        use std::io::ErrorKind;

        let err = Error::from(std::io::Error::new(ErrorKind::InvalidData, "stream did not contain valid UTF-8"));
        let got = err.with_path("data/aln.tsv");
        assert!(matches!(got, Error::File { .. }));
        assert_eq!(got.to_string(), "data/aln.tsv: stream did not contain valid UTF-8");

        let err = Error::invalid_row("query", 1, "query_position 'abc' is not an integer");
        let got = err.with_path("data/query.tsv");
        assert_eq!(got.to_string(), "data/query.tsv: invalid query row on line 1: query_position 'abc' is not an integer");

        // already named
        let got = got.with_path("other.tsv");
        assert!(got.to_string().starts_with("data/query.tsv: "));
    }

    #[test]
    fn build_error_messages() {
        use super::{BuildError, ParseError};

        let err = BuildError::from(ParseError::new("5Z", "5Z"));
        assert_eq!(err.to_string(), "invalid CIGAR token '5Z' in '5Z'");

        let err = BuildError::CoordinateOverflow { sequence_id: "TR1".to_string(), axis: "reference" };
        assert_eq!(err.to_string(), "alignment 'TR1' runs past the largest representable reference coordinate");
    }
}
