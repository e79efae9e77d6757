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
use std::path::PathBuf;

use clap::Parser;

use cigarmap::printer::MissValue;

#[derive(Parser)]
#[command(version)]
#[command(about = "Map query sequence positions to reference coordinates through CIGAR alignments")]
pub struct Cli {
    // Alignment table: sequence_id, chromosome, ref_start, cigar
    #[arg(short = 'a', long = "alignment", required = true, help = "Tab-separated alignment table")]
    pub alignment: PathBuf,

    // Query table: sequence_id, query_position
    #[arg(short = 'q', long = "query", required = true, help = "Tab-separated query table")]
    pub query: PathBuf,

    // Results and scratch/ are written here
    #[arg(short = 'o', long = "outdir", default_value = "query_results")]
    pub outdir: PathBuf,

    // Worker threads, defaults to all available
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    // Value written for positions that were not found
    #[arg(long = "miss-value", default_value = "empty", allow_hyphen_values = true, help = "Missing position as 'empty' or '-1'")]
    pub miss_value: MissValue,

    // Write results to stdout
    #[arg(short = 'c', long = "stdout", default_value_t = false)]
    pub write_to_stdout: bool,

    // Verbosity
    #[arg(long = "verbose", default_value_t = false)]
    pub verbose: bool,

    #[arg(long = "debug", default_value_t = false)]
    pub debug: bool,
}

impl Cli {
    pub fn log_level(&self) -> usize {
        if self.debug {
            3
        } else if self.verbose {
            2
        } else {
            1
        }
    }
}
