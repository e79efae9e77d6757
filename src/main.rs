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
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use clap::Parser;

use cigarmap::Error;
use cigarmap::executor::QueryExecutor;
use cigarmap::executor::RunConfig;
use cigarmap::executor::RunReport;
use cigarmap::parser;
use cigarmap::write_results;

mod cli;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    let res = stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init();
    if let Err(e) = res {
        eprintln!("Could not initialize logging: {}", e);
    }
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

fn create_file(
    path: &Path,
) -> Result<BufWriter<File>, Error> {
    let f = File::create(path).map_err(|e| Error::file(path, e))?;
    Ok(BufWriter::new(f))
}

fn write_log(
    report: &RunReport,
    path: &Path,
) -> Result<(), Error> {
    let mut conn_log = create_file(path)?;
    report.write_log(&mut conn_log)
        .and_then(|_| conn_log.flush())
        .map_err(|e| Error::file(path, e))
}

/// Read a whole table from `path` with `read`, naming `path` in any error.
fn read_table<T>(
    path: &Path,
    read: fn(&mut File) -> Result<Vec<T>, Error>,
) -> Result<Vec<T>, Error> {
    let mut conn = File::open(path).map_err(|e| Error::file(path, e))?;
    read(&mut conn).map_err(|e| e.with_path(path))
}

fn run(
    cli: &cli::Cli,
) -> Result<(), Error> {
    let timestamp = timestamp();

    let records = read_table(&cli.alignment, parser::read_alignments)?;
    let requests = read_table(&cli.query, parser::read_queries)?;

    let config = RunConfig { threads: cli.threads };
    let executor = QueryExecutor::new(&config)?;
    let report = executor.run(&records, &requests);

    let scratch = cli.outdir.join("scratch");
    std::fs::create_dir_all(&scratch).map_err(|e| Error::file(&scratch, e))?;

    if cli.write_to_stdout {
        let stdout = std::io::stdout();
        let mut conn_out = BufWriter::new(stdout.lock());
        write_results(&report.results, cli.miss_value, &mut conn_out).map_err(|e| e.with_path("<stdout>"))?;
    } else {
        let out_path = cli.outdir.join(format!("query_results_{}.txt", timestamp));
        let mut conn_out = create_file(&out_path)?;
        let n_lines = write_results(&report.results, cli.miss_value, &mut conn_out).map_err(|e| e.with_path(&out_path))?;
        log::info!("Wrote {} results to {}", n_lines, out_path.display());
    }

    let log_path = scratch.join(format!("log_{}.txt", timestamp));
    write_log(&report, &log_path)?;
    if !report.skipped.is_empty() {
        log::warn!("Skipped {} alignments, see {}", report.skipped.len(), log_path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_log(cli.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
