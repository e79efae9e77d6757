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
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use cigarmap::executor::RunConfig;
use cigarmap::printer::MissValue;
use cigarmap::query_from_read_to_write;

use tempfile::TempDir;

const ALIGNMENTS: &[u8] = b"TR1\tCHR1\t3\t8M7D6M2I2M11D7M
TR2\tCHR2\t100\t5S10M
TR3\tCHR3\t0\t5Z
TR4\tCHR4\t50\t3M2N3M
";

const QUERIES: &[u8] = b"TR1\t13
TR2\t0
TR2\t5
TR3\t0
TR5\t1
TR4\t3
TR1\t8
";

const EXPECTED: &[u8] = b"0\tTR1\t13\tCHR1\t23
1\tTR2\t0\tCHR2\t100
2\tTR2\t5\tCHR2\t100
3\tTR3\t0\t\t
4\tTR5\t1\t\t
5\tTR4\t3\tCHR4\t53
6\tTR1\t8\tCHR1\t11
";

fn write_table(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(contents).unwrap();
    path
}

fn files_in(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir).unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.file_name().unwrap().to_string_lossy().starts_with(prefix))
        .collect()
}

#[test]
fn tables_from_files() {
    let dir = TempDir::new().unwrap();
    let alignment_path = write_table(dir.path(), "alignment.tsv", ALIGNMENTS);
    let query_path = write_table(dir.path(), "query.tsv", QUERIES);

    let mut alignments = File::open(alignment_path).unwrap();
    let mut queries = File::open(query_path).unwrap();
    let mut output: Vec<u8> = Vec::new();

    let report = query_from_read_to_write(&RunConfig { threads: Some(2) }, MissValue::Empty, &mut alignments, &mut queries, &mut output).unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), String::from_utf8(EXPECTED.to_vec()).unwrap());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].sequence_id, "TR3");
    assert_eq!(report.n_hits, 5);
    assert_eq!(report.n_misses, 2);
}

#[test]
fn output_order_independent_of_threads() {
    let mut alignments: Vec<u8> = Vec::new();
    let mut queries: Vec<u8> = Vec::new();
    for idx in 0..300 {
        alignments.append(&mut format!("TX{}\tchr{}\t{}\t{}S{}M{}D{}M\n", idx, idx % 23, idx * 10, idx % 4, 20 + idx % 7, idx % 5, 15).into_bytes());
    }
    for idx in 0..3000 {
        queries.append(&mut format!("TX{}\t{}\n", (idx * 7) % 320, idx % 45).into_bytes());
    }

    let mut expected: Vec<u8> = Vec::new();
    query_from_read_to_write(&RunConfig { threads: Some(1) }, MissValue::Sentinel, &mut alignments.as_slice(), &mut queries.as_slice(), &mut expected).unwrap();
    assert_eq!(expected.iter().filter(|b| **b == b'\n').count(), 3000);

    for threads in [2, 3, 8] {
        let mut got: Vec<u8> = Vec::new();
        query_from_read_to_write(&RunConfig { threads: Some(threads) }, MissValue::Sentinel, &mut alignments.as_slice(), &mut queries.as_slice(), &mut got).unwrap();
        assert_eq!(got, expected);
    }
}

#[test]
fn cli_writes_results_and_log() {
    let dir = TempDir::new().unwrap();
    let alignment_path = write_table(dir.path(), "alignment.tsv", ALIGNMENTS);
    let query_path = write_table(dir.path(), "query.tsv", QUERIES);
    let outdir = dir.path().join("out");

    let status = Command::new(env!("CARGO_BIN_EXE_cigarmap"))
        .arg("--alignment").arg(&alignment_path)
        .arg("--query").arg(&query_path)
        .arg("--outdir").arg(&outdir)
        .arg("--threads").arg("2")
        .status()
        .unwrap();
    assert!(status.success());

    let results = files_in(&outdir, "query_results_");
    assert_eq!(results.len(), 1);
    assert_eq!(std::fs::read(&results[0]).unwrap(), EXPECTED.to_vec());

    let logs = files_in(&outdir.join("scratch"), "log_");
    assert_eq!(logs.len(), 1);
    let log = std::fs::read_to_string(&logs[0]).unwrap();
    assert!(log.contains("skipped_alignments\t1"));
    assert!(log.contains("invalid CIGAR token '5Z'"));
}

#[test]
fn cli_stdout_with_sentinel() {
    let dir = TempDir::new().unwrap();
    let alignment_path = write_table(dir.path(), "alignment.tsv", b"TR1\tCHR1\t3\t8M7D6M2I2M11D7M\n");
    let query_path = write_table(dir.path(), "query.tsv", b"TR1\t13\nTR1\t99\n");

    let output = Command::new(env!("CARGO_BIN_EXE_cigarmap"))
        .arg("-a").arg(&alignment_path)
        .arg("-q").arg(&query_path)
        .arg("-o").arg(dir.path().join("out"))
        .arg("--miss-value=-1")
        .arg("--stdout")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(output.stdout, b"0\tTR1\t13\tCHR1\t23\n1\tTR1\t99\t\t-1\n".to_vec());
}

#[test]
fn cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let query_path = write_table(dir.path(), "query.tsv", QUERIES);

    let output = Command::new(env!("CARGO_BIN_EXE_cigarmap"))
        .arg("-a").arg(dir.path().join("does_not_exist.tsv"))
        .arg("-q").arg(&query_path)
        .arg("-o").arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does_not_exist.tsv"));
}

#[test]
fn cli_unreadable_alignment_names_alignment_file() {
    let dir = TempDir::new().unwrap();
    let alignment_path = write_table(dir.path(), "aln.tsv", b"TR1\tCHR1\t3\t\xff\xfe\n");
    let query_path = write_table(dir.path(), "query.tsv", QUERIES);
    let outdir = dir.path().join("out");

    let output = Command::new(env!("CARGO_BIN_EXE_cigarmap"))
        .arg("-a").arg(&alignment_path)
        .arg("-q").arg(&query_path)
        .arg("-o").arg(&outdir)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("aln.tsv"), "{}", stderr);
    assert!(!stderr.contains("query_results_"), "{}", stderr);
}

#[test]
fn cli_invalid_query_row_names_query_file() {
    let dir = TempDir::new().unwrap();
    let alignment_path = write_table(dir.path(), "aln.tsv", ALIGNMENTS);
    let query_path = write_table(dir.path(), "query.tsv", b"TR1\t13\nTR1\tabc\n");
    let outdir = dir.path().join("out");

    let output = Command::new(env!("CARGO_BIN_EXE_cigarmap"))
        .arg("-a").arg(&alignment_path)
        .arg("-q").arg(&query_path)
        .arg("-o").arg(&outdir)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("query.tsv: invalid query row on line 2"), "{}", stderr);

    // no partial results are left behind
    assert!(!outdir.exists() || files_in(&outdir, "query_results_").is_empty());
}

#[test]
fn tables_with_out_of_range_alignment() {
    let alignments = format!("TR1\tCHR1\t3\t8M7D6M2I2M11D7M\nBIG\tCHR2\t{}\t2M\nTR2\tCHR2\t100\t5S10M\n", u64::MAX);
    let queries: &[u8] = b"TR1\t13\nBIG\t0\nTR2\t5\n";

    let mut output: Vec<u8> = Vec::new();
    let report = query_from_read_to_write(&RunConfig { threads: Some(4) }, MissValue::Empty, &mut alignments.as_bytes(), &mut &queries[..], &mut output).unwrap();

    assert_eq!(output, b"0\tTR1\t13\tCHR1\t23\n1\tBIG\t0\t\t\n2\tTR2\t5\tCHR2\t100\n".to_vec());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].sequence_id, "BIG");
}
