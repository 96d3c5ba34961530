//! Loads that go through an external converter process.
//!
//! These stand in a small shell script for `samtools`/`bcftools`: it prints
//! the (plain text) input file named by its last argument, then exits with a
//! chosen status.
#![cfg(unix)]

use biotable::prelude::*;
use biotable::test_utilities::{random_sam_line, temp_text_file};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

fn fake_converter(dir: &Path, name: &str, exit_status: i32) -> PathBuf {
    let path = dir.join(name);
    let script = format!(
        "#!/bin/sh\necho \"$@\" > \"$0.args\"\nfor last; do :; done\ncat \"$last\"\necho 'converter stderr' >&2\nexit {}\n",
        exit_status
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn sam_text(n: usize) -> String {
    let mut text = String::from("@HD\tVN:1.6\n");
    for i in 0..n {
        text.push_str(&random_sam_line(i, 1));
        text.push('\n');
    }
    text
}

#[test]
fn test_converter_failure_after_valid_lines() {
    let dir = tempfile::tempdir().unwrap();
    let samtools = fake_converter(dir.path(), "samtools", 1);
    let bamfile = temp_text_file(".bam", &sam_text(10));

    let converter = ConverterConfig {
        samtools: samtools.to_string_lossy().to_string(),
        ..Default::default()
    };
    let mut loader = BioTable::sam(bamfile.path())
        .unwrap()
        .with_converter(converter);

    match loader.load() {
        Err(BioTableError::ExternalTool {
            command,
            code,
            stderr,
        }) => {
            assert!(command.contains("view -h"));
            assert_eq!(code, Some(1));
            assert_eq!(stderr, "converter stderr");
        }
        other => panic!("expected ExternalTool error, got {:?}", other),
    }
    assert_eq!(loader.table().nrows(), 0);
}

#[test]
fn test_converter_success_with_threads() {
    let dir = tempfile::tempdir().unwrap();
    let bcftools = fake_converter(dir.path(), "bcftools", 0);
    let vcf_text = "\
##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA12878
chr1\t100\t.\tA\tG\t50\tPASS\tDP=10\tGT\t0/1
";
    let bcffile = temp_text_file(".bcf", vcf_text);

    let converter = ConverterConfig {
        bcftools: bcftools.to_string_lossy().to_string(),
        n_thread: 8,
        ..Default::default()
    };
    let mut loader = BioTable::vcf(bcffile.path())
        .unwrap()
        .with_converter(converter);
    let report = loader.load().unwrap();

    assert_eq!(report.n_rows, 1);
    assert_eq!(loader.samples(), &["NA12878"]);

    let args = fs::read_to_string(dir.path().join("bcftools.args")).unwrap();
    assert!(args.starts_with("view --threads 8 "));
}

#[test]
fn test_parse_error_takes_precedence_over_running_converter() {
    let dir = tempfile::tempdir().unwrap();
    let samtools = fake_converter(dir.path(), "samtools", 0);
    let bamfile = temp_text_file(".bam", "r1\tnot-a-flag\tchr1\t1\t0\t*\t*\t0\t0\tA\t*\n");

    let converter = ConverterConfig {
        samtools: samtools.to_string_lossy().to_string(),
        ..Default::default()
    };
    let mut loader = BioTable::sam(bamfile.path())
        .unwrap()
        .with_converter(converter);
    assert!(matches!(
        loader.load(),
        Err(BioTableError::TypeCoercion { line: 1, .. })
    ));
}
