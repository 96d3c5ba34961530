//! Test cases and test utility functions.
//!

use rand::{seq::SliceRandom, thread_rng, Rng};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

// number of chromosome sequences
pub const NCHROM: usize = 22;

// maximum range start position
pub const MAX_START: u32 = 250_000_000;

// range length
pub const MIN_LEN: u32 = 1;
pub const MAX_LEN: u32 = 10000;

const BASES: [char; 4] = ['A', 'C', 'G', 'T'];

/// Write `contents` to a new temporary file whose name ends in `suffix`
/// (e.g. `".bed"`). The file is deleted when the handle is dropped.
pub fn temp_text_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut temp_file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    temp_file
        .write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    temp_file.flush().expect("Failed to flush temp file");
    temp_file
}

/// Sample a random chromosome
pub fn random_chrom() -> String {
    let mut rng = thread_rng();
    format!("chr{}", rng.gen_range(1..NCHROM + 1))
}

/// Build a random DNA sequence of length `len`.
pub fn random_sequence(len: usize) -> String {
    let mut rng = thread_rng();
    (0..len)
        .map(|_| *BASES.choose(&mut rng).unwrap_or(&'N'))
        .collect()
}

/// Build one random SAM alignment line with `n_tags` optional tag fields.
pub fn random_sam_line(index: usize, n_tags: usize) -> String {
    let mut rng = thread_rng();
    let len = rng.gen_range(20..150);
    let mut fields = vec![
        format!("read{}", index),
        rng.gen_range(0..4096).to_string(),
        random_chrom(),
        rng.gen_range(1..MAX_START).to_string(),
        rng.gen_range(0..61).to_string(),
        format!("{}M", len),
        "=".to_string(),
        rng.gen_range(1..MAX_START).to_string(),
        rng.gen_range(-500..500).to_string(),
        random_sequence(len),
        "*".to_string(),
    ];
    fields.extend((0..n_tags).map(|i| format!("X{}:i:{}", i, rng.gen_range(0..100))));
    fields.join("\t")
}

/// Build a random SAM file with a short header and `n` alignments, each
/// carrying `n_tags` tag fields.
pub fn random_samfile(n: usize, n_tags: usize) -> NamedTempFile {
    let mut contents = String::from("@HD\tVN:1.6\tSO:unsorted\n");
    for i in 1..=NCHROM {
        contents.push_str(&format!("@SQ\tSN:chr{}\tLN:{}\n", i, MAX_START));
    }
    for i in 0..n {
        contents.push_str(&random_sam_line(i, n_tags));
        contents.push('\n');
    }
    temp_text_file(".sam", &contents)
}

/// Build a random BED file of `n` ranges, with a name and score column.
pub fn random_bedfile(n: usize) -> NamedTempFile {
    let mut rng = thread_rng();
    let mut contents = String::from("track name=random\n");
    for i in 0..n {
        let start = rng.gen_range(0..MAX_START);
        let end = start + rng.gen_range(MIN_LEN..MAX_LEN);
        contents.push_str(&format!(
            "{}\t{}\t{}\tfeature{}\t{}\n",
            random_chrom(),
            start,
            end,
            i,
            rng.gen_range(0..1000)
        ));
    }
    temp_text_file(".bed", &contents)
}
