use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use regex::Regex;

static CANONICAL_CHROMOSOME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(chr)?([0-9]{1,2}|X|Y)$").expect("canonical chromosome pattern is valid")
});

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

pub fn has_chr_prefix(name: &str) -> bool {
    name.len() > 3 && name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("chr"))
}

pub fn strip_chr_prefix(name: &str) -> &str {
    if has_chr_prefix(name) {
        &name[3..]
    } else {
        name
    }
}

///
/// Autosomes and sex chromosomes: `chr` + one or two digits, `chrX`, `chrY`
/// (any case), or the same names without the `chr` prefix.
///
pub fn is_canonical_chromosome(name: &str) -> bool {
    CANONICAL_CHROMOSOME.is_match(name)
}

///
/// Karyotypic ordering: numbered chromosomes ascending, then X, then Y, then
/// any other name lexicographically.
///
pub fn compare_chromosomes(a: &str, b: &str) -> Ordering {
    chromosome_rank(a).cmp(&chromosome_rank(b)).then_with(|| a.cmp(b))
}

fn chromosome_rank(name: &str) -> (u8, u32) {
    let bare = strip_chr_prefix(name);
    if let Ok(n) = bare.parse::<u32>() {
        return (0, n);
    }
    if bare.eq_ignore_ascii_case("X") {
        (1, 0)
    } else if bare.eq_ignore_ascii_case("Y") {
        (1, 1)
    } else {
        (2, 0)
    }
}
