use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use log::{debug, info};

use simvcf_core::utils::{
    compare_chromosomes, get_dynamic_reader, is_canonical_chromosome, strip_chr_prefix,
};

use crate::errors::{ReferenceLoadError, ReferenceLookupError};
use crate::fasta::read_fasta;

///
/// Reference genome held in memory, restricted to canonical chromosomes.
///
/// All positions are 1-based, the same convention as VCF `POS`.
///
#[derive(Clone, Debug, Default)]
pub struct ReferenceStore {
    sequences: BTreeMap<String, Vec<u8>>,
}

impl ReferenceStore {
    ///
    /// Load a (optionally gzipped) FASTA file.
    ///
    /// Bases are upper-cased and only canonical chromosomes are retained.
    ///
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceLoadError> {
        let path = path.as_ref();
        info!("Loading reference FASTA: {}", path.display());

        let reader = get_dynamic_reader(path)
            .map_err(|e| ReferenceLoadError::FileReadError(format!("{:#}", e)))?;

        Self::from_reader(reader, &path.display().to_string())
    }

    ///
    /// Load FASTA records from any buffered reader.
    ///
    /// # Arguments
    ///
    /// - reader: the FASTA stream
    /// - source: name of the stream, used in log and error messages
    ///
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> Result<Self, ReferenceLoadError> {
        let records = read_fasta(reader, source, |name| {
            let keep = is_canonical_chromosome(name);
            if !keep {
                debug!("Skipping non-canonical sequence {}", name);
            }
            keep
        })?;

        if records.is_empty() {
            return Err(ReferenceLoadError::NoCanonicalChromosomes(
                source.to_string(),
            ));
        }

        let sequences: BTreeMap<String, Vec<u8>> = records
            .into_iter()
            .map(|record| (record.name, record.sequence))
            .collect();

        info!(
            "Loaded {} canonical chromosomes from {}",
            sequences.len(),
            source
        );

        Ok(ReferenceStore { sequences })
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Chromosome names in karyotypic order.
    pub fn chromosomes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sequences.keys().map(|k| k.as_str()).collect();
        names.sort_by(|a, b| compare_chromosomes(a, b));
        names
    }

    ///
    /// Find the name under which `name` is stored, accepting `21` for `chr21`
    /// and the other way around. An exact match wins, otherwise the first
    /// match in name order.
    ///
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.sequences.get_key_value(name) {
            return Some(key.as_str());
        }

        let bare = strip_chr_prefix(name);
        self.sequences
            .keys()
            .find(|key| strip_chr_prefix(key).eq_ignore_ascii_case(bare))
            .map(|key| key.as_str())
    }

    fn sequence(&self, chrom: &str) -> Result<&[u8], ReferenceLookupError> {
        self.sequences
            .get(chrom)
            .map(|s| s.as_slice())
            .ok_or_else(|| ReferenceLookupError::UnknownChromosome(chrom.to_string()))
    }

    pub fn length(&self, chrom: &str) -> Result<u64, ReferenceLookupError> {
        Ok(self.sequence(chrom)?.len() as u64)
    }

    /// Base at a 1-based position.
    pub fn base(&self, chrom: &str, position: u64) -> Result<u8, ReferenceLookupError> {
        Ok(self.span(chrom, position, 1)?[0])
    }

    ///
    /// `len` bases starting at the 1-based position `start`.
    ///
    pub fn span(&self, chrom: &str, start: u64, len: u64) -> Result<&[u8], ReferenceLookupError> {
        let sequence = self.sequence(chrom)?;
        let length = sequence.len() as u64;

        if start == 0 || len == 0 || start + len - 1 > length {
            return Err(ReferenceLookupError::OutOfBounds {
                chrom: chrom.to_string(),
                position: start.saturating_add(len.saturating_sub(1)),
                length,
            });
        }

        let from = (start - 1) as usize;
        Ok(&sequence[from..from + len as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn store() -> ReferenceStore {
        let fasta = b">chr1\nACGTACGTAC\n>chrX\nnnnnGGGG\n>chrUn_gl000220\nAAAA\n>chrM\nCCCC\n";
        ReferenceStore::from_reader(&fasta[..], "test").unwrap()
    }

    #[rstest]
    fn test_only_canonical_chromosomes_are_kept(store: ReferenceStore) {
        assert_eq!(store.chromosomes(), vec!["chr1", "chrX"]);
    }

    #[rstest]
    fn test_access_is_one_based(store: ReferenceStore) {
        assert_eq!(store.base("chr1", 1).unwrap(), b'A');
        assert_eq!(store.base("chr1", 4).unwrap(), b'T');
        assert_eq!(store.span("chr1", 2, 3).unwrap(), b"CGT");
        assert_eq!(store.span("chrX", 1, 4).unwrap(), b"NNNN");
    }

    #[rstest]
    fn test_out_of_bounds(store: ReferenceStore) {
        assert_eq!(
            store.base("chr1", 11).unwrap_err(),
            ReferenceLookupError::OutOfBounds {
                chrom: "chr1".to_string(),
                position: 11,
                length: 10
            }
        );
        assert!(store.base("chr1", 0).is_err());
        assert!(store.span("chr1", 9, 3).is_err());
        assert!(store.span("chr1", 8, 3).is_ok());
    }

    #[rstest]
    fn test_unknown_chromosome(store: ReferenceStore) {
        assert_eq!(
            store.length("chr2").unwrap_err(),
            ReferenceLookupError::UnknownChromosome("chr2".to_string())
        );
    }

    #[rstest]
    #[case("chr1", Some("chr1"))]
    #[case("1", Some("chr1"))]
    #[case("x", Some("chrX"))]
    #[case("CHRX", Some("chrX"))]
    #[case("chr2", None)]
    fn test_resolve_name(store: ReferenceStore, #[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(store.resolve_name(name), expected);
    }

    #[rstest]
    #[case("1", "1")]
    #[case("chr1", "chr1")]
    #[case("x", "X")]
    #[case("CHRX", "X")]
    fn test_resolve_name_with_both_spellings(#[case] name: &str, #[case] expected: &str) {
        let fasta = b">chr1\nAAAA\n>1\nCCCC\n>chrX\nGGGG\n>X\nTTTT\n";
        let store = ReferenceStore::from_reader(&fasta[..], "test").unwrap();
        for _ in 0..10 {
            assert_eq!(store.resolve_name(name), Some(expected));
        }
    }

    #[test]
    fn test_no_canonical_chromosomes() {
        let fasta = b">scaffold_1\nACGT\n";
        let err = ReferenceStore::from_reader(&fasta[..], "scaffolds.fa").unwrap_err();
        assert!(matches!(err, ReferenceLoadError::NoCanonicalChromosomes(_)));
    }
}
