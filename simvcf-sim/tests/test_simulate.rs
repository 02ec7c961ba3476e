use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::TempDir;

use simvcf_core::errors::{ConfigurationError, InputFormatError};
use simvcf_reference::ReferenceStore;
use simvcf_sim::errors::RequestFailure;
use simvcf_sim::{SamplingError, SimulationConfig, SimulationError, simulate};

/// Deterministic, non-repeating-looking sequence of A, C, G and T.
fn sequence(length: usize, mut state: u64) -> String {
    (0..length)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ['A', 'C', 'G', 'T'][(state >> 62) as usize]
        })
        .collect()
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn config(&self, variants: &str) -> SimulationConfig {
        SimulationConfig {
            fasta: Some(self.path("ref.fa")),
            variants: Some(self.write("variants.csv", variants)),
            output: Some(self.path("out.vcf")),
            seed: Some(42),
            file_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        }
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().unwrap();
    let fasta = format!(
        ">chr1 test\n{}\n>chr2\n{}\n>chrUn_gl000220\nACGT\n",
        sequence(2000, 1),
        sequence(2000, 2)
    );
    fs::write(dir.path().join("ref.fa"), fasta).unwrap();
    fs::write(
        dir.path().join("genes.csv"),
        "seqname,start,end,gene_name\nchr1,100,110,GENE_A\nchr2,1000,1010,GENE_B\n",
    )
    .unwrap();
    Workspace { dir }
}

/// Data lines of a VCF, split into columns.
fn records(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

#[rstest]
fn test_snps_in_a_range(workspace: Workspace) {
    let config = workspace.config("chr,position,end,number\nchr1,100,110,3\n");
    let report = simulate(&config).unwrap();
    assert_eq!(report.records, 3);
    assert_eq!(report.seed, 42);

    let store = ReferenceStore::from_fasta(workspace.path("ref.fa")).unwrap();
    let rows = records(&workspace.path("out.vcf"));
    let positions: Vec<u64> = rows.iter().map(|r| r[1].parse().unwrap()).collect();

    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    for row in &rows {
        let pos: u64 = row[1].parse().unwrap();
        assert!((100..=110).contains(&pos));
        assert_eq!(row[0], "chr1");
        assert_eq!(row[2], "SNP");
        assert_eq!(row[3].as_bytes()[0], store.base("chr1", pos).unwrap());
        assert_ne!(row[3], row[4]);
        assert_eq!(&row[5..], ["40", "PASS", "simulated"]);
    }
}

#[rstest]
fn test_deletions_in_a_gene(workspace: Workspace) {
    let mut config = workspace.config("gene,number,variant_type,length\nGENE_B,2,DEL,3\n");
    config.annotation = Some(workspace.path("genes.csv"));
    simulate(&config).unwrap();

    let store = ReferenceStore::from_fasta(workspace.path("ref.fa")).unwrap();
    let rows = records(&workspace.path("out.vcf"));
    assert_eq!(rows.len(), 2);

    let positions: Vec<u64> = rows.iter().map(|r| r[1].parse().unwrap()).collect();
    assert!(positions[1] - positions[0] > 3);
    for (row, pos) in rows.iter().zip(&positions) {
        assert_eq!(row[0], "chr2");
        assert!((1000..=1009).contains(pos));
        let expected_ref = store.span("chr2", *pos, 4).unwrap();
        assert_eq!(row[3].as_bytes(), expected_ref);
        assert_eq!(row[4].as_bytes(), &expected_ref[..1]);
    }
}

#[rstest]
fn test_same_seed_gives_identical_files(workspace: Workspace) {
    let csv = "chr,position,end,number,variant_type,length\n\
               chr2,1,1900,5,INV,9\n\
               chr1,1,1900,20,,\n\
               chr1,1,1900,3,CNV,50\n\
               chr2,500,,,INS:ME,300\n";
    let config = workspace.config(csv);
    simulate(&config).unwrap();
    let first = fs::read(workspace.path("out.vcf")).unwrap();

    simulate(&config).unwrap();
    let second = fs::read(workspace.path("out.vcf")).unwrap();

    assert_eq!(first, second);

    let text = String::from_utf8(first).unwrap();
    assert!(text.starts_with("##fileformat=VCFv4.1\n##fileDate=20240131\n"));
    assert!(text.contains("##reference=file:///seq/references/hg19.fa\n"));
    assert!(text.contains("##ALT=<ID=INS:ME"));
}

#[rstest]
fn test_missing_columns_fail_before_writing(workspace: Workspace) {
    let config = workspace.config("chromosome,start\nchr1,100\n");
    let err = simulate(&config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InputFormatError>(),
        Some(InputFormatError::MissingColumns(_))
    ));
    assert!(!workspace.path("out.vcf").exists());
}

#[rstest]
fn test_overcrowded_interval(workspace: Workspace) {
    let config = workspace.config("chr,position,end,number,variant_type,length\nchr1,1,11,3,DEL,4\n");
    let err = simulate(&config).unwrap_err();
    match err.downcast_ref::<SimulationError>() {
        Some(SimulationError::Request { source, .. }) => assert!(matches!(
            source,
            RequestFailure::Sampling(SamplingError::SpacingInfeasible { .. })
        )),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[rstest]
fn test_gene_rows_need_annotation(workspace: Workspace) {
    let config = workspace.config("gene,number\nGENE_A,1\n");
    let err = simulate(&config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::AnnotationRequired)
    ));
}

#[rstest]
fn test_pinned_site_on_bare_chromosome_name(workspace: Workspace) {
    let config = workspace.config("chr,position,variant_type,length\n2,250,DUP,5\n");
    simulate(&config).unwrap();

    let store = ReferenceStore::from_fasta(workspace.path("ref.fa")).unwrap();
    let rows = records(&workspace.path("out.vcf"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][..3], ["chr2", "250", "DUP"]);
    assert_eq!(rows[0][3].as_bytes(), store.span("chr2", 250, 1).unwrap());
    assert_eq!(rows[0][4].as_bytes(), store.span("chr2", 250, 6).unwrap());
}
