//! Gene name to genomic interval lookup.
//!
//! The annotation table is a CSV (optionally gzipped) with at least the
//! columns `seqname`, `start`, `end` and `gene_name`. Column names are
//! matched case-insensitively and any other columns are ignored.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::info;
use thiserror::Error;

use simvcf_core::models::{AnnotationSource, GeneInterval};
use simvcf_core::utils::get_dynamic_reader;

const REQUIRED_COLUMNS: [&str; 4] = ["seqname", "start", "end", "gene_name"];

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Can't read annotation table: {0}")]
    FileReadError(String),

    #[error("Annotation table is missing column '{0}'")]
    MissingColumn(String),

    #[error("Invalid value {value:?} in column '{column}' on line {line} of the annotation table")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Gene {gene} appears more than once in the annotation table (lines {first} and {second})")]
    DuplicateGene {
        gene: String,
        first: usize,
        second: usize,
    },

    #[error("Gene {0} is not in the annotation table")]
    UnknownGene(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

///
/// Gene annotation keyed by unique gene name.
///
#[derive(Debug, Clone, Default)]
pub struct GeneAnnotation {
    genes: HashMap<String, (usize, GeneInterval)>,
}

impl GeneAnnotation {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        source: AnnotationSource,
    ) -> Result<Self, AnnotationError> {
        let path = path.as_ref();
        let reader = get_dynamic_reader(path)
            .map_err(|e| AnnotationError::FileReadError(format!("{:#}", e)))?;
        let annotation = Self::from_reader(reader, source)?;

        info!(
            "Loaded {} genes from {} annotation {}",
            annotation.len(),
            source,
            path.display()
        );

        Ok(annotation)
    }

    pub fn from_reader<R: Read>(reader: R, source: AnnotationSource) -> Result<Self, AnnotationError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let mut indices = [0usize; 4];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| AnnotationError::MissingColumn(column.to_string()))?;
        }
        let [seqname_idx, start_idx, end_idx, gene_idx] = indices;

        let mut genes: HashMap<String, (usize, GeneInterval)> = HashMap::new();

        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map_or(index + 2, |p| p.line() as usize);

            let field = |idx: usize| record.get(idx).unwrap_or("");
            let coordinate = |idx: usize, column: &str| -> Result<u64, AnnotationError> {
                field(idx)
                    .parse::<u64>()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| AnnotationError::InvalidValue {
                        line,
                        column: column.to_string(),
                        value: field(idx).to_string(),
                    })
            };

            let gene_name = field(gene_idx);
            if gene_name.is_empty() {
                return Err(AnnotationError::InvalidValue {
                    line,
                    column: "gene_name".to_string(),
                    value: String::new(),
                });
            }

            let start = coordinate(start_idx, "start")?;
            let end = coordinate(end_idx, "end")?;
            if end < start {
                return Err(AnnotationError::InvalidValue {
                    line,
                    column: "end".to_string(),
                    value: field(end_idx).to_string(),
                });
            }

            let gene = GeneInterval {
                gene_name: gene_name.to_string(),
                chrom: source.normalize_seqname(field(seqname_idx)),
                start,
                end,
            };

            if let Some((first, _)) = genes.get(gene_name) {
                return Err(AnnotationError::DuplicateGene {
                    gene: gene_name.to_string(),
                    first: *first,
                    second: line,
                });
            }
            genes.insert(gene_name.to_string(), (line, gene));
        }

        Ok(GeneAnnotation { genes })
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn resolve(&self, gene_name: &str) -> Result<&GeneInterval, AnnotationError> {
        self.genes
            .get(gene_name)
            .map(|(_, gene)| gene)
            .ok_or_else(|| AnnotationError::UnknownGene(gene_name.to_string()))
    }
}
