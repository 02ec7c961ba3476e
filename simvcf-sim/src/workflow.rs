use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info};

use simvcf_core::errors::ConfigurationError;
use simvcf_io::requests::needs_annotation;
use simvcf_io::vcf::{assemble_records, write_vcf};
use simvcf_io::{GeneAnnotation, VcfHeader, read_variant_requests, resolve_requests};
use simvcf_reference::ReferenceStore;

use crate::config::SimulationConfig;
use crate::pipeline::SimulationRun;

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub output: PathBuf,
    pub records: usize,
    pub skipped: usize,
    pub seed: u64,
}

///
/// Read the inputs named in `config`, simulate and write the VCF.
///
/// The variant table is validated before the reference is loaded, so a
/// malformed table fails fast.
///
pub fn simulate(config: &SimulationConfig) -> Result<SimulationReport> {
    let fasta = SimulationConfig::required(&config.fasta, "fasta")?;
    let variants = SimulationConfig::required(&config.variants, "variants")?;
    let output_path = SimulationConfig::required(&config.output, "output")?;

    let specs = read_variant_requests(variants)?;
    debug!("Read {} variant requests from {}", specs.len(), variants.display());

    let annotation = if needs_annotation(&specs) {
        let path = config
            .annotation
            .as_deref()
            .ok_or(ConfigurationError::AnnotationRequired)?;
        Some(GeneAnnotation::from_path(path, config.annotation_source)?)
    } else {
        if config.annotation.is_some() {
            debug!("No gene rows in the variant table, annotation not loaded");
        }
        None
    };

    let requests = resolve_requests(&specs, annotation.as_ref())?;
    let store = ReferenceStore::from_fasta(fasta)?;

    let output = SimulationRun::new(&store)
        .with_seed(config.seed)
        .with_site_policy(config.on_invalid_site)
        .run(&requests)?;

    let mut header = VcfHeader::new(config.build.reference_uri())
        .with_symbolic_alleles(output.has_symbolic_alleles());
    if let Some(date) = config.file_date {
        header = header.with_file_date(date);
    }

    let records = assemble_records(output.calls);
    write_vcf(output_path, &header, &records)
        .with_context(|| format!("Can't write VCF to {}", output_path.display()))?;

    info!(
        "Simulation finished: {} records, {} skipped, seed {}",
        records.len(),
        output.skipped,
        output.seed
    );

    Ok(SimulationReport {
        output: output_path.to_path_buf(),
        records: records.len(),
        skipped: output.skipped,
        seed: output.seed,
    })
}
