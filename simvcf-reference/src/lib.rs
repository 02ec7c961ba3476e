//! # In-memory reference genome for simvcf
//!
//! Loads a FASTA file (plain or gzipped), keeps only canonical chromosomes
//! (`chr1`-`chr99`, `chrX`, `chrY`, with or without the `chr` prefix) and
//! serves 1-based base lookups to the sampler and allele synthesizer.

pub mod errors;
pub mod fasta;
pub mod store;

pub use errors::{ReferenceLoadError, ReferenceLookupError};
pub use store::ReferenceStore;
