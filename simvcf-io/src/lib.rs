//! # File formats for simvcf
//!
//! Readers for the two input tables and the VCF writer:
//!
//! - [`requests`]: the variant request CSV, normalized into request specs
//! - [`annotation`]: gene name to interval lookup
//! - [`vcf`]: header, record ordering and output
//!
pub mod annotation;
pub mod requests;
pub mod vcf;

pub use annotation::{AnnotationError, GeneAnnotation};
pub use requests::{ResolveError, read_variant_requests, resolve_requests};
pub use vcf::{VcfHeader, VcfWriter};
