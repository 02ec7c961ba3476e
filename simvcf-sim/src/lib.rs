//! # Somatic variant simulation
//!
//! Places requested variants at random positions inside their intervals and
//! derives REF/ALT alleles from the reference sequence.
//!
//! ```no_run
//! use simvcf_sim::{SimulationConfig, simulate};
//!
//! let config = SimulationConfig {
//!     fasta: Some("hg19.fa.gz".into()),
//!     variants: Some("variants.csv".into()),
//!     output: Some("simulated.vcf".into()),
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let report = simulate(&config).unwrap();
//! println!("{} records", report.records);
//! ```
pub mod alleles;
pub mod config;
pub mod consts;
pub mod errors;
pub mod pipeline;
pub mod sampler;
pub mod workflow;

pub use config::SimulationConfig;
pub use errors::{AlleleError, SamplingError, SimulationError};
pub use pipeline::{SimulationOutput, SimulationRun};
pub use workflow::{SimulationReport, simulate};
