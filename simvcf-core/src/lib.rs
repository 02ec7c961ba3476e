//! Core data model for simvcf.
//!
//! Shared by every simvcf crate:
//!
//! - [`models`] - variant types, intervals, requests, allele calls and VCF records
//! - [`errors`] - configuration and input format errors
//! - [`consts`] - fixed VCF field values and coordinate limits
//! - [`utils`] - gzip-aware readers and chromosome name helpers

pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;
