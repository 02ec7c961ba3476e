use thiserror::Error;

use simvcf_core::models::{Interval, VariantRequest, VariantType};
use simvcf_reference::ReferenceLookupError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SamplingError {
    #[error(
        "Interval {interval} is too small for {count} {variant_type} variant(s) of length {length}"
    )]
    IntervalTooSmall {
        interval: Interval,
        variant_type: VariantType,
        count: u32,
        length: u32,
    },

    #[error(
        "Interval {interval} has {available} free start positions, not enough for {count} {variant_type} variant(s) spaced {length} bases apart"
    )]
    SpacingInfeasible {
        interval: Interval,
        variant_type: VariantType,
        count: u32,
        length: u32,
        available: u64,
    },

    #[error(
        "Interval {interval} has room for at most {capacity} more {variant_type} variant(s) next to earlier ones, not {count}"
    )]
    Crowded {
        interval: Interval,
        variant_type: VariantType,
        count: u32,
        capacity: u64,
    },

    #[error("Couldn't place all variants in {interval} between earlier ones after {attempts} attempts")]
    Collision { interval: Interval, attempts: usize },

    #[error("Pinned site {chrom}:{position} overlaps another variant")]
    PinnedOverlap { chrom: String, position: u64 },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AlleleError {
    #[error("Reference base {base:?} at {chrom}:{position} is not one of A, C, G, T or N")]
    InvalidBase {
        chrom: String,
        position: u64,
        base: char,
    },

    #[error("{variant_type} at {chrom}:{position} leaves the sequence unchanged ({reference})")]
    UnchangedAllele {
        chrom: String,
        position: u64,
        variant_type: VariantType,
        reference: String,
    },

    #[error(transparent)]
    Lookup(#[from] ReferenceLookupError),
}

impl AlleleError {
    /// Problems with a single site, which the site policy may skip over.
    pub fn is_site_problem(&self) -> bool {
        matches!(
            self,
            AlleleError::InvalidBase { .. } | AlleleError::UnchangedAllele { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum RequestFailure {
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Allele(#[from] AlleleError),

    #[error(transparent)]
    Lookup(#[from] ReferenceLookupError),
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Can't simulate {request}: {source}")]
    Request {
        request: VariantRequest,
        #[source]
        source: RequestFailure,
    },
}

impl SimulationError {
    pub fn request(request: &VariantRequest, source: impl Into<RequestFailure>) -> Self {
        SimulationError::Request {
            request: request.clone(),
            source: source.into(),
        }
    }
}
