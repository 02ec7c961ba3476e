//! Turning resolved requests into allele calls.

use std::collections::BTreeMap;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use simvcf_core::models::{AlleleCall, Interval, SampledVariant, SitePolicy, VariantRequest};
use simvcf_core::utils::compare_chromosomes;
use simvcf_reference::{ReferenceLookupError, ReferenceStore};

use crate::alleles::{AlleleSynthesizer, advisory};
use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::errors::{SamplingError, SimulationError};
use crate::sampler::{clamp_to_chromosome, sample_free_positions};

///
/// Result of a run: the allele calls in chromosome processing order, plus
/// the master seed so the run can be repeated.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationOutput {
    pub calls: Vec<AlleleCall>,
    pub seed: u64,
    pub skipped: usize,
}

impl SimulationOutput {
    pub fn has_symbolic_alleles(&self) -> bool {
        self.calls.iter().any(|call| call.is_symbolic())
    }
}

/// Requests for one chromosome with its length and sub-seed.
struct ChromosomeGroup {
    chrom: String,
    length: u64,
    requests: Vec<VariantRequest>,
    seed: u64,
}

/// Calls and skip count for a single chromosome.
struct ChromosomeOutcome {
    calls: Vec<AlleleCall>,
    skipped: usize,
}

///
/// Runs the sampler and the synthesizer over a batch of requests.
///
/// Requests are grouped by chromosome. One sub-seed per chromosome is drawn
/// from the master generator in karyotypic order before the groups are
/// processed in parallel, so the output does not depend on the number of
/// threads.
///
pub struct SimulationRun<'a> {
    store: &'a ReferenceStore,
    seed: Option<u64>,
    site_policy: SitePolicy,
    max_attempts: usize,
}

impl<'a> SimulationRun<'a> {
    pub fn new(store: &'a ReferenceStore) -> Self {
        SimulationRun {
            store,
            seed: None,
            site_policy: SitePolicy::default(),
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_site_policy(mut self, site_policy: SitePolicy) -> Self {
        self.site_policy = site_policy;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn run(&self, requests: &[VariantRequest]) -> Result<SimulationOutput, SimulationError> {
        let seed = match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!("No seed given, using seed {} (pass --seed {} to reproduce this run)", seed, seed);
                seed
            }
        };

        let mut groups = self.group_by_chromosome(requests)?;

        let mut master = StdRng::seed_from_u64(seed);
        for group in groups.iter_mut() {
            group.seed = master.random::<u64>();
        }

        let pb = ProgressBar::new(groups.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} chromosomes")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let outcomes: Vec<ChromosomeOutcome> = groups
            .par_iter()
            .map(|group| {
                let outcome = self.simulate_chromosome(group);
                pb.inc(1);
                outcome
            })
            .collect::<Result<Vec<_>, _>>()?;
        pb.finish_and_clear();

        let mut output = SimulationOutput {
            calls: Vec::new(),
            seed,
            skipped: 0,
        };
        for outcome in outcomes {
            output.calls.extend(outcome.calls);
            output.skipped += outcome.skipped;
        }

        info!(
            "Simulated {} variants from {} requests",
            output.calls.len(),
            requests.len()
        );
        if output.skipped > 0 {
            warn!("Skipped {} sites with unusable reference sequence", output.skipped);
        }

        Ok(output)
    }

    ///
    /// Match each request's chromosome to the reference and group requests,
    /// in karyotypic order of chromosome and input order within a chromosome.
    ///
    fn group_by_chromosome(
        &self,
        requests: &[VariantRequest],
    ) -> Result<Vec<ChromosomeGroup>, SimulationError> {
        let mut groups: BTreeMap<String, ChromosomeGroup> = BTreeMap::new();

        for request in requests {
            let chrom = self.store.resolve_name(&request.chrom).ok_or_else(|| {
                SimulationError::request(
                    request,
                    ReferenceLookupError::UnknownChromosome(request.chrom.clone()),
                )
            })?;

            let length = self
                .store
                .length(chrom)
                .map_err(|e| SimulationError::request(request, e))?;
            if request.interval.end > length {
                return Err(SimulationError::request(
                    request,
                    ReferenceLookupError::OutOfBounds {
                        chrom: chrom.to_string(),
                        position: request.interval.end,
                        length,
                    },
                ));
            }

            let mut resolved = request.clone();
            resolved.chrom = chrom.to_string();
            groups
                .entry(resolved.chrom.clone())
                .or_insert_with(|| ChromosomeGroup {
                    chrom: chrom.to_string(),
                    length,
                    requests: Vec::new(),
                    seed: 0,
                })
                .requests
                .push(resolved);
        }

        let mut groups: Vec<ChromosomeGroup> = groups.into_values().collect();
        groups.sort_by(|a, b| compare_chromosomes(&a.chrom, &b.chrom));
        Ok(groups)
    }

    fn simulate_chromosome(&self, group: &ChromosomeGroup) -> Result<ChromosomeOutcome, SimulationError> {
        let chrom = group.chrom.as_str();
        let requests = group.requests.as_slice();
        debug!("Simulating {} requests on {}", requests.len(), chrom);

        let mut rng = StdRng::seed_from_u64(group.seed);
        let mut occupied: Vec<Interval> = Vec::new();
        let mut placed: Vec<(&VariantRequest, Vec<SampledVariant>)> = Vec::new();

        // pinned sites claim their positions before anything is drawn
        for request in requests.iter().filter(|r| r.is_pinned()) {
            let variant = SampledVariant {
                chrom: chrom.to_string(),
                position: request.interval.start,
                variant_type: request.variant_type,
                length: request.length,
            };
            let footprint = variant.footprint();
            if occupied.iter().any(|o| o.overlaps(&footprint)) {
                return Err(SimulationError::request(
                    request,
                    SamplingError::PinnedOverlap {
                        chrom: chrom.to_string(),
                        position: variant.position,
                    },
                ));
            }
            occupied.push(footprint);
            placed.push((request, vec![variant]));
        }

        for request in requests.iter().filter(|r| !r.is_pinned()) {
            let variants = self
                .place(group, request, &occupied, &mut rng)
                .map_err(|e| SimulationError::request(request, e))?;
            occupied.extend(variants.iter().map(|v| v.footprint()));
            placed.push((request, variants));
        }

        let synthesizer = AlleleSynthesizer::new(self.store);
        let mut outcome = ChromosomeOutcome {
            calls: Vec::new(),
            skipped: 0,
        };

        for (request, variants) in placed {
            if let Some(note) = advisory(request.variant_type) {
                warn!("{}: {}", request, note);
            }
            for variant in &variants {
                match synthesizer.synthesize(variant, &mut rng) {
                    Ok(call) => outcome.calls.push(call),
                    Err(e) if e.is_site_problem() && self.site_policy == SitePolicy::Skip => {
                        warn!("Skipping site: {}", e);
                        outcome.skipped += 1;
                    }
                    Err(e) => return Err(SimulationError::request(request, e)),
                }
            }
        }

        Ok(outcome)
    }

    ///
    /// Draw positions for one request that don't overlap anything already
    /// placed on the chromosome and keep span alleles on the sequence.
    ///
    fn place(
        &self,
        group: &ChromosomeGroup,
        request: &VariantRequest,
        occupied: &[Interval],
        rng: &mut StdRng,
    ) -> Result<Vec<SampledVariant>, SamplingError> {
        let interval = clamp_to_chromosome(
            request.interval,
            request.variant_type,
            request.count,
            request.length,
            group.length,
        )?;
        let positions = sample_free_positions(
            rng,
            interval,
            request.variant_type,
            request.count,
            request.length,
            occupied,
            self.max_attempts,
        )?;

        Ok(positions
            .into_iter()
            .map(|position| SampledVariant {
                chrom: group.chrom.clone(),
                position,
                variant_type: request.variant_type,
                length: request.length,
            })
            .collect())
    }
}
