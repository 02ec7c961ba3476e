use std::fmt::{self, Display};

use super::interval::Interval;
use super::variant_type::VariantType;

///
/// A gene's location as found in the annotation table.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneInterval {
    pub gene_name: String,
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl GeneInterval {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

///
/// Where a row of the variant CSV asks variants to be placed, before
/// gene names have been resolved against the annotation.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// Draw `count` variants anywhere inside the named gene.
    Gene { name: String },
    /// Place a single variant exactly at `position`.
    Site { chrom: String, position: u64 },
    /// Draw `count` variants inside `interval`.
    Range { chrom: String, interval: Interval },
}

///
/// One normalized row of the variant CSV. All defaults have already been
/// applied, so every field is final.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Line of the CSV file the row came from (the header is line 1).
    pub line: usize,
    pub target: RequestTarget,
    pub variant_type: VariantType,
    pub count: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOrigin {
    Gene(String),
    Site,
    SiteRange,
}

///
/// A fully resolved request: a chromosome, an interval and what to draw in it.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRequest {
    pub chrom: String,
    pub interval: Interval,
    pub variant_type: VariantType,
    pub count: u32,
    pub length: u32,
    pub origin: RequestOrigin,
}

impl VariantRequest {
    pub fn new(
        chrom: String,
        interval: Interval,
        variant_type: VariantType,
        count: u32,
        length: u32,
        origin: RequestOrigin,
    ) -> Self {
        Self {
            chrom,
            interval,
            variant_type,
            count,
            length,
            origin,
        }
    }

    ///
    /// A request for exactly one variant at a fixed position.
    ///
    pub fn pinned(chrom: String, position: u64, variant_type: VariantType, length: u32) -> Self {
        Self::new(
            chrom,
            Interval::single(position),
            variant_type,
            1,
            length,
            RequestOrigin::Site,
        )
    }

    pub fn is_pinned(&self) -> bool {
        self.origin == RequestOrigin::Site
    }
}

impl Display for VariantRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let RequestOrigin::Gene(name) = &self.origin {
            write!(f, "{} ", name)?;
        }
        write!(
            f,
            "{}:{} {}x{}",
            self.chrom, self.interval, self.count, self.variant_type
        )?;
        if self.variant_type.is_span() {
            write!(f, " (length {})", self.length)?;
        }
        Ok(())
    }
}
