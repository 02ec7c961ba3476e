use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::REFERENCE_URI_PREFIX;
use crate::errors::ConfigurationError;
use crate::utils::has_chr_prefix;

///
/// Reference genome build the FASTA was taken from.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReferenceBuild {
    #[default]
    Hg19,
    GRCh37,
    Hg38,
    GRCh38,
}

impl ReferenceBuild {
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceBuild::Hg19 => "hg19",
            ReferenceBuild::GRCh37 => "GRCh37",
            ReferenceBuild::Hg38 => "hg38",
            ReferenceBuild::GRCh38 => "GRCh38",
        }
    }

    /// Placeholder URI written to the `##reference` header line.
    pub fn reference_uri(&self) -> String {
        format!("{}{}.fa", REFERENCE_URI_PREFIX, self.name())
    }
}

impl FromStr for ReferenceBuild {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hg19" => Ok(ReferenceBuild::Hg19),
            "grch37" => Ok(ReferenceBuild::GRCh37),
            "hg38" => Ok(ReferenceBuild::Hg38),
            "grch38" => Ok(ReferenceBuild::GRCh38),
            _ => Err(ConfigurationError::UnknownBuild(s.to_string())),
        }
    }
}

impl TryFrom<String> for ReferenceBuild {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReferenceBuild> for String {
    fn from(value: ReferenceBuild) -> Self {
        value.name().to_string()
    }
}

impl Display for ReferenceBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

///
/// Origin of the gene annotation table. GENCODE tables name chromosomes
/// `chr1`, Ensembl tables name them `1`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnnotationSource {
    #[default]
    Gencode,
    Ensembl,
}

impl AnnotationSource {
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationSource::Gencode => "GENCODE",
            AnnotationSource::Ensembl => "Ensembl",
        }
    }

    ///
    /// Bring an annotation seqname to UCSC style (`chr` prefixed).
    ///
    pub fn normalize_seqname(&self, seqname: &str) -> String {
        let seqname = seqname.trim();
        match self {
            AnnotationSource::Gencode => seqname.to_string(),
            AnnotationSource::Ensembl => {
                if has_chr_prefix(seqname) {
                    seqname.to_string()
                } else if seqname.eq_ignore_ascii_case("MT") {
                    "chrM".to_string()
                } else {
                    format!("chr{}", seqname)
                }
            }
        }
    }
}

impl FromStr for AnnotationSource {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gencode" => Ok(AnnotationSource::Gencode),
            "ensembl" => Ok(AnnotationSource::Ensembl),
            _ => Err(ConfigurationError::UnknownAnnotationSource(s.to_string())),
        }
    }
}

impl TryFrom<String> for AnnotationSource {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnnotationSource> for String {
    fn from(value: AnnotationSource) -> Self {
        value.name().to_string()
    }
}

impl Display for AnnotationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

///
/// What to do with a site whose alleles can't be synthesized
/// (a reference base outside ACGTN, or an inversion of a palindrome).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SitePolicy {
    /// Drop the site and log a warning.
    Skip,
    /// Abort the run.
    #[default]
    Fail,
}

impl FromStr for SitePolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(SitePolicy::Skip),
            "fail" => Ok(SitePolicy::Fail),
            _ => Err(ConfigurationError::UnknownSitePolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for SitePolicy {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SitePolicy> for String {
    fn from(value: SitePolicy) -> Self {
        match value {
            SitePolicy::Skip => "skip".to_string(),
            SitePolicy::Fail => "fail".to_string(),
        }
    }
}
