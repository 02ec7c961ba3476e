use std::fmt::{self, Display};
use std::str::FromStr;

///
/// Kind of variant to simulate. `SNP` is the only point type, everything
/// else occupies a span of reference sequence.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariantType {
    Snp,
    Del,
    Ins,
    Dup,
    Inv,
    Cnv,
    DupTandem,
    DelMe,
    InsMe,
}

impl VariantType {
    pub const ALL: [VariantType; 9] = [
        VariantType::Snp,
        VariantType::Del,
        VariantType::Ins,
        VariantType::Dup,
        VariantType::Inv,
        VariantType::Cnv,
        VariantType::DupTandem,
        VariantType::DelMe,
        VariantType::InsMe,
    ];

    ///
    /// Canonical upper-case label, also used for the VCF ID column.
    ///
    pub fn label(&self) -> &'static str {
        match self {
            VariantType::Snp => "SNP",
            VariantType::Del => "DEL",
            VariantType::Ins => "INS",
            VariantType::Dup => "DUP",
            VariantType::Inv => "INV",
            VariantType::Cnv => "CNV",
            VariantType::DupTandem => "DUP:TANDEM",
            VariantType::DelMe => "DEL:ME",
            VariantType::InsMe => "INS:ME",
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, VariantType::Snp)
    }

    pub fn is_span(&self) -> bool {
        !self.is_point()
    }

    /// Types written as symbolic ALT alleles (`<CNV>`, `<DEL:ME>`, `<INS:ME>`).
    pub fn is_symbolic(&self) -> bool {
        matches!(
            self,
            VariantType::Cnv | VariantType::DelMe | VariantType::InsMe
        )
    }

    ///
    /// The VCF `SVTYPE` INFO value for symbolic alleles.
    ///
    pub fn sv_type(&self) -> Option<&'static str> {
        match self {
            VariantType::Cnv => Some("CNV"),
            VariantType::DelMe => Some("DEL"),
            VariantType::InsMe => Some("INS"),
            _ => None,
        }
    }
}

impl FromStr for VariantType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_uppercase();
        VariantType::ALL
            .iter()
            .find(|t| t.label() == label)
            .copied()
            .ok_or_else(|| format!("Unknown variant type: {}", s))
    }
}

impl Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
