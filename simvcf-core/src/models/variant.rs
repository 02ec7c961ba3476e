use std::fmt::{self, Display};

use super::interval::Interval;
use super::variant_type::VariantType;
use crate::consts::{DEFAULT_FILTER, DEFAULT_INFO, DEFAULT_QUAL};

///
/// A position chosen by the sampler, not yet given alleles.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledVariant {
    pub chrom: String,
    pub position: u64,
    pub variant_type: VariantType,
    pub length: u32,
}

impl SampledVariant {
    ///
    /// Reference positions touched by the variant: the anchor base plus the
    /// `length` bases after it for span variants.
    ///
    pub fn footprint(&self) -> Interval {
        if self.variant_type.is_point() {
            Interval::single(self.position)
        } else {
            Interval::new(self.position, self.position + self.length as u64)
        }
    }
}

///
/// REF and ALT for a sampled position. `sv_end` and `sv_len` are only set
/// for symbolic ALT alleles.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleCall {
    pub chrom: String,
    pub position: u64,
    pub variant_type: VariantType,
    pub reference: String,
    pub alternate: String,
    pub sv_end: Option<u64>,
    pub sv_len: Option<i64>,
}

impl AlleleCall {
    pub fn is_symbolic(&self) -> bool {
        self.alternate.starts_with('<')
    }
}

///
/// One data line of the output VCF.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfRecord {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub reference: String,
    pub alternate: String,
    pub qual: u32,
    pub filter: String,
    pub info: String,
}

impl VcfRecord {
    ///
    /// Tab separated line, without the trailing newline.
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.pos,
            self.id,
            self.reference,
            self.alternate,
            self.qual,
            self.filter,
            self.info
        )
    }
}

impl From<AlleleCall> for VcfRecord {
    fn from(call: AlleleCall) -> Self {
        let mut info = DEFAULT_INFO.to_string();
        if let (Some(sv_type), Some(end), Some(len)) =
            (call.variant_type.sv_type(), call.sv_end, call.sv_len)
        {
            info.push_str(&format!(";SVTYPE={};END={};SVLEN={}", sv_type, end, len));
        }

        VcfRecord {
            chrom: call.chrom,
            pos: call.position,
            id: call.variant_type.label().to_string(),
            reference: call.reference,
            alternate: call.alternate,
            qual: DEFAULT_QUAL,
            filter: DEFAULT_FILTER.to_string(),
            info,
        }
    }
}

impl Display for VcfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snp_record_line() {
        let call = AlleleCall {
            chrom: "chr1".to_string(),
            position: 105,
            variant_type: VariantType::Snp,
            reference: "A".to_string(),
            alternate: "G".to_string(),
            sv_end: None,
            sv_len: None,
        };
        let record = VcfRecord::from(call);
        assert_eq!(record.as_string(), "chr1\t105\tSNP\tA\tG\t40\tPASS\tsimulated");
    }

    #[test]
    fn test_symbolic_record_carries_sv_info() {
        let call = AlleleCall {
            chrom: "chr3".to_string(),
            position: 500,
            variant_type: VariantType::DelMe,
            reference: "C".to_string(),
            alternate: "<DEL:ME>".to_string(),
            sv_end: Some(800),
            sv_len: Some(-300),
        };
        assert!(call.is_symbolic());
        let record = VcfRecord::from(call);
        assert_eq!(record.id, "DEL:ME");
        assert_eq!(record.info, "simulated;SVTYPE=DEL;END=800;SVLEN=-300");
    }

    #[test]
    fn test_footprint() {
        let snp = SampledVariant {
            chrom: "chr1".to_string(),
            position: 10,
            variant_type: VariantType::Snp,
            length: 1,
        };
        let del = SampledVariant {
            variant_type: VariantType::Del,
            length: 3,
            ..snp.clone()
        };
        assert_eq!(snp.footprint(), Interval::single(10));
        assert_eq!(del.footprint(), Interval::new(10, 13));
    }
}
