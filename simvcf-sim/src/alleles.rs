//! REF and ALT alleles for sampled positions.

use log::warn;
use rand::Rng;
use rand::seq::IndexedRandom;

use simvcf_core::consts::DNA_BASES;
use simvcf_core::models::{AlleleCall, SampledVariant, VariantType};
use simvcf_reference::ReferenceStore;

use crate::errors::AlleleError;

///
/// Non-fatal note about how a variant type is represented, logged once per
/// request.
///
pub fn advisory(variant_type: VariantType) -> Option<&'static str> {
    match variant_type {
        VariantType::DelMe | VariantType::InsMe => Some(
            "mobile element sequence is not synthesized, a symbolic allele is written instead",
        ),
        VariantType::Dup => {
            Some("DUP is written as an insertion of the reference bases following the anchor")
        }
        _ => None,
    }
}

fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        other => other,
    }
}

fn is_reference_base(base: u8) -> bool {
    matches!(base.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'N')
}

///
/// Draw an ALT base for a SNP. The ALT differs from `reference` ignoring
/// case and follows its case. An `N` reference may become any of the four
/// bases.
///
/// Returns `None` when `reference` is not a nucleotide or `N`.
///
pub fn synthesize_snp<R: Rng + ?Sized>(reference: u8, rng: &mut R) -> Option<u8> {
    let upper = reference.to_ascii_uppercase();
    let alt = match upper {
        b'N' => *DNA_BASES.choose(rng)?,
        b'A' | b'C' | b'G' | b'T' => {
            let choices: Vec<u8> = DNA_BASES.iter().copied().filter(|b| *b != upper).collect();
            *choices.choose(rng)?
        }
        _ => return None,
    };

    Some(if reference.is_ascii_lowercase() {
        alt.to_ascii_lowercase()
    } else {
        alt
    })
}

///
/// Builds allele calls from sampled positions and the reference sequence.
///
pub struct AlleleSynthesizer<'a> {
    store: &'a ReferenceStore,
}

impl<'a> AlleleSynthesizer<'a> {
    pub fn new(store: &'a ReferenceStore) -> Self {
        AlleleSynthesizer { store }
    }

    /// Reference bases starting at the variant's anchor, checked to be nucleotides or `N`.
    fn reference_bases(&self, variant: &SampledVariant, len: u64) -> Result<&'a [u8], AlleleError> {
        let bases = self.store.span(&variant.chrom, variant.position, len)?;
        if let Some(offset) = bases.iter().position(|b| !is_reference_base(*b)) {
            return Err(AlleleError::InvalidBase {
                chrom: variant.chrom.clone(),
                position: variant.position + offset as u64,
                base: char::from(bases[offset]),
            });
        }
        Ok(bases)
    }

    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        variant: &SampledVariant,
        rng: &mut R,
    ) -> Result<AlleleCall, AlleleError> {
        let length = u64::from(variant.length);
        let call = |reference: Vec<u8>, alternate: Vec<u8>| AlleleCall {
            chrom: variant.chrom.clone(),
            position: variant.position,
            variant_type: variant.variant_type,
            reference: String::from_utf8_lossy(&reference).into_owned(),
            alternate: String::from_utf8_lossy(&alternate).into_owned(),
            sv_end: None,
            sv_len: None,
        };

        match variant.variant_type {
            VariantType::Snp => {
                let reference = self.store.base(&variant.chrom, variant.position)?;
                let alternate = synthesize_snp(reference, rng).ok_or_else(|| {
                    AlleleError::InvalidBase {
                        chrom: variant.chrom.clone(),
                        position: variant.position,
                        base: char::from(reference),
                    }
                })?;
                if reference.eq_ignore_ascii_case(&b'N') {
                    warn!(
                        "Reference base at {}:{} is N, drawing ALT from A, C, G and T",
                        variant.chrom,
                        variant.position
                    );
                }
                Ok(call(vec![reference], vec![alternate]))
            }
            VariantType::Del => {
                let bases = self.reference_bases(variant, length + 1)?;
                Ok(call(bases.to_vec(), vec![bases[0]]))
            }
            VariantType::Ins => {
                let anchor = self.reference_bases(variant, 1)?[0];
                let mut alternate = Vec::with_capacity(variant.length as usize + 1);
                alternate.push(anchor);
                alternate.extend((0..variant.length).map(|_| DNA_BASES[rng.random_range(0..4)]));
                Ok(call(vec![anchor], alternate))
            }
            VariantType::Dup | VariantType::DupTandem => {
                let bases = self.reference_bases(variant, length + 1)?;
                Ok(call(vec![bases[0]], bases.to_vec()))
            }
            VariantType::Inv => {
                let bases = self.reference_bases(variant, length + 1)?;
                let mut alternate = vec![bases[0]];
                alternate.extend(bases[1..].iter().rev().map(|b| complement(*b)));
                if alternate.eq_ignore_ascii_case(bases) {
                    return Err(AlleleError::UnchangedAllele {
                        chrom: variant.chrom.clone(),
                        position: variant.position,
                        variant_type: variant.variant_type,
                        reference: String::from_utf8_lossy(bases).into_owned(),
                    });
                }
                Ok(call(bases.to_vec(), alternate))
            }
            VariantType::Cnv | VariantType::DelMe | VariantType::InsMe => {
                let (covered, sv_end, sv_len) = match variant.variant_type {
                    VariantType::Cnv => (length + 1, variant.position + length, length as i64),
                    VariantType::DelMe => (length + 1, variant.position + length, -(length as i64)),
                    _ => (1, variant.position, length as i64),
                };
                // the whole affected region must lie on the chromosome
                let anchor = self.reference_bases(variant, covered)?[0];
                Ok(AlleleCall {
                    sv_end: Some(sv_end),
                    sv_len: Some(sv_len),
                    ..call(
                        vec![anchor],
                        format!("<{}>", variant.variant_type.label()).into_bytes(),
                    )
                })
            }
        }
    }
}
