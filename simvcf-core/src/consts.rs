pub const PKG_NAME: &str = "simvcf";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of chr1 in hg19, the largest human chromosome.
pub const MAX_CHROMOSOME_LENGTH: u64 = 249_250_621;

pub const DEFAULT_VARIANT_LENGTH: u32 = 1;

pub const VCF_FILEFORMAT: &str = "VCFv4.1";
pub const DEFAULT_QUAL: u32 = 40;
pub const DEFAULT_FILTER: &str = "PASS";
pub const DEFAULT_INFO: &str = "simulated";
pub const REFERENCE_URI_PREFIX: &str = "file:///seq/references/";

pub const DNA_BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
