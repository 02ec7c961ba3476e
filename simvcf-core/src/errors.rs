use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Unknown reference build: {0}. Expected one of hg19, GRCh37, hg38, GRCh38")]
    UnknownBuild(String),

    #[error("Unknown annotation source: {0}. Expected GENCODE or Ensembl")]
    UnknownAnnotationSource(String),

    #[error("Unknown site policy: {0}. Expected skip or fail")]
    UnknownSitePolicy(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("Variant CSV requests genes by name but no annotation table was provided")]
    AnnotationRequired,

    #[error("Can't read config file {path}: {reason}")]
    ConfigFile { path: String, reason: String },
}

#[derive(Error, Debug)]
pub enum InputFormatError {
    #[error(
        "Variant CSV must contain either the columns 'gene' and 'number' or the columns 'chr' and 'position'. Found: {0}"
    )]
    MissingColumns(String),

    #[error("Invalid variant_type {value:?} on line {line}")]
    InvalidVariantType { line: usize, value: String },

    #[error("Invalid value {value:?} in column '{column}' on line {line}: {reason}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error(
        "Position {value} in column '{column}' on line {line} is out of range (maximum chromosome length is {max})"
    )]
    PositionOutOfRange {
        line: usize,
        column: String,
        value: u64,
        max: u64,
    },

    #[error("Can't read variant CSV: {0}")]
    FileReadError(String),

    #[error("Variant CSV contains no variant requests: {0}")]
    Empty(String),

    #[error("Can't parse CSV: {0}")]
    Csv(String),
}
