use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferenceLoadError {
    #[error("Can't read FASTA file: {0}")]
    FileReadError(String),

    #[error("Malformed FASTA {path}: sequence data on line {line} before any '>' header")]
    SequenceBeforeHeader { path: String, line: usize },

    #[error("No canonical chromosomes (chr1-chr99, chrX, chrY) found in {0}")]
    NoCanonicalChromosomes(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReferenceLookupError {
    #[error("Chromosome {0} is not in the reference")]
    UnknownChromosome(String),

    #[error("Position {position} is outside {chrom} (length {length})")]
    OutOfBounds {
        chrom: String,
        position: u64,
        length: u64,
    },
}
