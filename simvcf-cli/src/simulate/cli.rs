use std::path::PathBuf;

use clap::{Command, arg, value_parser};

pub const SIMULATE_CMD: &str = "simulate";

pub fn create_simulate_cli() -> Command {
    Command::new(SIMULATE_CMD)
        .about("Place somatic variants at random positions in genes or genomic ranges and write them as VCF.")
        .arg(
            arg!(--config <config> "YAML file with any of the settings below; flags override it")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--fasta <fasta> "Reference genome FASTA, optionally gzipped")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--variants <variants> "CSV of variant requests (gene,number or chr,position)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--annotation <annotation> "CSV with seqname,start,end,gene_name; needed for gene rows")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--output <output> "Where to write the VCF (overwritten if it exists)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(--build <build> "Reference build: hg19, GRCh37, hg38 or GRCh38 [default: hg19]"))
        .arg(arg!(--"annotation-source" <source> "Annotation flavour: GENCODE or Ensembl [default: GENCODE]"))
        .arg(
            arg!(--seed <seed> "Seed for the random number generator")
                .value_parser(value_parser!(u64)),
        )
        .arg(arg!(--"on-invalid-site" <policy> "What to do with unusable reference sites: skip or fail [default: fail]"))
}
