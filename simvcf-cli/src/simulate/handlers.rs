use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;
use log::debug;

use simvcf_sim::{SimulationConfig, simulate};

///
/// Start from the `--config` file (or defaults) and apply every flag that
/// was given on the command line.
///
pub fn build_config(matches: &ArgMatches) -> Result<SimulationConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SimulationConfig::from_yaml(path)?,
        None => SimulationConfig::default(),
    };

    for (id, slot) in [
        ("fasta", &mut config.fasta),
        ("variants", &mut config.variants),
        ("annotation", &mut config.annotation),
        ("output", &mut config.output),
    ] {
        if let Some(path) = matches.get_one::<PathBuf>(id) {
            *slot = Some(path.clone());
        }
    }

    if let Some(build) = matches.get_one::<String>("build") {
        config.build = build.parse()?;
    }
    if let Some(source) = matches.get_one::<String>("annotation-source") {
        config.annotation_source = source.parse()?;
    }
    if let Some(policy) = matches.get_one::<String>("on-invalid-site") {
        config.on_invalid_site = policy.parse()?;
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = Some(*seed);
    }

    Ok(config)
}

pub fn run_simulate(matches: &ArgMatches) -> Result<()> {
    let config = build_config(matches)?;
    if let Ok(yaml) = config.to_yaml() {
        debug!("Effective settings:\n{}", yaml);
    }
    let report = simulate(&config)?;

    println!(
        "Wrote {} variants to {} (seed {})",
        report.records,
        report.output.display(),
        report.seed
    );
    if report.skipped > 0 {
        println!("Skipped {} sites with unusable reference sequence", report.skipped);
    }

    Ok(())
}
