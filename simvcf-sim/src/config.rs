use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use simvcf_core::errors::ConfigurationError;
use simvcf_core::models::{AnnotationSource, ReferenceBuild, SitePolicy};

///
/// Everything a simulation run needs. Can be read from YAML, with the same
/// keys as the command line flags (`annotation_source`, `on_invalid_site`).
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub build: ReferenceBuild,
    pub annotation_source: AnnotationSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fasta: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub on_invalid_site: SitePolicy,
    /// Date for the `##fileDate` header line; today when unset.
    #[serde(skip)]
    pub file_date: Option<NaiveDate>,
}

impl SimulationConfig {
    /// Relative paths are taken relative to `base_dir`.
    fn resolve_config_path(path: &Path, base_dir: &Path) -> PathBuf {
        if path.is_absolute() || path.as_os_str().is_empty() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    ///
    /// Read a YAML config file. Paths inside it are resolved against the
    /// directory containing the file.
    ///
    pub fn from_yaml(path: &Path) -> Result<Self, ConfigurationError> {
        let config_error = |reason: String| ConfigurationError::ConfigFile {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let mut config: Self =
            serde_yaml::from_str(&content).map_err(|e| config_error(e.to_string()))?;

        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        for slot in [
            &mut config.fasta,
            &mut config.variants,
            &mut config.annotation,
            &mut config.output,
        ] {
            if let Some(p) = slot.as_mut() {
                *p = Self::resolve_config_path(p, config_dir);
            }
        }

        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub(crate) fn required<'a>(
        value: &'a Option<PathBuf>,
        name: &str,
    ) -> Result<&'a Path, ConfigurationError> {
        value
            .as_deref()
            .ok_or_else(|| ConfigurationError::MissingSetting(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_from_yaml_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "build: GRCh38").unwrap();
        writeln!(file, "annotation_source: ensembl").unwrap();
        writeln!(file, "fasta: /data/hg38.fa.gz").unwrap();
        writeln!(file, "variants: inputs/variants.csv").unwrap();
        writeln!(file, "output: out.vcf").unwrap();
        writeln!(file, "seed: 42").unwrap();
        writeln!(file, "on_invalid_site: skip").unwrap();

        let config = SimulationConfig::from_yaml(&path).unwrap();
        assert_eq!(
            config,
            SimulationConfig {
                build: ReferenceBuild::GRCh38,
                annotation_source: AnnotationSource::Ensembl,
                fasta: Some(PathBuf::from("/data/hg38.fa.gz")),
                variants: Some(dir.path().join("inputs/variants.csv")),
                annotation: None,
                output: Some(dir.path().join("out.vcf")),
                seed: Some(42),
                on_invalid_site: SitePolicy::Skip,
                file_date: None,
            }
        );
    }

    #[test]
    fn test_unknown_build_in_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, "build: hg17\n").unwrap();
        let err = SimulationConfig::from_yaml(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::ConfigFile { .. }));
        assert!(err.to_string().contains("hg17"));
    }

    #[test]
    fn test_unknown_key_in_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, "refrence: hg19\n").unwrap();
        assert!(SimulationConfig::from_yaml(&path).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.build, ReferenceBuild::Hg19);
        assert_eq!(config.annotation_source, AnnotationSource::Gencode);
        assert_eq!(config.on_invalid_site, SitePolicy::Fail);
        assert!(SimulationConfig::required(&config.fasta, "fasta").is_err());
    }
}
