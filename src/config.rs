//! Experiment configuration loaded from TOML.
//!
//! ```toml
//! ontology = "anatomy.ont"
//! queries = "queries.txt"
//! delimiter = "whitespace"
//! verify = true
//! max_verified_axioms = 12
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::completeness::MAX_VERIFIED_AXIOMS;
use crate::decoder::Delimiter;
use crate::error::ConfigError;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings of one pinpointing experiment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Ontology file, one axiom per line.
    pub ontology: PathBuf,
    /// Query file, one raw query per line.
    pub queries: PathBuf,
    /// Field separator of raw queries.
    pub delimiter: Delimiter,
    /// Check every proof against the backend's entailment (default: false).
    pub verify: bool,
    /// Skip verification above this many relevant axioms (default: 12).
    pub max_verified_axioms: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            ontology: PathBuf::new(),
            queries: PathBuf::new(),
            delimiter: Delimiter::Whitespace,
            verify: false,
            max_verified_axioms: 12,
        }
    }
}

impl ExperimentConfig {
    /// Read a TOML configuration file. Relative paths inside it are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        if let Some(base) = path.parent() {
            for file in [&mut config.ontology, &mut config.queries] {
                if file.is_relative() && !file.as_os_str().is_empty() {
                    *file = base.join(&*file);
                }
            }
        }
        tracing::debug!(path = %path.display(), ?config, "loaded experiment config");
        Ok(config)
    }

    /// Check that the configuration describes a runnable experiment.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.ontology.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                message: "`ontology` must name the ontology file".into(),
            });
        }
        if self.queries.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                message: "`queries` must name the query file".into(),
            });
        }
        if self.max_verified_axioms > MAX_VERIFIED_AXIOMS {
            return Err(ConfigError::Invalid {
                message: format!(
                    "`max_verified_axioms` is {}, but at most {MAX_VERIFIED_AXIOMS} axioms can be enumerated",
                    self.max_verified_axioms
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_keys_take_defaults() {
        let config: ExperimentConfig = toml::from_str("ontology = \"a.ont\"\nqueries = \"q.txt\"\n").unwrap();
        assert_eq!(config.delimiter, Delimiter::Whitespace);
        assert!(!config.verify);
        assert_eq!(config.max_verified_axioms, 12);
        config.validate().unwrap();
    }

    #[test]
    fn parses_char_delimiter() {
        let config: ExperimentConfig =
            toml::from_str("ontology = \"a\"\nqueries = \"b\"\ndelimiter = \",\"\nverify = true\n").unwrap();
        assert_eq!(config.delimiter, Delimiter::Char(','));
        assert!(config.verify);
    }

    #[test]
    fn rejects_bad_delimiter_and_unknown_keys() {
        assert!(toml::from_str::<ExperimentConfig>("delimiter = \"::\"\n").is_err());
        assert!(toml::from_str::<ExperimentConfig>("verbose = true\n").is_err());
    }

    #[test]
    fn validation() {
        assert!(matches!(
            ExperimentConfig::default().validate(),
            Err(ConfigError::Invalid { .. })
        ));

        let config = ExperimentConfig {
            ontology: "a".into(),
            queries: "b".into(),
            max_verified_axioms: 40,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn serializes_back_to_toml() {
        let config = ExperimentConfig {
            ontology: "a.ont".into(),
            queries: "q.txt".into(),
            delimiter: Delimiter::Char('\t'),
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("delimiter = \"tab\""));
        assert_eq!(toml::from_str::<ExperimentConfig>(&text).unwrap(), config);
    }
}
