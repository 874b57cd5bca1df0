//! Region checker configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How loan sets from several predecessors are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// A loan is in scope if it reaches along some path
    #[default]
    Union,
    /// A loan is in scope only if it reaches along every path
    Intersection,
}

/// Tunables of the analysis, loadable from a `coral.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionckConfig {
    /// Merge policy for in-scope loans at join points
    pub join_policy: JoinPolicy,

    /// A shallow write to a path ends loans of paths built on it
    pub kill_loans_on_overwrite: bool,

    /// `'static` contains every CFG node
    pub static_covers_all_points: bool,
}

impl Default for RegionckConfig {
    fn default() -> Self {
        Self {
            join_policy: JoinPolicy::Union,
            kill_loans_on_overwrite: true,
            static_covers_all_points: true,
        }
    }
}

impl RegionckConfig {
    /// Parses a configuration from TOML text; missing keys take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Failure to load a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {}", path.display())]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = RegionckConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegionckConfig::default());
        assert!(config.kill_loans_on_overwrite);
    }

    #[test]
    fn test_partial_config() {
        let config = RegionckConfig::from_toml_str(
            r#"
join_policy = "intersection"
kill_loans_on_overwrite = false
"#,
        )
        .unwrap();
        assert_eq!(config.join_policy, JoinPolicy::Intersection);
        assert!(!config.kill_loans_on_overwrite);
        assert!(config.static_covers_all_points);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let err = RegionckConfig::from_toml_str(r#"join_policy = "meet""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RegionckConfig::load(Path::new("/nonexistent/coral.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
