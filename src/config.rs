//! Runtime configuration for the policy binary.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! environment variables, each layer overriding the previous one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Names a TOML file to read.
pub const ENV_CONFIG: &str = "POKER_POLICY_CONFIG";
/// Overrides `model_path`.
pub const ENV_MODEL: &str = "POKER_POLICY_MODEL";
/// Overrides `seed`.
pub const ENV_SEED: &str = "POKER_POLICY_SEED";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Parameter document to load. Without one the engine stays in fallback.
    pub model_path: Option<PathBuf>,
    /// Seed for the fallback strategy's randomness.
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { model_path: None, seed: None, log_level: "info".into() }
    }
}

impl PolicyConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: PolicyConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolve from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var_os(ENV_CONFIG).map(PathBuf::from);
        Self::load_with(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve from an optional file and an environment lookup.
    pub fn load_with<F>(file: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match file {
            Some(path) => Self::from_toml_str(&fs::read_to_string(path)?)?,
            None => PolicyConfig::default(),
        };
        if let Some(model) = env(ENV_MODEL).filter(|v| !v.is_empty()) {
            cfg.model_path = Some(PathBuf::from(model));
        }
        if let Some(seed) = env(ENV_SEED).filter(|v| !v.is_empty()) {
            let seed = seed
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_SEED} must be an integer, got {seed:?}")))?;
            cfg.seed = Some(seed);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!("unknown log_level {:?}", self.log_level)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let cfg = PolicyConfig::load_with(None, env_of(&[])).unwrap();
        assert_eq!(cfg, PolicyConfig::default());
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn file_values_are_read() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "model_path = \"weights/model.json\"\nseed = 42\nlog_level = \"debug\"").unwrap();
        let cfg = PolicyConfig::load_with(Some(f.path()), env_of(&[])).unwrap();
        assert_eq!(cfg.model_path, Some(PathBuf::from("weights/model.json")));
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn env_overrides_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "model_path = \"a.json\"\nseed = 1").unwrap();
        let env = env_of(&[(ENV_MODEL, "b.json"), (ENV_SEED, "9")]);
        let cfg = PolicyConfig::load_with(Some(f.path()), env).unwrap();
        assert_eq!(cfg.model_path, Some(PathBuf::from("b.json")));
        assert_eq!(cfg.seed, Some(9));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let cfg = PolicyConfig::load_with(None, env_of(&[(ENV_SEED, "")])).unwrap();
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn bad_seed_is_rejected() {
        let err = PolicyConfig::load_with(None, env_of(&[(ENV_SEED, "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        assert!(matches!(
            PolicyConfig::from_toml_str("log_level = \"loud\""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn file_layer_is_validated() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "log_level = \"chatty\"").unwrap();
        let err = PolicyConfig::load_with(Some(f.path()), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unparsable_file_is_rejected() {
        assert!(matches!(PolicyConfig::from_toml_str("seed = ["), Err(ConfigError::Parse(_))));
    }
}
