use crate::error::{Error, Result};
use crate::fuzzy::DEFAULT_MAX_EDIT_DISTANCE;
use crate::normalizer::{Normalizer, DEFAULT_SUFFIXES};
use crate::ranking::{FieldWeights, Ranker};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration, loaded from an optional JSON file.
///
/// Every field has a default, so `{}` is a valid configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub server: ServerConfig,
}

/// Tuning knobs for indexing and ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_edit_distance: usize,
    pub suffixes: Vec<String>,
    pub default_limit: usize,
    pub field_weights: FieldWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            default_limit: 10,
            field_weights: FieldWeights::default(),
        }
    }
}

impl SearchConfig {
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::with_normalizer(Normalizer::with_suffixes(self.suffixes.iter().cloned()))
    }

    pub fn ranker(&self) -> Ranker {
        Ranker::new(self.field_weights.clone(), self.max_edit_distance)
    }

    pub fn validate(&self) -> Result<()> {
        let weights = &self.field_weights;
        for (field, weight) in [
            ("name", weights.name),
            ("description", weights.description),
            ("content", weights.content),
            ("category", weights.category),
            ("tags", weights.tags),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::Config(format!(
                    "field weight for '{field}' must be a non-negative number, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| Error::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json(&raw)?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        config.search.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search.max_edit_distance, 2);
        assert_eq!(config.search.suffixes.len(), 10);
        assert_eq!(config.server.addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_json(
            r#"{"search": {"max_edit_distance": 1, "field_weights": {"content": 0.5}}}"#,
        )
        .unwrap();

        assert_eq!(config.search.max_edit_distance, 1);
        assert_eq!(config.search.field_weights.content, 0.5);
        assert_eq!(config.search.field_weights.name, 3.0);
        assert_eq!(config.search.default_limit, 10);
    }

    #[test]
    fn test_custom_suffixes_reach_tokenizer() {
        let config = Config::from_json(r#"{"search": {"suffixes": ["s"]}}"#).unwrap();
        let tokenizer = config.search.tokenizer();
        assert_eq!(tokenizer.analyze("passwords reporting"), vec!["password", "reporting"]);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(Config::from_json("not json"), Err(Error::Config(_))));
        assert!(matches!(
            Config::from_json(r#"{"search": {"field_weights": {"name": -1.0}}}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
