//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default game variant and question/catalog files
//! - Question shuffling
//! - Per-variant rules (fuse budget, penalty, feedback window, win threshold)
//!
//! Configuration is stored at `~/.config/beatthebomb/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::rules::{Rules, Variant};

/// Game selection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub variant: Variant,
    #[serde(default = "default_questions_path")]
    pub questions_path: String,
    /// Empty means "play the whole question file".
    #[serde(default)]
    pub catalog_path: String,
    #[serde(default)]
    pub shuffle_questions: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/beatthebomb/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default = "Rules::classic")]
    pub classic: Rules,
    #[serde(default = "Rules::penalty")]
    pub penalty: Rules,
}

fn default_questions_path() -> String {
    "questions.json".into()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            questions_path: default_questions_path(),
            catalog_path: String::new(),
            shuffle_questions: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            classic: Rules::classic(),
            penalty: Rules::penalty(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Same as [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Rules for a variant, as configured.
    pub fn rules(&self, variant: Variant) -> Rules {
        match variant {
            Variant::Classic => self.classic.clone(),
            Variant::Penalty => self.penalty.clone(),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::WinThreshold;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let parsed: Config = toml::from_str("[game]\nvariant = \"penalty\"\n").unwrap();
        assert_eq!(parsed.game.variant, Variant::Penalty);
        assert_eq!(parsed.game.questions_path, "questions.json");
        assert_eq!(parsed.penalty, Rules::penalty());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("game.variant").as_deref(), Some("classic"));
        assert_eq!(cfg.get("classic.points_per_correct").as_deref(), Some("10"));
        assert_eq!(cfg.get("penalty.wrong_answer_penalty_secs").as_deref(), Some("3.0"));
        assert!(cfg.get("game.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("classic.fuse_budget_secs", "30").unwrap();
        assert_eq!(cfg.classic.fuse_budget_secs, 30.0);
        cfg.set("penalty.wrong_answer_penalty_secs", "2.5").unwrap();
        assert_eq!(cfg.penalty.wrong_answer_penalty_secs, 2.5);
    }

    #[test]
    fn set_updates_variant_and_bool() {
        let mut cfg = Config::default();
        cfg.set("game.variant", "penalty").unwrap();
        cfg.set("game.shuffle_questions", "true").unwrap();
        assert_eq!(cfg.game.variant, Variant::Penalty);
        assert!(cfg.game.shuffle_questions);
    }

    #[test]
    fn set_accepts_json_for_tables() {
        let mut cfg = Config::default();
        cfg.set("classic.win_threshold", r#"{"kind":"flat","points":50}"#)
            .unwrap();
        assert_eq!(cfg.classic.win_threshold, WinThreshold::Flat { points: 50 });
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("game.nonexistent_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "value"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("game.shuffle_questions", "not_a_bool").is_err());
        assert!(cfg.set("game.variant", "hardcore").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn rules_follow_variant() {
        let cfg = Config::default();
        assert_eq!(cfg.rules(Variant::Classic), Rules::classic());
        assert_eq!(cfg.rules(Variant::Penalty), Rules::penalty());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("game.questions_path", "/tmp/qs.json").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.game.questions_path, "/tmp/qs.json");
    }

    #[test]
    fn load_from_rejects_broken_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "game = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
