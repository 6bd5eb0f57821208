// src/config/app.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::SessionPolicy;

pub const ENV_CONFIG_PATH: &str = "CALIBRATION_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/calibration.toml";

fn default_log_filter() -> String {
    "calibration_scorer=info,warn".to_string()
}
fn default_enabled() -> bool {
    true
}
fn default_max_samples() -> usize {
    10_000
}
fn default_max_questions() -> usize {
    1_000
}

/// Top-level configuration. Every field has a default, so an empty file is valid.
///
/// Example TOML:
/// ```toml
/// log_filter = "calibration_scorer=debug"
///
/// [session]
/// questions_per_session = 3
/// require_full_session = true
///
/// [community]
/// enabled = true
/// max_samples_per_question = 5000
/// max_questions = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionPolicy,
    #[serde(default)]
    pub community: CommunityConfig,
    /// `EnvFilter` directive used when neither CALIBRATION_LOG nor RUST_LOG is set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionPolicy::default(),
            community: CommunityConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

/// Settings for the in-memory community average cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommunityConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Oldest samples are dropped once a question holds this many.
    #[serde(default = "default_max_samples")]
    pub max_samples_per_question: usize,
    /// Distinct questions kept; the one first seen longest ago is evicted.
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_samples_per_question: default_max_samples(),
            max_questions: default_max_questions(),
        }
    }
}

impl AppConfig {
    /// Reject values that would make a session or the cache unusable.
    /// Collects every problem, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.session.questions_per_session == 0 {
            errors.push("session.questions_per_session: must be at least 1".to_string());
        }
        if self.community.max_samples_per_question == 0 {
            errors.push("community.max_samples_per_question: must be at least 1".to_string());
        }
        if self.community.max_questions == 0 {
            errors.push("community.max_questions: must be at least 1".to_string());
        }
        if self.log_filter.trim().is_empty() {
            errors.push("log_filter: must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn parse(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(s)?;
    if let Err(errors) = cfg.validate() {
        bail!("invalid configuration: {}", errors.join("; "));
    }
    Ok(cfg)
}

/// Load configuration from an explicit TOML file.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    parse(&content).with_context(|| format!("parsing config {}", path.display()))
}

/// Load configuration using env var + fallbacks:
/// 1) $CALIBRATION_CONFIG_PATH (must exist if set)
/// 2) config/calibration.toml
/// 3) built-in defaults
pub fn load_default() -> Result<AppConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        } else {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
    }
    let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default_p.exists() {
        return load_from(&default_p);
    }
    Ok(AppConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.session.questions_per_session, 3);
        assert!(cfg.session.require_full_session);
        assert!(cfg.community.enabled);
        assert_eq!(cfg.community.max_samples_per_question, 10_000);
        assert_eq!(cfg.community.max_questions, 1_000);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let cfg = parse(
            r#"
[session]
questions_per_session = 5
"#,
        )
        .unwrap();
        assert_eq!(cfg.session.questions_per_session, 5);
        assert!(cfg.session.require_full_session);
        assert_eq!(cfg.log_filter, "calibration_scorer=info,warn");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse("log_level = \"debug\"").is_err());
        assert!(parse("[session]\nquestions = 3").is_err());
    }

    #[test]
    fn validation_collects_all_errors() {
        let mut cfg = AppConfig::default();
        cfg.session.questions_per_session = 0;
        cfg.community.max_samples_per_question = 0;
        cfg.community.max_questions = 0;
        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("questions_per_session"));
        assert!(errors[1].contains("max_samples_per_question"));
        assert!(errors[2].contains("max_questions"));
    }

    #[test]
    fn zero_session_size_fails_to_parse() {
        let err = parse("[session]\nquestions_per_session = 0").unwrap_err();
        assert!(err.to_string().contains("questions_per_session"));
    }
}
