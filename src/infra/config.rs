// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::RalphError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub email: EmailConfig,
}

/// Thresholds and ceilings for the generation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Score at or above which content is accepted without further iteration.
    pub publish_threshold: f32,
    /// Minimum score at which a non-published result is still kept as a draft.
    pub quality_floor: f32,
    /// Wall-clock ceiling for one run, checked at iteration boundaries.
    pub time_budget_secs: u64,
    /// Monetary ceiling for one run, in USD.
    pub cost_budget_usd: f64,
    /// Defensive backstop, independent of time and cost.
    pub max_iterations: u32,
    /// Per-call timeout for generator/evaluator requests.
    pub request_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            publish_threshold: 0.85,
            quality_floor: 0.70,
            time_budget_secs: 900,
            cost_budget_usd: 2.0,
            max_iterations: 5,
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model used for drafting content.
    pub generator: String,
    /// Model used for critique. Defaults to the generator's model.
    pub evaluator: Option<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            generator: "claude-sonnet-4-5".into(),
            evaluator: None,
        }
    }
}

impl ModelsConfig {
    pub fn evaluator_model(&self) -> &str {
        self.evaluator.as_deref().unwrap_or(&self.generator)
    }
}

/// How many unused source items a run needs before it can seed an attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub min_items: u32,
    pub max_items: u32,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            min_items: 3,
            max_items: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validate invariants that make the loop well-defined. Called once at
    /// startup; violations are fatal and never retried.
    pub fn validate(&self) -> Result<(), RalphError> {
        let e = &self.engine;
        if !(0.0..=1.0).contains(&e.publish_threshold) || !(0.0..=1.0).contains(&e.quality_floor) {
            return Err(RalphError::Config(
                "publish_threshold and quality_floor must be within [0.0, 1.0]".into(),
            ));
        }
        if e.publish_threshold <= e.quality_floor {
            return Err(RalphError::Config(format!(
                "publish_threshold ({}) must be greater than quality_floor ({})",
                e.publish_threshold, e.quality_floor
            )));
        }
        if e.time_budget_secs == 0 {
            return Err(RalphError::Config("time_budget_secs must be positive".into()));
        }
        if e.cost_budget_usd <= 0.0 {
            return Err(RalphError::Config("cost_budget_usd must be positive".into()));
        }
        if e.max_iterations == 0 {
            return Err(RalphError::Config("max_iterations must be at least 1".into()));
        }
        if self.sources.min_items == 0 {
            return Err(RalphError::Config("sources.min_items must be at least 1".into()));
        }
        if self.sources.max_items < self.sources.min_items {
            return Err(RalphError::Config(
                "sources.max_items must be >= sources.min_items".into(),
            ));
        }
        if self.email.enabled {
            for (field, value) in [
                ("smtp_host", &self.email.smtp_host),
                ("from", &self.email.from),
                ("to", &self.email.to),
            ] {
                if value.is_none() {
                    return Err(RalphError::Config(format!(
                        "email.enabled requires email.{field}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert!((c.engine.publish_threshold - 0.85).abs() < 0.001);
        assert!((c.engine.quality_floor - 0.70).abs() < 0.001);
        assert_eq!(c.engine.max_iterations, 5);
        assert!((c.engine.cost_budget_usd - 2.0).abs() < 0.001);
        assert_eq!(c.sources.min_items, 3);
        assert_eq!(c.sources.max_items, 5);
        assert!(!c.email.enabled);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.engine.max_iterations, 5);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[engine]
publish_threshold = 0.9
quality_floor = 0.6
time_budget_secs = 1200
cost_budget_usd = 5.0
max_iterations = 8
request_timeout_secs = 60

[models]
generator = "claude-opus-4-5"
evaluator = "claude-haiku-3-5"

[sources]
min_items = 2
max_items = 8

[email]
enabled = true
smtp_host = "smtp.example.com"
username = "ralph"
password = "secret"
from = "ralph@example.com"
to = "ops@example.com"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!((config.engine.publish_threshold - 0.9).abs() < 0.001);
        assert_eq!(config.engine.max_iterations, 8);
        assert_eq!(config.models.generator, "claude-opus-4-5");
        assert_eq!(config.models.evaluator_model(), "claude-haiku-3-5");
        assert_eq!(config.sources.max_items, 8);
        assert_eq!(config.email.smtp_port, 587);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_evaluator_defaults_to_generator() {
        let m = ModelsConfig::default();
        assert_eq!(m.evaluator_model(), m.generator);
    }

    #[test]
    fn test_threshold_must_exceed_floor() {
        let mut c = Config::default();
        c.engine.publish_threshold = 0.70;
        c.engine.quality_floor = 0.70;
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("greater than quality_floor"));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let mut c = Config::default();
        c.engine.publish_threshold = 1.5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_negative_cost_budget_rejected() {
        let mut c = Config::default();
        c.engine.cost_budget_usd = -1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut c = Config::default();
        c.engine.max_iterations = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_item_window_rejected_when_inverted() {
        let mut c = Config::default();
        c.sources.min_items = 6;
        c.sources.max_items = 5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_email_enabled_requires_addresses() {
        let mut c = Config::default();
        c.email.enabled = true;
        c.email.smtp_host = Some("smtp.example.com".into());
        c.email.from = Some("ralph@example.com".into());
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("email.to"));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            deserialized.engine.max_iterations,
            config.engine.max_iterations
        );
        assert!(
            (deserialized.engine.cost_budget_usd - config.engine.cost_budget_usd).abs() < 0.001
        );
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
