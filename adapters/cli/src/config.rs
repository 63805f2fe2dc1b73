use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use color_match_core::BonusGate;
use color_match_session::SessionPolicy;
use serde::Deserialize;

/// Optional settings read from a TOML file. Command-line flags take precedence.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    /// Seed for the target sampler; absent means a fresh seed per run.
    pub(crate) seed: Option<u64>,
    /// Directory holding the saved progress.
    pub(crate) state_dir: Option<PathBuf>,
    /// Redraws the active target whenever the difficulty changes.
    pub(crate) advance_on_difficulty_change: Option<bool>,
    /// Which submissions of a round may earn a bonus reveal.
    pub(crate) bonus_gate: Option<BonusGate>,
}

impl CliConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Session policy with unset switches left at their defaults.
    pub(crate) fn policy(&self) -> SessionPolicy {
        let defaults = SessionPolicy::default();
        SessionPolicy {
            advance_on_difficulty_change: self
                .advance_on_difficulty_change
                .unwrap_or(defaults.advance_on_difficulty_change),
            bonus_gate: self.bonus_gate.unwrap_or(defaults.bonus_gate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = CliConfig::parse("").expect("empty config parses");
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.policy(), SessionPolicy::default());
    }

    #[test]
    fn parses_every_setting() {
        let config = CliConfig::parse(
            r#"
seed = 42
state_dir = "/tmp/color-match"
advance_on_difficulty_change = false
bonus_gate = "every-submission"
"#,
        )
        .expect("config parses");

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.state_dir, Some(PathBuf::from("/tmp/color-match")));
        assert_eq!(
            config.policy(),
            SessionPolicy {
                advance_on_difficulty_change: false,
                bonus_gate: BonusGate::EverySubmission,
            }
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(CliConfig::parse("sead = 1").is_err());
    }

    #[test]
    fn rejects_unknown_bonus_gate() {
        assert!(CliConfig::parse(r#"bonus_gate = "sometimes""#).is_err());
    }
}
