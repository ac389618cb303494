//! Simulator configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::path::PathBuf;

use tabletop::Rect;

/// Complete simulator configuration loaded from CLI overrides and environment variables
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Settings record to load; defaults are used when absent
    pub settings_path: Option<PathBuf>,
    /// Number of gesture steps to replay
    pub steps: usize,
    /// Seed for the gesture script and the table's own jitter
    pub seed: u64,
    /// Players joining the table; the first one drives the gestures
    pub players: usize,
    /// Felt bounds in pixels
    pub felt_width: f32,
    pub felt_height: f32,
    /// Print every action log entry instead of the last few
    pub full_log: bool,
}

impl SimConfig {
    /// Load configuration from environment variables
    ///
    /// CLI values win over the `TT_*` environment; anything missing or
    /// unparseable falls back to its default.
    pub fn from_env(
        settings_override: Option<PathBuf>,
        steps_override: Option<usize>,
        seed_override: Option<u64>,
    ) -> Self {
        let settings_path =
            settings_override.or_else(|| std::env::var("TT_SETTINGS").ok().map(PathBuf::from));

        let steps = steps_override.unwrap_or_else(|| parse_env_or("TT_STEPS", 500));

        let seed = seed_override
            .or_else(|| std::env::var("TT_SEED").ok().and_then(|v| v.parse().ok()))
            .unwrap_or_else(rand::random);

        SimConfig {
            settings_path,
            steps,
            seed,
            players: parse_env_or("TT_PLAYERS", 2),
            felt_width: parse_env_or("TT_FELT_WIDTH", 1280.0),
            felt_height: parse_env_or("TT_FELT_HEIGHT", 800.0),
            full_log: parse_env_or("TT_FULL_LOG", false),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::Invalid {
                var: "TT_STEPS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !(1..=tabletop::settings::MAX_SEATS).contains(&self.players) {
            return Err(ConfigError::Invalid {
                var: "TT_PLAYERS".to_string(),
                reason: format!("Must be between 1 and {}", tabletop::settings::MAX_SEATS),
            });
        }

        if !(self.felt_width > 0.0 && self.felt_height > 0.0) {
            return Err(ConfigError::Invalid {
                var: "TT_FELT_WIDTH/TT_FELT_HEIGHT".to_string(),
                reason: "Felt must have a positive area".to_string(),
            });
        }

        Ok(())
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.felt_width, self.felt_height)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
