//! Engine configuration
//!
//! Everything the engine and the match session need is passed in
//! explicitly through [`EngineConfig`]; there are no process-wide settings.
//!
//! # Example
//!
//! ```
//! use enclose::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "timeScale": 0.5, "sessionSeed": 7 }"#).unwrap();
//! assert_eq!(config.time_scale, 0.5);
//! assert_eq!(config.session_seed, Some(7));
//! assert_eq!(config.exact_endgame_threshold, 12); // default kept
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest remaining-edge count the exact solver may be asked to handle
pub const MAX_EXACT_ENDGAME_THRESHOLD: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Size of each transposition table in megabytes
    pub tt_size_mb: usize,
    /// Multiplier on the hard-tier time budgets
    pub time_scale: f64,
    /// Ceiling on iterative-deepening depth
    pub depth_cap: Option<u16>,
    /// Remaining edges at or below which the exact solver takes over
    pub exact_endgame_threshold: usize,
    /// Capture-only plies searched past the horizon
    pub capture_extension_plies: u16,
    /// Pause before the session's AI answers, for pacing
    pub thinking_delay_ms: u64,
    /// Fixed session seed; drawn at random when absent
    pub session_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tt_size_mb: 8,
            time_scale: 1.0,
            depth_cap: None,
            exact_endgame_threshold: 12,
            capture_extension_plies: 4,
            thinking_delay_ms: 600,
            session_seed: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration. Missing fields keep defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tt_size_mb == 0 {
            return Err(Error::Config("ttSizeMb must be positive".into()));
        }
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(Error::Config(format!(
                "timeScale must be a positive number, got {}",
                self.time_scale
            )));
        }
        if self.depth_cap == Some(0) {
            return Err(Error::Config("depthCap must be at least 1".into()));
        }
        if self.exact_endgame_threshold > MAX_EXACT_ENDGAME_THRESHOLD {
            return Err(Error::Config(format!(
                "exactEndgameThreshold {} exceeds {MAX_EXACT_ENDGAME_THRESHOLD}",
                self.exact_endgame_threshold
            )));
        }
        Ok(())
    }

    /// Configuration for tests and tools: no pacing delay, fixed seed.
    pub fn instant(seed: u64) -> Self {
        Self {
            thinking_delay_ms: 0,
            session_seed: Some(seed),
            ..Self::default()
        }
    }
}
