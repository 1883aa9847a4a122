use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::MatchError;

/// Max admissible `diff_pct` (0.5%).
pub const MARGIN: f64 = 0.005;
/// Max admissible `|time_diff|`, in seconds.
pub const MAX_TIME: f64 = 3600.0;
/// `diff_pct` at or below this lands in margin tier 0.
pub const TIGHT_MARGIN: f64 = 0.001;
/// `|time_diff|` at or below this lands in time tier 0.
pub const FAST_TIME: f64 = 240.0;

pub const DEFAULT_INPUT_DIR: &str = "data/raw";
pub const DEFAULT_INPUT_PATTERN: &str = "*.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "data/output";
pub const DEFAULT_OUTPUT_FILE: &str = "filtered_cross_chain_swaps.csv";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    pub name: String,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name: "default".into(),
            thresholds: Thresholds::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Admissibility and priority-tier thresholds.
///
/// `margin` / `max_time_secs` decide whether a candidate survives the filter
/// at all. `tight_margin` / `fast_time_secs` only split admitted candidates
/// into priority tiers when several of them compete for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default = "default_max_time")]
    pub max_time_secs: f64,
    #[serde(default = "default_tight_margin")]
    pub tight_margin: f64,
    #[serde(default = "default_fast_time")]
    pub fast_time_secs: f64,
}

fn default_margin() -> f64 {
    MARGIN
}

fn default_max_time() -> f64 {
    MAX_TIME
}

fn default_tight_margin() -> f64 {
    TIGHT_MARGIN
}

fn default_fast_time() -> f64 {
    FAST_TIME
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            margin: MARGIN,
            max_time_secs: MAX_TIME,
            tight_margin: TIGHT_MARGIN,
            fast_time_secs: FAST_TIME,
        }
    }
}

// ---------------------------------------------------------------------------
// Input + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    #[serde(default = "default_input_dir")]
    pub dir: String,
    #[serde(default = "default_input_pattern")]
    pub pattern: String,
}

fn default_input_dir() -> String {
    DEFAULT_INPUT_DIR.into()
}

fn default_input_pattern() -> String {
    DEFAULT_INPUT_PATTERN.into()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            pattern: default_input_pattern(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default = "default_output_file")]
    pub file: String,
    /// Optional JSON run summary, written next to the CSV.
    #[serde(default)]
    pub summary_json: Option<String>,
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.into()
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file: default_output_file(),
            summary_json: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| MatchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.name.trim().is_empty() {
            return Err(MatchError::ConfigValidation("name must not be empty".into()));
        }

        self.thresholds.validate()?;

        glob::Pattern::new(&self.input.pattern).map_err(|e| {
            MatchError::ConfigValidation(format!(
                "input.pattern {:?} is not a valid glob: {e}",
                self.input.pattern
            ))
        })?;

        if self.output.file.trim().is_empty() {
            return Err(MatchError::ConfigValidation(
                "output.file must not be empty".into(),
            ));
        }

        Ok(())
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), MatchError> {
        let named = [
            ("margin", self.margin),
            ("max_time_secs", self.max_time_secs),
            ("tight_margin", self.tight_margin),
            ("fast_time_secs", self.fast_time_secs),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::ConfigValidation(format!(
                    "thresholds.{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        // Legal, but the tier stops separating anything the filter admits.
        if self.tight_margin > self.margin {
            warn!(
                tight_margin = self.tight_margin,
                margin = self.margin,
                "tight_margin exceeds margin; every admitted candidate is in margin tier 0"
            );
        }
        if self.fast_time_secs > self.max_time_secs {
            warn!(
                fast_time_secs = self.fast_time_secs,
                max_time_secs = self.max_time_secs,
                "fast_time_secs exceeds max_time_secs; every admitted candidate is in time tier 0"
            );
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
