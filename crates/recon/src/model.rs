use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::Thresholds;

pub const COL_TX1: &str = "tx1";
pub const COL_TX2: &str = "tx2";
pub const COL_BT1: &str = "bt1";
pub const COL_BT2: &str = "bt2";
pub const COL_RAW_DIFF_PCT_1: &str = "raw_diff_pct_1";
pub const COL_RAW_DIFF_PCT_2: &str = "raw_diff_pct_2";
pub const COL_TIME_DIFF: &str = "time_diff";
pub const COL_DIFF_PCT: &str = "diff_pct";

/// Columns every source must carry. `raw_diff_pct_2` is optional.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_TX1,
    COL_TX2,
    COL_BT1,
    COL_BT2,
    COL_RAW_DIFF_PCT_1,
    COL_TIME_DIFF,
];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single row from any source CSV, cells kept as raw text.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub source: String,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// All sources concatenated, ready for preprocessing.
#[derive(Debug, Clone, Default)]
pub struct SwapBatch {
    /// Union of source columns, in first-seen order.
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// One candidate cross-chain match after preprocessing.
///
/// Every `None` is an explicit "unknown": the cell was missing, empty, or
/// failed to parse. Unknown is never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapCandidate {
    pub tx1: String,
    pub tx2: String,
    pub bt1: Option<NaiveDateTime>,
    pub bt2: Option<NaiveDateTime>,
    pub raw_diff_pct_1: Option<f64>,
    pub raw_diff_pct_2: Option<f64>,
    pub time_diff: Option<f64>,
    pub diff_pct: Option<f64>,
    #[serde(skip)]
    pub raw_fields: HashMap<String, String>,
}

/// A candidate that passed the filter. Both metrics are known from here on.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmittedCandidate {
    pub candidate: SwapCandidate,
    pub diff_pct: f64,
    pub time_diff: f64,
}

impl AdmittedCandidate {
    pub fn tx1(&self) -> &str {
        &self.candidate.tx1
    }

    pub fn tx2(&self) -> &str {
        &self.candidate.tx2
    }
}

// ---------------------------------------------------------------------------
// Stage outputs
// ---------------------------------------------------------------------------

/// Why the filter dropped a candidate. First failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    UnknownDiffPct,
    UnknownTimeDiff,
    MarginExceeded,
    TimeExceeded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RejectionCounts {
    pub unknown_diff_pct: usize,
    pub unknown_time_diff: usize,
    pub margin_exceeded: usize,
    pub time_exceeded: usize,
}

impl RejectionCounts {
    pub fn record(&mut self, reason: Rejection) {
        match reason {
            Rejection::UnknownDiffPct => self.unknown_diff_pct += 1,
            Rejection::UnknownTimeDiff => self.unknown_time_diff += 1,
            Rejection::MarginExceeded => self.margin_exceeded += 1,
            Rejection::TimeExceeded => self.time_exceeded += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.unknown_diff_pct + self.unknown_time_diff + self.margin_exceeded + self.time_exceeded
    }
}

#[derive(Debug)]
pub struct FilterOutput {
    pub admitted: Vec<AdmittedCandidate>,
    pub rejected: RejectionCounts,
}

#[derive(Debug)]
pub struct Partition {
    pub uncontended: Vec<AdmittedCandidate>,
    pub contended: Vec<AdmittedCandidate>,
    /// Distinct identifiers seen more than once across admitted candidates.
    pub contended_identifiers: usize,
}

#[derive(Debug)]
pub struct Resolution {
    /// Winners, in selection order.
    pub accepted: Vec<AdmittedCandidate>,
    pub discarded: Vec<AdmittedCandidate>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOrigin {
    /// Neither identifier was shared with another admitted candidate.
    Uncontended,
    /// Won the greedy resolution for its identifiers.
    Resolved,
}

impl std::fmt::Display for MatchOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uncontended => write!(f, "uncontended"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalMatch {
    pub origin: MatchOrigin,
    #[serde(flatten)]
    pub candidate: SwapCandidate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub input_rows: usize,
    pub admitted: usize,
    pub rejected: usize,
    pub rejections: RejectionCounts,
    pub uncontended: usize,
    pub contended: usize,
    pub contended_identifiers: usize,
    pub resolved_accepted: usize,
    pub resolved_discarded: usize,
    pub final_matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub meta: MatchMeta,
    pub summary: MatchSummary,
    pub matches: Vec<FinalMatch>,
}
