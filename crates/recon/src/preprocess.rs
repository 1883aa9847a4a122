use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::model::{
    RawRow, SwapBatch, SwapCandidate, COL_BT1, COL_BT2, COL_RAW_DIFF_PCT_1, COL_RAW_DIFF_PCT_2,
    COL_TIME_DIFF, COL_TX1, COL_TX2,
};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parse a block/transaction time. Offsets are normalized to UTC; anything
/// unparseable (including empty) is unknown.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Coerce a metric cell. Empty, non-numeric and non-finite values are unknown.
pub fn parse_metric(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Pick the quality metric used for filtering and ranking.
///
/// Same block time on both legs: the smaller of the available estimates.
/// Different times: the primary estimate only.
pub fn derive_diff_pct(
    bt1: Option<NaiveDateTime>,
    bt2: Option<NaiveDateTime>,
    raw_diff_pct_1: Option<f64>,
    raw_diff_pct_2: Option<f64>,
) -> Option<f64> {
    // Two unknown times compare equal here.
    if bt1 == bt2 {
        match (raw_diff_pct_1, raw_diff_pct_2) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    } else {
        raw_diff_pct_1
    }
}

pub fn preprocess_row(row: &RawRow) -> SwapCandidate {
    let cell = |column: &str| row.get(column).unwrap_or("");

    let bt1 = parse_timestamp(cell(COL_BT1));
    let bt2 = parse_timestamp(cell(COL_BT2));
    let raw_diff_pct_1 = parse_metric(cell(COL_RAW_DIFF_PCT_1));
    let raw_diff_pct_2 = parse_metric(cell(COL_RAW_DIFF_PCT_2));
    let time_diff = parse_metric(cell(COL_TIME_DIFF));

    SwapCandidate {
        tx1: cell(COL_TX1).to_string(),
        tx2: cell(COL_TX2).to_string(),
        bt1,
        bt2,
        raw_diff_pct_1,
        raw_diff_pct_2,
        time_diff,
        diff_pct: derive_diff_pct(bt1, bt2, raw_diff_pct_1, raw_diff_pct_2),
        raw_fields: row.fields.clone(),
    }
}

/// Normalize every row. Never drops a row.
pub fn preprocess(batch: &SwapBatch) -> Vec<SwapCandidate> {
    let candidates: Vec<SwapCandidate> = batch.rows.iter().map(preprocess_row).collect();

    let unknown_diff = candidates.iter().filter(|c| c.diff_pct.is_none()).count();
    debug!(
        rows = candidates.len(),
        unknown_diff_pct = unknown_diff,
        "preprocessed candidates"
    );

    candidates
}
