use tracing::debug;

use crate::config::Thresholds;
use crate::model::{AdmittedCandidate, FilterOutput, Rejection, RejectionCounts, SwapCandidate};

/// Check one candidate against the admissibility thresholds.
///
/// An unknown metric never satisfies a bound.
pub fn admit(
    candidate: SwapCandidate,
    thresholds: &Thresholds,
) -> Result<AdmittedCandidate, Rejection> {
    let Some(diff_pct) = candidate.diff_pct else {
        return Err(Rejection::UnknownDiffPct);
    };
    let Some(time_diff) = candidate.time_diff else {
        return Err(Rejection::UnknownTimeDiff);
    };
    if diff_pct > thresholds.margin {
        return Err(Rejection::MarginExceeded);
    }
    if time_diff.abs() > thresholds.max_time_secs {
        return Err(Rejection::TimeExceeded);
    }

    Ok(AdmittedCandidate {
        candidate,
        diff_pct,
        time_diff,
    })
}

/// Keep candidates within `margin` and `max_time_secs`, preserving input order.
pub fn filter_candidates(candidates: Vec<SwapCandidate>, thresholds: &Thresholds) -> FilterOutput {
    let mut admitted = Vec::with_capacity(candidates.len());
    let mut rejected = RejectionCounts::default();

    for candidate in candidates {
        match admit(candidate, thresholds) {
            Ok(a) => admitted.push(a),
            Err(reason) => rejected.record(reason),
        }
    }

    debug!(
        admitted = admitted.len(),
        rejected = rejected.total(),
        "filtered candidates"
    );

    FilterOutput { admitted, rejected }
}
