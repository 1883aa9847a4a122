//! Greedy one-to-one resolution of contended candidates.
//!
//! Candidates are ranked by a composite [`PriorityKey`] and accepted in that
//! order as long as neither identifier is already committed. This is a fast
//! approximation of weighted maximum matching: O(n log n), no backtracking,
//! no optimality guarantee.

use std::collections::HashSet;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::config::Thresholds;
use crate::model::{AdmittedCandidate, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarginTier {
    /// `diff_pct <= tight_margin`
    Tight,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeTier {
    /// `|time_diff| <= fast_time_secs`
    Fast,
    Slow,
}

/// Ranking key, compared field by field in declaration order. Smaller wins.
///
/// The final tie-break uses the *signed* `time_diff`, while the filter and the
/// time tier use its absolute value. A negative offset therefore outranks a
/// positive one of equal magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriorityKey {
    pub margin_tier: MarginTier,
    pub time_tier: TimeTier,
    pub diff_pct: OrderedFloat<f64>,
    pub time_diff: OrderedFloat<f64>,
}

impl PriorityKey {
    pub fn for_candidate(candidate: &AdmittedCandidate, thresholds: &Thresholds) -> Self {
        let margin_tier = if candidate.diff_pct <= thresholds.tight_margin {
            MarginTier::Tight
        } else {
            MarginTier::Wide
        };
        let time_tier = if candidate.time_diff.abs() <= thresholds.fast_time_secs {
            TimeTier::Fast
        } else {
            TimeTier::Slow
        };

        Self {
            margin_tier,
            time_tier,
            diff_pct: OrderedFloat(candidate.diff_pct),
            time_diff: OrderedFloat(candidate.time_diff),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub key: PriorityKey,
    pub candidate: AdmittedCandidate,
}

/// Order candidates by priority. The sort is stable: equal keys keep their
/// input order, which decides who wins an exact tie.
pub fn rank_candidates(
    candidates: Vec<AdmittedCandidate>,
    thresholds: &Thresholds,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| RankedCandidate {
            key: PriorityKey::for_candidate(&candidate, thresholds),
            candidate,
        })
        .collect();
    ranked.sort_by_key(|r| r.key);
    ranked
}

/// Resolve shared identifiers so each one appears in at most one accepted
/// candidate. Accepted candidates come back in selection order.
pub fn resolve_conflicts(contended: Vec<AdmittedCandidate>, thresholds: &Thresholds) -> Resolution {
    let ranked = rank_candidates(contended, thresholds);

    let mut committed: HashSet<String> = HashSet::with_capacity(ranked.len() * 2);
    let mut accepted = Vec::new();
    let mut discarded = Vec::new();

    for RankedCandidate { key, candidate } in ranked {
        if committed.contains(candidate.tx1()) || committed.contains(candidate.tx2()) {
            debug!(
                tx1 = candidate.tx1(),
                tx2 = candidate.tx2(),
                ?key,
                "discarded: identifier already committed"
            );
            discarded.push(candidate);
            continue;
        }
        committed.insert(candidate.tx1().to_string());
        committed.insert(candidate.tx2().to_string());
        accepted.push(candidate);
    }

    debug!(
        accepted = accepted.len(),
        discarded = discarded.len(),
        "resolved contended candidates"
    );

    Resolution {
        accepted,
        discarded,
    }
}
