use std::collections::{BTreeSet, HashSet};

use crate::model::{AdmittedCandidate, FinalMatch, MatchSummary, RejectionCounts, Resolution};

/// Compute stage-by-stage counts for one run.
pub fn compute_summary(
    input_rows: usize,
    rejections: &RejectionCounts,
    uncontended: &[AdmittedCandidate],
    contended_identifiers: usize,
    resolution: &Resolution,
) -> MatchSummary {
    let contended = resolution.accepted.len() + resolution.discarded.len();

    MatchSummary {
        input_rows,
        admitted: uncontended.len() + contended,
        rejected: rejections.total(),
        rejections: rejections.clone(),
        uncontended: uncontended.len(),
        contended,
        contended_identifiers,
        resolved_accepted: resolution.accepted.len(),
        resolved_discarded: resolution.discarded.len(),
        final_matches: uncontended.len() + resolution.accepted.len(),
    }
}

/// Identifiers that appear in more than one final match, in either role.
/// Empty for every well-formed result.
pub fn duplicate_identifiers(matches: &[FinalMatch]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(matches.len() * 2);
    let mut dups: BTreeSet<&str> = BTreeSet::new();

    for m in matches {
        let tx1 = m.candidate.tx1.as_str();
        let tx2 = m.candidate.tx2.as_str();
        if !seen.insert(tx1) {
            dups.insert(tx1);
        }
        // A self-paired match holds a single slot.
        if tx2 != tx1 && !seen.insert(tx2) {
            dups.insert(tx2);
        }
    }

    dups.into_iter().map(String::from).collect()
}
