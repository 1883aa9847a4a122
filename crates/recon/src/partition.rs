use std::collections::HashMap;

use tracing::debug;

use crate::model::{AdmittedCandidate, Partition};

/// Occurrences of each identifier across both slots of every candidate.
pub fn identifier_counts(candidates: &[AdmittedCandidate]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(candidates.len() * 2);
    for c in candidates {
        *counts.entry(c.tx1()).or_insert(0) += 1;
        *counts.entry(c.tx2()).or_insert(0) += 1;
    }
    counts
}

/// Split admitted candidates into those whose identifiers are unique across
/// the whole set (auto-accepted) and those sharing at least one identifier.
///
/// Both halves keep input order. A candidate with `tx1 == tx2` counts its
/// identifier twice and so always lands in the contended half.
pub fn partition_conflicts(admitted: Vec<AdmittedCandidate>) -> Partition {
    let (contended_flags, contended_identifiers) = {
        let counts = identifier_counts(&admitted);
        let is_contended = |id: &str| counts.get(id).copied().unwrap_or(0) > 1;
        let flags: Vec<bool> = admitted
            .iter()
            .map(|c| is_contended(c.tx1()) || is_contended(c.tx2()))
            .collect();
        let shared = counts.values().filter(|&&n| n > 1).count();
        (flags, shared)
    };

    let mut uncontended = Vec::new();
    let mut contended = Vec::new();
    for (candidate, is_contended) in admitted.into_iter().zip(contended_flags) {
        if is_contended {
            contended.push(candidate);
        } else {
            uncontended.push(candidate);
        }
    }

    debug!(
        uncontended = uncontended.len(),
        contended = contended.len(),
        contended_identifiers,
        "partitioned candidates"
    );

    Partition {
        uncontended,
        contended,
        contended_identifiers,
    }
}
