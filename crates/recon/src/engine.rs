use tracing::info;

use crate::config::MatchConfig;
use crate::evidence::{compute_summary, duplicate_identifiers};
use crate::filter::filter_candidates;
use crate::matcher::resolve_conflicts;
use crate::model::{AdmittedCandidate, FinalMatch, MatchMeta, MatchOrigin, MatchResult, SwapBatch};
use crate::partition::partition_conflicts;
use crate::preprocess::preprocess;

/// Run the full pipeline over one in-memory batch:
/// preprocess, filter, partition, resolve, assemble.
///
/// Nothing here is fatal. Bad cells become unknown metrics, which the filter
/// rejects; an empty batch yields an empty result.
pub fn run(config: &MatchConfig, batch: &SwapBatch) -> MatchResult {
    let thresholds = &config.thresholds;

    let candidates = preprocess(batch);
    let input_rows = candidates.len();

    let filtered = filter_candidates(candidates, thresholds);
    let partition = partition_conflicts(filtered.admitted);
    let resolution = resolve_conflicts(partition.contended, thresholds);

    let summary = compute_summary(
        input_rows,
        &filtered.rejected,
        &partition.uncontended,
        partition.contended_identifiers,
        &resolution,
    );

    let matches = assemble(partition.uncontended, resolution.accepted);
    debug_assert!(
        duplicate_identifiers(&matches).is_empty(),
        "final matches share an identifier"
    );

    info!(
        config = %config.name,
        input_rows = summary.input_rows,
        admitted = summary.admitted,
        uncontended = summary.uncontended,
        contended = summary.contended,
        resolved_accepted = summary.resolved_accepted,
        final_matches = summary.final_matches,
        "swap match run complete"
    );

    MatchResult {
        meta: MatchMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            thresholds: *thresholds,
        },
        summary,
        matches,
    }
}

/// Auto-accepted candidates (filter order) followed by greedy winners
/// (selection order). No transformation.
pub fn assemble(
    uncontended: Vec<AdmittedCandidate>,
    accepted: Vec<AdmittedCandidate>,
) -> Vec<FinalMatch> {
    let tag = |origin: MatchOrigin| {
        move |a: AdmittedCandidate| FinalMatch {
            origin,
            candidate: a.candidate,
        }
    };

    uncontended
        .into_iter()
        .map(tag(MatchOrigin::Uncontended))
        .chain(accepted.into_iter().map(tag(MatchOrigin::Resolved)))
        .collect()
}
