use super::ScanOutcome;
use crate::core::models::protein::Protein;
use crate::engine::action::RecordScoresScanAction;
use crate::engine::cancel::CancellationToken;
use crate::engine::error::ScanError;
use crate::engine::index::ScanIndex;
use crate::engine::metrics::ScanMetrics;
use crate::engine::policy::{ScanPolicy, make_default_scan_policy};
use crate::engine::progress::ProgressReporter;
use crate::engine::query_set::ScanQuerySet;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Scans every query structure against every match structure with the default policy.
#[instrument(skip_all, name = "all_vs_all_workflow")]
pub fn run(
    queries: &[Protein],
    matches: &[Protein],
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ScanOutcome, ScanError> {
    let policy = make_default_scan_policy()?;
    run_with_policy(&policy, queries, matches, reporter, cancel)
}

/// As [`run`], but with a caller-supplied policy.
#[instrument(skip_all, name = "scan_workflow", fields(num_queries = queries.len(), num_matches = matches.len()))]
pub fn run_with_policy(
    policy: &ScanPolicy,
    queries: &[Protein],
    matches: &[Protein],
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ScanOutcome, ScanError> {
    if queries.is_empty() || matches.is_empty() {
        warn!("Nothing to compare: one side of the scan has no structures.");
    }
    info!(
        store = %policy.store_kind(),
        stride = ?policy.stride(),
        "Starting scan workflow."
    );

    // === Phase 1: Index the match structures ===
    let index = reporter.phase("Indexing", || ScanIndex::build(policy, matches))?;
    cancel.check()?;

    // === Phase 2: Build the query set ===
    let query_set = reporter.phase("Building query set", || ScanQuerySet::build(policy, queries))?;
    cancel.check()?;

    // === Phase 3: Scan ===
    let start = Instant::now();
    let action = reporter.phase("Scanning", || {
        query_set.scan(
            &index,
            RecordScoresScanAction::for_proteins(queries, matches),
            reporter,
            cancel,
        )
    })?;

    // === Phase 4: Collect metrics ===
    let metrics = ScanMetrics {
        query_build: *query_set.metrics(),
        index_build: *index.metrics(),
        scan_duration: start.elapsed(),
        num_matches: action.total_matches() as u64,
    };
    info!(%metrics, "Scan workflow finished.");

    Ok((action, metrics))
}
