use super::ScanOutcome;
use super::all_vs_all;
use crate::core::models::protein::Protein;
use crate::engine::cancel::CancellationToken;
use crate::engine::error::ScanError;
use crate::engine::policy::{ScanPolicy, make_default_scan_policy};
use crate::engine::progress::ProgressReporter;
use tracing::instrument;

/// Scans one query structure against one match structure with the default policy.
///
/// Both lists must hold exactly one protein; this is checked before anything is built.
#[instrument(skip_all, name = "single_pair_workflow")]
pub fn run(
    queries: &[Protein],
    matches: &[Protein],
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ScanOutcome, ScanError> {
    check_single_pair(queries, matches)?;
    let policy = make_default_scan_policy()?;
    all_vs_all::run_with_policy(&policy, queries, matches, reporter, cancel)
}

/// As [`run`], but with a caller-supplied policy.
pub fn run_with_policy(
    policy: &ScanPolicy,
    queries: &[Protein],
    matches: &[Protein],
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ScanOutcome, ScanError> {
    check_single_pair(queries, matches)?;
    all_vs_all::run_with_policy(policy, queries, matches, reporter, cancel)
}

fn check_single_pair(queries: &[Protein], matches: &[Protein]) -> Result<(), ScanError> {
    if queries.len() != 1 || matches.len() != 1 {
        return Err(ScanError::InvalidArgument(format!(
            "single-pair scan needs exactly one query and one match structure, got {} and {}",
            queries.len(),
            matches.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::protein::test_fixtures::helix;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn rejects_lists_that_are_not_singletons_without_reporting_progress() {
        let calls = AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|_| {
            calls.fetch_add(1, Ordering::Relaxed);
        }));
        let one = vec![helix("a", 20)];
        let two = vec![helix("a", 20), helix("b", 20)];
        let cancel = CancellationToken::new();

        for (queries, matches) in [(&one[..], &two[..]), (&two[..], &one[..]), (&[][..], &one[..])] {
            let result = run(queries, matches, &reporter, &cancel);
            assert!(matches!(result, Err(ScanError::InvalidArgument(_))));
        }
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn a_structure_scanned_against_itself_scores_matches() {
        let protein = vec![helix("h", 45)];
        let (action, metrics) = run(
            &protein,
            &protein,
            &ProgressReporter::new(),
            &CancellationToken::new(),
        )
        .unwrap();
        assert!(action.score(0, 0) > 0.0);
        assert!(action.normalised_score(0, 0) > -15.0);
        assert!(metrics.total_duration() >= metrics.scan_duration);
    }
}
