use super::action::ScanAction;
use super::cancel::CancellationToken;
use super::criteria::{QuadCriteria, ViewCriteria};
use super::error::ScanError;
use super::index::ScanIndex;
use super::metrics::BuildMetrics;
use super::policy::ScanPolicy;
use super::progress::{Progress, ProgressReporter};
use super::res_pair::{
    CriteriaSubject, MultiStrucResRepPair, SingleStrucResPair, StructureIndex, squared_distance,
};
use super::stride::ScanRole;
use super::structure_data::{ScanMultiStructureData, build_scan_side};
use crate::core::models::protein::Protein;
use itertools::iproduct;
use std::time::Instant;
use tracing::{info, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The query side of a scan: rep pairs of the query structures, each looked up in an index.
#[derive(Debug)]
pub struct ScanQuerySet<'p> {
    policy: &'p ScanPolicy,
    structure_data: ScanMultiStructureData,
    rep_pairs: Vec<MultiStrucResRepPair>,
    metrics: BuildMetrics,
}

impl<'p> ScanQuerySet<'p> {
    #[instrument(skip_all, name = "scan_query_set_build")]
    pub fn build(policy: &'p ScanPolicy, proteins: &[Protein]) -> Result<Self, ScanError> {
        let start = Instant::now();
        let (structure_data, rep_pairs) =
            build_scan_side(proteins, policy.stride().roled(ScanRole::Query))?;

        let metrics = BuildMetrics {
            duration: start.elapsed(),
            num_structures: structure_data.len(),
            num_entries: rep_pairs.len(),
            approx_bytes: rep_pairs.capacity() * size_of::<MultiStrucResRepPair>()
                + structure_data.approx_bytes(),
        };
        info!(
            num_structures = metrics.num_structures,
            num_rep_pairs = metrics.num_entries,
            seconds = metrics.duration.as_secs_f64(),
            "Built scan query set."
        );

        Ok(Self {
            policy,
            structure_data,
            rep_pairs,
            metrics,
        })
    }

    pub fn policy(&self) -> &'p ScanPolicy {
        self.policy
    }

    pub fn structure_data(&self) -> &ScanMultiStructureData {
        &self.structure_data
    }

    pub fn rep_pairs(&self) -> &[MultiStrucResRepPair] {
        &self.rep_pairs
    }

    pub fn metrics(&self) -> &BuildMetrics {
        &self.metrics
    }

    /// Looks every query rep pair up in `index` and passes each accepted single-pair match
    /// to `action`.
    ///
    /// The query set and the index must have been built from the same policy object.
    /// Cancellation is checked before each query rep pair.
    #[instrument(skip_all, name = "scan")]
    pub fn scan<A: ScanAction>(
        &self,
        index: &ScanIndex<'_>,
        action: A,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<A, ScanError> {
        if !std::ptr::eq(self.policy, index.policy()) {
            return Err(ScanError::PolicyMismatch);
        }
        cancel.check()?;

        info!(
            num_query_rep_pairs = self.rep_pairs.len(),
            num_index_rep_pairs = index.metrics().num_entries,
            "Scanning query set against index."
        );
        reporter.report(Progress::TaskStart {
            total_steps: self.rep_pairs.len() as u64,
        });

        let scan_one = |acc: &mut A, query: &MultiStrucResRepPair| -> Result<(), ScanError> {
            cancel.check()?;
            self.scan_rep_pair(index, query, acc)?;
            reporter.advance(1);
            Ok(())
        };

        #[cfg(not(feature = "parallel"))]
        let action = self.rep_pairs.iter().try_fold(action, |mut acc, query| {
            scan_one(&mut acc, query)?;
            Ok::<A, ScanError>(acc)
        })?;

        #[cfg(feature = "parallel")]
        let action = {
            let found = self
                .rep_pairs
                .par_iter()
                .try_fold(
                    || action.split(),
                    |mut acc, query| {
                        scan_one(&mut acc, query)?;
                        Ok::<A, ScanError>(acc)
                    },
                )
                .try_reduce(
                    || action.split(),
                    |mut a, b| {
                        a.merge(b);
                        Ok(a)
                    },
                )?;
            let mut action = action;
            action.merge(found);
            action
        };

        reporter.report(Progress::TaskFinish);
        Ok(action)
    }

    fn scan_rep_pair<A: ScanAction>(
        &self,
        index: &ScanIndex<'_>,
        query: &MultiStrucResRepPair,
        action: &mut A,
    ) -> Result<(), ScanError> {
        let criteria = self.policy.criteria();
        let maximum_squared_distance = criteria.maximum_squared_distance();
        let query_neighbours = self
            .structure_data
            .get(query.structure_index())
            .map(|data| data.neighbours(query.from_res_rep_index(), query.to_res_rep_index()))
            .ok_or_else(|| missing_structure("query", query.structure_index()))?;

        let mut num_matches = 0;
        index.for_each_candidate(query, |candidate| {
            // Cheap rejection before the full test; agrees with `are_met_by`'s distance check.
            if squared_distance(query.core(), candidate.core()) > maximum_squared_distance {
                return Ok(());
            }
            if !criteria.are_met_by(query, candidate) {
                return Ok(());
            }
            let match_neighbours = index
                .structure_data()
                .get(candidate.structure_index())
                .map(|data| {
                    data.neighbours(candidate.from_res_rep_index(), candidate.to_res_rep_index())
                })
                .ok_or_else(|| missing_structure("index", candidate.structure_index()))?;

            num_matches += act_on_single_matches(
                criteria,
                query_neighbours,
                match_neighbours,
                query.structure_index(),
                candidate.structure_index(),
                action,
            );
            Ok(())
        })?;

        if num_matches > 0 {
            trace!(
                structure = query.structure_index(),
                from_rep = query.from_res_rep_index(),
                to_rep = query.to_res_rep_index(),
                num_matches,
                "Query rep pair matched."
            );
        }
        Ok(())
    }
}

fn missing_structure(side: &str, structure_index: StructureIndex) -> ScanError {
    ScanError::Internal(format!("no {side} structure data for structure {structure_index}"))
}

/// Applies `action` to every cross pair of single pairs that passes `criteria`.
///
/// Each single pair must first pass [`QuadCriteria::are_not_violated_by`]; surviving cross
/// pairs must then pass [`QuadCriteria::are_met_by`]. Returns the number of matches.
pub fn act_on_single_matches<A: ScanAction>(
    criteria: &QuadCriteria,
    query_pairs: &[SingleStrucResPair],
    match_pairs: &[SingleStrucResPair],
    query_structure_index: StructureIndex,
    match_structure_index: StructureIndex,
    action: &mut A,
) -> u64 {
    let valid_queries = query_pairs
        .iter()
        .filter(|pair| criteria.are_not_violated_by(*pair));
    let valid_matches = match_pairs
        .iter()
        .filter(|pair| criteria.are_not_violated_by(*pair));

    let mut num_matches = 0;
    for (query, matched) in iproduct!(valid_queries, valid_matches) {
        if criteria.are_met_by(query, matched) {
            action.act(query, matched, query_structure_index, match_structure_index);
            num_matches += 1;
        }
    }
    num_matches
}
