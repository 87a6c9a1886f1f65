use super::error::ScanError;
use super::metrics::BuildMetrics;
use super::policy::ScanPolicy;
use super::res_pair::MultiStrucResRepPair;
use super::store::{
    DenseLatticeStore, ScanIndexStore, SparseLatticeStore, StoreKind, make_dense_store,
    make_sparse_store,
};
use super::stride::ScanRole;
use super::structure_data::{ScanMultiStructureData, build_scan_side};
use crate::core::models::protein::Protein;
use std::time::Instant;
use tracing::{info, instrument};

#[derive(Debug)]
enum RepPairStore {
    Sparse(SparseLatticeStore<MultiStrucResRepPair>),
    Dense(DenseLatticeStore<MultiStrucResRepPair>),
}

impl RepPairStore {
    fn num_entries(&self) -> usize {
        match self {
            RepPairStore::Sparse(store) => store.num_entries(),
            RepPairStore::Dense(store) => store.num_entries(),
        }
    }

    fn approx_bytes(&self) -> usize {
        match self {
            RepPairStore::Sparse(store) => store.approx_bytes(),
            RepPairStore::Dense(store) => store.approx_bytes(),
        }
    }
}

/// The searchable side of a scan: the rep pairs of the match structures, filed in a
/// lattice store keyed by the policy's keyer.
#[derive(Debug)]
pub struct ScanIndex<'p> {
    policy: &'p ScanPolicy,
    structure_data: ScanMultiStructureData,
    store: RepPairStore,
    metrics: BuildMetrics,
}

impl<'p> ScanIndex<'p> {
    #[instrument(skip_all, name = "scan_index_build")]
    pub fn build(policy: &'p ScanPolicy, proteins: &[Protein]) -> Result<Self, ScanError> {
        let start = Instant::now();
        let (structure_data, rep_pairs) =
            build_scan_side(proteins, policy.stride().roled(ScanRole::Index))?;

        let store = match policy.store_kind() {
            StoreKind::Sparse => RepPairStore::Sparse(make_sparse_store(policy.keyer(), &rep_pairs)?),
            StoreKind::Dense => RepPairStore::Dense(make_dense_store(
                policy.keyer(),
                policy.criteria(),
                &rep_pairs,
            )?),
        };

        let metrics = BuildMetrics {
            duration: start.elapsed(),
            num_structures: structure_data.len(),
            num_entries: rep_pairs.len(),
            approx_bytes: store.approx_bytes() + structure_data.approx_bytes(),
        };
        info!(
            store = %policy.store_kind(),
            num_structures = metrics.num_structures,
            num_rep_pairs = metrics.num_entries,
            num_filed = store.num_entries(),
            seconds = metrics.duration.as_secs_f64(),
            "Built scan index."
        );

        Ok(Self {
            policy,
            structure_data,
            store,
            metrics,
        })
    }

    pub fn policy(&self) -> &'p ScanPolicy {
        self.policy
    }

    pub fn structure_data(&self) -> &ScanMultiStructureData {
        &self.structure_data
    }

    pub fn metrics(&self) -> &BuildMetrics {
        &self.metrics
    }

    /// Visits every filed rep pair that could match `query`.
    ///
    /// A sparse store is probed with each of the query's close keys; a dense store already
    /// holds every entry under its own close keys, so the query's own key suffices.
    pub fn for_each_candidate(
        &self,
        query: &MultiStrucResRepPair,
        mut visit: impl FnMut(&MultiStrucResRepPair) -> Result<(), ScanError>,
    ) -> Result<(), ScanError> {
        let keyer = self.policy.keyer();
        match &self.store {
            RepPairStore::Sparse(store) => {
                for key in keyer.make_close_keys(query, self.policy.criteria())? {
                    if store.has_matches(&key) {
                        store.find_matches(&key).iter().try_for_each(&mut visit)?;
                    }
                }
            }
            RepPairStore::Dense(store) => {
                let key = keyer.make_key(query);
                store.find_matches(&key).iter().try_for_each(&mut visit)?;
            }
        }
        Ok(())
    }
}
