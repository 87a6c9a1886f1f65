//! Lattice stores mapping keys to the entries filed under them.
//!
//! A [`SparseLatticeStore`] only holds occupied cells. A [`DenseLatticeStore`] allocates
//! every cell of a bounding box up front and files each entry under all of its close keys,
//! so a query only needs to look up its own key.

mod dense;
mod sparse;

pub use dense::DenseLatticeStore;
pub use sparse::SparseLatticeStore;

use super::error::ScanError;
use super::keyer::Key;
use super::keyer::res_pair_keyer::ResPairKeyer;
use std::fmt;
use tracing::debug;

pub trait ScanIndexStore<E> {
    fn has_matches(&self, key: &Key) -> bool;

    /// Entries filed under `key`; empty if there are none.
    fn find_matches(&self, key: &Key) -> &[E];

    fn push_entry(&mut self, key: Key, entry: E) -> Result<(), ScanError>;

    /// Number of filed entries, counting an entry once per cell it was filed under.
    fn num_entries(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreKind {
    #[default]
    Sparse,
    Dense,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Sparse => write!(f, "sparse"),
            StoreKind::Dense => write!(f, "dense"),
        }
    }
}

pub fn make_sparse_store<E: Clone, C>(
    keyer: &ResPairKeyer<E, C>,
    entries: &[E],
) -> Result<SparseLatticeStore<E>, ScanError> {
    let mut store = SparseLatticeStore::new();
    for entry in entries {
        store.push_entry(keyer.make_key(entry), entry.clone())?;
    }
    debug!(
        num_cells = store.num_cells(),
        num_entries = store.num_entries(),
        "Built sparse lattice store."
    );
    Ok(store)
}

pub fn make_dense_store<E: Clone, C>(
    keyer: &ResPairKeyer<E, C>,
    criteria: &C,
    entries: &[E],
) -> Result<DenseLatticeStore<E>, ScanError> {
    let Some((first, rest)) = entries.split_first() else {
        debug!("No entries to file; built an empty dense lattice store.");
        return Ok(DenseLatticeStore::empty(keyer.arity()));
    };

    let mut min = keyer.make_min_close_key(first, criteria)?;
    let mut max = keyer.make_max_close_key(first, criteria)?;
    for entry in rest {
        min = min.elementwise_min(&keyer.make_min_close_key(entry, criteria)?);
        max = max.elementwise_max(&keyer.make_max_close_key(entry, criteria)?);
    }

    let mut store = DenseLatticeStore::new(min, max)?;
    for entry in entries {
        for key in keyer.make_close_keys(entry, criteria)? {
            store.push_entry(key, entry.clone())?;
        }
    }
    debug!(
        num_cells = store.num_cells(),
        num_entries = store.num_entries(),
        "Built dense lattice store."
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::criteria::{QuadCriteria, make_default_quad_criteria};
    use crate::engine::keyer::parts::{AxisKeyerPart, IndexDirectionKeyerPart};
    use crate::engine::res_pair::{ResPairCore, SingleStrucResPair, View};
    use crate::core::utils::angle::Angle;
    use nalgebra::UnitQuaternion;

    fn pair_at(x: f32, y: f32, from: u32, to: u32) -> SingleStrucResPair {
        let core = ResPairCore::new(
            View::new(x, y, 0.0),
            UnitQuaternion::identity(),
            Angle::ZERO,
            Angle::ZERO,
            Angle::ZERO,
            Angle::ZERO,
        );
        SingleStrucResPair::new(core, from, to)
    }

    fn planar_keyer() -> ResPairKeyer<SingleStrucResPair, QuadCriteria> {
        ResPairKeyer::builder()
            .part(IndexDirectionKeyerPart)
            .part(AxisKeyerPart::x(4.0).unwrap())
            .part(AxisKeyerPart::y(4.0).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn sparse_store_files_each_entry_under_its_own_key() {
        let keyer = planar_keyer();
        let entries = vec![pair_at(1.0, 1.0, 0, 20), pair_at(2.0, 3.0, 1, 30), pair_at(9.0, 1.0, 2, 40)];
        let store = make_sparse_store(&keyer, &entries).unwrap();

        let first_key = keyer.make_key(&entries[0]);
        assert!(store.has_matches(&first_key));
        assert_eq!(store.find_matches(&first_key).len(), 2);
        assert_eq!(store.num_entries(), 3);
        assert_eq!(store.num_cells(), 2);
    }

    #[test]
    fn dense_store_files_each_entry_under_every_close_key() {
        let keyer = planar_keyer();
        let criteria = make_default_quad_criteria();
        let entries = vec![pair_at(1.0, 1.0, 0, 20), pair_at(30.0, -12.0, 5, 40)];
        let store = make_dense_store(&keyer, &criteria, &entries).unwrap();

        for entry in &entries {
            for key in keyer.make_close_keys(entry, &criteria).unwrap() {
                assert!(store.find_matches(&key).contains(entry));
            }
        }
        let far = Key::new(&[1, 100, 100]).unwrap();
        assert!(!store.has_matches(&far));
        assert!(store.find_matches(&far).is_empty());
    }

    #[test]
    fn empty_input_gives_stores_that_find_nothing() {
        let keyer = planar_keyer();
        let criteria = make_default_quad_criteria();
        let dense = make_dense_store(&keyer, &criteria, &[]).unwrap();
        let sparse = make_sparse_store(&keyer, &[]).unwrap();

        let lookup_key = keyer.make_key(&pair_at(1.0, 1.0, 0, 20));
        assert!(dense.find_matches(&lookup_key).is_empty());
        assert!(sparse.find_matches(&lookup_key).is_empty());
        assert_eq!(dense.num_entries(), 0);
        assert_eq!(dense.num_cells(), 0);
    }

    #[test]
    fn store_kind_displays_lowercase_names() {
        assert_eq!(StoreKind::Sparse.to_string(), "sparse");
        assert_eq!(StoreKind::Dense.to_string(), "dense");
        assert_eq!(StoreKind::default(), StoreKind::Sparse);
    }
}
