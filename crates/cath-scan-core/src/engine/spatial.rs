//! A plain spatial lattice over Cα positions.
//!
//! Uses the same keyer and store machinery as the residue-pair scan, but with only the three
//! coordinate axes as key parts. Sparse and dense lattices report exactly the same pairs.

use super::config::ConfigError;
use super::criteria::ViewCriteria;
use super::error::ScanError;
use super::keyer::parts::AxisKeyerPart;
use super::keyer::res_pair_keyer::ResPairKeyer;
use super::res_pair::{HasIndex, HasView, ResIndex, View};
use super::store::{
    DenseLatticeStore, ScanIndexStore, SparseLatticeStore, make_dense_store, make_sparse_store,
};
use crate::core::models::protein::Protein;
use crate::core::models::residue::ResidueGeometry;

/// A residue's Cα position together with its index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleLocnIndex {
    view: View,
    index: ResIndex,
}

impl SimpleLocnIndex {
    pub fn new(view: View, index: ResIndex) -> Self {
        Self { view, index }
    }
}

impl HasView for SimpleLocnIndex {
    #[inline]
    fn view(&self) -> &View {
        &self.view
    }
}

impl HasIndex for SimpleLocnIndex {
    #[inline]
    fn index(&self) -> ResIndex {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleLocnCriteria {
    maximum_squared_distance: f32,
}

impl SimpleLocnCriteria {
    pub fn new(maximum_distance: f32) -> Result<Self, ConfigError> {
        if !maximum_distance.is_finite() || maximum_distance < 0.0 {
            return Err(ConfigError::InvalidCriterion {
                name: "maximum_distance".to_string(),
                value: maximum_distance.to_string(),
            });
        }
        Ok(Self {
            maximum_squared_distance: maximum_distance * maximum_distance,
        })
    }

    #[inline]
    pub fn are_met_by(&self, a: &SimpleLocnIndex, b: &SimpleLocnIndex) -> bool {
        (a.view - b.view).norm_squared() < self.maximum_squared_distance
    }
}

impl ViewCriteria for SimpleLocnCriteria {
    fn maximum_squared_distance(&self) -> f32 {
        self.maximum_squared_distance
    }
}

pub type SimpleLocnKeyer = ResPairKeyer<SimpleLocnIndex, SimpleLocnCriteria>;

pub fn make_simple_locn_keyer(cell_size: f32) -> Result<SimpleLocnKeyer, ConfigError> {
    ResPairKeyer::builder()
        .part(AxisKeyerPart::x(cell_size)?)
        .part(AxisKeyerPart::y(cell_size)?)
        .part(AxisKeyerPart::z(cell_size)?)
        .build()
}

pub fn simple_locns_of_protein(protein: &Protein) -> Vec<SimpleLocnIndex> {
    protein
        .residues()
        .iter()
        .zip(0..)
        .map(|(residue, index)| {
            SimpleLocnIndex::new(residue.carbon_alpha_coord().coords.cast::<f32>(), index)
        })
        .collect()
}

pub fn make_sparse_lattice(
    protein: &Protein,
    cell_size: f32,
) -> Result<SparseLatticeStore<SimpleLocnIndex>, ScanError> {
    let keyer = make_simple_locn_keyer(cell_size)?;
    make_sparse_store(&keyer, &simple_locns_of_protein(protein))
}

pub fn make_dense_lattice(
    protein: &Protein,
    cell_size: f32,
    max_dist: f32,
) -> Result<DenseLatticeStore<SimpleLocnIndex>, ScanError> {
    let keyer = make_simple_locn_keyer(cell_size)?;
    let criteria = SimpleLocnCriteria::new(max_dist)?;
    make_dense_store(&keyer, &criteria, &simple_locns_of_protein(protein))
}

/// Calls `on_match(data_index, match_index)` for every residue of `protein` and every
/// stored location closer than `max_dist`, searching all close cells of each residue.
pub fn scan_sparse_lattice(
    store: &SparseLatticeStore<SimpleLocnIndex>,
    protein: &Protein,
    cell_size: f32,
    max_dist: f32,
    mut on_match: impl FnMut(ResIndex, ResIndex),
) -> Result<(), ScanError> {
    let keyer = make_simple_locn_keyer(cell_size)?;
    let criteria = SimpleLocnCriteria::new(max_dist)?;
    for data in simple_locns_of_protein(protein) {
        for key in keyer.make_close_keys(&data, &criteria)? {
            if !store.has_matches(&key) {
                continue;
            }
            for stored in store.find_matches(&key) {
                if criteria.are_met_by(&data, stored) {
                    on_match(data.index(), stored.index());
                }
            }
        }
    }
    Ok(())
}

/// As [`scan_sparse_lattice`], but each residue only looks up its own cell, since a dense
/// lattice already holds every location in all of its close cells.
pub fn scan_dense_lattice(
    store: &DenseLatticeStore<SimpleLocnIndex>,
    protein: &Protein,
    cell_size: f32,
    max_dist: f32,
    mut on_match: impl FnMut(ResIndex, ResIndex),
) -> Result<(), ScanError> {
    let keyer = make_simple_locn_keyer(cell_size)?;
    let criteria = SimpleLocnCriteria::new(max_dist)?;
    for data in simple_locns_of_protein(protein) {
        for stored in store.find_matches(&keyer.make_key(&data)) {
            if criteria.are_met_by(&data, stored) {
                on_match(data.index(), stored.index());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::protein::test_fixtures::{helix, strand};
    use std::collections::BTreeSet;

    const CELL_SIZE: f32 = 10.0;
    const RADIUS: f32 = 7.0;

    fn sparse_pairs(data: &Protein, stored: &Protein) -> BTreeSet<(ResIndex, ResIndex)> {
        let store = make_sparse_lattice(stored, CELL_SIZE).unwrap();
        let mut pairs = BTreeSet::new();
        scan_sparse_lattice(&store, data, CELL_SIZE, RADIUS, |a, b| {
            pairs.insert((a, b));
        })
        .unwrap();
        pairs
    }

    fn dense_pairs(data: &Protein, stored: &Protein) -> BTreeSet<(ResIndex, ResIndex)> {
        let store = make_dense_lattice(stored, CELL_SIZE, RADIUS).unwrap();
        let mut pairs = BTreeSet::new();
        scan_dense_lattice(&store, data, CELL_SIZE, RADIUS, |a, b| {
            pairs.insert((a, b));
        })
        .unwrap();
        pairs
    }

    fn brute_force_pairs(data: &Protein, stored: &Protein) -> BTreeSet<(ResIndex, ResIndex)> {
        let criteria = SimpleLocnCriteria::new(RADIUS).unwrap();
        let stored = simple_locns_of_protein(stored);
        simple_locns_of_protein(data)
            .iter()
            .flat_map(|a| stored.iter().map(move |b| (a, b)))
            .filter(|(a, b)| criteria.are_met_by(a, b))
            .map(|(a, b)| (a.index(), b.index()))
            .collect()
    }

    #[test]
    fn sparse_and_dense_lattices_report_the_same_pairs() {
        let protein = helix("h", 40);
        let sparse = sparse_pairs(&protein, &protein);
        let dense = dense_pairs(&protein, &protein);
        assert!(!sparse.is_empty());
        assert_eq!(sparse, dense);
        assert_eq!(sparse, brute_force_pairs(&protein, &protein));
    }

    #[test]
    fn self_scan_pairs_every_residue_with_itself() {
        let protein = strand("s", 25);
        let pairs = sparse_pairs(&protein, &protein);
        for index in 0..25 {
            assert!(pairs.contains(&(index, index)));
        }
    }

    #[test]
    fn scanning_one_structure_against_another_matches_brute_force() {
        let data = strand("s", 30);
        let stored = helix("h", 30);
        assert_eq!(sparse_pairs(&data, &stored), brute_force_pairs(&data, &stored));
        assert_eq!(dense_pairs(&data, &stored), brute_force_pairs(&data, &stored));
    }

    #[test]
    fn empty_structures_give_empty_lattices() {
        let empty = Protein::new("empty", Vec::new());
        let data = helix("h", 10);
        assert!(sparse_pairs(&data, &empty).is_empty());
        assert!(dense_pairs(&data, &empty).is_empty());
        assert!(dense_pairs(&empty, &data).is_empty());
    }

    #[test]
    fn criteria_reject_negative_distances() {
        assert!(SimpleLocnCriteria::new(-1.0).is_err());
        let criteria = SimpleLocnCriteria::new(2.0).unwrap();
        assert_eq!(criteria.maximum_squared_distance(), 4.0);
    }
}
