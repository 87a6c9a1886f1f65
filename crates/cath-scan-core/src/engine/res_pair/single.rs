use super::{CriteriaSubject, HasDirection, ResIndex, ResPairCore, ResPairDirection};
use crate::core::models::protein::Protein;

/// A residue pair within one structure, addressed by raw residue indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleStrucResPair {
    core: ResPairCore,
    from_res_idx: ResIndex,
    to_res_idx: ResIndex,
}

impl SingleStrucResPair {
    pub const DUMMY_INDEX_VALUE: ResIndex = ResIndex::MAX;

    pub fn new(core: ResPairCore, from_res_idx: ResIndex, to_res_idx: ResIndex) -> Self {
        Self {
            core,
            from_res_idx,
            to_res_idx,
        }
    }

    /// Builds the pair from two residues of `protein`, or `None` if either index is out of range.
    pub fn from_protein(protein: &Protein, from_res_idx: ResIndex, to_res_idx: ResIndex) -> Option<Self> {
        let from = protein.residue(from_res_idx as usize)?;
        let to = protein.residue(to_res_idx as usize)?;
        Some(Self::new(ResPairCore::from_residues(from, to), from_res_idx, to_res_idx))
    }

    /// A placeholder pair whose indices are both [`Self::DUMMY_INDEX_VALUE`].
    pub fn dummy(core: ResPairCore) -> Self {
        Self::new(core, Self::DUMMY_INDEX_VALUE, Self::DUMMY_INDEX_VALUE)
    }

    pub fn is_dummy(&self) -> bool {
        self.from_res_idx == Self::DUMMY_INDEX_VALUE && self.to_res_idx == Self::DUMMY_INDEX_VALUE
    }

    pub fn from_res_idx(&self) -> ResIndex {
        self.from_res_idx
    }

    pub fn to_res_idx(&self) -> ResIndex {
        self.to_res_idx
    }
}

impl HasDirection for SingleStrucResPair {
    #[inline]
    fn direction(&self) -> ResPairDirection {
        ResPairDirection::of_indices(self.from_res_idx, self.to_res_idx)
    }
}

impl CriteriaSubject for SingleStrucResPair {
    #[inline]
    fn core(&self) -> &ResPairCore {
        &self.core
    }

    #[inline]
    fn has_index_separation(&self, minimum_index_distance: u32) -> bool {
        self.from_res_idx != self.to_res_idx
            && self.from_res_idx.abs_diff(self.to_res_idx) >= minimum_index_distance
    }
}

delegate_core_capabilities!(SingleStrucResPair);
