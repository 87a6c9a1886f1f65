use super::{CriteriaSubject, HasDirection, RepIndex, ResPairCore, ResPairDirection, StructureIndex};
use crate::engine::error::ScanError;

/// A residue pair between two rep residues of one of several scanned structures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiStrucResRepPair {
    core: ResPairCore,
    structure_index: StructureIndex,
    from_res_rep_index: RepIndex,
    to_res_rep_index: RepIndex,
}

impl MultiStrucResRepPair {
    pub fn new(
        core: ResPairCore,
        structure_index: StructureIndex,
        from_res_rep_index: RepIndex,
        to_res_rep_index: RepIndex,
    ) -> Result<Self, ScanError> {
        if from_res_rep_index == to_res_rep_index {
            return Err(ScanError::SameRepIndices {
                structure_index,
                rep_index: from_res_rep_index,
            });
        }
        Ok(Self {
            core,
            structure_index,
            from_res_rep_index,
            to_res_rep_index,
        })
    }

    pub fn structure_index(&self) -> StructureIndex {
        self.structure_index
    }

    pub fn from_res_rep_index(&self) -> RepIndex {
        self.from_res_rep_index
    }

    pub fn to_res_rep_index(&self) -> RepIndex {
        self.to_res_rep_index
    }
}

impl HasDirection for MultiStrucResRepPair {
    #[inline]
    fn direction(&self) -> ResPairDirection {
        ResPairDirection::of_indices(self.from_res_rep_index, self.to_res_rep_index)
    }
}

impl CriteriaSubject for MultiStrucResRepPair {
    #[inline]
    fn core(&self) -> &ResPairCore {
        &self.core
    }

    /// Rep indices live in strided space, so only their distinctness is checked here.
    #[inline]
    fn has_index_separation(&self, _minimum_index_distance: u32) -> bool {
        self.from_res_rep_index != self.to_res_rep_index
    }
}

delegate_core_capabilities!(MultiStrucResRepPair);
