use super::error::ScanError;
use super::res_pair::{
    MultiStrucResRepPair, RepIndex, ResIndex, ResPairCore, SingleStrucResPair, StructureIndex,
};
use super::stride::{RoledScanStride, get_rep_of_indices};
use crate::core::models::protein::Protein;
use itertools::iproduct;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-structure neighbour lists: for every (from rep, to rep) pair, the single residue
/// pairs that it stands for.
#[derive(Debug, Clone)]
pub struct ScanStructureData {
    structure_index: StructureIndex,
    roled_stride: RoledScanStride,
    num_residues: usize,
    num_from_reps: usize,
    num_to_reps: usize,
    rep_sets: Vec<Vec<SingleStrucResPair>>,
}

impl ScanStructureData {
    pub fn build(
        protein: &Protein,
        structure_index: StructureIndex,
        roled_stride: RoledScanStride,
    ) -> Result<Self, ScanError> {
        let from_strider = roled_stride.this_from_strider();
        let to_strider = roled_stride.this_to_strider();
        let num_residues = protein.len();
        let num_from_reps = from_strider.num_reps_of_num_residues(num_residues);
        let num_to_reps = to_strider.num_reps_of_num_residues(num_residues);

        let rep_sets = iproduct!(0..num_from_reps as RepIndex, 0..num_to_reps as RepIndex)
            .map(|(from_rep, to_rep)| {
                iproduct!(
                    from_strider.neighbour_indices_of_rep(from_rep, num_residues),
                    to_strider.neighbour_indices_of_rep(to_rep, num_residues)
                )
                .filter(|(from, to)| from != to)
                .filter_map(|(from, to)| SingleStrucResPair::from_protein(protein, from, to))
                .collect()
            })
            .collect();

        let data = Self {
            structure_index,
            roled_stride,
            num_residues,
            num_from_reps,
            num_to_reps,
            rep_sets,
        };
        data.check_rep_set_grid()?;
        Ok(data)
    }

    fn check_rep_set_grid(&self) -> Result<(), ScanError> {
        let expected = self.num_from_reps * self.num_to_reps;
        if self.rep_sets.len() != expected {
            return Err(ScanError::RepSetSizeMismatch {
                structure_index: self.structure_index,
                expected,
                found: self.rep_sets.len(),
            });
        }
        Ok(())
    }

    pub fn structure_index(&self) -> StructureIndex {
        self.structure_index
    }

    pub fn roled_stride(&self) -> &RoledScanStride {
        &self.roled_stride
    }

    pub fn num_residues(&self) -> usize {
        self.num_residues
    }

    pub fn num_from_reps(&self) -> usize {
        self.num_from_reps
    }

    pub fn num_to_reps(&self) -> usize {
        self.num_to_reps
    }

    /// Single pairs represented by the rep pair, or an empty slice for unknown reps.
    pub fn neighbours(&self, from_rep: RepIndex, to_rep: RepIndex) -> &[SingleStrucResPair] {
        let (from_rep, to_rep) = (from_rep as usize, to_rep as usize);
        if from_rep >= self.num_from_reps || to_rep >= self.num_to_reps {
            return &[];
        }
        &self.rep_sets[from_rep * self.num_to_reps + to_rep]
    }

    /// Every rep pair of `protein` with distinct rep indices.
    pub fn rep_pairs(&self, protein: &Protein) -> Result<Vec<MultiStrucResRepPair>, ScanError> {
        let from_strider = self.roled_stride.this_from_strider();
        let to_strider = self.roled_stride.this_to_strider();
        let num_residues = ResIndex::try_from(protein.len())
            .map_err(|_| ScanError::InvalidArgument(format!("'{}' is too long", protein.name())))?;

        iproduct!(0..num_residues, 0..num_residues)
            .filter_map(|(from, to)| {
                get_rep_of_indices(&from_strider, from, &to_strider, to)
                    .filter(|(from_rep, to_rep)| from_rep != to_rep)
                    .map(|reps| (from, to, reps))
            })
            .map(|(from, to, (from_rep, to_rep))| {
                let core = match (protein.residue(from as usize), protein.residue(to as usize)) {
                    (Some(a), Some(b)) => ResPairCore::from_residues(a, b),
                    _ => {
                        return Err(ScanError::Internal(format!(
                            "rep residue {from} or {to} lies outside '{}'",
                            protein.name()
                        )));
                    }
                };
                MultiStrucResRepPair::new(core, self.structure_index, from_rep, to_rep)
            })
            .collect()
    }
}

/// Builds the structure data and rep pairs of one side of a scan.
pub(crate) fn build_scan_side(
    proteins: &[Protein],
    roled_stride: RoledScanStride,
) -> Result<(ScanMultiStructureData, Vec<MultiStrucResRepPair>), ScanError> {
    if proteins.len() > StructureIndex::MAX as usize {
        return Err(ScanError::InvalidArgument(format!(
            "cannot scan {} structures at once",
            proteins.len()
        )));
    }

    #[cfg(not(feature = "parallel"))]
    let iterator = proteins.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = proteins.par_iter().enumerate();

    let built = iterator
        .map(|(structure_index, protein)| -> Result<_, ScanError> {
            let structure_index = structure_index as StructureIndex;
            let data = ScanStructureData::build(protein, structure_index, roled_stride)?;
            let rep_pairs = data.rep_pairs(protein)?;
            Ok((data, rep_pairs))
        })
        .collect::<Result<Vec<_>, ScanError>>()?;

    let mut multi = ScanMultiStructureData::new(roled_stride);
    let mut rep_pairs = Vec::new();
    for (data, pairs) in built {
        multi.push(data)?;
        rep_pairs.extend(pairs);
    }
    Ok((multi, rep_pairs))
}

/// Structure data for one side of a scan, all built with the same roled stride.
#[derive(Debug, Clone)]
pub struct ScanMultiStructureData {
    roled_stride: RoledScanStride,
    structures: Vec<ScanStructureData>,
}

impl ScanMultiStructureData {
    pub fn new(roled_stride: RoledScanStride) -> Self {
        Self {
            roled_stride,
            structures: Vec::new(),
        }
    }

    pub fn push(&mut self, data: ScanStructureData) -> Result<(), ScanError> {
        if data.roled_stride != self.roled_stride {
            return Err(ScanError::StrideMismatch {
                expected: self.roled_stride,
                found: data.roled_stride,
            });
        }
        self.structures.push(data);
        Ok(())
    }

    pub fn roled_stride(&self) -> &RoledScanStride {
        &self.roled_stride
    }

    pub fn get(&self, structure_index: StructureIndex) -> Option<&ScanStructureData> {
        self.structures.get(structure_index as usize)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanStructureData> {
        self.structures.iter()
    }

    pub fn approx_bytes(&self) -> usize {
        self.num_single_pairs() * size_of::<SingleStrucResPair>()
            + self.structures.len() * size_of::<ScanStructureData>()
    }

    pub fn num_single_pairs(&self) -> usize {
        self.structures
            .iter()
            .flat_map(|data| &data.rep_sets)
            .map(Vec::len)
            .sum()
    }
}
