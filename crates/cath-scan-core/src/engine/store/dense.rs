use super::ScanIndexStore;
use crate::engine::error::ScanError;
use crate::engine::keyer::{CellIndex, Key, MAX_KEY_ARITY};

/// Store allocating every cell of the box between a minimum and a maximum key.
///
/// Cells are laid out row-major with the last key dimension contiguous. Keys outside the
/// box have no matches.
#[derive(Debug, Clone)]
pub struct DenseLatticeStore<E> {
    min: Key,
    extents: [usize; MAX_KEY_ARITY],
    strides: [usize; MAX_KEY_ARITY],
    cells: Vec<Vec<E>>,
    num_entries: usize,
}

impl<E> DenseLatticeStore<E> {
    /// An empty store covering `min..=max` in every dimension.
    pub fn new(min: Key, max: Key) -> Result<Self, ScanError> {
        if min.arity() != max.arity() {
            return Err(ScanError::Internal(format!(
                "dense lattice bounds {min} and {max} differ in arity"
            )));
        }

        let arity = min.arity();
        let mut extents = [1; MAX_KEY_ARITY];
        for (dim, (&low, &high)) in min.cells().iter().zip(max.cells()).enumerate() {
            if high < low {
                return Err(ScanError::EmptyRange);
            }
            extents[dim] = (i64::from(high) - i64::from(low) + 1) as usize;
        }

        let mut strides = [0; MAX_KEY_ARITY];
        let mut num_cells: usize = 1;
        for dim in (0..arity).rev() {
            strides[dim] = num_cells;
            num_cells = num_cells.checked_mul(extents[dim]).ok_or_else(|| {
                ScanError::Internal(format!("dense lattice from {min} to {max} is too large"))
            })?;
        }

        let mut cells = Vec::new();
        cells.resize_with(num_cells, Vec::new);

        Ok(Self {
            min,
            extents,
            strides,
            cells,
            num_entries: 0,
        })
    }

    /// A store with no cells, for keys of the given arity. Every lookup finds nothing.
    pub fn empty(arity: usize) -> Self {
        Self {
            min: Key::from_array([0; MAX_KEY_ARITY], arity),
            extents: [0; MAX_KEY_ARITY],
            strides: [0; MAX_KEY_ARITY],
            cells: Vec::new(),
            num_entries: 0,
        }
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn approx_bytes(&self) -> usize {
        self.cells.len() * size_of::<Vec<E>>()
            + self.cells.iter().map(Vec::capacity).sum::<usize>() * size_of::<E>()
    }

    fn flat_index(&self, key: &Key) -> Option<usize> {
        if key.arity() != self.min.arity() {
            return None;
        }
        let mut index = 0;
        for (dim, (&cell, &low)) in key.cells().iter().zip(self.min.cells()).enumerate() {
            let offset = offset_within(cell, low, self.extents[dim])?;
            index += offset * self.strides[dim];
        }
        Some(index)
    }
}

fn offset_within(cell: CellIndex, low: CellIndex, extent: usize) -> Option<usize> {
    let offset = usize::try_from(i64::from(cell) - i64::from(low)).ok()?;
    (offset < extent).then_some(offset)
}

impl<E> ScanIndexStore<E> for DenseLatticeStore<E> {
    #[inline]
    fn has_matches(&self, key: &Key) -> bool {
        !self.find_matches(key).is_empty()
    }

    #[inline]
    fn find_matches(&self, key: &Key) -> &[E] {
        self.flat_index(key)
            .and_then(|index| self.cells.get(index))
            .map_or(&[], Vec::as_slice)
    }

    fn push_entry(&mut self, key: Key, entry: E) -> Result<(), ScanError> {
        let index = self.flat_index(&key).ok_or(ScanError::KeyOutOfLattice)?;
        self.cells[index].push(entry);
        self.num_entries += 1;
        Ok(())
    }

    fn num_entries(&self) -> usize {
        self.num_entries
    }
}
