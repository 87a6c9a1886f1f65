use super::ScanIndexStore;
use crate::engine::error::ScanError;
use crate::engine::keyer::Key;
use std::collections::HashMap;

/// Hash-backed store holding only the occupied cells.
#[derive(Debug, Clone)]
pub struct SparseLatticeStore<E> {
    cells: HashMap<Key, Vec<E>>,
    num_entries: usize,
}

impl<E> Default for SparseLatticeStore<E> {
    fn default() -> Self {
        Self {
            cells: HashMap::new(),
            num_entries: 0,
        }
    }
}

impl<E> SparseLatticeStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn approx_bytes(&self) -> usize {
        self.cells.capacity() * (size_of::<Key>() + size_of::<Vec<E>>())
            + self.cells.values().map(Vec::capacity).sum::<usize>() * size_of::<E>()
    }
}

impl<E> ScanIndexStore<E> for SparseLatticeStore<E> {
    #[inline]
    fn has_matches(&self, key: &Key) -> bool {
        self.cells.contains_key(key)
    }

    #[inline]
    fn find_matches(&self, key: &Key) -> &[E] {
        self.cells.get(key).map_or(&[], Vec::as_slice)
    }

    fn push_entry(&mut self, key: Key, entry: E) -> Result<(), ScanError> {
        self.cells.entry(key).or_default().push(entry);
        self.num_entries += 1;
        Ok(())
    }

    fn num_entries(&self) -> usize {
        self.num_entries
    }
}
