//! # Keyers
//!
//! A keyer maps an entry (a residue pair or a simple location) onto a discrete cell of a
//! multi-dimensional lattice, and enumerates the cells that could hold entries within a
//! search radius of it.
//!
//! ## Architecture
//!
//! - **Keyer parts** ([`parts`]) - One lattice dimension each: a view axis, a torsion
//!   angle, the index direction, or a plain index
//! - **Composite keyer** ([`res_pair_keyer`]) - An ordered list of parts producing a
//!   [`Key`] and the lazy cross product of close keys
//!
//! Each part implements the typed [`KeyerPart`] trait for the entry and criteria types
//! that offer what it reads. The composite keyer stores parts behind the object-safe
//! [`DynKeyerPart`], which every `KeyerPart` implements.

pub mod parts;
pub mod res_pair_keyer;

use super::config::ConfigError;
use std::fmt;

pub type CellIndex = i32;

/// Close cell indices along one dimension.
pub type CloseKeyParts = Vec<CellIndex>;

pub const MAX_KEY_ARITY: usize = 8;

/// A lattice cell address with one cell index per keyer part.
///
/// Unused trailing slots are always zero so that equality and hashing only depend on the
/// used cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    arity: u8,
    cells: [CellIndex; MAX_KEY_ARITY],
}

impl Key {
    pub fn new(cells: &[CellIndex]) -> Option<Self> {
        if cells.len() > MAX_KEY_ARITY {
            return None;
        }
        let mut key = Self {
            arity: cells.len() as u8,
            cells: [0; MAX_KEY_ARITY],
        };
        key.cells[..cells.len()].copy_from_slice(cells);
        Some(key)
    }

    /// Takes the first `arity` cells of `cells` and zeroes the rest.
    pub(crate) fn from_array(mut cells: [CellIndex; MAX_KEY_ARITY], arity: usize) -> Self {
        let arity = arity.min(MAX_KEY_ARITY);
        cells[arity..].fill(0);
        Self {
            arity: arity as u8,
            cells,
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity as usize
    }

    #[inline]
    pub fn cells(&self) -> &[CellIndex] {
        &self.cells[..self.arity()]
    }

    pub(crate) fn elementwise_min(&self, other: &Key) -> Key {
        self.zip_with(other, CellIndex::min)
    }

    pub(crate) fn elementwise_max(&self, other: &Key) -> Key {
        self.zip_with(other, CellIndex::max)
    }

    fn zip_with(&self, other: &Key, op: impl Fn(CellIndex, CellIndex) -> CellIndex) -> Key {
        let mut result = *self;
        for (cell, &theirs) in result.cells[..self.arity()].iter_mut().zip(other.cells()) {
            *cell = op(*cell, theirs);
        }
        result
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, cell) in self.cells().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", cell)?;
        }
        write!(f, ")")
    }
}

/// One dimension of a lattice key over entries of type `E`, searched under criteria `C`.
pub trait KeyerPart<E, C> {
    type Value: Copy;
    type SearchRadius: Copy;

    fn get_name(&self) -> &'static str;

    fn get_value(&self, entry: &E) -> Self::Value;

    fn key_part(&self, value: Self::Value) -> CellIndex;

    /// Every cell index whose cell could hold a value within `radius` of `value`.
    ///
    /// Always includes `key_part(value)`.
    fn close_key_parts(
        &self,
        value: Self::Value,
        radius: Self::SearchRadius,
    ) -> Result<CloseKeyParts, ConfigError>;

    fn get_search_radius(&self, criteria: &C) -> Self::SearchRadius;
}

/// Object-safe view of a [`KeyerPart`], used by the composite keyer.
pub trait DynKeyerPart<E, C>: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn make_key_part(&self, entry: &E) -> CellIndex;

    fn make_close_key_parts(&self, entry: &E, criteria: &C) -> Result<CloseKeyParts, ConfigError>;
}

impl<E, C, P> DynKeyerPart<E, C> for P
where
    P: KeyerPart<E, C> + fmt::Debug + Send + Sync,
{
    #[inline]
    fn name(&self) -> &'static str {
        self.get_name()
    }

    #[inline]
    fn make_key_part(&self, entry: &E) -> CellIndex {
        self.key_part(self.get_value(entry))
    }

    #[inline]
    fn make_close_key_parts(&self, entry: &E, criteria: &C) -> Result<CloseKeyParts, ConfigError> {
        self.close_key_parts(self.get_value(entry), self.get_search_radius(criteria))
    }
}
