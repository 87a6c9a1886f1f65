//! Residue-pair descriptors and the capabilities keyer parts read from them.
//!
//! A residue pair's geometry lives in a [`ResPairCore`]. The two wrappers add the
//! indices needed for bookkeeping: [`SingleStrucResPair`] refers to raw residue indices of
//! one structure, [`MultiStrucResRepPair`] to rep indices within one of several structures.

macro_rules! delegate_core_capabilities {
    ($ty:ty) => {
        impl $crate::engine::res_pair::HasView for $ty {
            #[inline]
            fn view(&self) -> &$crate::engine::res_pair::View {
                <$ty as $crate::engine::res_pair::CriteriaSubject>::core(self).view()
            }
        }

        impl $crate::engine::res_pair::HasTorsions for $ty {
            #[inline]
            fn from_phi(&self) -> $crate::core::utils::angle::Angle {
                <$ty as $crate::engine::res_pair::CriteriaSubject>::core(self).from_phi()
            }
            #[inline]
            fn from_psi(&self) -> $crate::core::utils::angle::Angle {
                <$ty as $crate::engine::res_pair::CriteriaSubject>::core(self).from_psi()
            }
            #[inline]
            fn to_phi(&self) -> $crate::core::utils::angle::Angle {
                <$ty as $crate::engine::res_pair::CriteriaSubject>::core(self).to_phi()
            }
            #[inline]
            fn to_psi(&self) -> $crate::core::utils::angle::Angle {
                <$ty as $crate::engine::res_pair::CriteriaSubject>::core(self).to_psi()
            }
        }
    };
}

mod multi;
mod pair_core;
mod single;

pub use pair_core::{
    ResPairCore, frame_distance_1, max_phi_angle_difference, max_psi_angle_difference,
    squared_distance,
};
pub use multi::MultiStrucResRepPair;
pub use single::SingleStrucResPair;

use crate::core::utils::angle::Angle;
use nalgebra::Vector3;

pub type View = Vector3<f32>;
pub type ResIndex = u32;
pub type RepIndex = u32;
pub type StructureIndex = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResPairDirection {
    Increase,
    Decrease,
}

impl ResPairDirection {
    /// `Increase` iff `from < to`.
    #[inline]
    pub fn of_indices(from: u32, to: u32) -> Self {
        if from < to {
            Self::Increase
        } else {
            Self::Decrease
        }
    }
}

pub trait HasView {
    fn view(&self) -> &View;
}

pub trait HasTorsions {
    fn from_phi(&self) -> Angle;
    fn from_psi(&self) -> Angle;
    fn to_phi(&self) -> Angle;
    fn to_psi(&self) -> Angle;
}

pub trait HasDirection {
    fn direction(&self) -> ResPairDirection;
}

pub trait HasIndex {
    fn index(&self) -> ResIndex;
}

/// A residue pair that can be tested against [`QuadCriteria`](crate::engine::criteria::QuadCriteria).
pub trait CriteriaSubject: HasDirection {
    fn core(&self) -> &ResPairCore;

    /// Whether the pair's from/to indices are far enough apart to be considered at all.
    fn has_index_separation(&self, minimum_index_distance: u32) -> bool;
}

#[inline]
pub fn same_direction<A: HasDirection, B: HasDirection>(a: &A, b: &B) -> bool {
    a.direction() == b.direction()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_increase_only_when_from_precedes_to() {
        assert_eq!(ResPairDirection::of_indices(3, 7), ResPairDirection::Increase);
        assert_eq!(ResPairDirection::of_indices(7, 3), ResPairDirection::Decrease);
    }
}
