//! Residue striding.
//!
//! With stride `s`, every `(s + 1)`th residue (starting at zero) is a rep and stands for
//! the residues closest to it. A stride of zero makes every residue its own rep.

use super::res_pair::{RepIndex, ResIndex};
use std::ops::Range;

pub type Stride = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RepStrider {
    stride: Stride,
}

impl RepStrider {
    pub const fn new(stride: Stride) -> Self {
        Self { stride }
    }

    #[inline]
    pub const fn stride(&self) -> Stride {
        self.stride
    }

    #[inline]
    const fn period(&self) -> u32 {
        self.stride + 1
    }

    #[inline]
    const fn half_stride(&self) -> u32 {
        self.stride / 2
    }

    #[inline]
    pub fn is_rep(&self, index: ResIndex) -> bool {
        index % self.period() == 0
    }

    /// The rep index of `index`, if `index` is a rep.
    #[inline]
    pub fn rep_of_index(&self, index: ResIndex) -> Option<RepIndex> {
        self.is_rep(index).then(|| index / self.period())
    }

    #[inline]
    pub fn index_of_rep_index(&self, rep_index: RepIndex) -> ResIndex {
        rep_index * self.period()
    }

    pub fn num_reps_of_num_residues(&self, num_residues: usize) -> usize {
        num_residues.div_ceil(self.period() as usize)
    }

    /// The rep closest to `index` (ties go to the lower rep), clamped to the last rep.
    pub fn nearest_rep_index(&self, index: ResIndex, num_residues: usize) -> Option<RepIndex> {
        let num_reps = self.num_reps_of_num_residues(num_residues);
        let last = RepIndex::try_from(num_reps.checked_sub(1)?).ok()?;
        Some(((index + self.half_stride()) / self.period()).min(last))
    }

    /// Residue indices whose nearest rep is `rep_index`.
    ///
    /// Over all reps of a structure these ranges partition `0..num_residues`.
    pub fn neighbour_indices_of_rep(
        &self,
        rep_index: RepIndex,
        num_residues: usize,
    ) -> Range<ResIndex> {
        let num_residues = ResIndex::try_from(num_residues).unwrap_or(ResIndex::MAX);
        let num_reps = self.num_reps_of_num_residues(num_residues as usize) as RepIndex;
        if rep_index >= num_reps {
            return 0..0;
        }
        let start = (rep_index * self.period()).saturating_sub(self.half_stride());
        let end = if rep_index + 1 == num_reps {
            num_residues
        } else {
            ((rep_index + 1) * self.period() - self.half_stride()).min(num_residues)
        };
        start..end
    }
}

/// The period after which residues of two strides next coincide on a common rep.
pub fn co_stride(stride_a: Stride, stride_b: Stride) -> Stride {
    lcm(stride_a + 1, stride_b + 1) - 1
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: u32, b: u32) -> u32 {
    a / gcd(a, b) * b
}

/// Strides of the from and to residues, separately for the query and index sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanStride {
    pub query_from: Stride,
    pub query_to: Stride,
    pub index_from: Stride,
    pub index_to: Stride,
}

impl ScanStride {
    pub const fn new(query_from: Stride, query_to: Stride, index_from: Stride, index_to: Stride) -> Self {
        Self {
            query_from,
            query_to,
            index_from,
            index_to,
        }
    }

    pub fn from_co_stride(&self) -> Stride {
        co_stride(self.query_from, self.index_from)
    }

    pub fn to_co_stride(&self) -> Stride {
        co_stride(self.query_to, self.index_to)
    }

    pub fn roled(&self, role: ScanRole) -> RoledScanStride {
        RoledScanStride { role, stride: *self }
    }
}

impl Default for ScanStride {
    fn default() -> Self {
        Self::new(4, 4, 2, 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanRole {
    Query,
    Index,
}

/// A [`ScanStride`] seen from one side of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoledScanStride {
    role: ScanRole,
    stride: ScanStride,
}

impl RoledScanStride {
    pub fn role(&self) -> ScanRole {
        self.role
    }

    pub fn scan_stride(&self) -> &ScanStride {
        &self.stride
    }

    pub fn this_from_strider(&self) -> RepStrider {
        RepStrider::new(match self.role {
            ScanRole::Query => self.stride.query_from,
            ScanRole::Index => self.stride.index_from,
        })
    }

    pub fn this_to_strider(&self) -> RepStrider {
        RepStrider::new(match self.role {
            ScanRole::Query => self.stride.query_to,
            ScanRole::Index => self.stride.index_to,
        })
    }
}

/// Rep indices for a from/to pair of residue indices, or `None` unless both are reps.
pub fn get_rep_of_indices(
    strider_a: &RepStrider,
    index_a: ResIndex,
    strider_b: &RepStrider,
    index_b: ResIndex,
) -> Option<(RepIndex, RepIndex)> {
    Some((strider_a.rep_of_index(index_a)?, strider_b.rep_of_index(index_b)?))
}
