use std::f32::consts::TAU;
use std::fmt;

/// A planar angle stored in radians.
///
/// Torsion angles and angular tolerances are both represented with this type. Most
/// consumers work with the [`shifted`](Angle::shifted) form, which is canonical in
/// `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Angle(f32);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub const fn from_radians(radians: f32) -> Self {
        Self(radians)
    }

    pub fn from_degrees(degrees: f32) -> Self {
        Self(degrees.to_radians())
    }

    pub const fn one_revolution() -> Self {
        Self(TAU)
    }

    #[inline]
    pub const fn radians(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn degrees(self) -> f32 {
        self.0.to_degrees()
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Returns the equivalent angle in `[0, 2π)`.
    #[inline]
    pub fn shifted(self) -> Self {
        let r = self.0.rem_euclid(TAU);
        // rem_euclid can round up to TAU for tiny negative inputs
        if r >= TAU { Self(0.0) } else { Self(r) }
    }

    /// The smaller of the two arcs separating `self` and `other`, in `[0, π]`.
    #[inline]
    pub fn wrapped_difference(self, other: Angle) -> Angle {
        let diff = (self.shifted().0 - other.shifted().0).abs();
        Angle(diff.min(TAU - diff))
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.degrees())
    }
}
