use crate::core::utils::angle::Angle;
use nalgebra::{Point3, UnitQuaternion};

/// Read-only geometry a residue must expose to take part in a scan.
pub trait ResidueGeometry {
    fn carbon_alpha_coord(&self) -> Point3<f64>;

    /// Rotation taking the residue's local backbone frame onto lab coordinates.
    fn frame(&self) -> UnitQuaternion<f32>;

    fn phi(&self) -> Angle;

    fn psi(&self) -> Angle;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    carbon_alpha: Point3<f64>,
    frame: UnitQuaternion<f32>,
    phi: Angle,
    psi: Angle,
}

impl Residue {
    /// Torsion given to chain-terminal residues whose φ or ψ is undefined.
    pub const DEFAULT_PHI_PSI: Angle = Angle::one_revolution();

    pub fn new(carbon_alpha: Point3<f64>, frame: UnitQuaternion<f32>, phi: Angle, psi: Angle) -> Self {
        Self {
            carbon_alpha,
            frame,
            phi: phi.shifted(),
            psi: psi.shifted(),
        }
    }
}

impl ResidueGeometry for Residue {
    #[inline]
    fn carbon_alpha_coord(&self) -> Point3<f64> {
        self.carbon_alpha
    }

    #[inline]
    fn frame(&self) -> UnitQuaternion<f32> {
        self.frame
    }

    #[inline]
    fn phi(&self) -> Angle {
        self.phi
    }

    #[inline]
    fn psi(&self) -> Angle {
        self.psi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_residue_stores_torsions_in_canonical_range() {
        let residue = Residue::new(
            Point3::new(1.0, 2.0, 3.0),
            UnitQuaternion::identity(),
            Angle::from_degrees(-60.0),
            Residue::DEFAULT_PHI_PSI,
        );
        assert!((residue.phi().degrees() - 300.0).abs() < 1e-3);
        assert_eq!(residue.psi().radians(), 0.0);
        assert_eq!(residue.carbon_alpha_coord(), Point3::new(1.0, 2.0, 3.0));
    }
}
