use super::View;
use crate::core::models::residue::ResidueGeometry;
use crate::core::utils::angle::Angle;
use crate::core::utils::geometry::{distance_1_between_frames, rotate_into_frame};
use nalgebra::UnitQuaternion;

/// Geometry of an ordered pair of residues.
///
/// The view is the to-residue's Cα as seen from the from-residue's local frame, so two
/// cores from differently placed structures can be compared directly. The frame is the
/// rotation of the to-residue's frame relative to the from-residue's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResPairCore {
    view: View,
    frame: UnitQuaternion<f32>,
    from_phi: Angle,
    from_psi: Angle,
    to_phi: Angle,
    to_psi: Angle,
}

impl ResPairCore {
    pub fn new(
        view: View,
        frame: UnitQuaternion<f32>,
        from_phi: Angle,
        from_psi: Angle,
        to_phi: Angle,
        to_psi: Angle,
    ) -> Self {
        Self {
            view,
            frame,
            from_phi: from_phi.shifted(),
            from_psi: from_psi.shifted(),
            to_phi: to_phi.shifted(),
            to_psi: to_psi.shifted(),
        }
    }

    pub fn from_residues<R: ResidueGeometry>(from: &R, to: &R) -> Self {
        let from_frame = from.frame();
        let lab_delta = (to.carbon_alpha_coord() - from.carbon_alpha_coord()).cast::<f32>();
        Self::new(
            rotate_into_frame(&from_frame, &lab_delta),
            from_frame.inverse() * to.frame(),
            from.phi(),
            from.psi(),
            to.phi(),
            to.psi(),
        )
    }

    #[inline]
    pub fn view(&self) -> &View {
        &self.view
    }
    #[inline]
    pub fn frame(&self) -> &UnitQuaternion<f32> {
        &self.frame
    }
    #[inline]
    pub fn from_phi(&self) -> Angle {
        self.from_phi
    }
    #[inline]
    pub fn from_psi(&self) -> Angle {
        self.from_psi
    }
    #[inline]
    pub fn to_phi(&self) -> Angle {
        self.to_phi
    }
    #[inline]
    pub fn to_psi(&self) -> Angle {
        self.to_psi
    }
}

#[inline]
pub fn squared_distance(a: &ResPairCore, b: &ResPairCore) -> f32 {
    (a.view - b.view).norm_squared()
}

#[inline]
pub fn frame_distance_1(a: &ResPairCore, b: &ResPairCore) -> f32 {
    distance_1_between_frames(&a.frame, &b.frame)
}

/// The larger of the from-φ and to-φ differences, each measured the short way round.
#[inline]
pub fn max_phi_angle_difference(a: &ResPairCore, b: &ResPairCore) -> Angle {
    let from = a.from_phi.wrapped_difference(b.from_phi);
    let to = a.to_phi.wrapped_difference(b.to_phi);
    if from > to { from } else { to }
}

#[inline]
pub fn max_psi_angle_difference(a: &ResPairCore, b: &ResPairCore) -> Angle {
    let from = a.from_psi.wrapped_difference(b.from_psi);
    let to = a.to_psi.wrapped_difference(b.to_psi);
    if from > to { from } else { to }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::protein::Protein;
    use crate::core::models::protein::test_fixtures::{helix, helix_backbone, rigidly_moved};

    const TOLERANCE: f32 = 1e-3;

    fn core_with_torsions(from_phi: f32, from_psi: f32, to_phi: f32, to_psi: f32) -> ResPairCore {
        ResPairCore::new(
            View::zeros(),
            UnitQuaternion::identity(),
            Angle::from_degrees(from_phi),
            Angle::from_degrees(from_psi),
            Angle::from_degrees(to_phi),
            Angle::from_degrees(to_psi),
        )
    }

    #[test]
    fn squared_distance_compares_views() {
        let a = ResPairCore::new(
            View::new(1.0, 2.0, 3.0),
            UnitQuaternion::identity(),
            Angle::ZERO,
            Angle::ZERO,
            Angle::ZERO,
            Angle::ZERO,
        );
        let b = ResPairCore::new(
            View::new(4.0, 6.0, 3.0),
            UnitQuaternion::identity(),
            Angle::ZERO,
            Angle::ZERO,
            Angle::ZERO,
            Angle::ZERO,
        );
        assert!((squared_distance(&a, &b) - 25.0).abs() < TOLERANCE);
    }

    #[test]
    fn max_phi_angle_difference_takes_larger_of_from_and_to_with_wraparound() {
        let a = core_with_torsions(355.0, 0.0, 100.0, 0.0);
        let b = core_with_torsions(5.0, 0.0, 130.0, 0.0);
        assert!((max_phi_angle_difference(&a, &b).degrees() - 30.0).abs() < TOLERANCE);

        let c = core_with_torsions(300.0, 0.0, 100.0, 0.0);
        assert!((max_phi_angle_difference(&a, &c).degrees() - 55.0).abs() < TOLERANCE);
    }

    #[test]
    fn max_psi_angle_difference_ignores_phi() {
        let a = core_with_torsions(0.0, 10.0, 180.0, 350.0);
        let b = core_with_torsions(90.0, 20.0, 0.0, 20.0);
        assert!((max_psi_angle_difference(&a, &b).degrees() - 30.0).abs() < TOLERANCE);
    }

    #[test]
    fn from_residues_is_invariant_under_rigid_motion() {
        let original = helix("a", 12);
        let moved = Protein::from_backbone("b", &rigidly_moved(&helix_backbone(12))).unwrap();

        let core_a = ResPairCore::from_residues(original.residue(1).unwrap(), original.residue(9).unwrap());
        let core_b = ResPairCore::from_residues(moved.residue(1).unwrap(), moved.residue(9).unwrap());

        assert!(squared_distance(&core_a, &core_b) < TOLERANCE);
        assert!(frame_distance_1(&core_a, &core_b) < TOLERANCE);
        assert!(max_phi_angle_difference(&core_a, &core_b).degrees() < 1e-2);
    }

    #[test]
    fn view_length_equals_carbon_alpha_separation() {
        let protein = helix("a", 12);
        let from = protein.residue(2).unwrap();
        let to = protein.residue(7).unwrap();
        let core = ResPairCore::from_residues(from, to);
        let separation = (to.carbon_alpha_coord() - from.carbon_alpha_coord()).norm() as f32;
        assert!((core.view().norm() - separation).abs() < TOLERANCE);
    }
}
