use super::residue::Residue;
use crate::core::utils::geometry::{backbone_frame, dihedral_angle};
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ModelError {
    #[error("Degenerate backbone geometry at residue {index} of '{name}': cannot build a local frame")]
    DegenerateBackbone { name: String, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackboneAtoms {
    pub n: Point3<f64>,
    pub ca: Point3<f64>,
    pub c: Point3<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Protein {
    name: String,
    residues: Vec<Residue>,
}

impl Protein {
    pub fn new(name: impl Into<String>, residues: Vec<Residue>) -> Self {
        Self {
            name: name.into(),
            residues,
        }
    }

    /// Derives frames and backbone torsions from consecutive N, CA and C positions.
    ///
    /// φ of the first residue and ψ of the last are undefined and take
    /// [`Residue::DEFAULT_PHI_PSI`]; so do torsions of locally collinear backbones.
    pub fn from_backbone(name: impl Into<String>, atoms: &[BackboneAtoms]) -> Result<Self, ModelError> {
        let name = name.into();
        let residues = atoms
            .iter()
            .enumerate()
            .map(|(index, current)| {
                let frame = backbone_frame(&current.n, &current.ca, &current.c).ok_or_else(|| {
                    ModelError::DegenerateBackbone {
                        name: name.clone(),
                        index,
                    }
                })?;

                let phi = index
                    .checked_sub(1)
                    .and_then(|prev| atoms.get(prev))
                    .and_then(|prev| dihedral_angle(&prev.c, &current.n, &current.ca, &current.c))
                    .unwrap_or(Residue::DEFAULT_PHI_PSI);
                let psi = atoms
                    .get(index + 1)
                    .and_then(|next| dihedral_angle(&current.n, &current.ca, &current.c, &next.n))
                    .unwrap_or(Residue::DEFAULT_PHI_PSI);

                Ok(Residue::new(current.ca, frame, phi, psi))
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(Self { name, residues })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

    fn cylindrical(radius: f64, phase_degrees: f64, z: f64) -> Point3<f64> {
        let phase = phase_degrees.to_radians();
        Point3::new(radius * phase.cos(), radius * phase.sin(), z)
    }

    /// Backbone of an idealised α-helix: 100° and 1.5 Å per residue.
    pub(crate) fn helix_backbone(num_residues: usize) -> Vec<BackboneAtoms> {
        (0..num_residues)
            .map(|i| {
                let turn = 100.0 * i as f64;
                let rise = 1.5 * i as f64;
                BackboneAtoms {
                    n: cylindrical(1.55, turn - 28.0, rise - 0.95),
                    ca: cylindrical(2.30, turn, rise),
                    c: cylindrical(1.65, turn + 27.0, rise + 0.95),
                }
            })
            .collect()
    }

    /// Backbone of an extended, zig-zagging strand running along x.
    pub(crate) fn strand_backbone(num_residues: usize) -> Vec<BackboneAtoms> {
        (0..num_residues)
            .map(|i| {
                let x = 3.3 * i as f64;
                let side = if i % 2 == 0 { 1.0 } else { -1.0 };
                BackboneAtoms {
                    n: Point3::new(x - 1.2, 0.3 * side, 0.4),
                    ca: Point3::new(x, 0.9 * side, 0.0),
                    c: Point3::new(x + 1.2, 0.3 * side, -0.4),
                }
            })
            .collect()
    }

    pub(crate) fn rigidly_moved(atoms: &[BackboneAtoms]) -> Vec<BackboneAtoms> {
        let motion = Isometry3::from_parts(
            Translation3::new(12.0, -7.5, 31.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 1.3)
                * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -0.4),
        );
        atoms
            .iter()
            .map(|a| BackboneAtoms {
                n: motion * a.n,
                ca: motion * a.ca,
                c: motion * a.c,
            })
            .collect()
    }

    pub(crate) fn helix(name: &str, num_residues: usize) -> Protein {
        Protein::from_backbone(name, &helix_backbone(num_residues)).unwrap()
    }

    pub(crate) fn strand(name: &str, num_residues: usize) -> Protein {
        Protein::from_backbone(name, &strand_backbone(num_residues)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::*;
    use super::*;
    use crate::core::models::residue::ResidueGeometry;

    #[test]
    fn from_backbone_assigns_default_torsions_at_chain_termini() {
        let protein = helix("helix", 6);
        let first = protein.residue(0).unwrap();
        let last = protein.residue(5).unwrap();
        assert_eq!(first.phi(), Residue::DEFAULT_PHI_PSI.shifted());
        assert_eq!(last.psi(), Residue::DEFAULT_PHI_PSI.shifted());
    }

    #[test]
    fn from_backbone_gives_identical_torsions_along_a_regular_helix() {
        let protein = helix("helix", 8);
        let reference = protein.residue(2).unwrap();
        for residue in &protein.residues()[1..7] {
            assert!(residue.phi().wrapped_difference(reference.phi()).degrees() < 1e-2);
            assert!(residue.psi().wrapped_difference(reference.psi()).degrees() < 1e-2);
        }
    }

    #[test]
    fn torsions_are_invariant_under_rigid_motion() {
        let original = helix("a", 10);
        let moved = Protein::from_backbone("b", &rigidly_moved(&helix_backbone(10))).unwrap();
        for (a, b) in original.residues().iter().zip(moved.residues()) {
            assert!(a.phi().wrapped_difference(b.phi()).degrees() < 1e-2);
            assert!(a.psi().wrapped_difference(b.psi()).degrees() < 1e-2);
        }
    }

    #[test]
    fn from_backbone_reports_degenerate_residue() {
        let mut atoms = helix_backbone(4);
        atoms[2].c = atoms[2].ca;
        let err = Protein::from_backbone("broken", &atoms).unwrap_err();
        assert_eq!(
            err,
            ModelError::DegenerateBackbone {
                name: "broken".to_string(),
                index: 2
            }
        );
    }

    #[test]
    fn accessors_report_length_and_name() {
        let protein = strand("strand", 5);
        assert_eq!(protein.name(), "strand");
        assert_eq!(protein.len(), 5);
        assert!(!protein.is_empty());
        assert!(protein.residue(5).is_none());
    }
}
