use super::angle::Angle;
use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, Vector3};

const DEGENERATE_EPSILON: f64 = 1e-10;

/// Dihedral angle defined by four points, in `(-π, π]`.
///
/// Returns `None` when three consecutive points are collinear and the angle is undefined.
pub fn dihedral_angle(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> Option<Angle> {
    let b0 = p0 - p1;
    let b1 = p2 - p1;
    let b2 = p3 - p2;

    if b1.norm_squared() < DEGENERATE_EPSILON {
        return None;
    }
    let b1 = b1.normalize();

    let v = b0 - b1 * b0.dot(&b1);
    let w = b2 - b1 * b2.dot(&b1);
    if v.norm_squared() < DEGENERATE_EPSILON || w.norm_squared() < DEGENERATE_EPSILON {
        return None;
    }

    let x = v.dot(&w);
    let y = b1.cross(&v).dot(&w);
    Some(Angle::from_radians(y.atan2(x) as f32))
}

/// Local coordinate frame of a residue built from its backbone N, CA and C atoms.
///
/// The x axis points from CA to C, the y axis lies in the N-CA-C plane on the side of N,
/// and z completes the right-handed basis. The returned rotation maps local coordinates
/// onto lab coordinates.
pub fn backbone_frame(
    n: &Point3<f64>,
    ca: &Point3<f64>,
    c: &Point3<f64>,
) -> Option<UnitQuaternion<f32>> {
    let ca_c = c - ca;
    let ca_n = n - ca;
    if ca_c.norm_squared() < DEGENERATE_EPSILON {
        return None;
    }
    let x_axis = ca_c.normalize();

    let in_plane = ca_n - x_axis * ca_n.dot(&x_axis);
    if in_plane.norm_squared() < DEGENERATE_EPSILON {
        return None;
    }
    let y_axis = in_plane.normalize();
    let z_axis = x_axis.cross(&y_axis);

    let basis: Matrix3<f64> = Matrix3::from_columns(&[x_axis, y_axis, z_axis]);
    let rotation = Rotation3::from_matrix_unchecked(basis);
    Some(UnitQuaternion::from_rotation_matrix(&rotation).cast::<f32>())
}

/// Expresses a lab-frame vector in the local frame described by `frame`.
#[inline]
pub fn rotate_into_frame(frame: &UnitQuaternion<f32>, lab_vector: &Vector3<f32>) -> Vector3<f32> {
    frame.inverse_transform_vector(lab_vector)
}

/// Quaternion "distance-1" between two rotations: 0 for identical rotations, 1 for
/// rotations half a revolution apart.
#[inline]
pub fn distance_1_between_frames(a: &UnitQuaternion<f32>, b: &UnitQuaternion<f32>) -> f32 {
    (1.0 - a.coords.dot(&b.coords).abs()).clamp(0.0, 1.0)
}

/// The distance-1 value of two rotations separated by `angle`.
pub fn distance_1_of_angle(angle: Angle) -> f32 {
    let half = (angle.radians().abs() / 2.0).min(std::f32::consts::FRAC_PI_2);
    1.0 - half.cos()
}

/// Inverse of [`distance_1_of_angle`], for distance-1 values in `[0, 1]`.
pub fn angle_of_distance_1(distance_1: f32) -> Angle {
    let cos_half = (1.0 - distance_1).clamp(0.0, 1.0);
    Angle::from_radians(2.0 * cos_half.acos())
}
