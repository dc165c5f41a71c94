//! # Spatial transforms
//!
//! Pure functions producing the matrices a renderer needs: OpenGL-style
//! perspective projection, right-handed look-at view matrices, axis-angle
//! rotations, spherical coordinate conversion and the shortest-arc rotation
//! between two directions.
//!
//! ## Conventions
//! - Right-handed, Y-up world space. The camera looks down its local -Z axis.
//! - Angles passed in by callers are in degrees; spherical coordinates are
//!   stored in radians.
//! - Matrices are nalgebra `f32` matrices; `as_slice()` yields column-major
//!   data that can be uploaded without transposing.
//!
//! Nothing here allocates or touches global state. Degenerate input is
//! reported through [`TransformError`] instead of producing NaN matrices.

use thiserror::Error;

use crate::foundation::math::{constants::LENGTH_EPSILON, utils, Mat3, Mat4, Quat, Quaternion, Vec3};

/// `1 + dot` below this means the two directions are treated as antiparallel
const ANTIPARALLEL_EPSILON: f32 = 1e-6;

/// Errors produced by the transform library and the cameras built on it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The up vector is parallel to the view direction, so no right axis exists
    #[error("Degenerate basis: up vector {up:?} is parallel to view direction {direction:?}")]
    DegenerateBasis {
        /// Up vector supplied by the caller
        up: Vec3,
        /// Normalized eye - target direction
        direction: Vec3,
    },

    /// A vector that must have a direction has (near) zero length
    #[error("Zero-length vector: {0}")]
    ZeroLengthVector(&'static str),

    /// A coordinate is NaN or infinite
    #[error("Non-finite value: {0}")]
    NonFinite(&'static str),

    /// Projection parameters that would produce an infinite or NaN matrix
    #[error("Invalid projection: {0}")]
    InvalidProjection(String),
}

/// Point on a sphere around the origin
///
/// `theta` is the azimuth in the XZ-plane measured from +Z towards +X,
/// `phi` is the polar angle measured from +Y, `radius` is the distance from
/// the origin. Both angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Azimuth in radians, in `(-PI, PI]`
    pub theta: f32,
    /// Polar angle from +Y in radians, in `[0, PI]`
    pub phi: f32,
    /// Distance from the origin
    pub radius: f32,
}

impl Spherical {
    /// Create spherical coordinates from their components
    pub fn new(theta: f32, phi: f32, radius: f32) -> Self {
        Self { theta, phi, radius }
    }
}

/// OpenGL-style perspective projection (gluPerspective)
///
/// `fov_degrees` is the full vertical field of view. Depth is mapped to
/// `[-1, 1]` clip space with the camera looking down -Z.
///
/// # Errors
/// [`TransformError::InvalidProjection`] when `aspect <= 0`, `far == near`,
/// the field of view is outside `(0, 180)` degrees, or any input is not finite.
pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4, TransformError> {
    if ![fov_degrees, aspect, near, far].iter().all(|v| v.is_finite()) {
        return Err(TransformError::InvalidProjection(format!(
            "non-finite parameter (fov {fov_degrees}, aspect {aspect}, near {near}, far {far})"
        )));
    }
    if aspect <= 0.0 {
        return Err(TransformError::InvalidProjection(format!("aspect ratio must be positive, got {aspect}")));
    }
    if (far - near).abs() <= f32::EPSILON {
        return Err(TransformError::InvalidProjection(format!("near and far planes coincide at {near}")));
    }
    if fov_degrees <= 0.0 || fov_degrees >= 180.0 {
        return Err(TransformError::InvalidProjection(format!(
            "field of view must be in (0, 180) degrees, got {fov_degrees}"
        )));
    }

    let f = 1.0 / (utils::deg_to_rad(fov_degrees) * 0.5).tan();
    let depth = far - near;

    Ok(Mat4::new(
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, -(far + near) / depth, -2.0 * far * near / depth,
        0.0, 0.0, -1.0, 0.0,
    ))
}

/// Right-handed view matrix (gluLookAt)
///
/// Builds the camera basis `forward = normalize(eye - target)`,
/// `right = normalize(up x forward)`, `true_up = forward x right`; the rows of
/// the rotation are `right`, `true_up`, `forward` and the translation is
/// `-R * eye`.
///
/// # Errors
/// - [`TransformError::ZeroLengthVector`] when `eye == target` or `up` is zero
/// - [`TransformError::DegenerateBasis`] when `up` is parallel to `eye - target`
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Mat4, TransformError> {
    let offset = eye - target;
    let distance = offset.norm();
    if distance <= LENGTH_EPSILON {
        return Err(TransformError::ZeroLengthVector("view direction (eye == target)"));
    }
    let up_length = up.norm();
    if up_length <= LENGTH_EPSILON {
        return Err(TransformError::ZeroLengthVector("up vector"));
    }

    let forward = offset / distance;
    let right = up.cross(&forward);
    let right_length = right.norm();
    if right_length <= LENGTH_EPSILON * up_length {
        return Err(TransformError::DegenerateBasis { up, direction: forward });
    }
    let right = right / right_length;
    let true_up = forward.cross(&right);

    Ok(Mat4::new(
        right.x, right.y, right.z, -right.dot(&eye),
        true_up.x, true_up.y, true_up.z, -true_up.dot(&eye),
        forward.x, forward.y, forward.z, -forward.dot(&eye),
        0.0, 0.0, 0.0, 1.0,
    ))
}

/// Rotation of `angle_degrees` about an arbitrary axis (Rodrigues' formula)
///
/// The axis does not need to be normalized.
///
/// # Errors
/// [`TransformError::ZeroLengthVector`] when the axis has near-zero length.
pub fn rotate(angle_degrees: f32, axis: Vec3) -> Result<Mat3, TransformError> {
    let k = unit(axis, "rotation axis")?;
    let (sin, cos) = utils::deg_to_rad(angle_degrees).sin_cos();

    // Cross-product matrix of the unit axis
    let cross = Mat3::new(
        0.0, -k.z, k.y,
        k.z, 0.0, -k.x,
        -k.y, k.x, 0.0,
    );

    Ok(Mat3::identity() + cross * sin + cross * cross * (1.0 - cos))
}

/// Convert a Cartesian vector to spherical coordinates
///
/// At (near) zero radius the direction is undefined; `theta` and `phi` are
/// both reported as 0 in that case.
pub fn cart_to_spherical(v: Vec3) -> Spherical {
    let radius = v.norm();
    if radius <= LENGTH_EPSILON {
        return Spherical::new(0.0, 0.0, radius);
    }

    // atan2 on the horizontal length keeps precision near the poles where acos does not
    let horizontal = v.x.hypot(v.z);
    let phi = horizontal.atan2(v.y);
    let theta = if horizontal > 0.0 { v.x.atan2(v.z) } else { 0.0 };

    Spherical::new(theta, phi, radius)
}

/// Convert spherical coordinates back to a Cartesian vector
pub fn spherical_to_cart(s: Spherical) -> Vec3 {
    let (sin_phi, cos_phi) = s.phi.sin_cos();
    let (sin_theta, cos_theta) = s.theta.sin_cos();

    Vec3::new(
        s.radius * sin_phi * sin_theta,
        s.radius * cos_phi,
        s.radius * sin_phi * cos_theta,
    )
}

/// Shortest-arc rotation taking the direction of `from` onto the direction of `to`
///
/// Built from the half-angle quaternion `(1 + a.b, a x b)`. For antiparallel
/// input the cross product vanishes, so the result is a half turn about a
/// fixed axis perpendicular to `from` (see [`perpendicular_axis`]).
///
/// # Errors
/// [`TransformError::ZeroLengthVector`] when either input has near-zero length.
pub fn rotation_between(from: Vec3, to: Vec3) -> Result<Mat3, TransformError> {
    let a = unit(from, "rotation source vector")?;
    let b = unit(to, "rotation target vector")?;
    let dot = a.dot(&b);

    if 1.0 + dot <= ANTIPARALLEL_EPSILON {
        let n = perpendicular_axis(a);
        // Half turn about n: 2 n n^T - I
        return Ok(n * n.transpose() * 2.0 - Mat3::identity());
    }

    let axis = a.cross(&b);
    let q = Quat::from_quaternion(Quaternion::new(1.0 + dot, axis.x, axis.y, axis.z));
    Ok(q.to_rotation_matrix().into_inner())
}

/// Deterministic unit vector perpendicular to `v`
///
/// Drops the smallest-magnitude component of `v` and swaps the remaining two
/// with one sign flipped, so the result is orthogonal to `v` and built from
/// its two largest coordinates. Ties prefer dropping x, then y.
pub fn perpendicular_axis(v: Vec3) -> Vec3 {
    let abs = v.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::new(0.0, -v.z, v.y)
    } else if abs.y <= abs.z {
        Vec3::new(-v.z, 0.0, v.x)
    } else {
        Vec3::new(-v.y, v.x, 0.0)
    };
    axis.normalize()
}

fn unit(v: Vec3, what: &'static str) -> Result<Vec3, TransformError> {
    let length = v.norm();
    if length <= LENGTH_EPSILON {
        return Err(TransformError::ZeroLengthVector(what));
    }
    Ok(v / length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::{HALF_PI, PI};
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Rotation3, Unit};

    const EPSILON: f32 = 1e-5;

    fn assert_proper_rotation(m: &Mat3) {
        assert_relative_eq!(m.determinant(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(m.transpose() * m, Mat3::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_matches_opengl_convention() {
        let projection = perspective(45.0, 4.0 / 3.0, 0.1, 100.0).unwrap();
        let expected = Mat4::new_perspective(4.0 / 3.0, utils::deg_to_rad(45.0), 0.1, 100.0);
        assert_relative_eq!(projection, expected, epsilon = EPSILON);

        // Near plane maps to -1, far plane to +1
        let near = projection.transform_point(&Point3::new(0.0, 0.0, -0.1));
        let far = projection.transform_point(&Point3::new(0.0, 0.0, -100.0));
        assert_relative_eq!(near.z, -1.0, epsilon = 1e-4);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_rejects_invalid_parameters() {
        assert!(matches!(perspective(45.0, 0.0, 0.1, 100.0), Err(TransformError::InvalidProjection(_))));
        assert!(matches!(perspective(45.0, -1.0, 0.1, 100.0), Err(TransformError::InvalidProjection(_))));
        assert!(matches!(perspective(45.0, 1.0, 5.0, 5.0), Err(TransformError::InvalidProjection(_))));
        assert!(matches!(perspective(0.0, 1.0, 0.1, 100.0), Err(TransformError::InvalidProjection(_))));
        assert!(matches!(perspective(45.0, f32::NAN, 0.1, 100.0), Err(TransformError::InvalidProjection(_))));
    }

    #[test]
    fn test_look_at_matches_right_handed_convention() {
        let eye = Vec3::new(3.0, 2.0, 5.0);
        let target = Vec3::new(0.0, 0.5, 0.0);
        let up = Vec3::new(0.0, 1.0, 0.0);

        let view = look_at(eye, target, up).unwrap();
        let expected = Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up);
        assert_relative_eq!(view, expected, epsilon = EPSILON);

        // Eye maps to the origin, target lies straight ahead on -Z
        let eye_view = view.transform_point(&Point3::from(eye));
        assert_relative_eq!(eye_view.coords, Vec3::zeros(), epsilon = EPSILON);
        let target_view = view.transform_point(&Point3::from(target));
        assert_relative_eq!(target_view.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(target_view.y, 0.0, epsilon = EPSILON);
        assert!(target_view.z < 0.0);
    }

    #[test]
    fn test_look_at_rotation_is_orthonormal() {
        let view = look_at(Vec3::new(-4.0, 1.0, 2.0), Vec3::new(1.0, -1.0, 0.5), Vec3::new(0.2, 1.0, 0.1)).unwrap();
        let rotation: Mat3 = view.fixed_view::<3, 3>(0, 0).into_owned();
        assert_proper_rotation(&rotation);
    }

    #[test]
    fn test_look_at_parallel_up_is_degenerate() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let up = Vec3::new(0.0, 1.0, 0.0);

        let above = look_at(eye, eye + up * 4.0, up);
        assert!(matches!(above, Err(TransformError::DegenerateBasis { .. })));

        let below = look_at(eye, eye - up * 0.5, up);
        assert!(matches!(below, Err(TransformError::DegenerateBasis { .. })));
    }

    #[test]
    fn test_look_at_coincident_eye_and_target() {
        let eye = Vec3::new(1.0, 1.0, 1.0);
        assert!(matches!(look_at(eye, eye, Vec3::y()), Err(TransformError::ZeroLengthVector(_))));
        assert!(matches!(look_at(eye, Vec3::zeros(), Vec3::zeros()), Err(TransformError::ZeroLengthVector(_))));
    }

    #[test]
    fn test_rotate_zero_angle_is_identity() {
        for axis in [Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.3, 0.5), Vec3::new(-2.0, 7.0, 0.01)] {
            assert_relative_eq!(rotate(0.0, axis).unwrap(), Mat3::identity(), epsilon = EPSILON);
        }
    }

    #[test]
    fn test_rotate_matches_axis_angle() {
        let axis = Vec3::new(1.0, 0.3, 0.5);
        let rotation = rotate(20.0, axis).unwrap();
        let expected = Rotation3::from_axis_angle(&Unit::new_normalize(axis), utils::deg_to_rad(20.0));
        assert_relative_eq!(rotation, expected.into_inner(), epsilon = EPSILON);
        assert_proper_rotation(&rotation);
    }

    #[test]
    fn test_rotate_quarter_turn_about_y() {
        // Right-handed: +X rotates onto -Z
        let rotation = rotate(90.0, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert_relative_eq!(rotation * Vec3::x(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_zero_axis_fails() {
        assert!(matches!(rotate(30.0, Vec3::zeros()), Err(TransformError::ZeroLengthVector(_))));
    }

    #[test]
    fn test_spherical_roundtrip() {
        let samples = [
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-4.0, 0.5, -0.25),
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(1e-3, 1.0, 0.0),
            Vec3::new(-0.7, -1.0, 0.3),
        ];
        for v in samples {
            let back = spherical_to_cart(cart_to_spherical(v));
            assert_relative_eq!(back, v, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_spherical_axes() {
        let s = cart_to_spherical(Vec3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(s.theta, 0.0);
        assert_relative_eq!(s.phi, HALF_PI, epsilon = EPSILON);
        assert_relative_eq!(s.radius, 2.0);

        let s = cart_to_spherical(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(s.theta, HALF_PI, epsilon = EPSILON);

        let s = cart_to_spherical(Vec3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(s.phi, PI, epsilon = EPSILON);
    }

    #[test]
    fn test_spherical_zero_radius_collapses_angles() {
        let s = cart_to_spherical(Vec3::zeros());
        assert_eq!(s.theta, 0.0);
        assert_eq!(s.phi, 0.0);
        assert_eq!(s.radius, 0.0);

        let tiny = cart_to_spherical(Vec3::new(1e-8, -1e-8, 1e-8));
        assert_eq!(tiny.theta, 0.0);
        assert_eq!(tiny.phi, 0.0);
    }

    #[test]
    fn test_rotation_between_same_direction_is_identity() {
        let v = Vec3::new(0.3, -1.2, 2.0);
        assert_relative_eq!(rotation_between(v, v).unwrap(), Mat3::identity(), epsilon = EPSILON);
        assert_relative_eq!(rotation_between(v, v * 5.0).unwrap(), Mat3::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_between_maps_source_onto_target() {
        let from = Vec3::new(1.0, 2.0, -0.5);
        let to = Vec3::new(-3.0, 0.25, 1.0);
        let rotation = rotation_between(from, to).unwrap();

        assert_proper_rotation(&rotation);
        assert_relative_eq!(rotation * from.normalize(), to.normalize(), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_between_antiparallel_is_proper_rotation() {
        let samples = [
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-0.7, -1.0, 0.3),
        ];
        for v in samples {
            let rotation = rotation_between(v, -v).unwrap();
            assert_proper_rotation(&rotation);
            assert_relative_eq!(rotation * v.normalize(), -v.normalize(), epsilon = EPSILON);
            // Not a point reflection
            assert!((rotation + Mat3::identity()).norm() > 0.1);
        }
    }

    #[test]
    fn test_rotation_between_antiparallel_y_uses_fixed_axis() {
        // Smallest component ties between x and z; x is dropped, so the half turn is about Z
        let rotation = rotation_between(Vec3::y(), -Vec3::y()).unwrap();
        let expected = Mat3::from_diagonal(&Vec3::new(-1.0, -1.0, 1.0));
        assert_relative_eq!(rotation, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_perpendicular_axis_is_orthogonal_unit() {
        for v in [Vec3::new(3.0, 0.1, -2.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(-5.0, 4.0, 0.5)] {
            let axis = perpendicular_axis(v);
            assert_relative_eq!(axis.norm(), 1.0, epsilon = EPSILON);
            assert_relative_eq!(axis.dot(&v), 0.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_rotation_between_zero_vector_fails() {
        assert!(matches!(rotation_between(Vec3::zeros(), Vec3::y()), Err(TransformError::ZeroLengthVector(_))));
        assert!(matches!(rotation_between(Vec3::y(), Vec3::zeros()), Err(TransformError::ZeroLengthVector(_))));
    }
}
