//! # Orbit Camera
//!
//! A perspective camera that circles a center point, driven by spherical
//! coordinates built from the transform library.
//!
//! ## Design Principles
//! - **Library-agnostic**: produces matrices and uniform values, never calls a graphics API
//! - **Never stale**: every mutation recomputes the matrix it invalidates before returning
//! - **All or nothing**: a mutation that would produce a degenerate matrix returns the
//!   error and leaves the camera exactly as it was

use crate::core::config::CameraConfig;
use crate::foundation::math::{constants::LENGTH_EPSILON, utils, world_up, Mat4, Vec3};
use crate::foundation::transform::{
    cart_to_spherical, look_at, perspective, rotation_between, spherical_to_cart, Spherical, TransformError,
};
use crate::render::uniforms::{UniformSink, UniformValue};

/// Perspective camera orbiting a center point
///
/// The camera position lives on a sphere around `center`. Orbiting changes
/// the azimuth and polar angle of that position measured in a frame whose
/// vertical axis is the camera's `up` vector, so orbiting behaves the same
/// for any up direction. Dollying changes the sphere's radius.
///
/// # Coordinate System
/// Right-handed and Y-up by default:
/// - azimuth is measured around `up`, starting at +Z and turning towards +X
/// - polar angle is measured from `up`; positive deltas move the camera
///   towards the "south pole"
///
/// # Limits
/// The polar angle is clamped to `[min_phi, max_phi]` so the camera can never
/// pass over a pole (where the view basis flips), and the radius to
/// `[min_radius, max_radius]`. Every operation that places the camera
/// (construction, the setters, `orbit`, `dolly`, changing the limits) pulls
/// the position back inside them.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    position: Vec3,
    center: Vec3,
    up: Vec3,

    /// Vertical field of view in degrees
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,

    min_radius: f32,
    max_radius: f32,
    min_phi: f32,
    max_phi: f32,

    projection: Mat4,
    view: Mat4,
}

impl OrbitCamera {
    /// Create an orbit camera looking from `position` at `center` with +Y up
    ///
    /// Radius and polar limits start at the [`CameraConfig`] defaults, and
    /// `position` is clamped into them.
    ///
    /// # Errors
    /// Fails when the projection parameters are invalid, `position` is not
    /// finite, or `position == center`.
    pub fn new(
        position: Vec3,
        center: Vec3,
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, TransformError> {
        let defaults = CameraConfig::default();
        Self::with_limits(
            position,
            center,
            fov_degrees,
            aspect,
            near,
            far,
            (defaults.min_radius, defaults.max_radius),
            (defaults.min_phi, defaults.max_phi),
        )
    }

    /// Create an orbit camera using projection and limits from a configuration
    ///
    /// # Errors
    /// Fails when the configured projection is invalid, `position` is not
    /// finite, or `position == center`.
    pub fn from_config(config: &CameraConfig, aspect: f32, position: Vec3, center: Vec3) -> Result<Self, TransformError> {
        Self::with_limits(
            position,
            center,
            config.fov_degrees,
            aspect,
            config.near,
            config.far,
            (config.min_radius, config.max_radius),
            (config.min_phi, config.max_phi),
        )
    }

    fn with_limits(
        position: Vec3,
        center: Vec3,
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
        (min_radius, max_radius): (f32, f32),
        (min_phi, max_phi): (f32, f32),
    ) -> Result<Self, TransformError> {
        let up = world_up();
        let mut camera = Self {
            position,
            center,
            up,
            fov: fov_degrees,
            aspect,
            near,
            far,
            min_radius,
            max_radius,
            min_phi,
            max_phi,
            projection: perspective(fov_degrees, aspect, near, far)?,
            view: Mat4::identity(),
        };
        camera.position = camera.constrain(position, center, up)?;
        camera.view = look_at(camera.position, center, up)?;
        Ok(camera)
    }

    /// Set the radius limits and move the camera inside them
    pub fn with_radius_limits(mut self, min: f32, max: f32) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self.reapply_limits();
        self
    }

    /// Set the polar angle limits (radians) and move the camera inside them
    pub fn with_polar_limits(mut self, min: f32, max: f32) -> Self {
        self.min_phi = min;
        self.max_phi = max;
        self.reapply_limits();
        self
    }

    fn reapply_limits(&mut self) {
        if let Err(err) = self.set_position(self.position) {
            log::warn!("Orbit camera kept its position after a limit change: {}", err);
        }
    }

    /// `position` moved onto the nearest point inside the radius and polar
    /// limits around `center`, measured in the frame of `up`
    ///
    /// Positions already inside the limits come back unchanged.
    fn constrain(&self, position: Vec3, center: Vec3, up: Vec3) -> Result<Vec3, TransformError> {
        if !position.iter().all(|c| c.is_finite()) {
            return Err(TransformError::NonFinite("orbit camera position"));
        }
        let offset = position - center;
        if offset.norm() <= LENGTH_EPSILON {
            return Err(TransformError::ZeroLengthVector("camera offset from orbit center"));
        }

        let align = rotation_between(up, world_up())?;
        let mut spherical = cart_to_spherical(align * offset);
        if (self.min_phi..=self.max_phi).contains(&spherical.phi)
            && (self.min_radius..=self.max_radius).contains(&spherical.radius)
        {
            return Ok(position);
        }

        spherical.phi = utils::clamp(spherical.phi, self.min_phi, self.max_phi);
        spherical.radius = utils::clamp(spherical.radius, self.min_radius, self.max_radius);
        Ok(center + align.transpose() * spherical_to_cart(spherical))
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Point the camera orbits and looks at
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Aspect ratio (width / height)
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Near and far clip plane distances
    pub fn clip_planes(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    /// Radius limits `(min, max)`
    pub fn radius_limits(&self) -> (f32, f32) {
        (self.min_radius, self.max_radius)
    }

    /// Polar angle limits `(min, max)` in radians
    pub fn polar_limits(&self) -> (f32, f32) {
        (self.min_phi, self.max_phi)
    }

    /// Distance from the center
    pub fn radius(&self) -> f32 {
        (self.position - self.center).norm()
    }

    /// Position relative to the center in spherical coordinates around `up`
    ///
    /// # Errors
    /// Fails only if the up vector has zero length.
    pub fn spherical(&self) -> Result<Spherical, TransformError> {
        let align = rotation_between(self.up, world_up())?;
        Ok(cart_to_spherical(align * (self.position - self.center)))
    }

    /// Current projection matrix
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Current view matrix, always `look_at(position, center, up)`
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Combined `projection * view`
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Recompute the projection from fov, aspect and clip planes
    ///
    /// # Errors
    /// Returns the projection error and keeps the previous matrix.
    pub fn update_projection(&mut self) -> Result<(), TransformError> {
        self.projection = perspective(self.fov, self.aspect, self.near, self.far)?;
        Ok(())
    }

    /// Recompute the view from position, center and up
    ///
    /// # Errors
    /// Returns the look-at error and keeps the previous matrix.
    pub fn update_view(&mut self) -> Result<(), TransformError> {
        self.view = look_at(self.position, self.center, self.up)?;
        Ok(())
    }

    /// Move the camera, keeping center and up
    ///
    /// The position is clamped into the radius and polar limits.
    ///
    /// # Errors
    /// Fails, leaving the camera unchanged, when `position` is not finite or
    /// the new view is degenerate.
    pub fn set_position(&mut self, position: Vec3) -> Result<(), TransformError> {
        let position = self.constrain(position, self.center, self.up)?;
        self.view = look_at(position, self.center, self.up)?;
        self.position = position;
        log::trace!("Orbit camera position updated to: {:?}", position);
        Ok(())
    }

    /// Change the orbit center
    ///
    /// The camera position is kept unless it falls outside the limits around
    /// the new center, in which case it is clamped.
    ///
    /// # Errors
    /// Fails, leaving the camera unchanged, when the new view is degenerate.
    pub fn set_center(&mut self, center: Vec3) -> Result<(), TransformError> {
        let position = self.constrain(self.position, center, self.up)?;
        self.view = look_at(position, center, self.up)?;
        self.position = position;
        self.center = center;
        log::trace!("Orbit camera center updated to: {:?}", center);
        Ok(())
    }

    /// Change the up vector
    ///
    /// The polar angle is measured from `up`, so the position is clamped
    /// into the polar limits of the new frame.
    ///
    /// # Errors
    /// Fails, leaving the camera unchanged, when `up` is zero or parallel to
    /// the current view direction.
    pub fn set_up(&mut self, up: Vec3) -> Result<(), TransformError> {
        // Judge `up` against the current view before any clamping moves the camera
        look_at(self.position, self.center, up)?;
        let position = self.constrain(self.position, self.center, up)?;
        self.view = look_at(position, self.center, up)?;
        self.position = position;
        self.up = up;
        log::trace!("Orbit camera up vector updated to: {:?}", up);
        Ok(())
    }

    /// Change the vertical field of view (degrees)
    ///
    /// # Errors
    /// Fails, leaving the camera unchanged, when the projection is invalid.
    pub fn set_fov(&mut self, fov_degrees: f32) -> Result<(), TransformError> {
        self.projection = perspective(fov_degrees, self.aspect, self.near, self.far)?;
        self.fov = fov_degrees;
        Ok(())
    }

    /// Update the aspect ratio after a viewport resize
    ///
    /// # Errors
    /// Fails, leaving the camera unchanged, when `aspect <= 0`.
    pub fn set_aspect_ratio(&mut self, aspect: f32) -> Result<(), TransformError> {
        self.projection = perspective(self.fov, aspect, self.near, self.far)?;
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Orbit camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
        Ok(())
    }

    /// Change the near and far clip planes
    ///
    /// # Errors
    /// Fails, leaving the camera unchanged, when `near == far`.
    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> Result<(), TransformError> {
        self.projection = perspective(self.fov, self.aspect, near, far)?;
        self.near = near;
        self.far = far;
        Ok(())
    }

    /// Rotate the camera around the center
    ///
    /// The offset from the center is expressed in spherical coordinates in a
    /// frame where `up` is +Y, the deltas (radians) are added to azimuth and
    /// polar angle, the polar angle is clamped to `[min_phi, max_phi]`, and
    /// the result is rotated back into world space.
    ///
    /// # Errors
    /// Fails, leaving the camera unchanged, when up has zero length or the
    /// camera sits exactly on its center.
    pub fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) -> Result<(), TransformError> {
        let align = rotation_between(self.up, world_up())?;

        let mut spherical = cart_to_spherical(align * (self.position - self.center));
        spherical.theta += delta_azimuth;
        spherical.phi = utils::clamp(spherical.phi + delta_polar, self.min_phi, self.max_phi);

        // align is orthonormal, so its transpose undoes it
        let position = self.center + align.transpose() * spherical_to_cart(spherical);
        self.set_position(position)
    }

    /// Move the camera towards (negative) or away from (positive) the center
    ///
    /// The direction from the center is preserved and the resulting distance
    /// is clamped to `[min_radius, max_radius]`.
    ///
    /// # Errors
    /// [`TransformError::ZeroLengthVector`] when the camera sits on its center,
    /// since there is no direction to preserve, and
    /// [`TransformError::NonFinite`] when `delta_radius` is NaN.
    pub fn dolly(&mut self, delta_radius: f32) -> Result<(), TransformError> {
        let offset = self.position - self.center;
        let radius = offset.norm();
        if radius <= LENGTH_EPSILON {
            return Err(TransformError::ZeroLengthVector("camera offset from orbit center"));
        }

        let new_radius = utils::clamp(radius + delta_radius, self.min_radius, self.max_radius);
        self.set_position(self.center + offset * (new_radius / radius))
    }

    /// Write `projection` and `view` uniforms
    pub fn apply_uniforms(&self, sink: &mut impl UniformSink) {
        sink.set_uniform("projection", UniformValue::Mat4(self.projection));
        sink.set_uniform("view", UniformValue::Mat4(self.view));
    }
}
