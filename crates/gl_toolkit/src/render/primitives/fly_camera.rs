//! First-person camera driven by yaw and pitch
//!
//! Yaw and pitch are in degrees. Yaw -90 with pitch 0 looks down -Z.

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, world_up, Mat4, Vec3};
use crate::foundation::transform::{look_at, perspective, TransformError};
use crate::render::uniforms::{UniformSink, UniformValue};

/// Pitch limit that keeps the view direction off the up axis
const MAX_PITCH: f32 = 89.0;

/// Movement directions relative to where the camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Along the view direction
    Forward,
    /// Against the view direction
    Backward,
    /// Strafe left
    Left,
    /// Strafe right
    Right,
}

/// Free-flying perspective camera
#[derive(Debug, Clone)]
pub struct FlyCamera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,

    look_sensitivity: f32,
    move_speed: f32,
    min_fov: f32,
    max_fov: f32,
}

impl FlyCamera {
    /// Create a camera at `position` looking down -Z
    pub fn new(position: Vec3) -> Self {
        Self::from_config(&CameraConfig::default(), position)
    }

    /// Create a camera using the fly settings from a configuration
    pub fn from_config(config: &CameraConfig, position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: world_up(),
            yaw: -90.0,
            pitch: 0.0,
            fov: config.fov_degrees,
            look_sensitivity: config.look_sensitivity,
            move_speed: config.move_speed,
            min_fov: config.min_fov,
            max_fov: config.max_fov,
        };
        camera.update_front();
        camera
    }

    /// Camera position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Turn the camera by a pointer movement in pixels
    ///
    /// Moving right increases yaw, moving down (positive `dy`) lowers the pitch.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.look_sensitivity;
        self.pitch = utils::clamp(self.pitch - dy * self.look_sensitivity, -MAX_PITCH, MAX_PITCH);
        self.update_front();
    }

    /// Narrow (positive) or widen (negative) the field of view
    pub fn zoom(&mut self, offset: f32) {
        self.fov = utils::clamp(self.fov - offset, self.min_fov, self.max_fov);
    }

    /// Move for `delta_time` seconds at the configured speed
    pub fn translate(&mut self, direction: MoveDirection, delta_time: f32) {
        let distance = self.move_speed * delta_time;
        let right = self.front.cross(&self.up).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);

        self.position += match direction {
            MoveDirection::Forward => self.front * distance,
            MoveDirection::Backward => -self.front * distance,
            MoveDirection::Left => -right * distance,
            MoveDirection::Right => right * distance,
        };
    }

    /// View matrix looking along `front`
    pub fn view_matrix(&self) -> Result<Mat4, TransformError> {
        look_at(self.position, self.position + self.front, self.up)
    }

    /// Projection matrix for the current field of view
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Result<Mat4, TransformError> {
        perspective(self.fov, aspect, near, far)
    }

    /// Write `projection` and `view` uniforms
    pub fn apply_uniforms(
        &self,
        sink: &mut impl UniformSink,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<(), TransformError> {
        let projection = self.projection_matrix(aspect, near, far)?;
        let view = self.view_matrix()?;
        sink.set_uniform("projection", UniformValue::Mat4(projection));
        sink.set_uniform("view", UniformValue::Mat4(view));
        Ok(())
    }

    fn update_front(&mut self) {
        let (yaw, pitch) = (utils::deg_to_rad(self.yaw), utils::deg_to_rad(self.pitch));
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
    }
}
