//! Pointer input for the orbit camera
//!
//! Windowing code forwards button, cursor and scroll events here; the
//! controller turns them into [`OrbitCamera::orbit`] and
//! [`OrbitCamera::dolly`] calls.

use crate::core::config::CameraConfig;
use crate::foundation::transform::TransformError;
use crate::render::primitives::OrbitCamera;

/// Drag-to-orbit, scroll-to-dolly controller
#[derive(Debug, Clone)]
pub struct OrbitControls {
    sensitivity: f32,
    last_cursor: Option<(f64, f64)>,
}

impl OrbitControls {
    /// Create a controller with `sensitivity` radians per pixel of drag
    pub fn new(sensitivity: f32) -> Self {
        Self { sensitivity, last_cursor: None }
    }

    /// Create a controller using the configured orbit sensitivity
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.orbit_sensitivity)
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.last_cursor.is_some()
    }

    /// Start a drag at the cursor position
    pub fn press(&mut self, x: f64, y: f64) {
        self.last_cursor = Some((x, y));
    }

    /// End the drag
    pub fn release(&mut self) {
        self.last_cursor = None;
    }

    /// Orbit by the cursor movement since the last event while dragging
    ///
    /// Dragging right or down turns the scene with the pointer, so the camera
    /// moves the opposite way. Does nothing when no drag is in progress.
    pub fn cursor_moved(&mut self, camera: &mut OrbitCamera, x: f64, y: f64) -> Result<(), TransformError> {
        let Some((last_x, last_y)) = self.last_cursor else {
            return Ok(());
        };
        self.last_cursor = Some((x, y));

        let dx = (x - last_x) as f32;
        let dy = (y - last_y) as f32;
        camera.orbit(-dx * self.sensitivity, -dy * self.sensitivity)
    }

    /// Dolly towards the center when scrolling up, away when scrolling down
    pub fn scroll(&mut self, camera: &mut OrbitCamera, offset: f64) -> Result<(), TransformError> {
        camera.dolly(-offset as f32)
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
