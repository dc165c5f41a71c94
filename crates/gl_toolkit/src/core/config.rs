//! # Toolkit Configuration
//!
//! Settings for the importer, the cameras and logging, grouped under a single
//! [`ToolkitConfig`] that can be stored as TOML or RON.
//!
//! ## Configuration Categories
//!
//! - **Import Config**: optional OBJ extensions and material conventions
//! - **Camera Config**: projection defaults, orbit limits, input sensitivities
//! - **Logging**: default log filter

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};
use crate::foundation::math::constants::PI;

/// # Import Configuration
///
/// Controls the optional parts of OBJ/MTL import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Accept the non-standard `v x y z r g b` per-vertex color extension.
    /// When disabled the trailing color values are ignored.
    pub vertex_colors: bool,
    /// Color given to vertices that carry no color of their own
    pub default_color: [f32; 3],
    /// Multiplier applied to normalized [0, 1] shininess values in material tables
    pub shininess_scale: f32,
}

impl ImportConfig {
    /// Create an import configuration with defaults
    pub fn new() -> Self {
        Self {
            vertex_colors: true,
            default_color: [1.0, 1.0, 1.0],
            shininess_scale: 128.0,
        }
    }

    /// Enable or disable the per-vertex color extension
    pub fn with_vertex_colors(mut self, enabled: bool) -> Self {
        self.vertex_colors = enabled;
        self
    }

    /// Set the fallback vertex color
    pub fn with_default_color(mut self, color: [f32; 3]) -> Self {
        self.default_color = color;
        self
    }

    /// Set the shininess multiplier for material tables
    pub fn with_shininess_scale(mut self, scale: f32) -> Self {
        self.shininess_scale = scale;
        self
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Camera Configuration
///
/// Projection defaults and interaction limits shared by the orbit and fly
/// cameras. Angles are in degrees except the polar limits, which are radians
/// like the spherical coordinates they clamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
    /// Closest the orbit camera may get to its center
    pub min_radius: f32,
    /// Farthest the orbit camera may get from its center
    pub max_radius: f32,
    /// Smallest polar angle from the up axis (radians)
    pub min_phi: f32,
    /// Largest polar angle from the up axis (radians)
    pub max_phi: f32,
    /// Radians of orbit per pixel of pointer drag
    pub orbit_sensitivity: f32,
    /// Degrees of yaw/pitch per pixel of pointer movement (fly camera)
    pub look_sensitivity: f32,
    /// Fly camera movement speed in units per second
    pub move_speed: f32,
    /// Narrowest field of view reachable by zooming (degrees)
    pub min_fov: f32,
    /// Widest field of view reachable by zooming (degrees)
    pub max_fov: f32,
}

impl CameraConfig {
    /// Create a camera configuration with defaults
    pub fn new() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.01,
            far: 100.0,
            min_radius: 1e-3,
            max_radius: 1e6,
            min_phi: 1e-3,
            max_phi: PI - 1e-3,
            orbit_sensitivity: 0.01,
            look_sensitivity: 0.1,
            move_speed: 2.5,
            min_fov: 1.0,
            max_fov: 45.0,
        }
    }

    /// Set projection parameters
    pub fn with_projection(mut self, fov_degrees: f32, near: f32, far: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self.near = near;
        self.far = far;
        self
    }

    /// Set orbit radius limits
    pub fn with_radius_limits(mut self, min: f32, max: f32) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    /// Set polar angle limits (radians)
    pub fn with_polar_limits(mut self, min: f32, max: f32) -> Self {
        self.min_phi = min;
        self.max_phi = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far (near {}, far {})",
                self.near, self.far
            )));
        }
        if !(self.min_radius > 0.0 && self.min_radius <= self.max_radius && self.max_radius.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "radius limits must satisfy 0 < min <= max < inf (min {}, max {})",
                self.min_radius, self.max_radius
            )));
        }
        if !(self.min_phi >= 0.0 && self.min_phi <= self.max_phi && self.max_phi <= PI) {
            return Err(ConfigError::Invalid(format!(
                "polar limits must satisfy 0 <= min <= max <= PI (min {}, max {})",
                self.min_phi, self.max_phi
            )));
        }
        if !(self.min_fov > 0.0 && self.min_fov <= self.max_fov && self.max_fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "field of view limits must satisfy 0 < min <= max < 180 (min {}, max {})",
                self.min_fov, self.max_fov
            )));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Toolkit Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Importer configuration
    pub import: ImportConfig,
    /// Camera configuration
    pub camera: CameraConfig,
}

impl ToolkitConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            import: ImportConfig::default(),
            camera: CameraConfig::default(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set importer configuration
    pub fn with_import(mut self, import: ImportConfig) -> Self {
        self.import = import;
        self
    }

    /// Set camera configuration
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Install the logger using the configured level
    pub fn init_logging(&self) {
        crate::foundation::logging::init_with_filter(&self.log_level);
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }
        self.camera.validate()
    }
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for ToolkitConfig {}
