//! # GL Toolkit
//!
//! Model import and camera math for OpenGL-style renderers, independent of
//! any graphics API.
//!
//! ## Features
//!
//! - **OBJ/MTL Import**: fan-triangulated, flat-normal-filled meshes with materials resolved by name
//! - **Transforms**: perspective, look-at, axis rotation, spherical coordinates, rotation between vectors
//! - **Cameras**: orbit camera with bounded radius and polar angle, first-person fly camera
//! - **Render Boundary**: tagged uniform values and byte views of vertex buffers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gl_toolkit::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ToolkitConfig::default();
//!     config.init_logging();
//!
//!     let model = Model::load("assets/backpack/backpack.obj", &config.import)?;
//!     let mut camera = OrbitCamera::from_config(&config.camera, 16.0 / 9.0, Vec3::new(0.0, 0.0, 3.0), Vec3::zeros())?;
//!     camera.orbit(0.1, 0.0)?;
//!
//!     for object in model.objects() {
//!         let _bytes = object.mesh.as_bytes();
//!         let _material = model.material_for(object);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;

pub mod assets;
pub mod foundation;
pub mod render;

/// Common imports for toolkit users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, ImageData, Material, MaterialTable, Model, MtlParser, ObjError, ObjLoader, ObjObject, ObjScene},
        config::Config,
        core::config::{CameraConfig, ImportConfig, ToolkitConfig},
        foundation::{
            math::{Mat3, Mat4, Vec3},
            transform::{cart_to_spherical, look_at, perspective, rotate, rotation_between, spherical_to_cart, Spherical, TransformError},
        },
        render::{FlyCamera, Mesh, MoveDirection, OrbitCamera, OrbitControls, UniformSink, UniformValue, Vertex},
    };
}
