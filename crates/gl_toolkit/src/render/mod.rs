//! Graphics-API-independent rendering data
//!
//! Meshes, cameras and uniform values. Nothing here calls a graphics API;
//! render glue consumes these types through [`uniforms::UniformSink`] and
//! [`primitives::Mesh::as_bytes`].

pub mod controls;
pub mod primitives;
pub mod uniforms;

pub use controls::OrbitControls;
pub use primitives::{FlyCamera, Mesh, MoveDirection, OrbitCamera, Vertex, VertexAttribute, VertexLayout};
pub use uniforms::{UniformSink, UniformValue};
