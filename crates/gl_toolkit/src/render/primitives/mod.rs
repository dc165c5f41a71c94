//! Rendering primitives: meshes and cameras

pub mod camera;
pub mod fly_camera;
pub mod mesh;

pub use camera::OrbitCamera;
pub use fly_camera::{FlyCamera, MoveDirection};
pub use mesh::{Mesh, Vertex, VertexAttribute, VertexLayout};
