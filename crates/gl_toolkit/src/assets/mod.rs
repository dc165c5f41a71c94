//! Asset import: OBJ geometry, MTL materials and textures

pub mod image_loader;
pub mod materials;
pub mod model;
pub mod obj_loader;

pub use image_loader::ImageData;
pub use materials::{Material, MaterialTable, MtlError, MtlParser};
pub use model::Model;
pub use obj_loader::{IndexKind, ObjError, ObjLoader, ObjObject, ObjScene};

use std::path::PathBuf;

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// A file could not be read or decoded
    #[error("Failed to load {path:?}: {message}")]
    Resource {
        /// File that failed
        path: PathBuf,
        /// Reason reported by the reader or decoder
        message: String,
    },

    /// In-memory data could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Geometry import failed
    #[error(transparent)]
    Obj(#[from] ObjError),

    /// Material text is malformed
    #[error(transparent)]
    Material(#[from] MtlError),
}
