//! Material parsing
//!
//! Wavefront MTL libraries and the plain-text material tables used by the
//! lighting demos both produce [`Material`]s.

pub mod material_table;
pub mod mtl_parser;

pub use material_table::MaterialTable;
pub use mtl_parser::{Material, MtlError, MtlParser};
