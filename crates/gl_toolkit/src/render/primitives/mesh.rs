//! Mesh representation for imported models
//!
//! A [`Mesh`] is a flat, non-indexed triangle list: every three consecutive
//! vertices form one triangle. This is the layout the importer produces after
//! fan-triangulating OBJ faces, and the layout a `glDrawArrays(GL_TRIANGLES)`
//! style draw call consumes directly.
//!
//! The vertex structure is plain old data so the whole buffer can be handed to
//! a graphics backend as bytes; [`Vertex::layout`] describes where each
//! attribute lives inside it.

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex: position, color, normal, texture coordinate
///
/// Eleven `f32` values (44 bytes) with no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Per-vertex RGB color
    pub color: [f32; 3],

    /// Unit normal
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

/// Location and extent of one vertex attribute inside [`Vertex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader attribute location
    pub location: u32,
    /// Number of `f32` components
    pub components: u32,
    /// Byte offset from the start of the vertex
    pub offset: usize,
}

/// Byte layout of an interleaved vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Distance in bytes between consecutive vertices
    pub stride: usize,
    /// Attributes in location order: position, color, normal, tex_coord
    pub attributes: [VertexAttribute; 4],
}

impl Vertex {
    /// Create a vertex from its attributes
    pub fn new(position: [f32; 3], color: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self { position, color, normal, tex_coord }
    }

    /// Attribute layout for uploading `[Vertex]` buffers
    pub fn layout() -> VertexLayout {
        const F32: usize = std::mem::size_of::<f32>();
        VertexLayout {
            stride: std::mem::size_of::<Self>(),
            attributes: [
                VertexAttribute { location: 0, components: 3, offset: 0 },
                VertexAttribute { location: 1, components: 3, offset: 3 * F32 },
                VertexAttribute { location: 2, components: 3, offset: 6 * F32 },
                VertexAttribute { location: 3, components: 2, offset: 9 * F32 },
            ],
        }
    }
}

/// Non-indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from a flat triangle list
    ///
    /// Returns `None` when the vertex count is not a multiple of three.
    pub fn from_vertices(vertices: Vec<Vertex>) -> Option<Self> {
        (vertices.len() % 3 == 0).then_some(Self { vertices })
    }

    /// Append one triangle
    pub fn push_triangle(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        self.vertices.extend_from_slice(&[a, b, c]);
    }

    /// All vertices, three per triangle
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Whether the mesh holds no geometry
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex; 3]> {
        self.vertices
            .chunks_exact(3)
            .filter_map(|chunk| <&[Vertex; 3]>::try_from(chunk).ok())
    }

    /// Raw vertex bytes for a GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Consume the mesh, returning its vertices
    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}
