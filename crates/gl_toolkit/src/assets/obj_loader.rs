//! OBJ file loader for 3D models
//!
//! Reads the Wavefront OBJ subset used by the tutorial models: `mtllib`,
//! `o`/`g`, `v` (optionally followed by an RGB color), `vt`, `vn`, `usemtl`
//! and `f` with `v`, `v/vt`, `v//vn` or `v/vt/vn` corners. Faces with more
//! than three corners are fan-triangulated around their first corner and
//! every triangle is expanded into three standalone vertices.
//!
//! Any other directive is skipped. Everything else that is wrong with the
//! input fails the whole load; a partially built scene is never returned.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::materials::{Material, MtlError, MtlParser};
use crate::core::config::ImportConfig;
use crate::foundation::math::Vec3;
use crate::render::primitives::{Mesh, Vertex};

/// Relative tolerance for deciding that a face has no area
const DEGENERATE_FACE_EPSILON: f32 = 1e-6;

/// Which side table a face index points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// `v` positions
    Position,
    /// `vt` texture coordinates
    TexCoord,
    /// `vn` normals
    Normal,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::TexCoord => write!(f, "texture coordinate"),
            Self::Normal => write!(f, "normal"),
        }
    }
}

/// Errors produced while importing an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// Malformed line: wrong token count or unparsable number
    #[error("Line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A face corner references a table entry that does not exist
    #[error("Line {line}: {kind} index {index} out of range (1..={available})")]
    IndexOutOfRange {
        /// 1-based line number
        line: usize,
        /// Table the index points into
        kind: IndexKind,
        /// The index as written in the file
        index: i64,
        /// Entries in the table when the face was read
        available: usize,
    },

    /// A triangle needing a computed normal has zero area
    #[error("Line {line}: degenerate face, cannot compute a normal")]
    DegenerateFace {
        /// 1-based line number
        line: usize,
    },

    /// `usemtl` named a material no material library defines
    #[error("Object '{object}' uses unknown material '{material}'")]
    UnknownMaterial {
        /// Object holding the reference
        object: String,
        /// The unresolved material name
        material: String,
    },

    /// A referenced material library is malformed
    #[error("Material library error: {0}")]
    Material(#[from] MtlError),

    /// The OBJ file or a referenced material library could not be read
    #[error("Failed to read {path:?}: {source}")]
    Resource {
        /// File that failed to open
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl ObjError {
    fn parse(line_num: usize, message: impl Into<String>) -> Self {
        Self::Parse { line: line_num + 1, message: message.into() }
    }
}

/// A named sub-mesh with at most one material
#[derive(Debug, Clone, PartialEq)]
pub struct ObjObject {
    /// Name from the `o`/`g` directive, empty for the implicit first object
    pub name: String,
    /// Material name from the last `usemtl`
    pub material: Option<String>,
    /// Triangulated geometry
    pub mesh: Mesh,
}

impl ObjObject {
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), material: None, mesh: Mesh::new() }
    }
}

/// Everything imported from one OBJ file
#[derive(Debug, Clone, Default)]
pub struct ObjScene {
    /// Objects in file order
    pub objects: Vec<ObjObject>,
    /// Materials from every `mtllib`, in load order
    pub materials: Vec<Material>,
}

impl ObjScene {
    /// Look up a material by name
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|material| material.name == name)
    }

    /// Total triangles across all objects
    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|object| object.mesh.triangle_count()).sum()
    }

    /// Split into the object list and material list
    pub fn into_parts(self) -> (Vec<ObjObject>, Vec<Material>) {
        (self.objects, self.materials)
    }
}

/// One decoded `v/vt/vn` face corner, 0-based
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
}

/// Parse state; the side tables live only as long as the parse
struct ObjParser<'a> {
    base_dir: &'a Path,
    config: &'a ImportConfig,
    positions: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    objects: Vec<ObjObject>,
    current: ObjObject,
    materials: Vec<Material>,
}

/// Wavefront OBJ importer
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file, resolving `mtllib` paths against its directory
    pub fn load_obj<P: AsRef<Path>>(path: P, config: &ImportConfig) -> Result<ObjScene, ObjError> {
        let path = path.as_ref();
        log::debug!("Loading OBJ from: {:?}", path);

        let text = std::fs::read_to_string(path)
            .map_err(|source| ObjError::Resource { path: path.to_path_buf(), source })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let scene = Self::parse_obj(&text, base_dir, config)?;

        log::info!(
            "Loaded {:?}: {} object(s), {} triangle(s), {} material(s)",
            path,
            scene.objects.len(),
            scene.triangle_count(),
            scene.materials.len()
        );
        Ok(scene)
    }

    /// Parse OBJ text; `base_dir` is where `mtllib` files are looked up
    pub fn parse_obj(text: &str, base_dir: &Path, config: &ImportConfig) -> Result<ObjScene, ObjError> {
        let mut parser = ObjParser {
            base_dir,
            config,
            positions: Vec::new(),
            colors: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            objects: Vec::new(),
            current: ObjObject::new(""),
            materials: Vec::new(),
        };

        for (line_num, line) in text.lines().enumerate() {
            parser.parse_line(line_num, line)?;
        }
        parser.finish()
    }
}

impl ObjParser<'_> {
    fn parse_line(&mut self, line_num: usize, line: &str) -> Result<(), ObjError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        match command {
            "mtllib" => self.load_material_libraries(line_num, &args),
            "o" | "g" => {
                self.begin_object(args.join(" "));
                Ok(())
            }
            "v" => self.parse_position(line_num, &args),
            "vt" => {
                // `vt u` is legal; v defaults to 0
                let values = parse_floats(line_num, command, &args, 1)?;
                self.tex_coords.push([values[0], values.get(1).copied().unwrap_or(0.0)]);
                Ok(())
            }
            "vn" => {
                let values = parse_floats(line_num, command, &args, 3)?;
                self.normals.push([values[0], values[1], values[2]]);
                Ok(())
            }
            "usemtl" => {
                if args.is_empty() {
                    return Err(ObjError::parse(line_num, "usemtl missing material name"));
                }
                self.use_material(line_num, args.join(" "));
                Ok(())
            }
            "f" => self.parse_face(line_num, &args),
            _ => {
                log::trace!("Ignoring OBJ directive '{}' on line {}", command, line_num + 1);
                Ok(())
            }
        }
    }

    fn load_material_libraries(&mut self, line_num: usize, files: &[&str]) -> Result<(), ObjError> {
        if files.is_empty() {
            return Err(ObjError::parse(line_num, "mtllib missing file name"));
        }

        for file in files {
            let path = self.base_dir.join(file);
            let text = std::fs::read_to_string(&path)
                .map_err(|source| ObjError::Resource { path: path.clone(), source })?;
            let mtl_dir = path.parent().unwrap_or_else(|| Path::new(""));
            let materials = MtlParser::parse(&text, mtl_dir)?;

            log::debug!("Loaded {} material(s) from {:?}", materials.len(), path);
            self.materials.extend(materials);
        }
        Ok(())
    }

    /// Finish the current object and start a new one, or rename the current
    /// one if it has no geometry yet
    fn begin_object(&mut self, name: String) {
        if self.current.mesh.is_empty() {
            self.current.name = name;
            return;
        }

        let finished = std::mem::replace(&mut self.current, ObjObject::new(name));
        log::debug!(
            "Finished object '{}' with {} triangle(s)",
            finished.name,
            finished.mesh.triangle_count()
        );
        self.objects.push(finished);
    }

    fn use_material(&mut self, line_num: usize, name: String) {
        if !self.current.mesh.is_empty() {
            if let Some(previous) = &self.current.material {
                if *previous != name {
                    log::warn!(
                        "Line {}: object '{}' switches material from '{}' to '{}' after geometry, the last one wins",
                        line_num + 1,
                        self.current.name,
                        previous,
                        name
                    );
                }
            }
        }
        self.current.material = Some(name);
    }

    fn parse_position(&mut self, line_num: usize, args: &[&str]) -> Result<(), ObjError> {
        let values = parse_floats(line_num, "v", args, 3)?;
        self.positions.push(Vec3::new(values[0], values[1], values[2]));

        let color = match values.len() {
            6 if self.config.vertex_colors => [values[3], values[4], values[5]],
            3 | 6 => self.config.default_color,
            count => {
                log::warn!("Line {}: vertex with {} values, using the first three", line_num + 1, count);
                self.config.default_color
            }
        };
        self.colors.push(color);
        Ok(())
    }

    fn parse_face(&mut self, line_num: usize, args: &[&str]) -> Result<(), ObjError> {
        if args.len() < 3 {
            return Err(ObjError::parse(
                line_num,
                format!("face needs at least 3 vertices, found {}", args.len()),
            ));
        }

        let corners = args
            .iter()
            .map(|token| self.parse_corner(line_num, token))
            .collect::<Result<Vec<_>, _>>()?;

        // Fan around the first corner: k corners give k - 2 triangles
        for i in 1..corners.len() - 1 {
            let triangle = [corners[0], corners[i], corners[i + 1]];
            let flat_normal = if triangle.iter().any(|corner| corner.normal.is_none()) {
                Some(self.face_normal(line_num, &triangle)?)
            } else {
                None
            };

            let [a, b, c] = triangle.map(|corner| self.vertex(corner, flat_normal));
            self.current.mesh.push_triangle(a, b, c);
        }
        Ok(())
    }

    fn parse_corner(&self, line_num: usize, token: &str) -> Result<Corner, ObjError> {
        let parts: Vec<&str> = token.split('/').collect();
        if parts.len() > 3 {
            return Err(ObjError::parse(line_num, format!("invalid face vertex '{}'", token)));
        }

        let optional = |slot: usize, kind: IndexKind, available: usize| match parts.get(slot) {
            Some(part) if !part.is_empty() => resolve_index(line_num, part, kind, available).map(Some),
            _ => Ok(None),
        };

        Ok(Corner {
            position: resolve_index(line_num, parts[0], IndexKind::Position, self.positions.len())?,
            tex_coord: optional(1, IndexKind::TexCoord, self.tex_coords.len())?,
            normal: optional(2, IndexKind::Normal, self.normals.len())?,
        })
    }

    /// Unit normal of a triangle from its winding
    fn face_normal(&self, line_num: usize, triangle: &[Corner; 3]) -> Result<[f32; 3], ObjError> {
        let p0 = self.positions[triangle[0].position];
        let e1 = self.positions[triangle[1].position] - p0;
        let e2 = self.positions[triangle[2].position] - p0;
        let normal = e1.cross(&e2);

        let length = normal.norm();
        if length <= DEGENERATE_FACE_EPSILON * e1.norm() * e2.norm() || length == 0.0 {
            return Err(ObjError::DegenerateFace { line: line_num + 1 });
        }
        Ok((normal / length).into())
    }

    fn vertex(&self, corner: Corner, flat_normal: Option<[f32; 3]>) -> Vertex {
        let normal = match (flat_normal, corner.normal) {
            (Some(normal), _) => normal,
            (None, Some(index)) => self.normals[index],
            (None, None) => [0.0, 0.0, 0.0],
        };
        Vertex::new(
            self.positions[corner.position].into(),
            self.colors[corner.position],
            normal,
            corner.tex_coord.map_or([0.0, 0.0], |index| self.tex_coords[index]),
        )
    }

    fn finish(mut self) -> Result<ObjScene, ObjError> {
        // The last object is kept even when empty
        self.objects.push(self.current);

        for object in &self.objects {
            if let Some(material) = &object.material {
                if !self.materials.iter().any(|m| &m.name == material) {
                    return Err(ObjError::UnknownMaterial {
                        object: object.name.clone(),
                        material: material.clone(),
                    });
                }
            }
        }

        Ok(ObjScene { objects: self.objects, materials: self.materials })
    }
}

/// Parse at least `min` finite floats from a record's arguments
fn parse_floats(line_num: usize, command: &str, args: &[&str], min: usize) -> Result<Vec<f32>, ObjError> {
    if args.len() < min {
        return Err(ObjError::parse(
            line_num,
            format!("{} needs at least {} values, found {}", command, min, args.len()),
        ));
    }
    args.iter()
        .map(|token| {
            match token.parse::<f32>() {
                Ok(value) if value.is_finite() => Ok(value),
                Ok(_) => Err(ObjError::parse(line_num, format!("{} non-finite value '{}'", command, token))),
                Err(_) => Err(ObjError::parse(line_num, format!("{} invalid float value '{}'", command, token))),
            }
        })
        .collect()
}

/// Convert a 1-based OBJ index to 0-based, rejecting zero, negative and
/// out-of-range values
fn resolve_index(line_num: usize, token: &str, kind: IndexKind, available: usize) -> Result<usize, ObjError> {
    let index: i64 = token
        .parse()
        .map_err(|_| ObjError::parse(line_num, format!("invalid {} index '{}'", kind, token)))?;

    match usize::try_from(index) {
        Ok(one_based) if one_based >= 1 && one_based <= available => Ok(one_based - 1),
        _ => Err(ObjError::IndexOutOfRange { line: line_num + 1, kind, index, available }),
    }
}
