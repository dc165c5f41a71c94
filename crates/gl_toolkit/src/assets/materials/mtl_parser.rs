//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl text into [`Material`]s for the Phong lighting
//! model. Supports the color records, shininess, opacity and the ambient,
//! diffuse and specular texture maps; every other record is ignored.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::render::uniforms::{UniformSink, UniformValue};

/// Errors from MTL text and material tables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MtlError {
    /// Malformed record: missing or unparsable value
    #[error("Line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A material property appeared before any `newmtl`
    #[error("Line {line}: `{record}` appears before any newmtl")]
    PropertyBeforeNewmtl {
        /// 1-based line number
        line: usize,
        /// The offending record keyword
        record: String,
    },
}

impl MtlError {
    pub(crate) fn parse(line_num: usize, message: impl Into<String>) -> Self {
        Self::Parse { line: line_num + 1, message: message.into() }
    }
}

/// A Phong material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name, unique within its library
    pub name: String,
    /// Ambient color (Ka)
    pub ambient: Vec3,
    /// Diffuse color (Kd)
    pub diffuse: Vec3,
    /// Specular color (Ks)
    pub specular: Vec3,
    /// Specular exponent (Ns)
    pub shininess: f32,
    /// Dissolve/opacity (d) - 0.0 = transparent, 1.0 = opaque
    pub dissolve: f32,
    /// Ambient texture map (map_Ka), relative to the MTL file's directory
    pub ambient_map: Option<PathBuf>,
    /// Diffuse texture map (map_Kd)
    pub diffuse_map: Option<PathBuf>,
    /// Specular texture map (map_Ks)
    pub specular_map: Option<PathBuf>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::new(1.0, 1.0, 1.0),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::new(0.5, 0.5, 0.5),
            shininess: 32.0,
            dissolve: 1.0,
            ambient_map: None,
            diffuse_map: None,
            specular_map: None,
        }
    }
}

impl Material {
    /// Create a material with default properties
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Set the three Phong colors
    pub fn with_colors(mut self, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    /// Set the specular exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Texture maps referenced by this material, ambient first
    pub fn texture_maps(&self) -> impl Iterator<Item = &Path> {
        [&self.ambient_map, &self.diffuse_map, &self.specular_map]
            .into_iter()
            .filter_map(|map| map.as_deref())
    }

    /// Write `material.ambient`, `material.diffuse`, `material.specular`
    /// and `material.shininess`
    pub fn apply_uniforms(&self, sink: &mut impl UniformSink) {
        sink.set_uniform("material.ambient", UniformValue::Vec3(self.ambient));
        sink.set_uniform("material.diffuse", UniformValue::Vec3(self.diffuse));
        sink.set_uniform("material.specular", UniformValue::Vec3(self.specular));
        sink.set_uniform("material.shininess", UniformValue::Float(self.shininess));
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL file contents into materials, in declaration order
    ///
    /// # Arguments
    /// * `contents` - The text contents of the MTL file
    /// * `base_dir` - Directory of the MTL file; texture paths are resolved against it
    ///
    /// A repeated `newmtl` name replaces the earlier definition.
    pub fn parse(contents: &str, base_dir: &Path) -> Result<Vec<Material>, MtlError> {
        let mut materials: Vec<Material> = Vec::new();
        let mut current_material: Option<Material> = None;

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let command = match tokens.next() {
                Some(cmd) => cmd,
                None => continue,
            };
            // Keywords are case-insensitive: `Kd`, `kd` and `KD` are the same record
            let keyword = command.to_ascii_lowercase();

            if keyword == "newmtl" {
                if let Some(mat) = current_material.take() {
                    Self::push(&mut materials, mat);
                }

                let name: Vec<&str> = tokens.collect();
                if name.is_empty() {
                    return Err(MtlError::parse(line_num, "newmtl missing material name"));
                }
                current_material = Some(Material::new(name.join(" ")));
                continue;
            }

            if !Self::is_property(&keyword) {
                log::trace!("Ignoring MTL record '{}' on line {}", command, line_num + 1);
                continue;
            }

            let Some(mat) = current_material.as_mut() else {
                return Err(MtlError::PropertyBeforeNewmtl { line: line_num + 1, record: command.to_string() });
            };

            match keyword.as_str() {
                "ka" => mat.ambient = Self::parse_vec3(&mut tokens, line_num, command)?,
                "kd" => mat.diffuse = Self::parse_vec3(&mut tokens, line_num, command)?,
                "ks" => mat.specular = Self::parse_vec3(&mut tokens, line_num, command)?,
                "ns" => mat.shininess = Self::parse_f32(&mut tokens, line_num, command)?,
                "d" => mat.dissolve = Self::parse_f32(&mut tokens, line_num, command)?,
                // Transparency (inverted dissolve)
                "tr" => mat.dissolve = 1.0 - Self::parse_f32(&mut tokens, line_num, command)?,
                "map_ka" => mat.ambient_map = Some(Self::parse_texture_path(&mut tokens, line_num, command, base_dir)?),
                "map_kd" => mat.diffuse_map = Some(Self::parse_texture_path(&mut tokens, line_num, command, base_dir)?),
                "map_ks" => mat.specular_map = Some(Self::parse_texture_path(&mut tokens, line_num, command, base_dir)?),
                _ => {}
            }
        }

        if let Some(mat) = current_material {
            Self::push(&mut materials, mat);
        }

        log::debug!("Parsed {} material(s) from MTL text", materials.len());
        Ok(materials)
    }

    fn is_property(keyword: &str) -> bool {
        matches!(keyword, "ka" | "kd" | "ks" | "ns" | "d" | "tr" | "map_ka" | "map_kd" | "map_ks")
    }

    fn push(materials: &mut Vec<Material>, material: Material) {
        match materials.iter_mut().find(|existing| existing.name == material.name) {
            Some(existing) => {
                log::warn!("Material '{}' defined more than once, keeping the last definition", material.name);
                *existing = material;
            }
            None => materials.push(material),
        }
    }

    /// Parse a Vec3 color from RGB tokens
    fn parse_vec3<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<Vec3, MtlError>
    where
        I: Iterator<Item = &'a str>,
    {
        let r = Self::parse_f32(tokens, line_num, command)?;
        let g = Self::parse_f32(tokens, line_num, command)?;
        let b = Self::parse_f32(tokens, line_num, command)?;
        Ok(Vec3::new(r, g, b))
    }

    /// Parse a single f32 value
    pub(crate) fn parse_f32<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<f32, MtlError>
    where
        I: Iterator<Item = &'a str>,
    {
        let token = tokens
            .next()
            .ok_or_else(|| MtlError::parse(line_num, format!("{} missing value", command)))?;
        token
            .parse::<f32>()
            .map_err(|_| MtlError::parse(line_num, format!("{} invalid float value '{}'", command, token)))
    }

    /// Parse texture file path (may contain spaces, take rest of line)
    fn parse_texture_path<'a, I>(
        tokens: &mut I,
        line_num: usize,
        command: &str,
        base_dir: &Path,
    ) -> Result<PathBuf, MtlError>
    where
        I: Iterator<Item = &'a str>,
    {
        let path: Vec<&str> = tokens.collect();
        if path.is_empty() {
            return Err(MtlError::parse(line_num, format!("{} missing texture path", command)));
        }
        Ok(base_dir.join(path.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(text: &str) -> Vec<Material> {
        MtlParser::parse(text, Path::new("")).unwrap()
    }

    #[test]
    fn test_parse_wood() {
        let materials = parse(
            r#"
newmtl Wood
Ka 0.2 0.2 0.2
Kd 0.5 0.3 0.1
Ks 0.1 0.1 0.1
"#,
        );
        assert_eq!(materials.len(), 1);

        let mat = &materials[0];
        assert_eq!(mat.name, "Wood");
        assert_eq!(mat.ambient, Vec3::new(0.2, 0.2, 0.2));
        assert_eq!(mat.diffuse, Vec3::new(0.5, 0.3, 0.1));
        assert_eq!(mat.specular, Vec3::new(0.1, 0.1, 0.1));
        assert_eq!(mat.texture_maps().count(), 0);
    }

    #[test]
    fn test_texture_paths_resolve_against_base_dir() {
        let text = r#"
newmtl Crate
map_Kd textures/crate diffuse.png
map_Ks specular.png
"#;
        let materials = MtlParser::parse(text, Path::new("assets/models")).unwrap();
        let mat = &materials[0];

        assert_eq!(mat.diffuse_map, Some(PathBuf::from("assets/models/textures/crate diffuse.png")));
        assert_eq!(mat.specular_map, Some(PathBuf::from("assets/models/specular.png")));
        assert_eq!(mat.ambient_map, None);
        assert_eq!(mat.texture_maps().count(), 2);
    }

    #[test]
    fn test_parse_multiple_materials_in_order() {
        let materials = parse(
            r#"
newmtl Material1
Kd 1.0 0.0 0.0

newmtl Material2
Kd 0.0 1.0 0.0
"#,
        );
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].name, "Material1");
        assert_eq!(materials[1].diffuse, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_shininess_and_transparency() {
        let materials = parse(
            r#"
newmtl Glass
Ns 96.0
Tr 0.3
illum 4
Ni 1.5
"#,
        );
        let mat = &materials[0];
        assert_eq!(mat.shininess, 96.0);
        // Tr = 1.0 - d, so Tr 0.3 means d = 0.7
        assert!((mat.dissolve - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_defaults_for_unset_properties() {
        let mat = &parse("newmtl Plain\n")[0];
        assert_eq!(mat.ambient, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(mat.shininess, 32.0);
        assert_eq!(mat.dissolve, 1.0);
    }

    #[test]
    fn test_property_before_newmtl_fails() {
        let result = MtlParser::parse("# header\nKd 1 1 1\nnewmtl Late\n", Path::new(""));
        assert_eq!(
            result,
            Err(MtlError::PropertyBeforeNewmtl { line: 2, record: "Kd".to_string() })
        );
    }

    #[test]
    fn test_unknown_record_before_newmtl_is_ignored() {
        let materials = parse("illum 2\nnewmtl A\n");
        assert_eq!(materials.len(), 1);
    }

    #[test]
    fn test_invalid_float_reports_line() {
        let result = MtlParser::parse("newmtl A\nKs 0.1 oops 0.1\n", Path::new(""));
        match result {
            Err(MtlError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("oops"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }

        let result = MtlParser::parse("newmtl A\nKa 0.1 0.2\n", Path::new(""));
        assert!(matches!(result, Err(MtlError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let materials = parse(
            r#"
NEWMTL Mixed
ka 0.1 0.2 0.3
KD 1 0 0
kd 0 1 0
kS 0.4 0.4 0.4
NS 12
TR 0.25
Map_kd tex.png
"#,
        );
        assert_eq!(materials.len(), 1);

        let mat = &materials[0];
        assert_eq!(mat.name, "Mixed");
        assert_eq!(mat.ambient, Vec3::new(0.1, 0.2, 0.3));
        // Last diffuse record wins
        assert_eq!(mat.diffuse, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(mat.specular, Vec3::new(0.4, 0.4, 0.4));
        assert_eq!(mat.shininess, 12.0);
        assert!((mat.dissolve - 0.75).abs() < 0.001);
        assert_eq!(mat.diffuse_map, Some(PathBuf::from("tex.png")));
    }

    #[test]
    fn test_lowercase_property_before_newmtl_fails() {
        let result = MtlParser::parse("kd 1 1 1
", Path::new(""));
        assert_eq!(result, Err(MtlError::PropertyBeforeNewmtl { line: 1, record: "kd".to_string() }));
    }

    #[test]
    fn test_redefinition_replaces_material() {
        let materials = parse("newmtl A\nKd 1 0 0\nnewmtl A\nKd 0 0 1\n");
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].diffuse, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_apply_uniforms() {
        let mat = Material::new("Gold").with_shininess(51.2);
        let mut sink: HashMap<String, UniformValue> = HashMap::new();
        mat.apply_uniforms(&mut sink);

        assert_eq!(sink.len(), 4);
        assert_eq!(sink.get("material.shininess"), Some(&UniformValue::Float(51.2)));
        assert_eq!(sink.get("material.diffuse"), Some(&UniformValue::Vec3(mat.diffuse)));
    }
}
