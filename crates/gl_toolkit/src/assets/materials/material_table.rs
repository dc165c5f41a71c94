//! Plain-text material tables
//!
//! One material per row: the name (which may span several tokens) followed
//! by ten numbers, `ar ag ab dr dg db sr sg sb shininess`. Shininess is
//! given in [0, 1] and scaled on load.

use std::path::Path;

use super::mtl_parser::{Material, MtlError, MtlParser};
use crate::foundation::math::Vec3;

const VALUES_PER_ROW: usize = 10;

/// Parser for material table text
pub struct MaterialTable;

impl MaterialTable {
    /// Parse a material table, multiplying each shininess by `shininess_scale`
    pub fn parse(contents: &str, shininess_scale: f32) -> Result<Vec<Material>, MtlError> {
        let mut materials = Vec::new();

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() <= VALUES_PER_ROW {
                return Err(MtlError::parse(
                    line_num,
                    format!("expected a name and {} values, found {} tokens", VALUES_PER_ROW, tokens.len()),
                ));
            }

            let (name, values) = tokens.split_at(tokens.len() - VALUES_PER_ROW);
            let mut values = values.iter().copied();
            let mut data = [0.0_f32; VALUES_PER_ROW];
            for value in &mut data {
                *value = MtlParser::parse_f32(&mut values, line_num, "material table")?;
            }

            materials.push(
                Material::new(name.join(" "))
                    .with_colors(
                        Vec3::new(data[0], data[1], data[2]),
                        Vec3::new(data[3], data[4], data[5]),
                        Vec3::new(data[6], data[7], data[8]),
                    )
                    .with_shininess(data[9] * shininess_scale),
            );
        }

        log::debug!("Parsed {} material(s) from material table", materials.len());
        Ok(materials)
    }

    /// Read and parse a material table file
    pub fn load<P: AsRef<Path>>(path: P, shininess_scale: f32) -> Result<Vec<Material>, crate::assets::AssetError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| crate::assets::AssetError::Resource {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let materials = Self::parse(&contents, shininess_scale)?;
        log::info!("Loaded {} material(s) from {:?}", materials.len(), path);
        Ok(materials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TABLE: &str = "\
emerald 0.0215 0.1745 0.0215 0.07568 0.61424 0.07568 0.633 0.727811 0.633 0.6
# metals
yellow rubber 0.05 0.05 0.0 0.5 0.5 0.4 0.7 0.7 0.04 .078125
";

    #[test]
    fn test_parse_rows() {
        let materials = MaterialTable::parse(TABLE, 128.0).unwrap();
        assert_eq!(materials.len(), 2);

        let emerald = &materials[0];
        assert_eq!(emerald.name, "emerald");
        assert_eq!(emerald.ambient, Vec3::new(0.0215, 0.1745, 0.0215));
        assert_eq!(emerald.specular, Vec3::new(0.633, 0.727811, 0.633));
        assert_relative_eq!(emerald.shininess, 76.8, epsilon = 1e-4);

        let rubber = &materials[1];
        assert_eq!(rubber.name, "yellow rubber");
        assert_eq!(rubber.diffuse, Vec3::new(0.5, 0.5, 0.4));
        assert_relative_eq!(rubber.shininess, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_custom_scale() {
        let materials = MaterialTable::parse(TABLE, 1.0).unwrap();
        assert_relative_eq!(materials[0].shininess, 0.6);
    }

    #[test]
    fn test_short_row_fails() {
        let result = MaterialTable::parse("\nshort 1 2 3\n", 128.0);
        assert!(matches!(result, Err(MtlError::Parse { line: 2, .. })));

        // Ten numbers but no name
        let result = MaterialTable::parse("1 2 3 4 5 6 7 8 9 10", 128.0);
        assert!(matches!(result, Err(MtlError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_non_numeric_value_fails() {
        let result = MaterialTable::parse("bad 1 2 3 4 5 6 7 8 nine 10", 128.0);
        match result {
            Err(MtlError::Parse { message, .. }) => assert!(message.contains("nine")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
