//! Imported models with their textures
//!
//! A [`Model`] is an [`ObjScene`] plus every texture its materials reference,
//! decoded once per distinct path.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::assets::{AssetError, ImageData, Material, ObjLoader, ObjObject, ObjScene};
use crate::core::config::ImportConfig;

/// An imported scene and its decoded textures
#[derive(Debug, Clone)]
pub struct Model {
    scene: ObjScene,
    textures: BTreeMap<PathBuf, ImageData>,
}

impl Model {
    /// Import an OBJ file and decode all referenced textures
    ///
    /// Fails if the OBJ, any material library or any texture cannot be loaded.
    pub fn load<P: AsRef<Path>>(path: P, config: &ImportConfig) -> Result<Self, AssetError> {
        let scene = ObjLoader::load_obj(path, config)?;
        Self::from_scene(scene)
    }

    /// Decode the textures of an already imported scene
    pub fn from_scene(scene: ObjScene) -> Result<Self, AssetError> {
        let mut textures = BTreeMap::new();
        for path in Self::texture_paths(&scene.materials) {
            let image = ImageData::from_file(&path)?;
            textures.insert(path, image);
        }

        log::debug!(
            "Model ready: {} object(s), {} material(s), {} texture(s)",
            scene.objects.len(),
            scene.materials.len(),
            textures.len()
        );
        Ok(Self { scene, textures })
    }

    /// Distinct ambient, diffuse and specular map paths across `materials`
    pub fn texture_paths(materials: &[Material]) -> BTreeSet<PathBuf> {
        materials
            .iter()
            .flat_map(|material| material.texture_maps())
            .map(Path::to_path_buf)
            .collect()
    }

    /// Objects in file order
    pub fn objects(&self) -> &[ObjObject] {
        &self.scene.objects
    }

    /// All materials
    pub fn materials(&self) -> &[Material] {
        &self.scene.materials
    }

    /// Decoded textures keyed by resolved path
    pub fn textures(&self) -> &BTreeMap<PathBuf, ImageData> {
        &self.textures
    }

    /// Decoded texture for a material map path
    pub fn texture(&self, path: &Path) -> Option<&ImageData> {
        self.textures.get(path)
    }

    /// Material assigned to `object`, if any
    pub fn material_for(&self, object: &ObjObject) -> Option<&Material> {
        object.material.as_deref().and_then(|name| self.scene.material(name))
    }

    /// The underlying scene
    pub fn scene(&self) -> &ObjScene {
        &self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gl_toolkit_model_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const MTL: &str = "\
newmtl Crate
map_Kd crate.png
map_Ks crate.png
newmtl Metal
map_Ka crate.png
map_Ks steel.png
";

    const OBJ: &str = "\
mtllib box.mtl
v 0 0 0
v 1 0 0
v 0 1 0
o Lid
usemtl Crate
f 1 2 3
o Hinge
f 1 3 2
";

    #[test]
    fn test_load_deduplicates_textures() {
        let dir = temp_dir("dedupe");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]))
            .save(dir.join("crate.png"))
            .unwrap();
        image::RgbaImage::from_pixel(1, 1, image::Rgba([90, 90, 90, 255]))
            .save(dir.join("steel.png"))
            .unwrap();
        std::fs::write(dir.join("box.mtl"), MTL).unwrap();
        std::fs::write(dir.join("box.obj"), OBJ).unwrap();

        let model = Model::load(dir.join("box.obj"), &ImportConfig::default()).unwrap();
        assert_eq!(model.textures().len(), 2);

        let crate_texture = model.texture(&dir.join("crate.png")).unwrap();
        assert_eq!((crate_texture.width, crate_texture.height), (2, 2));
        assert_eq!(crate_texture.pixel(0, 0), Some([200, 100, 50, 255]));

        let lid = &model.objects()[0];
        assert_eq!(model.material_for(lid).map(|m| m.name.as_str()), Some("Crate"));
        assert!(model.material_for(&model.objects()[1]).is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_texture_fails_load() {
        let dir = temp_dir("missing");
        std::fs::write(dir.join("box.mtl"), MTL).unwrap();
        std::fs::write(dir.join("box.obj"), OBJ).unwrap();

        let result = Model::load(dir.join("box.obj"), &ImportConfig::default());
        assert!(matches!(result, Err(AssetError::Resource { .. })));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_texture_paths_are_unique() {
        let materials = crate::assets::MtlParser::parse(MTL, Path::new("models")).unwrap();
        let paths: Vec<_> = Model::texture_paths(&materials).into_iter().collect();
        assert_eq!(paths, vec![PathBuf::from("models/crate.png"), PathBuf::from("models/steel.png")]);
    }

    #[test]
    fn test_scene_without_textures() {
        let scene = ObjLoader::parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n", Path::new(""), &ImportConfig::default())
            .unwrap();
        let model = Model::from_scene(scene).unwrap();
        assert!(model.textures().is_empty());
        assert_eq!(model.scene().triangle_count(), 1);
    }
}
