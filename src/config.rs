//! Export configuration.
//!
//! Everything the merge/bake/export run needs from the caller lives in one
//! immutable [`ExportConfig`], passed into each batch.

use crate::error::{ExportError, Result};
use crate::types::MapKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest baked texture edge accepted.
pub const MAX_TEXTURE_SIZE: u32 = 16384;

/// Folder under the output root holding OBJ and MTL files.
pub const OUTPUT_FOLDER: &str = "GetObjandMaterial";

/// Caller-supplied export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Baked texture size (width, height).
    pub texture_size: (u32, u32),
    /// Bake materials using mesh vertex data.
    pub use_vertex_data_for_baking: bool,
    /// Merge physics data along with the render mesh.
    pub merge_physics_data: bool,
    pub export_normal_map: bool,
    /// Metallic/roughness/specular packed map.
    pub export_mrs_map: bool,
    /// Drives both the opacity and the opacity-mask maps.
    pub export_opacity_map: bool,
    pub export_emissive_map: bool,
    /// Give repeated exports of one mesh distinct `_ACTOR<n>` names.
    pub instancing_multi_actors: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            texture_size: (1024, 1024),
            use_vertex_data_for_baking: true,
            merge_physics_data: false,
            export_normal_map: true,
            export_mrs_map: true,
            export_opacity_map: true,
            export_emissive_map: false,
            instancing_multi_actors: true,
        }
    }
}

impl ExportConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Create config with a specific texture size.
    pub fn with_texture_size(mut self, width: u32, height: u32) -> Self {
        self.texture_size = (width, height);
        self
    }

    /// Create config with instanced naming switched on or off.
    pub fn with_instancing(mut self, enabled: bool) -> Self {
        self.instancing_multi_actors = enabled;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.texture_size;
        let valid = 1..=MAX_TEXTURE_SIZE;
        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(ExportError::InvalidConfig(format!(
                "texture size {}x{} outside 1..={}",
                width, height, MAX_TEXTURE_SIZE
            )));
        }
        Ok(())
    }

    /// Map kinds to request from the baker. Diffuse is always baked.
    pub fn requested_map_kinds(&self) -> Vec<MapKind> {
        let mut kinds = vec![MapKind::Diffuse];
        if self.export_normal_map {
            kinds.push(MapKind::Normal);
        }
        if self.export_mrs_map {
            kinds.push(MapKind::Mrs);
        }
        if self.export_opacity_map {
            kinds.push(MapKind::Opacity);
            kinds.push(MapKind::OpacityMask);
        }
        if self.export_emissive_map {
            kinds.push(MapKind::Emissive);
        }
        kinds
    }

    /// Merge request for one LOD of a component.
    pub fn merge_settings(&self, lod_index: u32) -> MergeSettings {
        MergeSettings {
            lod_index,
            texture_size: self.texture_size,
            use_vertex_data_for_baking: self.use_vertex_data_for_baking,
            merge_physics_data: self.merge_physics_data,
            map_kinds: self.requested_map_kinds(),
        }
    }
}

/// What the merge and bake steps are asked to produce for one LOD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSettings {
    /// The specific LOD to merge.
    pub lod_index: u32,
    pub texture_size: (u32, u32),
    pub use_vertex_data_for_baking: bool,
    pub merge_physics_data: bool,
    /// Material channels to bake.
    pub map_kinds: Vec<MapKind>,
}

impl MergeSettings {
    pub fn wants(&self, kind: MapKind) -> bool {
        self.map_kinds.contains(&kind)
    }
}

/// Output directory layout rooted at a project folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<root>/GetObjandMaterial`, holding OBJ and MTL files.
    pub fn model_dir(&self) -> PathBuf {
        self.root.join(OUTPUT_FOLDER)
    }

    /// `<root>/GetObjandMaterial/maps`, holding baked images.
    pub fn maps_dir(&self) -> PathBuf {
        self.model_dir().join(crate::export::maps::MAPS_DIR)
    }

    /// Create both output directories.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(self.maps_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.texture_size, (1024, 1024));
        assert!(config.instancing_multi_actors);
        assert!(!config.export_emissive_map);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_texture_size_range() {
        assert!(ExportConfig::default().with_texture_size(1, 16384).validate().is_ok());
        assert!(matches!(
            ExportConfig::default().with_texture_size(0, 512).validate(),
            Err(ExportError::InvalidConfig(_))
        ));
        assert!(ExportConfig::default().with_texture_size(512, 16385).validate().is_err());
    }

    #[test]
    fn test_requested_kinds_follow_toggles() {
        let config = ExportConfig::default();
        assert_eq!(
            config.requested_map_kinds(),
            vec![MapKind::Diffuse, MapKind::Normal, MapKind::Mrs, MapKind::Opacity, MapKind::OpacityMask]
        );

        let config = ExportConfig {
            export_normal_map: false,
            export_mrs_map: false,
            export_opacity_map: false,
            export_emissive_map: true,
            ..ExportConfig::default()
        };
        assert_eq!(config.requested_map_kinds(), vec![MapKind::Diffuse, MapKind::Emissive]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExportConfig =
            serde_json::from_str(r#"{ "texture_size": [2048, 512], "export_emissive_map": true }"#).unwrap();
        assert_eq!(config.texture_size, (2048, 512));
        assert!(config.export_emissive_map);
        assert!(config.export_normal_map);
    }

    #[test]
    fn test_merge_settings() {
        let settings = ExportConfig::default().merge_settings(2);
        assert_eq!(settings.lod_index, 2);
        assert!(settings.wants(MapKind::Mrs));
        assert!(!settings.wants(MapKind::Emissive));
    }

    #[test]
    fn test_layout() {
        let layout = OutputLayout::new("/project/Content");
        assert_eq!(layout.model_dir(), PathBuf::from("/project/Content/GetObjandMaterial"));
        assert_eq!(layout.maps_dir(), PathBuf::from("/project/Content/GetObjandMaterial/maps"));
    }
}
