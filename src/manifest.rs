//! Precomputed merge and bake results loaded from JSON.
//!
//! A manifest lists components with their already-merged LOD meshes and the
//! images a baker already wrote. It stands in for both collaborators so a
//! batch can run outside the host application.
//!
//! ```json
//! {
//!   "components": [{
//!     "name": "Rock",
//!     "world_offset": [100.0, 0.0, 50.0],
//!     "lods": [{
//!       "mesh": { "vertices": [...], "indices": [...], "sections": [...] },
//!       "maps": [{ "asset": "T_Rock_LOD0_Diffuse", "path": "bake/rock_d.png" }]
//!     }]
//!   }]
//! }
//! ```

use crate::config::MergeSettings;
use crate::error::{ExportError, Result};
use crate::mesh::MergedMesh;
use crate::session::{ComponentSource, MaterialBaker, MeshMerger};
use crate::types::{BakedMap, MapKind};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub components: Vec<ManifestComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestComponent {
    /// Defaults to `<name>#<position>`.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub world_offset: Vec3,
    pub lods: Vec<ManifestLod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestLod {
    /// `None` when the merge produced nothing for this LOD.
    #[serde(default)]
    pub mesh: Option<MergedMesh>,
    #[serde(default)]
    pub maps: Vec<ManifestMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMap {
    /// Inferred from the asset name suffix when absent.
    #[serde(default)]
    pub kind: Option<MapKind>,
    pub asset: String,
    /// Relative paths are resolved against the manifest's directory.
    pub path: PathBuf,
}

impl Manifest {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a manifest and resolve map paths relative to its directory.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut manifest = Self::from_json_str(&fs::read_to_string(path)?)?;
        if let Some(base) = path.parent() {
            manifest.resolve_paths(base);
        }
        Ok(manifest)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for component in &mut self.components {
            for lod in &mut component.lods {
                for map in &mut lod.maps {
                    if map.path.is_relative() {
                        map.path = base.join(&map.path);
                    }
                }
            }
        }
    }

    fn component_id(index: usize, component: &ManifestComponent) -> String {
        component
            .id
            .clone()
            .unwrap_or_else(|| format!("{}#{}", component.name, index))
    }

    /// Flat component list to hand to an export session.
    pub fn components(&self) -> Vec<ComponentSource> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| ComponentSource {
                id: Self::component_id(i, c),
                base_name: c.name.clone(),
                world_offset: c.world_offset,
                lod_count: c.lods.len() as u32,
            })
            .collect()
    }

    fn lod(&self, component: &ComponentSource, lod_index: u32) -> Result<&ManifestLod> {
        let entry = self
            .components
            .iter()
            .enumerate()
            .find(|(i, c)| Self::component_id(*i, c) == component.id)
            .map(|(_, c)| c)
            .ok_or_else(|| ExportError::Export(format!("unknown component '{}'", component.id)))?;
        entry.lods.get(lod_index as usize).ok_or_else(|| {
            ExportError::Export(format!("component '{}' has no LOD {}", component.id, lod_index))
        })
    }
}

impl MeshMerger for Manifest {
    fn merge(&self, component: &ComponentSource, settings: &MergeSettings) -> Result<Option<MergedMesh>> {
        Ok(self.lod(component, settings.lod_index)?.mesh.clone())
    }
}

impl MaterialBaker for Manifest {
    /// Maps whose kind was not requested are left out, as a baker with that
    /// channel switched off would.
    fn bake(&self, component: &ComponentSource, settings: &MergeSettings) -> Result<Vec<BakedMap>> {
        let lod = self.lod(component, settings.lod_index)?;
        Ok(lod
            .maps
            .iter()
            .map(|m| match m.kind {
                Some(kind) => BakedMap::new(kind, m.asset.clone(), m.path.clone()),
                None => BakedMap::from_asset(m.asset.clone(), m.path.clone()),
            })
            .filter(|map| map.kind == MapKind::Unsupported || settings.wants(map.kind))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;

    const MANIFEST: &str = r#"{
        "components": [
            {
                "name": "Rock",
                "world_offset": [1.0, 2.0, 3.0],
                "lods": [
                    {
                        "mesh": {
                            "vertices": [
                                { "position": [0, 0, 0], "normal": [0, 0, 1], "uv": [0, 0] },
                                { "position": [1, 0, 0], "normal": [0, 0, 1], "uv": [1, 0] },
                                { "position": [1, 1, 0], "normal": [0, 0, 1], "uv": [1, 1] }
                            ],
                            "indices": [0, 1, 2],
                            "sections": [{ "first_index": 0, "material_slot_name": "Body" }]
                        },
                        "maps": [
                            { "asset": "T_Rock_LOD0_Diffuse", "path": "bake/d.png" },
                            { "asset": "T_Rock_LOD0_Emissive", "path": "/abs/e.png" },
                            { "kind": "Normal", "asset": "T_Rock_LOD0_N", "path": "bake/n.png" }
                        ]
                    },
                    {}
                ]
            },
            { "id": "second", "name": "Rock", "lods": [] }
        ]
    }"#;

    #[test]
    fn test_components() {
        let manifest = Manifest::from_json_str(MANIFEST).unwrap();
        let components = manifest.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].id, "Rock#0");
        assert_eq!(components[0].lod_count, 2);
        assert_eq!(components[0].world_offset, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(components[1].id, "second");
    }

    #[test]
    fn test_merge_returns_lod_mesh() {
        let manifest = Manifest::from_json_str(MANIFEST).unwrap();
        let rock = &manifest.components()[0];
        let config = ExportConfig::default();

        let mesh = manifest.merge(rock, &config.merge_settings(0)).unwrap().unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert!(manifest.merge(rock, &config.merge_settings(1)).unwrap().is_none());
        assert!(manifest.merge(rock, &config.merge_settings(2)).is_err());
    }

    #[test]
    fn test_bake_honours_toggles() {
        let mut manifest = Manifest::from_json_str(MANIFEST).unwrap();
        manifest.resolve_paths(Path::new("/project"));
        let rock = &manifest.components()[0];

        let maps = manifest.bake(rock, &ExportConfig::default().merge_settings(0)).unwrap();
        let kinds: Vec<MapKind> = maps.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MapKind::Diffuse, MapKind::Normal]);
        assert_eq!(maps[0].image_path, PathBuf::from("/project/bake/d.png"));

        let config = ExportConfig {
            export_emissive_map: true,
            ..ExportConfig::default()
        };
        let maps = manifest.bake(rock, &config.merge_settings(0)).unwrap();
        assert_eq!(maps.len(), 3);
        assert_eq!(maps[1].image_path, PathBuf::from("/abs/e.png"));
    }
}
