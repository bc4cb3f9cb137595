//! Baked map classification.
//!
//! Turns the baker's output into the MTL directive table and the list of
//! images that have to land next to the OBJ under `maps/`.

use crate::export::names::clean_map_name;
use crate::types::{BakedMap, MapKind};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Directory, relative to the OBJ/MTL files, holding the map images.
pub const MAPS_DIR: &str = "maps";

/// Extension of exported map images.
pub const MAP_EXTENSION: &str = "bmp";

/// MTL texture directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MtlKey {
    /// `map_Kd`, diffuse color.
    Diffuse,
    /// `norm`, tangent-space normal map.
    Normal,
    /// `map_Ks`, specular.
    Specular,
    /// `map_Pr`, roughness.
    Roughness,
    /// `map_Pm`, metallic.
    Metallic,
    /// `map_Tr`, transparency.
    Opacity,
    /// `map_TrMask`, cutout mask.
    OpacityMask,
    /// `map_Ke`, emission.
    Emissive,
}

impl MtlKey {
    /// Directive text including the separating space, e.g. `"map_Kd "`.
    pub fn directive(self) -> &'static str {
        match self {
            MtlKey::Diffuse => "map_Kd ",
            MtlKey::Normal => "norm ",
            MtlKey::Specular => "map_Ks ",
            MtlKey::Roughness => "map_Pr ",
            MtlKey::Metallic => "map_Pm ",
            MtlKey::Opacity => "map_Tr ",
            MtlKey::OpacityMask => "map_TrMask ",
            MtlKey::Emissive => "map_Ke ",
        }
    }

    /// Keys populated by a map of the given kind, in write order.
    ///
    /// A packed MRS texture feeds specular, roughness and metallic at once.
    pub fn for_kind(kind: MapKind) -> &'static [MtlKey] {
        match kind {
            MapKind::Diffuse => &[MtlKey::Diffuse],
            MapKind::Normal => &[MtlKey::Normal],
            MapKind::Mrs => &[MtlKey::Specular, MtlKey::Roughness, MtlKey::Metallic],
            MapKind::Opacity => &[MtlKey::Opacity],
            MapKind::OpacityMask => &[MtlKey::OpacityMask],
            MapKind::Emissive => &[MtlKey::Emissive],
            MapKind::Unsupported => &[],
        }
    }
}

impl fmt::Display for MtlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive().trim_end())
    }
}

/// Directive table for one material block. Keys are unique and keep the
/// position of their first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MtlTable {
    entries: Vec<(MtlKey, String)>,
}

impl MtlTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `path`, overwriting an earlier value in place.
    pub fn insert(&mut self, key: MtlKey, path: impl Into<String>) {
        let path = path.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((key, path)),
        }
    }

    pub fn get(&self, key: MtlKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, path)| path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MtlKey, &str)> {
        self.entries.iter().map(|(k, path)| (*k, path.as_str()))
    }
}

/// A baked image and the file name it is exported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapImage {
    /// Image the baker wrote.
    pub source: PathBuf,
    /// `<cleanName>.bmp`, placed under [`MAPS_DIR`].
    pub file_name: String,
}

/// Result of classifying one target's baked maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedMaps {
    pub table: MtlTable,
    pub images: Vec<MapImage>,
}

/// Classify baked maps into a directive table plus the images to export.
///
/// Maps of an unsupported kind are skipped.
pub fn classify_maps(maps: &[BakedMap]) -> ClassifiedMaps {
    let mut out = ClassifiedMaps::default();

    for map in maps {
        let keys = MtlKey::for_kind(map.kind);
        if keys.is_empty() {
            debug!(asset = %map.source_asset_name, "skipping map with no MTL directive");
            continue;
        }

        let file_name = format!("{}.{}", clean_map_name(&map.source_asset_name), MAP_EXTENSION);
        let relative = format!("{}/{}", MAPS_DIR, file_name);
        for &key in keys {
            out.table.insert(key, relative.clone());
        }

        if !out.images.iter().any(|image| image.file_name == file_name) {
            out.images.push(MapImage {
                source: map.image_path.clone(),
                file_name,
            });
        }
    }

    out
}

/// Classify baked maps into a directive table.
pub fn classify(maps: &[BakedMap]) -> MtlTable {
    classify_maps(maps).table
}
