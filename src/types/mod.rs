//! Shared types used throughout the library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Semantic kind of a baked material map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapKind {
    Diffuse,
    Normal,
    /// Metallic, roughness and specular packed into one texture.
    #[serde(rename = "MRS")]
    Mrs,
    Opacity,
    OpacityMask,
    Emissive,
    /// A channel the exporter has no MTL directive for.
    #[serde(other)]
    Unsupported,
}

impl MapKind {
    /// Every kind the exporter writes a directive for.
    pub const SUPPORTED: [MapKind; 6] = [
        MapKind::Diffuse,
        MapKind::Normal,
        MapKind::Mrs,
        MapKind::Opacity,
        MapKind::OpacityMask,
        MapKind::Emissive,
    ];

    /// Name suffix the baking step appends to assets of this kind.
    pub fn suffix(self) -> &'static str {
        match self {
            MapKind::Diffuse => "Diffuse",
            MapKind::Normal => "Normal",
            MapKind::Mrs => "MRS",
            MapKind::Opacity => "Opacity",
            MapKind::OpacityMask => "OpacityMask",
            MapKind::Emissive => "Emissive",
            MapKind::Unsupported => "",
        }
    }

    /// Classify an asset by the last `_`-separated token of its name.
    ///
    /// `T_Rock_LOD0_Normal` is a normal map; anything without a known
    /// suffix is [`MapKind::Unsupported`].
    pub fn from_asset_name(name: &str) -> Self {
        let last = name.rsplit('_').find(|part| !part.is_empty()).unwrap_or("");
        Self::SUPPORTED
            .into_iter()
            .find(|kind| kind.suffix() == last)
            .unwrap_or(MapKind::Unsupported)
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKind::Unsupported => f.write_str("Unsupported"),
            kind => f.write_str(kind.suffix()),
        }
    }
}

/// A texture map produced by the baking step for one export target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedMap {
    /// Which material channel the map carries.
    pub kind: MapKind,
    /// Asset name the baker gave the texture, e.g. `T_Rock_LOD0_Diffuse`.
    pub source_asset_name: String,
    /// Where the baker wrote the image.
    pub image_path: PathBuf,
}

impl BakedMap {
    pub fn new(kind: MapKind, source_asset_name: impl Into<String>, image_path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            source_asset_name: source_asset_name.into(),
            image_path: image_path.into(),
        }
    }

    /// Build a map whose kind is inferred from the asset name suffix.
    pub fn from_asset(source_asset_name: impl Into<String>, image_path: impl Into<PathBuf>) -> Self {
        let source_asset_name = source_asset_name.into();
        let kind = MapKind::from_asset_name(&source_asset_name);
        Self::new(kind, source_asset_name, image_path)
    }
}
