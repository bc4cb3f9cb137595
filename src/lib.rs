//! # Merge OBJ Export
//!
//! Writes merged, per-LOD meshes and their baked material maps as Wavefront
//! OBJ/MTL file sets.
//!
//! ## Overview
//!
//! Mesh merging and material baking happen elsewhere; this library takes
//! their results (a [`MergedMesh`] and a list of [`BakedMap`]s per component
//! LOD) and produces a self-consistent `.obj`, a matching `.mtl` and BMP map
//! images, named so that repeated exports of one mesh never collide.
//!
//! ## Quick Start
//!
//! ```ignore
//! use merge_obj_export::{ExportConfig, ExportSession, Manifest, NamingRegistry, OutputLayout};
//! use std::sync::atomic::AtomicBool;
//!
//! let manifest = Manifest::from_json_file("merged/manifest.json")?;
//! let mut registry = NamingRegistry::new();
//! let mut session = ExportSession::new(
//!     ExportConfig::default(),
//!     OutputLayout::new("MyProject/Content"),
//!     &mut registry,
//! )?;
//!
//! let report = session.run(
//!     &manifest.components(),
//!     &manifest,
//!     &manifest,
//!     &mut |index, total| println!("{}/{}", index + 1, total),
//!     &AtomicBool::new(false),
//! )?;
//! println!("{}", report.summary());
//! ```
//!
//! ## Single files
//!
//! The writers can be used directly:
//!
//! ```ignore
//! use merge_obj_export::{classify, write_mtl, write_obj};
//!
//! let groups = write_obj(&mesh, offset, Path::new("out/Rock_LOD0.obj"))?;
//! write_mtl(&groups[0], &classify(&maps), Path::new("out/Rock_LOD0.mtl"))?;
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod manifest;
pub mod mesh;
pub mod naming;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use config::{ExportConfig, MergeSettings, OutputLayout};
pub use error::{ExportError, Result};
pub use export::{classify, render_mtl, render_obj, write_mtl, write_obj, MtlKey, MtlTable, ObjDocument};
pub use manifest::Manifest;
pub use mesh::{MaterialSection, MergedMesh, MeshVertex};
pub use naming::{ExportTarget, NamingRegistry};
pub use session::{
    BatchReport, ComponentSource, ExportMode, ExportSession, ExportedItem, ItemFailure, MaterialBaker, MeshMerger,
};
pub use types::{BakedMap, MapKind};
