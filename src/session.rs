//! Batch export of selected components.
//!
//! An [`ExportSession`] walks every component and every LOD in order, asks
//! the merge and bake collaborators for their output, and writes one OBJ/MTL
//! pair plus map images per item. A failing item is recorded and the batch
//! moves on; completed items are never rolled back. Files a failing item had
//! already created are removed, so an item either lands whole or not at all.

use crate::config::{ExportConfig, MergeSettings, OutputLayout};
use crate::error::{ExportError, Result};
use crate::export::bmp::convert_to_bmp;
use crate::export::maps::{classify_maps, MapImage};
use crate::export::mtl::render_mtl;
use crate::export::names::clean_path_filename;
use crate::export::obj::render_obj;
use crate::mesh::MergedMesh;
use crate::naming::{ExportTarget, NamingRegistry};
use crate::types::BakedMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// A component selected for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSource {
    /// Caller-side identifier, used in reports.
    pub id: String,
    /// Short name of the source mesh; output files are named after it.
    pub base_name: String,
    /// World-space location baked into exported positions.
    #[serde(default)]
    pub world_offset: Vec3,
    /// Number of LODs to export.
    pub lod_count: u32,
}

/// Produces a merged mesh for one component LOD.
pub trait MeshMerger {
    /// `Ok(None)` means the merge produced nothing to export.
    fn merge(&self, component: &ComponentSource, settings: &MergeSettings) -> Result<Option<MergedMesh>>;
}

/// Bakes the material maps for one component LOD.
pub trait MaterialBaker {
    fn bake(&self, component: &ComponentSource, settings: &MergeSettings) -> Result<Vec<BakedMap>>;
}

/// Whether a run writes files or only drives the merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Merge every LOD without writing OBJ/MTL output.
    MergeOnly,
    /// Merge, bake and write OBJ/MTL pairs with their maps.
    #[default]
    MergeAndExport,
}

/// Files written for one component LOD.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedItem {
    pub component: String,
    pub target: ExportTarget,
    pub obj_path: PathBuf,
    pub mtl_path: PathBuf,
    /// Name of the single material block in the MTL file.
    pub material_group: String,
    pub map_paths: Vec<PathBuf>,
}

/// A component LOD that could not be exported.
#[derive(Debug)]
pub struct ItemFailure {
    pub component: String,
    pub lod_index: u32,
    pub error: ExportError,
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub exported: Vec<ExportedItem>,
    /// Items merged in [`ExportMode::MergeOnly`].
    pub merged: usize,
    /// Items for which the merge produced nothing.
    pub skipped: usize,
    pub failures: Vec<ItemFailure>,
    /// The run stopped early on the cancel flag.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    /// One-line end-of-batch notification.
    pub fn summary(&self) -> String {
        let mut text = if self.merged > 0 {
            format!("Merged {} item(s)", self.merged)
        } else {
            format!("Exported {} item(s)", self.exported.len())
        };
        if self.skipped > 0 {
            text.push_str(&format!(", {} skipped", self.skipped));
        }
        if !self.failures.is_empty() {
            text.push_str(&format!(", {} failed", self.failures.len()));
        }
        if self.cancelled {
            text.push_str(" (cancelled)");
        }
        text
    }
}

enum ItemOutcome {
    Exported(ExportedItem),
    Merged,
    Skipped,
}

/// Runs merge-and-export batches against a caller-owned naming registry.
pub struct ExportSession<'r> {
    config: ExportConfig,
    layout: OutputLayout,
    registry: &'r mut NamingRegistry,
    mode: ExportMode,
}

impl<'r> ExportSession<'r> {
    /// Create a session. Fails if the config is out of range.
    pub fn new(config: ExportConfig, layout: OutputLayout, registry: &'r mut NamingRegistry) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            layout,
            registry,
            mode: ExportMode::default(),
        })
    }

    pub fn with_mode(mut self, mode: ExportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Export every LOD of every component, in order.
    ///
    /// `progress` is called with `(index, total)` before each item. The
    /// `cancel` flag is checked between items; once set the run stops and
    /// the report is marked cancelled.
    pub fn run<M, B>(
        &mut self,
        components: &[ComponentSource],
        merger: &M,
        baker: &B,
        progress: &mut dyn FnMut(usize, usize),
        cancel: &AtomicBool,
    ) -> Result<BatchReport>
    where
        M: MeshMerger + ?Sized,
        B: MaterialBaker + ?Sized,
    {
        self.registry.clear();
        if self.mode == ExportMode::MergeAndExport {
            self.layout.ensure_dirs()?;
        }

        let total: usize = components.iter().map(|c| c.lod_count as usize).sum();
        let mut report = BatchReport::default();
        let mut index = 0;

        'components: for component in components {
            for lod_index in 0..component.lod_count {
                if cancel.load(Ordering::Relaxed) {
                    info!(completed = index, total, "export cancelled");
                    report.cancelled = true;
                    break 'components;
                }
                progress(index, total);
                index += 1;

                match self.export_item(component, lod_index, merger, baker) {
                    Ok(ItemOutcome::Exported(item)) => {
                        debug!(stem = %item.target, obj = ?item.obj_path, "exported");
                        report.exported.push(item);
                    }
                    Ok(ItemOutcome::Merged) => report.merged += 1,
                    Ok(ItemOutcome::Skipped) => {
                        debug!(component = %component.id, lod_index, "nothing to export");
                        report.skipped += 1;
                    }
                    Err(error) => {
                        warn!(component = %component.id, lod_index, %error, "export failed");
                        report.failures.push(ItemFailure {
                            component: component.id.clone(),
                            lod_index,
                            error,
                        });
                    }
                }
            }
        }

        self.registry.clear();
        info!("{}", report.summary());
        Ok(report)
    }

    fn export_item<M, B>(
        &mut self,
        component: &ComponentSource,
        lod_index: u32,
        merger: &M,
        baker: &B,
    ) -> Result<ItemOutcome>
    where
        M: MeshMerger + ?Sized,
        B: MaterialBaker + ?Sized,
    {
        let settings = self.config.merge_settings(lod_index);
        let Some(mesh) = merger.merge(component, &settings)? else {
            return Ok(ItemOutcome::Skipped);
        };
        // No triangles means no material group either; skip before a name is taken.
        if mesh.is_empty() {
            return Ok(ItemOutcome::Skipped);
        }
        if self.mode == ExportMode::MergeOnly {
            mesh.validate()?;
            return Ok(ItemOutcome::Merged);
        }

        let maps = baker.bake(component, &settings)?;
        let classified = classify_maps(&maps);

        let target = self
            .registry
            .resolve(&component.base_name, lod_index, self.config.instancing_multi_actors);
        let model_dir = self.layout.model_dir();
        let obj_path = target.obj_path(&model_dir);
        let mtl_path = target.mtl_path(&model_dir);

        let obj = render_obj(&mesh, component.world_offset, &clean_path_filename(&mtl_path))?;
        let material_group = obj
            .material_groups
            .first()
            .cloned()
            .ok_or_else(|| ExportError::MissingMaterialGroup(target.stem()))?;
        let mtl = render_mtl(&material_group, &classified.table)?;

        let mut created = Vec::new();
        let written = write_maps(&self.layout.maps_dir(), &classified.images, &mut created)
            .and_then(|map_paths| write_pair(&obj_path, &obj.text, &mtl_path, &mtl).map(|()| map_paths));
        let map_paths = match written {
            Ok(map_paths) => map_paths,
            Err(e) => {
                remove_files(created.iter().map(PathBuf::as_path));
                return Err(e);
            }
        };

        Ok(ItemOutcome::Exported(ExportedItem {
            component: component.id.clone(),
            target,
            obj_path,
            mtl_path,
            material_group,
            map_paths,
        }))
    }
}

/// Convert every map image into `maps_dir`. Paths that did not exist
/// beforehand are pushed onto `created`.
fn write_maps(maps_dir: &Path, images: &[MapImage], created: &mut Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut map_paths = Vec::with_capacity(images.len());
    for image in images {
        let dest = maps_dir.join(&image.file_name);
        let existed = dest.exists();
        convert_to_bmp(&image.source, &dest)?;
        if !existed {
            created.push(dest.clone());
        }
        map_paths.push(dest);
    }
    Ok(map_paths)
}

/// Write the OBJ then the MTL. If either write fails both paths are removed.
fn write_pair(obj_path: &Path, obj: &str, mtl_path: &Path, mtl: &str) -> Result<()> {
    if let Err(e) = fs::write(obj_path, obj).and_then(|()| fs::write(mtl_path, mtl)) {
        remove_files([obj_path, mtl_path]);
        return Err(e.into());
    }
    Ok(())
}

fn remove_files<'a>(paths: impl IntoIterator<Item = &'a Path>) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => debug!(path = ?path, "removed partial output"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = ?path, error = %e, "could not remove partial output"),
        }
    }
}
