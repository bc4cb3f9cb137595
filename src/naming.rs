//! Output naming for component LODs.
//!
//! When several actors share one mesh, each export of the same
//! `(base name, LOD)` pair gets its own `_ACTOR<n>` ordinal so files from one
//! run never collide.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A resolved output name for one component LOD.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportTarget {
    pub base_name: String,
    pub lod_index: u32,
    /// Present only when instanced naming is enabled.
    pub instance_ordinal: Option<u32>,
}

impl ExportTarget {
    /// File stem, e.g. `Rock_LOD0` or `Rock_ACTOR2_LOD0`.
    pub fn stem(&self) -> String {
        match self.instance_ordinal {
            Some(ordinal) => format!("{}_ACTOR{}_LOD{}", self.base_name, ordinal, self.lod_index),
            None => format!("{}_LOD{}", self.base_name, self.lod_index),
        }
    }

    pub fn obj_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(format!("{}.obj", self.stem()))
    }

    pub fn mtl_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(format!("{}.mtl", self.stem()))
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

/// Per-run counters keyed by `<base>_LOD<n>`.
///
/// Owned by the caller and cleared at the start of every batch. Not
/// synchronized; share it across threads only behind a lock.
#[derive(Debug, Clone, Default)]
pub struct NamingRegistry {
    counters: HashMap<String, u32>,
}

impl NamingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the output name for one export of `base_name` at `lod_index`.
    ///
    /// Without instancing the name is always `<base>_LOD<n>`. With instancing
    /// the first call for a key yields ordinal 0 and every later call in the
    /// same run yields the next ordinal.
    pub fn resolve(&mut self, base_name: &str, lod_index: u32, instancing: bool) -> ExportTarget {
        let instance_ordinal = instancing.then(|| {
            let key = format!("{}_LOD{}", base_name, lod_index);
            let ordinal = match self.counters.get_mut(&key) {
                Some(counter) => {
                    *counter += 1;
                    *counter
                }
                None => {
                    self.counters.insert(key, 0);
                    0
                }
            };
            debug!(base_name, lod_index, ordinal, "resolved instance ordinal");
            ordinal
        });

        ExportTarget {
            base_name: base_name.to_string(),
            lod_index,
            instance_ordinal,
        }
    }

    /// Forget all counters.
    pub fn clear(&mut self) {
        self.counters.clear();
    }

    /// Number of distinct `(base, LOD)` keys seen this run.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
