//! OBJ/MTL file set export.
//!
//! This module provides the geometry and material writers, the baked map
//! classifier and BMP output for map images.

pub mod bmp;
pub mod maps;
pub mod mtl;
pub mod names;
pub mod obj;

pub use maps::{classify, classify_maps, ClassifiedMaps, MtlKey, MtlTable};
pub use mtl::{render_mtl, write_mtl};
pub use obj::{render_obj, write_obj, ObjDocument};
