//! MTL export.
//!
//! One merged material per file: a `newmtl` line, the map directives, and a
//! trailing blank line.

use crate::error::{ExportError, Result};
use crate::export::maps::MtlTable;
use crate::export::obj::line;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serialize a material block into any writer.
pub fn write_mtl_to<W: Write>(material_group: &str, table: &MtlTable, out: &mut W) -> Result<()> {
    line(out, format_args!("newmtl {}", material_group))?;
    for (key, path) in table.iter() {
        line(out, format_args!("{}{}", key.directive(), path))?;
    }
    line(out, format_args!(""))?;
    Ok(())
}

/// Render a material block as MTL text.
pub fn render_mtl(material_group: &str, table: &MtlTable) -> Result<String> {
    let mut buf = Vec::with_capacity(64 + table.len() * 48);
    write_mtl_to(material_group, table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExportError::Export(format!("MTL text is not UTF-8: {}", e)))
}

/// Write a material block to `out_path`, creating or truncating the file.
pub fn write_mtl(material_group: &str, table: &MtlTable, out_path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(out_path)?);
    write_mtl_to(material_group, table, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::maps::MtlKey;

    #[test]
    fn test_export_simple_mtl() {
        let mut table = MtlTable::new();
        table.insert(MtlKey::Diffuse, "maps/T_Rock_Diffuse.bmp");
        table.insert(MtlKey::Normal, "maps/T_Rock_Normal.bmp");

        let mtl = render_mtl("Body_Body", &table).unwrap();
        assert_eq!(
            mtl,
            "newmtl Body_Body\r\n\
             map_Kd maps/T_Rock_Diffuse.bmp\r\n\
             norm maps/T_Rock_Normal.bmp\r\n\
             \r\n"
        );
    }

    #[test]
    fn test_empty_table_still_names_material() {
        let mtl = render_mtl("Body_Body", &MtlTable::new()).unwrap();
        assert_eq!(mtl, "newmtl Body_Body\r\n\r\n");
    }

    #[test]
    fn test_write_mtl_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Rock_LOD0.mtl");
        let mut table = MtlTable::new();
        table.insert(MtlKey::Emissive, "maps/T_Rock_Emissive.bmp");

        write_mtl("Rock_Rock", &table, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("newmtl Rock_Rock\r\n"));
        assert!(text.contains("map_Ke maps/T_Rock_Emissive.bmp\r\n"));
    }
}
