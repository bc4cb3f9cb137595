//! Filename and material-name cleanup shared by the OBJ and MTL writers.

use std::path::Path;

/// Final component of a path-like string, with both separator styles stripped.
pub fn clean_filename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Same as [`clean_filename`] for a real path.
pub fn clean_path_filename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Name of the OBJ material group for a material slot.
///
/// The merged material is named `<slot>_<slot>`; the result is reduced to a
/// bare filename and whitespace or `:` become `_` so it stays one token.
pub fn material_group_name(slot_name: &str) -> String {
    let joined = format!("{}_{}", slot_name, slot_name);
    clean_filename(&joined)
        .chars()
        .map(|c| if c.is_whitespace() || c == ':' { '_' } else { c })
        .collect()
}

/// Display name used for a baked map's image file.
///
/// Drops the `_LOD0` marker and turns ` - `, `-` and spaces into `_`.
pub fn clean_map_name(source_asset_name: &str) -> String {
    source_asset_name
        .replace("_LOD0", "")
        .replace(" - ", "_")
        .replace(['-', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_filename() {
        assert_eq!(clean_filename("/Game/Out/Rock_LOD0.mtl"), "Rock_LOD0.mtl");
        assert_eq!(clean_filename("C:\\Out\\Rock.mtl"), "Rock.mtl");
        assert_eq!(clean_filename("Rock.mtl"), "Rock.mtl");
    }

    #[test]
    fn test_material_group_name() {
        assert_eq!(material_group_name("Body"), "Body_Body");
        assert_eq!(material_group_name("Car Paint"), "Car_Paint_Car_Paint");
        assert_eq!(material_group_name("Mat:0"), "Mat_0_Mat_0");
    }

    #[test]
    fn test_clean_map_name() {
        assert_eq!(clean_map_name("T_Rock_LOD0_Diffuse"), "T_Rock_Diffuse");
        assert_eq!(clean_map_name("T_Rock_LOD1_Diffuse"), "T_Rock_LOD1_Diffuse");
        assert_eq!(clean_map_name("T_Big - Rock_Normal"), "T_Big_Rock_Normal");
        assert_eq!(clean_map_name("T_Big-Rock Top_MRS"), "T_Big_Rock_Top_MRS");
    }
}
