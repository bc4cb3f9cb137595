//! Merge OBJ Export CLI
//!
//! Export precomputed merged meshes and baked maps as OBJ/MTL file sets.

use clap::{Parser, Subcommand};
use merge_obj_export::{
    ExportConfig, ExportMode, ExportSession, Manifest, NamingRegistry, OutputLayout,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "merge-obj-export")]
#[command(author, version, about = "Export merged LOD meshes and baked maps as OBJ/MTL", long_about = None)]
#[command(after_help = "Warnings are logged to stderr; set RUST_LOG (e.g. RUST_LOG=debug) for more detail.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every component LOD listed in a manifest
    Export {
        /// Manifest JSON describing merged meshes and baked maps
        #[arg(short, long)]
        manifest: PathBuf,

        /// Output root; files land in <output>/GetObjandMaterial
        #[arg(short, long)]
        output: PathBuf,

        /// Export config JSON (defaults are used for missing fields)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Disable _ACTOR<n> naming for repeated meshes
        #[arg(long)]
        no_instancing: bool,

        /// Baked texture size (width height)
        #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
        texture_size: Option<Vec<u32>>,

        /// Run the merge step only and write nothing
        #[arg(long)]
        merge_only: bool,
    },

    /// Show what a manifest contains and the names it would export to
    Inspect {
        /// Manifest JSON describing merged meshes and baked maps
        #[arg(short, long)]
        manifest: PathBuf,

        /// Disable _ACTOR<n> naming for repeated meshes
        #[arg(long)]
        no_instancing: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Export {
            manifest,
            output,
            config,
            no_instancing,
            texture_size,
            merge_only,
        } => {
            let mut export_config = match config {
                Some(path) => ExportConfig::from_json_file(path)?,
                None => ExportConfig::default(),
            };
            if no_instancing {
                export_config = export_config.with_instancing(false);
            }
            if let Some(size) = texture_size {
                export_config = export_config.with_texture_size(size[0], size[1]);
            }
            let mode = if merge_only {
                ExportMode::MergeOnly
            } else {
                ExportMode::MergeAndExport
            };
            export_manifest(&manifest, output, export_config, mode)?;
        }
        Commands::Inspect {
            manifest,
            no_instancing,
        } => {
            inspect_manifest(&manifest, !no_instancing)?;
        }
    }

    Ok(())
}

fn export_manifest(
    manifest_path: &PathBuf,
    output: PathBuf,
    config: ExportConfig,
    mode: ExportMode,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading manifest from {:?}...", manifest_path);
    let manifest = Manifest::from_json_file(manifest_path)?;
    let components = manifest.components();
    println!("  Found {} components", components.len());

    println!("Exporting with config:");
    println!("  - Texture size: {}x{}", config.texture_size.0, config.texture_size.1);
    println!("  - Instancing multi actors: {}", config.instancing_multi_actors);
    println!("  - Map kinds: {:?}", config.requested_map_kinds());

    let layout = OutputLayout::new(output);
    let model_dir = layout.model_dir();
    let mut registry = NamingRegistry::new();
    let mut session = ExportSession::new(config, layout, &mut registry)?.with_mode(mode);

    let report = session.run(
        &components,
        &manifest,
        &manifest,
        &mut |index, total| println!("  [{}/{}]", index + 1, total),
        &AtomicBool::new(false),
    )?;

    for item in &report.exported {
        println!("Exported {} to {:?}", item.target, item.obj_path);
        println!("  Material: {:?}", item.mtl_path);
        for map in &item.map_paths {
            println!("  Map: {:?}", map);
        }
    }
    for failure in &report.failures {
        eprintln!(
            "Failed {} LOD{}: {}",
            failure.component, failure.lod_index, failure.error
        );
    }

    println!("{}", report.summary());
    if mode == ExportMode::MergeAndExport {
        println!("Output directory: {:?}", model_dir);
    }

    if report.failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} item(s) failed", report.failures.len()).into())
    }
}

fn inspect_manifest(manifest_path: &PathBuf, instancing: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading manifest from {:?}...", manifest_path);
    let manifest = Manifest::from_json_file(manifest_path)?;
    let mut registry = NamingRegistry::new();

    for (component, entry) in manifest.components().iter().zip(&manifest.components) {
        println!("\n{} ({} LODs):", component.id, component.lod_count);
        for (lod_index, lod) in entry.lods.iter().enumerate() {
            match &lod.mesh {
                Some(mesh) if !mesh.is_empty() => {
                    let target = registry.resolve(&component.base_name, lod_index as u32, instancing);
                    println!(
                        "  LOD{} -> {}: {} vertices, {} triangles, {} sections, {} maps",
                        lod_index,
                        target,
                        mesh.vertex_count(),
                        mesh.triangle_count(),
                        mesh.sections.len(),
                        lod.maps.len()
                    );
                }
                _ => println!("  LOD{}: nothing to export", lod_index),
            }
        }
    }

    Ok(())
}
