//! gpumesh-export - mesh export tool
//!
//! Converts triangulated meshes to GPU-ready vertex/index binaries (.bin)

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

// Use modules from library
use gpumesh_export::{MESH_EXT, dump, formats, manifest, mesh};

#[derive(Parser)]
#[command(name = "gpumesh-export")]
#[command(about = "GPU mesh export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build meshes from a manifest file
    Build {
        /// Path to meshes.toml manifest
        #[arg(default_value = manifest::DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to meshes.toml manifest
        #[arg(default_value = manifest::DEFAULT_MANIFEST)]
        manifest: PathBuf,
    },

    /// Export a single mesh file
    Mesh {
        /// Input mesh file (triangulated OBJ)
        input: PathBuf,

        /// Output .bin file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-deduplicate an existing .bin file
    Redup {
        /// Input .bin file
        input: PathBuf,

        /// Output .bin file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the vertices and triangles of a .bin file
    Dump {
        /// Input .bin file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building meshes from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let built = manifest::build_all(&config, output.as_deref())?;
            if verbose {
                for mesh in &built {
                    tracing::info!(
                        "{}: {} corners -> {} vertices",
                        mesh.name,
                        mesh.stats.corner_count,
                        mesh.stats.vertex_count
                    );
                }
            }
            tracing::info!("Build complete! {} meshes", built.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Mesh { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension(MESH_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            // Detect format by extension
            let ext = input
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_lowercase())
                .unwrap_or_default();

            match ext.as_str() {
                "obj" => {
                    mesh::convert_obj(&input, &output)?;
                }
                _ => anyhow::bail!("Unsupported mesh format: {:?} (use .obj)", input),
            }
            tracing::info!("Done!");
        }

        Commands::Redup { input, output } => {
            let output = output.unwrap_or_else(|| input.clone());
            let report = mesh::redup_file(&input, &output)?;

            println!("Original vert count: {}", report.original_vertex_count);
            println!("Original index count: {}", report.original_index_count);
            println!("New vert count: {}", report.new_vertex_count);
            println!("New index count: {}", report.new_index_count);
        }

        Commands::Dump { input } => {
            let buffers = formats::read_mesh_file(&input)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            dump::write_dump(&mut out, &buffers)?;
            out.flush()?;
        }
    }

    Ok(())
}
