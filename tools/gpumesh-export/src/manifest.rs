//! Manifest parsing and build orchestration
//!
//! Parses meshes.toml and coordinates mesh conversion.
//!
//! ```toml
//! [output]
//! dir = "assets/"
//!
//! [meshes]
//! cube = "models/cube.obj"
//! rock = { path = "models/rock.obj" }
//! ```

use anyhow::{Context, Result};
use gpumesh_common::{DedupStats, MESH_EXT};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "meshes.toml";

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshEntry>,
    /// Directory relative paths are resolved against (the manifest's own)
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MeshEntry {
    Simple(PathBuf),
    Detailed { path: PathBuf },
}

impl MeshEntry {
    pub fn path(&self) -> &Path {
        match self {
            MeshEntry::Simple(p) => p,
            MeshEntry::Detailed { path } => path,
        }
    }
}

impl Manifest {
    /// Parse manifest text; relative paths resolve against `base_dir`
    pub fn parse(content: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(content)?;
        manifest.base_dir = base_dir.into();
        Ok(manifest)
    }

    /// Source path of a mesh entry, resolved against the manifest directory
    pub fn source_path(&self, entry: &MeshEntry) -> PathBuf {
        self.base_dir.join(entry.path())
    }

    /// Output directory, resolved against the manifest directory
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output.dir)
    }
}

/// One mesh written by [`build_all`]
#[derive(Debug, Clone)]
pub struct BuiltMesh {
    pub name: String,
    pub output: PathBuf,
    pub stats: DedupStats,
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Manifest::parse(&content, base_dir)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    for (name, entry) in &manifest.meshes {
        if !is_valid_name(name) {
            anyhow::bail!(
                "Mesh name '{}' is not usable as a file name (no separators, not empty)",
                name
            );
        }
        let source = manifest.source_path(entry);
        if !source.exists() {
            anyhow::bail!("Mesh '{}' source not found: {:?}", name, source);
        }
    }
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains(char::is_control)
}

/// Build all meshes from a manifest, in name order
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<Vec<BuiltMesh>> {
    validate(manifest)?;

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest.output_dir(),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut built = Vec::with_capacity(manifest.meshes.len());
    for (name, entry) in &manifest.meshes {
        let source = manifest.source_path(entry);
        let output = output_dir.join(format!("{}.{}", name, MESH_EXT));
        tracing::info!("Converting mesh: {} -> {:?}", name, output);

        // Detect format by extension
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        let mesh = match ext.as_str() {
            "obj" => crate::mesh::convert_obj(&source, &output)?,
            _ => anyhow::bail!(
                "Unsupported mesh format for '{}': {:?} (use .obj)",
                name,
                source
            ),
        };

        built.push(BuiltMesh {
            name: name.clone(),
            output,
            stats: mesh.stats,
        });
    }

    Ok(built)
}
