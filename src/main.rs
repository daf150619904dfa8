//! Scenemesh - flatten glTF scenes into renderer-ready buffers
//!
//! Loads each scene given on the command line, logs what the importer
//! produced and optionally writes the geometry out as JSON.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use scenemesh_assets::{AssetServer, Geometry, ImportReport};
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use settings::AppSettings;

#[derive(Parser, Debug)]
#[command(name = "scenemesh", about = "Flatten glTF 2.0 scenes into vertex and index buffers")]
struct Cli {
    /// Scene files to load (.gltf or .glb)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Keep texture coordinates in the glTF bottom-left convention
    #[arg(long)]
    no_flip_v: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Write the flattened geometry of every scene to this JSON file
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Persist the effective settings to the user config directory
    #[arg(long)]
    save_settings: bool,
}

impl Cli {
    /// Fold command-line overrides into the persisted settings.
    fn apply(&self, settings: &mut AppSettings) {
        if self.no_flip_v {
            settings.import.flip_v = false;
        }
        if let Some(level) = &self.log_level {
            settings.log.level = level.clone();
        }
    }
}

/// One scene in the JSON export.
#[derive(Serialize)]
struct ExportedScene<'a> {
    source: &'a Path,
    vertex_count: usize,
    triangle_count: usize,
    geometry: &'a Geometry,
}

fn parse_level(level: &str) -> Result<Level> {
    Level::from_str(level).with_context(|| format!("Invalid log level '{}'", level))
}

fn log_report(path: &Path, geometry: &Geometry, report: Option<&ImportReport>) {
    info!(
        "{}: {} vertices, {} triangles",
        path.display(),
        geometry.vertex_count(),
        geometry.triangle_count()
    );
    if let Some((min, max)) = geometry.bounds() {
        info!("  bounds {:?} .. {:?}", min, max);
    }
    if let Some(report) = report {
        for skipped in &report.skipped {
            warn!(
                "  mesh {} primitive {} skipped: {}",
                skipped.mesh, skipped.primitive, skipped.reason
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut settings, settings_problem) = AppSettings::load();
    cli.apply(&mut settings);

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&settings.log.level)?)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if let Some(problem) = settings_problem {
        warn!("{:#}, using default settings", problem);
    }

    if cli.save_settings {
        settings.save().context("Failed to save settings")?;
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let mut server = AssetServer::with_options(cwd, settings.import);

    let mut handles = Vec::with_capacity(cli.paths.len());
    for path in &cli.paths {
        let (handle, report) = server
            .load_with_report(path)
            .with_context(|| format!("Failed to load '{}'", path.display()))?;
        if let Some(geometry) = server.get_geometry(handle) {
            log_report(path, geometry, report.as_ref());
        }
        handles.push((path.as_path(), handle));
    }

    if let Some(export) = &cli.export {
        let scenes: Vec<ExportedScene<'_>> = handles
            .iter()
            .filter_map(|&(source, handle)| {
                server.get_geometry(handle).map(|geometry| ExportedScene {
                    source,
                    vertex_count: geometry.vertex_count(),
                    triangle_count: geometry.triangle_count(),
                    geometry,
                })
            })
            .collect();
        let json = serde_json::to_string(&scenes).context("Failed to serialize geometry")?;
        fs::write(export, json)
            .with_context(|| format!("Failed to write '{}'", export.display()))?;
        info!("Exported {} scenes to {}", scenes.len(), export.display());
    }

    Ok(())
}
