//! End-to-end tiling: ingest, render, encode, write.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use density::{DensityTile, TileSet};
use rayon::prelude::*;
use renderer::{render, Kernel};
use serde::{Deserialize, Serialize};
use tile_common::{DensityResult, TileKey};
use tracing::{debug, info, warn};

use crate::config::TilerConfig;
use crate::points::PointReader;

/// Manifest file name written under the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// One written tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    #[serde(flatten)]
    pub key: TileKey,
    /// Points routed into the tile, including edge-margin neighbours
    pub points: u64,
    /// Encoded PNG size
    pub bytes: usize,
}

/// Outcome of a tiling run, also written as the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub points_accepted: u64,
    pub points_rejected: u64,
    pub parse_errors: u64,
    pub tiles_accumulated: usize,
    pub tiles_empty: usize,
    pub bytes_written: usize,
    pub tiles: Vec<TileRecord>,
}

/// Encoded output for one tile.
#[derive(Debug)]
pub struct RenderedTile {
    pub key: TileKey,
    pub points: u64,
    pub png: Vec<u8>,
}

/// Run the whole pipeline over `input`.
pub fn run<R: Read>(config: &TilerConfig, input: R) -> Result<RunSummary> {
    config.validate()?;
    let kernel = config.kernel.build()?;
    let margin = config.effective_edge_margin(&kernel);

    info!(
        min_zoom = config.min_zoom,
        max_zoom = config.max_zoom,
        kernel_entries = kernel.len(),
        edge_margin = margin,
        scale = config.scale,
        "Starting tiling run"
    );

    let start = Instant::now();
    let mut set = TileSet::new(config.min_zoom, config.max_zoom)?.with_edge_margin(margin);
    let parse_errors = ingest(&mut set, input)?;
    info!(
        accepted = set.accepted(),
        rejected = set.rejected(),
        parse_errors,
        tiles = set.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Ingested points"
    );

    let mut summary = RunSummary {
        points_accepted: set.accepted(),
        points_rejected: set.rejected(),
        parse_errors,
        tiles_accumulated: set.len(),
        ..Default::default()
    };

    let start = Instant::now();
    let tiles = set.into_tiles();
    let mut rendered = render_tiles(&tiles, &kernel, config.scale)?;
    rendered.sort_by_key(|t| t.key);
    summary.tiles_empty = tiles.len() - rendered.len();
    info!(
        rendered = rendered.len(),
        empty = summary.tiles_empty,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Rendered tiles"
    );

    for tile in &rendered {
        write_tile(&config.output_dir, tile)?;
        summary.bytes_written += tile.png.len();
        summary.tiles.push(TileRecord {
            key: tile.key,
            points: tile.points,
            bytes: tile.png.len(),
        });
    }

    if config.write_manifest {
        write_manifest(&config.output_dir, &summary)?;
    }

    info!(
        tiles = summary.tiles.len(),
        bytes = summary.bytes_written,
        output = %config.output_dir.display(),
        "Tiling run complete"
    );
    Ok(summary)
}

/// Feed every point of `input` into `set`. Returns the number of malformed
/// lines skipped.
pub fn ingest<R: Read>(set: &mut TileSet, input: R) -> Result<u64> {
    let mut parse_errors = 0;
    for record in PointReader::new(input) {
        match record {
            Ok((lat, lng)) => {
                set.add_point(lat, lng);
            }
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Skipping malformed point");
                parse_errors += 1;
            }
            Err(e) => return Err(e).context("Failed to read points"),
        }
    }
    Ok(parse_errors)
}

/// Render and encode tiles in parallel, dropping those with nothing visible.
pub fn render_tiles(
    tiles: &[DensityTile],
    kernel: &Kernel,
    scale: f64,
) -> DensityResult<Vec<RenderedTile>> {
    tiles
        .par_iter()
        .filter_map(|tile| {
            let (image, visible) = render(tile, kernel, scale);
            if !visible {
                debug!(tile = %tile.key(), "Skipping empty tile");
                return None;
            }
            Some(image.to_png().map(|png| RenderedTile {
                key: tile.key(),
                points: tile.points(),
                png,
            }))
        })
        .collect()
}

/// `{root}/{z}/{x}/{y}.png`
pub fn tile_path(root: &Path, key: &TileKey) -> PathBuf {
    root.join(format!("{}.png", key.path()))
}

fn write_tile(root: &Path, tile: &RenderedTile) -> Result<()> {
    let path = tile_path(root, &tile.key);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {:?}", dir))?;
    }
    fs::write(&path, &tile.png).with_context(|| format!("Failed to write tile {:?}", path))?;
    debug!(tile = %tile.key, bytes = tile.png.len(), "Wrote tile");
    Ok(())
}

fn write_manifest(root: &Path, summary: &RunSummary) -> Result<()> {
    fs::create_dir_all(root).with_context(|| format!("Failed to create directory {:?}", root))?;
    let path = root.join(MANIFEST_FILE);
    let json = serde_json::to_vec_pretty(summary).context("Failed to serialize manifest")?;
    fs::write(&path, json).with_context(|| format!("Failed to write manifest {:?}", path))?;
    Ok(())
}
