//! Tiler configuration loading and validation.
//!
//! Configuration comes from an optional YAML file, with `${VAR}` and
//! `${VAR:-default}` expanded from the environment before parsing. Command
//! line flags are applied on top by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use density::MAX_ZOOM;
use renderer::{Kernel, KernelSpec};
use serde::{Deserialize, Serialize};

/// Settings for one tiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TilerConfig {
    /// Shallowest zoom level to render
    pub min_zoom: u32,

    /// Deepest zoom level to render
    pub max_zoom: u32,

    /// Intensity multiplier applied before tone mapping
    pub scale: f64,

    /// Smoothing kernel
    pub kernel: KernelSpec,

    /// Pixels around each tile that still feed it. Defaults to the kernel
    /// radius so smoothing is continuous across seams.
    pub edge_margin: Option<u32>,

    /// Root of the `{z}/{x}/{y}.png` tree
    pub output_dir: PathBuf,

    /// Write `manifest.json` next to the tiles
    pub write_manifest: bool,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0,
            max_zoom: 12,
            scale: 1.0,
            kernel: KernelSpec::default(),
            edge_margin: None,
            output_dir: PathBuf::from("tiles"),
            write_manifest: true,
        }
    }
}

impl TilerConfig {
    /// Load a YAML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tiler config from {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid tiler config {:?}", path))
    }

    /// Parse YAML after environment expansion. Missing keys take defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: TilerConfig =
            serde_yaml::from_str(&expanded).context("Failed to parse tiler config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.min_zoom <= self.max_zoom,
            "min_zoom ({}) must not exceed max_zoom ({})",
            self.min_zoom,
            self.max_zoom
        );
        anyhow::ensure!(
            self.max_zoom <= MAX_ZOOM,
            "max_zoom ({}) must be at most {}",
            self.max_zoom,
            MAX_ZOOM
        );
        anyhow::ensure!(
            self.scale.is_finite() && self.scale > 0.0,
            "scale must be a positive number, got {}",
            self.scale
        );
        self.kernel.build()?;
        Ok(())
    }

    /// Edge margin to route with, given the built kernel.
    pub fn effective_edge_margin(&self, kernel: &Kernel) -> u32 {
        self.edge_margin.unwrap_or_else(|| kernel.radius())
    }
}

/// Replace `${VAR}` and `${VAR:-default}` with environment values.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .with_context(|| format!("Unclosed variable substitution: ${{{}", after))?;
        out.push_str(&resolve_var(&after[..end])?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

fn resolve_var(expr: &str) -> Result<String> {
    match expr.split_once(":-") {
        Some((name, default)) => match std::env::var(name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        },
        None => std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr.trim())),
    }
}
