//! Convolution kernels used to smooth the density grid.
//!
//! A kernel is a flat, order-irrelevant list of `(dx, dy, weight)` offsets.
//! The renderer does not care how it was built; the constructors here cover
//! the common shapes and [`KernelSpec`] lets configuration files pick one.

use serde::{Deserialize, Serialize};
use tile_common::{DensityError, DensityResult};

/// One offset of a smoothing footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelEntry {
    pub dx: i32,
    pub dy: i32,
    pub weight: f64,
}

impl KernelEntry {
    pub fn new(dx: i32, dy: i32, weight: f64) -> Self {
        Self { dx, dy, weight }
    }
}

/// An immutable smoothing footprint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kernel {
    entries: Vec<KernelEntry>,
}

impl Kernel {
    pub fn new(entries: Vec<KernelEntry>) -> Self {
        Self { entries }
    }

    /// Single zero-offset entry: renders the raw splatted grid.
    pub fn identity() -> Self {
        Self::new(vec![KernelEntry::new(0, 0, 1.0)])
    }

    /// Quadratic radial falloff, `(1 - d/radius)²` inside the radius.
    ///
    /// Entries with zero weight are dropped, so the footprint is a disc.
    /// A radius of 0 yields the identity kernel.
    pub fn radial(radius: u32) -> Self {
        if radius == 0 {
            return Self::identity();
        }
        let r = radius as i32;
        let rf = radius as f64;

        let mut entries = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                let w = (1.0 - d / rf).max(0.0).powi(2);
                if w > 0.0 {
                    entries.push(KernelEntry::new(dx, dy, w));
                }
            }
        }
        Self::new(entries)
    }

    /// Gaussian `exp(-d² / 2σ²)` truncated to the disc `d <= radius`.
    pub fn gaussian(radius: u32, sigma: f64) -> Self {
        if radius == 0 {
            return Self::identity();
        }
        let r = radius as i32;
        let r2 = (r * r) as f64;
        let denom = 2.0 * sigma * sigma;

        let mut entries = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = (dx * dx + dy * dy) as f64;
                if d2 <= r2 {
                    entries.push(KernelEntry::new(dx, dy, (-d2 / denom).exp()));
                }
            }
        }
        Self::new(entries)
    }

    pub fn entries(&self) -> &[KernelEntry] {
        &self.entries
    }

    /// Sum of all weights; the renderer's normaliser.
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Largest absolute offset on either axis.
    pub fn radius(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| e.dx.unsigned_abs().max(e.dy.unsigned_abs()))
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that the kernel can normalise a render.
    pub fn validate(&self) -> DensityResult<()> {
        if self.entries.is_empty() {
            return Err(DensityError::InvalidKernel("kernel has no entries".to_string()));
        }
        if let Some(e) = self
            .entries
            .iter()
            .find(|e| !e.weight.is_finite() || e.weight < 0.0)
        {
            return Err(DensityError::InvalidKernel(format!(
                "weight {} at ({}, {}) must be finite and non-negative",
                e.weight, e.dx, e.dy
            )));
        }
        if self.total_weight() <= 0.0 {
            return Err(DensityError::InvalidKernel(
                "total weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromIterator<KernelEntry> for Kernel {
    fn from_iter<I: IntoIterator<Item = KernelEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Serializable kernel description.
///
/// ```yaml
/// kernel:
///   type: gaussian
///   radius: 6
///   sigma: 2.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KernelSpec {
    Identity,
    Radial {
        radius: u32,
    },
    Gaussian {
        radius: u32,
        /// Defaults to half the radius
        #[serde(default)]
        sigma: Option<f64>,
    },
    Custom {
        entries: Vec<KernelEntry>,
    },
}

impl Default for KernelSpec {
    fn default() -> Self {
        KernelSpec::Radial { radius: 5 }
    }
}

impl KernelSpec {
    /// Build and validate the kernel.
    pub fn build(&self) -> DensityResult<Kernel> {
        let kernel = match self {
            KernelSpec::Identity => Kernel::identity(),
            KernelSpec::Radial { radius } => Kernel::radial(*radius),
            KernelSpec::Gaussian { radius, sigma } => {
                let sigma = sigma.unwrap_or(*radius as f64 / 2.0);
                if sigma.is_nan() || sigma <= 0.0 {
                    return Err(DensityError::InvalidKernel(format!(
                        "sigma must be positive, got {}",
                        sigma
                    )));
                }
                Kernel::gaussian(*radius, sigma)
            }
            KernelSpec::Custom { entries } => Kernel::new(entries.clone()),
        };
        kernel.validate()?;
        Ok(kernel)
    }
}
