//! Configuration management for a Petri dish run.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `cfg.toml` file. The whole configuration is built once, validated, and
//! handed to the dish and the run driver; nothing reads it globally.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `cfg.toml` file (overrides defaults, section by section)
//! 3. Command-line overrides applied by the binary (seed, output directory)
//!
//! ## Example `cfg.toml`
//!
//! ```toml
//! [dish]
//! width = 120
//! height = 80
//! rule = "B3/S23"
//! topology = "toroidal"
//!
//! [run]
//! generations = 300
//! pre_generations = 20
//!
//! [seeding]
//! mode = "noise"
//! density = 0.35
//!
//! [output]
//! file_name = "petri"
//! palette = "ocean"
//! ```

use crate::rule::Rule;
use anyhow::Context;
use petri_data::Topology;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid geometry and transition rule.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DishConfig {
    pub width: u16,
    pub height: u16,
    /// Rule notation, parsed by [`Rule::parse`].
    pub rule: String,
    pub topology: Topology,
}

impl Default for DishConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            rule: "B3/S23".to_string(),
            topology: Topology::Toroidal,
        }
    }
}

/// Generation budget and random seed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Generations rendered to frames.
    pub generations: u64,
    /// Generations stepped and analyzed before rendering starts.
    pub pre_generations: u64,
    /// Seed for noise seeding; the binary falls back to the launch timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: 200,
            pre_generations: 0,
            seed: None,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub fn total_generations(&self) -> u64 {
        self.generations.saturating_add(self.pre_generations)
    }
}

/// How the dish is populated before the first step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SeedConfig {
    /// Independent random cells.
    Noise {
        #[serde(default = "default_density")]
        density: f64,
    },
    /// A pattern file looked up by name in the patterns directory.
    Pattern {
        name: String,
        #[serde(default)]
        x_offset: i64,
        #[serde(default)]
        y_offset: i64,
        #[serde(default)]
        center: bool,
    },
}

fn default_density() -> f64 {
    0.5
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig::Noise {
            density: default_density(),
        }
    }
}

/// Frame and report output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Base name; the binary appends a timestamp.
    pub file_name: String,
    pub directory: String,
    /// Pixels per cell edge.
    pub scale: u16,
    /// Frame delay in hundredths of a second.
    pub delay: u16,
    /// Palette name, see the renderer.
    pub palette: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: "petri".to_string(),
            directory: "out".to_string(),
            scale: 4,
            delay: 10,
            palette: "ember".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub dish: DishConfig,
    pub run: RunConfig,
    pub seeding: SeedConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.dish.width > 0, "Dish width must be positive");
        anyhow::ensure!(self.dish.width <= 4096, "Dish width too large (max 4096)");
        anyhow::ensure!(self.dish.height > 0, "Dish height must be positive");
        anyhow::ensure!(
            self.dish.height <= 4096,
            "Dish height too large (max 4096)"
        );
        Rule::parse(&self.dish.rule)
            .with_context(|| format!("Invalid rule {:?}", self.dish.rule))?;

        anyhow::ensure!(self.run.generations > 0, "Generation count must be positive");

        match &self.seeding {
            SeedConfig::Noise { density } => {
                anyhow::ensure!(
                    density.is_finite() && (0.0..=1.0).contains(density),
                    "Noise density must be in [0.0, 1.0]"
                );
            }
            SeedConfig::Pattern { name, .. } => {
                anyhow::ensure!(!name.trim().is_empty(), "Pattern name must not be empty");
            }
        }

        anyhow::ensure!(
            !self.output.file_name.trim().is_empty(),
            "Output file name must not be empty"
        );
        anyhow::ensure!(
            (1..=32).contains(&self.output.scale),
            "Output scale must be in [1, 32]"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file.
    ///
    /// A missing file yields the default configuration; a present but invalid
    /// file is an error.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// The configuration in TOML form, as embedded in reports.
    pub fn to_text(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Hash of every setting that influences the simulated dynamics.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.dish).as_bytes());
        hasher.update(format!("{:?}", self.run).as_bytes());
        hasher.update(format!("{:?}", self.seeding).as_bytes());
        hex::encode(hasher.finalize())
    }
}
