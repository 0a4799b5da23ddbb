//! TOML configuration deserialisation for force-sweep jobs.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tweezer_beams::Polarisation;
use tweezer_core::PositionAxis;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub particle: ParticleConfig,
    pub lens: LensConfig,
    #[serde(default)]
    pub beam: BeamConfig,
    #[serde(default)]
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub positions: PositionsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The trapped sphere.
#[derive(Debug, Deserialize)]
pub struct ParticleConfig {
    pub radius: f64,
    /// Particle index divided by the medium index.
    pub relative_index: f64,
}

/// Lens geometry: either a numerical aperture or an explicit radius.
#[derive(Debug, Deserialize)]
pub struct LensConfig {
    pub focal_distance: f64,
    #[serde(default)]
    pub numerical_aperture: Option<f64>,
    #[serde(default)]
    pub radius: Option<f64>,
    /// Immersion medium index, used with `numerical_aperture`.
    #[serde(default = "default_medium_index")]
    pub medium_index: f64,
}

fn default_medium_index() -> f64 {
    1.0
}

/// Beam profile kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    #[default]
    Uniform,
    Gaussian,
}

/// Beam filling the lens aperture.
#[derive(Debug, Deserialize)]
pub struct BeamConfig {
    #[serde(default)]
    pub profile: ProfileKind,
    /// Gaussian 1/e² radius as a fraction of the lens radius.
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default)]
    pub polarisation: Polarisation,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            profile: ProfileKind::default(),
            width: default_width(),
            polarisation: Polarisation::default(),
        }
    }
}

fn default_width() -> f64 {
    1.0
}

/// Aperture quadrature resolution.
#[derive(Debug, Deserialize)]
pub struct IntegrationConfig {
    #[serde(default = "default_steps")]
    pub radial_steps: usize,
    #[serde(default = "default_steps")]
    pub azimuthal_steps: usize,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            radial_steps: default_steps(),
            azimuthal_steps: default_steps(),
        }
    }
}

fn default_steps() -> usize {
    200
}

/// Particle positions relative to the focal point (negative z toward the lens).
#[derive(Debug, Deserialize)]
pub struct PositionsConfig {
    #[serde(default = "focus_axis")]
    pub x: PositionAxis,
    #[serde(default = "focus_axis")]
    pub y: PositionAxis,
    #[serde(default = "focus_axis")]
    pub z: PositionAxis,
}

impl Default for PositionsConfig {
    fn default() -> Self {
        Self {
            x: focus_axis(),
            y: focus_axis(),
            z: focus_axis(),
        }
    }
}

fn focus_axis() -> PositionAxis {
    PositionAxis::fixed(0.0)
}

/// Result file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    Json,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Result file (default: "results.tsv").
    #[serde(default = "default_output_file")]
    pub file: String,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_file() -> String {
    "results.tsv".into()
}

/// Parse a TOML job configuration from a string.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read configuration '{}'", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid configuration '{}'", path.display()))
}
