//! Simulation configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `skitter.ron` file (if exists)
//! 3. Environment variables prefixed with `SKITTER_`
//!
//! Example environment variable: `SKITTER_RUN__TICKS=1200`

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use skitter_rig::{LizardBlueprint, Locomotion};

/// Main simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub lizard: LizardBlueprint,

    /// Overrides the lizard's scale-derived locomotion preset
    #[serde(default)]
    pub locomotion: Option<Locomotion>,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Scripted pointer path the creature chases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// Pointer circles the start position
    #[default]
    Orbit,
    /// Pointer jumps to the next waypoint once the creature arrives
    Waypoints,
    /// Pointer never moves
    Fixed,
}

impl PathKind {
    pub fn name(&self) -> &'static str {
        match self {
            PathKind::Orbit => "orbit",
            PathKind::Waypoints => "waypoints",
            PathKind::Fixed => "fixed",
        }
    }
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for PathKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "orbit" | "circle" => Ok(PathKind::Orbit),
            "waypoints" | "tour" => Ok(PathKind::Waypoints),
            "fixed" | "still" => Ok(PathKind::Fixed),
            _ => Err(format!(
                "Unknown path: {}. Valid: orbit, waypoints, fixed",
                s
            )),
        }
    }
}

/// Run length, seeding and pointer path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Ticks to simulate
    pub ticks: u64,
    /// Seed for gait jitter
    pub seed: u64,
    pub path: PathKind,
    /// Creature spawn point (also the orbit centre)
    pub start: [f32; 2],
    pub orbit_radius: f32,
    /// Orbit advance per tick (radians)
    pub orbit_speed: f32,
    pub waypoints: Vec<[f32; 2]>,
    /// Distance at which a waypoint counts as reached
    pub arrive_radius: f32,
    pub fixed: [f32; 2],
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            seed: 42,
            path: PathKind::Orbit,
            start: [0.0, 0.0],
            orbit_radius: 300.0,
            orbit_speed: 0.01,
            waypoints: vec![
                [400.0, 0.0],
                [400.0, 400.0],
                [-400.0, 400.0],
                [-400.0, -400.0],
            ],
            arrive_radius: 24.0,
            fixed: [500.0, 0.0],
        }
    }
}

/// Frame capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u16,
    /// Capture one frame every N ticks
    pub every: u64,
    /// Screen pixels per world unit
    pub scale: f32,
    /// Creature stroke colour (RGB)
    pub color: [u8; 3],
    /// Creature stroke width in pixels
    pub stroke: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 360,
            fps: 25,
            every: 2,
            scale: 0.5,
            color: [255, 255, 255],
            stroke: 1,
        }
    }
}

impl SimConfig {
    /// Load configuration from `skitter.ron` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("skitter")
    }

    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. RON file `name` (if exists)
    /// 3. Environment variables prefixed with `SKITTER_` (highest priority)
    pub fn load_from(name: &str) -> Result<Self> {
        Self::load_layers(name, Self::environment())
    }

    /// `SKITTER_` prefix, `__` between nested keys
    fn environment() -> Environment {
        Environment::with_prefix("SKITTER")
            .prefix_separator("_")
            .separator("__")
    }

    fn load_layers(name: &str, environment: Environment) -> Result<Self> {
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("lizard.size", 8.0)?
            .set_default("lizard.legs", 4_i64)?
            .set_default("lizard.tail", 12_i64)?
            .set_default("run.ticks", 600_i64)?
            .set_default("run.seed", 42_i64)?
            .set_default("run.path", "orbit")?
            .set_default("run.orbit_radius", 300.0)?
            .set_default("run.orbit_speed", 0.01)?
            .set_default("run.arrive_radius", 24.0)?
            .set_default("capture.width", 480_i64)?
            .set_default("capture.height", 360_i64)?
            .set_default("capture.fps", 25_i64)?
            .set_default("capture.every", 2_i64)?
            .set_default("capture.scale", 0.5)?
            .set_default("capture.stroke", 1_i64)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name(name)
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (SKITTER_RUN__TICKS, etc.)
            .add_source(environment);

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Locomotion tuning: explicit override or the lizard preset
    pub fn locomotion(&self) -> Locomotion {
        self.locomotion.unwrap_or_else(|| self.lizard.locomotion())
    }

    /// Effective configuration as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize configuration")
    }
}
