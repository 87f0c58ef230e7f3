//! Game and simulation configuration with documented constants
//!
//! Every tunable lives here. A TOML file can override any subset of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::city::ItemCategory;
use crate::core::error::{CityError, Result};
use crate::core::types::LatLng;

/// Visitor population and spawning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitorConfig {
    /// Pool size each eligible place is topped up to
    pub per_item: usize,

    /// Maximum spawn distance from the target (degrees, ~800 m)
    ///
    /// Visitors appear on an annulus between half this radius and the full
    /// radius, so they always have some walking to do.
    pub spawn_radius: f64,

    /// Slowest walking speed (degrees per tick)
    pub speed_min: f64,

    /// Fastest walking speed (degrees per tick)
    pub speed_max: f64,

    /// Categories that may be excluded as pure decoration
    pub skip_categories: Vec<ItemCategory>,

    /// Name fragments marking a decorative place (oceans, bays)
    ///
    /// A place is skipped when its category is listed in `skip_categories`
    /// and its name contains one of these fragments.
    pub skip_name_markers: Vec<String>,
}

impl Default for VisitorConfig {
    fn default() -> Self {
        Self {
            per_item: 8,
            spawn_radius: 0.008,
            speed_min: 0.00003,
            speed_max: 0.00005,
            skip_categories: vec![ItemCategory::Nature],
            skip_name_markers: vec!["洋".into(), "ocean".into(), "Ocean".into()],
        }
    }
}

/// How far a walking visitor moves per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepMode {
    /// Move exactly `speed` every tick, whatever the frame rate
    FixedPerTick,
    /// Scale `speed` by the elapsed time relative to a reference frame
    ElapsedScaled { reference_frame_ms: f64 },
}

impl Default for StepMode {
    fn default() -> Self {
        Self::FixedPerTick
    }
}

/// Per-frame motion of visitors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Distance below which a visitor has arrived (degrees, ~50 m)
    pub arrival_radius: f64,

    /// Peak lateral wobble added to the rendered latitude (degrees)
    pub wobble_amplitude: f64,

    /// Wobble phase advances by one radian every this many milliseconds
    pub wobble_period_ms: f64,

    /// Chance per tick that an arrived visitor fidgets
    pub fidget_probability: f64,

    /// How long the fidget walking cue stays on
    pub fidget_duration_ms: f64,

    pub step_mode: StepMode,

    /// Frame interval used by the async frame driver
    pub frame_interval_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            arrival_radius: 0.0005,
            wobble_amplitude: 0.00005,
            wobble_period_ms: 200.0,
            fidget_probability: 0.01,
            fidget_duration_ms: 1000.0,
            step_mode: StepMode::FixedPerTick,
            frame_interval_ms: 16,
        }
    }
}

/// The city being planned and the rules of the game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    pub name: String,
    pub center: LatLng,
    /// Residents before any planning
    pub base_population: i64,
    /// Annual tax revenue before any planning (yen)
    pub base_tax_revenue: i64,
    /// Population the player is trying to reach
    pub population_goal: i64,
    /// Number of places the player may add before the game ends
    pub max_additional_items: usize,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            name: "旭市".into(),
            center: LatLng::new(35.7208, 140.6453),
            base_population: 59_948,
            base_tax_revenue: 22_000_000_000,
            population_goal: 1_000_000,
            max_additional_items: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory the score file is written to
    pub scores_dir: PathBuf,
    /// Fixed key the score list is stored under
    pub storage_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scores_dir: PathBuf::from("."),
            storage_key: "future-asahi-highscores".into(),
        }
    }
}

impl StorageConfig {
    pub fn scores_path(&self) -> PathBuf {
        self.scores_dir.join(format!("{}.json", self.storage_key))
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Seed for the visitor RNG; random when unset
    pub seed: Option<u64>,
    pub visitors: VisitorConfig,
    pub motion: MotionConfig,
    pub city: CityConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let v = &self.visitors;
        if !(v.speed_min > 0.0 && v.speed_min <= v.speed_max) {
            return Err(CityError::ConfigError(format!(
                "visitor speeds must satisfy 0 < speed_min ({}) <= speed_max ({})",
                v.speed_min, v.speed_max
            )));
        }
        if v.spawn_radius <= 0.0 {
            return Err(CityError::ConfigError(format!(
                "spawn_radius ({}) must be positive",
                v.spawn_radius
            )));
        }

        let m = &self.motion;
        if m.arrival_radius <= 0.0 {
            return Err(CityError::ConfigError(format!(
                "arrival_radius ({}) must be positive",
                m.arrival_radius
            )));
        }
        if m.wobble_period_ms <= 0.0 {
            return Err(CityError::ConfigError("wobble_period_ms must be positive".into()));
        }
        if !(0.0..=1.0).contains(&m.fidget_probability) {
            return Err(CityError::ConfigError(format!(
                "fidget_probability ({}) must be within [0, 1]",
                m.fidget_probability
            )));
        }
        if let StepMode::ElapsedScaled { reference_frame_ms } = m.step_mode {
            if reference_frame_ms <= 0.0 {
                return Err(CityError::ConfigError(
                    "reference_frame_ms must be positive".into(),
                ));
            }
        }
        if m.frame_interval_ms == 0 {
            return Err(CityError::ConfigError("frame_interval_ms must be at least 1".into()));
        }

        if self.city.population_goal <= 0 {
            return Err(CityError::ConfigError("population_goal must be positive".into()));
        }

        Ok(())
    }
}
