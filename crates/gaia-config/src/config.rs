//! Configuration structs with defaults, validation and RON persistence.

use std::path::{Path, PathBuf};

use gaia_terrain::{AnomalyPolicy, DEFAULT_LEGACY_WORLD_SCALE};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";
const APP_NAME: &str = "gaia-populator";

/// Top-level populator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Whole-map placement knobs.
    pub placement: PlacementConfig,
    /// Terrain decoding options.
    pub decode: DecodeConfig,
    /// Where maps are read from and written to.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Whole-map placement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacementConfig {
    /// Number of clusters, 1 to 1000.
    pub cluster_count: usize,
    /// Cluster radius in game units, up to 200.
    pub cluster_radius: f64,
    /// Satellites per cluster, 0 to 50.
    pub resources_per_cluster: usize,
    /// Altitude at or below which a spot counts as water, 0 to 50.
    pub water_altitude_threshold: f64,
    /// Keep-out distance around civil centres, 0 to 1000.
    pub exclusion_radius: f64,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

/// Terrain decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecodeConfig {
    /// What to do with corrupt legacy altitude samples.
    pub anomaly_policy: AnomalyPolicy,
    /// World units per legacy heightmap sample.
    pub legacy_world_scale: f64,
}

/// Map directory and output naming.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding `<name>.pmp` and `<name>.entities.json`.
    pub maps_dir: PathBuf,
    /// Appended to the map name for populated output.
    pub output_suffix: String,
    /// Map most recently populated.
    pub last_used_map: Option<String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            cluster_count: 200,
            cluster_radius: 50.0,
            resources_per_cluster: 10,
            water_altitude_threshold: 5.0,
            exclusion_radius: 300.0,
            seed: None,
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            anomaly_policy: AnomalyPolicy::default(),
            legacy_world_scale: DEFAULT_LEGACY_WORLD_SCALE,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            maps_dir: PathBuf::from("maps"),
            output_suffix: "_populated".to_string(),
            last_used_map: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is outside {min}..={max}")))
    }
}

impl Config {
    /// Check every knob against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.placement;
        if !(1..=1000).contains(&p.cluster_count) {
            return Err(invalid(
                "placement.cluster_count",
                format!("{} is outside 1..=1000", p.cluster_count),
            ));
        }
        if !(p.cluster_radius.is_finite() && p.cluster_radius > 0.0 && p.cluster_radius <= 200.0) {
            return Err(invalid(
                "placement.cluster_radius",
                format!("{} is outside (0, 200]", p.cluster_radius),
            ));
        }
        if p.resources_per_cluster > 50 {
            return Err(invalid(
                "placement.resources_per_cluster",
                format!("{} is outside 0..=50", p.resources_per_cluster),
            ));
        }
        check_range(
            "placement.water_altitude_threshold",
            p.water_altitude_threshold,
            0.0,
            50.0,
        )?;
        check_range("placement.exclusion_radius", p.exclusion_radius, 0.0, 1000.0)?;

        let scale = self.decode.legacy_world_scale;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(invalid(
                "decode.legacy_world_scale",
                format!("{scale} is not a positive number"),
            ));
        }
        if self.output.output_suffix.trim().is_empty() {
            return Err(invalid("output.output_suffix", "must not be empty"));
        }
        Ok(())
    }

    /// Record `map` as the last one used.
    pub fn remember_map(&mut self, map: &str) {
        self.output.last_used_map = Some(map.to_string());
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for the populator, falling back to the
    /// working directory when the OS exposes none.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
