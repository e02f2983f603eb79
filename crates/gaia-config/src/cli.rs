//! Command-line overrides for the persisted configuration.

use std::path::PathBuf;

use clap::Args;
use gaia_terrain::AnomalyPolicy;

use crate::Config;

/// Per-run overrides.
///
/// CLI values override settings loaded from `config.ron`. Flatten this into
/// the binary's parser with `#[command(flatten)]`.
#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    /// Number of clusters to generate.
    #[arg(long, global = true)]
    pub cluster_count: Option<usize>,

    /// Cluster radius in game units.
    #[arg(long, global = true)]
    pub cluster_radius: Option<f64>,

    /// Satellites attempted around each cluster centre.
    #[arg(long, global = true)]
    pub resources_per_cluster: Option<usize>,

    /// Altitude at or below which a spot counts as water.
    #[arg(long, global = true)]
    pub water_threshold: Option<f64>,

    /// Keep-out distance around civil centres.
    #[arg(long, global = true)]
    pub exclusion_radius: Option<f64>,

    /// Handling of corrupt legacy altitude samples (fail, clamp, substitute).
    #[arg(long, global = true, value_parser = parse_anomaly_policy)]
    pub anomaly_policy: Option<AnomalyPolicy>,

    /// World units per legacy heightmap sample.
    #[arg(long, global = true)]
    pub legacy_scale: Option<f64>,

    /// Directory holding the maps.
    #[arg(long, global = true)]
    pub maps_dir: Option<PathBuf>,

    /// Suffix for populated output files.
    #[arg(long, global = true)]
    pub output_suffix: Option<String>,

    /// Fixed RNG seed for reproducible runs.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

fn parse_anomaly_policy(value: &str) -> Result<AnomalyPolicy, String> {
    match value.to_ascii_lowercase().as_str() {
        "fail" => Ok(AnomalyPolicy::Fail),
        "clamp" => Ok(AnomalyPolicy::Clamp),
        "substitute" => Ok(AnomalyPolicy::Substitute),
        other => Err(format!(
            "unknown anomaly policy {other:?} (expected fail, clamp or substitute)"
        )),
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(count) = args.cluster_count {
            self.placement.cluster_count = count;
        }
        if let Some(radius) = args.cluster_radius {
            self.placement.cluster_radius = radius;
        }
        if let Some(n) = args.resources_per_cluster {
            self.placement.resources_per_cluster = n;
        }
        if let Some(threshold) = args.water_threshold {
            self.placement.water_altitude_threshold = threshold;
        }
        if let Some(radius) = args.exclusion_radius {
            self.placement.exclusion_radius = radius;
        }
        if let Some(seed) = args.seed {
            self.placement.seed = Some(seed);
        }
        if let Some(policy) = args.anomaly_policy {
            self.decode.anomaly_policy = policy;
        }
        if let Some(scale) = args.legacy_scale {
            self.decode.legacy_world_scale = scale;
        }
        if let Some(ref dir) = args.maps_dir {
            self.output.maps_dir = dir.clone();
        }
        if let Some(ref suffix) = args.output_suffix {
            self.output.output_suffix = suffix.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        overrides: CliArgs,
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            cluster_count: Some(12),
            exclusion_radius: Some(0.0),
            anomaly_policy: Some(AnomalyPolicy::Clamp),
            seed: Some(5),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.placement.cluster_count, 12);
        assert_eq!(config.placement.exclusion_radius, 0.0);
        assert_eq!(config.placement.seed, Some(5));
        assert_eq!(config.decode.anomaly_policy, AnomalyPolicy::Clamp);
        // Non-overridden fields retain defaults
        assert_eq!(config.placement.cluster_radius, 50.0);
        assert_eq!(config.output.output_suffix, "_populated");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let cli = TestCli::try_parse_from([
            "gaia-populate",
            "--water-threshold",
            "7.5",
            "--anomaly-policy",
            "Substitute",
            "--maps-dir",
            "/tmp/maps",
        ])
        .unwrap();
        assert_eq!(cli.overrides.water_threshold, Some(7.5));
        assert_eq!(cli.overrides.anomaly_policy, Some(AnomalyPolicy::Substitute));
        assert_eq!(cli.overrides.maps_dir, Some(PathBuf::from("/tmp/maps")));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = TestCli::try_parse_from(["gaia-populate", "--anomaly-policy", "ignore"]);
        assert!(result.is_err());
    }
}
