//! The work behind each subcommand, kept free of printing.

use std::path::{Path, PathBuf};

use gaia_config::Config;
use gaia_placement::{
    ClusterRequest, PlacementOutcome, PlacementRequest, materialize_clusters, populate_resources,
};
use gaia_scenario::{Entity, ScenarioEntities};
use gaia_terrain::{DecodeOptions, DecodedTerrain, read_terrain_file};
use rand::Rng;

use crate::error::CliError;
use crate::maps::MapFiles;

/// Result of `populate`.
#[derive(Debug)]
pub struct PopulateReport {
    pub output: PathBuf,
    pub map_dimension: f64,
    pub existing_entities: usize,
    pub outcome: PlacementOutcome,
}

/// Result of `cluster`.
#[derive(Debug)]
pub struct ClusterReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub entities: Vec<Entity>,
}

pub fn decode_options(config: &Config) -> DecodeOptions {
    DecodeOptions {
        anomaly_policy: config.decode.anomaly_policy,
        legacy_world_scale: config.decode.legacy_world_scale,
    }
}

/// Resolve the map to work on, falling back to the last one used.
pub fn select_map(config: &Config, map: Option<&str>) -> Result<MapFiles, CliError> {
    let name = map
        .or(config.output.last_used_map.as_deref())
        .ok_or(CliError::NoMapSelected)?;
    Ok(MapFiles::new(&config.output.maps_dir, name))
}

fn require_inputs(files: &MapFiles) -> Result<(), CliError> {
    match files.missing() {
        Some(path) => Err(CliError::MissingMapFile {
            map: files.name.clone(),
            path: path.to_path_buf(),
        }),
        None => Ok(()),
    }
}

pub fn load_terrain<R: Rng>(
    path: &Path,
    config: &Config,
    rng: &mut R,
) -> Result<DecodedTerrain, CliError> {
    read_terrain_file(path, &decode_options(config), rng).map_err(|source| CliError::Terrain {
        path: path.to_path_buf(),
        source,
    })
}

fn load_entities(path: &Path) -> Result<ScenarioEntities, CliError> {
    ScenarioEntities::load(path).map_err(|source| CliError::Scenario {
        path: path.to_path_buf(),
        source,
    })
}

fn save_entities(entities: &ScenarioEntities, path: &Path) -> Result<(), CliError> {
    entities.save(path).map_err(|source| CliError::Scenario {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode the map, scatter resources over it and write the populated list.
///
/// Always starts from the map's own entity list, so running it twice does
/// not stack resources. `map_dimension` overrides the decoded extent.
pub fn populate<R: Rng>(
    config: &Config,
    files: &MapFiles,
    map_dimension: Option<f64>,
    rng: &mut R,
) -> Result<PopulateReport, CliError> {
    if let Some(dimension) = map_dimension.filter(|d| !(d.is_finite() && *d > 0.0)) {
        return Err(CliError::InvalidMapDimension(dimension));
    }
    require_inputs(files)?;
    let terrain = load_terrain(&files.terrain, config, rng)?;
    let mut entities = load_entities(&files.entities)?;
    let existing_entities = entities.len();

    let placement = &config.placement;
    let request = PlacementRequest {
        map_dimension: map_dimension.unwrap_or(terrain.map_dimension),
        cluster_count: placement.cluster_count,
        cluster_radius: placement.cluster_radius,
        resources_per_cluster: placement.resources_per_cluster,
        water_altitude_threshold: placement.water_altitude_threshold,
        exclusion_radius: placement.exclusion_radius,
    };
    tracing::debug!(?request, map = %files.name, "populating map");

    let scenario_error = |source| CliError::Scenario {
        path: files.entities.clone(),
        source,
    };
    let outcome =
        populate_resources(&terrain.heightmap, &entities, &request, rng).map_err(scenario_error)?;
    entities.extend(&outcome.entities).map_err(scenario_error)?;

    let output = files.output(&config.output.output_suffix);
    save_entities(&entities, &output)?;

    Ok(PopulateReport {
        output,
        map_dimension: request.map_dimension,
        existing_entities,
        outcome,
    })
}

/// Scatter one hand-placed cluster and append it to the populated list.
///
/// Builds on an earlier populated output when there is one, so successive
/// clusters accumulate.
pub fn cluster<R: Rng>(
    config: &Config,
    files: &MapFiles,
    request: ClusterRequest,
    rng: &mut R,
) -> Result<ClusterReport, CliError> {
    require_inputs(files)?;
    let output = files.output(&config.output.output_suffix);
    let source = if output.is_file() {
        output.clone()
    } else {
        files.entities.clone()
    };

    let mut entities = load_entities(&source)?;
    let scenario_error = |source_err| CliError::Scenario {
        path: source.clone(),
        source: source_err,
    };
    let created = materialize_clusters(&[request], &entities, rng).map_err(scenario_error)?;
    entities.extend(&created).map_err(scenario_error)?;
    save_entities(&entities, &output)?;

    Ok(ClusterReport {
        source,
        output,
        entities: created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaia_placement::ResourceType;
    use gaia_terrain::WorldPoint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// One-patch PSMP file with every sample at `raw` and no textures.
    fn current_pmp(raw: u16) -> Vec<u8> {
        let mut data = b"PSMP".to_vec();
        for field in [6u32, 0, 1] {
            data.extend_from_slice(&field.to_le_bytes());
        }
        for _ in 0..17 * 17 {
            data.extend_from_slice(&raw.to_le_bytes());
        }
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&vec![0u8; 16 * 16 * 2]);
        data
    }

    const ENTITIES: &str = r#"{"entities":[
        {"uid":"5","template":"skirmish/structures/default_civil_centre","player":"1",
         "position":{"x":"10.0","z":"10.0"}},
        {"uid":"9","template":"gaia/tree/oak","position":{"x":"50.0","z":"50.0"}}
    ]}"#;

    fn setup(raw: u16) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mesa.pmp"), current_pmp(raw)).unwrap();
        std::fs::write(dir.path().join("mesa.entities.json"), ENTITIES).unwrap();
        let mut config = Config::default();
        config.output.maps_dir = dir.path().to_path_buf();
        config.placement.cluster_count = 5;
        config.placement.cluster_radius = 4.0;
        config.placement.resources_per_cluster = 3;
        config.placement.exclusion_radius = 5.0;
        (dir, config)
    }

    #[test]
    fn test_populate_writes_suffixed_output() {
        let (dir, config) = setup(40_000);
        let files = select_map(&config, Some("mesa")).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = populate(&config, &files, None, &mut rng).unwrap();

        assert_eq!(report.map_dimension, 64.0);
        assert_eq!(report.existing_entities, 2);
        assert_eq!(report.output, dir.path().join("mesa_populated.entities.json"));

        let written = ScenarioEntities::load(&report.output).unwrap();
        assert_eq!(written.len(), 2 + report.outcome.entities.len());
        assert!(report.outcome.entities.iter().all(|e| e.uid > 9));

        // The source list is left alone.
        let original = ScenarioEntities::load(&files.entities).unwrap();
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn test_populate_flooded_map_adds_nothing() {
        // raw 0 decodes to altitude -20
        let (_dir, config) = setup(0);
        let files = select_map(&config, Some("mesa")).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let report = populate(&config, &files, Some(64.0), &mut rng).unwrap();
        assert!(report.outcome.entities.is_empty());
        assert_eq!(
            report.outcome.rejections.total(),
            report.outcome.candidates_considered
        );
    }

    #[test]
    fn test_missing_map_file() {
        let (_dir, config) = setup(1);
        let files = select_map(&config, Some("elsewhere")).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(matches!(
            populate(&config, &files, None, &mut rng),
            Err(CliError::MissingMapFile { .. })
        ));
    }

    #[test]
    fn test_select_map_uses_last_used() {
        let (_dir, mut config) = setup(1);
        assert!(matches!(
            select_map(&config, None),
            Err(CliError::NoMapSelected)
        ));
        config.remember_map("mesa");
        assert_eq!(select_map(&config, None).unwrap().name, "mesa");
        assert_eq!(select_map(&config, Some("other")).unwrap().name, "other");
    }

    #[test]
    fn test_clusters_accumulate() {
        let (_dir, config) = setup(1);
        let files = select_map(&config, Some("mesa")).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let request = ClusterRequest::with_defaults(ResourceType::Stones, WorldPoint::new(30.0, 30.0));
        let first = cluster(&config, &files, request, &mut rng).unwrap();
        assert_eq!(first.source, files.entities);
        assert_eq!(first.entities.len(), ResourceType::Stones.defaults().count);

        let second = cluster(&config, &files, request, &mut rng).unwrap();
        assert_eq!(second.source, first.output);

        let written = ScenarioEntities::load(&second.output).unwrap();
        assert_eq!(written.len(), 2 + 2 * ResourceType::Stones.defaults().count);
    }

    #[test]
    fn test_populate_rejects_bad_map_dimension() {
        let (dir, config) = setup(40_000);
        let files = select_map(&config, Some("mesa")).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for bad in [f64::NAN, f64::INFINITY, 0.0, -5.0] {
            assert!(matches!(
                populate(&config, &files, Some(bad), &mut rng),
                Err(CliError::InvalidMapDimension(_))
            ));
        }
        assert!(!dir.path().join("mesa_populated.entities.json").exists());

        let report = populate(&config, &files, Some(32.0), &mut rng).unwrap();
        assert_eq!(report.map_dimension, 32.0);
    }

    #[test]
    fn test_cluster_without_free_uids() {
        let (dir, config) = setup(1);
        std::fs::write(
            dir.path().join("mesa.entities.json"),
            r#"{"entities":[{"uid":"18446744073709551615","template":"gaia/tree/oak",
                "position":{"x":"5.0","z":"5.0"}}]}"#,
        )
        .unwrap();
        let files = select_map(&config, Some("mesa")).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let request = ClusterRequest::with_defaults(ResourceType::Metals, WorldPoint::new(30.0, 30.0));
        let result = cluster(&config, &files, request, &mut rng);
        assert!(matches!(
            result,
            Err(CliError::Scenario {
                source: gaia_scenario::ScenarioError::UidSpaceExhausted(u64::MAX),
                ..
            })
        ));
        assert!(!files.output(&config.output.output_suffix).exists());
    }
}
