//! Whole-map resource population.
//!
//! Candidates are generated first (cluster centres plus square-jittered
//! satellites), then each one runs through a fixed filter chain:
//! map bounds, civil-centre exclusion, water level. Survivors get a
//! template from their altitude band and a fresh uid.

use std::f64::consts::TAU;

use gaia_scenario::{Entity, MAX_ACTOR_SEED, ScenarioEntities, ScenarioError, UidAllocator};
use gaia_terrain::{Heightmap, WorldPoint, altitude_at};
use rand::Rng;

use crate::catalogue::pick_template;

/// Attempts made to land a satellite inside the map before dropping it.
pub const SATELLITE_ATTEMPTS: u32 = 10;

/// Parameters for [`populate_resources`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// World-space extent of the map, in game units.
    pub map_dimension: f64,
    /// Number of cluster centres to generate.
    pub cluster_count: usize,
    /// Cluster radius; centres keep this margin from the map edge and
    /// satellites jitter within ±radius/2 of their centre.
    pub cluster_radius: f64,
    /// Satellites attempted around each centre.
    pub resources_per_cluster: usize,
    /// Candidates at or below this altitude are under water.
    pub water_altitude_threshold: f64,
    /// Candidates closer than this to a civil centre are rejected.
    pub exclusion_radius: f64,
}

/// Per-filter rejection tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    /// Candidates outside `[0, map_dimension)²`.
    pub bounds: usize,
    /// Candidates inside a civil centre's exclusion radius.
    pub exclusion: usize,
    /// Candidates at or below the water threshold.
    pub water: usize,
}

impl RejectionCounts {
    pub fn total(&self) -> usize {
        self.bounds + self.exclusion + self.water
    }
}

/// Result of a population run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOutcome {
    /// Newly created entities, ready to append to the scenario.
    pub entities: Vec<Entity>,
    /// Why the other candidates were dropped.
    pub rejections: RejectionCounts,
    /// Candidates that entered the filter chain.
    pub candidates_considered: usize,
}

/// Where a single candidate ends up in the filter chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateOutcome {
    OutOfBounds,
    Excluded,
    Underwater,
    /// Passed every filter; carries the sampled altitude.
    Accepted(f64),
}

/// Generate the candidate positions for a request.
///
/// Each cluster contributes its centre, drawn uniformly from
/// `[radius, map_dimension - radius]²`, followed by up to
/// `resources_per_cluster` satellites. A satellite that is still off the map
/// after [`SATELLITE_ATTEMPTS`] draws is dropped.
pub fn generate_candidates<R: Rng>(request: &PlacementRequest, rng: &mut R) -> Vec<WorldPoint> {
    let dim = request.map_dimension;
    let radius = request.cluster_radius;
    let span = dim - 2.0 * radius;
    let mut candidates =
        Vec::with_capacity(request.cluster_count * (request.resources_per_cluster + 1));

    for _ in 0..request.cluster_count {
        let centre = WorldPoint::new(
            radius + rng.random::<f64>() * span,
            radius + rng.random::<f64>() * span,
        );
        candidates.push(centre);

        for _ in 0..request.resources_per_cluster {
            let mut satellite = None;
            for _ in 0..SATELLITE_ATTEMPTS {
                let point = WorldPoint::new(
                    centre.x + (rng.random::<f64>() - 0.5) * radius,
                    centre.z + (rng.random::<f64>() - 0.5) * radius,
                );
                if point.is_within(dim) {
                    satellite = Some(point);
                    break;
                }
            }
            candidates.extend(satellite);
        }
    }

    candidates
}

/// Run one candidate through the filter chain.
pub fn classify_candidate(
    point: WorldPoint,
    heightmap: &Heightmap,
    civil_centres: &[WorldPoint],
    request: &PlacementRequest,
) -> CandidateOutcome {
    if !point.is_within(request.map_dimension) {
        return CandidateOutcome::OutOfBounds;
    }
    if civil_centres
        .iter()
        .any(|cc| cc.distance(&point) < request.exclusion_radius)
    {
        return CandidateOutcome::Excluded;
    }
    match altitude_at(point.x, point.z, heightmap, request.map_dimension) {
        Some(altitude) if f64::from(altitude) > request.water_altitude_threshold => {
            CandidateOutcome::Accepted(f64::from(altitude))
        }
        // An empty heightmap has no land to place on.
        _ => CandidateOutcome::Underwater,
    }
}

/// Populate the map around an existing scenario.
///
/// Civil centres and the uid floor are read from `existing`, which is left
/// untouched; append [`PlacementOutcome::entities`] to it afterwards.
pub fn populate_resources<R: Rng>(
    heightmap: &Heightmap,
    existing: &ScenarioEntities,
    request: &PlacementRequest,
    rng: &mut R,
) -> Result<PlacementOutcome, ScenarioError> {
    let civil_centres = existing.civil_centres()?;
    tracing::info!(civil_centres = civil_centres.len(), "found civil centres");
    let mut uids = UidAllocator::above(existing);
    tracing::debug!(first_uid = ?uids.peek(), "allocating uids");
    place_resources(heightmap, &civil_centres, &mut uids, request, rng)
}

/// Core of [`populate_resources`] with explicit civil centres and uid source.
///
/// Fails only when `uids` runs out before every accepted candidate has one.
pub fn place_resources<R: Rng>(
    heightmap: &Heightmap,
    civil_centres: &[WorldPoint],
    uids: &mut UidAllocator,
    request: &PlacementRequest,
    rng: &mut R,
) -> Result<PlacementOutcome, ScenarioError> {
    let candidates = generate_candidates(request, rng);
    let mut rejections = RejectionCounts::default();
    let mut entities = Vec::new();

    for &point in &candidates {
        match classify_candidate(point, heightmap, civil_centres, request) {
            CandidateOutcome::OutOfBounds => rejections.bounds += 1,
            CandidateOutcome::Excluded => rejections.exclusion += 1,
            CandidateOutcome::Underwater => {
                if rejections.water < 5 {
                    tracing::debug!(x = point.x, z = point.z, "rejected underwater candidate");
                }
                rejections.water += 1;
            }
            CandidateOutcome::Accepted(altitude) => {
                let template = pick_template(altitude, rng);
                entities.push(Entity {
                    uid: uids.next_uid()?,
                    template: template.to_string(),
                    position: point,
                    rotation: rng.random_range(0.0..TAU),
                    seed: Some(rng.random_range(0..MAX_ACTOR_SEED)),
                });
            }
        }
    }

    tracing::info!(
        candidates = candidates.len(),
        added = entities.len(),
        rejected_bounds = rejections.bounds,
        rejected_exclusion = rejections.exclusion,
        rejected_water = rejections.water,
        "placed resources"
    );

    Ok(PlacementOutcome {
        entities,
        rejections,
        candidates_considered: candidates.len(),
    })
}
