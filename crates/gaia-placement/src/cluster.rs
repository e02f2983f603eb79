//! Hand-placed resource clusters.
//!
//! Points are scattered over a disk around a user-chosen centre. Nothing is
//! filtered here: bounds, water and exclusion checks are up to the caller.

use std::f64::consts::TAU;

use gaia_scenario::{Entity, MAX_ACTOR_SEED, ScenarioEntities, ScenarioError, UidAllocator};
use gaia_terrain::WorldPoint;
use rand::Rng;

use crate::catalogue::{ResourceType, pick_from};

/// One user-anchored cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterRequest {
    pub center: WorldPoint,
    pub radius: f64,
    /// Fraction of `radius` the points spread over.
    pub density: f64,
    pub count: usize,
    pub resource_type: ResourceType,
}

impl ClusterRequest {
    /// A cluster at `center` using the resource type's default shape.
    pub fn with_defaults(resource_type: ResourceType, center: WorldPoint) -> Self {
        let defaults = resource_type.defaults();
        Self {
            center,
            radius: defaults.radius,
            density: defaults.density,
            count: defaults.count,
            resource_type,
        }
    }

    /// Largest distance a generated point can have from the centre.
    pub fn spread(&self) -> f64 {
        self.radius * self.density
    }
}

/// A generated cluster member, not yet assigned a uid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterPoint {
    pub position: WorldPoint,
    pub rotation: f64,
    pub template: &'static str,
}

/// Scatter `request.count` points uniformly by area over the cluster disk.
pub fn generate_cluster<R: Rng>(request: &ClusterRequest, rng: &mut R) -> Vec<ClusterPoint> {
    let spread = request.spread();
    let templates = request.resource_type.templates();

    (0..request.count)
        .map(|_| {
            let angle = rng.random_range(0.0..TAU);
            // sqrt keeps the density per unit area constant across the disk
            let distance = rng.random::<f64>().sqrt() * spread;
            let position = WorldPoint::new(
                request.center.x + angle.cos() * distance,
                request.center.z + angle.sin() * distance,
            );
            ClusterPoint {
                position,
                rotation: rng.random_range(0.0..TAU),
                template: pick_from(templates, rng),
            }
        })
        .collect()
}

/// Generate every requested cluster and turn the points into entities.
///
/// Uids start above the highest uid in `existing`, so the result can be
/// appended to it directly. Fails if the uid space above `existing` runs out.
pub fn materialize_clusters<R: Rng>(
    requests: &[ClusterRequest],
    existing: &ScenarioEntities,
    rng: &mut R,
) -> Result<Vec<Entity>, ScenarioError> {
    let mut uids = UidAllocator::above(existing);
    let mut entities = Vec::new();

    for request in requests {
        let points = generate_cluster(request, rng);
        tracing::debug!(
            resource_type = %request.resource_type,
            x = request.center.x,
            z = request.center.z,
            count = points.len(),
            "generated cluster"
        );
        for point in points {
            entities.push(Entity {
                uid: uids.next_uid()?,
                template: point.template.to_string(),
                position: point.position,
                rotation: point.rotation,
                seed: Some(rng.random_range(0..MAX_ACTOR_SEED)),
            });
        }
    }

    tracing::info!(
        clusters = requests.len(),
        entities = entities.len(),
        "materialized clusters"
    );
    Ok(entities)
}
