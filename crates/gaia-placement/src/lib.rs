//! Procedural resource placement on decoded terrain.
//!
//! Two generators feed new gaia entities into a scenario:
//!
//! - [`populate_resources`] scatters clusters across the whole map, rejecting
//!   candidates that fall off the map, near a civil centre, or under water,
//!   and picks templates by altitude band.
//! - [`generate_cluster`] scatters one user-anchored cluster uniformly over a
//!   disk, with no terrain gating.
//!
//! Every function takes its random source explicitly so runs can be replayed
//! from a seed.

mod catalogue;
mod cluster;
mod engine;

pub use catalogue::{
    AltitudeBand, COASTAL_FAUNA, COASTAL_FLORA, ClusterDefaults, ORES, ROCKS, ResourceType,
    TEMPERATE_FAUNA, TEMPERATE_FLORA, UnknownResourceType, pick_template,
};
pub use cluster::{ClusterPoint, ClusterRequest, generate_cluster, materialize_clusters};
pub use engine::{
    CandidateOutcome, PlacementOutcome, PlacementRequest, RejectionCounts, SATELLITE_ATTEMPTS,
    classify_candidate, generate_candidates, place_resources, populate_resources,
};
