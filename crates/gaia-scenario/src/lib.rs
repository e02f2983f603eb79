//! Scenario entity list shared with the external scenario serializer.
//!
//! The scenario XML itself is owned elsewhere; this crate models the handful
//! of entity fields the populator reads and writes, keeps uids unique, and
//! exchanges the list as JSON.

mod entities;
mod error;
mod record;

pub use entities::{ScenarioEntities, UidAllocator};
pub use error::ScenarioError;
pub use record::{
    ActorRecord, CIVIL_CENTRE_MARKER, Entity, EntityRecord, MAX_ACTOR_SEED, OrientationRecord,
    PositionRecord,
};
