//! Entity records as stored in the scenario, and the typed entities the
//! populator creates.

use gaia_terrain::WorldPoint;
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;

/// Template substring that marks a civil centre.
pub const CIVIL_CENTRE_MARKER: &str = "civil_centre";

/// Exclusive upper bound of actor render seeds.
pub const MAX_ACTOR_SEED: u32 = 60_000;

/// `Position` attributes, string-encoded with four decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub x: String,
    pub z: String,
}

/// `Orientation` attributes, string-encoded with five decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationRecord {
    pub y: String,
}

/// `Actor` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub seed: String,
}

/// One entity of the scenario, with every field in its stored string form.
///
/// Fields other than these are owned by the scenario serializer and never
/// reach this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub uid: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    pub position: PositionRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<OrientationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorRecord>,
}

impl EntityRecord {
    /// Parse the uid.
    pub fn uid(&self) -> Result<u64, ScenarioError> {
        self.uid.trim().parse().map_err(|_| ScenarioError::InvalidUid {
            uid: self.uid.clone(),
        })
    }

    /// Parse the position.
    pub fn position(&self) -> Result<WorldPoint, ScenarioError> {
        let axis = |axis: &'static str, value: &str| {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ScenarioError::InvalidPosition {
                    uid: self.uid.clone(),
                    axis,
                    value: value.to_string(),
                })
        };
        Ok(WorldPoint::new(
            axis("x", &self.position.x)?,
            axis("z", &self.position.z)?,
        ))
    }

    /// `true` if the template names a civil centre.
    pub fn is_civil_centre(&self) -> bool {
        self.template.contains(CIVIL_CENTRE_MARKER)
    }
}

/// An entity created by the populator, before string encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Unique id within the scenario.
    pub uid: u64,
    /// Template path, e.g. `gaia/tree/oak`.
    pub template: String,
    /// Position on the map plane.
    pub position: WorldPoint,
    /// Rotation about the vertical axis, in radians.
    pub rotation: f64,
    /// Actor render seed in `[0, MAX_ACTOR_SEED)`.
    pub seed: Option<u32>,
}

impl Entity {
    /// Encode as a scenario record. Gaia entities carry no player.
    pub fn to_record(&self) -> EntityRecord {
        EntityRecord {
            uid: self.uid.to_string(),
            template: self.template.clone(),
            player: None,
            position: PositionRecord {
                x: format!("{:.4}", self.position.x),
                z: format!("{:.4}", self.position.z),
            },
            orientation: Some(OrientationRecord {
                y: format!("{:.5}", self.rotation),
            }),
            actor: self.seed.map(|seed| ActorRecord {
                seed: seed.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uid: &str, template: &str, x: &str, z: &str) -> EntityRecord {
        EntityRecord {
            uid: uid.into(),
            template: template.into(),
            player: Some("1".into()),
            position: PositionRecord {
                x: x.into(),
                z: z.into(),
            },
            orientation: None,
            actor: None,
        }
    }

    #[test]
    fn test_entity_encoding_precision() {
        let entity = Entity {
            uid: 412,
            template: "gaia/tree/oak".into(),
            position: WorldPoint::new(12.345_678, 1000.0),
            rotation: std::f64::consts::PI,
            seed: Some(59_999),
        };
        let record = entity.to_record();
        assert_eq!(record.uid, "412");
        assert_eq!(record.position.x, "12.3457");
        assert_eq!(record.position.z, "1000.0000");
        assert_eq!(record.orientation.unwrap().y, "3.14159");
        assert_eq!(record.actor.unwrap().seed, "59999");
        assert!(record.player.is_none());
    }

    #[test]
    fn test_record_parsing() {
        let r = record(" 17 ", "units/athen/civil_centre", "100.5", "-3");
        assert_eq!(r.uid().unwrap(), 17);
        assert_eq!(r.position().unwrap(), WorldPoint::new(100.5, -3.0));
        assert!(r.is_civil_centre());
        assert!(!record("1", "gaia/tree/oak", "0", "0").is_civil_centre());
    }

    #[test]
    fn test_record_parse_failures() {
        assert!(matches!(
            record("-4", "t", "0", "0").uid(),
            Err(ScenarioError::InvalidUid { .. })
        ));
        assert!(matches!(
            record("5", "t", "abc", "0").position(),
            Err(ScenarioError::InvalidPosition { axis: "x", .. })
        ));
        assert!(matches!(
            record("5", "t", "1", "NaN").position(),
            Err(ScenarioError::InvalidPosition { axis: "z", .. })
        ));
    }

    #[test]
    fn test_record_json_shape() {
        let json = r#"{"uid":"3","template":"skirmish/structures/default_civil_centre","position":{"x":"1.0","z":"2.0"}}"#;
        let r: EntityRecord = serde_json::from_str(json).unwrap();
        assert!(r.is_civil_centre());
        assert!(r.orientation.is_none());
        let back = serde_json::to_string(&r).unwrap();
        assert!(!back.contains("player"));
        assert!(!back.contains("actor"));
    }
}
