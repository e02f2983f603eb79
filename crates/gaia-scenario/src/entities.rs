//! The scenario's entity list and uid allocation.

use std::collections::HashSet;
use std::path::Path;

use gaia_terrain::WorldPoint;
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::record::{Entity, EntityRecord};

/// On-disk shape of an entity list.
#[derive(Serialize, Deserialize)]
struct EntityFile {
    #[serde(default)]
    entities: Vec<EntityRecord>,
}

/// Append-only list of scenario entities with unique uids.
///
/// Existing records are never modified or removed; new entities are only
/// ever appended.
#[derive(Debug, Clone, Default)]
pub struct ScenarioEntities {
    records: Vec<EntityRecord>,
    uids: HashSet<u64>,
}

impl ScenarioEntities {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt existing records, checking that every uid parses and is unique.
    pub fn from_records(records: Vec<EntityRecord>) -> Result<Self, ScenarioError> {
        let mut uids = HashSet::with_capacity(records.len());
        for record in &records {
            let uid = record.uid()?;
            if !uids.insert(uid) {
                return Err(ScenarioError::DuplicateUid(uid));
            }
        }
        Ok(Self { records, uids })
    }

    /// Load an entity list from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path).map_err(ScenarioError::ReadError)?;
        let file: EntityFile = serde_json::from_str(&contents).map_err(ScenarioError::ParseError)?;
        let entities = Self::from_records(file.entities)?;
        tracing::info!(
            path = %path.display(),
            count = entities.len(),
            "loaded entity list"
        );
        Ok(entities)
    }

    /// Write the entity list to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ScenarioError> {
        let file = EntityFile {
            entities: self.records.clone(),
        };
        let serialized =
            serde_json::to_string_pretty(&file).map_err(ScenarioError::SerializeError)?;
        std::fs::write(path, serialized).map_err(ScenarioError::WriteError)?;
        tracing::info!(path = %path.display(), count = self.len(), "saved entity list");
        Ok(())
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `true` if an entity with `uid` is present.
    pub fn contains_uid(&self, uid: u64) -> bool {
        self.uids.contains(&uid)
    }

    /// Highest uid in the list.
    pub fn max_uid(&self) -> Option<u64> {
        self.uids.iter().copied().max()
    }

    /// Positions of every civil centre, in list order.
    pub fn civil_centres(&self) -> Result<Vec<WorldPoint>, ScenarioError> {
        self.records
            .iter()
            .filter(|r| r.is_civil_centre())
            .map(EntityRecord::position)
            .collect()
    }

    /// Append one entity. Fails without modifying the list if its uid is taken.
    pub fn append(&mut self, entity: &Entity) -> Result<(), ScenarioError> {
        if self.contains_uid(entity.uid) {
            return Err(ScenarioError::DuplicateUid(entity.uid));
        }
        self.uids.insert(entity.uid);
        self.records.push(entity.to_record());
        Ok(())
    }

    /// Append a batch, stopping at the first uid collision.
    ///
    /// Entities before the collision stay appended. Returns the number added.
    pub fn extend<'a>(
        &mut self,
        entities: impl IntoIterator<Item = &'a Entity>,
    ) -> Result<usize, ScenarioError> {
        let mut added = 0;
        for entity in entities {
            self.append(entity)?;
            added += 1;
        }
        Ok(added)
    }
}

/// Hands out uids above every uid present when it was created.
#[derive(Debug, Clone)]
pub struct UidAllocator {
    /// `None` once `u64::MAX` has been handed out or was already taken.
    next: Option<u64>,
    last: u64,
}

impl UidAllocator {
    /// Start one past the highest uid in `entities` (0 for an empty list).
    pub fn above(entities: &ScenarioEntities) -> Self {
        match entities.max_uid() {
            Some(max) => Self {
                next: max.checked_add(1),
                last: max,
            },
            None => Self::starting_at(0),
        }
    }

    /// Start at an explicit uid.
    pub fn starting_at(next: u64) -> Self {
        Self {
            next: Some(next),
            last: next.saturating_sub(1),
        }
    }

    /// The uid the next call to [`UidAllocator::next_uid`] returns, if any.
    pub fn peek(&self) -> Option<u64> {
        self.next
    }

    /// Take the next uid.
    pub fn next_uid(&mut self) -> Result<u64, ScenarioError> {
        let uid = self.next.ok_or(ScenarioError::UidSpaceExhausted(self.last))?;
        self.last = uid;
        self.next = uid.checked_add(1);
        Ok(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PositionRecord;

    fn record(uid: &str, template: &str, x: f64, z: f64) -> EntityRecord {
        EntityRecord {
            uid: uid.into(),
            template: template.into(),
            player: None,
            position: PositionRecord {
                x: x.to_string(),
                z: z.to_string(),
            },
            orientation: None,
            actor: None,
        }
    }

    fn entity(uid: u64) -> Entity {
        Entity {
            uid,
            template: "gaia/rock/alpine_large".into(),
            position: WorldPoint::new(10.0, 20.0),
            rotation: 0.5,
            seed: Some(9),
        }
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let result = ScenarioEntities::from_records(vec![
            record("4", "a", 0.0, 0.0),
            record("04", "b", 1.0, 1.0),
        ]);
        assert!(matches!(result, Err(ScenarioError::DuplicateUid(4))));
    }

    #[test]
    fn test_civil_centres_by_template_substring() {
        let list = ScenarioEntities::from_records(vec![
            record("1", "units/iber/civil_centre", 100.0, 200.0),
            record("2", "gaia/tree/oak", 5.0, 5.0),
            record("3", "structures/mace/civil_centre_military_colony", 300.0, 400.0),
        ])
        .unwrap();
        assert_eq!(
            list.civil_centres().unwrap(),
            vec![WorldPoint::new(100.0, 200.0), WorldPoint::new(300.0, 400.0)]
        );
    }

    #[test]
    fn test_allocator_starts_above_highest_uid() {
        let list = ScenarioEntities::from_records(vec![
            record("7", "a", 0.0, 0.0),
            record("250", "b", 0.0, 0.0),
            record("3", "c", 0.0, 0.0),
        ])
        .unwrap();
        let mut uids = UidAllocator::above(&list);
        assert_eq!(uids.next_uid().unwrap(), 251);
        assert_eq!(uids.next_uid().unwrap(), 252);
        assert_eq!(uids.peek(), Some(253));

        assert_eq!(UidAllocator::above(&ScenarioEntities::new()).peek(), Some(0));
    }

    #[test]
    fn test_allocator_refuses_to_wrap() {
        let list = ScenarioEntities::from_records(vec![record(&u64::MAX.to_string(), "a", 0.0, 0.0)])
            .unwrap();
        let mut uids = UidAllocator::above(&list);
        assert_eq!(uids.peek(), None);
        assert!(matches!(
            uids.next_uid(),
            Err(ScenarioError::UidSpaceExhausted(u64::MAX))
        ));

        let mut uids = UidAllocator::starting_at(u64::MAX - 1);
        assert_eq!(uids.next_uid().unwrap(), u64::MAX - 1);
        assert_eq!(uids.next_uid().unwrap(), u64::MAX);
        assert!(matches!(
            uids.next_uid(),
            Err(ScenarioError::UidSpaceExhausted(_))
        ));
    }

    #[test]
    fn test_append_rejects_taken_uid() {
        let mut list = ScenarioEntities::from_records(vec![record("5", "a", 0.0, 0.0)]).unwrap();
        assert!(matches!(
            list.append(&entity(5)),
            Err(ScenarioError::DuplicateUid(5))
        ));
        assert_eq!(list.len(), 1);

        list.append(&entity(6)).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains_uid(6));
        assert_eq!(list.records()[1].uid, "6");
    }

    #[test]
    fn test_extend_counts_additions() {
        let mut list = ScenarioEntities::new();
        let batch = vec![entity(1), entity(2), entity(2), entity(3)];
        let result = list.extend(&batch);
        assert!(matches!(result, Err(ScenarioError::DuplicateUid(2))));
        assert_eq!(list.len(), 2);

        let added = list.extend(&[entity(10), entity(11)]).unwrap();
        assert_eq!(added, 2);
        assert_eq!(list.max_uid(), Some(11));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arcadia.entities.json");

        let mut list =
            ScenarioEntities::from_records(vec![record("1", "units/cc/civil_centre", 1.0, 2.0)])
                .unwrap();
        list.append(&entity(2)).unwrap();
        list.save(&path).unwrap();

        let loaded = ScenarioEntities::load(&path).unwrap();
        assert_eq!(loaded.records(), list.records());
        assert_eq!(loaded.max_uid(), Some(2));
    }

    #[test]
    fn test_load_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(ScenarioEntities::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ScenarioEntities::load(&path),
            Err(ScenarioError::ParseError(_))
        ));
    }
}
