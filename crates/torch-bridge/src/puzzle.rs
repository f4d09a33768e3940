//! Puzzle representation types: entities, the duration table and the
//! bank configurations that make up the state graph.
//!
//! `PuzzleConfig` deserializes directly from the JSON puzzle format:
//! `{"entities": [{"id": "A", "duration": 1}, ...]}`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};

/// Identifier of an entity crossing the bridge
pub type EntityId = String;

/// Bank currently holding the light source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Far,
    Start,
}

impl Side {
    /// Binary encoding: 0 = far bank, 1 = start bank
    pub fn as_bit(self) -> u8 {
        match self {
            Side::Far => 0,
            Side::Start => 1,
        }
    }

    pub fn flip(self) -> Side {
        match self {
            Side::Far => Side::Start,
            Side::Start => Side::Far,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Far => write!(f, "far"),
            Side::Start => write!(f, "start"),
        }
    }
}

/// A single entity with its crossing duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub duration: u32,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, duration: u32) -> Self {
        Self {
            id: id.into(),
            duration,
        }
    }
}

/// Parses the inline `ID=DURATION` form used on the command line
impl FromStr for Entity {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PuzzleError::InvalidEntityArg(s.to_string());
        let (id, duration) = s.split_once('=').ok_or_else(invalid)?;
        let duration = duration.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Entity::new(id.trim(), duration))
    }
}

/// The complete puzzle input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub entities: Vec<Entity>,
}

impl PuzzleConfig {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// The classic four-person instance, solvable in 17
    pub fn classic() -> Self {
        Self::new(vec![
            Entity::new("A", 1),
            Entity::new("B", 2),
            Entity::new("C", 5),
            Entity::new("D", 10),
        ])
    }

    /// Check the input and produce the duration table the builder reads.
    ///
    /// Fails on an empty entity list, a blank or duplicate id, or a zero
    /// duration. Nothing is built when this fails.
    pub fn validate(&self) -> Result<DurationTable> {
        if self.entities.is_empty() {
            return Err(PuzzleError::NoEntities);
        }

        let mut durations = BTreeMap::new();
        for entity in &self.entities {
            if entity.id.trim().is_empty() {
                return Err(PuzzleError::BlankEntityId);
            }
            if entity.duration == 0 {
                return Err(PuzzleError::NonPositiveDuration(entity.id.clone()));
            }
            if durations.insert(entity.id.clone(), entity.duration).is_some() {
                return Err(PuzzleError::DuplicateEntity(entity.id.clone()));
            }
        }

        Ok(DurationTable { durations })
    }
}

/// Validated mapping from entity id to crossing duration.
///
/// Only obtainable through [`PuzzleConfig::validate`], so it is never empty
/// and every duration is positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationTable {
    durations: BTreeMap<EntityId, u32>,
}

impl DurationTable {
    pub fn duration(&self, id: &str) -> Option<u32> {
        self.durations.get(id).copied()
    }

    /// All entity ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.durations.keys()
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Time for a group to cross together: the slowest member sets the pace.
    ///
    /// `None` if the group is empty or names an entity not in the table.
    pub fn crossing_time<'a>(
        &self,
        movers: impl IntoIterator<Item = &'a EntityId>,
    ) -> Option<u64> {
        let mut slowest: Option<u32> = None;
        for id in movers {
            slowest = slowest.max(Some(self.duration(id)?));
        }
        slowest.map(u64::from)
    }
}

/// A node of the state graph: who is still on the start bank, and where
/// the light is. Equality and hashing are by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    start_bank: BTreeSet<EntityId>,
    light: Side,
}

impl Configuration {
    pub fn new(start_bank: BTreeSet<EntityId>, light: Side) -> Self {
        Self { start_bank, light }
    }

    /// Everyone and the light on the start bank
    pub fn initial(table: &DurationTable) -> Self {
        Self::new(table.ids().cloned().collect(), Side::Start)
    }

    /// Nobody left on the start bank, light on the far bank
    pub fn goal() -> Self {
        Self::new(BTreeSet::new(), Side::Far)
    }

    pub fn start_bank(&self) -> &BTreeSet<EntityId> {
        &self.start_bank
    }

    pub fn light(&self) -> Side {
        self.light
    }

    /// A configuration with an empty start bank is never expanded
    pub fn is_terminal(&self) -> bool {
        self.start_bank.is_empty()
    }

    /// The configuration after `movers` cross away from the start bank
    pub fn after_departure(&self, movers: &[&EntityId]) -> Self {
        let mut start_bank = self.start_bank.clone();
        for id in movers {
            start_bank.remove(id.as_str());
        }
        Self::new(start_bank, self.light.flip())
    }

    /// The configuration after `id` walks back to the start bank
    pub fn after_return(&self, id: &EntityId) -> Self {
        let mut start_bank = self.start_bank.clone();
        start_bank.insert(id.clone());
        Self::new(start_bank, self.light.flip())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.start_bank.iter().map(String::as_str).collect();
        write!(
            f,
            "[{}], light: {} ({})",
            names.join(", "),
            self.light,
            self.light.as_bit()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bank(ids: &[&str]) -> BTreeSet<EntityId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_side_flip_and_bits() {
        assert_eq!(Side::Start.flip(), Side::Far);
        assert_eq!(Side::Far.flip(), Side::Start);
        assert_eq!(Side::Far.as_bit(), 0);
        assert_eq!(Side::Start.as_bit(), 1);
    }

    #[test]
    fn test_configuration_equality_is_structural() {
        let a = Configuration::new(bank(&["A", "B"]), Side::Start);
        let b = Configuration::new(bank(&["B", "A"]), Side::Start);
        let c = Configuration::new(bank(&["A", "B"]), Side::Far);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Configuration> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(matches!(
            PuzzleConfig::default().validate(),
            Err(PuzzleError::NoEntities)
        ));

        let duplicate = PuzzleConfig::new(vec![Entity::new("A", 1), Entity::new("A", 2)]);
        assert!(matches!(
            duplicate.validate(),
            Err(PuzzleError::DuplicateEntity(id)) if id == "A"
        ));

        let zero = PuzzleConfig::new(vec![Entity::new("A", 1), Entity::new("B", 0)]);
        assert!(matches!(
            zero.validate(),
            Err(PuzzleError::NonPositiveDuration(id)) if id == "B"
        ));

        let blank = PuzzleConfig::new(vec![Entity::new("  ", 1)]);
        assert!(matches!(blank.validate(), Err(PuzzleError::BlankEntityId)));
    }

    #[test]
    fn test_duration_table() {
        let table = PuzzleConfig::classic().validate().unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.duration("C"), Some(5));
        assert_eq!(table.duration("Z"), None);

        let pair = ["B".to_string(), "D".to_string()];
        assert_eq!(table.crossing_time(&pair), Some(10));

        let unknown = ["A".to_string(), "Z".to_string()];
        assert_eq!(table.crossing_time(&unknown), None);
        assert_eq!(table.crossing_time(&[] as &[EntityId]), None);
    }

    #[test]
    fn test_initial_and_goal() {
        let table = PuzzleConfig::classic().validate().unwrap();
        let initial = Configuration::initial(&table);
        assert_eq!(initial.start_bank(), &bank(&["A", "B", "C", "D"]));
        assert_eq!(initial.light(), Side::Start);
        assert!(!initial.is_terminal());

        let goal = Configuration::goal();
        assert!(goal.is_terminal());
        assert_eq!(goal.light(), Side::Far);
    }

    #[test]
    fn test_departure_and_return() {
        let initial = Configuration::new(bank(&["A", "B", "C"]), Side::Start);
        let a = "A".to_string();
        let c = "C".to_string();

        let crossed = initial.after_departure(&[&a, &c]);
        assert_eq!(crossed, Configuration::new(bank(&["B"]), Side::Far));

        let back = crossed.after_return(&a);
        assert_eq!(back, Configuration::new(bank(&["A", "B"]), Side::Start));
    }

    #[test]
    fn test_entity_from_str() {
        assert_eq!("A=1".parse::<Entity>().unwrap(), Entity::new("A", 1));
        assert_eq!(" Bob = 12 ".parse::<Entity>().unwrap(), Entity::new("Bob", 12));
        assert!(matches!(
            "A".parse::<Entity>(),
            Err(PuzzleError::InvalidEntityArg(_))
        ));
        assert!("A=-3".parse::<Entity>().is_err());
    }

    #[test]
    fn test_puzzle_json() {
        let json = r#"{"entities": [{"id": "A", "duration": 1}, {"id": "B", "duration": 2}]}"#;
        let puzzle: PuzzleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(puzzle.entities, vec![Entity::new("A", 1), Entity::new("B", 2)]);
    }

    #[test]
    fn test_configuration_display() {
        let config = Configuration::new(bank(&["C", "A"]), Side::Start);
        assert_eq!(config.to_string(), "[A, C], light: start (1)");
        assert_eq!(Configuration::goal().to_string(), "[], light: far (0)");
    }
}
