use crate::core::error::DataError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveCategory::Physical => "physical",
            MoveCategory::Special => "special",
            MoveCategory::Status => "status",
        };
        f.write_str(name)
    }
}

fn default_accuracy() -> u32 {
    100
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u32,
    /// Percent chance to hit before stage modifiers.
    #[serde(default = "default_accuracy")]
    pub accuracy: u32,
    #[serde(default)]
    pub priority: i32,
    pub pp: u32,
}

impl MoveData {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MoveDatabase {
    moves: HashMap<String, MoveData>,
}

impl MoveDatabase {
    pub fn new() -> Self {
        Self {
            moves: HashMap::new(),
        }
    }

    pub fn minimal() -> Self {
        let mut db = Self::new();
        let mut add = |id: &str, name: &str, move_type: &str, category: MoveCategory, power: u32, pp: u32| {
            db.insert(MoveData {
                id: id.to_string(),
                name: Some(name.to_string()),
                move_type: move_type.to_string(),
                category,
                power,
                accuracy: 100,
                priority: 0,
                pp,
            });
        };
        add("tackle", "Tackle", "normal", MoveCategory::Physical, 40, 35);
        add("ember", "Ember", "fire", MoveCategory::Special, 40, 25);
        add("water_gun", "Water Gun", "water", MoveCategory::Special, 40, 25);
        add("vine_whip", "Vine Whip", "grass", MoveCategory::Physical, 45, 25);
        add("thunder_shock", "Thunder Shock", "electric", MoveCategory::Special, 40, 30);
        add("growl", "Growl", "normal", MoveCategory::Status, 0, 40);
        db
    }

    pub fn load_default() -> Result<Self, DataError> {
        const DEFAULT_MOVES_YAML: &str = include_str!("../../data/moves.yaml");
        Self::load_from_yaml_str(DEFAULT_MOVES_YAML)
    }

    pub fn insert(&mut self, move_data: MoveData) {
        self.moves.insert(move_data.id.clone(), move_data);
    }

    pub fn get(&self, move_id: &str) -> Option<&MoveData> {
        self.moves.get(move_id)
    }

    pub fn as_map(&self) -> &HashMap<String, MoveData> {
        &self.moves
    }

    /// Accepts either a map keyed by move id or a list of moves.
    pub fn load_from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        let entries: Vec<serde_yaml::Value> = match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
            serde_yaml::Value::Mapping(map) => map
                .into_iter()
                .map(|(key, raw)| with_yaml_id(key, raw))
                .collect(),
            serde_yaml::Value::Sequence(list) => list,
            _ => {
                return Err(DataError::Invalid(
                    "moves must be a map or a list".to_string(),
                ))
            }
        };

        let mut db = Self::new();
        for raw in entries {
            let move_data: MoveData = serde_yaml::from_value(raw)?;
            if move_data.accuracy > 100 {
                return Err(DataError::Invalid(format!(
                    "move '{}' has accuracy {} above 100",
                    move_data.id, move_data.accuracy
                )));
            }
            db.insert(move_data);
        }
        tracing::debug!(count = db.moves.len(), "loaded moves");
        Ok(db)
    }

    pub fn load_from_yaml_file(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path)?;
        Self::load_from_yaml_str(&content)
    }
}

/// Entries keyed by id may omit the `id` field.
fn with_yaml_id(key: serde_yaml::Value, raw: serde_yaml::Value) -> serde_yaml::Value {
    match raw {
        serde_yaml::Value::Mapping(mut map) => {
            let id_key = serde_yaml::Value::String("id".to_string());
            if !map.contains_key(&id_key) {
                map.insert(id_key, key);
            }
            serde_yaml::Value::Mapping(map)
        }
        other => other,
    }
}
