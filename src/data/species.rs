use crate::core::error::DataError;
use crate::data::growth::GrowthRate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spa: i32,
    pub spd: i32,
    pub spe: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "type")]
    pub types: Vec<String>,
    #[serde(rename = "baseStats")]
    pub base_stats: BaseStats,
    /// Experience yield when defeated.
    #[serde(rename = "baseExp", default)]
    pub base_exp: u32,
    #[serde(rename = "growthRate", default)]
    pub growth_rate: GrowthRate,
}

#[derive(Clone, Debug, Default)]
pub struct SpeciesDatabase {
    species: HashMap<String, SpeciesData>,
}

impl SpeciesDatabase {
    pub fn new() -> Self {
        Self {
            species: HashMap::new(),
        }
    }

    pub fn insert(&mut self, data: SpeciesData) {
        self.species.insert(data.id.clone(), data);
    }

    pub fn get(&self, species_id: &str) -> Option<&SpeciesData> {
        self.species.get(species_id)
    }

    pub fn as_map(&self) -> &HashMap<String, SpeciesData> {
        &self.species
    }

    /// Accepts either `{ "species": { id: data } }` or a bare `{ id: data }` map.
    pub fn load_from_json_str(json: &str) -> Result<Self, DataError> {
        let value: Value = serde_json::from_str(json)?;
        let map_value = match value.as_object().and_then(|obj| obj.get("species")) {
            Some(inner) => inner.clone(),
            None => value,
        };
        let map: HashMap<String, Value> = serde_json::from_value(map_value)?;
        let mut db = Self::new();
        for (id, raw) in map {
            let raw = with_default_id(raw, &id);
            let data: SpeciesData = serde_json::from_value(raw)?;
            if data.types.is_empty() || data.types.len() > 2 {
                return Err(DataError::Invalid(format!(
                    "species '{}' must have one or two types",
                    data.id
                )));
            }
            db.insert(data);
        }
        tracing::debug!(count = db.species.len(), "loaded species");
        Ok(db)
    }

    pub fn load_from_json_file(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path)?;
        Self::load_from_json_str(&content)
    }

    pub fn load_default() -> Result<Self, DataError> {
        const DEFAULT_SPECIES_JSON: &str = include_str!("../../data/species.json");
        Self::load_from_json_str(DEFAULT_SPECIES_JSON)
    }
}

/// Entries keyed by id may omit the `id` field.
fn with_default_id(raw: Value, id: &str) -> Value {
    match raw {
        Value::Object(mut obj) => {
            obj.entry("id".to_string())
                .or_insert_with(|| Value::String(id.to_string()));
            Value::Object(obj)
        }
        other => other,
    }
}
