use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sky_cursor::{MemoryStore, PropertyTable};
use sky_pathcodec::{timestamp, ActionId, DataType, PathBuffer, PropertyId, Value};

/// A table described in JSON: its properties and the events of each object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// Overrides the idle threshold from the environment when set.
    #[serde(default)]
    pub session_idle_secs: Option<u32>,
    pub properties: PropertyTable,
    #[serde(default)]
    pub objects: Vec<ObjectFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFixture {
    pub id: String,
    #[serde(default)]
    pub events: Vec<EventFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFixture {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub action_id: ActionId,
    /// Property values keyed by property name.
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Fixture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("invalid fixture {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| anyhow!(e))
    }

    /// Names of every property, in table order.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    /// Encodes the path of every object into a new store.
    pub fn build_store(&self) -> Result<MemoryStore> {
        let mut store = MemoryStore::new();
        for object in &self.objects {
            let path = self
                .encode_path(object)
                .with_context(|| format!("failed to encode object {}", object.id))?;
            log::debug!(
                "encoded {} events of {} into {} bytes",
                object.events.len(),
                object.id,
                path.len()
            );
            store.put(object.id.clone(), path);
        }
        Ok(store)
    }

    /// Encodes the events of an object in time order.
    pub fn encode_path(&self, object: &ObjectFixture) -> Result<Bytes> {
        let mut events: Vec<&EventFixture> = object.events.iter().collect();
        events.sort_by_key(|e| e.timestamp);

        let mut buf = PathBuffer::new();
        let mut properties: Vec<(PropertyId, Value)> = Vec::new();
        for event in events {
            properties.clear();
            for (name, json) in &event.data {
                let property = self
                    .properties
                    .find_by_name(name)
                    .ok_or_else(|| anyhow!("unknown property {:?}", name))?;
                if json.is_null() {
                    continue;
                }
                let value = json_value(property.data_type, json)
                    .with_context(|| format!("property {:?}", name))?;
                properties.push((property.id, value));
            }
            buf.event_at(
                timestamp::from_datetime(&event.timestamp),
                event.action_id,
                &properties,
            );
        }
        Ok(buf.freeze())
    }
}

fn json_value(data_type: DataType, json: &serde_json::Value) -> Result<Value> {
    let value = match data_type {
        DataType::String => json.as_str().map(Value::from),
        DataType::Int => json.as_i64().map(Value::Int),
        DataType::Double => json.as_f64().map(Value::Double),
        DataType::Boolean => json.as_bool().map(Value::Boolean),
        DataType::None => bail!("property has no data type"),
    };
    value.ok_or_else(|| anyhow!("expected {}, got {}", data_type, json))
}
