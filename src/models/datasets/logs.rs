use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::datasets::lenient;
use crate::models::datasets::values::TypedValue;

////////////////////////////////////// Raw Data ////////////////////////////////////////
#[derive(Debug, Clone, PartialEq)]
pub enum LogPayload {
    // Decoded against a known event ABI, keyed by argument name
    Parsed(BTreeMap<String, TypedValue>),
    // Raw `{address, topics, data}` log the runner could not decode
    NotParsed(Value),
}

impl LogPayload {
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(mut map) => {
                if let Some(parsed) = map.remove("Parsed") {
                    let fields = match parsed {
                        Value::Object(fields) => fields
                            .into_iter()
                            .map(|(name, value)| (name, TypedValue::from_json(value)))
                            .collect(),
                        _ => BTreeMap::new(),
                    };
                    Some(LogPayload::Parsed(fields))
                } else if let Some(raw) = map.remove("NotParsed") {
                    Some(LogPayload::NotParsed(raw))
                } else {
                    Some(LogPayload::NotParsed(Value::Object(map)))
                }
            }
            other => Some(LogPayload::NotParsed(other)),
        }
    }
}

fn deserialize_payload<'de, D>(deserializer: D) -> Result<Option<LogPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(LogPayload::from_json)
}

// A log emitted during one call frame (nested frames keep their own logs)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLogEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub event: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_payload")]
    pub log: Option<LogPayload>,
    // Argument fields written next to `log` rather than inside it
    #[serde(flatten)]
    pub fields: BTreeMap<String, TypedValue>,
}

impl RawLogEntry {
    pub fn field(&self, name: &str) -> Option<&TypedValue> {
        let parsed = match &self.log {
            Some(LogPayload::Parsed(parsed)) => parsed.get(name),
            _ => None,
        };
        parsed.or_else(|| self.fields.get(name))
    }

    // Sole argument of a `log_bytes32` entry, whose ABI parameter is unnamed
    pub fn first_value(&self) -> Option<&TypedValue> {
        self.field("").or_else(|| match &self.log {
            Some(LogPayload::Parsed(parsed)) => parsed.values().next(),
            _ => self.fields.values().next(),
        })
    }
}

////////////////////////////////// Decoded Data ////////////////////////////////////////
// One logical debug record regrouped from a run of raw log entries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogRecord {
    pub name: Option<String>,
    pub event: Option<String>,
    // Set once the record has been closed by the grouping protocol
    pub grouped: bool,
    pub fields: Vec<(String, String)>,
}

impl LogRecord {
    pub fn opened(name: String, event: String) -> Self {
        Self {
            name: Some(name),
            event: Some(event),
            ..Default::default()
        }
    }

    pub fn set_field(&mut self, key: String, value: String) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.event.is_none() && self.fields.is_empty()
    }
}
