pub mod logs;
pub mod traces;
pub mod values;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

// Field reader for runner payloads: `null` or a value of the wrong JSON type reads as
// the default instead of failing the whole frame
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            debug!("Ignoring malformed field: {}", e);
            Ok(T::default())
        }
    }
}
