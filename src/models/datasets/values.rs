use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

////////////////////////////////////// Raw Data ////////////////////////////////////////
// Numeric payload of an `Int`/`Uint` token. The runner writes 256-bit words as hex
// strings, hand-written fixtures tend to use decimal strings or plain numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNumber {
    Text(String),
    Number(Number),
}

// A single ABI token as emitted by the test runner: `{"<Tag>": <payload>}`
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Address(String),
    FixedBytes(String),
    Bytes(String),
    Int(RawNumber),
    Uint(RawNumber),
    Bool(bool),
    String(String),
    FixedArray(Vec<TypedValue>),
    Array(Vec<TypedValue>),
    Tuple(Vec<TypedValue>),
    // Unknown tag, or a known tag whose payload has the wrong JSON type
    Other { tag: String, value: Value },
}

impl TypedValue {
    pub fn from_json(value: Value) -> Self {
        let map = match value {
            Value::Object(map) if map.len() == 1 => map,
            other => {
                return TypedValue::Other {
                    tag: String::new(),
                    value: other,
                };
            }
        };
        let Some((tag, payload)) = map.into_iter().next() else {
            return TypedValue::Other {
                tag: String::new(),
                value: Value::Null,
            };
        };

        match (tag.as_str(), payload) {
            ("Address", Value::String(s)) => TypedValue::Address(s),
            ("FixedBytes", Value::String(s)) => TypedValue::FixedBytes(s),
            ("Bytes", Value::String(s)) => TypedValue::Bytes(s),
            ("Int", Value::String(s)) => TypedValue::Int(RawNumber::Text(s)),
            ("Int", Value::Number(n)) => TypedValue::Int(RawNumber::Number(n)),
            ("Uint", Value::String(s)) => TypedValue::Uint(RawNumber::Text(s)),
            ("Uint", Value::Number(n)) => TypedValue::Uint(RawNumber::Number(n)),
            ("Bool", Value::Bool(b)) => TypedValue::Bool(b),
            ("String", Value::String(s)) => TypedValue::String(s),
            ("FixedArray", Value::Array(items)) => TypedValue::FixedArray(parse_items(items)),
            ("Array", Value::Array(items)) => TypedValue::Array(parse_items(items)),
            ("Tuple", Value::Array(items)) => TypedValue::Tuple(parse_items(items)),
            (_, payload) => TypedValue::Other {
                tag: tag.clone(),
                value: payload,
            },
        }
    }

    // Elements of an array-like token, `None` for scalars
    pub fn as_items(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::FixedArray(items) | TypedValue::Array(items) | TypedValue::Tuple(items) => {
                Some(items)
            }
            _ => None,
        }
    }
}

fn parse_items(items: Vec<Value>) -> Vec<TypedValue> {
    items.into_iter().map(TypedValue::from_json).collect()
}

impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(TypedValue::from_json)
    }
}

// `inputs` / `output` of a call: `{"Tokens": [...]}`, `{"String": "..."}` or nothing usable
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CallData {
    Tokens(Vec<TypedValue>),
    String(String),
    #[default]
    Empty,
}

impl CallData {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                if let Some(Value::Array(items)) = map.remove("Tokens") {
                    CallData::Tokens(parse_items(items))
                } else if let Some(Value::String(s)) = map.remove("String") {
                    CallData::String(s)
                } else {
                    CallData::Empty
                }
            }
            Value::Array(items) => CallData::Tokens(parse_items(items)),
            Value::String(s) => CallData::String(s),
            _ => CallData::Empty,
        }
    }

    // Tokens, only when at least one is present
    pub fn tokens(&self) -> Option<&[TypedValue]> {
        match self {
            CallData::Tokens(tokens) if !tokens.is_empty() => Some(tokens),
            _ => None,
        }
    }

    // String payload, only when non-empty
    pub fn text(&self) -> Option<&str> {
        match self {
            CallData::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for CallData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(CallData::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_tags() {
        let value: TypedValue = serde_json::from_value(json!({"Uint": "0x0a"})).unwrap();
        assert_eq!(value, TypedValue::Uint(RawNumber::Text("0x0a".to_string())));

        let value: TypedValue =
            serde_json::from_value(json!({"Tuple": [{"Bool": true}, {"String": "hi"}]})).unwrap();
        assert_eq!(
            value,
            TypedValue::Tuple(vec![
                TypedValue::Bool(true),
                TypedValue::String("hi".to_string())
            ])
        );
    }

    #[test]
    fn unknown_tag_lands_in_other() {
        let value: TypedValue = serde_json::from_value(json!({"Function": "0xdeadbeef"})).unwrap();
        assert_eq!(
            value,
            TypedValue::Other {
                tag: "Function".to_string(),
                value: json!("0xdeadbeef")
            }
        );

        // Known tag with a payload of the wrong shape
        let value: TypedValue = serde_json::from_value(json!({"Bool": "yes"})).unwrap();
        assert!(matches!(value, TypedValue::Other { ref tag, .. } if tag == "Bool"));
    }

    #[test]
    fn call_data_shapes() {
        let data: CallData = serde_json::from_value(json!({"String": ""})).unwrap();
        assert_eq!(data, CallData::String(String::new()));
        assert!(data.text().is_none());

        let data: CallData = serde_json::from_value(json!({"Tokens": []})).unwrap();
        assert!(data.tokens().is_none());

        let data: CallData = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(data, CallData::Empty);
    }
}
