use serde_json::Value;
use tracing::debug;

use crate::models::datasets::logs::{LogPayload, LogRecord, RawLogEntry};
use crate::models::datasets::values::TypedValue;
use crate::visualizer::transformations::values::{decode, decode_ascii, decode_ascii_lossy};

pub trait LogDecoder {
    fn decode_logs(&self) -> Vec<LogRecord>;
}

impl LogDecoder for [RawLogEntry] {
    fn decode_logs(&self) -> Vec<LogRecord> {
        decode_logs(self)
    }
}

// Event names of the test framework's logging helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogEvent {
    // `logs`: raw marker, carries nothing
    Marker,
    // `log_bytes32`: opens a new record type
    Open,
    // `log_named`: a record holding one anonymous value
    Anonymous,
    // `log_named_<type>`: adds `key => val` to the open record
    Named { text: bool },
    Other,
}

impl LogEvent {
    fn from_name(event: &str) -> Self {
        match event {
            "logs" => LogEvent::Marker,
            "log_bytes32" => LogEvent::Open,
            "log_named" => LogEvent::Anonymous,
            "log_named_bytes32" | "log_named_string" => LogEvent::Named { text: true },
            "log_named_address"
            | "log_named_bool"
            | "log_named_decimal_int"
            | "log_named_decimal_uint"
            | "log_named_int"
            | "log_named_uint" => LogEvent::Named { text: false },
            _ => LogEvent::Other,
        }
    }
}

#[derive(Debug, Default)]
struct Grouping {
    groups: Vec<LogRecord>,
    current: LogRecord,
}

impl Grouping {
    // Close the open record and start `next`
    fn flush(mut self, next: LogRecord) -> Self {
        let mut closed = std::mem::replace(&mut self.current, next);
        closed.grouped = true;
        self.groups.push(closed);
        self
    }

    fn apply(mut self, entry: &RawLogEntry) -> Self {
        match LogEvent::from_name(&entry.event) {
            LogEvent::Marker => self,
            LogEvent::Open => {
                let event = entry
                    .first_value()
                    .map(decode_ascii_lossy)
                    .unwrap_or_default();
                self.flush(LogRecord::opened(entry.name.clone(), event))
            }
            LogEvent::Anonymous => {
                let mut next = LogRecord::default();
                if let Some(val) = entry.field("val") {
                    next.set_field("named".to_string(), decode(val));
                }
                self.flush(next)
            }
            LogEvent::Named { text } => {
                let (Some(key), Some(val)) = (entry.field("key"), entry.field("val")) else {
                    debug!("Skipping {} entry without key/val", entry.event);
                    return self;
                };
                let key = decode_ascii_lossy(key).replace(' ', "");
                let val = if text {
                    decode_ascii_lossy(val)
                } else {
                    decode(val)
                };
                self.current.set_field(key, val);
                self
            }
            LogEvent::Other => {
                self.groups.push(decode_generic(entry));
                self
            }
        }
    }

    fn finish(mut self) -> Vec<LogRecord> {
        if !self.current.is_empty() {
            self = self.flush(LogRecord::default());
        }
        // The first flush always closes the initial empty record. When the entries do
        // not start with `log_bytes32` this drops a real record instead; kept as is.
        if !self.groups.is_empty() {
            self.groups.remove(0);
        }
        self.groups
    }
}

/// Regroups the flat log list of one call frame into named debug records.
///
/// `log_bytes32` opens a record, `log_named_*` entries add fields to it, and any
/// other event becomes a standalone record. The leading slot produced by the first
/// flush is removed before returning.
pub fn decode_logs(entries: &[RawLogEntry]) -> Vec<LogRecord> {
    entries
        .iter()
        .fold(Grouping::default(), Grouping::apply)
        .finish()
}

// Record for an entry outside the naming convention: every argument decoded,
// ordered by argument name
fn decode_generic(entry: &RawLogEntry) -> LogRecord {
    let mut record = LogRecord {
        name: Some(entry.name.clone()),
        event: Some(entry.event.clone()),
        ..Default::default()
    };

    match &entry.log {
        Some(LogPayload::Parsed(parsed)) => {
            for (name, value) in parsed {
                record.set_field(name.clone(), argument_text(name, value));
            }
        }
        Some(LogPayload::NotParsed(raw)) => match raw {
            Value::Object(map) => {
                for (name, value) in map {
                    record.set_field(name.clone(), verbatim(value));
                }
            }
            other => record.set_field("raw".to_string(), verbatim(other)),
        },
        None => {}
    }

    for (name, value) in &entry.fields {
        record.set_field(name.clone(), argument_text(name, value));
    }
    record
}

// `key` arguments are usually bytes32-packed text
fn argument_text(name: &str, value: &TypedValue) -> String {
    if name == "key" {
        decode_ascii(value).unwrap_or_else(|| decode(value))
    } else {
        decode(value)
    }
}

fn verbatim(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
