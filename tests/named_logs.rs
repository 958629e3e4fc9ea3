use serde_json::{Value, json};

use trace_visualizer::visualizer::transformations::traces::describe_record;
use trace_visualizer::{LogDecoder, LogRecord, RawLogEntry, decode_logs};

fn entries(value: Value) -> Vec<RawLogEntry> {
    serde_json::from_value(value).expect("fixture should parse")
}

fn bytes32(text: &str) -> String {
    format!("0x{:0<64}", alloy_primitives::hex::encode(text))
}

fn header(name: &str, event: &str) -> Value {
    json!({
        "event": "log_bytes32",
        "name": name,
        "log": {"Parsed": {"": {"FixedBytes": bytes32(event)}}}
    })
}

fn named_uint(key: &str, val: &str) -> Value {
    json!({
        "event": "log_named_uint",
        "log": {"Parsed": {"key": {"FixedBytes": bytes32(key)}, "val": {"Uint": val}}}
    })
}

#[test]
fn header_and_named_value_form_one_record() {
    let records = decode_logs(&entries(json!([
        {"event": "log_bytes32", "name": "A",
         "log": {"Parsed": {"": {"FixedBytes": "0xMyEvent00"}}}},
        {"event": "log_named_uint",
         "key": {"FixedBytes": "0xAmount00"},
         "val": {"Uint": "1000000000000000000"}}
    ])));

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.name.as_deref(), Some("A"));
    assert_eq!(record.event.as_deref(), Some("MyEvent"));
    assert_eq!(record.get("Amount"), Some("1000000000000000000"));
    assert!(record.grouped);
}

#[test]
fn each_header_closes_the_previous_record() {
    let mut raw = vec![header("Deposit", "Before")];
    for i in 0..4 {
        raw.push(named_uint(&format!("slot{}", i), &i.to_string()));
    }
    raw.push(header("Deposit", "After"));

    let records = decode_logs(&entries(Value::Array(raw)));

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].event.as_deref(), Some("Before"));
    assert_eq!(
        records[0].fields,
        (0..4)
            .map(|i| (format!("slot{}", i), i.to_string()))
            .collect::<Vec<_>>()
    );
    assert_eq!(records[1].event.as_deref(), Some("After"));
    assert!(records[1].fields.is_empty());
    assert!(records.iter().all(|r| r.grouped));
}

#[test]
fn repeated_key_overwrites_value() {
    let records = decode_logs(&entries(json!([
        header("Loop", "Step"),
        named_uint("i", "1"),
        named_uint("i", "2")
    ])));
    assert_eq!(records[0].fields, vec![("i".to_string(), "2".to_string())]);
}

#[test]
fn key_spaces_are_removed_and_text_values_decoded() {
    let records = decode_logs(&entries(json!([
        header("Vault", "State"),
        {"event": "log_named_string",
         "log": {"Parsed": {"key": {"FixedBytes": bytes32("owner name")},
                            "val": {"String": "alice"}}}},
        {"event": "log_named_bytes32",
         "log": {"Parsed": {"key": {"FixedBytes": bytes32("tag")},
                            "val": {"FixedBytes": bytes32("gold")}}}},
        {"event": "log_named_int",
         "log": {"Parsed": {"key": {"FixedBytes": bytes32("delta")},
                            "val": {"Int": format!("0x{}", "f".repeat(64))}}}}
    ])));

    let record = &records[0];
    assert_eq!(record.get("ownername"), Some("alice"));
    assert_eq!(record.get("tag"), Some("gold"));
    assert_eq!(record.get("delta"), Some("-1"));
}

#[test]
fn marker_entries_are_ignored() {
    let records = decode_logs(&entries(json!([
        header("A", "Start"),
        {"event": "logs", "log": {"Parsed": {"": {"Bytes": "0x00"}}}},
        named_uint("x", "9")
    ])));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fields, vec![("x".to_string(), "9".to_string())]);
}

#[test]
fn anonymous_named_value_starts_its_own_record() {
    let records = decode_logs(&entries(json!([
        header("A", "Start"),
        named_uint("x", "1"),
        {"event": "log_named", "log": {"Parsed": {"val": {"Uint": "77"}}}}
    ])));

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("x"), Some("1"));
    assert_eq!(records[1].name, None);
    assert_eq!(records[1].get("named"), Some("77"));
    assert!(records[1].grouped);
}

#[test]
fn other_events_are_standalone_records() {
    let records = decode_logs(&entries(json!([
        header("A", "Start"),
        {"event": "Transfer", "name": "Token",
         "log": {"Parsed": {
             "from": {"Address": "0xb4c79dab8f259c7aee6e5b2aa729821864227e84"},
             "to": {"Address": "0xce71065d4017f316ec606fe4422e11eb2c47c246"},
             "value": {"Uint": "0x64"}
         }}},
        named_uint("x", "1")
    ])));

    // The standalone record lands before the still-open header record
    assert_eq!(records.len(), 2);
    let transfer = &records[0];
    assert_eq!(transfer.name.as_deref(), Some("Token"));
    assert_eq!(transfer.event.as_deref(), Some("Transfer"));
    assert!(!transfer.grouped);
    assert_eq!(
        transfer.fields,
        vec![
            ("from".to_string(), "0xb4c79dab8f259c7aee6e5b2aa729821864227e84".to_string()),
            ("to".to_string(), "0xce71065d4017f316ec606fe4422e11eb2c47c246".to_string()),
            ("value".to_string(), "100".to_string()),
        ]
    );
    assert_eq!(records[1].event.as_deref(), Some("Start"));
    assert_eq!(records[1].get("x"), Some("1"));
}

#[test]
fn unparsed_payload_is_kept_verbatim() {
    let records = decode_logs(&entries(json!([
        header("A", "Start"),
        {"event": "Unknown", "log": {"NotParsed": {
            "address": "0x185a4dc360ce69bdccee33b3784b0282f7961aea",
            "topics": ["0x01"],
            "data": "0x"
        }}}
    ])));

    let raw = &records[0];
    assert_eq!(raw.get("address"), Some("0x185a4dc360ce69bdccee33b3784b0282f7961aea"));
    assert_eq!(raw.get("topics"), Some("[\"0x01\"]"));
    assert_eq!(raw.get("data"), Some("0x"));
}

#[test]
fn first_record_is_dropped_when_logs_do_not_open_with_a_header() {
    let records = decode_logs(&entries(json!([
        {"event": "Transfer", "name": "Token",
         "log": {"Parsed": {"value": {"Uint": "1"}}}},
        header("A", "Start"),
        named_uint("k", "2")
    ])));

    // The empty slot closed by the header survives, the Transfer record does not
    assert_eq!(records.len(), 2);
    assert!(records[0].is_empty());
    assert!(records[0].grouped);
    assert_eq!(records[1].name.as_deref(), Some("A"));
    assert!(records.iter().all(|r| r.event.as_deref() != Some("Transfer")));

    let only_generic = decode_logs(&entries(json!([
        {"event": "First", "log": null},
        {"event": "Second", "log": null}
    ])));
    assert_eq!(only_generic.len(), 1);
    assert_eq!(only_generic[0].event.as_deref(), Some("Second"));
}

#[test]
fn empty_and_headerless_inputs() {
    assert!(decode_logs(&[]).is_empty());

    // Named values with nothing open fill the leading slot, which is dropped
    let records = decode_logs(&entries(json!([named_uint("x", "3")])));
    assert_eq!(records.len(), 0);
}

#[test]
fn trait_matches_free_function() {
    let raw = entries(json!([header("A", "Start"), named_uint("x", "1")]));
    assert_eq!(raw.decode_logs(), decode_logs(&raw));
}

#[test]
fn record_description() {
    let mut record = LogRecord::opened("Vault".to_string(), "State".to_string());
    assert_eq!(describe_record(&record), "State");

    record.set_field("a".to_string(), "1".to_string());
    record.set_field("b".to_string(), "2".to_string());
    assert_eq!(describe_record(&record), "State ( a: 1, b: 2 )");

    record.event = None;
    assert_eq!(describe_record(&record), "( a: 1, b: 2 )");
}

#[test]
fn null_event_and_name_read_as_generic_entry() {
    let records = decode_logs(&entries(json!([
        header("A", "Start"),
        {"event": null, "name": 3, "log": {"Parsed": {"value": {"Uint": "9"}}}}
    ])));

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].event.as_deref(), Some(""));
    assert_eq!(records[0].name.as_deref(), Some(""));
    assert_eq!(records[0].get("value"), Some("9"));
    assert_eq!(records[1].event.as_deref(), Some("Start"));
}
