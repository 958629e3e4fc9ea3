use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::common::TestRef;
use crate::models::errors::RunnerError;

pub const TESTS_ENDPOINT: &str = "tests";
pub const TEST_ENDPOINT: &str = "test";
pub const COMPILE_ENDPOINT: &str = "compile";
pub const LOAD_COMPILED_ENDPOINT: &str = "load_compiled";
pub const SIM_ENDPOINT: &str = "sim";

// One executed run of a test (or a simulated transaction) with its raw trace
#[derive(Debug, Clone, PartialEq)]
pub struct TestRun {
    pub label: String,
    pub trace: Value,
}

fn unexpected(endpoint: &str, reason: impl Into<String>) -> RunnerError {
    RunnerError::UnexpectedResponse {
        endpoint: endpoint.to_string(),
        reason: reason.into(),
    }
}

// Unwraps the runner's `{"Ok": ...}` / `{"Err": ...}` envelope
fn unwrap_envelope(endpoint: &str, value: Value) -> Result<Value, RunnerError> {
    match value {
        Value::Object(mut map) => {
            if let Some(ok) = map.remove("Ok") {
                Ok(ok)
            } else if let Some(err) = map.remove("Err") {
                Err(RunnerError::Rejected {
                    endpoint: endpoint.to_string(),
                    message: match err {
                        Value::String(s) => s,
                        other => other.to_string(),
                    },
                })
            } else {
                Err(unexpected(endpoint, "missing Ok/Err envelope"))
            }
        }
        other => Err(unexpected(endpoint, format!("expected object, got {}", other))),
    }
}

/// `{"Ok": {"Tests": {"<src>": ["<test>", ...]}}}`
pub fn parse_test_listing(value: Value) -> Result<BTreeMap<String, Vec<String>>, RunnerError> {
    let mut inner = unwrap_envelope(TESTS_ENDPOINT, value)?;
    let tests = inner
        .get_mut("Tests")
        .map(Value::take)
        .ok_or_else(|| unexpected(TESTS_ENDPOINT, "missing Tests"))?;
    serde_json::from_value(tests).map_err(|e| unexpected(TESTS_ENDPOINT, e.to_string()))
}

/// `{"<src>": {"<test>": {"Test": [{"trace": [...]}, ...]}}}`, labelled `<test>:<run>`
pub fn parse_test_runs(value: Value, test: &TestRef) -> Result<Vec<TestRun>, RunnerError> {
    let runs = value
        .get(&test.src)
        .and_then(|by_test| by_test.get(&test.test))
        .and_then(|result| result.get("Test"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            unexpected(
                TEST_ENDPOINT,
                format!("no Test results for {}:{}", test.src, test.test),
            )
        })?;

    if runs.is_empty() {
        return Err(RunnerError::NoRuns {
            src: test.src.clone(),
            test: test.test.clone(),
        });
    }

    runs.iter()
        .enumerate()
        .map(|(index, run)| {
            let trace = run
                .get("trace")
                .cloned()
                .ok_or_else(|| unexpected(TEST_ENDPOINT, format!("run {} has no trace", index)))?;
            Ok(TestRun {
                label: format!("{}:{}", test.test, index),
                trace,
            })
        })
        .collect()
}

/// `{"Ok": {"Sim": [{"hash": "0x..", "trace": [...]}]}}`, labelled by transaction hash
pub fn parse_simulation(value: Value) -> Result<TestRun, RunnerError> {
    let inner = unwrap_envelope(SIM_ENDPOINT, value)?;
    let first = inner
        .get("Sim")
        .and_then(Value::as_array)
        .and_then(|sims| sims.first())
        .ok_or_else(|| unexpected(SIM_ENDPOINT, "missing Sim results"))?;

    let trace = first
        .get("trace")
        .cloned()
        .ok_or_else(|| unexpected(SIM_ENDPOINT, "simulation has no trace"))?;
    let label = first
        .get("hash")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(TestRun { label, trace })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_unwraps_envelope() {
        let listing = parse_test_listing(json!({
            "Ok": {"Tests": {"src/A.t.sol:ATest": ["testOne", "testTwo"]}}
        }))
        .unwrap();
        assert_eq!(listing["src/A.t.sol:ATest"], vec!["testOne", "testTwo"]);

        let err = parse_test_listing(json!({"Err": "not compiled"})).unwrap_err();
        assert!(matches!(err, RunnerError::Rejected { ref message, .. } if message == "not compiled"));
    }

    #[test]
    fn runs_are_labelled_in_order() {
        let test = TestRef {
            src: "src/A.t.sol:ATest".to_string(),
            test: "testOne".to_string(),
        };
        let runs = parse_test_runs(
            json!({"src/A.t.sol:ATest": {"testOne": {"Test": [
                {"trace": [{"name": "setUp"}]},
                {"trace": [{"name": "testOne"}]}
            ]}}}),
            &test,
        )
        .unwrap();

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].label, "testOne:0");
        assert_eq!(runs[1].trace, json!([{"name": "testOne"}]));

        let err = parse_test_runs(json!({"src/A.t.sol:ATest": {"testOne": {"Test": []}}}), &test)
            .unwrap_err();
        assert!(matches!(err, RunnerError::NoRuns { .. }));
    }

    #[test]
    fn simulation_uses_hash_label() {
        let run = parse_simulation(json!({"Ok": {"Sim": [{"hash": "0xabc", "trace": []}]}})).unwrap();
        assert_eq!(run.label, "0xabc");
        assert_eq!(run.trace, json!([]));
    }
}
