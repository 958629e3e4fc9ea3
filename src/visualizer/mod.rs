pub mod transformations;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::info;

use crate::models::datasets::traces::{DisplayNode, NodeStyle, RawCallTrace};
use crate::visualizer::transformations::traces::TraceTransformer;

// Accepts the frame list itself, a single frame, or a test run wrapping it as `{"trace": [...]}`
pub fn parse_trace(value: Value) -> Result<Vec<RawCallTrace>> {
    match value {
        Value::Array(_) => serde_json::from_value(value).context("failed to parse call frames"),
        Value::Object(mut map) => match map.remove("trace") {
            Some(trace) => parse_trace(trace),
            None => {
                let frame: RawCallTrace = serde_json::from_value(Value::Object(map))
                    .context("failed to parse call frame")?;
                Ok(vec![frame])
            }
        },
        other => Err(anyhow!("Expected a trace array or object, got {}", other)),
    }
}

pub fn visualize(value: Value, style: &NodeStyle) -> Result<DisplayNode> {
    let frames = parse_trace(value)?;
    info!("Building display tree from {} top-level frame(s)", frames.len());
    frames
        .transform_trace(style)
        .ok_or_else(|| anyhow!("Trace contains no call frames"))
}
