use tracing::{debug, warn};

use crate::models::datasets::logs::LogRecord;
use crate::models::datasets::traces::{DisplayNode, NodeStyle, RawCallTrace};
use crate::models::datasets::values::CallData;
use crate::visualizer::transformations::logs::decode_logs;
use crate::visualizer::transformations::values::{decode, decode_sequence};

const ROOT_ID: &str = "0";
const MAX_OUTPUT_CHARS: usize = 100;

pub trait TraceTransformer {
    fn transform_trace(&self, style: &NodeStyle) -> Option<DisplayNode>;
}

impl TraceTransformer for [RawCallTrace] {
    fn transform_trace(&self, style: &NodeStyle) -> Option<DisplayNode> {
        build_root(self, style)
    }
}

/// Builds the display tree for one test trace. The first frame is the entry call;
/// `None` when the trace holds no frames at all.
pub fn build_root(trace_nodes: &[RawCallTrace], style: &NodeStyle) -> Option<DisplayNode> {
    let Some(entry) = trace_nodes.first() else {
        warn!("Trace has no call frames, nothing to display");
        return None;
    };
    if trace_nodes.len() > 1 {
        debug!(
            "Trace has {} top-level frames, displaying the first",
            trace_nodes.len()
        );
    }
    Some(assemble(entry, ROOT_ID.to_string(), 0, style))
}

/// Builds the display node for the `index`-th sub-call of `parent_id`, recursing
/// into its own sub-calls at `depth + 1`.
pub fn build_node(
    node: &RawCallTrace,
    index: usize,
    depth: usize,
    parent_id: &str,
    style: &NodeStyle,
) -> DisplayNode {
    let id = format!("{}-{}-{}", depth, parent_id, index);
    assemble(node, id, depth, style)
}

/// Splits a call node id back into `(depth, parent_id, index)`.
pub fn split_node_id(id: &str) -> Option<(usize, &str, usize)> {
    if id == ROOT_ID {
        return Some((0, "", 0));
    }
    let (depth, rest) = id.split_once('-')?;
    let (parent, index) = rest.rsplit_once('-')?;
    Some((depth.parse().ok()?, parent, index.parse().ok()?))
}

fn assemble(node: &RawCallTrace, id: String, depth: usize, style: &NodeStyle) -> DisplayNode {
    let name = if node.name.is_empty() {
        node.address.clone()
    } else {
        node.name.clone()
    };

    // Creation calls carry constructor bytecode, not decodable arguments
    let inputs = if node.created {
        None
    } else {
        match &node.inputs {
            CallData::Tokens(tokens) if !tokens.is_empty() => Some(decode_sequence(tokens)),
            CallData::String(s) if !s.is_empty() => Some(vec![s.clone()]),
            _ => None,
        }
    };

    let mut children: Vec<DisplayNode> = node
        .inner
        .iter()
        .enumerate()
        .map(|(index, inner)| build_node(inner, index, depth + 1, &id, style))
        .collect();

    if !node.created {
        if let Some(child) = result_child(node, &id, style) {
            children.push(child);
        }
    }

    children.extend(
        decode_logs(&node.logs)
            .iter()
            .enumerate()
            .map(|(index, record)| log_child(record, &id, index, style)),
    );

    DisplayNode {
        name,
        function: node.function.clone(),
        value: node.cost,
        success: node.success,
        revert: !node.success,
        created: node.created,
        stroke: if node.success {
            style.success.clone()
        } else {
            style.fail.clone()
        },
        fill: if node.created {
            style.create.clone()
        } else {
            style.default_fill.clone()
        },
        inputs,
        children: if children.is_empty() {
            None
        } else {
            Some(children)
        },
        log: None,
        id,
    }
}

// Revert reason of a failed call, or the return value of a successful one
fn result_child(node: &RawCallTrace, id: &str, style: &NodeStyle) -> Option<DisplayNode> {
    match (node.success, node.output.tokens(), node.output.text()) {
        (false, Some(tokens), _) => Some(DisplayNode {
            id: format!("{}-error", id),
            name: "Revert".to_string(),
            function: format!("Reason: \"{}\"", decode(&tokens[0])),
            value: node.cost,
            success: false,
            revert: true,
            created: false,
            stroke: style.fail.clone(),
            fill: style.default_fill.clone(),
            inputs: None,
            children: None,
            log: None,
        }),
        (true, Some(tokens), _) => Some(output_child(
            id,
            decode_sequence(tokens).join(", "),
            style,
        )),
        (true, None, Some(text)) => Some(output_child(id, truncate(text), style)),
        _ => None,
    }
}

fn output_child(id: &str, function: String, style: &NodeStyle) -> DisplayNode {
    DisplayNode {
        id: format!("{}-output", id),
        name: "Output".to_string(),
        function,
        value: 0,
        success: true,
        revert: false,
        created: false,
        stroke: style.success.clone(),
        fill: style.default_fill.clone(),
        inputs: None,
        children: None,
        log: None,
    }
}

fn log_child(record: &LogRecord, id: &str, index: usize, style: &NodeStyle) -> DisplayNode {
    let name = if record.grouped {
        record
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Log".to_string())
    } else {
        "Log".to_string()
    };

    DisplayNode {
        id: format!("{}-log-{}", id, index),
        name,
        function: describe_record(record),
        value: 0,
        success: false,
        revert: false,
        created: false,
        stroke: style.log_stroke.clone(),
        fill: style.default_fill.clone(),
        inputs: None,
        children: None,
        log: Some(true),
    }
}

/// `<event> ( key: value, ... )`, leaving out whichever half is empty.
pub fn describe_record(record: &LogRecord) -> String {
    let fields = record
        .fields
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<String>>()
        .join(", ");
    let event = record.event.as_deref().unwrap_or_default();

    match (event.is_empty(), fields.is_empty()) {
        (_, true) => event.to_string(),
        (true, false) => format!("( {} )", fields),
        (false, false) => format!("{} ( {} )", event, fields),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_OUTPUT_CHARS {
        format!("{}..", text.chars().take(MAX_OUTPUT_CHARS).collect::<String>())
    } else {
        text.to_string()
    }
}
