use serde::{Deserialize, Serialize};

use crate::models::datasets::lenient;
use crate::models::datasets::logs::RawLogEntry;
use crate::models::datasets::values::CallData;

////////////////////////////////////// Raw Data ////////////////////////////////////////
// One call frame as reported by the test runner. Every field is optional on the wire;
// missing, null or mistyped fields read as their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCallTrace {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub function: String,
    #[serde(deserialize_with = "lenient")]
    pub address: String,
    #[serde(deserialize_with = "lenient")]
    pub created: bool,
    #[serde(deserialize_with = "lenient")]
    pub success: bool,
    #[serde(deserialize_with = "lenient")]
    pub cost: u64,
    pub inputs: CallData,
    pub output: CallData,
    #[serde(deserialize_with = "lenient")]
    pub inner: Vec<RawCallTrace>,
    #[serde(deserialize_with = "lenient")]
    pub logs: Vec<RawLogEntry>,
}

////////////////////////////////// Display Data ////////////////////////////////////////
// Node shape consumed by the tree renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayNode {
    pub id: String,
    pub name: String,
    pub function: String,
    pub value: u64,
    pub success: bool,
    pub revert: bool,
    pub created: bool,
    pub stroke: String,
    pub fill: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DisplayNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<bool>,
}

impl DisplayNode {
    pub fn children(&self) -> &[DisplayNode] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn is_log(&self) -> bool {
        self.log.unwrap_or(false)
    }

    // Depth-first, parent before children
    pub fn walk(&self) -> Vec<&DisplayNode> {
        let mut nodes = vec![self];
        for child in self.children() {
            nodes.extend(child.walk());
        }
        nodes
    }
}

// Colour tokens attached to display nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    pub success: String,
    pub fail: String,
    pub create: String,
    pub default_fill: String,
    pub log_stroke: String,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            success: "#00FF00".to_string(),
            fail: "#FF0000".to_string(),
            create: "#3c003b".to_string(),
            default_fill: "#050505".to_string(),
            log_stroke: "#3c003b".to_string(),
        }
    }
}
