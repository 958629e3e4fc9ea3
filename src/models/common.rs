use serde::{Deserialize, Serialize};

use crate::models::datasets::traces::NodeStyle;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub url: String,
    pub tester_is_eoa: bool,
    pub timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:2347".to_string(),
            tester_is_eoa: true,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub runner: RunnerConfig,
    pub retry: RetrySettings,
    pub history_path: Option<String>,
    pub src_dir: Option<String>,
    pub style: NodeStyle,
}

impl Config {
    pub fn history_path(&self) -> &str {
        self.history_path.as_deref().unwrap_or("trace_history.json")
    }
}

// Selects one test function of one source file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestRef {
    pub src: String,
    pub test: String,
}
