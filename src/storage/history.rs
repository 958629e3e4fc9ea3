use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::errors::HistoryError;
use crate::runner::responses::TestRun;

// Raw traces fetched from the runner, keyed by run label, persisted as one JSON file
#[derive(Debug)]
pub struct TraceHistory {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl TraceHistory {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!("No trace history at {}, starting empty", path.display());
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read trace history {}", path.display()))?;
        let entries = if contents.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse trace history {}", path.display()))?
        };

        Ok(Self { path, entries })
    }

    pub fn record(&mut self, run: &TestRun) {
        self.entries.insert(run.label.clone(), run.trace.clone());
    }

    pub fn get(&self, label: &str) -> Result<&Value, HistoryError> {
        self.entries
            .get(label)
            .ok_or_else(|| HistoryError::UnknownLabel {
                label: label.to_string(),
            })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write trace history {}", self.path.display()))?;
        info!(
            "Saved {} trace(s) to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}
