//! MergeSink trait: where a finished pass is delivered.

use std::fs;
use std::path::{Path, PathBuf};

use patmerge_core::errors::OutputError;
use tracing::info;

use crate::pipeline::MergeOutcome;

pub trait MergeSink {
    fn write(&mut self, outcome: &MergeOutcome) -> Result<(), OutputError>;
}

/// Writes the outcome as pretty-printed JSON, replacing any existing file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MergeSink for JsonFileSink {
    fn write(&mut self, outcome: &MergeOutcome) -> Result<(), OutputError> {
        let json = serde_json::to_string_pretty(outcome).map_err(|e| OutputError::Serialize {
            message: e.to_string(),
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| OutputError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| OutputError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), groups = outcome.groups.len(), "wrote merge outcome");
        Ok(())
    }
}

/// Keeps every outcome in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub outcomes: Vec<MergeOutcome>,
}

impl MergeSink for MemorySink {
    fn write(&mut self, outcome: &MergeOutcome) -> Result<(), OutputError> {
        self.outcomes.push(outcome.clone());
        Ok(())
    }
}
