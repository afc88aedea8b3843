use std::path::Path;

use config::{Config, File};
use serde_derive::Deserialize;

use crate::{error::ConfigurationError, models::RecordPayload};

#[derive(Debug, Deserialize)]
struct BatchFile {
    #[serde(default)]
    issues: Vec<RecordPayload>,
}

/// Reads the `issues` array from a batch definition file. Format follows the
/// file extension (toml, yaml, json, ...).
pub fn load(path: &Path) -> Result<Vec<RecordPayload>, ConfigurationError> {
    let file: BatchFile = Config::builder()
        .add_source(File::from(path))
        .build()?
        .try_deserialize()?;

    if file.issues.is_empty() {
        return Err(ConfigurationError::EmptyBatch(path.display().to_string()));
    }

    for (i, issue) in file.issues.iter().enumerate() {
        if issue.title.trim().is_empty() {
            return Err(ConfigurationError::InvalidPayload {
                index: i + 1,
                reason: "title is empty".to_string(),
            });
        }
    }

    Ok(file.issues)
}
