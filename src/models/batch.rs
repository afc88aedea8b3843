use std::path::Path;

use tracing::debug;

use crate::{
    batch_file,
    error::{ConfigurationError, RecordCreationError},
    models::record::{CollectionRef, CreatedRecord, Credential, RecordPayload},
    settings::Settings,
};

/// Everything one run needs, assembled up front by the caller.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub collection: CollectionRef,
    pub payloads: Vec<RecordPayload>,
    pub credential: Credential,
}

impl BatchRequest {
    /// Validates settings and loads the batch file. No request is sent here.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigurationError> {
        let credential = Credential::new(&settings.github.token)?;
        let collection = settings.github.repo.parse()?;

        debug!("Loading batch from {}", settings.batch.path);
        let payloads = batch_file::load(Path::new(&settings.batch.path))?;

        Ok(Self {
            collection,
            payloads,
            credential,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(CreatedRecord),
    Failed(RecordCreationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub payload: RecordPayload,
    pub outcome: Outcome,
}

/// Outcomes in submission order, one per payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    entries: Vec<BatchEntry>,
    created: usize,
    failed: usize,
}

impl BatchResult {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn push(&mut self, payload: RecordPayload, outcome: Outcome) {
        match outcome {
            Outcome::Created(_) => self.created += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
        self.entries.push(BatchEntry { payload, outcome });
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn attempted(&self) -> usize {
        self.entries.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn created_records(&self) -> impl Iterator<Item = (&RecordPayload, &CreatedRecord)> {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            Outcome::Created(record) => Some((&entry.payload, record)),
            Outcome::Failed(_) => None,
        })
    }
}
