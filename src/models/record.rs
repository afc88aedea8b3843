use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Bearer token used for every request in a run.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: &str) -> Result<Self, ConfigurationError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigurationError::MissingCredential);
        }
        Ok(Self(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Repository whose issue list receives the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    pub owner: String,
    pub name: String,
}

impl CollectionRef {
    pub fn issues_route(&self) -> String {
        format!("/repos/{}/{}/issues", self.owner, self.name)
    }
}

impl FromStr for CollectionRef {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref PART: Regex = Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap();
        }

        let invalid = || ConfigurationError::InvalidCollection(s.to_string());
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;

        if !PART.is_match(owner) || !PART.is_match(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Fields of one issue to create. Serialized as the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// What the server hands back for a created issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedRecord {
    pub number: u64,
    #[serde(rename = "html_url")]
    pub url: String,
}
