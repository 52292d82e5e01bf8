//! Request and response documents exchanged over stdin/stdout.

use serde::Deserialize;
use serde::Serialize;

use crate::SourceConfig;

/// A single counter value as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub number: String,
}

impl Version {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

/// Metadata attached to `in` and `out` responses: the version number only.
pub fn number_metadata(number: &str) -> Vec<MetadataField> {
    vec![MetadataField {
        name: "number".to_string(),
        value: number.to_string(),
    }]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub source: SourceConfig,
    /// Cursor; absent on the very first check of a pipeline.
    #[serde(default)]
    pub version: Option<Version>,
}

impl CheckRequest {
    pub fn cursor(&self) -> Option<&str> {
        self.version.as_ref().map(|v| v.number.as_str())
    }
}

pub type CheckResponse = Vec<Version>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InRequest {
    pub source: SourceConfig,
    pub version: Version,
    #[serde(default)]
    pub params: InParams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InParams {
    #[serde(default)]
    pub bump: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InResponse {
    pub version: Version,
    pub metadata: Vec<MetadataField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutRequest {
    pub source: SourceConfig,
    #[serde(default)]
    pub params: OutParams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutParams {
    /// File inside the `out` source directory holding the version to set.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub bump: bool,
}

impl OutParams {
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref().filter(|f| !f.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutResponse {
    pub version: Version,
    pub metadata: Vec<MetadataField>,
}

impl OutResponse {
    pub fn for_number(number: &str) -> Self {
        Self {
            version: Version::new(number),
            metadata: number_metadata(number),
        }
    }
}
