use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Metadata = Map<String, Value>;

/// One measurement produced by the upstream metering pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub volume: f64,
    #[serde(default)]
    pub resource_metadata: Option<Metadata>,
}

impl Sample {
    pub fn new(name: impl Into<String>, volume: f64) -> Self {
        Sample {
            name: name.into(),
            volume,
            resource_metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.resource_metadata = Some(metadata);
        self
    }

    /// Looks up a metadata entry, treating JSON `null` the same as a missing key.
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.resource_metadata
            .as_ref()
            .and_then(|metadata| metadata.get(key))
            .filter(|value| !value.is_null())
    }

    pub fn metadata_entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.resource_metadata.iter().flat_map(|metadata| metadata.iter())
    }
}
