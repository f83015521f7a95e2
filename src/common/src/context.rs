use serde::{Deserialize, Serialize};

/// Opaque execution context handed over by the upstream pipeline.
///
/// The forwarder never inspects it beyond echoing `request_id` into logs.
#[derive(Default, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PublishContext {
    pub request_id: Option<String>,
}

impl PublishContext {
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        PublishContext {
            request_id: Some(request_id.into()),
        }
    }

    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or("-")
    }
}
