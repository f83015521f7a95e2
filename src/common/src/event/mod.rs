use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Only `ok` is ever emitted; no threshold logic decides a severity.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    #[default]
    Ok,
}

impl EventState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Ok => "ok",
        }
    }
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitoring event as delivered to the event-index server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    #[serde(with = "ts_seconds")]
    pub time: DateTime<Utc>,
    /// Seconds the server keeps the event in its index.
    pub ttl: f64,
    pub host: String,
    pub service: String,
    pub state: EventState,
    pub metric: f64,
    pub description: String,
    pub tags: Vec<String>,
    pub attributes: BTreeMap<String, Value>,
}

impl Event {
    /// Same event with a different timestamp; used to compare events built at different times.
    pub fn at(&self, time: DateTime<Utc>) -> Event {
        Event {
            time,
            ..self.clone()
        }
    }
}
