//! Protobuf messages understood by the event-index server.
//!
//! Only the fields the forwarder writes or reads back are declared; prost
//! skips anything else the server puts on the wire.

use forwarder_common::Event;
use prost::Message;
use serde_json::Value;

/// Size of the big-endian length prefix used on stream connections.
pub const FRAME_HEADER_LEN: usize = 4;

#[derive(Clone, PartialEq, Message)]
pub struct Msg {
    #[prost(bool, optional, tag = "2")]
    pub ok: Option<bool>,

    #[prost(string, optional, tag = "3")]
    pub error: Option<String>,

    #[prost(message, repeated, tag = "6")]
    pub events: Vec<EventProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct EventProto {
    #[prost(int64, optional, tag = "1")]
    pub time: Option<i64>,

    #[prost(string, optional, tag = "2")]
    pub state: Option<String>,

    #[prost(string, optional, tag = "3")]
    pub service: Option<String>,

    #[prost(string, optional, tag = "4")]
    pub host: Option<String>,

    #[prost(string, optional, tag = "5")]
    pub description: Option<String>,

    #[prost(string, repeated, tag = "7")]
    pub tags: Vec<String>,

    #[prost(float, optional, tag = "8")]
    pub ttl: Option<f32>,

    #[prost(message, repeated, tag = "9")]
    pub attributes: Vec<AttributeProto>,

    #[prost(int64, optional, tag = "10")]
    pub time_micros: Option<i64>,

    #[prost(sint64, optional, tag = "13")]
    pub metric_sint64: Option<i64>,

    #[prost(double, optional, tag = "14")]
    pub metric_d: Option<f64>,

    #[prost(float, optional, tag = "15")]
    pub metric_f: Option<f32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct AttributeProto {
    #[prost(string, required, tag = "1")]
    pub key: String,

    #[prost(string, optional, tag = "2")]
    pub value: Option<String>,
}

impl Msg {
    pub fn with_events(events: Vec<EventProto>) -> Self {
        Msg {
            events,
            ..Default::default()
        }
    }

    pub fn acknowledgement() -> Self {
        Msg {
            ok: Some(true),
            ..Default::default()
        }
    }

    pub fn rejection(error: impl Into<String>) -> Self {
        Msg {
            ok: Some(false),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok.unwrap_or(false)
    }
}

impl From<&Event> for EventProto {
    fn from(event: &Event) -> Self {
        EventProto {
            time: Some(event.time.timestamp()),
            time_micros: Some(event.time.timestamp_micros()),
            state: Some(event.state.to_string()),
            service: Some(event.service.clone()),
            host: Some(event.host.clone()),
            description: Some(event.description.clone()),
            tags: event.tags.clone(),
            ttl: Some(event.ttl as f32),
            attributes: event
                .attributes
                .iter()
                .map(|(key, value)| AttributeProto {
                    key: key.clone(),
                    value: Some(attribute_value(value)),
                })
                .collect(),
            metric_sint64: None,
            metric_d: Some(event.metric),
            metric_f: Some(event.metric as f32),
        }
    }
}

/// Attribute values travel as plain strings.
pub fn attribute_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn encode_msg(msg: &Msg) -> Vec<u8> {
    msg.encode_to_vec()
}

/// Length-prefixed encoding for stream connections.
pub fn frame(msg: &Msg) -> Vec<u8> {
    let body = msg.encode_to_vec();
    let mut buf = Vec::with_capacity(FRAME_HEADER_LEN + body.len());
    buf.extend_from_slice(&(body.len() as u32).to_be_bytes());
    buf.extend_from_slice(&body);
    buf
}

pub fn decode_msg(bytes: &[u8]) -> Result<Msg, prost::DecodeError> {
    Msg::decode(bytes)
}
