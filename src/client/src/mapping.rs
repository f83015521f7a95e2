use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use forwarder_common::constants::{
    CONSUMED_METADATA_KEYS, DEFAULT_HOST, HOST_METADATA_KEY, TTL_METADATA_KEY,
};
use forwarder_common::{Event, EventState, Sample};
use serde_json::Value;

use crate::error::{ForwarderError, Result};

/// Translates samples into events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventMapper {
    default_ttl: f64,
}

impl EventMapper {
    pub fn new(default_ttl: u64) -> Self {
        EventMapper {
            default_ttl: default_ttl as f64,
        }
    }

    pub fn to_event(&self, sample: &Sample) -> Result<Event> {
        self.map_sample(sample, Utc::now())
    }

    /// Builds the event for `sample` as if it were sent at `time`.
    ///
    /// The sample is not modified; `host` and `ttl` metadata are consumed and
    /// everything else ends up in `attributes`.
    pub fn map_sample(&self, sample: &Sample, time: DateTime<Utc>) -> Result<Event> {
        if !sample.volume.is_finite() {
            return Err(ForwarderError::delivery(format!(
                "sample {} has a non-finite volume {}",
                sample.name, sample.volume
            )));
        }

        Ok(Event {
            time,
            ttl: self.resolve_ttl(sample)?,
            host: resolve_host(sample)?,
            service: sample.name.clone(),
            state: EventState::Ok,
            metric: sample.volume,
            description: String::new(),
            tags: Vec::new(),
            attributes: attributes(sample),
        })
    }

    fn resolve_ttl(&self, sample: &Sample) -> Result<f64> {
        let ttl = match sample.metadata_value(TTL_METADATA_KEY) {
            None => return Ok(self.default_ttl),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };

        match ttl {
            // the wire field is an f32
            Some(ttl) if ttl.is_finite() && (0.0..=f32::MAX as f64).contains(&ttl) => Ok(ttl),
            _ => Err(ForwarderError::delivery(format!(
                "sample {} has an invalid ttl {}",
                sample.name,
                sample.metadata_value(TTL_METADATA_KEY).unwrap_or(&Value::Null)
            ))),
        }
    }
}

fn resolve_host(sample: &Sample) -> Result<String> {
    match sample.metadata_value(HOST_METADATA_KEY) {
        None => Ok(DEFAULT_HOST.to_string()),
        Some(Value::String(host)) => Ok(host.clone()),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(value.to_string()),
        Some(value) => Err(ForwarderError::delivery(format!(
            "sample {} has a non-scalar host {}",
            sample.name, value
        ))),
    }
}

fn attributes(sample: &Sample) -> BTreeMap<String, Value> {
    sample
        .metadata_entries()
        .filter(|(key, _)| !CONSUMED_METADATA_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn sample_with(metadata: Value) -> Sample {
        Sample::new("cpu_util", 73.5).with_metadata(metadata.as_object().cloned().unwrap())
    }

    fn at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_map_sample_with_metadata() {
        let sample = sample_with(json!({"host": "node1", "ttl": 120, "region": "us-east"}));
        let event = EventMapper::new(86400).map_sample(&sample, at()).unwrap();

        assert_eq!(event.service, "cpu_util");
        assert_eq!(event.metric, 73.5);
        assert_eq!(event.host, "node1");
        assert_eq!(event.ttl, 120.0);
        assert_eq!(event.state, EventState::Ok);
        assert_eq!(event.description, "");
        assert!(event.tags.is_empty());
        assert_eq!(
            event.attributes,
            BTreeMap::from([("region".to_string(), json!("us-east"))])
        );
        assert_eq!(event.time, at());
    }

    #[rstest]
    #[case::absent(None)]
    #[case::empty(Some(json!({})))]
    fn test_map_sample_without_metadata(#[case] metadata: Option<Value>) {
        let sample = match metadata {
            Some(metadata) => sample_with(metadata),
            None => Sample::new("cpu_util", 73.5),
        };
        let event = EventMapper::new(3600).map_sample(&sample, at()).unwrap();

        assert_eq!(event.host, "openstack");
        assert_eq!(event.ttl, 3600.0);
        assert!(event.attributes.is_empty());
    }

    #[test]
    fn test_consumed_keys_never_reach_attributes() {
        let sample = sample_with(json!({"host": null, "ttl": null, "flavor": "m1.small"}));
        let event = EventMapper::new(86400).map_sample(&sample, at()).unwrap();

        assert_eq!(event.host, "openstack");
        assert_eq!(event.ttl, 86400.0);
        assert!(!event.attributes.contains_key("host"));
        assert!(!event.attributes.contains_key("ttl"));
        assert_eq!(event.attributes.get("flavor"), Some(&json!("m1.small")));
    }

    #[test]
    fn test_sample_metadata_is_untouched() {
        let sample = sample_with(json!({"host": "node1", "ttl": 5}));
        let before = sample.clone();
        EventMapper::new(86400).map_sample(&sample, at()).unwrap();
        assert_eq!(sample, before);
    }

    #[test]
    fn test_mapping_is_idempotent_apart_from_time() {
        let mapper = EventMapper::new(86400);
        let sample = sample_with(json!({"host": "node1", "zone": "a", "count": 3}));

        let first = mapper.to_event(&sample).unwrap();
        let second = mapper.to_event(&sample).unwrap();
        assert_eq!(first.at(at()), second.at(at()));
    }

    #[rstest]
    #[case::integer(json!(42), 42.0)]
    #[case::float(json!(1.5), 1.5)]
    #[case::numeric_string(json!("300"), 300.0)]
    fn test_ttl_values(#[case] ttl: Value, #[case] expected: f64) {
        let sample = sample_with(json!({"ttl": ttl}));
        let event = EventMapper::new(86400).map_sample(&sample, at()).unwrap();
        assert_eq!(event.ttl, expected);
    }

    #[rstest]
    #[case::word(json!("forever"))]
    #[case::negative(json!(-1))]
    #[case::list(json!([1, 2]))]
    #[case::boolean(json!(true))]
    #[case::overflows_wire(json!(1e39))]
    #[case::overflows_wire_as_string(json!("1e39"))]
    fn test_invalid_ttl_is_a_delivery_failure(#[case] ttl: Value) {
        let sample = sample_with(json!({"ttl": ttl}));
        assert!(matches!(
            EventMapper::new(86400).map_sample(&sample, at()),
            Err(ForwarderError::DeliveryFailure(_))
        ));
    }

    #[rstest]
    #[case::number(json!(7), "7")]
    #[case::boolean(json!(false), "false")]
    fn test_scalar_host_is_rendered(#[case] host: Value, #[case] expected: &str) {
        let sample = sample_with(json!({"host": host}));
        let event = EventMapper::new(86400).map_sample(&sample, at()).unwrap();
        assert_eq!(event.host, expected);
    }

    #[test]
    fn test_structured_host_is_a_delivery_failure() {
        let sample = sample_with(json!({"host": {"name": "node1"}}));
        assert!(EventMapper::new(86400).map_sample(&sample, at()).is_err());
    }

    #[test]
    fn test_non_finite_volume_is_a_delivery_failure() {
        let sample = Sample::new("cpu_util", f64::NAN);
        assert!(matches!(
            EventMapper::new(86400).map_sample(&sample, at()),
            Err(ForwarderError::DeliveryFailure(_))
        ));
    }
}
