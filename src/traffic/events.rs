//! Builds attributed-format snapshots from flat IDS event lists.
//!
//! Each event names a `src_ip` / `dest_ip` pair plus per-endpoint `tags`.
//! Endpoints become nodes on first sight and every event becomes an edge;
//! duplicate pairs are left for the merger to drop.

use std::collections::HashSet;

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde_json::{Map, Value, json};

use super::parse::Endpoint;

/// Inclusive time range events must fall in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(anyhow!("time window ends ({end}) before it starts ({start})"));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Accepts RFC 3339, `%z` offsets without a colon, and naive UTC timestamps.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }
    if let Ok(timestamp) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.and_utc())
}

/// Event list of a document: either a bare array or a `{"datas": [...]}` wrapper.
pub fn event_list(document: &Value) -> Result<&[Value]> {
    match document {
        Value::Array(events) => Ok(events.as_slice()),
        Value::Object(object) => object
            .get("datas")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| anyhow!("event document has no `datas` array")),
        _ => Err(anyhow!("event document must be an array or an object")),
    }
}

pub fn snapshot_from_events(events: &[Value], window: Option<&TimeWindow>) -> Value {
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for event in events {
        let Some(object) = event.as_object() else {
            debug!("skipping non-object event: {event}");
            continue;
        };
        let (Some(source), Some(target)) = (
            endpoint_ip(object, Endpoint::Source),
            endpoint_ip(object, Endpoint::Destination),
        ) else {
            debug!("skipping event without both endpoints");
            continue;
        };

        if let Some(window) = window {
            let in_window = object
                .get("timestamp")
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
                .is_some_and(|timestamp| window.contains(timestamp));
            if !in_window {
                continue;
            }
        }

        let tags = object.get("tags");
        for (endpoint, ip) in [(Endpoint::Source, source), (Endpoint::Destination, target)] {
            if seen.insert(ip) {
                nodes.push(json!({
                    "id": ip,
                    "attributes": endpoint_attributes(tags, endpoint, ip),
                }));
            }
        }

        let mut attributes = object.clone();
        attributes.remove("tags");
        edges.push(json!({
            "source": source,
            "target": target,
            "attributes": attributes,
        }));
    }

    let mut snapshot = Map::new();
    if let Some(window) = window {
        snapshot.insert("start_time".to_string(), Value::from(window.start.to_rfc3339()));
        snapshot.insert("end_time".to_string(), Value::from(window.end.to_rfc3339()));
    }
    snapshot.insert("nodes".to_string(), Value::Array(nodes));
    snapshot.insert("edges".to_string(), Value::Array(edges));
    Value::Object(snapshot)
}

fn endpoint_ip(object: &Map<String, Value>, endpoint: Endpoint) -> Option<&str> {
    object
        .get(endpoint.key())
        .and_then(Value::as_str)
        .filter(|ip| !ip.is_empty())
}

fn endpoint_attributes(tags: Option<&Value>, endpoint: Endpoint, ip: &str) -> Map<String, Value> {
    let mut attributes = match tags.and_then(|tags| tags.get(endpoint.key())) {
        Some(Value::Object(attributes)) => attributes.clone(),
        Some(Value::Array(list)) => {
            let mut attributes = Map::new();
            attributes.insert("tags".to_string(), Value::Array(list.clone()));
            attributes
        }
        _ => Map::new(),
    };
    attributes
        .entry("ip")
        .or_insert_with(|| Value::from(ip));
    attributes
}
