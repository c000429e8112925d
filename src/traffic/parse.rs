use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::graph::EdgeKind;

pub(super) const CLIENT_BYTES_KEYS: [&str; 3] =
    ["flow.bytes_toclient", "flow_bytes_toclient", "bytes_toclient"];

/// Which of the two known record layouts a record was classified as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawFormat {
    /// IDS event layout keyed by `src_ip` / `dest_ip`.
    Paired,
    /// Graph API layout keyed by `id` / `source` / `target` with an `attributes` object.
    Attributed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Destination,
}

impl Endpoint {
    pub fn key(self) -> &'static str {
        match self {
            Self::Source => "src_ip",
            Self::Destination => "dest_ip",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PairedNode {
    pub src_ip: String,
    pub dest_ip: String,
    pub src_tags: Vec<String>,
    pub dest_tags: Vec<String>,
}

impl PairedNode {
    fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let src_ip = identity(object, "src_ip")?;
        let dest_ip = identity(object, "dest_ip")?;
        let tags = object.get("tags").and_then(Value::as_object);

        Some(Self {
            src_ip,
            dest_ip,
            src_tags: tag_list(tags, Endpoint::Source),
            dest_tags: tag_list(tags, Endpoint::Destination),
        })
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> (&str, &[String]) {
        match endpoint {
            Endpoint::Source => (&self.src_ip, &self.src_tags),
            Endpoint::Destination => (&self.dest_ip, &self.dest_tags),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AttributedNode {
    pub id: String,
    pub attributes: Map<String, Value>,
}

impl AttributedNode {
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn ip(&self) -> &str {
        self.attribute_str("ip").unwrap_or(&self.id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RawNode {
    Paired(PairedNode),
    Attributed(AttributedNode),
}

impl RawNode {
    /// Returns `None` when the record carries no usable identity.
    pub fn classify(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        if object.contains_key("src_ip") || object.contains_key("dest_ip") {
            return PairedNode::from_object(object).map(Self::Paired);
        }

        if object.contains_key("id") {
            return AttributedNode::deserialize(value)
                .ok()
                .filter(|node| !node.id.is_empty())
                .map(Self::Attributed);
        }

        None
    }

    pub fn format(&self) -> RawFormat {
        match self {
            Self::Paired(_) => RawFormat::Paired,
            Self::Attributed(_) => RawFormat::Attributed,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PairedEdge {
    pub src_ip: String,
    pub dest_ip: String,
    pub fields: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AttributedEdge {
    pub source: String,
    pub target: String,
    pub attributes: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RawEdge {
    Paired(PairedEdge),
    Attributed(AttributedEdge),
}

impl RawEdge {
    /// Returns `None` when either endpoint is missing.
    pub fn classify(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        if object.contains_key("src_ip") || object.contains_key("dest_ip") {
            return Some(Self::Paired(PairedEdge {
                src_ip: identity(object, "src_ip")?,
                dest_ip: identity(object, "dest_ip")?,
                fields: object.clone(),
            }));
        }

        if object.contains_key("source") || object.contains_key("target") {
            return AttributedEdge::deserialize(value)
                .ok()
                .filter(|edge| !edge.source.is_empty() && !edge.target.is_empty())
                .map(Self::Attributed);
        }

        None
    }

    pub fn format(&self) -> RawFormat {
        match self {
            Self::Paired(_) => RawFormat::Paired,
            Self::Attributed(_) => RawFormat::Attributed,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Self::Paired(edge) => &edge.src_ip,
            Self::Attributed(edge) => &edge.source,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Paired(edge) => &edge.dest_ip,
            Self::Attributed(edge) => &edge.target,
        }
    }

    /// Raw attributes: the whole record for paired edges, `attributes` otherwise.
    pub fn fields(&self) -> &Map<String, Value> {
        match self {
            Self::Paired(edge) => &edge.fields,
            Self::Attributed(edge) => &edge.attributes,
        }
    }

    pub fn kind(&self) -> EdgeKind {
        match self {
            Self::Paired(edge) => match edge.fields.get("event_type").and_then(Value::as_str) {
                Some("flow") => EdgeKind::Flow,
                Some(_) => EdgeKind::Alert,
                None if edge.fields.contains_key("bytes_toserver")
                    || edge.fields.contains_key("bytes_toclient") =>
                {
                    EdgeKind::Flow
                }
                None => EdgeKind::Alert,
            },
            Self::Attributed(edge) => {
                if CLIENT_BYTES_KEYS
                    .iter()
                    .any(|key| edge.attributes.contains_key(*key))
                {
                    EdgeKind::Flow
                } else {
                    EdgeKind::Alert
                }
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSnapshot {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

impl RawSnapshot {
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| anyhow!("snapshot must be an object, found {}", type_name(value)))?;
        let raw_nodes = record_list(object, "nodes")?;
        let raw_edges = record_list(object, "edges")?;

        let nodes = raw_nodes
            .iter()
            .filter_map(|record| {
                let node = RawNode::classify(record);
                if node.is_none() {
                    debug!("skipping node record without identity: {record}");
                }
                node
            })
            .collect::<Vec<_>>();

        let edges = raw_edges
            .iter()
            .filter_map(|record| {
                let edge = RawEdge::classify(record);
                if edge.is_none() {
                    debug!("skipping edge record without endpoints: {record}");
                }
                edge
            })
            .collect::<Vec<_>>();

        Ok(Self { nodes, edges })
    }
}

/// Accepts a single snapshot object or an ordered array of snapshots.
pub fn parse_input(value: &Value) -> Result<Vec<RawSnapshot>> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                RawSnapshot::from_value(item)
                    .with_context(|| format!("snapshot {index} is malformed"))
            })
            .collect(),
        Value::Object(_) => Ok(vec![RawSnapshot::from_value(value)?]),
        other => Err(anyhow!(
            "expected a snapshot object or an array of snapshots, found {}",
            type_name(other)
        )),
    }
}

pub(super) fn number(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
}

fn record_list<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Vec<Value>> {
    match object.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(anyhow!(
            "`{key}` must be an array, found {}",
            type_name(other)
        )),
        None => Err(anyhow!("missing `{key}` array")),
    }
}

fn identity(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn tag_list(tags: Option<&Map<String, Value>>, endpoint: Endpoint) -> Vec<String> {
    tags.and_then(|tags| tags.get(endpoint.key()))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
