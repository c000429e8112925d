//! Visual style configuration.
//!
//! Loaded from a TOML file (`flowgraph.toml` by convention). Every field has a
//! default matching the stock threat-graph look, so a partial file only needs
//! the keys it overrides.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::traffic::{LinearScale, RawFormat};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub nodes: NodeStyle,
    pub edges: EdgeStyle,
    pub palette: Palette,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    /// Symbol size shared by every node.
    pub size: f64,

    /// Symbol used when a record does not name its own.
    pub symbol: String,

    /// Render attributed labels as `ip (ip_type)`.
    pub annotate_type: bool,

    /// Hosts highlighted with the `watched` color regardless of address range.
    pub watched_hosts: Vec<String>,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            size: 30.0,
            symbol: "circle".to_string(),
            annotate_type: true,
            watched_hosts: Vec::new(),
        }
    }
}

/// How alert edges get their width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AlertWidth {
    Fixed { width: f64 },
    ScaledByCount,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
    pub min_width: f64,
    pub max_width: f64,
    pub paired_alert_width: AlertWidth,
    pub attributed_alert_width: AlertWidth,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        let scale = LinearScale::default();
        Self {
            min_width: scale.lo,
            max_width: scale.hi,
            paired_alert_width: AlertWidth::Fixed { width: 5.0 },
            attributed_alert_width: AlertWidth::ScaledByCount,
        }
    }
}

impl EdgeStyle {
    pub fn scale(&self) -> LinearScale {
        LinearScale::new(self.min_width, self.max_width)
    }

    pub fn alert_width(&self, format: RawFormat) -> AlertWidth {
        match format {
            RawFormat::Paired => self.paired_alert_width,
            RawFormat::Attributed => self.attributed_alert_width,
        }
    }
}

/// CSS color strings handed straight to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub critical: String,
    pub suspicious: String,
    pub default: String,
    pub watched: String,
    pub internal: String,
    pub external: String,
    pub flow: String,
    pub alert: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            critical: "red".to_string(),
            suspicious: "yellow".to_string(),
            default: "blue".to_string(),
            watched: "yellow".to_string(),
            internal: "blue".to_string(),
            external: "red".to_string(),
            flow: "blue".to_string(),
            alert: "red".to_string(),
        }
    }
}

impl StyleConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read style config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("invalid style config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("could not parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("could not serialize style config")
    }

    /// Rejects sizes and widths that would not render as finite positive numbers.
    pub fn validate(&self) -> Result<()> {
        let nodes = &self.nodes;
        let edges = &self.edges;

        ensure!(
            nodes.size.is_finite() && nodes.size > 0.0,
            "nodes.size must be a positive number, got {}",
            nodes.size
        );
        ensure!(
            edges.min_width.is_finite() && edges.min_width > 0.0,
            "edges.min_width must be a positive number, got {}",
            edges.min_width
        );
        ensure!(
            edges.max_width.is_finite() && edges.max_width >= edges.min_width,
            "edges.max_width must be a number no smaller than edges.min_width, got {}",
            edges.max_width
        );

        for (name, strategy) in [
            ("edges.paired_alert_width", edges.paired_alert_width),
            ("edges.attributed_alert_width", edges.attributed_alert_width),
        ] {
            if let AlertWidth::Fixed { width } = strategy {
                ensure!(
                    width.is_finite() && width > 0.0,
                    "{name}.width must be a positive number, got {width}"
                );
            }
        }

        Ok(())
    }
}
