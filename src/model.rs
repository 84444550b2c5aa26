//! Graph snapshot as supplied by the hosting application
//!
//! Mirrors the graph store's export shape: nodes carry a label list and an
//! opaque property bag, relationships carry a type and endpoint ids.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::layout::{Category, Edge, NodeSpec};

/// A node as exported by the graph store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,
    /// Store labels; the second one (falling back to the first) names the category
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl SnapshotNode {
    /// Returns the display name (`name` property if it is a string, otherwise `Node <id>`)
    pub fn display_name(&self) -> String {
        self.properties
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Node {}", self.id))
    }

    /// Category from the label list; unknown or missing labels map to `Entity`
    pub fn category(&self) -> Category {
        self.labels
            .get(1)
            .or(self.labels.first())
            .map(|l| Category::parse(l))
            .unwrap_or_default()
    }

    pub fn to_spec(&self) -> NodeSpec {
        NodeSpec::new(self.id.clone(), self.display_name(), self.category())
    }
}

/// A relationship as exported by the graph store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRelationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_node_id: String,
    pub end_node_id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl SnapshotRelationship {
    pub fn to_edge(&self) -> Edge {
        Edge::new(
            self.id.clone(),
            self.start_node_id.clone(),
            self.end_node_id.clone(),
            self.kind.clone(),
        )
    }
}

/// Complete graph snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    #[serde(default)]
    pub relationships: Vec<SnapshotRelationship>,
}

impl GraphSnapshot {
    /// Split into the node and edge lists the layout engine consumes
    pub fn to_layout_input(&self) -> (Vec<NodeSpec>, Vec<Edge>) {
        (
            self.nodes.iter().map(SnapshotNode::to_spec).collect(),
            self.relationships
                .iter()
                .map(SnapshotRelationship::to_edge)
                .collect(),
        )
    }
}
