//! Graph analytics over a layout snapshot
//!
//! Everything here is a pure function of the node and edge lists. The only
//! asynchronous piece is [`analyze_delayed`], which waits a configurable pause
//! before computing so hosts can show a progress state.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::{Edge, LayoutSnapshot, PositionedNode};

/// How many nodes the centrality ranking keeps by default
pub const DEFAULT_TOP_K: usize = 5;

/// Default artificial delay of [`analyze_delayed`], in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 800;

/// Upper bound on label propagation sweeps
const MAX_PROPAGATION_ROUNDS: usize = 20;

/// How nodes are grouped into communities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartitionStrategy {
    /// Three contiguous slices of the node list (40% / 30% / 30%).
    /// Ignores edges entirely.
    #[default]
    Positional,
    /// Asynchronous label propagation over the undirected edge structure
    LabelPropagation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub top_k: usize,
    pub partition: PartitionStrategy,
    pub delay_ms: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            partition: PartitionStrategy::default(),
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

/// A node in the degree ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralNode {
    pub id: String,
    pub label: String,
    pub degree: usize,
}

/// One group of the partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    /// 1-based group number
    pub id: usize,
    pub size: usize,
    pub node_ids: Vec<String>,
}

/// Summary statistics of one graph snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub node_count: usize,
    pub edge_count: usize,
    pub type_counts: BTreeMap<String, usize>,
    pub relationship_type_counts: BTreeMap<String, usize>,
    /// In-plus-out degree; nodes without edges are absent
    pub degree: BTreeMap<String, usize>,
    pub top_by_degree: Vec<CentralNode>,
    pub density: f64,
    pub avg_degree: f64,
    pub partition: Vec<Community>,
}

/// Node set a host can ask to emphasize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Highlight {
    /// The degree ranking
    Central,
    /// One community by id
    Community { id: usize },
}

impl AnalyticsSnapshot {
    /// Degree of `id`, zero when it has no edges
    pub fn degree_of(&self, id: &str) -> usize {
        self.degree.get(id).copied().unwrap_or(0)
    }

    /// Resolve a highlight choice to node ids. `None` for an unknown community.
    pub fn highlight_ids(&self, highlight: Highlight) -> Option<HashSet<String>> {
        match highlight {
            Highlight::Central => Some(self.top_by_degree.iter().map(|n| n.id.clone()).collect()),
            Highlight::Community { id } => self
                .partition
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.node_ids.iter().cloned().collect()),
        }
    }
}

/// Compute the analytics summary for a node/edge list
pub fn analyze(
    nodes: &[PositionedNode],
    edges: &[Edge],
    config: &AnalyticsConfig,
) -> AnalyticsSnapshot {
    let node_count = nodes.len();
    let edge_count = edges.len();

    let mut type_counts = BTreeMap::new();
    for node in nodes {
        *type_counts
            .entry(node.category.as_str().to_string())
            .or_insert(0) += 1;
    }

    let mut relationship_type_counts = BTreeMap::new();
    let mut degree: BTreeMap<String, usize> = BTreeMap::new();
    for edge in edges {
        *relationship_type_counts
            .entry(edge.label.clone())
            .or_insert(0) += 1;
        *degree.entry(edge.source_id.clone()).or_insert(0) += 1;
        *degree.entry(edge.target_id.clone()).or_insert(0) += 1;
    }

    let mut ranked: Vec<CentralNode> = nodes
        .iter()
        .map(|n| CentralNode {
            id: n.id.clone(),
            label: n.label.clone(),
            degree: degree.get(&n.id).copied().unwrap_or(0),
        })
        .collect();
    // stable: ties keep node order
    ranked.sort_by(|a, b| b.degree.cmp(&a.degree));
    ranked.truncate(config.top_k);

    let density = if node_count < 2 {
        0.0
    } else {
        let max_edges = (node_count * (node_count - 1)) as f64 / 2.0;
        edge_count as f64 / max_edges
    };
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        (2 * edge_count) as f64 / node_count as f64
    };

    let partition = match config.partition {
        PartitionStrategy::Positional => positional_partition(nodes),
        PartitionStrategy::LabelPropagation => label_propagation(nodes, edges),
    };

    debug!(node_count, edge_count, density, "analyzed graph");

    AnalyticsSnapshot {
        node_count,
        edge_count,
        type_counts,
        relationship_type_counts,
        degree,
        top_by_degree: ranked,
        density,
        avg_degree,
        partition,
    }
}

/// Wait `config.delay_ms`, then analyze an owned snapshot
pub async fn analyze_delayed(
    snapshot: LayoutSnapshot,
    config: AnalyticsConfig,
) -> AnalyticsSnapshot {
    if config.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.delay_ms)).await;
    }
    analyze(&snapshot.nodes, &snapshot.edges, &config)
}

fn community(id: usize, node_ids: Vec<String>) -> Community {
    Community {
        id,
        size: node_ids.len(),
        node_ids,
    }
}

/// Slices [0, 40%), [40%, 70%), [70%, 100%) of node order.
///
/// A slice is kept only when its nominal share (floor of 40%, 30%, 30% of the
/// node count) is non-zero, so graphs under four nodes lose trailing slices
/// even when those slices hold nodes.
fn positional_partition(nodes: &[PositionedNode]) -> Vec<Community> {
    let n = nodes.len();
    let first = n * 2 / 5;
    let second = n * 7 / 10;
    let tail_share = n * 3 / 10;

    [(1, 0, first, first), (2, first, second, tail_share), (3, second, n, tail_share)]
        .into_iter()
        .filter(|(_, _, _, share)| *share > 0)
        .map(|(id, start, end, _)| {
            community(id, nodes[start..end].iter().map(|n| n.id.clone()).collect())
        })
        .collect()
}

/// Label propagation in node order, ties broken toward the smaller label.
/// Communities are numbered by first appearance in node order.
fn label_propagation(nodes: &[PositionedNode], edges: &[Edge]) -> Vec<Community> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        let (Some(&s), Some(&t)) = (
            index.get(edge.source_id.as_str()),
            index.get(edge.target_id.as_str()),
        ) else {
            continue;
        };
        if s != t {
            adjacency[s].push(t);
            adjacency[t].push(s);
        }
    }

    let mut labels: Vec<usize> = (0..nodes.len()).collect();
    for round in 0..MAX_PROPAGATION_ROUNDS {
        let mut changed = false;
        for i in 0..nodes.len() {
            if adjacency[i].is_empty() {
                continue;
            }
            let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
            for &j in &adjacency[i] {
                *counts.entry(labels[j]).or_insert(0) += 1;
            }
            // BTreeMap iterates labels ascending, so max_by keeps the last max;
            // reverse to prefer the smallest label on ties
            let best = counts
                .iter()
                .rev()
                .max_by_key(|(_, count)| **count)
                .map(|(label, _)| *label);
            if let Some(best) = best {
                if best != labels[i] {
                    labels[i] = best;
                    changed = true;
                }
            }
        }
        if !changed {
            debug!(rounds = round + 1, "label propagation converged");
            break;
        }
    }

    let mut order: Vec<usize> = Vec::new();
    let mut groups: HashMap<usize, Vec<String>> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        let label = labels[i];
        if !groups.contains_key(&label) {
            order.push(label);
        }
        groups.entry(label).or_default().push(node.id.clone());
    }

    order
        .into_iter()
        .enumerate()
        .filter_map(|(k, label)| groups.remove(&label).map(|ids| community(k + 1, ids)))
        .collect()
}
