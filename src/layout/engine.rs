//! CPU force simulation for knowledge-graph layout
//!
//! Each tick applies three forces and integrates:
//!
//! - **Center force**: pulls every free axis toward the canvas center
//! - **Many-body force**: inverse-square repulsion between nearby pairs,
//!   doubled when two circles crowd each other
//! - **Link force**: Hooke springs toward a uniform rest length
//!
//! Edges reference nodes by id and are re-resolved every tick, so removing a
//! node never leaves a dangling reference behind.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::LayoutConfig;
use super::geometry::Vec2;
use super::placement;
use super::scheduler::{FrameOutcome, FrameThrottle, StopReason};
use super::types::{Category, Edge, PositionedNode};

/// Spread of the random offset around the center for added nodes
const ADDED_NODE_SPREAD: f64 = 100.0;

/// Identity of a node before it has been placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub label: String,
    pub category: Category,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
        }
    }

    /// Node at the origin with zero velocity and radius, for consumers that
    /// only need identity and category
    pub fn unplaced(self) -> PositionedNode {
        PositionedNode {
            id: self.id,
            label: self.label,
            category: self.category,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            radius: 0.0,
            pinned_x: None,
            pinned_y: None,
        }
    }
}

/// Drop repeated node ids, keeping the first occurrence
pub fn distinct_nodes(nodes: Vec<NodeSpec>) -> Vec<NodeSpec> {
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter(|spec| {
            let fresh = seen.insert(spec.id.clone());
            if !fresh {
                warn!(id = %spec.id, "dropping duplicate node id");
            }
            fresh
        })
        .collect()
}

/// Owned copy of the working set, safe to read while the engine keeps ticking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
}

/// Interactive force-directed layout
pub struct ForceLayout {
    nodes: Vec<PositionedNode>,
    edges: Vec<Edge>,
    config: LayoutConfig,
    rng: StdRng,
    throttle: FrameThrottle,
    running: bool,
    iterations: u32,
    selected: Option<String>,
    highlighted: HashSet<String>,
    next_id: u64,
}

impl ForceLayout {
    /// Empty, idle layout
    pub fn new(config: LayoutConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            throttle: FrameThrottle::new(config.frame_rate),
            config,
            rng,
            running: false,
            iterations: 0,
            selected: None,
            highlighted: HashSet::new(),
            next_id: 1,
        }
    }

    /// Layout initialized from a node/edge list and already running
    pub fn with_graph(nodes: Vec<NodeSpec>, edges: Vec<Edge>, config: LayoutConfig) -> Self {
        let mut layout = Self::new(config);
        layout.load(nodes, edges);
        layout
    }

    /// Replace the whole working set with a new graph and restart the loop.
    ///
    /// Duplicate node ids keep their first occurrence.
    pub fn load(&mut self, nodes: Vec<NodeSpec>, edges: Vec<Edge>) {
        let specs = distinct_nodes(nodes);

        let total = specs.len();
        let mut placed = Vec::with_capacity(total);
        for (index, spec) in specs.into_iter().enumerate() {
            let position = placement::initial_position(index, total, &self.config, &mut self.rng);
            let velocity = placement::initial_velocity(&self.config, &mut self.rng);
            let radius = placement::initial_radius(&self.config, &mut self.rng);
            placed.push(PositionedNode {
                id: spec.id,
                label: spec.label,
                category: spec.category,
                x: position.x,
                y: position.y,
                vx: velocity.x,
                vy: velocity.y,
                radius,
                pinned_x: None,
                pinned_y: None,
            });
        }

        info!(nodes = placed.len(), edges = edges.len(), "loaded graph");
        self.nodes = placed;
        self.edges = edges;
        self.selected = None;
        self.highlighted.clear();
        self.restart();
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut PositionedNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Run loop
    // -------------------------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks done in the current run
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Resume the loop if it is idle. A running loop keeps its iteration count.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.iterations = 0;
            self.throttle.reset();
            debug!("layout started");
        }
    }

    /// Resume the loop with a fresh iteration budget, even if it was running
    pub fn restart(&mut self) {
        self.running = true;
        self.iterations = 0;
        self.throttle.reset();
        debug!("layout restarted");
    }

    /// Cancel further ticks and keep the current positions
    pub fn stop(&mut self) {
        self.running = false;
        self.iterations = 0;
        self.throttle.reset();
    }

    /// Host frame callback. Ticks at most once per frame interval while running.
    pub fn frame(&mut self, now: Instant) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Idle;
        }
        if !self.throttle.ready(now) {
            return FrameOutcome::Skipped;
        }
        self.step()
    }

    /// One scheduled tick, ignoring wall-clock throttling
    pub fn step(&mut self) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Idle;
        }
        if self.nodes.is_empty() {
            self.stop();
            return FrameOutcome::Stopped(StopReason::Empty);
        }

        self.iterations += 1;
        let total_velocity = self.tick();

        let reason = if total_velocity < self.config.settle_threshold {
            Some(StopReason::Settled)
        } else if self.iterations >= self.config.max_iterations {
            Some(StopReason::IterationLimit)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                debug!(
                    ?reason,
                    iterations = self.iterations,
                    total_velocity,
                    "layout stopped"
                );
                self.stop();
                FrameOutcome::Stopped(reason)
            }
            None => FrameOutcome::Ticked,
        }
    }

    /// Step until the loop stops. Returns the number of ticks run.
    pub fn run_until_settled(&mut self) -> u32 {
        let mut ticks = 0;
        loop {
            match self.step() {
                FrameOutcome::Ticked => ticks += 1,
                FrameOutcome::Stopped(StopReason::Empty) | FrameOutcome::Idle => break,
                FrameOutcome::Stopped(_) => {
                    ticks += 1;
                    break;
                }
                FrameOutcome::Skipped => {}
            }
        }
        ticks
    }

    // -------------------------------------------------------------------------
    // Physics
    // -------------------------------------------------------------------------

    /// Run one simulation tick regardless of run-loop state.
    ///
    /// Returns the summed |vx| + |vy| over all nodes afterwards.
    pub fn tick(&mut self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }

        self.apply_center_force();
        self.apply_many_body_force();
        self.apply_link_force();
        self.integrate();

        self.nodes.iter().map(|n| n.velocity().manhattan()).sum()
    }

    /// Pull free axes toward the canvas center
    fn apply_center_force(&mut self) {
        let center = self.config.bounds().center();
        let k = self.config.center_strength;
        for node in &mut self.nodes {
            if node.pinned_x.is_none() {
                node.vx += (center.x - node.x) * k;
            }
            if node.pinned_y.is_none() {
                node.vy += (center.y - node.y) * k;
            }
        }
    }

    /// Repulsion between every pair closer than the cull distance
    fn apply_many_body_force(&mut self) {
        let n = self.nodes.len();
        let cull_sq = self.config.cull_distance * self.config.cull_distance;

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.nodes[i].position().to(self.nodes[j].position());
                let dist_sq = delta.length_squared();
                if dist_sq > cull_sq || dist_sq == 0.0 {
                    continue;
                }
                let dist = dist_sq.sqrt();

                let crowded = self
                    .config
                    .min_distance
                    .max(self.nodes[i].radius + self.nodes[j].radius + self.config.overlap_margin);
                let mut force = self.config.repel_strength / dist_sq;
                if dist < crowded {
                    force *= 2.0;
                }

                let fx = delta.x / dist * force;
                let fy = delta.y / dist * force;
                self.nodes[i].vx -= fx;
                self.nodes[i].vy -= fy;
                self.nodes[j].vx += fx;
                self.nodes[j].vy += fy;
            }
        }
    }

    /// Springs along every edge whose endpoints both exist right now
    fn apply_link_force(&mut self) {
        let pairs: Vec<(usize, usize)> = {
            let index: HashMap<&str, usize> = self
                .nodes
                .iter()
                .enumerate()
                .map(|(i, n)| (n.id.as_str(), i))
                .collect();
            self.edges
                .iter()
                .filter_map(|e| {
                    Some((
                        *index.get(e.source_id.as_str())?,
                        *index.get(e.target_id.as_str())?,
                    ))
                })
                .collect()
        };

        for (source, target) in pairs {
            let delta = self.nodes[source].position().to(self.nodes[target].position());
            let dist = delta.length();
            if dist == 0.0 {
                continue;
            }

            // Hooke's law: F = k * (x - x0)
            let force = (dist - self.config.link_distance) * self.config.link_strength;
            let fx = delta.x / dist * force;
            let fy = delta.y / dist * force;

            self.nodes[source].vx += fx;
            self.nodes[source].vy += fy;
            self.nodes[target].vx -= fx;
            self.nodes[target].vy -= fy;
        }
    }

    /// Damp, move and clamp free axes; hold pinned axes still
    fn integrate(&mut self) {
        let bounds = self.config.bounds();
        let damping = self.config.damping;
        let alpha = self.config.alpha;
        let margin = self.config.boundary_margin;

        for node in &mut self.nodes {
            let inset = node.radius + margin;
            match node.pinned_x {
                Some(px) => {
                    node.x = px;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= damping;
                    node.x = bounds.clamp_x(node.x + node.vx * alpha, inset);
                }
            }
            match node.pinned_y {
                Some(py) => {
                    node.y = py;
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= damping;
                    node.y = bounds.clamp_y(node.y + node.vy * alpha, inset);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Add a node near the canvas center and resume the loop. Returns its id.
    ///
    /// Unrecognized categories fall back to [`Category::Entity`].
    pub fn add_node(&mut self, label: impl Into<String>, category: &str) -> String {
        let id = self.fresh_id();
        let center = self.config.bounds().center();
        let x = center.x + placement::centered(&mut self.rng, ADDED_NODE_SPREAD);
        let y = center.y + placement::centered(&mut self.rng, ADDED_NODE_SPREAD);
        let velocity = placement::initial_velocity(&self.config, &mut self.rng);
        let radius = placement::initial_radius(&self.config, &mut self.rng);

        self.nodes.push(PositionedNode {
            id: id.clone(),
            label: label.into(),
            category: Category::parse(category),
            x,
            y,
            vx: velocity.x,
            vy: velocity.y,
            radius,
            pinned_x: None,
            pinned_y: None,
        });
        debug!(%id, "added node");
        self.start();
        id
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let candidate = format!("node-{}", self.next_id);
            self.next_id += 1;
            if self.node(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Remove a node and every edge touching it. Unknown ids are a no-op.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return false;
        }

        self.edges.retain(|e| !e.touches(id));
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.highlighted.remove(id);
        debug!(%id, "removed node");

        if !self.nodes.is_empty() {
            self.start();
        }
        true
    }

    /// Pin a node to `(x, y)`, clamped into the canvas. Unknown ids are a no-op.
    pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
        let bounds = self.config.bounds();
        let margin = self.config.boundary_margin;
        let Some(node) = self.node_mut(id) else {
            return false;
        };

        let inset = node.radius + margin;
        let (px, py) = (bounds.clamp_x(x, inset), bounds.clamp_y(y, inset));
        node.pinned_x = Some(px);
        node.pinned_y = Some(py);
        node.x = px;
        node.y = py;
        node.vx = 0.0;
        node.vy = 0.0;
        true
    }

    /// Release a pinned node and resume the loop. Unknown ids are a no-op.
    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.pinned_x = None;
        node.pinned_y = None;
        self.restart();
        true
    }

    // -------------------------------------------------------------------------
    // Selection, highlight and queries
    // -------------------------------------------------------------------------

    /// Select a node. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_highlight<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.highlighted = ids.into_iter().collect();
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted.clear();
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.contains(id)
    }

    pub fn highlighted(&self) -> &HashSet<String> {
        &self.highlighted
    }

    /// Topmost node whose circle contains `(x, y)`
    pub fn node_at(&self, x: f64, y: f64) -> Option<&str> {
        let point = Vec2::new(x, y);
        self.nodes
            .iter()
            .rev()
            .find(|n| n.position().to(point).length() <= n.radius)
            .map(|n| n.id.as_str())
    }

    /// Ids of existing nodes sharing an edge with `id`, in edge order
    pub fn neighbors(&self, id: &str) -> Option<Vec<&str>> {
        self.node(id)?;
        let mut seen = HashSet::new();
        let neighbors = self
            .edges
            .iter()
            .filter_map(|e| {
                if e.source_id == id {
                    Some(e.target_id.as_str())
                } else if e.target_id == id {
                    Some(e.source_id.as_str())
                } else {
                    None
                }
            })
            .filter(|other| *other != id && self.node(other).is_some() && seen.insert(*other))
            .collect();
        Some(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> LayoutConfig {
        LayoutConfig::default().with_seed(17)
    }

    fn spec(id: &str) -> NodeSpec {
        NodeSpec::new(id, id.to_uppercase(), Category::Person)
    }

    fn two_node_graph() -> ForceLayout {
        ForceLayout::with_graph(
            vec![spec("a"), spec("b")],
            vec![Edge::new("e1", "a", "b", "CONNECTS_TO")],
            config(),
        )
    }

    #[test]
    fn distinct_nodes_keeps_first_and_unplaced_is_at_rest() {
        let nodes = distinct_nodes(vec![
            NodeSpec::new("a", "First", Category::Person),
            spec("b"),
            NodeSpec::new("a", "Second", Category::Event),
        ]);
        assert_eq!(nodes.len(), 2);

        let first = nodes[0].clone().unplaced();
        assert_eq!(first.label, "First");
        assert_eq!(first.category, Category::Person);
        assert_eq!((first.x, first.y, first.vx, first.vy), (0.0, 0.0, 0.0, 0.0));
        assert!(!first.is_pinned());
    }

    fn ring_graph(n: usize) -> ForceLayout {
        let nodes = (0..n).map(|i| spec(&format!("n{i}"))).collect();
        let edges = (0..n)
            .map(|i| {
                Edge::new(
                    format!("e{i}"),
                    format!("n{i}"),
                    format!("n{}", (i + 1) % n),
                    "KNOWS",
                )
            })
            .collect();
        ForceLayout::with_graph(nodes, edges, config())
    }

    fn assert_in_bounds(layout: &ForceLayout) {
        let cfg = layout.config();
        for node in layout.nodes() {
            assert!(node.x >= node.radius && node.x <= cfg.width - node.radius, "{node:?}");
            assert!(node.y >= node.radius && node.y <= cfg.height - node.radius, "{node:?}");
        }
    }

    #[test]
    fn creates_layout_from_graph() {
        let layout = two_node_graph();
        assert_eq!(layout.nodes().len(), 2);
        assert_eq!(layout.edges().len(), 1);
        assert!(layout.is_running());
        assert_eq!(layout.iterations(), 0);
    }

    #[test]
    fn small_graph_starts_near_grid_slots() {
        let layout = two_node_graph();
        let a = layout.node("a").unwrap();
        let b = layout.node("b").unwrap();
        let half_jitter = layout.config().initial_jitter / 2.0;

        // 1 row x 2 columns: (80, 80) and (720, 80), both clamped to the padding
        assert!((a.x - 80.0).abs() <= half_jitter && a.x >= 80.0);
        assert!((b.x - 720.0).abs() <= half_jitter && b.x <= 720.0);
        assert!((a.y - 80.0).abs() <= half_jitter);
        assert!((b.y - 80.0).abs() <= half_jitter);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let layout = ForceLayout::with_graph(
            vec![
                NodeSpec::new("a", "first", Category::Person),
                NodeSpec::new("a", "second", Category::Event),
            ],
            vec![],
            config(),
        );
        assert_eq!(layout.nodes().len(), 1);
        assert_eq!(layout.node("a").unwrap().label, "first");
    }

    #[test]
    fn nodes_stay_in_bounds_every_tick() {
        let mut layout = ring_graph(25);
        for _ in 0..200 {
            layout.tick();
            assert_in_bounds(&layout);
        }
    }

    #[test]
    fn empty_graph_handles_gracefully() {
        let mut layout = ForceLayout::with_graph(vec![], vec![], config());
        assert_eq!(layout.tick(), 0.0);
        assert_eq!(layout.step(), FrameOutcome::Stopped(StopReason::Empty));
        assert!(!layout.is_running());
        assert_eq!(layout.run_until_settled(), 0);
    }

    #[test]
    fn run_loop_terminates_within_iteration_cap() {
        for n in [1, 2, 7, 30] {
            let mut layout = ring_graph(n);
            let ticks = layout.run_until_settled();
            assert!(ticks >= 1);
            assert!(ticks <= layout.config().max_iterations, "{n} nodes ran {ticks}");
            assert!(!layout.is_running());
            assert_eq!(layout.iterations(), 0);
        }
    }

    #[test]
    fn oscillating_graph_hits_iteration_limit() {
        let mut cfg = config();
        cfg.damping = 1.0;
        cfg.settle_threshold = 0.0;
        cfg.max_iterations = 12;
        let mut layout = ForceLayout::with_graph(vec![spec("a"), spec("b")], vec![], cfg);

        let mut last = FrameOutcome::Idle;
        for _ in 0..12 {
            last = layout.step();
        }
        assert_eq!(last, FrameOutcome::Stopped(StopReason::IterationLimit));
        assert_eq!(layout.step(), FrameOutcome::Idle);
    }

    #[test]
    fn single_node_settles() {
        let mut layout = ForceLayout::with_graph(vec![spec("only")], vec![], config());
        layout.run_until_settled();
        assert!(!layout.is_running());
        assert_in_bounds(&layout);
    }

    #[test]
    fn disconnected_nodes_repel() {
        let mut cfg = config();
        cfg.initial_jitter = 0.0;
        cfg.initial_speed = 0.0;
        cfg.center_strength = 0.0;
        let mut layout = ForceLayout::new(cfg);
        layout.load(vec![spec("a"), spec("b")], vec![]);
        layout.pin("a", 380.0, 250.0);
        layout.pin("b", 420.0, 250.0);
        layout.unpin("a");
        layout.unpin("b");

        layout.tick();
        let a = layout.node("a").unwrap();
        let b = layout.node("b").unwrap();
        assert!(a.vx < 0.0, "a should be pushed left");
        assert!(b.vx > 0.0, "b should be pushed right");
    }

    #[test]
    fn stretched_edge_pulls_endpoints_together() {
        let mut cfg = config();
        cfg.center_strength = 0.0;
        let mut layout = two_node_graph();
        layout.config = cfg;
        layout.pin("a", 100.0, 250.0);
        layout.pin("b", 700.0, 250.0);
        layout.unpin("a");
        layout.unpin("b");

        layout.tick();
        let a = layout.node("a").unwrap();
        let b = layout.node("b").unwrap();
        assert!(a.x > 100.0);
        assert!(b.x < 700.0);
    }

    #[test]
    fn edges_to_missing_nodes_are_skipped() {
        let mut layout = ForceLayout::with_graph(
            vec![spec("a")],
            vec![Edge::new("e1", "a", "ghost", "KNOWS")],
            config(),
        );
        assert_eq!(layout.edges().len(), 1);
        for _ in 0..10 {
            layout.tick();
        }
        assert_in_bounds(&layout);
    }

    #[test]
    fn pinned_node_holds_position_then_moves_when_released() {
        let mut layout = two_node_graph();
        assert!(layout.pin("a", 100.0, 100.0));

        for _ in 0..10 {
            layout.tick();
            let a = layout.node("a").unwrap();
            assert_eq!((a.x, a.y), (100.0, 100.0));
            assert_eq!((a.vx, a.vy), (0.0, 0.0));
        }

        assert!(layout.unpin("a"));
        assert!(layout.is_running());
        let mut moved = false;
        for _ in 0..50 {
            layout.tick();
            let a = layout.node("a").unwrap();
            if a.x != 100.0 || a.y != 100.0 {
                moved = true;
                break;
            }
        }
        assert!(moved, "released node never moved");
    }

    #[test]
    fn single_axis_pin_only_freezes_that_axis() {
        let mut layout = two_node_graph();
        {
            let a = layout.node_mut("a").unwrap();
            a.pinned_x = Some(200.0);
        }
        for _ in 0..5 {
            layout.tick();
            let a = layout.node("a").unwrap();
            assert_eq!(a.x, 200.0);
            assert_eq!(a.vx, 0.0);
        }
    }

    #[test]
    fn pin_outside_canvas_is_clamped() {
        let mut layout = two_node_graph();
        layout.pin("a", -500.0, 10_000.0);
        let a = layout.node("a").unwrap();
        let inset = a.radius + layout.config().boundary_margin;
        assert_eq!(a.x, inset);
        assert_eq!(a.y, layout.config().height - inset);
        layout.tick();
        assert_in_bounds(&layout);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut layout = two_node_graph();
        let before = layout.snapshot();
        assert!(!layout.remove_node("zzz"));
        assert!(!layout.pin("zzz", 1.0, 1.0));
        assert!(!layout.unpin("zzz"));
        assert!(!layout.select("zzz"));
        assert_eq!(layout.snapshot(), before);
    }

    #[test]
    fn remove_node_prunes_edges_and_selection() {
        let mut layout = ring_graph(4);
        layout.select("n1");
        layout.set_highlight(["n1".to_string(), "n2".to_string()]);
        layout.stop();

        assert!(layout.remove_node("n1"));
        assert!(layout.node("n1").is_none());
        assert!(layout.edges().iter().all(|e| !e.touches("n1")));
        assert_eq!(layout.edges().len(), 2);
        assert_eq!(layout.selected(), None);
        assert!(!layout.is_highlighted("n1"));
        assert!(layout.is_highlighted("n2"));
        assert!(layout.is_running());
    }

    #[test]
    fn removing_last_node_leaves_loop_idle() {
        let mut layout = ForceLayout::with_graph(vec![spec("a")], vec![], config());
        layout.stop();
        assert!(layout.remove_node("a"));
        assert!(!layout.is_running());
    }

    #[test]
    fn add_node_resumes_idle_loop() {
        let mut layout = two_node_graph();
        layout.stop();

        let id = layout.add_node("Acme", "Organization");
        assert!(layout.is_running());
        let node = layout.node(&id).unwrap();
        assert_eq!(node.category, Category::Organization);
        assert!((node.x - 400.0).abs() <= ADDED_NODE_SPREAD / 2.0);
        assert!((node.y - 250.0).abs() <= ADDED_NODE_SPREAD / 2.0);

        let other = layout.add_node("Thing", "Spaceship");
        assert_ne!(id, other);
        assert_eq!(layout.node(&other).unwrap().category, Category::Entity);
    }

    #[test]
    fn add_node_skips_taken_ids() {
        let mut layout =
            ForceLayout::with_graph(vec![spec("node-1"), spec("node-2")], vec![], config());
        let id = layout.add_node("new", "Person");
        assert_eq!(id, "node-3");
    }

    #[test]
    fn restart_resumes_settled_layout() {
        let mut layout = two_node_graph();
        layout.run_until_settled();
        assert!(!layout.is_running());
        layout.restart();
        assert!(layout.is_running());
        assert_eq!(layout.iterations(), 0);
    }

    #[test]
    fn frame_is_throttled() {
        let mut layout = two_node_graph();
        let start = Instant::now();
        assert_eq!(layout.frame(start), FrameOutcome::Ticked);
        assert_eq!(layout.frame(start + Duration::from_millis(5)), FrameOutcome::Skipped);
        assert_eq!(layout.iterations(), 1);
        assert_eq!(layout.frame(start + Duration::from_millis(40)), FrameOutcome::Ticked);
        assert_eq!(layout.iterations(), 2);

        layout.stop();
        assert_eq!(layout.frame(start + Duration::from_secs(1)), FrameOutcome::Idle);
    }

    #[test]
    fn hit_test_finds_node_under_point() {
        let mut layout = two_node_graph();
        layout.pin("a", 100.0, 100.0);
        assert_eq!(layout.node_at(105.0, 100.0), Some("a"));
        assert_eq!(layout.node_at(400.0, 400.0), None);
    }

    #[test]
    fn neighbors_follow_edges_both_ways() {
        let layout = ring_graph(4);
        assert_eq!(layout.neighbors("n0"), Some(vec!["n1", "n3"]));
        assert_eq!(layout.neighbors("missing"), None);
    }

    #[test]
    fn load_replaces_everything() {
        let mut layout = ring_graph(5);
        layout.select("n0");
        layout.set_highlight(["n0".to_string()]);
        layout.load(vec![spec("x")], vec![]);
        assert_eq!(layout.nodes().len(), 1);
        assert!(layout.edges().is_empty());
        assert_eq!(layout.selected(), None);
        assert!(layout.highlighted().is_empty());
        assert!(layout.is_running());
    }

    #[test]
    fn seeded_layouts_are_reproducible() {
        let a = ring_graph(12).snapshot();
        let b = ring_graph(12).snapshot();
        assert_eq!(a, b);
    }
}
