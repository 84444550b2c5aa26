//! Force-directed layout for knowledge graphs
//!
//! Positions a node/edge set on a fixed logical canvas so that unrelated
//! nodes drift apart and related nodes settle at a common spring length,
//! while staying responsive to live edits and drag pinning.
//!
//! # Example
//!
//! ```rust
//! use kgviz::layout::{Category, Edge, ForceLayout, LayoutConfig, NodeSpec};
//!
//! let nodes = vec![
//!     NodeSpec::new("a", "Ada", Category::Person),
//!     NodeSpec::new("b", "Analytical Engine", Category::Product),
//! ];
//! let edges = vec![Edge::new("e1", "a", "b", "DESIGNED")];
//!
//! let mut layout = ForceLayout::with_graph(nodes, edges, LayoutConfig::default());
//! layout.run_until_settled();
//!
//! for node in layout.nodes() {
//!     println!("{} at ({:.1}, {:.1})", node.label, node.x, node.y);
//! }
//! ```
//!
//! # Run loop
//!
//! The engine has no timer of its own. A host calls [`ForceLayout::frame`]
//! from whatever drives it (an animation callback, a tokio interval) and keeps
//! calling while [`FrameOutcome::keep_scheduling`] holds. The loop stops by
//! itself once total velocity drops below the settle threshold or the
//! iteration cap is hit, and resumes on edits, unpinning or
//! [`ForceLayout::restart`].

mod config;
mod engine;
pub mod geometry;
pub mod placement;
mod scheduler;
mod types;

pub use config::{
    DEFAULT_FRAME_RATE, DEFAULT_HEIGHT, DEFAULT_MAX_ITERATIONS, DEFAULT_WIDTH, LayoutConfig,
};
pub use engine::{ForceLayout, LayoutSnapshot, NodeSpec, distinct_nodes};
pub use geometry::{Bounds, Vec2};
pub use scheduler::{FrameOutcome, FrameThrottle, StopReason};
pub use types::{Category, Edge, PositionedNode, colors};
