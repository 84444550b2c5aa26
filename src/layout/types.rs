//! Node and edge types owned by the layout engine

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Vec2;

/// Fill colors per entity category (CSS hex)
pub mod colors {
    /// Person: Blue (#3b82f6)
    pub const PERSON: &str = "#3b82f6";

    /// Organization: Red (#ef4444)
    pub const ORGANIZATION: &str = "#ef4444";

    /// Location: Amber (#f59e0b)
    pub const LOCATION: &str = "#f59e0b";

    /// Event: Green (#10b981)
    pub const EVENT: &str = "#10b981";

    /// Product: Purple (#8b5cf6)
    pub const PRODUCT: &str = "#8b5cf6";

    /// Anything else: Slate (#6b7280)
    pub const ENTITY: &str = "#6b7280";
}

/// Entity classification. Only affects rendering color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Person,
    Organization,
    Location,
    Event,
    Product,
    /// Generic fallback for unrecognized categories
    #[default]
    Entity,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Person,
        Category::Organization,
        Category::Location,
        Category::Event,
        Category::Product,
        Category::Entity,
    ];

    /// Parse a category name; unknown names map to [`Category::Entity`]
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Person => "Person",
            Category::Organization => "Organization",
            Category::Location => "Location",
            Category::Event => "Event",
            Category::Product => "Product",
            Category::Entity => "Entity",
        }
    }

    /// Get the rendering color for this category
    pub fn color(&self) -> &'static str {
        match self {
            Category::Person => colors::PERSON,
            Category::Organization => colors::ORGANIZATION,
            Category::Location => colors::LOCATION,
            Category::Event => colors::EVENT,
            Category::Product => colors::PRODUCT,
            Category::Entity => colors::ENTITY,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node with position and velocity for simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    /// Stable identifier supplied by the data source
    pub id: String,
    /// Display name
    pub label: String,
    pub category: Category,
    /// Position in canvas space
    pub x: f64,
    pub y: f64,
    /// Velocity, only meaningful while the simulation runs
    pub vx: f64,
    pub vy: f64,
    /// Rendering radius, also the node's share of the minimum separation
    pub radius: f64,
    /// Pinned horizontal coordinate (set while dragging)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_x: Option<f64>,
    /// Pinned vertical coordinate (set while dragging)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_y: Option<f64>,
}

impl PositionedNode {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vx, self.vy)
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_x.is_some() || self.pinned_y.is_some()
    }

    pub fn color(&self) -> &'static str {
        self.category.color()
    }
}

/// A directed, labeled relation between two node ids.
///
/// Endpoints are resolved by id on every use, so an edge whose endpoint has
/// been removed simply contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    /// Relationship type name
    pub label: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: label.into(),
        }
    }

    /// Whether this edge has `id` as its source or target
    pub fn touches(&self, id: &str) -> bool {
        self.source_id == id || self.target_id == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_falls_back_to_entity() {
        assert_eq!(Category::parse("Person"), Category::Person);
        assert_eq!(Category::parse("organization"), Category::Organization);
        assert_eq!(Category::parse("Spaceship"), Category::Entity);
        assert_eq!(Category::parse(""), Category::Entity);
        assert_eq!(Category::parse("Spaceship").color(), colors::ENTITY);
    }

    #[test]
    fn each_category_has_distinct_color() {
        let mut seen: Vec<&str> = Category::ALL.iter().map(|c| c.color()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Category::ALL.len());
    }

    #[test]
    fn node_serializes_camel_case_and_omits_missing_pins() {
        let node = PositionedNode {
            id: "a".to_string(),
            label: "A".to_string(),
            category: Category::Event,
            x: 1.0,
            y: 2.0,
            vx: 0.0,
            vy: 0.0,
            radius: 20.0,
            pinned_x: Some(1.0),
            pinned_y: None,
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["pinnedX"], 1.0);
        assert!(json.get("pinnedY").is_none());
        assert_eq!(json["category"], "Event");
    }

    #[test]
    fn edge_touches_both_endpoints() {
        let edge = Edge::new("e1", "a", "b", "KNOWS");
        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }
}
