//! Synthetic knowledge graphs for demos and load testing
//!
//! Relationship types are drawn from a fixed vocabulary, narrowed by the
//! categories of the two endpoints (a person works for an organization, an
//! organization manufactures a product, ...). Self loops are never produced.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value, json};

use crate::layout::Category;
use crate::model::{GraphSnapshot, SnapshotNode, SnapshotRelationship};

/// Categories synthetic entities are drawn from
const ENTITY_CATEGORIES: [Category; 5] = [
    Category::Person,
    Category::Organization,
    Category::Location,
    Category::Event,
    Category::Product,
];

/// Relationship vocabulary for endpoint pairs without a specific rule
const RELATIONSHIP_TYPES: [&str; 8] = [
    "WORKS_FOR",
    "LOCATED_IN",
    "FOUNDED_BY",
    "PARTICIPATED_IN",
    "MANUFACTURES",
    "OWNS",
    "KNOWS",
    "VISITED",
];

const FIRST_NAMES: [&str; 8] = [
    "Ada", "Alan", "Grace", "Edsger", "Barbara", "Donald", "Frances", "Ken",
];
const LAST_NAMES: [&str; 8] = [
    "Lovelace", "Turing", "Hopper", "Dijkstra", "Liskov", "Knuth", "Allen", "Thompson",
];
const ORG_STEMS: [&str; 6] = ["Acme", "Globex", "Initech", "Umbrella", "Hooli", "Vandelay"];
const ORG_SUFFIXES: [&str; 4] = ["Inc", "Labs", "Group", "Systems"];
const CITIES: [&str; 8] = [
    "London", "Lagos", "Lima", "Oslo", "Osaka", "Quito", "Tunis", "Perth",
];
const EVENT_KINDS: [&str; 4] = ["Summit", "Hackathon", "Expo", "Conference"];
const PRODUCT_KINDS: [&str; 5] = ["Router", "Compiler", "Sensor", "Engine", "Widget"];

/// Parameters for [`generate`]
#[derive(Debug, Clone)]
pub struct SampleOptions {
    pub nodes: usize,
    pub relationships: usize,
    pub seed: Option<u64>,
}

impl SampleOptions {
    /// `nodes` entities with 1.5 relationships per entity
    pub fn with_nodes(nodes: usize) -> Self {
        Self {
            nodes,
            relationships: nodes.saturating_mul(3) / 2,
            seed: None,
        }
    }
}

/// Build a random graph snapshot
pub fn generate(options: &SampleOptions) -> GraphSnapshot {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let nodes: Vec<SnapshotNode> = (0..options.nodes)
        .map(|i| {
            let category = ENTITY_CATEGORIES[rng.gen_range(0..ENTITY_CATEGORIES.len())];
            let mut properties = Map::new();
            properties.insert("name".to_string(), Value::String(entity_name(category, &mut rng)));
            SnapshotNode {
                id: i.to_string(),
                labels: vec!["Entity".to_string(), category.as_str().to_string()],
                properties,
            }
        })
        .collect();

    let mut relationships = Vec::new();
    if nodes.len() >= 2 {
        for i in 0..options.relationships {
            let start = rng.gen_range(0..nodes.len());
            // shift by 1..len so the end never equals the start
            let end = (start + rng.gen_range(1..nodes.len())) % nodes.len();

            let kind = relationship_type(nodes[start].category(), nodes[end].category(), &mut rng);
            let mut properties = Map::new();
            properties.insert("since".to_string(), json!(rng.gen_range(1995..=2024)));

            relationships.push(SnapshotRelationship {
                id: format!("r{i}"),
                kind: kind.to_string(),
                start_node_id: nodes[start].id.clone(),
                end_node_id: nodes[end].id.clone(),
                properties,
            });
        }
    }

    GraphSnapshot {
        nodes,
        relationships,
    }
}

/// Relationship types allowed between two categories
pub fn allowed_relationships(start: Category, end: Category) -> &'static [&'static str] {
    use Category::*;
    match (start, end) {
        (Person, Organization) => &["WORKS_FOR", "FOUNDED_BY", "OWNS"],
        (Person, Person) => &["KNOWS"],
        (Person, Location) => &["VISITED", "LOCATED_IN"],
        (Organization, Product) => &["MANUFACTURES"],
        (Person, Event) => &["PARTICIPATED_IN"],
        (Organization, Location) => &["LOCATED_IN"],
        _ => &RELATIONSHIP_TYPES,
    }
}

fn relationship_type<R: Rng>(start: Category, end: Category, rng: &mut R) -> &'static str {
    allowed_relationships(start, end)
        .choose(rng)
        .copied()
        .unwrap_or("RELATED_TO")
}

fn pick<R: Rng>(pool: &[&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn entity_name<R: Rng>(category: Category, rng: &mut R) -> String {
    match category {
        Category::Person => format!("{} {}", pick(&FIRST_NAMES, rng), pick(&LAST_NAMES, rng)),
        Category::Organization => format!("{} {}", pick(&ORG_STEMS, rng), pick(&ORG_SUFFIXES, rng)),
        Category::Location => pick(&CITIES, rng).to_string(),
        Category::Event => format!("{} {}", pick(&CITIES, rng), pick(&EVENT_KINDS, rng)),
        Category::Product | Category::Entity => {
            format!("{} {}", pick(&ORG_STEMS, rng), pick(&PRODUCT_KINDS, rng))
        }
    }
}
