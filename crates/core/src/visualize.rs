//! Path subgraph explaining why recommendations were reached.
//!
//! One unweighted shortest path per recommendation is unioned into a small
//! graph that can be serialized or rendered as Graphviz DOT.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::domain::product::Product;
use crate::domain::recommendation::Recommendation;
use crate::graph::{EdgeType, KnowledgeGraph, NodeKey, NodeKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Requested,
    Recommended,
    Intermediate(NodeKind),
}

impl NodeRole {
    pub fn fill_color(&self) -> &'static str {
        match self {
            NodeRole::Requested => "#ffe680",
            NodeRole::Recommended => "#b3ffb3",
            NodeRole::Intermediate(NodeKind::Category) => "#cfe2ff",
            NodeRole::Intermediate(NodeKind::Brand) => "#ffd6a5",
            NodeRole::Intermediate(NodeKind::Attribute) => "#ffccd5",
            NodeRole::Intermediate(NodeKind::Product) => "#f0f0f0",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathNode {
    pub key: NodeKey,
    pub name: String,
    pub role: NodeRole,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathEdge {
    pub source: NodeKey,
    pub target: NodeKey,
    pub edge_type: EdgeType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathGraph {
    pub title: String,
    pub requested: NodeKey,
    pub nodes: Vec<PathNode>,
    pub edges: Vec<PathEdge>,
    /// The shortest path found for each reachable recommendation, in
    /// recommendation order.
    pub paths: Vec<Vec<NodeKey>>,
}

impl PathGraph {
    pub fn node(&self, key: &NodeKey) -> Option<&PathNode> {
        self.nodes.iter().find(|node| &node.key == key)
    }

    pub fn to_dot(&self) -> String {
        let mut dot = String::from("graph \"substitution_paths\" {\n");
        dot.push_str(&format!("  label=\"{}\";\n", escape_dot(&self.title)));
        dot.push_str("  labelloc=\"t\";\n");
        dot.push_str("  node [style=filled, shape=ellipse, fontsize=8];\n");
        dot.push_str("  edge [color=\"#bbbbbb\"];\n");
        for node in &self.nodes {
            dot.push_str(&format!(
                "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
                escape_dot(node.key.as_str()),
                escape_dot(&node.name),
                node.role.fill_color()
            ));
        }
        for edge in &self.edges {
            dot.push_str(&format!(
                "  \"{}\" -- \"{}\" [label=\"{}\"];\n",
                escape_dot(edge.source.as_str()),
                escape_dot(edge.target.as_str()),
                edge.edge_type.as_str()
            ));
        }
        dot.push_str("}\n");
        dot
    }
}

/// Unweighted shortest path between two nodes, endpoints included.
pub fn shortest_path(
    graph: &KnowledgeGraph,
    source: &NodeKey,
    target: &NodeKey,
) -> Option<Vec<NodeKey>> {
    if !graph.contains(source) || !graph.contains(target) {
        return None;
    }

    let mut parents: HashMap<&NodeKey, Option<&NodeKey>> = HashMap::from([(source, None)]);
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        if current == target {
            let mut path = Vec::new();
            let mut cursor = Some(current);
            while let Some(node) = cursor {
                path.push(node.clone());
                cursor = parents.get(node).copied().flatten();
            }
            path.reverse();
            return Some(path);
        }

        for neighbor in graph.neighbors(current) {
            if !parents.contains_key(neighbor) {
                parents.insert(neighbor, Some(current));
                queue.push_back(neighbor);
            }
        }
    }

    None
}

/// Returns `None` when there is nothing to draw: no recommendations, or no
/// recommendation reachable from the requested product.
pub fn visualize_paths(
    graph: &KnowledgeGraph,
    requested: &Product,
    recommendations: &[Recommendation],
) -> Option<PathGraph> {
    if recommendations.is_empty() {
        return None;
    }

    let root = NodeKey::product(&requested.id);
    let targets = recommendations
        .iter()
        .map(|recommendation| NodeKey::product(&recommendation.product.id))
        .collect::<Vec<_>>();

    let mut paths = Vec::new();
    let mut seen_edges = HashSet::new();
    let mut edges = Vec::new();
    let mut node_order = IndexSet::new();

    for target in &targets {
        let Some(path) = shortest_path(graph, &root, target) else {
            debug!(
                event_name = "visualize.path_missing",
                requested = %root,
                target = %target,
                "no path between requested product and recommendation"
            );
            continue;
        };

        for pair in path.windows(2) {
            let (source, destination) = (&pair[0], &pair[1]);
            let normalized = if source <= destination {
                (source.clone(), destination.clone())
            } else {
                (destination.clone(), source.clone())
            };
            if !seen_edges.insert(normalized) {
                continue;
            }
            let edge_type = graph.edge_between(source, destination)?;
            node_order.insert(source.clone());
            node_order.insert(destination.clone());
            edges.push(PathEdge {
                source: source.clone(),
                target: destination.clone(),
                edge_type,
            });
        }
        paths.push(path);
    }

    if edges.is_empty() {
        return None;
    }

    let nodes = node_order
        .into_iter()
        .filter_map(|key| {
            let node = graph.node(&key)?;
            let role = if key == root {
                NodeRole::Requested
            } else if targets.contains(&key) {
                NodeRole::Recommended
            } else {
                NodeRole::Intermediate(node.kind())
            };
            Some(PathNode { name: node.display_name().to_string(), key, role })
        })
        .collect();

    Some(PathGraph {
        title: format!("Paths from '{}' to recommended items", requested.name),
        requested: root,
        nodes,
        edges,
        paths,
    })
}

fn escape_dot(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
