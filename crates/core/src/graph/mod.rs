//! Typed, undirected knowledge graph over products and their category,
//! brand and attribute hubs.
//!
//! Nodes are addressed everywhere by a namespaced [`NodeKey`]; the graph
//! owns nodes in insertion order and keeps an adjacency list per key.

mod builder;
mod similarity;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Category, ProductId};

pub use builder::KnowledgeGraphBuilder;
pub use similarity::SimilarityConfig;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn product(product_id: &ProductId) -> Self {
        Self(format!("product:{}", product_id.0))
    }

    pub fn category(category: Category) -> Self {
        Self(format!("category:{category}"))
    }

    pub fn brand(brand: &str) -> Self {
        Self(format!("brand:{brand}"))
    }

    pub fn attribute(tag: &str) -> Self {
        Self(format!("attr:{tag}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Product,
    Category,
    Brand,
    Attribute,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphNode {
    Product { id: ProductId, name: String },
    Category { category: Category },
    Brand { name: String },
    Attribute { name: String },
}

impl GraphNode {
    pub fn key(&self) -> NodeKey {
        match self {
            GraphNode::Product { id, .. } => NodeKey::product(id),
            GraphNode::Category { category } => NodeKey::category(*category),
            GraphNode::Brand { name } => NodeKey::brand(name),
            GraphNode::Attribute { name } => NodeKey::attribute(name),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            GraphNode::Product { .. } => NodeKind::Product,
            GraphNode::Category { .. } => NodeKind::Category,
            GraphNode::Brand { .. } => NodeKind::Brand,
            GraphNode::Attribute { .. } => NodeKind::Attribute,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            GraphNode::Product { name, .. } => name,
            GraphNode::Category { category } => category.as_str(),
            GraphNode::Brand { name } | GraphNode::Attribute { name } => name,
        }
    }

    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            GraphNode::Product { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Relation carried by an edge. Metadata only: traversal treats every edge
/// as unit distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    IsA,
    HasBrand,
    HasAttribute,
    SimilarTo,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::IsA => "IS_A",
            EdgeType::HasBrand => "HAS_BRAND",
            EdgeType::HasAttribute => "HAS_ATTRIBUTE",
            EdgeType::SimilarTo => "SIMILAR_TO",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: NodeKey,
    pub target: NodeKey,
    pub edge_type: EdgeType,
}

#[derive(Clone, Debug, Default)]
pub struct KnowledgeGraph {
    nodes: IndexMap<NodeKey, GraphNode>,
    adjacency: HashMap<NodeKey, Vec<(NodeKey, EdgeType)>>,
    edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` unless a node with the same key exists. Returns the key.
    pub fn add_node(&mut self, node: GraphNode) -> NodeKey {
        let key = node.key();
        if !self.nodes.contains_key(&key) {
            self.adjacency.entry(key.clone()).or_default();
            self.nodes.insert(key.clone(), node);
        }
        key
    }

    /// Connects two existing, distinct nodes. Returns `false` when either
    /// endpoint is missing, the edge is a self loop, or the pair is already
    /// connected.
    pub fn add_edge(&mut self, source: &NodeKey, target: &NodeKey, edge_type: EdgeType) -> bool {
        if source == target || !self.contains(source) || !self.contains(target) {
            return false;
        }
        if self.edge_between(source, target).is_some() {
            return false;
        }

        self.adjacency.entry(source.clone()).or_default().push((target.clone(), edge_type));
        self.adjacency.entry(target.clone()).or_default().push((source.clone(), edge_type));
        self.edges.push(GraphEdge { source: source.clone(), target: target.clone(), edge_type });
        true
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node(&self, key: &NodeKey) -> Option<&GraphNode> {
        self.nodes.get(key)
    }

    /// Neighbors in edge insertion order.
    pub fn neighbors<'a>(&'a self, key: &NodeKey) -> impl Iterator<Item = &'a NodeKey> + 'a {
        self.adjacency.get(key).into_iter().flatten().map(|(neighbor, _)| neighbor)
    }

    pub fn edge_between(&self, source: &NodeKey, target: &NodeKey) -> Option<EdgeType> {
        self.adjacency
            .get(source)?
            .iter()
            .find(|(neighbor, _)| neighbor == target)
            .map(|(_, edge_type)| *edge_type)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|node| node.kind() == kind).count()
    }

    /// Order-independent view of the node set.
    pub fn node_keys(&self) -> BTreeSet<NodeKey> {
        self.nodes.keys().cloned().collect()
    }

    /// Order-independent view of the edge set, endpoints normalized so that
    /// the smaller key comes first.
    pub fn edge_set(&self) -> BTreeSet<(NodeKey, NodeKey, EdgeType)> {
        self.edges
            .iter()
            .map(|edge| {
                let (low, high) = if edge.source <= edge.target {
                    (edge.source.clone(), edge.target.clone())
                } else {
                    (edge.target.clone(), edge.source.clone())
                };
                (low, high, edge.edge_type)
            })
            .collect()
    }
}
