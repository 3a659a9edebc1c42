use std::collections::BTreeSet;

use tracing::{debug, info};

use super::{EdgeType, GraphNode, KnowledgeGraph, NodeKey, NodeKind, SimilarityConfig};
use crate::domain::product::{Category, Product};

#[derive(Clone, Debug, Default)]
pub struct KnowledgeGraphBuilder {
    similarity: SimilarityConfig,
}

impl KnowledgeGraphBuilder {
    pub fn new(similarity: SimilarityConfig) -> Self {
        Self { similarity }
    }

    /// Builds the full graph from scratch. Identical inputs always produce
    /// identical node and edge sets.
    pub fn build(&self, products: &[Product]) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();

        for category in Category::ALL {
            graph.add_node(GraphNode::Category { category });
        }

        let brands = products.iter().map(|product| product.brand.as_str()).collect::<BTreeSet<_>>();
        for brand in brands {
            graph.add_node(GraphNode::Brand { name: brand.to_string() });
        }

        let tags = products
            .iter()
            .flat_map(|product| product.tags.iter().map(String::as_str))
            .collect::<BTreeSet<_>>();
        for tag in tags {
            graph.add_node(GraphNode::Attribute { name: tag.to_string() });
        }

        for product in products {
            let product_key = graph
                .add_node(GraphNode::Product { id: product.id.clone(), name: product.name.clone() });
            graph.add_edge(&product_key, &NodeKey::category(product.category), EdgeType::IsA);
            graph.add_edge(&product_key, &NodeKey::brand(&product.brand), EdgeType::HasBrand);
            for tag in &product.tags {
                graph.add_edge(&product_key, &NodeKey::attribute(tag), EdgeType::HasAttribute);
            }
        }

        let mut skipped_pairs = 0usize;
        for (left, right) in self.similarity.similar_pairs() {
            let left_key = NodeKey::product(left);
            let right_key = NodeKey::product(right);
            if !graph.contains(&left_key) || !graph.contains(&right_key) {
                skipped_pairs += 1;
                debug!(
                    event_name = "graph.similar_pair_skipped",
                    left = %left,
                    right = %right,
                    "similarity pair references a product outside the catalog"
                );
                continue;
            }
            graph.add_edge(&left_key, &right_key, EdgeType::SimilarTo);
        }

        info!(
            event_name = "graph.built",
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            products = graph.count_kind(NodeKind::Product),
            skipped_pairs,
            "knowledge graph built"
        );

        graph
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::KnowledgeGraphBuilder;
    use crate::domain::product::{Category, Product, ProductId};
    use crate::graph::{EdgeType, NodeKey, NodeKind};

    #[test]
    fn builds_one_node_per_distinct_value() {
        let graph = KnowledgeGraphBuilder::default().build(&products());

        assert_eq!(graph.count_kind(NodeKind::Category), Category::ALL.len());
        assert_eq!(graph.count_kind(NodeKind::Brand), 2);
        assert_eq!(graph.count_kind(NodeKind::Attribute), 3);
        assert_eq!(graph.count_kind(NodeKind::Product), 4);
        assert_eq!(graph.node_count(), 5 + 2 + 3 + 4);
    }

    #[test]
    fn every_product_has_exactly_one_is_a_edge_to_its_category() {
        let products = products();
        let graph = KnowledgeGraphBuilder::default().build(&products);

        for product in &products {
            let key = NodeKey::product(&product.id);
            let is_a = graph
                .edges()
                .iter()
                .filter(|edge| edge.edge_type == EdgeType::IsA)
                .filter(|edge| edge.source == key || edge.target == key)
                .collect::<Vec<_>>();

            assert_eq!(is_a.len(), 1, "{} should have one IS_A edge", product.id);
            assert_eq!(is_a[0].target, NodeKey::category(product.category));
        }
    }

    #[test]
    fn similar_pairs_outside_catalog_are_skipped() {
        let graph = KnowledgeGraphBuilder::default().build(&products());

        let p001 = NodeKey::product(&ProductId::new("P001"));
        let p003 = NodeKey::product(&ProductId::new("P003"));
        let p002 = NodeKey::product(&ProductId::new("P002"));

        assert_eq!(graph.edge_between(&p001, &p003), Some(EdgeType::SimilarTo));
        // P002 pairs with P026, which is not in this catalog.
        assert!(graph.neighbors(&p002).all(|neighbor| !neighbor.as_str().starts_with("product:")));
        let similar_edges =
            graph.edges().iter().filter(|edge| edge.edge_type == EdgeType::SimilarTo).count();
        assert_eq!(similar_edges, 1);
    }

    #[test]
    fn category_nodes_exist_without_products() {
        let graph = KnowledgeGraphBuilder::default().build(&[]);

        assert_eq!(graph.node_count(), Category::ALL.len());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn rebuilding_produces_identical_node_and_edge_sets() {
        let builder = KnowledgeGraphBuilder::default();
        let mut reversed = products();
        reversed.reverse();

        let first = builder.build(&products());
        let second = builder.build(&products());
        let reordered = builder.build(&reversed);

        assert_eq!(first.node_keys(), second.node_keys());
        assert_eq!(first.edge_set(), second.edge_set());
        assert_eq!(first.node_keys(), reordered.node_keys());
        assert_eq!(first.edge_set(), reordered.edge_set());
    }

    fn products() -> Vec<Product> {
        vec![
            Product::new("P001", "Toned Milk", Category::Dairy, "Amul", Decimal::new(27, 0))
                .with_tags(["milk", "toned"]),
            Product::new("P002", "Brown Bread", Category::Bakery, "Modern", Decimal::new(45, 0))
                .with_tags(["whole_wheat"]),
            Product::new("P003", "Cow Milk", Category::Dairy, "Amul", Decimal::new(30, 0))
                .with_tags(["milk"]),
            Product::new("P004", "Milk Bread", Category::Bakery, "Modern", Decimal::new(40, 0)),
        ]
    }
}
