//! Recommendation assembly

use std::cmp::Ordering;

use tracing::info;

use super::candidates::find_candidates;
use super::request::AlternativesRequest;
use super::scoring::ScoreCalculator;
use crate::catalog::Catalog;
use crate::domain::recommendation::{
    build_explanation, AlternativesResult, ExactMatch, Recommendation, ResultStatus,
};
use crate::errors::DomainError;
use crate::graph::KnowledgeGraph;

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    calculator: ScoreCalculator,
    max_depth: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(ScoreCalculator::default())
    }
}

impl RecommendationEngine {
    pub fn new(calculator: ScoreCalculator) -> Self {
        Self { calculator, max_depth: super::DEFAULT_MAX_DEPTH }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolves the requested product, checks it as an exact match, then
    /// ranks scored graph neighbors. A missing product is a `NotFound`
    /// result, not an error; errors signal a catalog/graph mismatch.
    pub fn find_alternatives(
        &self,
        catalog: &Catalog,
        graph: &KnowledgeGraph,
        request: &AlternativesRequest,
    ) -> Result<AlternativesResult, DomainError> {
        let Some(requested) = catalog.find_by_name(&request.product_name) else {
            info!(
                event_name = "reasoning.product_not_found",
                product_name = %request.product_name,
                "requested product is not in the catalog"
            );
            return Ok(AlternativesResult::not_found());
        };
        let filters = &request.filters;

        let exact_match =
            self.calculator.exact_match_tags(requested, filters).map(|rule_tags| ExactMatch {
                product: requested.clone(),
                explanation: build_explanation(&rule_tags, &filters.required_tags),
                rule_tags,
            });

        let search = find_candidates(graph, &requested.id, self.max_depth)?;

        let mut scored = Vec::with_capacity(search.candidates.len());
        for (product_id, depth) in &search.candidates {
            let candidate = catalog.find(product_id).ok_or_else(|| {
                DomainError::InvariantViolation(format!(
                    "graph node `{product_id}` has no catalog record"
                ))
            })?;
            let Some(candidate_score) = self.calculator.score(requested, candidate, *depth, filters)
            else {
                continue;
            };
            scored.push(Recommendation {
                product: candidate.clone(),
                score: candidate_score.score,
                explanation: build_explanation(&candidate_score.rule_tags, &filters.required_tags),
                rule_tags: candidate_score.rule_tags,
            });
        }

        // Stable: equal scores keep discovery order.
        scored.sort_by(|left, right| {
            right.score.partial_cmp(&left.score).unwrap_or(Ordering::Equal)
        });
        scored.truncate(request.max_alternatives);

        let status = ResultStatus::classify(exact_match.is_some(), !scored.is_empty());
        info!(
            event_name = "reasoning.alternatives.resolved",
            product_id = %requested.id,
            status = ?status,
            exact_match = exact_match.is_some(),
            alternatives = scored.len(),
            traversed_nodes = search.nodes_visited,
            "substitution query resolved"
        );

        Ok(AlternativesResult {
            requested: Some(requested.clone()),
            exact_match,
            alternatives: scored,
            status,
            message: status.message().to_string(),
            traversed_nodes: search.nodes_visited,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::RecommendationEngine;
    use crate::catalog::Catalog;
    use crate::domain::product::{Category, Product, ProductId};
    use crate::domain::recommendation::{ResultStatus, RuleTag};
    use crate::graph::KnowledgeGraphBuilder;
    use crate::reasoning::{AlternativesRequest, SubstitutionFilters};

    #[test]
    fn unknown_product_name_is_not_found() {
        let (catalog, graph) = fixture(products());

        let result = RecommendationEngine::default()
            .find_alternatives(&catalog, &graph, &AlternativesRequest::new("Unicorn Milk"))
            .expect("query succeeds");

        assert_eq!(result.status, ResultStatus::NotFound);
        assert!(result.requested.is_none());
        assert!(result.exact_match.is_none());
        assert!(result.alternatives.is_empty());
        assert_eq!(result.traversed_nodes, 0);
    }

    #[test]
    fn ranks_by_score_and_caps_alternatives() {
        let (catalog, graph) = fixture(products());

        let result = RecommendationEngine::default()
            .find_alternatives(
                &catalog,
                &graph,
                &AlternativesRequest::new("Toned Milk").with_max_alternatives(2),
            )
            .expect("query succeeds");

        assert_eq!(result.alternatives.len(), 2);
        assert!(result.alternatives[0].score >= result.alternatives[1].score);
        assert_eq!(result.alternatives[0].product.id, ProductId::new("P003"));
        assert_eq!(result.status, ResultStatus::ExactWithAlternatives);
        assert!(result.traversed_nodes > 0);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let (catalog, graph) = fixture(vec![
            product("R", "Requested", Category::Snacks, "Brand", 20),
            product("T1", "Twin One", Category::Snacks, "Brand", 20),
            product("T2", "Twin Two", Category::Snacks, "Brand", 20),
        ]);

        let result = RecommendationEngine::default()
            .find_alternatives(&catalog, &graph, &AlternativesRequest::new("Requested"))
            .expect("query succeeds");

        let ids = result.alternatives.iter().map(|rec| rec.product.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["T1", "T2"]);
        assert_eq!(result.alternatives[0].score, result.alternatives[1].score);
    }

    #[test]
    fn exact_match_is_reported_without_alternatives() {
        let (catalog, graph) =
            fixture(vec![product("S1", "Solo Chips", Category::Snacks, "Crunch", 20)]);

        let result = RecommendationEngine::default()
            .find_alternatives(&catalog, &graph, &AlternativesRequest::new("Solo Chips"))
            .expect("query succeeds");

        let exact = result.exact_match.expect("exact match populated");
        assert_eq!(exact.rule_tags, vec![RuleTag::ExactMatchAvailable]);
        assert_eq!(exact.explanation, "The exact item is in stock and matches your filters.");
        assert!(result.alternatives.is_empty());
        assert_eq!(result.message, "exact available, no better alternatives");
    }

    #[test]
    fn filters_propagate_to_explanations() {
        let (catalog, graph) = fixture(products());
        let filters = SubstitutionFilters::new().with_required_tags(["milk"]);

        let result = RecommendationEngine::default()
            .find_alternatives(
                &catalog,
                &graph,
                &AlternativesRequest::new("Toned Milk").with_filters(filters),
            )
            .expect("query succeeds");

        assert!(!result.alternatives.is_empty());
        for recommendation in &result.alternatives {
            assert!(recommendation.product.tags.contains("milk"));
            assert!(recommendation.explanation.ends_with("Required tags: milk."));
        }
    }

    #[test]
    fn depth_limit_is_configurable() {
        let (catalog, graph) = fixture(products());

        let result = RecommendationEngine::default()
            .with_max_depth(1)
            .find_alternatives(&catalog, &graph, &AlternativesRequest::new("Toned Milk"))
            .expect("query succeeds");

        let ids = result.alternatives.iter().map(|rec| rec.product.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["P003"]);
    }

    fn fixture(products: Vec<Product>) -> (Catalog, crate::graph::KnowledgeGraph) {
        let graph = KnowledgeGraphBuilder::default().build(&products);
        let catalog = Catalog::new(products).expect("valid catalog");
        (catalog, graph)
    }

    fn products() -> Vec<Product> {
        vec![
            product("P001", "Toned Milk", Category::Dairy, "Amul", 27).with_tags(["milk"]),
            product("P003", "Cow Milk", Category::Dairy, "Amul", 26).with_tags(["milk"]),
            product("P004", "Buffalo Milk", Category::Dairy, "Heritage", 35).with_tags(["milk"]),
            product("P005", "Paneer", Category::Dairy, "Gowardhan", 90),
            product("P006", "Protein Bar", Category::Health, "Yoga Bar", 60),
        ]
    }

    fn product(id: &str, name: &str, category: Category, brand: &str, price: i64) -> Product {
        Product::new(id, name, category, brand, Decimal::new(price, 0))
    }
}
