//! Application context holding the catalog, its knowledge graph and the
//! recommendation engine for the lifetime of a session.

use std::collections::BTreeSet;

use tracing::info;

use crate::catalog::Catalog;
use crate::config::{AppConfig, RecommendationConfig};
use crate::domain::product::{Category, Product};
use crate::domain::recommendation::AlternativesResult;
use crate::errors::{ApplicationError, CatalogError, DomainError};
use crate::graph::{KnowledgeGraph, KnowledgeGraphBuilder, SimilarityConfig};
use crate::loader::{load_products, load_similarity};
use crate::reasoning::{
    AlternativesRequest, RecommendationEngine, ScoreCalculator, DEFAULT_MAX_ALTERNATIVES,
    DEFAULT_MAX_DEPTH,
};
use crate::visualize::{self, PathGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub max_depth: usize,
    pub max_alternatives: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, max_alternatives: DEFAULT_MAX_ALTERNATIVES }
    }
}

impl From<&RecommendationConfig> for ServiceSettings {
    fn from(config: &RecommendationConfig) -> Self {
        Self { max_depth: config.max_depth, max_alternatives: config.max_alternatives }
    }
}

#[derive(Debug)]
pub struct ShopkeeperService {
    catalog: Catalog,
    graph: KnowledgeGraph,
    builder: KnowledgeGraphBuilder,
    engine: RecommendationEngine,
    settings: ServiceSettings,
}

impl ShopkeeperService {
    pub fn new(
        products: Vec<Product>,
        similarity: SimilarityConfig,
        settings: ServiceSettings,
    ) -> Result<Self, CatalogError> {
        let builder = KnowledgeGraphBuilder::new(similarity.clone());
        let engine = RecommendationEngine::new(ScoreCalculator::new(similarity))
            .with_max_depth(settings.max_depth);
        let graph = builder.build(&products);
        let catalog = Catalog::new(products)?;

        Ok(Self { catalog, graph, builder, engine, settings })
    }

    /// Loads the catalog and optional similarity table named by `config`.
    /// Without a similarity path the curated tables are used.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        let products = load_products(&config.catalog.products_path)?;
        let similarity = match config.catalog.similarity_path.as_deref() {
            Some(path) => load_similarity(path)?,
            None => SimilarityConfig::curated(),
        };

        Ok(Self::new(products, similarity, ServiceSettings::from(&config.recommendation))?)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn settings(&self) -> ServiceSettings {
        self.settings
    }

    pub fn list_categories(&self) -> Vec<Category> {
        self.catalog.categories()
    }

    pub fn list_products_in_category(&self, category: Category) -> Vec<String> {
        self.catalog.product_names_in_category(category)
    }

    pub fn list_brands(&self) -> BTreeSet<String> {
        self.catalog.brands()
    }

    pub fn list_tags(&self) -> BTreeSet<String> {
        self.catalog.tags()
    }

    /// Request for `product_name` capped at the configured number of
    /// alternatives.
    pub fn request(&self, product_name: impl Into<String>) -> AlternativesRequest {
        AlternativesRequest::new(product_name).with_max_alternatives(self.settings.max_alternatives)
    }

    pub fn find_alternatives(
        &self,
        request: &AlternativesRequest,
    ) -> Result<AlternativesResult, DomainError> {
        self.engine.find_alternatives(&self.catalog, &self.graph, request)
    }

    pub fn visualize_paths(&self, result: &AlternativesResult) -> Option<PathGraph> {
        let requested = result.requested.as_ref()?;
        visualize::visualize_paths(&self.graph, requested, &result.alternatives)
    }

    /// Replaces the catalog and rebuilds the graph from scratch. On a
    /// validation failure the previous state is kept.
    pub fn reload(&mut self, products: Vec<Product>) -> Result<(), CatalogError> {
        let graph = self.builder.build(&products);
        let catalog = Catalog::new(products)?;

        self.graph = graph;
        self.catalog = catalog;
        info!(
            event_name = "catalog.reloaded",
            products = self.catalog.len(),
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "catalog reloaded and graph rebuilt"
        );
        Ok(())
    }
}
