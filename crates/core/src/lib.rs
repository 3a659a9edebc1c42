pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod loader;
pub mod reasoning;
pub mod service;
pub mod visualize;

pub use catalog::Catalog;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::product::{Category, Product, ProductId};
pub use domain::recommendation::{
    AlternativesResult, ExactMatch, Recommendation, ResultStatus, RuleTag,
};
pub use errors::{ApplicationError, CatalogError, DomainError};
pub use graph::{
    EdgeType, GraphEdge, GraphNode, KnowledgeGraph, KnowledgeGraphBuilder, NodeKey, NodeKind,
    SimilarityConfig,
};
pub use loader::{load_products, load_similarity, LoadError};
pub use reasoning::{AlternativesRequest, RecommendationEngine, SubstitutionFilters};
pub use service::{ServiceSettings, ShopkeeperService};
pub use visualize::{NodeRole, PathGraph, PathNode};
