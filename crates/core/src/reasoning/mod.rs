//! Substitute recommendation over the knowledge graph.
//!
//! Bounded breadth-first search collects candidate products around the
//! requested one, the score calculator applies hard filters and additive
//! rules, and the engine assembles a ranked, explained result.

mod candidates;
mod engine;
mod request;
mod scoring;

pub use candidates::{find_candidates, CandidateSearch};
pub use engine::RecommendationEngine;
pub use request::{AlternativesRequest, SubstitutionFilters};
pub use scoring::{ScoreCalculator, ScoredCandidate, ScoringWeights};

/// Default rule weights.
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    category: 4.0,
    related_category_closeness: 0.7,
    preferred_brand_bonus: 3.0,
    preferred_brand_penalty: 0.5,
    same_brand_bonus: 2.0,
    cheaper_bonus: 1.0,
    same_price_bonus: 0.5,
    pricier_penalty: 0.2,
    proximity_step: 0.5,
    proximity_horizon: 3,
};

/// BFS depth used when gathering candidates.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Alternatives returned per query.
pub const DEFAULT_MAX_ALTERNATIVES: usize = 3;
