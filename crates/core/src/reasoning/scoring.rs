//! Rule-based scoring for substitute candidates

use std::cmp::Ordering;

use super::request::SubstitutionFilters;
use crate::domain::product::{Category, Product};
use crate::domain::recommendation::RuleTag;
use crate::graph::SimilarityConfig;

/// Weights for the additive scoring rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Multiplied by category closeness (default: 4.0)
    pub category: f64,
    /// Closeness of a related, non-identical category (default: 0.7)
    pub related_category_closeness: f64,
    /// Candidate carries the preferred brand (default: 3.0)
    pub preferred_brand_bonus: f64,
    /// Subtracted when a preferred brand is not met (default: 0.5)
    pub preferred_brand_penalty: f64,
    /// Same brand as the requested product, no preference given (default: 2.0)
    pub same_brand_bonus: f64,
    pub cheaper_bonus: f64,
    pub same_price_bonus: f64,
    pub pricier_penalty: f64,
    /// Bonus per hop inside the proximity horizon (default: 0.5)
    pub proximity_step: f64,
    /// Depth at which the proximity bonus reaches zero (default: 3)
    pub proximity_horizon: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub score: f64,
    pub rule_tags: Vec<RuleTag>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
    similarity: SimilarityConfig,
}

impl ScoreCalculator {
    pub fn new(similarity: SimilarityConfig) -> Self {
        Self { weights: ScoringWeights::default(), similarity }
    }

    /// 1.0 for the same category, the related closeness when `target` is
    /// listed for `source`, otherwise 0.0.
    pub fn category_closeness(&self, source: Category, target: Category) -> f64 {
        if source == target {
            1.0
        } else if self.similarity.is_related(source, target) {
            self.weights.related_category_closeness
        } else {
            0.0
        }
    }

    pub fn proximity_bonus(&self, depth: usize) -> f64 {
        self.weights.proximity_horizon.saturating_sub(depth) as f64 * self.weights.proximity_step
    }

    /// Stock, price ceiling and required tags. Brand preference is a scoring
    /// rule for candidates, not a filter.
    pub fn passes_filters(&self, candidate: &Product, filters: &SubstitutionFilters) -> bool {
        if !candidate.in_stock {
            return false;
        }
        if filters.max_price.is_some_and(|max_price| candidate.price > max_price) {
            return false;
        }
        candidate.has_all_tags(&filters.required_tags)
    }

    /// Returns `None` when the candidate fails a hard filter.
    pub fn score(
        &self,
        requested: &Product,
        candidate: &Product,
        depth: usize,
        filters: &SubstitutionFilters,
    ) -> Option<ScoredCandidate> {
        if !self.passes_filters(candidate, filters) {
            return None;
        }

        let mut score = 0.0;
        let mut rule_tags = Vec::new();

        let closeness = self.category_closeness(requested.category, candidate.category);
        score += closeness * self.weights.category;
        if closeness >= 1.0 {
            rule_tags.push(RuleTag::SameCategory);
        } else if closeness > 0.0 {
            rule_tags.push(RuleTag::SimilarCategory);
        }

        match filters.preferred_brand.as_deref() {
            Some(preferred) if candidate.brand == preferred => {
                score += self.weights.preferred_brand_bonus;
                rule_tags.push(RuleTag::PreferredBrandRespected);
            }
            Some(_) => {
                score -= self.weights.preferred_brand_penalty;
                rule_tags.push(RuleTag::DifferentBrandThanRequested);
            }
            None if candidate.brand == requested.brand => {
                score += self.weights.same_brand_bonus;
                rule_tags.push(RuleTag::SameBrandAsRequested);
            }
            None => rule_tags.push(RuleTag::DifferentBrandThanRequested),
        }

        match candidate.price.cmp(&requested.price) {
            Ordering::Less => {
                score += self.weights.cheaper_bonus;
                rule_tags.push(RuleTag::CheaperOption);
            }
            Ordering::Equal => {
                score += self.weights.same_price_bonus;
                rule_tags.push(RuleTag::SamePriceAsRequested);
            }
            Ordering::Greater => {
                score -= self.weights.pricier_penalty;
                rule_tags.push(RuleTag::SlightlyMoreExpensive);
            }
        }

        score += self.proximity_bonus(depth);
        rule_tags.push(RuleTag::CloserInGraph);

        if !filters.required_tags.is_empty() {
            rule_tags.push(RuleTag::AllRequiredTagsMatched);
        }

        Some(ScoredCandidate { score, rule_tags })
    }

    /// Tags for the requested product itself, or `None` when it fails any
    /// active filter, brand preference included.
    pub fn exact_match_tags(
        &self,
        requested: &Product,
        filters: &SubstitutionFilters,
    ) -> Option<Vec<RuleTag>> {
        if filters.preferred_brand.as_deref().is_some_and(|preferred| requested.brand != preferred)
        {
            return None;
        }
        if !self.passes_filters(requested, filters) {
            return None;
        }

        let mut tags = vec![RuleTag::ExactMatchAvailable];
        if filters.preferred_brand.is_some() {
            tags.push(RuleTag::PreferredBrandRespected);
        }
        if !filters.required_tags.is_empty() {
            tags.push(RuleTag::AllRequiredTagsMatched);
        }
        Some(tags)
    }
}
