use serde::{Deserialize, Serialize};

use super::product::Product;

/// Discrete reason code explaining part of a recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTag {
    ExactMatchAvailable,
    PreferredBrandRespected,
    SameBrandAsRequested,
    DifferentBrandThanRequested,
    AllRequiredTagsMatched,
    CheaperOption,
    SamePriceAsRequested,
    SlightlyMoreExpensive,
    SameCategory,
    SimilarCategory,
    CloserInGraph,
}

impl RuleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTag::ExactMatchAvailable => "exact_match_available",
            RuleTag::PreferredBrandRespected => "preferred_brand_respected",
            RuleTag::SameBrandAsRequested => "same_brand_as_requested",
            RuleTag::DifferentBrandThanRequested => "different_brand_than_requested",
            RuleTag::AllRequiredTagsMatched => "all_required_tags_matched",
            RuleTag::CheaperOption => "cheaper_option",
            RuleTag::SamePriceAsRequested => "same_price_as_requested",
            RuleTag::SlightlyMoreExpensive => "slightly_more_expensive",
            RuleTag::SameCategory => "same_category",
            RuleTag::SimilarCategory => "similar_category",
            RuleTag::CloserInGraph => "closer_in_graph",
        }
    }

    /// Human-readable sentence shown for this tag.
    pub fn sentence(&self) -> &'static str {
        match self {
            RuleTag::ExactMatchAvailable => "The exact item is in stock and matches your filters.",
            RuleTag::PreferredBrandRespected => "Matches your preferred brand.",
            RuleTag::SameBrandAsRequested => "Same brand as the requested product.",
            RuleTag::DifferentBrandThanRequested => "Different brand than the requested product.",
            RuleTag::AllRequiredTagsMatched => "Matches all required tags.",
            RuleTag::CheaperOption => "Cheaper than the requested product.",
            RuleTag::SamePriceAsRequested => "Same price as the requested product.",
            RuleTag::SlightlyMoreExpensive => "Slightly more expensive.",
            RuleTag::SameCategory => "Same category.",
            RuleTag::SimilarCategory => "Related category.",
            RuleTag::CloserInGraph => "Close to the requested item in the knowledge graph.",
        }
    }
}

/// Joins the sentence of every tag, in tag order, and lists the required tags
/// when they were requested and matched.
pub fn build_explanation(rule_tags: &[RuleTag], required_tags: &[String]) -> String {
    let mut parts = rule_tags.iter().map(|tag| tag.sentence().to_string()).collect::<Vec<_>>();
    if !required_tags.is_empty() && rule_tags.contains(&RuleTag::AllRequiredTagsMatched) {
        parts.push(format!("Required tags: {}.", required_tags.join(", ")));
    }
    parts.join(" ")
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub product: Product,
    pub score: f64,
    pub rule_tags: Vec<RuleTag>,
    pub explanation: String,
}

/// The requested product itself, when it passes every active filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExactMatch {
    pub product: Product,
    pub rule_tags: Vec<RuleTag>,
    pub explanation: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    NotFound,
    ExactWithAlternatives,
    ExactOnly,
    AlternativesFound,
    NoAlternatives,
}

impl ResultStatus {
    pub fn classify(exact_available: bool, alternatives_found: bool) -> Self {
        match (exact_available, alternatives_found) {
            (true, true) => ResultStatus::ExactWithAlternatives,
            (true, false) => ResultStatus::ExactOnly,
            (false, true) => ResultStatus::AlternativesFound,
            (false, false) => ResultStatus::NoAlternatives,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResultStatus::NotFound => "product not found",
            ResultStatus::ExactWithAlternatives => {
                "exact available, showing additional alternatives"
            }
            ResultStatus::ExactOnly => "exact available, no better alternatives",
            ResultStatus::AlternativesFound => "alternatives found",
            ResultStatus::NoAlternatives => "no alternatives found matching constraints",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlternativesResult {
    pub requested: Option<Product>,
    pub exact_match: Option<ExactMatch>,
    pub alternatives: Vec<Recommendation>,
    pub status: ResultStatus,
    pub message: String,
    pub traversed_nodes: usize,
}

impl AlternativesResult {
    pub fn not_found() -> Self {
        Self {
            requested: None,
            exact_match: None,
            alternatives: Vec::new(),
            status: ResultStatus::NotFound,
            message: ResultStatus::NotFound.message().to_string(),
            traversed_nodes: 0,
        }
    }
}
