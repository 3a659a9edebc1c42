use rust_decimal::Decimal;
use serde::Serialize;

/// User constraints applied to the exact match and to every candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionFilters {
    pub max_price: Option<Decimal>,
    /// Kept in the order given; rendered in that order in explanations.
    pub required_tags: Vec<String>,
    pub preferred_brand: Option<String>,
}

impl SubstitutionFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_price(mut self, max_price: Decimal) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn with_required_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tags = tags
            .into_iter()
            .map(|tag| Into::<String>::into(tag).trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        self
    }

    pub fn with_preferred_brand(mut self, brand: impl Into<String>) -> Self {
        self.preferred_brand = Some(brand.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AlternativesRequest {
    pub product_name: String,
    pub filters: SubstitutionFilters,
    pub max_alternatives: usize,
}

impl AlternativesRequest {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            filters: SubstitutionFilters::default(),
            max_alternatives: super::DEFAULT_MAX_ALTERNATIVES,
        }
    }

    pub fn with_filters(mut self, filters: SubstitutionFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_max_alternatives(mut self, max: usize) -> Self {
        self.max_alternatives = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{AlternativesRequest, SubstitutionFilters};

    #[test]
    fn required_tags_are_trimmed_and_blank_entries_dropped() {
        let filters = SubstitutionFilters::new().with_required_tags([" vegan", "", "organic "]);

        assert_eq!(filters.required_tags, vec!["vegan".to_string(), "organic".to_string()]);
    }

    #[test]
    fn request_defaults_to_three_alternatives() {
        let request = AlternativesRequest::new("Toned Milk");

        assert_eq!(request.max_alternatives, 3);
        assert_eq!(request.filters, SubstitutionFilters::default());
    }
}
