use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::product::{Category, ProductId};

const CURATED_CATEGORY_LINKS: &[(Category, &[Category])] = &[
    (Category::Dairy, &[Category::Health, Category::Snacks]),
    (Category::Bakery, &[Category::Snacks, Category::Health]),
    (Category::Snacks, &[Category::Bakery, Category::Health]),
    (Category::Beverages, &[Category::Health]),
    (Category::Health, &[Category::Dairy, Category::Snacks, Category::Bakery, Category::Beverages]),
];

const CURATED_SIMILAR_PAIRS: &[(&str, &str)] = &[
    ("P001", "P003"),
    ("P002", "P026"),
    ("P009", "P011"),
    ("P012", "P028"),
    ("P015", "P016"),
    ("P018", "P019"),
    ("P021", "P022"),
    ("P023", "P024"),
    ("P027", "P028"),
    ("P029", "P026"),
];

/// Static similarity configuration: category adjacency and curated
/// product pairs that become `SIMILAR_TO` edges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimilarityConfig {
    category_links: BTreeMap<Category, Vec<Category>>,
    similar_pairs: Vec<(ProductId, ProductId)>,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self::curated()
    }
}

impl SimilarityConfig {
    pub fn curated() -> Self {
        let category_links = CURATED_CATEGORY_LINKS
            .iter()
            .map(|(category, related)| (*category, related.to_vec()))
            .collect();
        let similar_pairs = CURATED_SIMILAR_PAIRS
            .iter()
            .map(|(left, right)| (ProductId::new(*left), ProductId::new(*right)))
            .collect();

        Self { category_links, similar_pairs }
    }

    /// Builds a table from explicit parts. Categories absent from
    /// `category_links` get an empty related list.
    pub fn new(
        category_links: BTreeMap<Category, Vec<Category>>,
        similar_pairs: Vec<(ProductId, ProductId)>,
    ) -> Self {
        let mut category_links = category_links;
        for category in Category::ALL {
            category_links.entry(category).or_default();
        }
        Self { category_links, similar_pairs }
    }

    pub fn related_categories(&self, category: Category) -> &[Category] {
        self.category_links.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_related(&self, source: Category, target: Category) -> bool {
        self.related_categories(source).contains(&target)
    }

    pub fn similar_pairs(&self) -> &[(ProductId, ProductId)] {
        &self.similar_pairs
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::SimilarityConfig;
    use crate::domain::product::{Category, ProductId};

    #[test]
    fn curated_table_covers_every_category() {
        let config = SimilarityConfig::curated();

        for category in Category::ALL {
            assert!(
                !config.related_categories(category).is_empty(),
                "{category} should have related categories"
            );
        }
        assert_eq!(config.similar_pairs().len(), 10);
    }

    #[test]
    fn relatedness_is_asymmetric() {
        let config = SimilarityConfig::curated();

        assert!(config.is_related(Category::Health, Category::Beverages));
        assert!(config.is_related(Category::Beverages, Category::Health));
        assert!(config.is_related(Category::Health, Category::Dairy));
        assert!(!config.is_related(Category::Beverages, Category::Dairy));
        assert!(!config.is_related(Category::Dairy, Category::Dairy));
    }

    #[test]
    fn explicit_table_fills_missing_categories() {
        let mut links = BTreeMap::new();
        links.insert(Category::Dairy, vec![Category::Health]);
        let config = SimilarityConfig::new(
            links,
            vec![(ProductId::new("A"), ProductId::new("B"))],
        );

        assert_eq!(config.related_categories(Category::Dairy), &[Category::Health]);
        assert!(config.related_categories(Category::Bakery).is_empty());
    }
}
