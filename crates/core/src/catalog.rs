use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;

use crate::domain::product::{Category, Product, ProductId};
use crate::errors::CatalogError;

/// Validated, immutable product records with id and name lookups.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut by_name = HashMap::with_capacity(products.len());

        for (index, product) in products.iter().enumerate() {
            validate_product(product)?;
            if by_id.insert(product.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateProductId(product.id.clone()));
            }
            if by_name.insert(product.name.clone(), index).is_some() {
                return Err(CatalogError::DuplicateProductName(product.name.clone()));
            }
        }

        Ok(Self { products, by_id, by_name })
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.by_id.get(product_id).map(|index| &self.products[*index])
    }

    /// Exact, case-sensitive name match.
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.by_name.get(name).map(|index| &self.products[*index])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Categories that have at least one product, sorted by name.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = self
            .products
            .iter()
            .map(|product| product.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        categories.sort_by_key(|category| category.as_str());
        categories
    }

    pub fn product_names_in_category(&self, category: Category) -> Vec<String> {
        let mut names = self
            .products
            .iter()
            .filter(|product| product.category == category)
            .map(|product| product.name.clone())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    pub fn brands(&self) -> BTreeSet<String> {
        self.products.iter().map(|product| product.brand.clone()).collect()
    }

    pub fn tags(&self) -> BTreeSet<String> {
        self.products.iter().flat_map(|product| product.tags.iter().cloned()).collect()
    }
}

fn validate_product(product: &Product) -> Result<(), CatalogError> {
    if product.id.0.trim().is_empty() {
        return Err(CatalogError::EmptyField { id: product.id.clone(), field: "product_id" });
    }
    if product.name.trim().is_empty() {
        return Err(CatalogError::EmptyField { id: product.id.clone(), field: "name" });
    }
    if product.brand.trim().is_empty() {
        return Err(CatalogError::EmptyField { id: product.id.clone(), field: "brand" });
    }
    if product.price < Decimal::ZERO {
        return Err(CatalogError::NegativePrice { id: product.id.clone(), price: product.price });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::Catalog;
    use crate::domain::product::{Category, Product, ProductId};
    use crate::errors::CatalogError;

    #[test]
    fn looks_up_products_by_id_and_name() {
        let catalog = Catalog::new(products()).expect("valid catalog");

        let by_id = catalog.find(&ProductId::new("P002")).expect("P002 present");
        let by_name = catalog.find_by_name("Brown Bread").expect("name present");

        assert_eq!(by_id, by_name);
        assert!(catalog.find_by_name("brown bread").is_none());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn lists_categories_and_names_sorted() {
        let catalog = Catalog::new(products()).expect("valid catalog");

        assert_eq!(catalog.categories(), vec![Category::Bakery, Category::Dairy]);
        assert_eq!(
            catalog.product_names_in_category(Category::Dairy),
            vec!["Cow Milk".to_string(), "Toned Milk".to_string()]
        );
        assert!(catalog.product_names_in_category(Category::Health).is_empty());
    }

    #[test]
    fn orders_categories_alphabetically_not_by_declaration() {
        let products = Category::ALL
            .iter()
            .enumerate()
            .map(|(index, category)| {
                product(&format!("P10{index}"), &format!("Item {index}"), *category, 10)
            })
            .collect();
        let catalog = Catalog::new(products).expect("valid catalog");

        let names = catalog.categories().iter().map(Category::as_str).collect::<Vec<_>>();
        assert_eq!(names, vec!["Bakery", "Beverages", "Dairy", "Health", "Snacks"]);
    }

    #[test]
    fn rejects_duplicate_ids_and_names() {
        let mut duplicated_id = products();
        duplicated_id.push(product("P001", "Another Milk", Category::Dairy, 30));
        assert_eq!(
            Catalog::new(duplicated_id).err(),
            Some(CatalogError::DuplicateProductId(ProductId::new("P001")))
        );

        let mut duplicated_name = products();
        duplicated_name.push(product("P099", "Cow Milk", Category::Dairy, 30));
        assert_eq!(
            Catalog::new(duplicated_name).err(),
            Some(CatalogError::DuplicateProductName("Cow Milk".to_string()))
        );
    }

    #[test]
    fn rejects_negative_prices() {
        let result = Catalog::new(vec![product("P1", "Refund", Category::Snacks, -1)]);

        assert!(matches!(result, Err(CatalogError::NegativePrice { .. })));
    }

    fn products() -> Vec<Product> {
        vec![
            product("P001", "Toned Milk", Category::Dairy, 27),
            product("P002", "Brown Bread", Category::Bakery, 45),
            product("P003", "Cow Milk", Category::Dairy, 30),
        ]
    }

    fn product(id: &str, name: &str, category: Category, price: i64) -> Product {
        Product::new(id, name, category, "Acme", Decimal::new(price, 0))
    }
}
