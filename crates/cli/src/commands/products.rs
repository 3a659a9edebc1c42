use serde::Serialize;
use shopkeeper_core::config::LoadOptions;
use shopkeeper_core::Category;

use crate::commands::{load_service, CommandResult};

#[derive(Debug, Serialize)]
struct CategoryProducts {
    category: Category,
    products: Vec<String>,
}

/// Product names grouped by category, optionally narrowed to one category.
pub fn run(options: &LoadOptions, category: Option<&str>) -> CommandResult {
    let category = match category.map(str::parse::<Category>).transpose() {
        Ok(category) => category,
        Err(error) => return CommandResult::invalid_request("products", error.to_string()),
    };

    let service = match load_service(options) {
        Ok(service) => service,
        Err(error) => return CommandResult::from_error("products", &error),
    };

    let categories = match category {
        Some(category) => vec![category],
        None => service.list_categories(),
    };
    let listing = categories
        .into_iter()
        .map(|category| CategoryProducts {
            category,
            products: service.list_products_in_category(category),
        })
        .collect::<Vec<_>>();

    match serde_json::to_string_pretty(&listing) {
        Ok(output) => CommandResult::rendered(output),
        Err(error) => CommandResult::failure("products", "serialization", error.to_string(), 5),
    }
}
