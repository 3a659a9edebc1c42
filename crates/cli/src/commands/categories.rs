use serde::Serialize;
use shopkeeper_core::config::LoadOptions;
use shopkeeper_core::Category;

use crate::commands::{load_service, CommandResult};

#[derive(Debug, Serialize)]
struct CategoryListing {
    categories: Vec<Category>,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let service = match load_service(options) {
        Ok(service) => service,
        Err(error) => return CommandResult::from_error("categories", &error),
    };

    let listing = CategoryListing { categories: service.list_categories() };
    match serde_json::to_string_pretty(&listing) {
        Ok(output) => CommandResult::rendered(output),
        Err(error) => CommandResult::failure("categories", "serialization", error.to_string(), 5),
    }
}
