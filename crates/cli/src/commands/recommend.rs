use anyhow::{Context, Result};
use shopkeeper_core::config::LoadOptions;
use shopkeeper_core::{AlternativesResult, ApplicationError, Product};

use crate::commands::{load_service, CommandResult, QueryArgs};

pub fn run(options: &LoadOptions, query: &QueryArgs, json_output: bool) -> CommandResult {
    if query.max_alternatives == Some(0) {
        return CommandResult::invalid_request("recommend", "--max-alternatives must be at least 1");
    }

    let service = match load_service(options) {
        Ok(service) => service,
        Err(error) => return CommandResult::from_error("recommend", &error),
    };

    let result = match service.find_alternatives(&query.to_request(&service)) {
        Ok(result) => result,
        Err(error) => return CommandResult::from_error("recommend", &ApplicationError::from(error)),
    };

    let rendered =
        if json_output { render_json(&result) } else { Ok(render_human(query, &result)) };
    match rendered {
        Ok(output) => CommandResult::rendered(output),
        Err(error) => CommandResult::failure("recommend", "serialization", format!("{error:#}"), 5),
    }
}

fn render_json(result: &AlternativesResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize recommendation result")
}

fn render_human(query: &QueryArgs, result: &AlternativesResult) -> String {
    let Some(requested) = result.requested.as_ref() else {
        return format!("`{}`: {}", query.name, result.message);
    };

    let mut lines = vec![describe(requested), format!("status: {}", result.message)];

    match &result.exact_match {
        Some(exact) => lines.push(format!("exact match: {}", exact.explanation)),
        None => lines.push("exact match: unavailable".to_string()),
    }

    if !result.alternatives.is_empty() {
        lines.push("alternatives:".to_string());
    }
    for (rank, recommendation) in result.alternatives.iter().enumerate() {
        lines.push(format!(
            "  {}. {} (score {:.2})",
            rank + 1,
            describe(&recommendation.product),
            recommendation.score
        ));
        lines.push(format!("     {}", recommendation.explanation));
    }

    lines.join("\n")
}

fn describe(product: &Product) -> String {
    let stock = if product.in_stock { "in stock" } else { "out of stock" };
    format!(
        "{} [{}] {} / {} / {} / {stock}",
        product.name, product.id, product.category, product.brand, product.price
    )
}
