use anyhow::{Context, Result};
use clap::ValueEnum;
use shopkeeper_core::config::LoadOptions;
use shopkeeper_core::{ApplicationError, PathGraph};

use crate::commands::{load_service, CommandResult, QueryArgs};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PathFormat {
    #[default]
    Dot,
    Json,
}

/// Renders the path subgraph linking the requested product to each
/// recommendation. Queries with nothing to draw report an `ok` envelope.
pub fn run(options: &LoadOptions, query: &QueryArgs, format: PathFormat) -> CommandResult {
    let service = match load_service(options) {
        Ok(service) => service,
        Err(error) => return CommandResult::from_error("paths", &error),
    };

    let result = match service.find_alternatives(&query.to_request(&service)) {
        Ok(result) => result,
        Err(error) => return CommandResult::from_error("paths", &ApplicationError::from(error)),
    };

    let Some(graph) = service.visualize_paths(&result) else {
        return CommandResult::success("paths", format!("nothing to render: {}", result.message));
    };

    match render(&graph, format) {
        Ok(output) => CommandResult::rendered(output),
        Err(error) => CommandResult::failure("paths", "serialization", format!("{error:#}"), 5),
    }
}

fn render(graph: &PathGraph, format: PathFormat) -> Result<String> {
    match format {
        PathFormat::Dot => Ok(graph.to_dot()),
        PathFormat::Json => {
            serde_json::to_string_pretty(graph).context("failed to serialize path graph")
        }
    }
}
