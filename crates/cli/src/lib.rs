pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shopkeeper_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};

use crate::commands::paths::PathFormat;
use crate::commands::{CommandResult, QueryArgs};

#[derive(Debug, Parser)]
#[command(
    name = "shopkeeper",
    about = "Shopkeeper product substitution assistant",
    long_about = "Recommend in-stock substitutes for catalog products by walking a knowledge graph of categories, brands and tags.",
    after_help = "Examples:\n  shopkeeper categories\n  shopkeeper recommend \"Toned Milk 1L\" --max-price 60 --tag milk\n  shopkeeper paths \"Brown Bread\" --format dot | dot -Tsvg > paths.svg\n  shopkeeper doctor --json"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Config file (defaults to shopkeeper.toml or config/shopkeeper.toml)"
    )]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Product catalog JSON, overriding configuration")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Similarity table TOML, overriding configuration")]
    similarity: Option<PathBuf>,
    #[arg(long, global = true, help = "BFS depth limit, overriding configuration")]
    max_depth: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List the categories present in the catalog as JSON")]
    Categories,
    #[command(about = "List product names, grouped by category")]
    Products {
        #[arg(long, help = "Only list products in this category")]
        category: Option<String>,
    },
    #[command(about = "Find the exact item or ranked substitutes for a product")]
    Recommend {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Render the graph paths behind a recommendation")]
    Paths {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long, value_enum, default_value_t = PathFormat::Dot)]
        format: PathFormat,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, catalog loading and graph construction")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                products_path: self.catalog.clone(),
                similarity_path: self.similarity.clone(),
                max_depth: self.max_depth,
                ..ConfigOverrides::default()
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    // Config failures surface through the command itself.
    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Categories => commands::categories::run(&options),
        Command::Products { category } => commands::products::run(&options, category.as_deref()),
        Command::Recommend { query, json } => commands::recommend::run(&options, &query, json),
        Command::Paths { query, format } => commands::paths::run(&options, &query, format),
        Command::Config => CommandResult::rendered(commands::config::run(&options)),
        Command::Doctor { json } => CommandResult::rendered(commands::doctor::run(&options, json)),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr; stdout carries command output only.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
