use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use shopkeeper_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run(options: &LoadOptions) -> String {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str], overridden: bool| {
        if overridden {
            return "cli flag".to_string();
        }
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };
    let overrides = &options.overrides;

    let mut lines =
        vec!["effective config (source precedence: cli > env > file > default):".to_string()];

    lines.push(render_line(
        "catalog.products_path",
        &config.catalog.products_path.display().to_string(),
        source(
            "catalog.products_path",
            &["SHOPKEEPER_CATALOG_PRODUCTS_PATH"],
            overrides.products_path.is_some(),
        ),
    ));
    lines.push(render_line(
        "catalog.similarity_path",
        &config
            .catalog
            .similarity_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<curated>".to_string()),
        source(
            "catalog.similarity_path",
            &["SHOPKEEPER_CATALOG_SIMILARITY_PATH"],
            overrides.similarity_path.is_some(),
        ),
    ));

    lines.push(render_line(
        "recommendation.max_depth",
        &config.recommendation.max_depth.to_string(),
        source(
            "recommendation.max_depth",
            &["SHOPKEEPER_RECOMMENDATION_MAX_DEPTH"],
            overrides.max_depth.is_some(),
        ),
    ));
    lines.push(render_line(
        "recommendation.max_alternatives",
        &config.recommendation.max_alternatives.to_string(),
        source(
            "recommendation.max_alternatives",
            &["SHOPKEEPER_RECOMMENDATION_MAX_ALTERNATIVES"],
            overrides.max_alternatives.is_some(),
        ),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source(
            "logging.level",
            &["SHOPKEEPER_LOGGING_LEVEL", "SHOPKEEPER_LOG_LEVEL"],
            overrides.log_level.is_some(),
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format).to_ascii_lowercase(),
        source(
            "logging.format",
            &["SHOPKEEPER_LOGGING_FORMAT", "SHOPKEEPER_LOG_FORMAT"],
            overrides.log_format.is_some(),
        ),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).ok().is_some_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
