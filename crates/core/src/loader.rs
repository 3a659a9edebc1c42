use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::product::{Category, Product, ProductId};
use crate::graph::SimilarityConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not parse product catalog `{path}`: {source}")]
    ParseProducts { path: PathBuf, source: serde_json::Error },
    #[error("could not parse similarity table `{path}`: {source}")]
    ParseSimilarity { path: PathBuf, source: toml::de::Error },
    #[error("invalid similarity table `{path}`: {message}")]
    InvalidSimilarity { path: PathBuf, message: String },
}

/// Reads a JSON array of product records.
pub fn load_products(path: &Path) -> Result<Vec<Product>, LoadError> {
    let raw = read(path)?;
    let products = serde_json::from_str::<Vec<Product>>(&raw)
        .map_err(|source| LoadError::ParseProducts { path: path.to_path_buf(), source })?;

    info!(
        event_name = "catalog.loaded",
        path = %path.display(),
        products = products.len(),
        "product catalog loaded"
    );
    Ok(products)
}

/// Reads a TOML similarity table:
///
/// ```toml
/// similar_pairs = [["P001", "P003"]]
///
/// [category_links]
/// Dairy = ["Health", "Snacks"]
/// ```
pub fn load_similarity(path: &Path) -> Result<SimilarityConfig, LoadError> {
    let raw = read(path)?;
    let document = toml::from_str::<SimilarityDocument>(&raw)
        .map_err(|source| LoadError::ParseSimilarity { path: path.to_path_buf(), source })?;

    let invalid =
        |message: String| LoadError::InvalidSimilarity { path: path.to_path_buf(), message };

    let mut category_links = BTreeMap::new();
    for (source, related) in document.category_links {
        let source = source.parse::<Category>().map_err(|error| invalid(error.to_string()))?;
        let related = related
            .iter()
            .map(|value| value.parse::<Category>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| invalid(error.to_string()))?;
        category_links.insert(source, related);
    }

    let similar_pairs = document
        .similar_pairs
        .into_iter()
        .map(|[left, right]| (ProductId(left), ProductId(right)))
        .collect();

    Ok(SimilarityConfig::new(category_links, similar_pairs))
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read { path: path.to_path_buf(), source })
}

#[derive(Debug, Default, Deserialize)]
struct SimilarityDocument {
    #[serde(default)]
    category_links: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    similar_pairs: Vec<[String; 2]>,
}
