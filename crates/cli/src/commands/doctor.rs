use serde::Serialize;
use shopkeeper_core::config::{AppConfig, LoadOptions};
use shopkeeper_core::{
    load_products, load_similarity, NodeKind, Product, ServiceSettings, ShopkeeperService,
    SimilarityConfig,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn skipped(name: &'static str, reason: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: &LoadOptions, json_output: bool) -> String {
    let report = build_report(options);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(options: &LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options.clone()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_catalog(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck::skipped("catalog_load", "configuration did not load"));
            checks.push(DoctorCheck::skipped("similarity_table", "configuration did not load"));
            checks.push(DoctorCheck::skipped("graph_build", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> Vec<DoctorCheck> {
    let products_path = &config.catalog.products_path;
    let products = match load_products(products_path) {
        Ok(products) => products,
        Err(error) => {
            return vec![
                DoctorCheck {
                    name: "catalog_load",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
                DoctorCheck::skipped("similarity_table", "the catalog did not load"),
                DoctorCheck::skipped("graph_build", "the catalog did not load"),
            ];
        }
    };
    let catalog_check = DoctorCheck {
        name: "catalog_load",
        status: CheckStatus::Pass,
        details: format!("{} products read from `{}`", products.len(), products_path.display()),
    };

    let (similarity_check, similarity) = match config.catalog.similarity_path.as_deref() {
        None => (
            DoctorCheck {
                name: "similarity_table",
                status: CheckStatus::Pass,
                details: "using curated similarity table".to_string(),
            },
            Some(SimilarityConfig::curated()),
        ),
        Some(path) => match load_similarity(path) {
            Ok(similarity) => (
                DoctorCheck {
                    name: "similarity_table",
                    status: CheckStatus::Pass,
                    details: format!(
                        "{} similar pairs read from `{}`",
                        similarity.similar_pairs().len(),
                        path.display()
                    ),
                },
                Some(similarity),
            ),
            Err(error) => (
                DoctorCheck {
                    name: "similarity_table",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
                None,
            ),
        },
    };

    let graph_check = match similarity {
        Some(similarity) => check_graph(products, similarity, config),
        None => DoctorCheck::skipped("graph_build", "the similarity table did not load"),
    };

    vec![catalog_check, similarity_check, graph_check]
}

fn check_graph(
    products: Vec<Product>,
    similarity: SimilarityConfig,
    config: &AppConfig,
) -> DoctorCheck {
    let settings = ServiceSettings::from(&config.recommendation);
    match ShopkeeperService::new(products, similarity, settings) {
        Ok(service) => {
            let graph = service.graph();
            DoctorCheck {
                name: "graph_build",
                status: CheckStatus::Pass,
                details: format!(
                    "{} nodes ({} products), {} edges",
                    graph.node_count(),
                    graph.count_kind(NodeKind::Product),
                    graph.edge_count()
                ),
            }
        }
        Err(error) => DoctorCheck {
            name: "graph_build",
            status: CheckStatus::Fail,
            details: format!("catalog validation failed: {error}"),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
