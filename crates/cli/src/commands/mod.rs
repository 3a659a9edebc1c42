pub mod categories;
pub mod config;
pub mod doctor;
pub mod paths;
pub mod products;
pub mod recommend;

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use shopkeeper_core::config::{AppConfig, LoadOptions};
use shopkeeper_core::{
    AlternativesRequest, ApplicationError, ShopkeeperService, SubstitutionFilters,
};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), error.exit_code())
    }

    pub fn invalid_request(command: &str, message: impl Into<String>) -> Self {
        Self::failure(command, "invalid_request", message, 4)
    }

    /// Raw command output, already rendered.
    pub fn rendered(output: String) -> Self {
        Self { exit_code: 0, output }
    }
}

/// Substitution query shared by `recommend` and `paths`.
#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    #[arg(help = "Exact product name as listed by `shopkeeper products`")]
    pub name: String,
    #[arg(long, help = "Reject alternatives priced above this amount")]
    pub max_price: Option<Decimal>,
    #[arg(long = "tag", help = "Tag every alternative must carry (repeatable)")]
    pub tags: Vec<String>,
    #[arg(long, help = "Preferred brand; rewarded in scoring and required for the exact match")]
    pub brand: Option<String>,
    #[arg(long, help = "Number of alternatives to return (defaults to configuration)")]
    pub max_alternatives: Option<usize>,
}

impl QueryArgs {
    pub fn to_request(&self, service: &ShopkeeperService) -> AlternativesRequest {
        let mut filters = SubstitutionFilters::new().with_required_tags(self.tags.iter());
        if let Some(max_price) = self.max_price {
            filters = filters.with_max_price(max_price);
        }
        if let Some(brand) = self.brand.as_deref().map(str::trim).filter(|brand| !brand.is_empty())
        {
            filters = filters.with_preferred_brand(brand);
        }

        let mut request = service.request(self.name.clone()).with_filters(filters);
        if let Some(max_alternatives) = self.max_alternatives {
            request = request.with_max_alternatives(max_alternatives);
        }
        request
    }
}

pub(crate) fn load_service(options: &LoadOptions) -> Result<ShopkeeperService, ApplicationError> {
    let config = AppConfig::load(options.clone())?;
    ShopkeeperService::from_config(&config)
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
