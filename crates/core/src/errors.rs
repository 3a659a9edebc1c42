use rust_decimal::Decimal;
use thiserror::Error;

use crate::{config::ConfigError, domain::product::ProductId, loader::LoadError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate product id `{0}`")]
    DuplicateProductId(ProductId),
    #[error("duplicate product name `{0}`")]
    DuplicateProductName(String),
    #[error("product `{id}` has a negative price {price}")]
    NegativePrice { id: ProductId, price: Decimal },
    #[error("product `{id}` has an empty `{field}`")]
    EmptyField { id: ProductId, field: &'static str },
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    /// Stable machine-readable class used by operator tooling.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain_invariant",
            Self::Catalog(_) => "catalog_validation",
            Self::Load(_) => "catalog_load",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Load(_) | Self::Catalog(_) => 3,
            Self::Domain(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rust_decimal::Decimal;

    use crate::config::ConfigError;
    use crate::domain::product::ProductId;
    use crate::errors::{ApplicationError, CatalogError, DomainError};

    #[test]
    fn domain_error_maps_to_domain_class() {
        let error = ApplicationError::from(DomainError::InvariantViolation(
            "dangling node `product:P404`".to_owned(),
        ));

        assert_eq!(error.error_class(), "domain_invariant");
        assert_eq!(error.exit_code(), 4);
        assert!(error.to_string().contains("product:P404"));
    }

    #[test]
    fn catalog_error_is_reported_as_catalog_validation() {
        let error = ApplicationError::from(CatalogError::NegativePrice {
            id: ProductId::new("P7"),
            price: Decimal::new(-150, 2),
        });

        assert_eq!(error.error_class(), "catalog_validation");
        assert_eq!(error.exit_code(), 3);
        assert_eq!(error.to_string(), "product `P7` has a negative price -1.50");
    }

    #[test]
    fn configuration_error_uses_config_exit_code() {
        let error =
            ApplicationError::from(ConfigError::MissingConfigFile(PathBuf::from("shopkeeper.toml")));

        assert_eq!(error.error_class(), "config_validation");
        assert_eq!(error.exit_code(), 2);
    }
}
