//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Invoice engine configuration.
    #[serde(default)]
    pub invoicing: InvoicingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// How payment-state reconciliation guards against concurrent writers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileMode {
    /// Plain read followed by a conditional write. Concurrent reconciliations
    /// of the same invoice race and the last write wins.
    #[default]
    Optimistic,
    /// Read and write happen in one transaction holding a row lock
    /// (`SELECT ... FOR UPDATE`) on the invoice.
    Locked,
}

/// Invoice engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoicingConfig {
    /// Concurrency guard used by the status resolver.
    #[serde(default)]
    pub reconcile_mode: ReconcileMode,
    /// Days between invoice date and due date when no due date is given.
    #[serde(default = "default_payment_terms_days")]
    pub payment_terms_days: u32,
    /// Prefix for generated invoice numbers.
    #[serde(default = "default_invoice_number_prefix")]
    pub invoice_number_prefix: String,
}

impl Default for InvoicingConfig {
    fn default() -> Self {
        Self {
            reconcile_mode: ReconcileMode::default(),
            payment_terms_days: default_payment_terms_days(),
            invoice_number_prefix: default_invoice_number_prefix(),
        }
    }
}

fn default_payment_terms_days() -> u32 {
    30
}

fn default_invoice_number_prefix() -> String {
    "INV".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("INVOICER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("INVOICER__DATABASE__URL", Some("postgres://localhost/invoicer_test")),
                ("INVOICER__INVOICING__RECONCILE_MODE", Some("locked")),
                ("INVOICER__INVOICING__INVOICE_NUMBER_PREFIX", Some("BILL")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/invoicer_test");
                assert_eq!(config.invoicing.reconcile_mode, ReconcileMode::Locked);
                assert_eq!(config.invoicing.invoice_number_prefix, "BILL");
                assert_eq!(config.invoicing.payment_terms_days, 30);
                assert_eq!(config.server.port, 8080);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars_unset(["INVOICER__DATABASE__URL"], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_invoicing_defaults() {
        let config = InvoicingConfig::default();
        assert_eq!(config.reconcile_mode, ReconcileMode::Optimistic);
        assert_eq!(config.payment_terms_days, 30);
        assert_eq!(config.invoice_number_prefix, "INV");
    }

    #[test]
    fn test_reconcile_mode_deserializes_lowercase() {
        let mode: ReconcileMode = serde_json::from_str("\"optimistic\"").unwrap();
        assert_eq!(mode, ReconcileMode::Optimistic);
        let mode: ReconcileMode = serde_json::from_str("\"locked\"").unwrap();
        assert_eq!(mode, ReconcileMode::Locked);
        assert!(serde_json::from_str::<ReconcileMode>("\"pessimistic\"").is_err());
    }
}
