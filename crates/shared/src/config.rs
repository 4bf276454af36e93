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
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Opening balance posting configuration.
    #[serde(default)]
    pub opening_balance: OpeningBalanceConfig,
    /// Log output configuration.
    #[serde(default)]
    pub log: LogConfig,
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
    /// Attach internal error detail (SQL text, driver messages) to error
    /// responses. Defaults to on outside of `production` run mode.
    #[serde(default = "default_expose_error_details")]
    pub expose_error_details: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_expose_error_details() -> bool {
    !is_production(&run_mode())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            expose_error_details: default_expose_error_details(),
        }
    }
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

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Opening balance posting configuration.
///
/// Control account ids are optional overrides. When an id is absent the
/// account is looked up by subtype in the company's chart of accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct OpeningBalanceConfig {
    /// Prefix used for batch numbers (`<PREFIX>-<YY>-<MM><SEQ>`).
    #[serde(default = "default_batch_prefix")]
    pub batch_prefix: String,
    /// Accounts Receivable control account id.
    #[serde(default)]
    pub receivable_account_id: Option<i32>,
    /// Accounts Payable control account id.
    #[serde(default)]
    pub payable_account_id: Option<i32>,
    /// Owner's Equity account id.
    #[serde(default)]
    pub equity_account_id: Option<i32>,
}

fn default_batch_prefix() -> String {
    "OB".to_string()
}

impl Default for OpeningBalanceConfig {
    fn default() -> Self {
        Self {
            batch_prefix: default_batch_prefix(),
            receivable_account_id: None,
            payable_account_id: None,
            equity_account_id: None,
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Emit JSON log lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

/// Returns the current run mode (`RUN_MODE`, default `development`).
#[must_use]
pub fn run_mode() -> String {
    std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string())
}

/// Returns true for run modes that must not leak internal error detail.
#[must_use]
pub fn is_production(run_mode: &str) -> bool {
    run_mode.eq_ignore_ascii_case("production")
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = run_mode();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERLINE").separator("__"))
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
                ("RUN_MODE", Some("test")),
                ("LEDGERLINE__DATABASE__URL", Some("sqlite::memory:")),
                ("LEDGERLINE__JWT__SECRET", Some("secret")),
                ("LEDGERLINE__SERVER__PORT", Some("9090")),
                ("LEDGERLINE__OPENING_BALANCE__BATCH_PREFIX", Some("OPB")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert!(config.server.expose_error_details);
                assert_eq!(config.opening_balance.batch_prefix, "OPB");
                assert_eq!(config.opening_balance.receivable_account_id, None);
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert!(!config.log.json);
            },
        );
    }

    #[test]
    fn test_production_hides_error_details_by_default() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("production")),
                ("LEDGERLINE__DATABASE__URL", Some("postgres://localhost/ledgerline")),
                ("LEDGERLINE__JWT__SECRET", Some("secret")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert!(!config.server.expose_error_details);
            },
        );
    }

    #[test]
    fn test_is_production() {
        assert!(is_production("production"));
        assert!(is_production("PRODUCTION"));
        assert!(!is_production("development"));
    }
}
