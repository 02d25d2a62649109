//! Token configuration from environment variables.

use shared_types::{Address, Role};
use st_01_token_store::TokenMetadata;
use std::env;
use thiserror::Error;

/// Largest precision whose unit (`10^decimals`) still fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// The parsed configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Deployment and logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Token name.
    pub name: String,

    /// Token symbol.
    pub symbol: String,

    /// Display precision.
    pub decimals: u8,

    /// Account that deploys the contracts and becomes the first master.
    pub deployer: Address,

    /// Roles the deployer grants right after initialization.
    pub bootstrap_roles: Vec<(Role, Address)>,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Stable Token".to_string(),
            symbol: "STBL".to_string(),
            decimals: 18,
            deployer: Address::from_low_u64(1),
            bootstrap_roles: Vec::new(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TokenConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ST_TOKEN_NAME`: Token name (default: Stable Token)
    /// - `ST_TOKEN_SYMBOL`: Token symbol (default: STBL)
    /// - `ST_TOKEN_DECIMALS`: Display precision, at most 77 (default: 18)
    /// - `ST_DEPLOYER`: Deployer / first master, hex (default: 0x00..01)
    /// - `ST_BOOTSTRAP_ROLES`: `role_id:address` pairs, comma separated
    /// - `ST_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `ST_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let decimals = match lookup("ST_TOKEN_DECIMALS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "ST_TOKEN_DECIMALS",
                value: value.clone(),
                reason: "expected an integer between 0 and 255".to_string(),
            })?,
            None => defaults.decimals,
        };

        let deployer = match lookup("ST_DEPLOYER") {
            Some(value) => value.trim().parse().map_err(|err: shared_types::TokenError| {
                ConfigError::InvalidValue {
                    var: "ST_DEPLOYER",
                    value: value.clone(),
                    reason: err.to_string(),
                }
            })?,
            None => defaults.deployer,
        };

        let bootstrap_roles = match lookup("ST_BOOTSTRAP_ROLES") {
            Some(value) => parse_role_grants(&value)?,
            None => defaults.bootstrap_roles,
        };

        let config = Self {
            name: lookup("ST_TOKEN_NAME").unwrap_or(defaults.name),
            symbol: lookup("ST_TOKEN_SYMBOL").unwrap_or(defaults.symbol),
            decimals,
            deployer,
            bootstrap_roles,
            log_level: lookup("ST_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: lookup("ST_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("token name is empty".to_string()));
        }
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("token symbol is empty".to_string()));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "decimals {} exceeds {}",
                self.decimals, MAX_DECIMALS
            )));
        }
        if self.deployer.is_zero() {
            return Err(ConfigError::Invalid("deployer is the zero address".to_string()));
        }
        if self.bootstrap_roles.iter().any(|(_, account)| account.is_zero()) {
            return Err(ConfigError::Invalid(
                "bootstrap role granted to the zero address".to_string(),
            ));
        }
        Ok(())
    }

    /// Metadata the Store is deployed with.
    #[must_use]
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata::new(self.name.clone(), self.symbol.clone(), self.decimals)
    }
}

fn parse_role_grants(value: &str) -> Result<Vec<(Role, Address)>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        var: "ST_BOOTSTRAP_ROLES",
        value: value.to_string(),
        reason,
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<(Role, Address), ConfigError> {
            let (role, account) = entry
                .split_once(':')
                .ok_or_else(|| invalid(format!("{entry:?} is not role_id:address")))?;
            let role_id: u8 = role
                .trim()
                .parse()
                .map_err(|_| invalid(format!("{role:?} is not a role id")))?;
            let role = Role::try_from(role_id).map_err(|err| invalid(err.to_string()))?;
            let account = account
                .trim()
                .parse()
                .map_err(|err: shared_types::TokenError| invalid(err.to_string()))?;
            Ok((role, account))
        })
        .collect()
}
