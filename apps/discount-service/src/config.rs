//! Discount service configuration module.
//!
//! Scalar settings come from environment variables with fallback to
//! defaults. The discount code table can be replaced by a TOML file:
//!
//! ```toml
//! [[codes]]
//! code = "SAVE20"
//! rate_bps = 2000
//! minimum_total_units = 100
//! ```

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ::config::{Config, File, FileFormat};
use discount_core::types::{DiscountRate, DiscountRule};
use discount_core::{CoreError, NanoAmount, StaticCatalog, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};

/// Port the service listens on when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 7001;

/// Discount service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// gRPC server port
    pub port: u16,

    /// Address to bind
    pub bind_address: IpAddr,

    /// Currency reported when a request carries none
    pub default_currency: String,

    /// TOML file replacing the builtin code table
    pub discount_codes_path: Option<PathBuf>,

    /// Logging settings
    pub log: LogConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. "info" or "discount_code_service=debug"
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per line (default, for log collectors).
    #[default]
    Json,

    /// Multi-line human-readable output for local runs.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "debug".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            port: DEFAULT_PORT,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            default_currency: DEFAULT_CURRENCY.to_string(),
            discount_codes_path: None,
            log: LogConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `load` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServiceConfig::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
            None => defaults.port,
        };

        let bind_address = match lookup("BIND_ADDRESS") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BIND_ADDRESS".to_string()))?,
            None => defaults.bind_address,
        };

        let default_currency = match lookup("DEFAULT_CURRENCY") {
            Some(value) => parse_currency(&value)?,
            None => defaults.default_currency,
        };

        let discount_codes_path = lookup("DISCOUNT_CODES_FILE")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let log = LogConfig {
            level: lookup("LOG_LEVEL").unwrap_or(defaults.log.level),
            format: match lookup("LOG_FORMAT") {
                Some(value) => value.parse()?,
                None => defaults.log.format,
            },
        };

        Ok(ServiceConfig {
            port,
            bind_address,
            default_currency,
            discount_codes_path,
            log,
        })
    }

    /// Socket address the gRPC server binds.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Builds the discount catalog: the codes file when configured,
    /// otherwise the builtin table.
    pub fn load_catalog(&self) -> Result<StaticCatalog, ConfigError> {
        match &self.discount_codes_path {
            Some(path) => load_codes_file(path),
            None => Ok(StaticCatalog::builtin()),
        }
    }
}

fn parse_currency(value: &str) -> Result<String, ConfigError> {
    let currency = value.trim();
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(currency.to_string())
    } else {
        Err(ConfigError::InvalidValue("DEFAULT_CURRENCY".to_string()))
    }
}

// =============================================================================
// Discount Codes File
// =============================================================================

/// On-disk shape of the codes file.
#[derive(Debug, Deserialize)]
struct CodesFile {
    #[serde(default)]
    codes: Vec<CodeEntry>,
}

#[derive(Debug, Deserialize)]
struct CodeEntry {
    code: String,
    rate_bps: u32,
    #[serde(default)]
    minimum_total_units: Option<i64>,
}

/// Reads a TOML codes file into a catalog.
pub fn load_codes_file(path: &Path) -> Result<StaticCatalog, ConfigError> {
    let source = File::from(path).format(FileFormat::Toml);
    parse_codes(source).map_err(|err| match err {
        ConfigError::CodesFile { source, .. } => ConfigError::CodesFile {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

/// Parses codes from TOML text.
pub fn parse_codes_toml(toml: &str) -> Result<StaticCatalog, ConfigError> {
    parse_codes(File::from_str(toml, FileFormat::Toml))
}

fn parse_codes<S>(source: S) -> Result<StaticCatalog, ConfigError>
where
    S: ::config::Source + Send + Sync + 'static,
{
    let file: CodesFile = Config::builder()
        .add_source(source)
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(|source| ConfigError::CodesFile {
            path: "<inline>".to_string(),
            source,
        })?;

    let rules = file
        .codes
        .into_iter()
        .map(|entry| {
            let rule = DiscountRule::new(DiscountRate::from_bps(entry.rate_bps));
            let rule = match entry.minimum_total_units {
                Some(units) => match NanoAmount::from_units(units) {
                    Some(minimum) => rule.with_minimum(minimum),
                    None => {
                        return Err(CoreError::ThresholdOutOfRange {
                            code: entry.code,
                            units,
                        })
                    }
                },
                None => rule,
            };
            Ok((entry.code, rule))
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(StaticCatalog::from_rules(rules)?)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Failed to read discount codes from {path}: {source}")]
    CodesFile {
        path: String,
        #[source]
        source: ::config::ConfigError,
    },

    #[error("Invalid discount code table: {0}")]
    Catalog(#[from] CoreError),
}
