//! Service configuration from environment variables.
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `DATABASE_URL` | built from `DB_*` | PostgreSQL URL |
//! | `DB_HOST`, `DB_PORT` | `localhost`, `5432` | used when `DATABASE_URL` is unset |
//! | `DB_USER`, `DB_PASSWORD`, `DB_NAME` | required without `DATABASE_URL` | |
//! | `TOKEN_SIGNING_SECRET` | required | HMAC key for confirmation tokens |
//! | `LISTEN` | `0.0.0.0:3000` | |
//! | `RUST_LOG` | `info` | |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `BEHIND_PROXY` | `false` | rate limit by forwarded client IP |
//! | `DB_MAX_CONNECTIONS` | `10` | |
//! | `DB_CONNECT_TIMEOUT` | `30` | seconds |
//! | `DB_IDLE_TIMEOUT` | `600` | seconds |
//! | `DB_MAX_LIFETIME` | `1800` | seconds |

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{other}'"),
        }
    }
}

/// Connection pool limits.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Seconds to wait for a free connection.
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Take the client IP from forwarding headers. Only safe behind a
    /// trusted reverse proxy.
    pub behind_proxy: bool,
    pub token_signing_secret: String,
    pub pool: PoolSettings,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parses a variable, falling back to `default` when it is unset.
fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} is invalid ('{raw}'): {e}")),
        Err(_) => Ok(default),
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl Config {
    /// Reads every setting from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> Result<Self> {
        let database_url = database_url().context("Failed to load database configuration")?;

        let listen = var_or("LISTEN", "0.0.0.0:3000");
        let listen_addr = listen
            .parse()
            .with_context(|| format!("LISTEN must be 'host:port', got '{listen}'"))?;

        Ok(Self {
            database_url,
            listen_addr,
            log_level: var_or("RUST_LOG", "info"),
            log_format: var_or("LOG_FORMAT", "text").parse()?,
            behind_proxy: flag("BEHIND_PROXY"),
            token_signing_secret: env::var("TOKEN_SIGNING_SECRET")
                .context("TOKEN_SIGNING_SECRET must be set")?,
            pool: PoolSettings {
                max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
                connect_timeout: parse_or("DB_CONNECT_TIMEOUT", 30)?,
                idle_timeout: parse_or("DB_IDLE_TIMEOUT", 600)?,
                max_lifetime: parse_or("DB_MAX_LIFETIME", 1800)?,
            },
        })
    }

    /// Checks values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-PostgreSQL URL, an empty signing secret, or
    /// a zero pool size or connect timeout.
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            anyhow::bail!(
                "DATABASE_URL must be a postgres:// URL, got '{}'",
                mask_connection_string(&self.database_url)
            );
        }

        if self.token_signing_secret.trim().is_empty() {
            anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
        }

        if self.pool.max_connections == 0 || self.pool.connect_timeout == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS and DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Logs the effective settings. The database password and the signing
    /// secret are never printed.
    pub fn print_summary(&self) {
        tracing::info!(
            listen = %self.listen_addr,
            database = %mask_connection_string(&self.database_url),
            max_connections = self.pool.max_connections,
            log_format = ?self.log_format,
            behind_proxy = self.behind_proxy,
            "Configuration loaded"
        );
    }
}

/// `DATABASE_URL`, or a URL assembled from the `DB_*` variables.
pub(crate) fn database_url() -> Result<String> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Ok(url);
    }

    let required = |name: &str| {
        env::var(name).with_context(|| format!("{name} must be set when DATABASE_URL is not"))
    };

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        required("DB_USER")?,
        required("DB_PASSWORD")?,
        var_or("DB_HOST", "localhost"),
        var_or("DB_PORT", "5432"),
        required("DB_NAME")?,
    ))
}

/// Replaces the password of a connection URL with `***`.
pub fn mask_connection_string(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };

    match credentials.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_string(),
    }
}

/// Loads and validates configuration. Expects `.env` to be loaded already.
///
/// # Errors
///
/// Returns an error if a variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "DATABASE_URL",
        "DB_HOST",
        "DB_PORT",
        "DB_USER",
        "DB_PASSWORD",
        "DB_NAME",
        "TOKEN_SIGNING_SECRET",
        "LISTEN",
        "LOG_FORMAT",
        "BEHIND_PROXY",
        "DB_MAX_CONNECTIONS",
    ];

    fn with_env(vars: &[(&str, &str)], test: impl FnOnce()) {
        // SAFETY: every test touching the environment is #[serial].
        unsafe {
            for name in VARS {
                env::remove_var(name);
            }
            for (name, value) in vars {
                env::set_var(name, value);
            }
        }

        test();

        unsafe {
            for name in VARS {
                env::remove_var(name);
            }
        }
    }

    #[test]
    fn test_mask_connection_string() {
        assert_eq!(
            mask_connection_string("postgres://orders:s3cret@db:5432/orders"),
            "postgres://orders:***@db:5432/orders"
        );
        assert_eq!(
            mask_connection_string("postgres://db:5432/orders"),
            "postgres://db:5432/orders"
        );
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    #[serial]
    fn test_defaults() {
        with_env(
            &[
                ("DATABASE_URL", "postgres://orders:pw@db/orders"),
                ("TOKEN_SIGNING_SECRET", "secret"),
            ],
            || {
                let config = load_from_env().unwrap();

                assert_eq!(config.listen_addr, "0.0.0.0:3000".parse().unwrap());
                assert_eq!(config.log_format, LogFormat::Text);
                assert!(!config.behind_proxy);
                assert_eq!(config.pool.max_connections, 10);
            },
        );
    }

    #[test]
    #[serial]
    fn test_database_url_from_components() {
        with_env(
            &[
                ("DB_HOST", "db"),
                ("DB_USER", "orders"),
                ("DB_PASSWORD", "pw"),
                ("DB_NAME", "orders"),
            ],
            || {
                assert_eq!(database_url().unwrap(), "postgres://orders:pw@db:5432/orders");
            },
        );
    }

    #[test]
    #[serial]
    fn test_database_url_wins_over_components() {
        with_env(
            &[
                ("DATABASE_URL", "postgres://from-url:pw@db/orders"),
                ("DB_USER", "from-components"),
            ],
            || {
                assert!(database_url().unwrap().contains("from-url"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_signing_secret_required() {
        with_env(&[("DATABASE_URL", "postgres://orders:pw@db/orders")], || {
            assert!(Config::from_env().is_err());
        });

        with_env(
            &[
                ("DATABASE_URL", "postgres://orders:pw@db/orders"),
                ("TOKEN_SIGNING_SECRET", "  "),
            ],
            || {
                assert!(load_from_env().is_err());
            },
        );
    }

    #[test]
    #[serial]
    fn test_invalid_values_rejected() {
        let base = [
            ("DATABASE_URL", "postgres://orders:pw@db/orders"),
            ("TOKEN_SIGNING_SECRET", "secret"),
        ];

        for bad in [
            ("LISTEN", "3000"),
            ("LOG_FORMAT", "xml"),
            ("DB_MAX_CONNECTIONS", "many"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("DATABASE_URL", "mysql://db/orders"),
        ] {
            let mut vars = base.to_vec();
            vars.push(bad);
            with_env(&vars, || {
                assert!(load_from_env().is_err(), "{bad:?} should be rejected");
            });
        }
    }

    #[test]
    #[serial]
    fn test_behind_proxy_flag() {
        with_env(&[("BEHIND_PROXY", "TRUE")], || assert!(flag("BEHIND_PROXY")));
        with_env(&[("BEHIND_PROXY", "no")], || assert!(!flag("BEHIND_PROXY")));
    }
}
