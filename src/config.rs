//! Configuration management for the HTML to PDF server

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Path or name of the wkhtmltopdf executable
    pub binary: String,
    /// Upper bound for a single render, after which the child is killed
    pub timeout_secs: u64,
}

impl RendererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_body_bytes: 10 * 1024 * 1024,
            },
            renderer: RendererConfig {
                binary: "wkhtmltopdf".to_string(),
                timeout_secs: 60,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port),
                max_body_bytes: parse_var("MAX_BODY_BYTES", defaults.server.max_body_bytes),
            },
            renderer: RendererConfig {
                binary: env::var("WKHTMLTOPDF_PATH").unwrap_or(defaults.renderer.binary),
                timeout_secs: parse_nonzero_var(
                    "RENDERER_TIMEOUT_SECS",
                    defaults.renderer.timeout_secs,
                ),
            },
        }
    }
}

/// Read a numeric variable, keeping the default when it is unset or unparseable
fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}='{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Like [`parse_var`], but zero also falls back to the default
fn parse_nonzero_var(name: &str, default: u64) -> u64 {
    match parse_var(name, default) {
        0 => {
            tracing::warn!("{} must be greater than zero, using default {}", name, default);
            default
        }
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.renderer.binary, "wkhtmltopdf");
        assert_eq!(config.renderer.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_var_falls_back() {
        env::set_var("HTML2PDF_TEST_PORT", "not-a-port");
        assert_eq!(parse_var("HTML2PDF_TEST_PORT", 5000u16), 5000);

        env::set_var("HTML2PDF_TEST_PORT", " 8080 ");
        assert_eq!(parse_var("HTML2PDF_TEST_PORT", 5000u16), 8080);

        env::remove_var("HTML2PDF_TEST_PORT");
        assert_eq!(parse_var("HTML2PDF_TEST_PORT", 5000u16), 5000);
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        env::set_var("HTML2PDF_TEST_TIMEOUT", "0");
        assert_eq!(parse_nonzero_var("HTML2PDF_TEST_TIMEOUT", 60), 60);

        env::set_var("HTML2PDF_TEST_TIMEOUT", "15");
        assert_eq!(parse_nonzero_var("HTML2PDF_TEST_TIMEOUT", 60), 15);

        env::remove_var("HTML2PDF_TEST_TIMEOUT");
        assert_eq!(parse_nonzero_var("HTML2PDF_TEST_TIMEOUT", 60), 60);
    }
}
