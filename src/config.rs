use crate::errors::ConfigError;
use crate::retry::{Backoff, RetryPolicy};
use axum_extra::extract::cookie::Key;
use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://api.prod.testnet.anoma.net/api/v1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub api_base_url: String,
    pub session_key: Key,
    pub secure_cookies: bool,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_var(&lookup, "PORT", "a TCP port")?.unwrap_or(DEFAULT_PORT);
        let api_base_url = lookup("API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let session_key = match lookup("SESSION_SECRET") {
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(ConfigError::SecretTooShort {
                    min: MIN_SECRET_LEN,
                    len: secret.len(),
                });
            }
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => {
                warn!("SESSION_SECRET not set, sessions will not survive a restart");
                Key::generate()
            }
        };

        let secure_cookies = match lookup("SESSION_COOKIE_SECURE") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                name: "SESSION_COOKIE_SECURE",
                expected: "a boolean",
                value,
            })?,
            None => false,
        };

        let max_attempts: u32 = parse_var(&lookup, "API_MAX_ATTEMPTS", "a positive integer")?
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "API_MAX_ATTEMPTS",
                expected: "a positive integer",
                value: "0".to_string(),
            });
        }
        let delay_ms = parse_var(&lookup, "API_RETRY_DELAY_MS", "milliseconds")?
            .unwrap_or(DEFAULT_RETRY_DELAY_MS);
        let timeout_secs = parse_var(&lookup, "API_TIMEOUT_SECS", "seconds")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            port,
            api_base_url,
            session_key,
            secure_cookies,
            retry: RetryPolicy::new(max_attempts, Backoff::Fixed(Duration::from_millis(delay_ms))),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, expected, value }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE);
        assert!(!config.secure_cookies);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay_after(1), Duration::from_secs(2));
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "3000"),
            ("API_BASE_URL", "http://127.0.0.1:9999/api"),
            ("SESSION_COOKIE_SECURE", "true"),
            ("API_MAX_ATTEMPTS", "3"),
            ("API_RETRY_DELAY_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999/api");
        assert!(config.secure_cookies);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_after(1), Duration::ZERO);
    }

    #[test]
    fn rejects_bad_port() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).err();
        assert!(matches!(err, Some(ConfigError::Invalid { name: "PORT", .. })));
    }

    #[test]
    fn rejects_short_secret() {
        let err = AppConfig::from_lookup(lookup_from(&[("SESSION_SECRET", "anoma-secret")])).err();
        assert!(matches!(err, Some(ConfigError::SecretTooShort { len: 12, .. })));
    }

    #[test]
    fn rejects_zero_attempts() {
        let err = AppConfig::from_lookup(lookup_from(&[("API_MAX_ATTEMPTS", "0")])).err();
        assert!(matches!(err, Some(ConfigError::Invalid { name: "API_MAX_ATTEMPTS", .. })));
    }
}
