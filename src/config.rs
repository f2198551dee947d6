use clap::Parser;

use crate::constants::{
    DEFAULT_GEMINI_MODEL, ENV_GEMINI_API_KEY, ENV_GEMINI_MODEL, ENV_INVOLVE_ASIA_ID,
    ENV_LAZADA_AFFILIATE_ID, ENV_SHOPEE_AFFILIATE_ID, ENV_TIKTOK_AFFILIATE_ID,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "gemini-task-router")]
#[command(about = "task-routing prompt handler in front of the gemini api")]
pub struct Config {
    #[arg(long, default_value = "0.0.0.0:8888", help = "server listen address")]
    pub listen: String,

    #[arg(
        long,
        default_value = "https://generativelanguage.googleapis.com",
        help = "gemini api base url"
    )]
    pub gemini_url: String,

    #[arg(
        long,
        default_value = "info",
        help = "log level (off, error, warn, info, debug, trace)"
    )]
    pub log_level: String,

    #[arg(
        long,
        default_value = "120",
        help = "timeout for a single gemini request in seconds"
    )]
    pub request_timeout_seconds: u64,
}

pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.listen.parse::<std::net::SocketAddr>().is_err() {
        return Err(format!("invalid listen address: {}", config.listen));
    }
    if !config.gemini_url.starts_with("http://") && !config.gemini_url.starts_with("https://") {
        return Err(format!(
            "invalid Gemini URL (must start with http:// or https://): {}",
            config.gemini_url
        ));
    }
    if let Err(e) = url::Url::parse(&config.gemini_url) {
        return Err(format!("invalid Gemini URL format: {}", e));
    }
    if config.request_timeout_seconds == 0 {
        return Err("request timeout must be at least one second".to_string());
    }
    Ok(())
}

/// Values the handler reads from the process environment.
///
/// Built once at startup and handed to every invocation; empty strings count
/// as unset so a blank variable never switches a feature on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub shopee_affiliate_id: Option<String>,
    pub lazada_affiliate_id: Option<String>,
    pub tiktok_affiliate_id: Option<String>,
    pub involve_asia_id: Option<String>,
}

impl Environment {
    pub fn from_process_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut env = Environment::default();
        for (key, value) in vars {
            let slot = match key.as_ref() {
                ENV_GEMINI_API_KEY => &mut env.gemini_api_key,
                ENV_GEMINI_MODEL => &mut env.gemini_model,
                ENV_SHOPEE_AFFILIATE_ID => &mut env.shopee_affiliate_id,
                ENV_LAZADA_AFFILIATE_ID => &mut env.lazada_affiliate_id,
                ENV_TIKTOK_AFFILIATE_ID => &mut env.tiktok_affiliate_id,
                ENV_INVOLVE_ASIA_ID => &mut env.involve_asia_id,
                _ => continue,
            };
            let value = value.into();
            *slot = if value.is_empty() { None } else { Some(value) };
        }
        env
    }

    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref()
    }

    pub fn model_name(&self) -> &str {
        self.gemini_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn has_affiliate_ids(&self) -> bool {
        self.shopee_affiliate_id.is_some()
            || self.lazada_affiliate_id.is_some()
            || self.tiktok_affiliate_id.is_some()
            || self.involve_asia_id.is_some()
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    fn config(listen: &str, url: &str) -> Config {
        Config {
            listen: listen.to_string(),
            gemini_url: url.to_string(),
            log_level: "info".to_string(),
            request_timeout_seconds: 30,
        }
    }

    #[test]
    fn accepts_default_style_config() {
        assert!(
            validate_config(&config(
                "127.0.0.1:8888",
                "https://generativelanguage.googleapis.com"
            ))
            .is_ok()
        );
    }

    #[test]
    fn rejects_bad_listen_and_url() {
        assert!(validate_config(&config("localhost", "https://x.dev")).is_err());
        assert!(validate_config(&config("127.0.0.1:1", "ftp://x.dev")).is_err());
    }

    #[test]
    fn reads_known_keys_and_ignores_the_rest() {
        let env = Environment::from_vars([
            ("GEMINI_API_KEY", "k"),
            ("SHOPEE_AFFILIATE_ID", "shp"),
            ("PATH", "/usr/bin"),
        ]);
        assert_eq!(env.api_key(), Some("k"));
        assert_eq!(env.shopee_affiliate_id.as_deref(), Some("shp"));
        assert!(env.lazada_affiliate_id.is_none());
        assert!(env.has_affiliate_ids());
    }

    #[test]
    fn empty_values_count_as_unset() {
        let env = Environment::from_vars([("GEMINI_API_KEY", ""), ("TIKTOK_AFFILIATE_ID", "")]);
        assert!(env.api_key().is_none());
        assert!(!env.has_affiliate_ids());
    }

    #[test]
    fn model_defaults_when_unset() {
        assert_eq!(Environment::default().model_name(), "gemini-1.5-pro-latest");
        let env = Environment::from_vars([("GEMINI_MODEL", "gemini-2.0-flash")]);
        assert_eq!(env.model_name(), "gemini-2.0-flash");
    }
}
