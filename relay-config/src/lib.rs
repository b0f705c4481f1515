//! Loader for relay service configuration: optional YAML file + environment overlays.
//!
//! Precedence, lowest first:
//!
//! 1. field defaults on [`RelayConfig`]
//! 2. YAML (a file via [`RelayConfigLoader::with_file`] /
//!    [`RelayConfigLoader::with_optional_file`], or inline via
//!    [`RelayConfigLoader::with_yaml_str`])
//! 3. the plain environment names the services have always used
//!    (`OPENAI_API_KEY`, `OPENAI_MODEL`, `LOG_LEVEL`, `HOST`, `PORT`, `TG_KEY`,
//!    `OPEN_ROUTER_KEY`, ...; see [`KNOWN_ENV_KEYS`])
//! 4. `RELAY__<FIELD>` overrides, e.g. `RELAY__PORT=9000`
//!
//! `${VAR}` placeholders inside string values are expanded after merging.
//! Everything is read once, at process start.
use config::{Config, ConfigError, Environment, File};
use relay_common::LlmConfig;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "RELAY";

/// Unprefixed environment variables picked up by the loader.
pub const KNOWN_ENV_KEYS: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENAI_MODEL",
    "OPENAI_BASE_URL",
    "LOG_LEVEL",
    "HOST",
    "PORT",
    "TG_KEY",
    "OPEN_ROUTER_KEY",
    "OPEN_ROUTER_MODEL",
    "OPEN_ROUTER_BASE_URL",
    "BOT_SYSTEM_PROMPT",
    "PRICE_SOURCE_URL",
];

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPEN_ROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1/";
pub const DEFAULT_PRICE_SOURCE_URL: &str =
    "https://index.minfin.com.ua/ua/markets/wares/prods/fruits-vegetables/vegetables/";
pub const DEFAULT_BOT_SYSTEM_PROMPT: &str = "Ти — бот, який відповідає на запитання жартами. \
Але відповідай на запитання серйозно, якщо це потрібно. Ти можеш жартувати про себе.";

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Credential for the analyze API; blank or absent means "not configured".
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_model")]
    pub openai_model: String,
    /// Override for OpenAI-compatible gateways; `None` uses api.openai.com.
    #[serde(default)]
    pub openai_base_url: Option<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port; each service falls back to its own default when unset.
    #[serde(default, deserialize_with = "port_from_any")]
    pub port: Option<u16>,

    /// Telegram Bot API token.
    #[serde(default)]
    pub tg_key: Option<String>,
    #[serde(default)]
    pub open_router_key: Option<String>,
    #[serde(default = "default_model")]
    pub open_router_model: String,
    #[serde(default = "default_open_router_base_url")]
    pub open_router_base_url: String,
    #[serde(default = "default_bot_system_prompt")]
    pub bot_system_prompt: String,

    #[serde(default = "default_price_source_url")]
    pub price_source_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: default_model(),
            openai_base_url: None,
            log_level: default_log_level(),
            host: default_host(),
            port: None,
            tg_key: None,
            open_router_key: None,
            open_router_model: default_model(),
            open_router_base_url: default_open_router_base_url(),
            bot_system_prompt: default_bot_system_prompt(),
            price_source_url: default_price_source_url(),
        }
    }
}

impl RelayConfig {
    /// LLM used by the analyze API.
    pub fn analyze_llm(&self) -> LlmConfig {
        LlmConfig::from_optional_key(
            self.openai_api_key.as_deref(),
            &self.openai_model,
            self.openai_base_url.as_deref(),
        )
    }

    /// LLM used by the chat relay bot.
    pub fn bot_llm(&self) -> LlmConfig {
        LlmConfig::from_optional_key(
            self.open_router_key.as_deref(),
            &self.open_router_model,
            Some(&self.open_router_base_url),
        )
    }

    pub fn telegram_token(&self) -> Option<&str> {
        self.tg_key
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// `host:port`, using `default_port` when no port was configured.
    pub fn bind_addr(&self, default_port: u16) -> String {
        format!("{}:{}", self.host, self.port.unwrap_or(default_port))
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_open_router_base_url() -> String {
    DEFAULT_OPEN_ROUTER_BASE_URL.into()
}
fn default_bot_system_prompt() -> String {
    DEFAULT_BOT_SYSTEM_PROMPT.into()
}
fn default_price_source_url() -> String {
    DEFAULT_PRICE_SOURCE_URL.into()
}

// Environment values arrive as strings, YAML values as numbers.
fn port_from_any<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPort {
        Number(u16),
        Text(String),
    }

    match Option::<RawPort>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawPort::Number(n)) => Ok(Some(n)),
        Some(RawPort::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawPort::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid port {s:?}: {e}"))),
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn known_env() -> config::Map<String, String> {
    KNOWN_ENV_KEYS
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|val| (key.to_string(), val)))
        .collect()
}

/// Builder hiding the `config` crate wiring (YAML + env overlays).
pub struct RelayConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for RelayConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayConfigLoader {
    /// Start with no file sources; the environment is layered on in [`Self::load`].
    ///
    /// ```
    /// use relay_config::RelayConfigLoader;
    ///
    /// let config = RelayConfigLoader::new()
    ///     .with_yaml_str("price_source_url: https://prices.example.com/vegetables/")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.price_source_url, "https://prices.example.com/vegetables/");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, so env-only deployments keep working.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Layer the environment on top, expand `${VAR}` placeholders and decode.
    ///
    /// ```
    /// use relay_config::RelayConfigLoader;
    ///
    /// unsafe { std::env::set_var("RELAY_DOC_KEY", "sk-from-env"); }
    ///
    /// let config = RelayConfigLoader::new()
    ///     .with_yaml_str(r#"openai_api_key: "${RELAY_DOC_KEY}""#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert!(config.analyze_llm().is_configured());
    ///
    /// unsafe { std::env::remove_var("RELAY_DOC_KEY"); }
    /// ```
    pub fn load(self) -> Result<RelayConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::default().source(Some(known_env())))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
