use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub stripe: StripeConfig,
    pub sanity: SanityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    #[serde(default = "default_stripe_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub success_url: String,
    #[serde(default)]
    pub cancel_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    #[serde(default = "default_sanity_api_version")]
    pub api_version: String,
    pub api_token: String,
    /// Overrides the derived `https://{project_id}.api.sanity.io` base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_stripe_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_sanity_api_version() -> String {
    "2024-01-01".to_string()
}

impl SanityConfig {
    pub fn api_base(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.api.sanity.io", self.project_id))
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Missing file falls back to environment variables and defaults.
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    // An empty webhook secret is reported as a config error
                    // per delivery, not a startup failure.
                    stripe: StripeConfig {
                        secret_key: get_env("STRIPE_SECRET_KEY").unwrap_or_default(),
                        webhook_secret: get_env("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
                        api_base: get_env("STRIPE_API_BASE")
                            .unwrap_or_else(default_stripe_api_base),
                        success_url: get_env("STRIPE_SUCCESS_URL").unwrap_or_default(),
                        cancel_url: get_env("STRIPE_CANCEL_URL").unwrap_or_default(),
                    },
                    sanity: SanityConfig {
                        project_id: get_env("SANITY_PROJECT_ID").unwrap_or_default(),
                        dataset: get_env("SANITY_DATASET")
                            .unwrap_or_else(|| "production".to_string()),
                        api_version: get_env("SANITY_API_VERSION")
                            .unwrap_or_else(default_sanity_api_version),
                        api_token: get_env("SANITY_API_TOKEN").unwrap_or_default(),
                        base_url: get_env("SANITY_BASE_URL"),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // Environment variables override file values.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT") {
            if let Ok(p) = v.parse() {
                config.server.port = p;
            }
        }
        if let Ok(v) = env::var("STRIPE_SECRET_KEY") {
            config.stripe.secret_key = v;
        }
        if let Ok(v) = env::var("STRIPE_WEBHOOK_SECRET") {
            config.stripe.webhook_secret = v;
        }
        if let Ok(v) = env::var("STRIPE_API_BASE") {
            config.stripe.api_base = v;
        }
        if let Ok(v) = env::var("STRIPE_SUCCESS_URL") {
            config.stripe.success_url = v;
        }
        if let Ok(v) = env::var("STRIPE_CANCEL_URL") {
            config.stripe.cancel_url = v;
        }
        if let Ok(v) = env::var("SANITY_PROJECT_ID") {
            config.sanity.project_id = v;
        }
        if let Ok(v) = env::var("SANITY_DATASET") {
            config.sanity.dataset = v;
        }
        if let Ok(v) = env::var("SANITY_API_VERSION") {
            config.sanity.api_version = v;
        }
        if let Ok(v) = env::var("SANITY_API_TOKEN") {
            config.sanity.api_token = v;
        }
        if let Ok(v) = env::var("SANITY_BASE_URL") {
            config.sanity.base_url = Some(v);
        }

        Ok(config)
    }
}
