use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub stripe: StripeConfig,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL used to build the Stripe success/cancel redirect targets.
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    pub secret_key: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// UTC hour of day at which the overdue-rental check runs.
    pub overdue_check_hour: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            overdue_check_hour: 9,
        }
    }
}

/// Seed manager account created at startup when both fields are set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub manager_email: String,
    #[serde(default)]
    pub manager_password: String,
}

fn default_currency() -> String {
    "usd".to_string()
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse {config_path}: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No config file: build everything from environment variables.
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                        public_url: get_env("SERVER_PUBLIC_URL")
                            .unwrap_or_else(|| "http://localhost:8080".to_string()),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    stripe: StripeConfig {
                        secret_key: get_env("STRIPE_SECRET_KEY").unwrap_or_default(),
                        currency: get_env("STRIPE_CURRENCY").unwrap_or_else(default_currency),
                    },
                    telegram: TelegramConfig {
                        bot_token: get_env("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
                        chat_id: get_env("TELEGRAM_CHAT_ID").unwrap_or_default(),
                    },
                    scheduler: SchedulerConfig {
                        overdue_check_hour: get_env_parse("OVERDUE_CHECK_HOUR", 9u32),
                    },
                    bootstrap: BootstrapConfig {
                        manager_email: get_env("BOOTSTRAP_MANAGER_EMAIL").unwrap_or_default(),
                        manager_password: get_env("BOOTSTRAP_MANAGER_PASSWORD").unwrap_or_default(),
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
        if let Ok(v) = env::var("SERVER_PUBLIC_URL") {
            config.server.public_url = v;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS") {
            if let Ok(mc) = v.parse() {
                config.database.max_connections = mc;
            }
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN") {
            if let Ok(n) = v.parse() {
                config.jwt.access_token_expires_in = n;
            }
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN") {
            if let Ok(n) = v.parse() {
                config.jwt.refresh_token_expires_in = n;
            }
        }
        if let Ok(v) = env::var("STRIPE_SECRET_KEY") {
            config.stripe.secret_key = v;
        }
        if let Ok(v) = env::var("STRIPE_CURRENCY") {
            config.stripe.currency = v;
        }
        if let Ok(v) = env::var("TELEGRAM_BOT_TOKEN") {
            config.telegram.bot_token = v;
        }
        if let Ok(v) = env::var("TELEGRAM_CHAT_ID") {
            config.telegram.chat_id = v;
        }
        if let Ok(v) = env::var("OVERDUE_CHECK_HOUR") {
            if let Ok(h) = v.parse() {
                config.scheduler.overdue_check_hour = h;
            }
        }
        if let Ok(v) = env::var("BOOTSTRAP_MANAGER_EMAIL") {
            config.bootstrap.manager_email = v;
        }
        if let Ok(v) = env::var("BOOTSTRAP_MANAGER_PASSWORD") {
            config.bootstrap.manager_password = v;
        }

        Ok(config)
    }
}
