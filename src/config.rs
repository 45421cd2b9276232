use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub secret_key: String,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub mail_username: String,
    pub mail_password: String,
    pub smtp_relay: String,
    pub catalog_path: PathBuf,
    pub admin_password: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "10000"),
            secret_key: try_load("SECRET_KEY", "default_secret"),
            openai_api_key: try_load("OPENAI_API_KEY", ""),
            openai_api_base: try_load("OPENAI_API_BASE", "https://api.openai.com/v1"),
            mail_username: try_load("MAIL_USERNAME", ""),
            mail_password: try_load("MAIL_PASSWORD", ""),
            smtp_relay: try_load("SMTP_RELAY", "smtp.gmail.com"),
            catalog_path: try_load("CATALOG_PATH", "products.json"),
            admin_password: try_load("ADMIN_PASSWORD", "1234"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
