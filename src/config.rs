// config.rs
use std::env;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::models::agentmodel::AgentContact;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    // minutes
    pub jwt_maxage: i64,
    pub port: u16,
    pub log_level: LevelFilter,
    pub allowed_origins: Vec<String>,
    // Object storage (Supabase-compatible REST)
    pub storage_url: String,
    pub storage_service_key: String,
    pub property_image_bucket: String,
    pub agent_image_bucket: String,
    pub analytics_url: Option<String>,
    pub static_dir: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub default_agent: AgentContact,
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;
        let jwt_maxage = parsed("JWT_MAXAGE", 60_i64)?;
        let port = parsed("PORT", 8000_u16)?;
        let log_level = parsed("LOG_LEVEL", LevelFilter::DEBUG)?;

        let allowed_origins = optional("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]);

        let storage_url = required("STORAGE_URL")?
            .trim_end_matches('/')
            .to_string();
        let storage_service_key = required("STORAGE_SERVICE_KEY")?;

        // Contact shown for listings without an assigned agent
        let default_agent = AgentContact {
            name: optional("DEFAULT_AGENT_NAME").unwrap_or_else(|| "Sales Office".to_string()),
            company: optional("DEFAULT_AGENT_COMPANY")
                .unwrap_or_else(|| "Faisal Town Properties".to_string()),
            phone: optional("DEFAULT_AGENT_PHONE").unwrap_or_else(|| "+923331234567".to_string()),
            whatsapp: optional("DEFAULT_AGENT_WHATSAPP")
                .unwrap_or_else(|| "923331234567".to_string()),
            image_url: optional("DEFAULT_AGENT_IMAGE_URL"),
        };

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_maxage,
            port,
            log_level,
            allowed_origins,
            storage_url,
            storage_service_key,
            property_image_bucket: optional("PROPERTY_IMAGE_BUCKET")
                .unwrap_or_else(|| "property-images".to_string()),
            agent_image_bucket: optional("AGENT_IMAGE_BUCKET")
                .unwrap_or_else(|| "agent-images".to_string()),
            analytics_url: optional("ANALYTICS_URL"),
            static_dir: optional("STATIC_DIR"),
            admin_email: optional("ADMIN_EMAIL"),
            admin_password: optional("ADMIN_PASSWORD"),
            default_agent,
        })
    }
}
