use std::env;

use crate::services::product_service::ProductPolicy;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///./inventory.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub enforce_unique_names: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let raw_url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let database_url = normalize_database_url(&raw_url)?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("APP_PORT")
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);
        let enforce_unique_names = match env::var("ENFORCE_UNIQUE_NAMES") {
            Ok(value) => parse_flag(&value).ok_or_else(|| {
                anyhow::anyhow!("ENFORCE_UNIQUE_NAMES must be a boolean, got '{value}'")
            })?,
            Err(_) => true,
        };
        Ok(Self {
            port,
            database_url,
            host,
            enforce_unique_names,
        })
    }

    pub fn product_policy(&self) -> ProductPolicy {
        ProductPolicy {
            enforce_unique_names: self.enforce_unique_names,
        }
    }
}

/// Rewrites SQLAlchemy-style SQLite URLs into the form the sqlx driver expects.
///
/// `sqlite:///relative.db` names a path relative to the working directory and
/// `sqlite:////abs/path.db` an absolute one. File databases get `mode=rwc` so
/// the file is created on first start.
pub fn normalize_database_url(url: &str) -> anyhow::Result<String> {
    let url = url.trim();
    if url.is_empty() {
        anyhow::bail!("DATABASE_URL is empty");
    }
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        return Ok(url.to_string());
    }
    if !url.starts_with("sqlite:") {
        anyhow::bail!("unsupported DATABASE_URL scheme: {url}");
    }
    if url.contains(":memory:") {
        return Ok(url.to_string());
    }

    let path = if let Some(rest) = url.strip_prefix("sqlite:///") {
        rest
    } else if let Some(rest) = url.strip_prefix("sqlite://") {
        rest
    } else {
        // `sqlite:path` without slashes
        &url["sqlite:".len()..]
    };

    if path.is_empty() || path.starts_with('?') {
        anyhow::bail!("DATABASE_URL is missing a database path: {url}");
    }
    if path.contains('?') {
        Ok(format!("sqlite://{path}"))
    } else {
        Ok(format!("sqlite://{path}?mode=rwc"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
