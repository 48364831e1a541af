use std::{env, process};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub admin_key: String,
    pub server_addr: String,
    pub redis_url: Option<String>,
    pub links_prefix: String,
    pub assets_dir: String,
}

impl Config {
    pub fn load() -> Self {
        let admin_key = get_env("ADMIN_KEY");
        if admin_key.is_empty() {
            tracing::error!("ADMIN_KEY environment variable must not be empty.");
            process::exit(1);
        }
        let server_addr = get_env_or("SERVER_ADDRESS", "0.0.0.0:8080");
        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.is_empty());
        if redis_url.is_none() {
            tracing::warn!("REDIS_URL environment variable not set, links are kept in memory only");
        }
        let links_prefix = get_env_or("LINKS_PREFIX", "link:");
        let assets_dir = get_env_or("ASSETS_DIR", "public");
        Self {
            admin_key,
            server_addr,
            redis_url,
            links_prefix,
            assets_dir,
        }
    }
}

/// Logging settings are read before the subscriber exists, so they stay quiet.
pub struct LogConfig {
    pub format: LogFormat,
    pub dir: Option<String>,
}

impl LogConfig {
    pub fn load() -> Self {
        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let dir = env::var("LOG_DIR").ok().filter(|dir| !dir.is_empty());
        Self { format, dir }
    }
}

fn get_env(var: &str) -> String {
    env::var(var).unwrap_or_else(|_| {
        tracing::error!("{} environment variable is required but not set.", var);
        process::exit(1);
    })
}

fn get_env_or(var: &str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| {
        tracing::warn!(
            "{} environment variable not set, using default: {}",
            var,
            default
        );
        default.to_string()
    })
}
