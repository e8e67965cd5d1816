use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::crypto::DEFAULT_ITERATIONS;

/// Application-level constants
pub const APP_NAME: &str = "Rokto Dan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://127.0.0.1:5500";
pub const DATABASE_FILE: &str = "rokto-dan.db";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "rokto_dan=info,tower_http=info"
}

/// Get the application data directory.
/// Falls back to the working directory when the platform has none.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rokto-dan")
}

pub fn default_database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "rokto-dan", about = "Blood donation coordination server", version)]
pub struct CliArgs {
    #[arg(
        long,
        env = "ROKTO_DAN_BIND",
        value_name = "ADDR",
        help = "Address the HTTP server listens on"
    )]
    pub bind: Option<SocketAddr>,

    #[arg(
        long,
        env = "ROKTO_DAN_DATABASE",
        value_name = "FILE",
        help = "SQLite database file"
    )]
    pub database: Option<PathBuf>,

    #[arg(
        long,
        env = "ROKTO_DAN_CORS_ORIGINS",
        value_name = "ORIGIN",
        value_delimiter = ',',
        help = "Comma-separated list of origins allowed by CORS"
    )]
    pub cors_origins: Option<Vec<String>>,

    #[arg(
        long,
        env = "ROKTO_DAN_PUBLIC_URL",
        value_name = "URL",
        help = "Base URL used in activation links"
    )]
    pub public_url: Option<String>,

    #[arg(
        long,
        env = "ROKTO_DAN_PASSWORD_ITERATIONS",
        value_name = "N",
        help = "PBKDF2 iterations for new password hashes",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub password_iterations: Option<u32>,
}

/// Resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub database: PathBuf,
    pub cors_origins: Vec<String>,
    pub public_url: String,
    pub password_iterations: u32,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let bind = match args.bind {
            Some(bind) => bind,
            None => DEFAULT_BIND
                .parse()
                .context("default bind address is invalid")?,
        };

        let cors_origins = args
            .cors_origins
            .unwrap_or_else(|| vec![DEFAULT_CORS_ORIGIN.to_string()])
            .into_iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let public_url = args
            .public_url
            .unwrap_or_else(|| format!("http://{bind}"))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            bind,
            database: args.database.unwrap_or_else(default_database_path),
            cors_origins,
            public_url,
            password_iterations: args.password_iterations.unwrap_or(DEFAULT_ITERATIONS),
        })
    }

    /// Fail fast on settings that would only surface at request time.
    pub fn validate(&self) -> Result<()> {
        for origin in &self.cors_origins {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                anyhow::bail!("CORS origin must be an http(s) URL: {origin}");
            }
        }
        if !(self.public_url.starts_with("http://") || self.public_url.starts_with("https://")) {
            anyhow::bail!("public URL must be an http(s) URL: {}", self.public_url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_ends_with_app_folder() {
        assert!(app_data_dir().ends_with("rokto-dan"));
        assert!(default_database_path().ends_with("rokto-dan/rokto-dan.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ServerConfig::from_args(CliArgs::default()).unwrap();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.cors_origins, vec![DEFAULT_CORS_ORIGIN.to_string()]);
        assert_eq!(config.public_url, "http://127.0.0.1:8000");
        assert_eq!(config.password_iterations, DEFAULT_ITERATIONS);
        config.validate().unwrap();
    }

    #[test]
    fn cli_flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "rokto-dan",
            "--bind",
            "0.0.0.0:9000",
            "--database",
            "/tmp/x.db",
            "--cors-origins",
            "http://a.test, https://b.test",
            "--public-url",
            "https://rokto.example/",
            "--password-iterations",
            "1000",
        ])
        .unwrap();
        let config = ServerConfig::from_args(args).unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.database, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.cors_origins, vec!["http://a.test", "https://b.test"]);
        assert_eq!(config.public_url, "https://rokto.example");
        assert_eq!(config.password_iterations, 1000);
    }

    #[test]
    fn validate_rejects_non_http_origin() {
        let mut config = ServerConfig::from_args(CliArgs::default()).unwrap();
        config.cors_origins = vec!["ftp://nope".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iterations_are_rejected() {
        assert!(CliArgs::try_parse_from(["rokto-dan", "--password-iterations", "0"]).is_err());
    }
}
