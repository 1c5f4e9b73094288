use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::info;

pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub sweep_interval: Duration,
    pub inactivity_threshold: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("BATEPAPO_PORT").or_else(|_| env::var("PORT")) {
            Ok(raw) => raw.parse().with_context(|| format!("invalid port '{raw}'"))?,
            Err(_) => 5000,
        };

        let sweep_secs: u64 = load("BATEPAPO_SWEEP_INTERVAL_SECS", 15)?;
        if sweep_secs == 0 {
            bail!("BATEPAPO_SWEEP_INTERVAL_SECS must be at least 1");
        }

        Ok(Self {
            db_path: env::var("BATEPAPO_DB_PATH")
                .unwrap_or_else(|_| "batepapo.db".into())
                .into(),
            host: env::var("BATEPAPO_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            sweep_interval: Duration::from_secs(sweep_secs),
            inactivity_threshold: Duration::from_secs(load("BATEPAPO_INACTIVITY_SECS", 10)?),
        })
    }
}

fn load<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid {key} value '{raw}'")),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
