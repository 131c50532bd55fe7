use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::error::AppError;

pub const SAMPLE_SEED_VAR: &str = "DATATOOLS_SAMPLE_SEED";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Fixed seed for the value sampler. `None` draws a fresh seed per call.
    pub sample_seed: Option<u64>,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let sample_seed = match std::env::var(SAMPLE_SEED_VAR) {
            Ok(raw) => Some(parse_seed(&raw)?),
            Err(_) => None,
        };

        Ok(Config { sample_seed })
    }

    pub fn with_seed(seed: u64) -> Self {
        Config {
            sample_seed: Some(seed),
        }
    }
}

pub fn load_config() -> Result<Config> {
    Config::new()
}

fn parse_seed(raw: &str) -> Result<u64, AppError> {
    raw.trim().parse::<u64>().map_err(|e| {
        AppError::Config(format!("Failed to parse {}={:?}: {}", SAMPLE_SEED_VAR, raw, e))
    })
}
