//! Runtime configuration read from the environment (`.env` is loaded by `main`)

use anyhow::{bail, Context};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

use crate::booking::MultiplierPolicy;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the remote booking API, without trailing slash
    pub booking_api_url: String,
    pub booking_api_token: Option<String>,
    pub api_timeout: Duration,
    pub policy: MultiplierPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let booking_api_url = lookup("BOOKING_API_URL")
            .filter(|v| !v.trim().is_empty())
            .context("BOOKING_API_URL must be set")?
            .trim_end_matches('/')
            .to_string();

        let defaults = MultiplierPolicy::default();
        let policy = MultiplierPolicy {
            min_factor: parse_or(&lookup, "PRICE_MIN_FACTOR", defaults.min_factor)?,
            max_factor: parse_or(&lookup, "PRICE_MAX_FACTOR", defaults.max_factor)?,
            discount_unlock_items: parse_or(
                &lookup,
                "DISCOUNT_UNLOCK_ITEMS",
                defaults.discount_unlock_items,
            )?,
        };
        if policy.min_factor > policy.max_factor {
            bail!(
                "PRICE_MIN_FACTOR ({}) must not exceed PRICE_MAX_FACTOR ({})",
                policy.min_factor,
                policy.max_factor
            );
        }
        if policy.min_factor <= Decimal::ZERO {
            bail!("PRICE_MIN_FACTOR must be positive");
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            booking_api_url,
            booking_api_token: lookup("BOOKING_API_TOKEN").filter(|v| !v.is_empty()),
            api_timeout: Duration::from_secs(parse_or(
                &lookup,
                "BOOKING_API_TIMEOUT_SECS",
                DEFAULT_API_TIMEOUT_SECS,
            )?),
            policy,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {} ({})", key, raw, e)),
        None => Ok(default),
    }
}
