use std::{env, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How checkout treats a cart line that asks for more than the product has in stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Abort the checkout and roll back when any line exceeds stock.
    #[default]
    Enforce,
    /// Decrement regardless; stock may go negative.
    Unchecked,
}

impl FromStr for StockPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enforce" => Ok(StockPolicy::Enforce),
            "unchecked" => Ok(StockPolicy::Unchecked),
            other => Err(anyhow::anyhow!(
                "invalid CHECKOUT_STOCK_POLICY {other:?}, expected enforce or unchecked"
            )),
        }
    }
}

const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 14;
const MAX_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 365 * 100;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub stock_policy: StockPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_ttl = match env::var("SESSION_TTL_SECS") {
            Ok(raw) => parse_session_ttl(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        };
        let stock_policy = match env::var("CHECKOUT_STOCK_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => StockPolicy::default(),
        };
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            session_ttl,
            stock_policy,
        })
    }
}

/// Session lifetime in whole seconds. It must be positive and small enough
/// that `now + ttl` stays a valid timestamp.
fn parse_session_ttl(raw: &str) -> anyhow::Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|err| anyhow::anyhow!("invalid SESSION_TTL_SECS {raw:?}: {err}"))?;
    if secs == 0 || secs > MAX_SESSION_TTL_SECS {
        anyhow::bail!("SESSION_TTL_SECS must be between 1 and {MAX_SESSION_TTL_SECS}, got {secs}");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ttl_accepts_whole_seconds() {
        assert_eq!(parse_session_ttl(" 3600 ").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn session_ttl_rejects_garbage_and_out_of_range_values() {
        assert!(parse_session_ttl("two weeks").is_err());
        assert!(parse_session_ttl("-5").is_err());
        assert!(parse_session_ttl("0").is_err());
        assert!(parse_session_ttl("9000000000000").is_err());
    }

    #[test]
    fn stock_policy_parses_case_insensitively() {
        assert_eq!("enforce".parse::<StockPolicy>().unwrap(), StockPolicy::Enforce);
        assert_eq!(" Unchecked ".parse::<StockPolicy>().unwrap(), StockPolicy::Unchecked);
    }

    #[test]
    fn stock_policy_rejects_unknown_values() {
        assert!("lenient".parse::<StockPolicy>().is_err());
    }

    #[test]
    fn stock_policy_defaults_to_enforce() {
        assert_eq!(StockPolicy::default(), StockPolicy::Enforce);
    }
}
