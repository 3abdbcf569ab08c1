use crate::services::metrics_registry::MetricSetVersion;
use crate::services::snapshot_loader::SnapshotSource;
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Highest network prefix the SS58 two-byte encoding can carry.
pub const MAX_SS58_PREFIX: u16 = 16_383;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("either SNAPSHOT_PATH or PRIMARY_SNAPSHOT_URL must be set")]
    NoSnapshotSource,
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub db_name: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub snapshot_source: SnapshotSource,
    pub parallel_limit: usize,
    pub metric_set: MetricSetVersion,
    pub ss58_prefix: u16,
    pub emit_pool_details: bool,
    pub mongo: Option<MongoConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_source = match lookup("SNAPSHOT_PATH") {
            Some(path) => SnapshotSource::File(path.into()),
            None => SnapshotSource::Http {
                primary: lookup("PRIMARY_SNAPSHOT_URL").ok_or(ConfigError::NoSnapshotSource)?,
                secondary: lookup("SECONDARY_SNAPSHOT_URL"),
            },
        };

        let mongo = lookup("MONGO_URI").map(|uri| MongoConfig {
            uri,
            db_name: lookup("DB_NAME").unwrap_or_else(|| "staking_metrics".to_string()),
        });

        Ok(Self {
            snapshot_source,
            parallel_limit: parse_or(&lookup, "PARALLEL_LIMIT", 35)?,
            metric_set: parse_or(&lookup, "METRIC_SET_VERSION", MetricSetVersion::LATEST)?,
            ss58_prefix: ss58_prefix(&lookup)?,
            emit_pool_details: parse_or(&lookup, "EMIT_POOL_DETAILS", false)?,
            mongo,
        })
    }
}

fn ss58_prefix<F>(lookup: &F) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = parse_or(lookup, "SS58_PREFIX", 0u16)?;
    if prefix > MAX_SS58_PREFIX {
        return Err(ConfigError::Invalid {
            key: "SS58_PREFIX",
            value: prefix.to_string(),
            reason: format!("SS58 prefixes range from 0 to {}", MAX_SS58_PREFIX),
        });
    }
    Ok(prefix)
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: ToString,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        },
    }
}
