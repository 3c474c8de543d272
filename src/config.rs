//! Service configuration, read from the environment
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub kafka_brokers: String,
    pub notification_topic: String,
    pub notification_topic_partitions: i32,
    pub notification_topic_replication: i32,
    pub finalize_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let finalize_interval_secs: u64 = parse_or(&lookup, "FINALIZE_INTERVAL_SECS", 60)?;
        if finalize_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "FINALIZE_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            kafka_brokers: lookup("KAFKA_BROKERS").unwrap_or_else(|| "localhost:9092".to_string()),
            notification_topic: lookup("NOTIFICATION_TOPIC")
                .unwrap_or_else(|| "auction-winners".to_string()),
            notification_topic_partitions: parse_or(&lookup, "NOTIFICATION_TOPIC_PARTITIONS", 1)?,
            notification_topic_replication: parse_or(&lookup, "NOTIFICATION_TOPIC_REPLICATION", 1)?,
            finalize_interval: Duration::from_secs(finalize_interval_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
