use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::blockchain::DEFAULT_DIFFICULTY;

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: usize,
    pub peer_timeout: Duration,
    pub reward_receiver: String,
    pub reward_amount: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            difficulty: DEFAULT_DIFFICULTY,
            peer_timeout: Duration::from_secs(5),
            reward_receiver: "miner".to_string(),
            reward_amount: 1.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port),
            difficulty: parse_var_where("DIFFICULTY", defaults.difficulty, |d| *d > 0),
            peer_timeout: Duration::from_secs(parse_var(
                "PEER_TIMEOUT_SECS",
                defaults.peer_timeout.as_secs(),
            )),
            reward_receiver: env::var("MINER_REWARD_RECEIVER")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.reward_receiver),
            // NaN and infinities serialize as JSON null, which peers cannot decode
            reward_amount: parse_var_where("MINER_REWARD_AMOUNT", defaults.reward_amount, |a| {
                a.is_finite()
            }),
        }
    }
}

/// Parse `key` from the environment, keeping `default` when unset or garbage.
fn parse_var<T: FromStr + Copy + Display>(key: &str, default: T) -> T {
    parse_var_where(key, default, |_| true)
}

/// Like [`parse_var`], but a parsed value failing `valid` also falls back.
fn parse_var_where<T: FromStr + Copy + Display>(
    key: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T {
    parse_value(key, env::var(key).ok().as_deref(), default, valid)
}

fn parse_value<T: FromStr + Copy + Display>(
    key: &str,
    raw: Option<&str>,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            warn!("CONFIG - {key}={raw:?} is not valid, using {default}");
            default
        }
    }
}
