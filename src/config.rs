use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::round::GameKind;

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_SCORES_PATH: &str = "data/scores.json";
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CONTENT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_TRIVIA_INTERVAL_MINS: u64 = 60;

const MAX_CONTENT_TIMEOUT_SECS: u64 = 60;
const MAX_ROUND_SECS: u64 = 24 * 60 * 60;
const MAX_TRIVIA_INTERVAL_MINS: u64 = 7 * 24 * 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Periodic trivia posted without anyone asking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaSchedule {
    pub channel_id: u64,
    pub interval: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub command_prefix: String,
    pub scores_path: PathBuf,
    pub http_addr: SocketAddr,
    pub riddle_api_key: Option<String>,
    pub content_timeout: Duration,
    pub trivia_schedule: Option<TriviaSchedule>,
    round_durations: HashMap<GameKind, Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let discord_token = var("DISCORD_TOKEN")
            .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_TOKEN".to_string()))?;

        let http_addr: SocketAddr =
            parse_or("HTTP_ADDR", var("HTTP_ADDR"), DEFAULT_HTTP_ADDR.parse().ok())?;
        let content_timeout = Duration::from_secs(parse_bounded(
            "CONTENT_TIMEOUT_SECS",
            var("CONTENT_TIMEOUT_SECS"),
            DEFAULT_CONTENT_TIMEOUT_SECS,
            MAX_CONTENT_TIMEOUT_SECS,
        )?);

        let mut round_durations = HashMap::new();
        for kind in GameKind::iter() {
            let name = format!("{}_SECS", kind.to_string().to_uppercase());
            let secs = parse_bounded(
                &name,
                var(&name),
                kind.default_duration().as_secs(),
                MAX_ROUND_SECS,
            )?;
            round_durations.insert(kind, Duration::from_secs(secs));
        }

        let trivia_schedule = match var("TRIVIA_CHANNEL_ID") {
            Some(raw) => {
                let channel_id: u64 = parse_or("TRIVIA_CHANNEL_ID", Some(raw), None)?;
                if channel_id == 0 {
                    return Err(invalid("TRIVIA_CHANNEL_ID", "0"));
                }
                let minutes = parse_bounded(
                    "TRIVIA_INTERVAL_MINS",
                    var("TRIVIA_INTERVAL_MINS"),
                    DEFAULT_TRIVIA_INTERVAL_MINS,
                    MAX_TRIVIA_INTERVAL_MINS,
                )?;
                let secs = minutes
                    .checked_mul(60)
                    .ok_or_else(|| invalid("TRIVIA_INTERVAL_MINS", &minutes.to_string()))?;
                Some(TriviaSchedule {
                    channel_id,
                    interval: Duration::from_secs(secs),
                })
            }
            None => None,
        };

        Ok(Self {
            discord_token,
            command_prefix: var("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            scores_path: var("SCORES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES_PATH)),
            http_addr,
            riddle_api_key: var("RIDDLE_API_KEY"),
            content_timeout,
            trivia_schedule,
            round_durations,
        })
    }

    /// How long a round of `kind` stays open
    pub fn round_duration(&self, kind: GameKind) -> Duration {
        self.round_durations
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_duration())
    }
}

fn invalid(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn parse_or<T: FromStr>(
    name: &str,
    raw: Option<String>,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(name, &raw)),
        None => default.ok_or_else(|| ConfigError::MissingEnvVar(name.to_string())),
    }
}

/// A whole number in `1..=max`, or `default` when unset
fn parse_bounded(
    name: &str,
    raw: Option<String>,
    default: u64,
    max: u64,
) -> Result<u64, ConfigError> {
    let value: u64 = parse_or(name, raw, Some(default))?;
    if value == 0 || value > max {
        return Err(invalid(name, &value.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn token_is_required() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::MissingEnvVar("DISCORD_TOKEN".to_string())
        );
        assert!(config_from(&[("DISCORD_TOKEN", "  ")]).is_err());
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("DISCORD_TOKEN", "token")]).unwrap();
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.scores_path, PathBuf::from("data/scores.json"));
        assert_eq!(config.http_addr.port(), 3000);
        assert_eq!(config.content_timeout, Duration::from_secs(5));
        assert_eq!(config.riddle_api_key, None);
        assert_eq!(config.trivia_schedule, None);
        for kind in GameKind::iter() {
            assert_eq!(config.round_duration(kind), kind.default_duration());
        }
    }

    #[test]
    fn overrides_apply() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "token"),
            ("COMMAND_PREFIX", "?"),
            ("TYPING_SECS", "45"),
            ("RIDDLE_API_KEY", "secret"),
            ("TRIVIA_CHANNEL_ID", "1234"),
            ("TRIVIA_INTERVAL_MINS", "30"),
        ])
        .unwrap();

        assert_eq!(config.command_prefix, "?");
        assert_eq!(config.round_duration(GameKind::Typing), Duration::from_secs(45));
        assert_eq!(config.riddle_api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.trivia_schedule,
            Some(TriviaSchedule {
                channel_id: 1234,
                interval: Duration::from_secs(30 * 60),
            })
        );
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "t"), ("TRIVIA_SECS", "soon")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "t"), ("RIDDLE_SECS", "0")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "t"), ("HTTP_ADDR", "nowhere")]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[rstest]
    #[case("TRIVIA_INTERVAL_MINS", "18446744073709551615")]
    #[case("TRIVIA_INTERVAL_MINS", "307445734561825861")]
    #[case("TRIVIA_INTERVAL_MINS", "0")]
    #[case("TRIVIA_INTERVAL_MINS", "10081")]
    #[case("TRIVIA_SECS", "18446744073709551615")]
    #[case("SONG_SECS", "86401")]
    #[case("CONTENT_TIMEOUT_SECS", "0")]
    #[case("CONTENT_TIMEOUT_SECS", "3600")]
    fn rejects_out_of_range_values(#[case] name: &str, #[case] value: &str) {
        let result = config_from(&[
            ("DISCORD_TOKEN", "t"),
            ("TRIVIA_CHANNEL_ID", "1234"),
            (name, value),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            }
        );
    }

    #[test]
    fn accepts_upper_limits() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "t"),
            ("TRIVIA_CHANNEL_ID", "1234"),
            ("TRIVIA_INTERVAL_MINS", "10080"),
            ("RIDDLE_SECS", "86400"),
        ])
        .unwrap();
        assert_eq!(
            config.trivia_schedule.as_ref().unwrap().interval,
            Duration::from_secs(7 * 24 * 60 * 60)
        );
        assert_eq!(config.round_duration(GameKind::Riddle), Duration::from_secs(86400));
    }
}
