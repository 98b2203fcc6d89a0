//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use bluff::{
    game::ChallengePolicy,
    room::{DeckPreset, RoomConfig},
};

/// Default bind address when neither a flag nor the environment sets one
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4000);

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus exporter bind address, if metrics are enabled
    pub metrics_bind: Option<SocketAddr>,
    /// Configuration applied to every room
    pub room: RoomConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `metrics_bind_override` - Optional metrics address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        metrics_bind_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            bind_override,
            metrics_bind_override,
        )
    }

    /// Like [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(
        lookup: F,
        bind_override: Option<SocketAddr>,
        metrics_bind_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Bind address: SERVER_BIND, then PORT on all interfaces
        let bind = match bind_override {
            Some(bind) => bind,
            None => match lookup("SERVER_BIND") {
                Some(value) => parse_var("SERVER_BIND", &value)?,
                None => match lookup("PORT") {
                    Some(value) => {
                        let port: u16 = parse_var("PORT", &value)?;
                        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
                    }
                    None => DEFAULT_BIND,
                },
            },
        };

        let metrics_bind = match metrics_bind_override {
            Some(addr) => Some(addr),
            None => lookup("METRICS_BIND")
                .map(|value| parse_var("METRICS_BIND", &value))
                .transpose()?,
        };

        // Room defaults
        let deck: DeckPreset = parse_or(&lookup, "DECK_PRESET", DeckPreset::Standard)?;
        let defaults = RoomConfig::default();
        let max_players = parse_or(&lookup, "ROOM_MAX_PLAYERS", defaults.max_players)?;
        let challenge_policy = if parse_or(&lookup, "STRICT_CHALLENGES", false)? {
            ChallengePolicy::Strict
        } else {
            ChallengePolicy::Lenient
        };

        Ok(ServerConfig {
            bind,
            metrics_bind,
            room: RoomConfig {
                deck: deck.into(),
                max_players,
                challenge_policy,
            },
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room.max_players == 0 {
            return Err(ConfigError::Invalid {
                var: "ROOM_MAX_PLAYERS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if Some(self.bind) == self.metrics_bind {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        self.room.validate().map_err(|reason| ConfigError::Invalid {
            var: "DECK_PRESET".to_string(),
            reason,
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("'{value}': {e}"),
    })
}

/// Helper to parse a variable with default fallback when unset
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => parse_var(key, &value),
        None => Ok(default),
    }
}
