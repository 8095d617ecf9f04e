use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("a game needs at least one participant")]
    NoParticipants,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `0` disables the status API.
    pub http_port: u16,
    pub human_players: usize,
    pub ai_players: usize,
    /// Explicit role deck; `None` uses the default composition.
    pub roles: Option<Vec<String>>,
    pub hunter_enabled: bool,
    pub seed: Option<u64>,
    pub response_timeout: Option<Duration>,
    pub phase_pause: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            http_port: 8080,
            human_players: 8,
            ai_players: 0,
            roles: None,
            hunter_enabled: false,
            seed: None,
            response_timeout: None,
            phase_pause: Duration::from_millis(1000),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(None),
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = env::var("WEREWOLF_HOST").unwrap_or(defaults.host);
        let port = parse_var("WEREWOLF_PORT")?.unwrap_or(defaults.port);
        let http_port = parse_var("WEREWOLF_HTTP_PORT")?.unwrap_or(defaults.http_port);
        let human_players =
            parse_var("WEREWOLF_HUMAN_PLAYERS")?.unwrap_or(defaults.human_players);
        let ai_players = parse_var("WEREWOLF_AI_PLAYERS")?.unwrap_or(defaults.ai_players);
        let roles = env::var("WEREWOLF_ROLES")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.split(',').map(|r| r.trim().to_string()).collect());
        let hunter_enabled = env::var("WEREWOLF_HUNTER_ENABLED")
            .map(|v| v == "true")
            .unwrap_or(defaults.hunter_enabled);
        let seed = parse_var("WEREWOLF_SEED")?;
        let response_timeout = parse_var::<u64>("WEREWOLF_RESPONSE_TIMEOUT_SECONDS")?
            .map(Duration::from_secs);
        let phase_pause = parse_var::<u64>("WEREWOLF_PHASE_PAUSE_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.phase_pause);

        Ok(Self {
            host,
            port,
            http_port,
            human_players,
            ai_players,
            roles,
            hunter_enabled,
            seed,
            response_timeout,
            phase_pause,
        })
    }

    /// Run after every override has been applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_players() == 0 {
            return Err(ConfigError::NoParticipants);
        }
        Ok(())
    }

    pub fn total_players(&self) -> usize {
        self.human_players + self.ai_players
    }
}
