use std::{env, str::FromStr, time::Duration};

use crate::{
    constants::{
        DEFAULT_CELL_SIZE, DEFAULT_COLLECTIBLES, DEFAULT_COLS, DEFAULT_ENEMIES,
        DEFAULT_ENEMY_SPEED, DEFAULT_PLAYER_SPEED, DEFAULT_ROWS, END_TRANSITION_DELAY,
        MESSAGE_DURATION,
    },
    error::ConfigError,
    input::KeyBindings,
    maze::{MAX_DIMENSION, MIN_DIMENSION},
};

/// Everything a session needs to know up front. Passed in when the session
/// is built; nothing reads configuration from global state.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub cols: usize,
    pub rows: usize,
    pub cell_size: f32,
    pub collectibles: usize,
    pub enemies: usize,
    pub enemy_speed: f32,
    pub player_speed: f32,
    pub seed: Option<u64>,
    pub message_duration: Duration,
    pub end_transition_delay: Duration,
    pub key_bindings: KeyBindings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            cell_size: DEFAULT_CELL_SIZE,
            collectibles: DEFAULT_COLLECTIBLES,
            enemies: DEFAULT_ENEMIES,
            enemy_speed: DEFAULT_ENEMY_SPEED,
            player_speed: DEFAULT_PLAYER_SPEED,
            seed: None,
            message_duration: MESSAGE_DURATION,
            end_transition_delay: END_TRANSITION_DELAY,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl SessionConfig {
    /// Reads overrides from the environment, after loading a `.env` file if
    /// there is one.
    ///
    /// - `MAZE_COLS`, `MAZE_ROWS`, `MAZE_CELL_SIZE`
    /// - `MAZE_COLLECTIBLES`, `MAZE_ENEMIES`
    /// - `MAZE_ENEMY_SPEED`, `MAZE_PLAYER_SPEED`
    /// - `MAZE_SEED`
    /// - `MAZE_KEY_UP`, `MAZE_KEY_DOWN`, `MAZE_KEY_LEFT`, `MAZE_KEY_RIGHT`
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like `from_env`, with variables supplied by `lookup`. Missing or blank
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let key_bindings = KeyBindings {
            up: parse_key(&get, "MAZE_KEY_UP")?.unwrap_or(defaults.key_bindings.up),
            down: parse_key(&get, "MAZE_KEY_DOWN")?.unwrap_or(defaults.key_bindings.down),
            left: parse_key(&get, "MAZE_KEY_LEFT")?.unwrap_or(defaults.key_bindings.left),
            right: parse_key(&get, "MAZE_KEY_RIGHT")?.unwrap_or(defaults.key_bindings.right),
        };

        let config = Self {
            cols: parse(&get, "MAZE_COLS")?.unwrap_or(defaults.cols),
            rows: parse(&get, "MAZE_ROWS")?.unwrap_or(defaults.rows),
            cell_size: parse(&get, "MAZE_CELL_SIZE")?.unwrap_or(defaults.cell_size),
            collectibles: parse(&get, "MAZE_COLLECTIBLES")?.unwrap_or(defaults.collectibles),
            enemies: parse(&get, "MAZE_ENEMIES")?.unwrap_or(defaults.enemies),
            enemy_speed: parse(&get, "MAZE_ENEMY_SPEED")?.unwrap_or(defaults.enemy_speed),
            player_speed: parse(&get, "MAZE_PLAYER_SPEED")?.unwrap_or(defaults.player_speed),
            seed: parse(&get, "MAZE_SEED")?,
            key_bindings,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let allowed = MIN_DIMENSION..=MAX_DIMENSION;
        if !allowed.contains(&self.cols) || !allowed.contains(&self.rows) {
            return Err(ConfigError::InvalidDimensions {
                cols: self.cols,
                rows: self.rows,
            });
        }

        for (name, value) in [
            ("cell size", self.cell_size),
            ("enemy speed", self.enemy_speed),
            ("player speed", self.player_speed),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidSpeed { name, value });
            }
        }

        Ok(())
    }
}

fn parse<T, G>(get: &G, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
    }
}

fn parse_key<G>(get: &G, key: &str) -> Result<Option<char>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(value) = get(key) else {
        return Ok(None);
    };

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Some(c.to_ascii_uppercase())),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_classic_game() {
        let config = SessionConfig::default();

        assert_eq!((config.cols, config.rows), (30, 30));
        assert_eq!(config.cell_size, 40.0);
        assert_eq!(config.collectibles, 5);
        assert_eq!(config.enemies, 5);
        assert_eq!(config.seed, None);
        assert_eq!(config.key_bindings, KeyBindings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_and_blank_variables_keep_defaults() {
        let config =
            SessionConfig::from_lookup(lookup(&[("MAZE_COLS", "  ")])).expect("valid config");
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = SessionConfig::from_lookup(lookup(&[
            ("MAZE_COLS", "21"),
            ("MAZE_ROWS", "15"),
            ("MAZE_ENEMIES", "0"),
            ("MAZE_SEED", "42"),
            ("MAZE_KEY_UP", "w"),
        ]))
        .expect("valid config");

        assert_eq!((config.cols, config.rows), (21, 15));
        assert_eq!(config.enemies, 0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.key_bindings.up, 'W');
        assert_eq!(config.key_bindings.down, 'S');
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert_eq!(
            SessionConfig::from_lookup(lookup(&[("MAZE_SEED", "soon")])),
            Err(ConfigError::InvalidValue {
                key: "MAZE_SEED".to_string(),
                value: "soon".to_string(),
            })
        );
        assert!(SessionConfig::from_lookup(lookup(&[("MAZE_KEY_LEFT", "left")])).is_err());
    }

    #[test]
    fn oversized_or_tiny_grids_and_stalled_enemies_fail_validation() {
        assert_eq!(
            SessionConfig::from_lookup(lookup(&[("MAZE_COLS", "2")])),
            Err(ConfigError::InvalidDimensions { cols: 2, rows: 30 })
        );
        assert_eq!(
            SessionConfig::from_lookup(lookup(&[
                ("MAZE_COLS", "100000"),
                ("MAZE_ROWS", "100000"),
            ])),
            Err(ConfigError::InvalidDimensions {
                cols: 100_000,
                rows: 100_000,
            })
        );
        assert_eq!(
            SessionConfig::from_lookup(lookup(&[("MAZE_ENEMY_SPEED", "0")])),
            Err(ConfigError::InvalidSpeed {
                name: "enemy speed",
                value: 0.0,
            })
        );
    }
}
