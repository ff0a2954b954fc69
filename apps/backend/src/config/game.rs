use std::time::Duration;

use super::{from_env, parse_or};
use crate::domain::dealing::DECK_SIZE;
use crate::domain::rules::{DEFAULT_CARDS_PER_PLAYER, DEFAULT_MAX_ROUNDS};
use crate::error::AppError;

pub const DEFAULT_QUEUE_CAPACITY: usize = 32;
pub const DEFAULT_IDLE_SESSION_SECS: u64 = 300;

/// Per-session game and queue settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub max_rounds: u8,
    pub cards_per_player: u8,
    /// Capacity of the session's inbound action queue.
    pub input_queue: usize,
    /// Capacity of the session's outbound event queue.
    pub output_queue: usize,
    /// Capacity of each player's delivery queue.
    pub player_queue: usize,
    /// Fixed RNG seed; `None` seeds each game from the OS.
    pub seed: Option<u64>,
    /// A session still empty this long after creation is closed.
    pub idle_session_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            cards_per_player: DEFAULT_CARDS_PER_PLAYER,
            input_queue: DEFAULT_QUEUE_CAPACITY,
            output_queue: DEFAULT_QUEUE_CAPACITY,
            player_queue: DEFAULT_QUEUE_CAPACITY,
            seed: None,
            idle_session_secs: DEFAULT_IDLE_SESSION_SECS,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(from_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cfg = Self {
            max_rounds: parse_or(&lookup, "JUDGEMENT_MAX_ROUNDS", DEFAULT_MAX_ROUNDS)?,
            cards_per_player: parse_or(
                &lookup,
                "JUDGEMENT_CARDS_PER_PLAYER",
                DEFAULT_CARDS_PER_PLAYER,
            )?,
            input_queue: parse_or(&lookup, "JUDGEMENT_INPUT_QUEUE", DEFAULT_QUEUE_CAPACITY)?,
            output_queue: parse_or(&lookup, "JUDGEMENT_OUTPUT_QUEUE", DEFAULT_QUEUE_CAPACITY)?,
            player_queue: parse_or(&lookup, "JUDGEMENT_PLAYER_QUEUE", DEFAULT_QUEUE_CAPACITY)?,
            seed: match lookup("JUDGEMENT_SEED") {
                None => None,
                Some(_) => Some(parse_or(&lookup, "JUDGEMENT_SEED", 0u64)?),
            },
            idle_session_secs: parse_or(
                &lookup,
                "JUDGEMENT_IDLE_SESSION_SECS",
                DEFAULT_IDLE_SESSION_SECS,
            )?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_rounds == 0 {
            return Err(AppError::config("JUDGEMENT_MAX_ROUNDS must be at least 1"));
        }
        if self.cards_per_player == 0 || self.cards_per_player as usize > DECK_SIZE {
            return Err(AppError::config(format!(
                "JUDGEMENT_CARDS_PER_PLAYER must be between 1 and {DECK_SIZE}"
            )));
        }
        if self.input_queue == 0 || self.output_queue == 0 || self.player_queue == 0 {
            return Err(AppError::config("queue capacities must be at least 1"));
        }
        if self.idle_session_secs == 0 {
            return Err(AppError::config("JUDGEMENT_IDLE_SESSION_SECS must be at least 1"));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn idle_session(&self) -> Duration {
        Duration::from_secs(self.idle_session_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_classic_table() {
        let cfg = GameConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.max_rounds, 14);
        assert_eq!(cfg.cards_per_player, 7);
        assert_eq!(cfg.input_queue, 32);
        assert_eq!(cfg.output_queue, 32);
        assert_eq!(cfg.player_queue, 32);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.idle_session(), Duration::from_secs(300));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = GameConfig::from_lookup(lookup(&[
            ("JUDGEMENT_MAX_ROUNDS", "3"),
            ("JUDGEMENT_CARDS_PER_PLAYER", "2"),
            ("JUDGEMENT_PLAYER_QUEUE", "4"),
            ("JUDGEMENT_SEED", "42"),
            ("JUDGEMENT_IDLE_SESSION_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(cfg.max_rounds, 3);
        assert_eq!(cfg.cards_per_player, 2);
        assert_eq!(cfg.player_queue, 4);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.idle_session_secs, 30);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for vars in [
            [("JUDGEMENT_MAX_ROUNDS", "0")],
            [("JUDGEMENT_CARDS_PER_PLAYER", "53")],
            [("JUDGEMENT_INPUT_QUEUE", "0")],
            [("JUDGEMENT_OUTPUT_QUEUE", "lots")],
            [("JUDGEMENT_IDLE_SESSION_SECS", "0")],
        ] {
            let err = GameConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(matches!(err, AppError::Config { .. }), "{vars:?}");
        }
    }
}
