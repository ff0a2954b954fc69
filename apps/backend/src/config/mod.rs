//! Process configuration, read once from the environment at startup.

pub mod game;
pub mod server;

use std::env;
use std::str::FromStr;

use crate::error::AppError;

pub use game::GameConfig;
pub use server::ServerConfig;

fn from_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse `name` via `lookup`, falling back to `default` when unset.
fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            AppError::config(format!(
                "Environment variable '{name}' has invalid value '{raw}'"
            ))
        }),
    }
}
