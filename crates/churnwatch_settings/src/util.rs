use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or does not parse.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("Invalid value {:?} for {}: {}. Using default {}", raw, key, e, default);
            default
        }),
        Err(_) => default,
    }
}

pub(crate) fn env_string_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
