use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Source of raw environment values, keyed by variable name.
pub trait EnvLookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Raw value with surrounding whitespace removed; blank values count as unset.
pub fn non_blank_var(env: &impl EnvLookup, name: &str) -> Option<String> {
    env.lookup(name).and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn parse_var<T: FromStr>(env: &impl EnvLookup, name: &str) -> Option<T> {
    non_blank_var(env, name).and_then(|raw| raw.parse().ok())
}

pub fn path_var(env: &impl EnvLookup, name: &str) -> Option<PathBuf> {
    non_blank_var(env, name).map(PathBuf::from)
}

/// Durations are written the humantime way (`10s`, `1m 30s`, `250ms`).
/// A bare integer is taken as whole seconds.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let trimmed = raw.trim();
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    humantime::parse_duration(trimmed).ok()
}

pub fn duration_var(env: &impl EnvLookup, name: &str) -> Option<Duration> {
    non_blank_var(env, name).and_then(|raw| parse_duration(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn durations_accept_plain_seconds_and_units() {
        assert_eq!(parse_duration("12"), Some(Duration::from_secs(12)));
        assert_eq!(parse_duration("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("1m 30s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn blank_values_are_unset() {
        let lookup = env(&[("A", "   "), ("B", " 42 ")]);
        assert_eq!(non_blank_var(&lookup, "A"), None);
        assert_eq!(parse_var::<u32>(&lookup, "B"), Some(42));
        assert_eq!(parse_var::<u32>(&lookup, "C"), None);
    }
}
