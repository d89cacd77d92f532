use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_FILTER: &str = "info";
const DEFAULT_LOG_FILE: &str = "logs/posesync.log";

/// Logging settings, read from `RUST_LOG` and `RUST_LOG_FILE`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub filter: String,
    pub file: PathBuf,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            file: lookup("RUST_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Native demo loop settings (`POSESYNC_FRAMES`, `POSESYNC_FRAME_MS`).
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub frames: u64,
    pub frame_interval: Duration,
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let frames = parse_or("POSESYNC_FRAMES", lookup("POSESYNC_FRAMES"), 240u64);
        let frame_ms = parse_or("POSESYNC_FRAME_MS", lookup("POSESYNC_FRAME_MS"), 16u64);
        Self {
            frames,
            frame_interval: Duration::from_millis(frame_ms),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "invalid setting, using default");
            default
        }),
    }
}
