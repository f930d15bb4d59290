use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Health classification of an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentStatus {
    Working,
    Degraded,
    Down,
}

impl EnvironmentStatus {
    pub const ALL: [EnvironmentStatus; 3] = [Self::Working, Self::Degraded, Self::Down];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Degraded => "degraded",
            Self::Down => "down",
        }
    }

    /// Human-facing badge text
    pub fn label(&self) -> &'static str {
        match self {
            Self::Working => "Operational",
            Self::Degraded => "Degraded",
            Self::Down => "Down",
        }
    }
}

impl fmt::Display for EnvironmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid environment status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for EnvironmentStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "working" => Ok(Self::Working),
            "degraded" => Ok(Self::Degraded),
            "down" => Ok(Self::Down),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// One environment's status row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String, // IP address or URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub status: EnvironmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnvironment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub status: EnvironmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update. For optional columns the outer `Option` means
/// "field was sent" and the inner one is the new value (`None` clears it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateEnvironment {
    pub name: Option<Option<String>>,
    pub url: Option<String>,
    pub version: Option<Option<String>>,
    pub status: Option<EnvironmentStatus>,
    pub notes: Option<Option<String>>,
}

/// Empty strings are stored as NULL.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Generate a record id: `env-<unix millis>-<9 base36 chars>`
pub fn generate_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("env-{}-{}", millis, suffix)
}
