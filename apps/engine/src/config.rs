//! Engine configuration, read from the environment.

use std::ops::RangeInclusive;

use crate::errors::domain::DomainError;

/// Process-wide engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Room lifetime is drawn uniformly from this range, in hours.
    pub room_ttl_hours: RangeInclusive<i64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            room_ttl_hours: 12..=15,
        }
    }
}

impl EngineConfig {
    /// Read `ENGINE_ROOM_TTL_FROM` / `ENGINE_ROOM_TTL_TO` (hours), falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, DomainError> {
        let defaults = Self::default();
        let from = read_hours("ENGINE_ROOM_TTL_FROM")?.unwrap_or(*defaults.room_ttl_hours.start());
        let to = read_hours("ENGINE_ROOM_TTL_TO")?.unwrap_or(*defaults.room_ttl_hours.end());
        if from <= 0 || to < from {
            return Err(DomainError::config(format!(
                "invalid room TTL range {from}..={to}"
            )));
        }
        Ok(Self {
            room_ttl_hours: from..=to,
        })
    }
}

fn read_hours(var: &str) -> Result<Option<i64>, DomainError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| DomainError::config(format!("{var} must be an integer, got {raw:?}"))),
        Err(_) => Ok(None),
    }
}
