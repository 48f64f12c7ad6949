//! Session engine configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for session actors and the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Capacity of each session actor's command inbox
    pub inbox_capacity: usize,

    /// How many codes `create` draws before accepting a collision
    pub max_code_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: 64,
            max_code_attempts: 8,
        }
    }
}

impl SessionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.inbox_capacity == 0 {
            return Err("Session inbox capacity must be greater than 0".to_string());
        }

        if self.max_code_attempts == 0 {
            return Err("Session code attempts must be at least 1".to_string());
        }

        Ok(())
    }
}
