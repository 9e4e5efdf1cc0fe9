//! Caller-supplied execution configuration
//!
//! [`ExecutionConfig`] overrides the default step ceilings, memory sizes and random
//! seed for a single run. It deserializes from camelCase JSON with every field
//! optional, so the surrounding application can pass through only what it wants to
//! change.

use crate::interpreter::constants::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Per-machine step ceilings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepLimits {
    pub tape: u64,
    pub grid: u64,
    pub bit_stream: u64,
    pub quote: u64,
}

impl Default for StepLimits {
    fn default() -> Self {
        StepLimits {
            tape: DEFAULT_TAPE_STEPS,
            grid: DEFAULT_GRID_STEPS,
            bit_stream: DEFAULT_BIT_STREAM_STEPS,
            quote: DEFAULT_QUOTE_STEPS,
        }
    }
}

/// Cooperative cancellation flag, checked wherever the step ceiling is checked
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Overrides for a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionConfig {
    /// Overrides every machine's step ceiling when set
    pub max_steps: Option<u64>,
    pub step_limits: StepLimits,
    pub tape_size: usize,
    pub max_stack_depth: usize,
    /// Seed for the grid machine's random turn; `None` uses OS entropy
    pub seed: Option<u64>,
    #[serde(skip)]
    pub cancel: CancelToken,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            max_steps: None,
            step_limits: StepLimits::default(),
            tape_size: DEFAULT_TAPE_SIZE,
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
            seed: None,
            cancel: CancelToken::default(),
        }
    }
}

/// Invalid configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u64 },

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExecutionConfig {
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tape_size(mut self, cells: usize) -> Self {
        self.tape_size = cells;
        self
    }

    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Parse a JSON document and validate it
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: ExecutionConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("maxSteps", self.max_steps.unwrap_or(1)),
            ("stepLimits.tape", self.step_limits.tape),
            ("stepLimits.grid", self.step_limits.grid),
            ("stepLimits.bitStream", self.step_limits.bit_stream),
            ("stepLimits.quote", self.step_limits.quote),
            ("tapeSize", self.tape_size as u64),
            ("maxStackDepth", self.max_stack_depth as u64),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        if self.tape_size > MAX_TAPE_SIZE {
            return Err(ConfigError::TooLarge {
                field: "tapeSize",
                max: MAX_TAPE_SIZE as u64,
            });
        }
        Ok(())
    }

    /// Effective ceiling for one machine
    pub fn step_limit(&self, per_machine: fn(&StepLimits) -> u64) -> u64 {
        self.max_steps.unwrap_or_else(|| per_machine(&self.step_limits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExecutionConfig::default();
        assert_eq!(config.tape_size, 30_000);
        assert_eq!(config.step_limit(|l| l.grid), 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ExecutionConfig::from_json(r#"{"seed": 7, "stepLimits": {"grid": 50}}"#)
            .expect("valid config");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.step_limits.grid, 50);
        assert_eq!(config.step_limits.tape, DEFAULT_TAPE_STEPS);
        assert_eq!(config.tape_size, DEFAULT_TAPE_SIZE);
    }

    #[test]
    fn test_max_steps_overrides_every_machine() {
        let config = ExecutionConfig::default().with_max_steps(12);
        assert_eq!(config.step_limit(|l| l.tape), 12);
        assert_eq!(config.step_limit(|l| l.quote), 12);
    }

    #[test]
    fn test_zero_tape_rejected() {
        let err = ExecutionConfig::from_json(r#"{"tapeSize": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Zero { field: "tapeSize" }));
    }

    #[test]
    fn test_oversized_tape_rejected() {
        let err = ExecutionConfig::from_json(r#"{"tapeSize": 18446744073709551615}"#).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { field: "tapeSize", .. }));

        let largest = format!(r#"{{"tapeSize": {}}}"#, MAX_TAPE_SIZE);
        assert!(ExecutionConfig::from_json(&largest).is_ok());
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let config = ExecutionConfig::default().with_cancel_token(token.clone());
        token.cancel();
        assert!(config.cancel.is_cancelled());
    }
}
