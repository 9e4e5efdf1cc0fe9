//! Resource governor consulted by every machine
//!
//! The governor is the single place that decides whether a program may take another
//! step, whether an index is inside a memory region, and whether an operand stack may
//! grow. Every machine reports "ran too long" through [`Governor::check_step`], so the
//! error is uniform across languages.

use crate::interpreter::config::CancelToken;
use crate::interpreter::errors::ErrorKind;

#[derive(Debug, Clone)]
pub struct Governor {
    step_limit: u64,
    max_stack_depth: usize,
    cancel: CancelToken,
}

impl Governor {
    pub fn new(step_limit: u64, max_stack_depth: usize, cancel: CancelToken) -> Self {
        Governor {
            step_limit,
            max_stack_depth: max_stack_depth.max(1),
            cancel,
        }
    }

    pub fn step_limit(&self) -> u64 {
        self.step_limit
    }

    /// Called before each step with the number of steps already executed
    pub fn check_step(&self, executed: u64) -> Result<(), ErrorKind> {
        if executed >= self.step_limit {
            return Err(ErrorKind::StepLimitExceeded {
                limit: self.step_limit,
            });
        }
        if self.cancel.is_cancelled() {
            return Err(ErrorKind::Cancelled);
        }
        Ok(())
    }

    /// Converts a signed index into a checked offset into a region of `size` entries
    pub fn check_bounds(&self, index: i64, size: usize, position: usize) -> Result<usize, ErrorKind> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < size)
            .ok_or(ErrorKind::PointerOutOfBounds { position })
    }

    /// Called before a push onto a stack currently holding `depth` entries
    pub fn check_push(&self, depth: usize, position: usize) -> Result<(), ErrorKind> {
        self.check_bounds(depth as i64, self.max_stack_depth, position)
            .map(|_| ())
    }
}
