//! Operand stack bounded by the governor
//!
//! Every push is checked against the governor's depth ceiling; a push past it is a
//! pointer-out-of-bounds error at the pushing instruction. What an empty pop means is
//! left to each machine: the grid machine reads zero, the bit-stream machine faults,
//! and the quote machine treats the operand as missing.

use crate::interpreter::errors::ErrorKind;
use crate::interpreter::governor::Governor;

#[derive(Debug, Clone)]
pub struct OperandStack<T> {
    items: Vec<T>,
}

impl<T> OperandStack<T> {
    pub fn new() -> Self {
        OperandStack { items: Vec::new() }
    }

    pub fn push(&mut self, value: T, governor: &Governor, position: usize) -> Result<(), ErrorKind> {
        governor.check_push(self.items.len(), position)?;
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swap the top two entries; no-op with fewer than two
    pub fn swap_top(&mut self) {
        let n = self.items.len();
        if n >= 2 {
            self.items.swap(n - 1, n - 2);
        }
    }

    /// Move the third entry to the top; no-op with fewer than three
    pub fn rotate_top(&mut self) {
        let n = self.items.len();
        if n >= 3 {
            let third = self.items.remove(n - 3);
            self.items.push(third);
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for OperandStack<T> {
    fn default() -> Self {
        Self::new()
    }
}
