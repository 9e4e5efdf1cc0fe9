//! Byte tape for the tape machine
//!
//! Cells are `u8` and all arithmetic wraps modulo 256. Pointer movement wraps
//! circularly: stepping right off the last cell lands on cell 0 and stepping left
//! off cell 0 lands on the last cell. This policy is fixed for every program.

use crate::interpreter::constants::MAX_TAPE_SIZE;

#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Tape {
    /// Size is clamped to `1..=MAX_TAPE_SIZE`
    pub fn new(size: usize) -> Self {
        Tape {
            cells: vec![0; size.clamp(1, MAX_TAPE_SIZE)],
            pointer: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn move_right(&mut self) {
        self.pointer = (self.pointer + 1) % self.cells.len();
    }

    pub fn move_left(&mut self) {
        self.pointer = self
            .pointer
            .checked_sub(1)
            .unwrap_or(self.cells.len() - 1);
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1);
    }

    pub fn get(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_256_increments_restore_cell() {
        let mut tape = Tape::new(4);
        tape.set(17);
        for _ in 0..256 {
            tape.increment();
        }
        assert_eq!(tape.get(), 17);
    }

    #[test]
    fn test_decrement_wraps_to_255() {
        let mut tape = Tape::new(4);
        tape.decrement();
        assert_eq!(tape.get(), 255);
    }

    #[test]
    fn test_pointer_wraps_both_directions() {
        let mut tape = Tape::new(3);
        tape.move_left();
        assert_eq!(tape.pointer(), 2);
        tape.move_right();
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let mut tape = Tape::new(0);
        assert_eq!(tape.len(), 1);
        tape.move_right();
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn test_oversized_tape_is_clamped() {
        let tape = Tape::new(usize::MAX);
        assert_eq!(tape.len(), MAX_TAPE_SIZE);
    }
}
