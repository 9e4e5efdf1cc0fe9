//! 2-D toroidal grid machine (`befunge`).
//!
//! The source is loaded into a private [`Grid`] that is both program and data. A
//! cursor walks the grid along a direction vector, starting at the top-left corner
//! heading east. After every instruction the cursor advances one cell with each
//! axis wrapped independently, so the cursor can never leave the grid.
//!
//! # Numeric policy
//!
//! - Popping an empty stack yields `0`
//! - Division and modulo by zero push `0`
//! - Arithmetic wraps on `i64` overflow
//!
//! The random turn draws from an injected [`Rng`]; [`run`] seeds a [`StdRng`] from
//! the configured seed so runs can be pinned.

use crate::interpreter::errors::{ErrorKind, ExecutionError};
use crate::interpreter::governor::Governor;
use crate::memory::grid::{Grid, Point};
use crate::memory::stack::OperandStack;
use crate::output::{Output, OutputBuffer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
        }
    }
}

enum Flow {
    Continue,
    Halt,
}

pub struct GridMachine<'a, R: Rng> {
    grid: Grid,
    cursor: Point,
    direction: Direction,
    stack: OperandStack<i64>,
    string_mode: bool,
    output: OutputBuffer,
    steps: u64,
    governor: &'a Governor,
    rng: R,
}

impl<'a, R: Rng> GridMachine<'a, R> {
    pub fn new(source: &str, governor: &'a Governor, rng: R) -> Self {
        GridMachine {
            grid: Grid::from_source(source),
            cursor: Point { x: 0, y: 0 },
            direction: Direction::East,
            stack: OperandStack::new(),
            string_mode: false,
            output: OutputBuffer::new(),
            steps: 0,
            governor,
            rng,
        }
    }

    pub fn run(mut self) -> Result<Output, ExecutionError> {
        if self.grid.is_empty() {
            return Ok(Output::new(self.output, 0));
        }
        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Halt) => break,
                Err(kind) => return Err(ExecutionError::new(kind, self.output.into_string())),
            }
        }
        trace!(
            steps = self.steps,
            x = self.cursor.x,
            y = self.cursor.y,
            depth = self.stack.len(),
            "grid machine halted"
        );
        Ok(Output::new(self.output, self.steps))
    }

    fn step(&mut self) -> Result<Flow, ErrorKind> {
        self.governor.check_step(self.steps)?;
        self.steps += 1;

        let cell = self.grid.cell(self.cursor);
        if self.string_mode {
            if cell == '"' as i64 {
                self.string_mode = false;
            } else {
                self.push(cell)?;
            }
        } else {
            let symbol = u32::try_from(cell).ok().and_then(char::from_u32);
            if let Some(symbol) = symbol {
                if symbol == '@' {
                    return Ok(Flow::Halt);
                }
                self.dispatch(symbol)?;
            }
        }

        self.advance();
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, symbol: char) -> Result<(), ErrorKind> {
        match symbol {
            '>' => self.direction = Direction::East,
            '<' => self.direction = Direction::West,
            '^' => self.direction = Direction::North,
            'v' => self.direction = Direction::South,
            '?' => self.direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())],
            '_' => {
                self.direction = if self.pop() == 0 {
                    Direction::East
                } else {
                    Direction::West
                }
            }
            '|' => {
                self.direction = if self.pop() == 0 {
                    Direction::South
                } else {
                    Direction::North
                }
            }
            '+' => self.binary(i64::wrapping_add)?,
            '-' => self.binary(i64::wrapping_sub)?,
            '*' => self.binary(i64::wrapping_mul)?,
            '/' => self.binary(|a, b| if b == 0 { 0 } else { a.wrapping_div(b) })?,
            '%' => self.binary(|a, b| if b == 0 { 0 } else { a.wrapping_rem(b) })?,
            '`' => self.binary(|a, b| i64::from(a > b))?,
            '!' => {
                let value = self.pop();
                self.push(i64::from(value == 0))?;
            }
            '"' => self.string_mode = true,
            ':' => {
                let value = self.pop();
                self.push(value)?;
                self.push(value)?;
            }
            '\\' => {
                let b = self.pop();
                let a = self.pop();
                self.push(b)?;
                self.push(a)?;
            }
            '$' => {
                self.pop();
            }
            '.' => {
                let value = self.pop();
                self.output.push_str(&value.to_string());
                self.output.push_char(' ');
            }
            ',' => {
                let value = self.pop();
                self.output.push_code(value);
            }
            '#' => self.advance(),
            'p' => {
                let y = self.pop();
                let x = self.pop();
                let value = self.pop();
                self.grid.put(x, y, value);
            }
            'g' => {
                let y = self.pop();
                let x = self.pop();
                let value = self.grid.get(x, y).unwrap_or(0);
                self.push(value)?;
            }
            // No input channel
            '&' | '~' => self.push(0)?,
            '0'..='9' => {
                let digit = symbol.to_digit(10).map_or(0, i64::from);
                self.push(digit)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn advance(&mut self) {
        let (dx, dy) = self.direction.delta();
        self.cursor = self.grid.advance(self.cursor, dx, dy);
    }

    fn pop(&mut self) -> i64 {
        self.stack.pop().unwrap_or(0)
    }

    fn push(&mut self, value: i64) -> Result<(), ErrorKind> {
        let position = self.grid.source_offset(self.cursor);
        self.stack.push(value, self.governor, position)
    }

    fn binary(&mut self, op: impl Fn(i64, i64) -> i64) -> Result<(), ErrorKind> {
        let b = self.pop();
        let a = self.pop();
        self.push(op(a, b))
    }
}

/// Run with an explicit random source
pub fn run_with_rng<R: Rng>(
    source: &str,
    governor: &Governor,
    rng: R,
) -> Result<Output, ExecutionError> {
    GridMachine::new(source, governor, rng).run()
}

pub fn run(source: &str, governor: &Governor, seed: Option<u64>) -> Result<Output, ExecutionError> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    run_with_rng(source, governor, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::config::CancelToken;
    use rand::rngs::mock::StepRng;
    use rustc_hash::FxHashSet;

    fn governor(limit: u64) -> Governor {
        Governor::new(limit, 64, CancelToken::new())
    }

    fn run_ok(source: &str) -> String {
        run(source, &governor(10_000), Some(1)).unwrap().text
    }

    #[test]
    fn test_hello_world() {
        assert_eq!(run_ok(r#""!dlroW ,olleH">:#,_@"#), "Hello, World!");
    }

    #[test]
    fn test_numeric_output_has_separator() {
        assert_eq!(run_ok("23+.@"), "5 ");
        assert_eq!(run_ok("92-.@"), "7 ");
        assert_eq!(run_ok("83%.@"), "2 ");
    }

    #[test]
    fn test_division_by_zero_yields_zero() {
        assert_eq!(run_ok("50/.@"), "0 ");
        assert_eq!(run_ok("50%.@"), "0 ");
    }

    #[test]
    fn test_empty_stack_pops_zero() {
        assert_eq!(run_ok(".@"), "0 ");
    }

    #[test]
    fn test_comparison_and_not() {
        assert_eq!(run_ok("52`.@"), "1 ");
        assert_eq!(run_ok("25`.@"), "0 ");
        assert_eq!(run_ok("0!.@"), "1 ");
    }

    #[test]
    fn test_swap_and_discard() {
        assert_eq!(run_ok("12\\..@"), "1 2 ");
        assert_eq!(run_ok("12$.@"), "1 ");
    }

    #[test]
    fn test_cursor_wraps_west_edge() {
        assert_eq!(run_ok("<@.2"), "2 ");
    }

    #[test]
    fn test_vertical_conditional() {
        // Zero sends the cursor south onto the lower row
        let source = "0|\n @\n";
        assert_eq!(run(source, &governor(100), None).unwrap().text, "");
    }

    #[test]
    fn test_put_modifies_private_grid() {
        let source = r#""@"90p1.  X"#;
        assert_eq!(run_ok(source), "1 ");
        assert!(source.ends_with('X'));
    }

    #[test]
    fn test_put_out_of_range_is_noop() {
        assert_eq!(run_ok("199p2.@"), "2 ");
    }

    #[test]
    fn test_get_reads_cell_or_zero() {
        assert_eq!(run_ok("30g,@"), ",");
        assert_eq!(run_ok("99g.@"), "0 ");
    }

    #[test]
    fn test_closed_loop_hits_step_limit() {
        let err = run(">v\n^<", &governor(500), None).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StepLimitExceeded { limit: 500 });
    }

    #[test]
    fn test_random_turn_uses_injected_rng() {
        // An all-zero source always selects the first direction
        let out = run_with_rng("?1.@", &governor(100), StepRng::new(0, 0)).unwrap();
        assert_eq!(out.text, "1 ");
    }

    #[test]
    fn test_same_seed_same_walk() {
        let source = "  v  \n  1  \n.3?2.\n  4  \n  .  ";
        let first = run(source, &governor(300), Some(42)).unwrap_err();
        let second = run(source, &governor(300), Some(42)).unwrap_err();
        assert!(!first.partial_output().is_empty());
        assert_eq!(first.partial_output(), second.partial_output());
    }

    #[test]
    fn test_stack_depth_limit() {
        let gov = Governor::new(1_000, 3, CancelToken::new());
        let err = run("1111@", &gov, None).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::PointerOutOfBounds { position: 3 });
    }

    #[test]
    fn test_empty_source_produces_nothing() {
        let out = run("", &governor(10), None).unwrap();
        assert_eq!(out.text, "");
        assert_eq!(out.steps, 0);
    }

    #[test]
    fn test_random_turn_reaches_every_direction() {
        // `?` sits at the origin; each heading prints a different digit
        let source = "?1.@@.2\n3\n.\n@\n@\n.\n4";
        let seen: FxHashSet<String> = (0..64)
            .map(|seed| run(source, &governor(100), Some(seed)).unwrap().text)
            .collect();
        for expected in ["1 ", "2 ", "3 ", "4 "] {
            assert!(seen.contains(expected), "no seed produced {:?}", expected);
        }
    }
}
