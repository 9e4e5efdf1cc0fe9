//! Byte-tape machine (`brainfuck`, and `ook` after digraph translation).
//!
//! Source is reduced to a list of positioned [`Instruction`]s, a [`BracketMap`] is
//! computed in one pass, and only then does execution begin. A bracket without a
//! partner is reported before any instruction runs.
//!
//! `,` has no input channel to read from and stores zero in the current cell.

use crate::interpreter::errors::{ErrorKind, ExecutionError};
use crate::interpreter::governor::Governor;
use crate::memory::tape::Tape;
use crate::output::{Output, OutputBuffer};
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeOp {
    Right,
    Left,
    Increment,
    Decrement,
    Output,
    Input,
    LoopStart,
    LoopEnd,
}

impl TapeOp {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '>' => Some(TapeOp::Right),
            '<' => Some(TapeOp::Left),
            '+' => Some(TapeOp::Increment),
            '-' => Some(TapeOp::Decrement),
            '.' => Some(TapeOp::Output),
            ',' => Some(TapeOp::Input),
            '[' => Some(TapeOp::LoopStart),
            ']' => Some(TapeOp::LoopEnd),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            TapeOp::Right => '>',
            TapeOp::Left => '<',
            TapeOp::Increment => '+',
            TapeOp::Decrement => '-',
            TapeOp::Output => '.',
            TapeOp::Input => ',',
            TapeOp::LoopStart => '[',
            TapeOp::LoopEnd => ']',
        }
    }
}

/// One tape instruction and the character offset it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: TapeOp,
    pub position: usize,
}

/// Every character outside the eight instruction symbols is a comment
pub fn parse(source: &str) -> Vec<Instruction> {
    source
        .chars()
        .enumerate()
        .filter_map(|(position, c)| TapeOp::from_symbol(c).map(|op| Instruction { op, position }))
        .collect()
}

/// Bijection between loop-open and loop-close instruction indices
#[derive(Debug, Clone, Default)]
pub struct BracketMap {
    open_to_close: FxHashMap<usize, usize>,
    close_to_open: FxHashMap<usize, usize>,
}

impl BracketMap {
    pub fn build(program: &[Instruction]) -> Result<Self, ErrorKind> {
        let mut map = BracketMap::default();
        let mut open: Vec<usize> = Vec::new();

        for (index, instruction) in program.iter().enumerate() {
            match instruction.op {
                TapeOp::LoopStart => open.push(index),
                TapeOp::LoopEnd => {
                    let start = open.pop().ok_or(ErrorKind::UnmatchedBracket {
                        position: instruction.position,
                    })?;
                    map.open_to_close.insert(start, index);
                    map.close_to_open.insert(index, start);
                }
                _ => {}
            }
        }

        // Innermost unclosed bracket
        if let Some(&start) = open.last() {
            return Err(ErrorKind::UnmatchedBracket {
                position: program[start].position,
            });
        }
        Ok(map)
    }

    pub fn close_for(&self, open: usize) -> Option<usize> {
        self.open_to_close.get(&open).copied()
    }

    pub fn open_for(&self, close: usize) -> Option<usize> {
        self.close_to_open.get(&close).copied()
    }

    /// Number of matched pairs
    pub fn len(&self) -> usize {
        self.open_to_close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open_to_close.is_empty()
    }
}

pub struct TapeMachine<'a> {
    program: &'a [Instruction],
    brackets: BracketMap,
    tape: Tape,
    ip: usize,
    steps: u64,
    output: OutputBuffer,
    governor: &'a Governor,
}

impl<'a> TapeMachine<'a> {
    /// Fails with `UnmatchedBracket` before anything runs
    pub fn new(
        program: &'a [Instruction],
        tape_size: usize,
        governor: &'a Governor,
    ) -> Result<Self, ExecutionError> {
        let brackets = BracketMap::build(program).map_err(ExecutionError::before_execution)?;
        Ok(TapeMachine {
            program,
            brackets,
            tape: Tape::new(tape_size),
            ip: 0,
            steps: 0,
            output: OutputBuffer::new(),
            governor,
        })
    }

    pub fn run(mut self) -> Result<Output, ExecutionError> {
        while self.ip < self.program.len() {
            if let Err(kind) = self.step() {
                return Err(ExecutionError::new(kind, self.output.into_string()));
            }
        }
        trace!(steps = self.steps, pointer = self.tape.pointer(), "tape machine halted");
        Ok(Output::new(self.output, self.steps))
    }

    fn step(&mut self) -> Result<(), ErrorKind> {
        self.governor.check_step(self.steps)?;
        self.steps += 1;

        let instruction = self.program[self.ip];
        match instruction.op {
            TapeOp::Right => self.tape.move_right(),
            TapeOp::Left => self.tape.move_left(),
            TapeOp::Increment => self.tape.increment(),
            TapeOp::Decrement => self.tape.decrement(),
            TapeOp::Output => self.output.push_char(char::from(self.tape.get())),
            TapeOp::Input => self.tape.set(0),
            TapeOp::LoopStart => {
                if self.tape.get() == 0 {
                    self.ip = self
                        .brackets
                        .close_for(self.ip)
                        .ok_or(ErrorKind::UnmatchedBracket {
                            position: instruction.position,
                        })?;
                }
            }
            TapeOp::LoopEnd => {
                if self.tape.get() != 0 {
                    self.ip = self
                        .brackets
                        .open_for(self.ip)
                        .ok_or(ErrorKind::UnmatchedBracket {
                            position: instruction.position,
                        })?;
                }
            }
        }
        self.ip += 1;
        Ok(())
    }
}

/// Run positioned tape instructions
pub fn execute(
    program: &[Instruction],
    tape_size: usize,
    governor: &Governor,
) -> Result<Output, ExecutionError> {
    TapeMachine::new(program, tape_size, governor)?.run()
}

/// Run `brainfuck` source
pub fn run(source: &str, tape_size: usize, governor: &Governor) -> Result<Output, ExecutionError> {
    execute(&parse(source), tape_size, governor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::config::CancelToken;

    fn governor(limit: u64) -> Governor {
        Governor::new(limit, 16, CancelToken::new())
    }

    #[test]
    fn test_parse_skips_comments() {
        let program = parse("a+b[c]");
        let ops: Vec<TapeOp> = program.iter().map(|i| i.op).collect();
        assert_eq!(ops, vec![TapeOp::Increment, TapeOp::LoopStart, TapeOp::LoopEnd]);
        assert_eq!(program[1].position, 3);
    }

    #[test]
    fn test_bracket_map_is_bijection() {
        let program = parse("[[][]]+[]");
        let map = BracketMap::build(&program).unwrap();
        assert_eq!(map.len(), 4);
        for (index, instruction) in program.iter().enumerate() {
            if instruction.op == TapeOp::LoopStart {
                let close = map.close_for(index).expect("every open has a close");
                assert_eq!(map.open_for(close), Some(index));
            }
        }
        assert_eq!(map.close_for(0), Some(5));
    }

    #[test]
    fn test_stray_close_reports_its_position() {
        let err = BracketMap::build(&parse("+]")).unwrap_err();
        assert_eq!(err, ErrorKind::UnmatchedBracket { position: 1 });
    }

    #[test]
    fn test_unclosed_open_reports_innermost() {
        let err = BracketMap::build(&parse("[ [ ]  [")).unwrap_err();
        assert_eq!(err, ErrorKind::UnmatchedBracket { position: 7 });
    }

    #[test]
    fn test_unmatched_produces_no_output() {
        let err = run("+++.[", 10, &governor(100)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnmatchedBracket { position: 4 }));
        assert_eq!(err.partial_output(), "");
    }

    #[test]
    fn test_loop_skipped_when_cell_zero() {
        let out = run("[.]+++[-]", 10, &governor(100)).unwrap();
        assert_eq!(out.text, "");
        // [ . ] skip is one step, + + + three, [ - ] loop three times
        assert_eq!(out.steps, 1 + 3 + 1 + 3 * 2);
    }

    #[test]
    fn test_input_reads_zero() {
        let out = run("+++,.", 10, &governor(100)).unwrap();
        assert_eq!(out.text, "\0");
    }

    #[test]
    fn test_step_limit_keeps_partial_output() {
        let err = run("+.[]", 10, &governor(50)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StepLimitExceeded { limit: 50 });
        assert_eq!(err.partial_output(), "\u{1}");
    }
}
