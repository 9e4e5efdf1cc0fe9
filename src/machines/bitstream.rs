//! Three-token stack machine (`whitespace`).
//!
//! Only space, tab and line feed are significant; every other character is skipped.
//! The whole token stream is decoded against [`OPCODES`] before execution, so a
//! malformed instruction or literal is reported without running anything.
//!
//! Supported instructions are the stack, arithmetic and output families plus
//! end-of-program. Heap access, input, labels and jumps are not decoded and surface
//! as malformed literals.

use crate::interpreter::errors::{ErrorKind, ExecutionError};
use crate::interpreter::governor::Governor;
use crate::memory::stack::OperandStack;
use crate::output::{Output, OutputBuffer};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Space,
    Tab,
    LineFeed,
}

impl Token {
    fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Token::Space),
            '\t' => Some(Token::Tab),
            '\n' => Some(Token::LineFeed),
            _ => None,
        }
    }

    fn letter(self) -> char {
        match self {
            Token::Space => 'S',
            Token::Tab => 'T',
            Token::LineFeed => 'L',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Push,
    Duplicate,
    Swap,
    Discard,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    OutputChar,
    OutputNumber,
    End,
}

use Token::{LineFeed as L, Space as S, Tab as T};

/// Instruction prefixes; the set is prefix-free
pub const OPCODES: [(&[Token], Opcode); 12] = [
    (&[S, S], Opcode::Push),
    (&[S, L, S], Opcode::Duplicate),
    (&[S, L, T], Opcode::Swap),
    (&[S, L, L], Opcode::Discard),
    (&[T, S, S, S], Opcode::Add),
    (&[T, S, S, T], Opcode::Subtract),
    (&[T, S, S, L], Opcode::Multiply),
    (&[T, S, T, S], Opcode::Divide),
    (&[T, S, T, T], Opcode::Modulo),
    (&[T, L, S, S], Opcode::OutputChar),
    (&[T, L, S, T], Opcode::OutputNumber),
    (&[L, L, L], Opcode::End),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Literal for `Push`, zero otherwise
    pub literal: i64,
    /// Character offset of the instruction's first token
    pub position: usize,
}

pub fn tokenize(source: &str) -> Vec<(Token, usize)> {
    source
        .chars()
        .enumerate()
        .filter_map(|(position, c)| Token::from_char(c).map(|t| (t, position)))
        .collect()
}

fn spell(tokens: &[(Token, usize)]) -> String {
    tokens.iter().map(|(t, _)| t.letter()).collect()
}

fn starts_with(tokens: &[(Token, usize)], prefix: &[Token]) -> bool {
    tokens.len() >= prefix.len() && tokens.iter().zip(prefix).all(|((t, _), p)| t == p)
}

struct Decoder<'a> {
    tokens: &'a [(Token, usize)],
    cursor: usize,
}

impl<'a> Decoder<'a> {
    fn next_instruction(&mut self) -> Result<Instruction, ErrorKind> {
        let tokens = self.tokens;
        let start = self.cursor;
        let rest = &tokens[start..];
        let position = rest[0].1;

        let (prefix, opcode) = OPCODES
            .iter()
            .find(|(prefix, _)| starts_with(rest, prefix))
            .ok_or_else(|| ErrorKind::MalformedLiteral {
                position,
                text: spell(&rest[..unknown_prefix_len(rest)]),
            })?;
        self.cursor += prefix.len();

        let literal = if *opcode == Opcode::Push {
            self.literal(start)?
        } else {
            0
        };
        Ok(Instruction {
            opcode: *opcode,
            literal,
            position,
        })
    }

    /// Sign token, then magnitude bits MSB-first up to a line feed
    fn literal(&mut self, start: usize) -> Result<i64, ErrorKind> {
        let tokens = self.tokens;
        let malformed = |end: usize| ErrorKind::MalformedLiteral {
            position: tokens[start].1,
            text: spell(&tokens[start..end.min(tokens.len())]),
        };

        let sign = match tokens.get(self.cursor) {
            Some((Token::Space, _)) => 1,
            Some((Token::Tab, _)) => -1,
            _ => return Err(malformed(self.cursor + 1)),
        };
        self.cursor += 1;

        let mut magnitude: i64 = 0;
        loop {
            let bit = match tokens.get(self.cursor) {
                Some((Token::LineFeed, _)) => break,
                Some((Token::Space, _)) => 0,
                Some((Token::Tab, _)) => 1,
                None => return Err(malformed(self.cursor)),
            };
            self.cursor += 1;
            magnitude = magnitude
                .checked_mul(2)
                .and_then(|m| m.checked_add(bit))
                .ok_or_else(|| malformed(self.cursor))?;
        }
        self.cursor += 1;
        Ok(sign * magnitude)
    }
}

/// Length of the shortest token run that is not a prefix of any opcode
fn unknown_prefix_len(rest: &[(Token, usize)]) -> usize {
    let mut n = 1;
    while n < rest.len()
        && OPCODES
            .iter()
            .any(|(prefix, _)| prefix.len() > n && starts_with(&rest[..n], &prefix[..n]))
    {
        n += 1;
    }
    n
}

/// Decode the full token stream
pub fn decode(source: &str) -> Result<Vec<Instruction>, ErrorKind> {
    let tokens = tokenize(source);
    let mut decoder = Decoder {
        tokens: &tokens,
        cursor: 0,
    };
    let mut program = Vec::new();
    while decoder.cursor < tokens.len() {
        program.push(decoder.next_instruction()?);
    }
    Ok(program)
}

pub struct BitStreamMachine<'a> {
    program: Vec<Instruction>,
    stack: OperandStack<i64>,
    output: OutputBuffer,
    steps: u64,
    governor: &'a Governor,
}

impl<'a> BitStreamMachine<'a> {
    pub fn new(source: &str, governor: &'a Governor) -> Result<Self, ExecutionError> {
        let program = decode(source).map_err(ExecutionError::before_execution)?;
        Ok(BitStreamMachine {
            program,
            stack: OperandStack::new(),
            output: OutputBuffer::new(),
            steps: 0,
            governor,
        })
    }

    pub fn run(mut self) -> Result<Output, ExecutionError> {
        let program = std::mem::take(&mut self.program);
        for instruction in &program {
            match self.execute(instruction) {
                Ok(true) => {}
                Ok(false) => break,
                Err(kind) => return Err(ExecutionError::new(kind, self.output.into_string())),
            }
        }
        trace!(steps = self.steps, depth = self.stack.len(), "bit-stream machine halted");
        Ok(Output::new(self.output, self.steps))
    }

    /// Returns false when the program ends
    fn execute(&mut self, instruction: &Instruction) -> Result<bool, ErrorKind> {
        self.governor.check_step(self.steps)?;
        self.steps += 1;

        let position = instruction.position;
        match instruction.opcode {
            Opcode::Push => self.stack.push(instruction.literal, self.governor, position)?,
            Opcode::Duplicate => {
                let top = self.pop(position)?;
                self.stack.push(top, self.governor, position)?;
                self.stack.push(top, self.governor, position)?;
            }
            Opcode::Swap => {
                let b = self.pop(position)?;
                let a = self.pop(position)?;
                self.stack.push(b, self.governor, position)?;
                self.stack.push(a, self.governor, position)?;
            }
            Opcode::Discard => {
                self.pop(position)?;
            }
            Opcode::Add => self.binary(position, i64::wrapping_add)?,
            Opcode::Subtract => self.binary(position, i64::wrapping_sub)?,
            Opcode::Multiply => self.binary(position, i64::wrapping_mul)?,
            Opcode::Divide => {
                self.binary(position, |a, b| if b == 0 { 0 } else { a.wrapping_div(b) })?
            }
            Opcode::Modulo => {
                self.binary(position, |a, b| if b == 0 { 0 } else { a.wrapping_rem(b) })?
            }
            Opcode::OutputChar => {
                let value = self.pop(position)?;
                self.output.push_code(value);
            }
            Opcode::OutputNumber => {
                let value = self.pop(position)?;
                self.output.push_str(&value.to_string());
            }
            Opcode::End => return Ok(false),
        }
        Ok(true)
    }

    fn pop(&mut self, position: usize) -> Result<i64, ErrorKind> {
        self.stack
            .pop()
            .ok_or(ErrorKind::PointerOutOfBounds { position })
    }

    fn binary(&mut self, position: usize, op: impl Fn(i64, i64) -> i64) -> Result<(), ErrorKind> {
        let b = self.pop(position)?;
        let a = self.pop(position)?;
        self.stack.push(op(a, b), self.governor, position)
    }
}

pub fn run(source: &str, governor: &Governor) -> Result<Output, ExecutionError> {
    BitStreamMachine::new(source, governor)?.run()
}
