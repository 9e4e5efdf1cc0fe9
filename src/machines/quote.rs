//! Quote stack machine (`false`).
//!
//! The source is first scanned into positioned [`Item`]s: quoted strings, bracketed
//! lambdas, character and number literals become values, comments disappear and
//! every other character stays an operator. A malformed literal or unclosed lambda is
//! reported by that scan, before anything runs. Execution then walks the items with
//! one stack of [`Value`]s. Lambdas are stored but never invoked. Arithmetic coerces
//! anything that is not a number, including a missing operand, to zero.

use crate::interpreter::errors::{ErrorKind, ExecutionError};
use crate::interpreter::governor::Governor;
use crate::memory::stack::OperandStack;
use crate::memory::value::Value;
use crate::output::{Output, OutputBuffer};
use tracing::trace;

/// FALSE truth values
const TRUE: i64 = -1;
const FALSE: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Literal(Value),
    Operator(char),
}

struct Scanner {
    chars: Vec<char>,
    cursor: usize,
}

impl Scanner {
    fn items(mut self) -> Result<Vec<(Item, usize)>, ErrorKind> {
        let mut items = Vec::new();
        while let Some(&c) = self.chars.get(self.cursor) {
            let position = self.cursor;
            self.cursor += 1;
            let item = match c {
                '"' => Item::Literal(Value::Str(self.string_literal(position)?)),
                '[' => Item::Literal(Value::Lambda(self.lambda_literal(position)?)),
                '{' => {
                    self.skip_comment();
                    continue;
                }
                '\'' => {
                    let code = self.chars.get(self.cursor).copied().ok_or_else(|| {
                        ErrorKind::MalformedLiteral {
                            position,
                            text: "'".to_string(),
                        }
                    })?;
                    self.cursor += 1;
                    Item::Literal(Value::Number(i64::from(u32::from(code))))
                }
                '0'..='9' => Item::Literal(Value::Number(self.number_literal(position)?)),
                _ => Item::Operator(c),
            };
            items.push((item, position));
        }
        Ok(items)
    }

    fn string_literal(&mut self, position: usize) -> Result<String, ErrorKind> {
        let start = self.cursor;
        let end = self.chars[start..]
            .iter()
            .position(|&c| c == '"')
            .map(|offset| start + offset)
            .ok_or_else(|| ErrorKind::MalformedLiteral {
                position,
                text: self.chars[position..].iter().collect(),
            })?;
        self.cursor = end + 1;
        Ok(self.chars[start..end].iter().collect())
    }

    /// Captures the body up to the matching close, nested brackets included
    fn lambda_literal(&mut self, position: usize) -> Result<String, ErrorKind> {
        let start = self.cursor;
        let mut depth = 1usize;
        for (offset, &c) in self.chars[start..].iter().enumerate() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        let end = start + offset;
                        self.cursor = end + 1;
                        return Ok(self.chars[start..end].iter().collect());
                    }
                }
                _ => {}
            }
        }
        Err(ErrorKind::UnmatchedBracket { position })
    }

    fn skip_comment(&mut self) {
        while let Some(&c) = self.chars.get(self.cursor) {
            self.cursor += 1;
            if c == '}' {
                break;
            }
        }
    }

    fn number_literal(&mut self, position: usize) -> Result<i64, ErrorKind> {
        while self
            .chars
            .get(self.cursor)
            .is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor += 1;
        }
        let text: String = self.chars[position..self.cursor].iter().collect();
        text.parse()
            .map_err(|_| ErrorKind::MalformedLiteral { position, text })
    }
}

/// Scan source into positioned items; every literal error surfaces here
pub fn scan(source: &str) -> Result<Vec<(Item, usize)>, ErrorKind> {
    Scanner {
        chars: source.chars().collect(),
        cursor: 0,
    }
    .items()
}

pub struct QuoteMachine<'a> {
    items: Vec<(Item, usize)>,
    stack: OperandStack<Value>,
    output: OutputBuffer,
    steps: u64,
    governor: &'a Governor,
}

impl<'a> QuoteMachine<'a> {
    /// Fails with the first literal error before anything runs
    pub fn new(source: &str, governor: &'a Governor) -> Result<Self, ExecutionError> {
        let items = scan(source).map_err(ExecutionError::before_execution)?;
        Ok(QuoteMachine {
            items,
            stack: OperandStack::new(),
            output: OutputBuffer::new(),
            steps: 0,
            governor,
        })
    }

    pub fn run(mut self) -> Result<Output, ExecutionError> {
        let items = std::mem::take(&mut self.items);
        for (item, position) in items {
            if let Err(kind) = self.step(item, position) {
                return Err(ExecutionError::new(kind, self.output.into_string()));
            }
        }
        trace!(steps = self.steps, depth = self.stack.len(), "quote machine halted");
        Ok(Output::new(self.output, self.steps))
    }

    fn step(&mut self, item: Item, position: usize) -> Result<(), ErrorKind> {
        self.governor.check_step(self.steps)?;
        self.steps += 1;

        let c = match item {
            Item::Literal(value) => return self.push(value, position),
            Item::Operator(c) => c,
        };

        match c {
            '$' => {
                if let Some(text) = self.stack.pop().and_then(|v| v.printable()) {
                    self.output.push_str(&text);
                }
            }
            '.' => {
                if let Some(value) = self.stack.pop() {
                    self.output.push_str(&value.as_number().to_string());
                }
            }
            ',' => {
                if let Some(value) = self.stack.pop() {
                    self.output.push_code(value.as_number());
                }
            }
            '+' => self.binary(position, i64::wrapping_add)?,
            '-' => self.binary(position, i64::wrapping_sub)?,
            '*' => self.binary(position, i64::wrapping_mul)?,
            '/' => self.binary(position, |a, b| if b == 0 { 0 } else { a.wrapping_div(b) })?,
            '&' => self.binary(position, |a, b| a & b)?,
            '|' => self.binary(position, |a, b| a | b)?,
            '=' => self.binary(position, |a, b| if a == b { TRUE } else { FALSE })?,
            '>' => self.binary(position, |a, b| if a > b { TRUE } else { FALSE })?,
            '_' => self.unary(position, i64::wrapping_neg)?,
            '~' => self.unary(position, |a| !a)?,
            '%' => {
                self.stack.pop();
            }
            '\\' => self.stack.swap_top(),
            '@' => self.stack.rotate_top(),
            _ => {}
        }
        Ok(())
    }

    fn push(&mut self, value: Value, position: usize) -> Result<(), ErrorKind> {
        self.stack.push(value, self.governor, position)
    }

    fn pop_number(&mut self) -> i64 {
        self.stack.pop().map_or(0, |v| v.as_number())
    }

    fn binary(&mut self, position: usize, op: impl Fn(i64, i64) -> i64) -> Result<(), ErrorKind> {
        let b = self.pop_number();
        let a = self.pop_number();
        self.push(Value::Number(op(a, b)), position)
    }

    fn unary(&mut self, position: usize, op: impl Fn(i64) -> i64) -> Result<(), ErrorKind> {
        let a = self.pop_number();
        self.push(Value::Number(op(a)), position)
    }
}

pub fn run(source: &str, governor: &Governor) -> Result<Output, ExecutionError> {
    QuoteMachine::new(source, governor)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::config::CancelToken;

    fn run_ok(source: &str) -> String {
        let gov = Governor::new(1_000, 32, CancelToken::new());
        run(source, &gov).unwrap().text
    }

    fn run_err(source: &str) -> ExecutionError {
        let gov = Governor::new(1_000, 32, CancelToken::new());
        run(source, &gov).unwrap_err()
    }

    #[test]
    fn test_hello_world() {
        assert_eq!(run_ok(r#""Hello, World!"$"#), "Hello, World!");
    }

    #[test]
    fn test_multi_digit_numbers() {
        assert_eq!(run_ok("12 30+$"), "42");
    }

    #[test]
    fn test_lambda_is_stored_not_run() {
        assert_eq!(run_ok("[1 2+$]$"), "");
        assert_eq!(run_ok(r#"[a[b]c]"ok"$"#), "ok");
    }

    #[test]
    fn test_unclosed_lambda() {
        let err = run_err(r#""x"$ [1[2]"#);
        assert_eq!(err.kind(), &ErrorKind::UnmatchedBracket { position: 5 });
        assert_eq!(err.partial_output(), "");
    }

    #[test]
    fn test_stray_close_is_ignored() {
        assert_eq!(run_ok("]1$"), "1");
    }

    #[test]
    fn test_non_numbers_coerce_to_zero() {
        assert_eq!(run_ok(r#""a"3+."#), "3");
        assert_eq!(run_ok("+."), "0");
    }

    #[test]
    fn test_operators() {
        assert_eq!(run_ok("5_."), "-5");
        assert_eq!(run_ok("3 4>."), "0");
        assert_eq!(run_ok("4 3>."), "-1");
        assert_eq!(run_ok("7 7=."), "-1");
        assert_eq!(run_ok("5 0/."), "0");
        assert_eq!(run_ok("6 3&."), "2");
        assert_eq!(run_ok("0~."), "-1");
    }

    #[test]
    fn test_stack_operators() {
        assert_eq!(run_ok(r"1 2\.."), "12");
        assert_eq!(run_ok("1 2%."), "1");
        assert_eq!(run_ok("1 2 3@..."), "132");
    }

    #[test]
    fn test_char_literal_and_output() {
        assert_eq!(run_ok("'A,"), "A");
        assert_eq!(run_ok("'A."), "65");
    }

    #[test]
    fn test_comment_skipped() {
        assert_eq!(run_ok(r#"{ignored "x" $}"y"$"#), "y");
    }

    #[test]
    fn test_unterminated_string() {
        let err = run_err(r#"1$"ab"#);
        assert_eq!(
            err.kind(),
            &ErrorKind::MalformedLiteral {
                position: 2,
                text: "\"ab".to_string()
            }
        );
        assert_eq!(err.partial_output(), "");
    }

    #[test]
    fn test_number_overflow() {
        let err = run_err("99999999999999999999");
        assert!(matches!(err.kind(), ErrorKind::MalformedLiteral { position: 0, .. }));
    }

    #[test]
    fn test_scan_skips_comments_and_keeps_positions() {
        let items = scan("{c}1'a+").unwrap();
        assert_eq!(
            items,
            vec![
                (Item::Literal(Value::Number(1)), 3),
                (Item::Literal(Value::Number(97)), 4),
                (Item::Operator('+'), 6),
            ]
        );
    }

    #[test]
    fn test_bracket_inside_string_is_not_a_lambda() {
        assert_eq!(run_ok(r#""[" $"#), "[");
    }

    #[test]
    fn test_trailing_char_quote_is_static() {
        let err = run_err("1.'");
        assert!(matches!(err.kind(), ErrorKind::MalformedLiteral { position: 2, .. }));
        assert_eq!(err.partial_output(), "");
    }

    #[test]
    fn test_print_empty_stack_is_noop() {
        assert_eq!(run_ok("$.,"), "");
    }
}
