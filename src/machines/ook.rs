//! Digraph dialect (`ook`) compiled onto the tape machine.
//!
//! Words are `Ook.`, `Ook?` and `Ook!`; anything else between them is ignored, and
//! adjacent words need no separator.
//! Consecutive words pair up and each pair maps through [`DIGRAPHS`] onto exactly
//! one tape instruction, positioned at the pair's first word so bracket errors point
//! back into the dialect source.

use crate::interpreter::errors::{ErrorKind, ExecutionError};
use crate::interpreter::governor::Governor;
use crate::machines::tape::{self, Instruction, TapeOp};
use crate::output::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word {
    Dot,
    Question,
    Bang,
}

impl Word {
    fn from_mark(c: char) -> Option<Self> {
        match c {
            '.' => Some(Word::Dot),
            '?' => Some(Word::Question),
            '!' => Some(Word::Bang),
            _ => None,
        }
    }

    fn text(self) -> &'static str {
        match self {
            Word::Dot => "Ook.",
            Word::Question => "Ook?",
            Word::Bang => "Ook!",
        }
    }
}

pub const DIGRAPHS: [((Word, Word), TapeOp); 8] = [
    ((Word::Dot, Word::Question), TapeOp::Right),
    ((Word::Question, Word::Dot), TapeOp::Left),
    ((Word::Dot, Word::Dot), TapeOp::Increment),
    ((Word::Bang, Word::Bang), TapeOp::Decrement),
    ((Word::Bang, Word::Dot), TapeOp::Output),
    ((Word::Dot, Word::Bang), TapeOp::Input),
    ((Word::Bang, Word::Question), TapeOp::LoopStart),
    ((Word::Question, Word::Bang), TapeOp::LoopEnd),
];

fn lookup(pair: (Word, Word)) -> Option<TapeOp> {
    DIGRAPHS
        .iter()
        .find(|(digraph, _)| *digraph == pair)
        .map(|(_, op)| *op)
}

/// Scan the words with their character offsets
pub fn scan(source: &str) -> Vec<(Word, usize)> {
    let chars: Vec<char> = source.chars().collect();
    let mut words = Vec::new();
    let mut i = 0;

    while i + 3 < chars.len() {
        if chars[i..i + 3] == ['O', 'o', 'k'] {
            if let Some(word) = Word::from_mark(chars[i + 3]) {
                words.push((word, i));
                i += 4;
                continue;
            }
        }
        i += 1;
    }
    words
}

/// Compile dialect source into positioned tape instructions
pub fn compile(source: &str) -> Result<Vec<Instruction>, ErrorKind> {
    let words = scan(source);
    if words.is_empty() {
        return Err(ErrorKind::MalformedLiteral {
            position: 0,
            text: String::new(),
        });
    }

    words
        .chunks(2)
        .map(|chunk| {
            let (first, position) = chunk[0];
            match chunk.get(1) {
                Some(&(second, _)) => lookup((first, second))
                    .map(|op| Instruction { op, position })
                    .ok_or_else(|| ErrorKind::MalformedLiteral {
                        position,
                        text: format!("{} {}", first.text(), second.text()),
                    }),
                None => Err(ErrorKind::MalformedLiteral {
                    position,
                    text: first.text().to_string(),
                }),
            }
        })
        .collect()
}

/// The equivalent tape-language program text
pub fn translate(source: &str) -> Result<String, ExecutionError> {
    let program = compile(source).map_err(ExecutionError::before_execution)?;
    Ok(program.iter().map(|i| i.op.symbol()).collect())
}

pub fn run(source: &str, tape_size: usize, governor: &Governor) -> Result<Output, ExecutionError> {
    let program = compile(source).map_err(ExecutionError::before_execution)?;
    tape::execute(&program, tape_size, governor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_ignores_noise() {
        let words = scan("xx Ook. yy Ook? Oo Ook!");
        assert_eq!(
            words,
            vec![(Word::Dot, 3), (Word::Question, 11), (Word::Bang, 19)]
        );
    }

    #[test]
    fn test_table_is_one_to_one() {
        let mut ops: Vec<char> = DIGRAPHS.iter().map(|(_, op)| op.symbol()).collect();
        ops.sort_unstable();
        ops.dedup();
        assert_eq!(ops.len(), DIGRAPHS.len());
    }

    #[test]
    fn test_translate_every_digraph() {
        let source = "Ook. Ook? Ook? Ook. Ook. Ook. Ook! Ook! Ook! Ook. Ook. Ook! Ook! Ook? Ook? Ook!";
        assert_eq!(translate(source).unwrap(), "><+-.,[]");
    }

    #[test]
    fn test_invalid_pair() {
        let err = compile("Ook. Ook. Ook? Ook?").unwrap_err();
        assert_eq!(
            err,
            ErrorKind::MalformedLiteral {
                position: 10,
                text: "Ook? Ook?".to_string()
            }
        );
    }

    #[test]
    fn test_trailing_single_word() {
        let err = compile("Ook. Ook. Ook!").unwrap_err();
        assert!(matches!(err, ErrorKind::MalformedLiteral { position: 10, .. }));
    }

    #[test]
    fn test_no_words_is_an_error() {
        let err = compile("hello").unwrap_err();
        assert!(matches!(err, ErrorKind::MalformedLiteral { position: 0, .. }));
    }

    #[test]
    fn test_words_need_no_separator() {
        let words: Vec<Word> = scan("Ook.Ook?").into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec![Word::Dot, Word::Question]);
        assert_eq!(translate("Ook.Ook?").unwrap(), ">");
    }
}
