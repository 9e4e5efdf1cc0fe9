// Append-only output accumulation

use serde::Serialize;

/// Captures everything a machine emits
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    text: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer {
            text: String::new(),
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Emit a code point; values outside the Unicode scalar range become U+FFFD
    pub fn push_code(&mut self, code: i64) {
        self.push_char(code_to_char(code));
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

pub fn code_to_char(code: i64) -> char {
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// A successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    pub text: String,
    /// Machine steps executed
    pub steps: u64,
}

impl Output {
    pub fn new(buffer: OutputBuffer, steps: u64) -> Self {
        Output {
            text: buffer.into_string(),
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_code() {
        let mut out = OutputBuffer::new();
        out.push_code(72);
        out.push_code(-1);
        out.push_code(0x11_0000);
        assert_eq!(out.as_str(), "H\u{FFFD}\u{FFFD}");
    }
}
