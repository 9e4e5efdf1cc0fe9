//! # Introduction
//!
//! esorun executes programs written in a handful of small esoteric and
//! stack-oriented languages under strict resource bounds. It is the execution core
//! of an online sandbox: untrusted, possibly malformed or non-terminating programs
//! go in as plain text, and either their output or a structured error comes back.
//!
//! ## Execution pipeline
//!
//! ```text
//! (language id, source) → Dispatcher → Machine ⇄ Governor → Output | ExecutionError
//! ```
//!
//! 1. [`language`]: the closed set of language identifiers.
//! 2. [`interpreter`]: the dispatcher ([`interpreter::engine::run`]), the resource
//!    governor, run configuration and the error taxonomy.
//! 3. [`machines`]: one module per machine: byte tape, digraph dialect, toroidal
//!    grid, whitespace-token stack and quote stack.
//! 4. [`memory`]: tape, grid, operand stack and stack values the machines run on.
//! 5. [`output`]: append-only output accumulation and the success type.
//!
//! ## Supported languages
//!
//! `brainfuck`, `ook`, `befunge`, `whitespace`, `false`.
//!
//! ## Guarantees
//!
//! Every run is bounded by a step ceiling and fixed memory sizes, touches no file,
//! network or environment state, and returns a value rather than panicking. Apart
//! from the grid machine's random turn, identical inputs yield identical output.

pub mod interpreter;
pub mod language;
pub mod machines;
pub mod memory;
pub mod output;

pub use interpreter::config::{CancelToken, ConfigError, ExecutionConfig, StepLimits};
pub use interpreter::engine::{run, run_by_id, RunError};
pub use interpreter::errors::{ErrorKind, ErrorReport, ExecutionError};
pub use language::{Language, UnknownLanguage};
pub use output::Output;
