// Dispatcher: the single entry point from language identifier to machine

use crate::interpreter::config::{ExecutionConfig, StepLimits};
use crate::interpreter::errors::ExecutionError;
use crate::interpreter::governor::Governor;
use crate::language::{Language, UnknownLanguage};
use crate::machines::{bitstream, grid, ook, quote, tape};
use crate::output::Output;
use thiserror::Error;
use tracing::debug;

/// Failure of [`run_by_id`]
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    UnknownLanguage(#[from] UnknownLanguage),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

fn step_selector(language: Language) -> fn(&StepLimits) -> u64 {
    match language {
        Language::Brainfuck | Language::Ook => |limits| limits.tape,
        Language::Befunge => |limits| limits.grid,
        Language::Whitespace => |limits| limits.bit_stream,
        Language::False => |limits| limits.quote,
    }
}

/// Run `source` as `language` under the bounds in `config`
pub fn run(
    language: Language,
    source: &str,
    config: &ExecutionConfig,
) -> Result<Output, ExecutionError> {
    let governor = Governor::new(
        config.step_limit(step_selector(language)),
        config.max_stack_depth,
        config.cancel.clone(),
    );
    debug!(
        language = language.id(),
        source_chars = source.chars().count(),
        step_limit = governor.step_limit(),
        "starting run"
    );

    let result = match language {
        Language::Brainfuck => tape::run(source, config.tape_size, &governor),
        Language::Ook => ook::run(source, config.tape_size, &governor),
        Language::Befunge => grid::run(source, &governor, config.seed),
        Language::Whitespace => bitstream::run(source, &governor),
        Language::False => quote::run(source, &governor),
    };

    match &result {
        Ok(output) => debug!(
            language = language.id(),
            steps = output.steps,
            output_chars = output.text.chars().count(),
            "run finished"
        ),
        Err(err) => debug!(
            language = language.id(),
            kind = err.kind_name(),
            position = err.position(),
            partial_chars = err.partial_output().chars().count(),
            "run failed"
        ),
    }
    result
}

/// Parse `language_id` against the closed identifier set, then [`run`]
pub fn run_by_id(
    language_id: &str,
    source: &str,
    config: &ExecutionConfig,
) -> Result<Output, RunError> {
    let language: Language = language_id.parse()?;
    Ok(run(language, source, config)?)
}
