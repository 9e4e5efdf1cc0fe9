//! Execution core shared by every language
//!
//! - [`engine`]: the dispatcher, mapping a [`Language`](crate::Language) to its machine
//! - [`governor`]: step ceilings, bounds and stack-depth checks
//! - [`config`]: caller-supplied overrides for a single run
//! - [`errors`]: the error taxonomy returned by every machine
//!
//! # Execution Model
//!
//! A run is synchronous and single-threaded. It performs no I/O, so independent runs
//! can execute concurrently on separate threads; nothing outlives a single call.

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod governor;
