//! Memory model shared by the machines
//!
//! This module provides the storage the machines execute against:
//! - [`tape`]: fixed-size, wrap-addressed byte tape
//! - [`grid`]: 2-D toroidal grid of code points, doubling as program and data
//! - [`stack`]: operand stack bounded by the governor's depth ceiling
//! - [`value`]: tagged stack values for the quote machine
//!
//! # Addressing
//!
//! Tape and grid both wrap rather than fault. The tape wraps its single pointer
//! circularly; the grid wraps each axis independently. Only the operand stacks
//! can run out of room, which is reported as a pointer-out-of-bounds error.

pub mod grid;
pub mod stack;
pub mod tape;
pub mod value;
