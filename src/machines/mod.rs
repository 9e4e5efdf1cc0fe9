//! The language machines
//!
//! - [`tape`]: byte tape with a precomputed bracket map (`brainfuck`)
//! - [`ook`]: digraph dialect translated onto the tape machine (`ook`)
//! - [`grid`]: 2-D toroidal grid with self-modification (`befunge`)
//! - [`bitstream`]: space/tab/line-feed token stack machine (`whitespace`)
//! - [`quote`]: string and lambda quote stack machine (`false`)
//!
//! No machine calls another except `ook`, which compiles to tape instructions.
//! Each run builds its state from scratch and drops it on return.

pub mod bitstream;
pub mod grid;
pub mod ook;
pub mod quote;
pub mod tape;
