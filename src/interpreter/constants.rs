// Default resource bounds for the machines

/// Default step ceiling for the byte-tape machine
pub const DEFAULT_TAPE_STEPS: u64 = 100_000;

/// Default step ceiling for the 2-D grid machine
pub const DEFAULT_GRID_STEPS: u64 = 100_000;

/// Default step ceiling for the whitespace-token stack machine
pub const DEFAULT_BIT_STREAM_STEPS: u64 = 100_000;

/// Default step ceiling for the quote stack machine
pub const DEFAULT_QUOTE_STEPS: u64 = 100_000;

/// Number of 8-bit cells on the tape
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// Largest tape a config may request (16 MiB of cells)
pub const MAX_TAPE_SIZE: usize = 1 << 24;

/// Maximum operand stack depth shared by the stack machines
pub const DEFAULT_MAX_STACK_DEPTH: usize = 65_536;

/// Version of the closed language identifier set
pub const LANGUAGE_SET_VERSION: u32 = 1;
