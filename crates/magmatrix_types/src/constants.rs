//! Display and engine constants.
//!
//! The matrix hardware is a 21×12 board of electromagnets; the current firmware
//! drives a 19×10 window of it. Intensities are PWM duty cycles.

/// Highest intensity `set` stores (duty-cycle resolution)
pub const MAX_INTENSITY: u16 = 4096;

/// Number of columns on the physical board
pub const HARDWARE_COLS: u16 = 21;

/// Number of rows on the physical board
pub const HARDWARE_ROWS: u16 = 12;

/// Number of columns driven by default
pub const DEFAULT_COLS: u16 = 19;

/// Number of rows driven by default
pub const DEFAULT_ROWS: u16 = 10;

/// Frame count of a default constructed animation
pub const DEFAULT_NUM_FRAMES: usize = 2;

/// Free memory (bytes) that must remain after any checked allocation
pub const DEFAULT_SAFETY_MARGIN: usize = 10_000;

/// Size in bytes of one stored intensity
pub const INTENSITY_SIZE: usize = std::mem::size_of::<u16>();
