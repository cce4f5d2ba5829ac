//! Prelude module for `magmatrix_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```
//! use magmatrix_types::prelude::*;
//!
//! let guard = MemoryConfig::embedded().guard();
//! let anim = Animation::new(2, DEFAULT_COLS, DEFAULT_ROWS, guard);
//! assert!(anim.is_ok());
//! ```

// Animation types
#[doc(inline)]
pub use crate::animation::{
	Animation, CanvasRect, MergeOutcome, NextIndex, PlaybackCursor, PlaybackState, PlaybackType, StartFrame,
};

// Constants
#[doc(inline)]
pub use crate::constants::{
	DEFAULT_COLS, DEFAULT_NUM_FRAMES, DEFAULT_ROWS, DEFAULT_SAFETY_MARGIN, HARDWARE_COLS, HARDWARE_ROWS, MAX_INTENSITY,
};

// Errors
#[doc(inline)]
pub use crate::error::{AllocationError, AnimationError, FrameError, PersistError};

// Frame types
#[doc(inline)]
pub use crate::frame::{Frame, FrameRowIterator};

// Memory guard
#[doc(inline)]
pub use crate::memory::{FixedBudget, MemoryConfig, MemoryGuard, MemoryProbe, SystemMemory};

// Persistence
#[doc(inline)]
pub use crate::persist::{ConfigRecord, config_file_name, data_file_name, load, read_record, save};
