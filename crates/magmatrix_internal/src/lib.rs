//! This module is separated into its own crate to keep the public facade thin, and should not be used directly.

/// `use magmatrix::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use magmatrix_storage;
pub use magmatrix_types;

// Re-export commonly used types at crate root
pub use magmatrix_storage::{DirStorage, MemStorage, OpenMode, Storage, StorageError, StorageFile};
pub use magmatrix_types::animation::{Animation, MergeOutcome, PlaybackState, PlaybackType};
pub use magmatrix_types::frame::Frame;
pub use magmatrix_types::memory::MemoryGuard;
