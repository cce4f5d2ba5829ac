//! Prelude module for `magmatrix_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use magmatrix_internal::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut storage = MemStorage::new();
//! let anim = Animation::new(2, 8, 8, MemoryGuard::unlimited())?;
//! anim.save_to(&mut storage, 0)?;
//! assert!(storage.exists(&config_file_name(0)));
//! # Ok(())
//! # }
//! ```

// Re-export everything from magmatrix_types::prelude
#[doc(inline)]
pub use magmatrix_types::prelude::*;

// Storage devices
#[doc(inline)]
pub use magmatrix_storage::{DirStorage, MemStorage, OpenMode, Storage, StorageError, StorageFile};

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use magmatrix_storage;
#[doc(inline)]
pub use magmatrix_types;
