//! This crate provides the frame and animation engine for the `magmatrix` project.
//!
//! # Modules
//!
//! - **Frame**: a fixed-size grid of PWM intensities with out-of-bounds reads of `0`
//! - **Animation**: an ordered set of frames with a play cursor (Once, Loop, Bounce, Loop N times)
//! - **Compositing**: additive merge and exact unmerge of one animation into another
//! - **Persistence**: a text config record plus a binary payload through a storage device
//! - **Memory**: free-memory checks ahead of every frame buffer allocation
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```
//! use magmatrix_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut anim = Animation::new(2, 19, 10, MemoryGuard::unlimited())?;
//! anim.frame_mut(1).ok_or(AnimationError::Empty)?.set(3, 4, MAX_INTENSITY);
//! anim.start()?;
//! anim.advance_forward();
//! assert_eq!(anim.current().get(3, 4), MAX_INTENSITY);
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```
//! use magmatrix_types::frame::Frame;
//! use magmatrix_types::memory::MemoryGuard;
//!
//! let frame = Frame::new(19, 10, &MemoryGuard::unlimited());
//! assert!(frame.is_ok());
//! ```

pub mod animation;
pub mod blank;
pub mod constants;
pub mod error;
pub mod frame;
pub mod memory;
pub mod persist;

/// `use magmatrix_types::prelude::*;` to import commonly used items.
pub mod prelude;
