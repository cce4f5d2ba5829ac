//! Animations: an ordered set of frames plus a play cursor.
//!
//! An [`Animation`] owns every one of its frames outright; all frames share the
//! animation's `cols × rows` size. Playback is driven by a [`PlaybackCursor`]
//! under one of four [`PlaybackType`] policies, and whatever the cursor points at
//! is what the display driver shows through [`Animation::current`].
//!
//! While idle, or when the cursor points at no frame, the accessors return a
//! shared blank frame (see [`crate::blank`]).
//!
//! # Placement
//!
//! Two coordinates place an animation when it is merged into another one:
//! - `origin`: a reference point inside this animation's own canvas
//! - `location`: where that origin sits inside the canvas it is merged into
//!
//! # Examples
//!
//! ```
//! use magmatrix_types::animation::{Animation, PlaybackType};
//! use magmatrix_types::memory::MemoryGuard;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut anim = Animation::new(3, 4, 4, MemoryGuard::unlimited())?;
//! anim.set_playback_type(PlaybackType::Bounce);
//! anim.start()?;
//!
//! let mut seen = Vec::new();
//! for _ in 0..5 {
//!     seen.push(anim.current_index());
//!     anim.advance_forward();
//! }
//! assert_eq!(seen, [0, 1, 2, 1, 0].map(Some));
//! # Ok(())
//! # }
//! ```

mod compose;
pub mod playback;


use std::{fmt::Display, sync::Arc};

pub use self::compose::{CanvasRect, MergeOutcome};
pub use self::playback::{NextIndex, PlaybackCursor, PlaybackState, PlaybackType};

use crate::{
	blank,
	constants::{DEFAULT_COLS, DEFAULT_NUM_FRAMES, DEFAULT_ROWS, INTENSITY_SIZE},
	error::AnimationError,
	frame::Frame,
	memory::MemoryGuard,
};

/// Where to start playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartFrame {
	/// A specific frame index
	Index(usize),
	/// The last frame
	Last,
}

impl From<usize> for StartFrame {
	fn from(value: usize) -> Self {
		Self::Index(value)
	}
}

/// An ordered sequence of frames with playback state and placement.
#[derive(Debug, Clone)]
pub struct Animation {
	cols: u16,
	rows: u16,
	frames: Vec<Frame>,
	cursor: PlaybackCursor,
	origin: (i32, i32),
	location: (i32, i32),
	blank: Arc<Frame>,
	guard: MemoryGuard,
}

impl Animation {
	/// Creates an animation of `num_frames` blank frames.
	///
	/// The whole frame set is checked against `guard` before anything is allocated.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::Empty`] for zero frames, or a frame or allocation
	/// error when the frames cannot be built.
	pub fn new(num_frames: usize, cols: u16, rows: u16, guard: MemoryGuard) -> Result<Self, AnimationError> {
		if num_frames == 0 {
			return Err(AnimationError::Empty);
		}
		let total = num_frames.saturating_mul(cols as usize * rows as usize * INTENSITY_SIZE);
		guard.check(total)?;

		let mut frames = Vec::with_capacity(num_frames);
		for _ in 0..num_frames {
			frames.push(Frame::new(cols, rows, &guard)?);
		}
		Ok(Self::assemble(cols, rows, frames, guard))
	}

	/// Creates an animation of the default matrix size and frame count.
	pub fn with_default_size(guard: MemoryGuard) -> Result<Self, AnimationError> {
		Self::new(DEFAULT_NUM_FRAMES, DEFAULT_COLS, DEFAULT_ROWS, guard)
	}

	/// Creates an animation that takes ownership of `frames`.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::Empty`] if `frames` is empty, or
	/// [`AnimationError::DimensionMismatch`] if the frames differ in size.
	pub fn from_frames(frames: Vec<Frame>, guard: MemoryGuard) -> Result<Self, AnimationError> {
		let Some(first) = frames.first() else {
			return Err(AnimationError::Empty);
		};
		let (cols, rows) = first.size();
		if let Some(odd) = frames.iter().find(|f| f.size() != (cols, rows)) {
			return Err(AnimationError::DimensionMismatch {
				expected: (cols, rows),
				actual: odd.size(),
			});
		}
		Ok(Self::assemble(cols, rows, frames, guard))
	}

	/// Creates a frameless animation for a load to fill in.
	pub(crate) fn placeholder(guard: MemoryGuard) -> Self {
		Self::assemble(DEFAULT_COLS, DEFAULT_ROWS, Vec::new(), guard)
	}

	fn assemble(cols: u16, rows: u16, frames: Vec<Frame>, guard: MemoryGuard) -> Self {
		Self {
			cols,
			rows,
			frames,
			cursor: PlaybackCursor::default(),
			origin: (0, 0),
			location: (0, 0),
			blank: blank::shared(cols, rows),
			guard,
		}
	}

	/// Returns the number of columns.
	pub fn cols(&self) -> u16 {
		self.cols
	}

	/// Returns the number of rows.
	pub fn rows(&self) -> u16 {
		self.rows
	}

	/// Returns `(width, height)`.
	pub fn size(&self) -> (u16, u16) {
		(self.cols, self.rows)
	}

	/// Returns the number of frames. Zero only after a failed load.
	pub fn num_frames(&self) -> usize {
		self.frames.len()
	}

	/// Returns `true` if the animation holds no frames.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Returns all frames.
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Returns the frame at `index`.
	pub fn frame(&self, index: usize) -> Option<&Frame> {
		self.frames.get(index)
	}

	/// Returns the frame at `index` for editing.
	pub fn frame_mut(&mut self, index: usize) -> Option<&mut Frame> {
		self.frames.get_mut(index)
	}

	/// Replaces the frame at `index`, returning the old one.
	pub fn replace_frame(&mut self, index: usize, frame: Frame) -> Result<Frame, AnimationError> {
		if frame.size() != self.size() {
			return Err(AnimationError::DimensionMismatch {
				expected: self.size(),
				actual: frame.size(),
			});
		}
		let count = self.frames.len();
		let slot = self.frames.get_mut(index).ok_or(AnimationError::FrameOutOfRange {
			index,
			count,
		})?;
		Ok(std::mem::replace(slot, frame))
	}

	/// Overwrites every frame from one intensity buffer per frame.
	pub fn load_frames(&mut self, buffers: Vec<Vec<u16>>) -> Result<(), AnimationError> {
		if buffers.len() != self.frames.len() {
			return Err(AnimationError::FrameCountMismatch {
				expected: self.frames.len(),
				actual: buffers.len(),
			});
		}
		let expected = self.cols as usize * self.rows as usize;
		if let Some(bad) = buffers.iter().find(|b| b.len() != expected) {
			return Err(crate::error::FrameError::PixelCountMismatch {
				expected,
				actual: bad.len(),
			}
			.into());
		}
		for (frame, pixels) in self.frames.iter_mut().zip(buffers) {
			frame.overwrite(pixels)?;
		}
		Ok(())
	}

	/// Returns the memory guard used for this animation's allocations.
	pub fn guard(&self) -> &MemoryGuard {
		&self.guard
	}

	/// Returns the play cursor.
	pub fn cursor(&self) -> &PlaybackCursor {
		&self.cursor
	}

	// Playback configuration

	/// Sets the playback policy.
	pub fn set_playback_type(&mut self, playback_type: PlaybackType) {
		self.cursor.playback_type = playback_type;
	}

	/// Returns the playback policy.
	pub fn playback_type(&self) -> PlaybackType {
		self.cursor.playback_type
	}

	/// Returns the playback state.
	pub fn playback_state(&self) -> PlaybackState {
		self.cursor.state
	}

	/// Sets the playback direction.
	pub fn set_direction_forward(&mut self, forward: bool) {
		self.cursor.forward = forward;
	}

	/// Returns `true` when playing forward.
	pub fn direction_forward(&self) -> bool {
		self.cursor.forward
	}

	/// Sets the loop limit for [`PlaybackType::LoopNTimes`].
	pub fn set_max_iterations(&mut self, max_iterations: i32) {
		self.cursor.max_iterations = max_iterations;
	}

	/// Returns the loop limit.
	pub fn max_iterations(&self) -> i32 {
		self.cursor.max_iterations
	}

	/// Returns the loop counter.
	pub fn loop_iteration(&self) -> i32 {
		self.cursor.loop_iteration
	}

	/// Returns the index playback started at.
	pub fn start_index(&self) -> usize {
		self.cursor.start_index
	}

	/// Returns the current frame index.
	pub fn current_index(&self) -> Option<usize> {
		self.cursor.current
	}

	/// Returns the previous frame index.
	pub fn previous_index(&self) -> Option<usize> {
		self.cursor.previous
	}

	// Playback

	/// Starts playback at the given frame.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::Empty`] if there are no frames, or
	/// [`AnimationError::FrameOutOfRange`] for an index past the last frame.
	pub fn start_at(&mut self, start: impl Into<StartFrame>) -> Result<(), AnimationError> {
		let count = self.frames.len();
		if count == 0 {
			return Err(AnimationError::Empty);
		}
		let index = match start.into() {
			StartFrame::Index(index) if index < count => index,
			StartFrame::Index(index) => {
				return Err(AnimationError::FrameOutOfRange {
					index,
					count,
				});
			}
			StartFrame::Last => count - 1,
		};
		self.cursor.start(index);
		log::debug!("start {} playback at frame {} of {}", self.cursor.playback_type, index, count);
		Ok(())
	}

	/// Starts playback at the first frame when playing forward, else at the last.
	pub fn start(&mut self) -> Result<(), AnimationError> {
		if self.cursor.forward {
			self.start_at(0)
		} else {
			self.start_at(StartFrame::Last)
		}
	}

	/// Stops playback.
	pub fn stop(&mut self) {
		self.cursor.stop();
	}

	/// Advances one step in the playback direction.
	pub fn advance_forward(&mut self) {
		self.cursor.step(self.frames.len());
	}

	/// Advances one step against the playback direction.
	pub fn advance_backward(&mut self) {
		self.cursor.step_backward(self.frames.len());
	}

	/// Steps back to the previous frame by swapping the current and previous index.
	pub fn rewind_one(&mut self) {
		self.cursor.rewind_one();
	}

	/// Computes the index the next advance would move to.
	pub fn peek_next_index(&self) -> NextIndex {
		self.cursor.peek_next_index(self.frames.len())
	}

	/// Returns `true` once playback is idle.
	///
	/// An animation in [`PlaybackState::Error`] is not done yet; it shows the blank
	/// frame and drops to idle on the next advance.
	pub fn is_done(&self) -> bool {
		self.cursor.state == PlaybackState::Idle
	}

	fn shown(&self, index: Option<usize>) -> &Frame {
		if self.cursor.state == PlaybackState::Idle {
			return &self.blank;
		}
		index.and_then(|i| self.frames.get(i)).unwrap_or(&self.blank)
	}

	/// Returns the frame the display should show now.
	pub fn current(&self) -> &Frame {
		self.shown(self.cursor.current)
	}

	/// Returns the frame the next advance will show.
	pub fn next(&self) -> &Frame {
		self.shown(self.peek_next_index().frame())
	}

	/// Returns the frame shown before the current one.
	pub fn previous(&self) -> &Frame {
		self.shown(self.cursor.previous)
	}

	// Placement

	/// Sets the origin within this animation's canvas.
	pub fn set_origin(&mut self, x: i32, y: i32) {
		self.origin = (x, y);
	}

	/// Returns the origin within this animation's canvas.
	pub fn origin(&self) -> (i32, i32) {
		self.origin
	}

	/// Sets where the origin is placed inside an external canvas.
	pub fn set_location(&mut self, x: i32, y: i32) {
		self.location = (x, y);
	}

	/// Returns where the origin is placed inside an external canvas.
	pub fn location(&self) -> (i32, i32) {
		self.location
	}

	/// Returns the location of this animation's `(0, 0)` pixel in the external
	/// canvas, regardless of where its origin is.
	pub fn absolute_location(&self) -> (i64, i64) {
		(
			i64::from(self.location.0) - i64::from(self.origin.0),
			i64::from(self.location.1) - i64::from(self.origin.1),
		)
	}

	// Storage support

	/// Drops every frame and stops playback.
	pub(crate) fn release_frames(&mut self) {
		self.frames = Vec::new();
		self.cursor.stop();
	}

	/// Installs decoded frames and cursor.
	pub(crate) fn install(&mut self, cols: u16, rows: u16, frames: Vec<Frame>, cursor: PlaybackCursor) {
		self.cols = cols;
		self.rows = rows;
		self.frames = frames;
		self.cursor = cursor;
		self.blank = blank::shared(cols, rows);
	}

	/// Appends blank frames until there are `count`, checking memory first.
	pub(crate) fn grow_to(&mut self, count: usize) -> Result<(), AnimationError> {
		let missing = count.saturating_sub(self.frames.len());
		if missing == 0 {
			return Ok(());
		}
		let per_frame = self.cols as usize * self.rows as usize * INTENSITY_SIZE;
		self.guard.check(missing.saturating_mul(per_frame))?;

		let mut appended = Vec::with_capacity(missing);
		for _ in 0..missing {
			appended.push(Frame::new(self.cols, self.rows, &self.guard)?);
		}
		log::info!("grew animation from {} to {} frames", self.frames.len(), count);
		self.frames.append(&mut appended);
		Ok(())
	}
}

impl Display for Animation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Animation: {}x{} frames={} type={} state={} forward={} current={:?}",
			self.cols,
			self.rows,
			self.frames.len(),
			self.cursor.playback_type,
			self.cursor.state,
			self.cursor.forward,
			self.cursor.current
		)
	}
}
