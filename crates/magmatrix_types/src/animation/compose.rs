//! Merging one animation into another.
//!
//! Coordinates are taken relative to the target's origin. The target canvas is
//! its own grid shifted by `-origin`; the source occupies its grid shifted by
//! [`Animation::absolute_location`]. Sources that do not touch the canvas are
//! rejected without touching the target.

use std::fmt::Display;

use super::Animation;
use crate::error::AnimationError;

/// A half-open rectangle `[left, right) × [top, bottom)`.
///
/// Edges are `i64` so any placement built from `i32` origins and locations is
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasRect {
	/// Leftmost column
	pub left: i64,
	/// Topmost row
	pub top: i64,
	/// One past the rightmost column
	pub right: i64,
	/// One past the bottom row
	pub bottom: i64,
}

impl CanvasRect {
	/// Creates a rectangle at `(x, y)` with the given size.
	pub fn new(x: i64, y: i64, width: u16, height: u16) -> Self {
		Self {
			left: x,
			top: y,
			right: x.saturating_add(i64::from(width)),
			bottom: y.saturating_add(i64::from(height)),
		}
	}

	/// Returns `true` if the rectangles share at least one pixel.
	pub fn intersects(&self, other: &CanvasRect) -> bool {
		self.left < other.right && other.left < self.right && self.top < other.bottom && other.top < self.bottom
	}
}

/// What a merge or unmerge did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeOutcome {
	/// The source lies entirely outside the target canvas; nothing changed
	OutsideCanvas,
	/// `frames` frames were blended into a target of `of` frames
	Merged {
		/// Frames blended
		frames: usize,
		/// Frames in the target afterwards
		of: usize,
	},
}

impl Display for MergeOutcome {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::OutsideCanvas => write!(f, "outside canvas"),
			Self::Merged {
				frames,
				of,
			} => write!(f, "merged {} of {} frames", frames, of),
		}
	}
}

impl Animation {
	/// Returns the canvas of this animation, relative to its origin.
	pub fn canvas(&self) -> CanvasRect {
		CanvasRect::new(-i64::from(self.origin.0), -i64::from(self.origin.1), self.cols, self.rows)
	}

	/// Returns the area `source` covers when placed on this animation's canvas.
	pub fn placement_of(&self, source: &Animation) -> CanvasRect {
		let (x, y) = source.absolute_location();
		CanvasRect::new(x, y, source.cols, source.rows)
	}

	/// Offset of `source` pixels inside this animation's frames, or `None` when
	/// it does not fit in `i32`. Any source that touches the canvas fits.
	fn pixel_offset(&self, source: &Animation) -> Option<(i32, i32)> {
		let (x, y) = source.absolute_location();
		let dx = i32::try_from(x + i64::from(self.origin.0)).ok()?;
		let dy = i32::try_from(y + i64::from(self.origin.1)).ok()?;
		Some((dx, dy))
	}

	/// Checks that `source` touches the canvas and returns its pixel offset.
	fn overlap_offset(&self, source: &Animation) -> Option<(i32, i32)> {
		let placement = self.placement_of(source);
		if !self.canvas().intersects(&placement) {
			log::debug!("source at {:?} lies outside canvas {:?}", placement, self.canvas());
			return None;
		}
		self.pixel_offset(source)
	}

	/// Adds `source` onto this animation, frame by frame.
	///
	/// When `source` has more frames, blank frames are appended first so every
	/// source frame lands somewhere. Frame `i` of the source is blended into frame
	/// `i` of this animation. Playback state is left alone.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::Allocation`] when the extra frames do not fit in
	/// memory. The animation is unchanged in that case.
	///
	/// # Examples
	///
	/// ```
	/// use magmatrix_types::animation::{Animation, MergeOutcome};
	/// use magmatrix_types::memory::MemoryGuard;
	///
	/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
	/// let mut canvas = Animation::new(1, 10, 10, MemoryGuard::unlimited())?;
	/// let mut sprite = Animation::new(3, 2, 2, MemoryGuard::unlimited())?;
	/// sprite.set_location(4, 4);
	///
	/// let outcome = canvas.merge_with(&sprite)?;
	/// assert_eq!(outcome, MergeOutcome::Merged { frames: 3, of: 3 });
	/// # Ok(())
	/// # }
	/// ```
	pub fn merge_with(&mut self, source: &Animation) -> Result<MergeOutcome, AnimationError> {
		let Some((dx, dy)) = self.overlap_offset(source) else {
			return Ok(MergeOutcome::OutsideCanvas);
		};

		if let Err(e) = self.grow_to(source.num_frames()) {
			log::warn!("cannot grow animation to {} frames for merge: {}", source.num_frames(), e);
			return Err(e);
		}

		let frames = self.frames.len().min(source.frames.len());
		for (target, frame) in self.frames.iter_mut().zip(&source.frames) {
			target.merge_with(dx, dy, frame);
		}
		log::debug!("merged {} frames at offset ({}, {})", frames, dx, dy);

		Ok(MergeOutcome::Merged {
			frames,
			of: self.frames.len(),
		})
	}

	/// Subtracts `source` from this animation, undoing a matching [`Animation::merge_with`].
	///
	/// Never adds frames; only the frames both animations have are touched.
	pub fn unmerge_with(&mut self, source: &Animation) -> MergeOutcome {
		let Some((dx, dy)) = self.overlap_offset(source) else {
			return MergeOutcome::OutsideCanvas;
		};

		let frames = self.frames.len().min(source.frames.len());
		for (target, frame) in self.frames.iter_mut().zip(&source.frames) {
			target.unmerge_with(dx, dy, frame);
		}
		log::debug!("unmerged {} frames at offset ({}, {})", frames, dx, dy);

		MergeOutcome::Merged {
			frames,
			of: self.frames.len(),
		}
	}
}
