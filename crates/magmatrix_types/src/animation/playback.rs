//! Playback policies and the play cursor state machine.
//!
//! The cursor walks an index over `num_frames` frames. Interior steps only depend
//! on the direction; what happens on an edge (first or last frame) depends on
//! the [`PlaybackType`]:
//!
//! ```text
//! Policy        Edge behaviour
//! ------------  ---------------------------------------------------------------
//! Once          leave the start edge once, finish on the next edge
//! Loop          wrap around to the other end
//! Bounce        keep stepping; the direction flips on every edge but the first
//! LoopNTimes    like Loop, finish once loop_iteration reaches max_iterations
//! ```
//!
//! [`PlaybackCursor::peek_next_index`] computes the next index without touching
//! any field. [`PlaybackCursor::step`] does the bookkeeping (iteration counter,
//! bounce direction) and then commits the peeked index.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// How an animation behaves when it reaches the first or last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackType {
	/// Play through once
	Once,
	/// Loop forever
	#[default]
	Loop,
	/// Run back and forth forever
	Bounce,
	/// Loop until `max_iterations` is reached
	LoopNTimes,
	/// A code read from storage that names no known policy
	Unrecognized(i32),
}

impl PlaybackType {
	/// Converts a stored code to a `PlaybackType`
	pub fn from_code(code: i32) -> Self {
		match code {
			0 => Self::Once,
			1 => Self::Loop,
			2 => Self::Bounce,
			3 => Self::LoopNTimes,
			other => Self::Unrecognized(other),
		}
	}

	/// Converts a `PlaybackType` to its stored code
	pub fn code(self) -> i32 {
		match self {
			Self::Once => 0,
			Self::Loop => 1,
			Self::Bounce => 2,
			Self::LoopNTimes => 3,
			Self::Unrecognized(code) => code,
		}
	}
}

impl Display for PlaybackType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Once => write!(f, "Once"),
			Self::Loop => write!(f, "Loop"),
			Self::Bounce => write!(f, "Bounce"),
			Self::LoopNTimes => write!(f, "Loop N times"),
			Self::Unrecognized(code) => write!(f, "Unrecognized({})", code),
		}
	}
}

/// Whether an animation is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlaybackState {
	/// Not advancing, reports the blank frame
	#[default]
	Idle = 0,
	/// Advancing normally
	Running = 1,
	/// Hit an unrecognized policy; becomes `Idle` on the next advance
	Error = 2,
}

impl PlaybackState {
	/// Converts a stored code to a `PlaybackState`
	pub fn from_code(code: i32) -> Option<Self> {
		match code {
			0 => Some(Self::Idle),
			1 => Some(Self::Running),
			2 => Some(Self::Error),
			_ => None,
		}
	}

	/// Converts a `PlaybackState` to its stored code
	pub fn code(self) -> i32 {
		self as i32
	}
}

impl Display for PlaybackState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Idle => write!(f, "Idle"),
			Self::Running => write!(f, "Running"),
			Self::Error => write!(f, "Error"),
		}
	}
}

/// Result of computing the index after the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextIndex {
	/// Show this frame next
	Frame(usize),
	/// The sequence is over
	Finished,
	/// The playback type is not recognized
	PolicyError,
}

impl NextIndex {
	/// Returns the frame index, if any.
	pub fn frame(self) -> Option<usize> {
		match self {
			Self::Frame(index) => Some(index),
			Self::Finished | Self::PolicyError => None,
		}
	}
}

/// Returns `true` if `index` is the first or last of `num_frames` frames.
pub fn is_edge(index: usize, num_frames: usize) -> bool {
	index == 0 || index + 1 == num_frames
}

/// Play cursor: policy, state, direction and the indices it moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaybackCursor {
	pub(crate) playback_type: PlaybackType,
	pub(crate) state: PlaybackState,
	pub(crate) forward: bool,
	pub(crate) current: Option<usize>,
	pub(crate) previous: Option<usize>,
	pub(crate) loop_iteration: i32,
	pub(crate) max_iterations: i32,
	pub(crate) start_index: usize,
}

impl Default for PlaybackCursor {
	fn default() -> Self {
		Self {
			playback_type: PlaybackType::Loop,
			state: PlaybackState::Idle,
			forward: true,
			current: Some(0),
			previous: None,
			loop_iteration: 0,
			max_iterations: -1,
			start_index: 0,
		}
	}
}

impl PlaybackCursor {
	/// Creates an idle cursor with the given policy.
	pub fn new(playback_type: PlaybackType) -> Self {
		Self {
			playback_type,
			..Self::default()
		}
	}

	/// Returns the playback policy.
	pub fn playback_type(&self) -> PlaybackType {
		self.playback_type
	}

	/// Returns the playback state.
	pub fn state(&self) -> PlaybackState {
		self.state
	}

	/// Returns `true` when stepping forward.
	pub fn direction_forward(&self) -> bool {
		self.forward
	}

	/// Returns the current index.
	pub fn current(&self) -> Option<usize> {
		self.current
	}

	/// Returns the previous index.
	pub fn previous(&self) -> Option<usize> {
		self.previous
	}

	/// Returns the loop counter.
	pub fn loop_iteration(&self) -> i32 {
		self.loop_iteration
	}

	/// Returns the loop limit used by [`PlaybackType::LoopNTimes`].
	pub fn max_iterations(&self) -> i32 {
		self.max_iterations
	}

	/// Returns the index playback started at.
	pub fn start_index(&self) -> usize {
		self.start_index
	}

	/// Starts running at `index`.
	pub fn start(&mut self, index: usize) {
		self.state = PlaybackState::Running;
		self.start_index = index;
		self.current = Some(index);
		self.loop_iteration = 0;
	}

	/// Stops playback; the cursor reports no frame.
	pub fn stop(&mut self) {
		self.state = PlaybackState::Idle;
		self.current = None;
	}

	/// Computes the index that follows the current one. Touches nothing.
	pub fn peek_next_index(&self, num_frames: usize) -> NextIndex {
		let Some(current) = self.current.filter(|&c| c < num_frames) else {
			return NextIndex::Finished;
		};

		if !is_edge(current, num_frames) {
			return NextIndex::Frame(if self.forward {
				current + 1
			} else {
				current - 1
			});
		}

		let candidate = match self.playback_type {
			PlaybackType::Loop => self.wrap(current, num_frames),
			PlaybackType::Once => {
				if current != self.start_index {
					return NextIndex::Finished;
				}
				let bounce = match (self.forward, current == 0) {
					(true, true) => Some(1),
					(true, false) => Some(0),
					(false, true) => Some(num_frames - 1),
					(false, false) => Some(current - 1),
				};
				// a single frame has nowhere to bounce to
				bounce.filter(|&next| next != current)
			}
			PlaybackType::Bounce => {
				if num_frames == 1 {
					Some(0)
				} else if self.forward {
					Some(current + 1)
				} else {
					current.checked_sub(1)
				}
			}
			PlaybackType::LoopNTimes => {
				if self.loop_iteration >= self.max_iterations {
					return NextIndex::Finished;
				}
				self.wrap(current, num_frames)
			}
			PlaybackType::Unrecognized(_) => return NextIndex::PolicyError,
		};

		match candidate {
			Some(next) if next < num_frames => NextIndex::Frame(next),
			_ => NextIndex::Finished,
		}
	}

	fn wrap(&self, current: usize, num_frames: usize) -> Option<usize> {
		if self.forward {
			if current != 0 {
				Some(0)
			} else {
				Some(1 % num_frames)
			}
		} else if current == 0 {
			Some(num_frames - 1)
		} else {
			Some(current - 1)
		}
	}

	/// Advances one step in the configured direction.
	pub fn step(&mut self, num_frames: usize) {
		match self.state {
			PlaybackState::Idle => return,
			PlaybackState::Error => {
				self.previous = self.current;
				self.stop();
				return;
			}
			PlaybackState::Running => {}
		}

		let Some(current) = self.current.filter(|&c| c < num_frames) else {
			self.stop();
			return;
		};

		if is_edge(current, num_frames) {
			match self.playback_type {
				PlaybackType::Loop | PlaybackType::LoopNTimes => {
					if current == self.start_index {
						self.loop_iteration = self.loop_iteration.saturating_add(1);
					}
				}
				PlaybackType::Bounce => {
					self.loop_iteration = self.loop_iteration.saturating_add(1);
					if self.loop_iteration != 1 {
						self.forward = !self.forward;
					}
				}
				PlaybackType::Once | PlaybackType::Unrecognized(_) => {}
			}
		}

		self.previous = Some(current);
		self.current = match self.peek_next_index(num_frames) {
			NextIndex::Frame(next) => Some(next),
			NextIndex::Finished => None,
			NextIndex::PolicyError => {
				log::warn!("unrecognized playback type {}, stopping playback", self.playback_type);
				self.state = PlaybackState::Error;
				None
			}
		};

		if self.current.is_none() && self.state != PlaybackState::Error {
			self.state = PlaybackState::Idle;
		}
	}

	/// Advances one step against the configured direction.
	pub fn step_backward(&mut self, num_frames: usize) {
		self.forward = !self.forward;
		self.step(num_frames);
		self.forward = !self.forward;
	}

	/// Swaps the current and previous index.
	pub fn rewind_one(&mut self) {
		std::mem::swap(&mut self.current, &mut self.previous);
	}
}
