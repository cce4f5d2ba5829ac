//! Error types for frames, animations and persistence.

use magmatrix_storage::StorageError;
use thiserror::Error;

/// Errors raised before or during a checked buffer allocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
	/// Not enough free memory to honour the request and keep the safety margin
	#[error(
		"Insufficient memory: requested {requested} bytes with a {margin} byte margin, but only {available} bytes available"
	)]
	Insufficient {
		/// Bytes requested
		requested: usize,
		/// Bytes reported free by the memory probe
		available: usize,
		/// Safety margin that must stay free
		margin: usize,
	},

	/// The allocator refused a request that passed the free-memory check
	#[error("Allocator failed to provide {requested} bytes")]
	Allocator {
		/// Bytes requested
		requested: usize,
	},
}

/// Errors that can occur when building or modifying a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
	/// Width or height is zero
	#[error("Invalid frame dimensions: {width}x{height}")]
	InvalidDimensions {
		/// Requested width
		width: u16,
		/// Requested height
		height: u16,
	},

	/// Supplied buffer does not match the frame dimensions
	#[error("Pixel count mismatch: expected {expected} values, got {actual}")]
	PixelCountMismatch {
		/// `width * height`
		expected: usize,
		/// Length of the supplied buffer
		actual: usize,
	},

	/// Allocation error
	#[error(transparent)]
	Allocation(#[from] AllocationError),
}

/// Errors that can occur when building or driving an animation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
	/// The animation holds no frames
	#[error("Animation has no frames")]
	Empty,

	/// Frame index out of range
	#[error("Frame index {index} out of range (total frames: {count})")]
	FrameOutOfRange {
		/// Requested index
		index: usize,
		/// Number of frames
		count: usize,
	},

	/// A frame does not match the animation dimensions
	#[error("Frame dimension mismatch: expected {expected:?}, got {actual:?}")]
	DimensionMismatch {
		/// Animation `(cols, rows)`
		expected: (u16, u16),
		/// Frame `(width, height)`
		actual: (u16, u16),
	},

	/// Number of supplied buffers does not match the frame count
	#[error("Frame count mismatch: expected {expected} frames, got {actual}")]
	FrameCountMismatch {
		/// Frames in the animation
		expected: usize,
		/// Buffers supplied
		actual: usize,
	},

	/// Frame error
	#[error(transparent)]
	Frame(#[from] FrameError),

	/// Allocation error
	#[error(transparent)]
	Allocation(#[from] AllocationError),
}

/// Errors that can occur when saving or loading an animation
#[derive(Debug, Error)]
pub enum PersistError {
	/// Config record does not have the expected number of fields
	#[error("Config record field count mismatch: expected {expected} fields, found {actual}")]
	FieldCount {
		/// Expected number of fields
		expected: usize,
		/// Actual number of fields
		actual: usize,
	},

	/// Config record field could not be parsed or is out of range
	#[error("Invalid config field '{field}': {value:?}")]
	InvalidField {
		/// Field name
		field: &'static str,
		/// Raw field text
		value: String,
	},

	/// Config record file is longer than any valid record
	#[error("Config record exceeds {limit} bytes")]
	RecordTooLong {
		/// Largest accepted record in bytes
		limit: usize,
	},

	/// Data record holds fewer bytes than the config record promises
	#[error("Short payload: expected {expected} bytes, got {actual} bytes")]
	ShortPayload {
		/// `num_frames * cols * rows * 2`
		expected: usize,
		/// Bytes available
		actual: usize,
	},

	/// Storage error
	#[error(transparent)]
	Storage(#[from] StorageError),

	/// Allocation error
	#[error(transparent)]
	Allocation(#[from] AllocationError),

	/// Animation error
	#[error(transparent)]
	Animation(#[from] AnimationError),
}

impl From<FrameError> for PersistError {
	fn from(value: FrameError) -> Self {
		match value {
			FrameError::Allocation(e) => Self::Allocation(e),
			other => Self::Animation(AnimationError::Frame(other)),
		}
	}
}
