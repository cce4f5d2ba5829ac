//! The comma-separated config record stored in `A{N}_C.txt`.

use std::{fmt::Display, str::FromStr};

use crate::{
	animation::{Animation, PlaybackCursor, PlaybackState, PlaybackType},
	error::PersistError,
};

/// Number of fields in a config record
pub const FIELD_COUNT: usize = 11;

/// Largest config record file accepted on load, in bytes
pub const MAX_RECORD_LEN: usize = 256;

/// Field names in record order
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
	"cols",
	"rows",
	"num_frames",
	"playback_type",
	"playback_state",
	"direction_forward",
	"current_index",
	"previous_index",
	"loop_iteration",
	"max_iterations",
	"start_index",
];

/// Dimensions, frame count and playback state of a stored animation.
///
/// Serialized as eleven comma-separated decimal integers with no spaces, in the
/// order of [`FIELD_NAMES`]. A missing frame index is written as `-1`.
///
/// # Examples
///
/// ```
/// use magmatrix_types::persist::ConfigRecord;
///
/// # fn main() -> Result<(), magmatrix_types::error::PersistError> {
/// let record = ConfigRecord::parse("19,10,2,1,0,1,0,-1,0,-1,0")?;
/// assert_eq!((record.cols, record.rows, record.num_frames), (19, 10, 2));
/// assert_eq!(record.previous_index, None);
/// assert_eq!(record.to_string(), "19,10,2,1,0,1,0,-1,0,-1,0");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigRecord {
	/// Frame width
	pub cols: u16,
	/// Frame height
	pub rows: u16,
	/// Number of frames in the data record
	pub num_frames: usize,
	/// Playback policy
	pub playback_type: PlaybackType,
	/// Playback state
	pub playback_state: PlaybackState,
	/// Playback direction
	pub direction_forward: bool,
	/// Current frame index
	pub current_index: Option<usize>,
	/// Previous frame index
	pub previous_index: Option<usize>,
	/// Loop counter
	pub loop_iteration: i32,
	/// Loop limit
	pub max_iterations: i32,
	/// Index playback started at
	pub start_index: usize,
}

impl ConfigRecord {
	/// Captures the record describing `anim`.
	pub fn from_animation(anim: &Animation) -> Self {
		let cursor = anim.cursor();
		Self {
			cols: anim.cols(),
			rows: anim.rows(),
			num_frames: anim.num_frames(),
			playback_type: cursor.playback_type,
			playback_state: cursor.state,
			direction_forward: cursor.forward,
			current_index: cursor.current,
			previous_index: cursor.previous,
			loop_iteration: cursor.loop_iteration,
			max_iterations: cursor.max_iterations,
			start_index: cursor.start_index,
		}
	}

	/// Parses a record, tolerating whitespace around fields and a trailing newline.
	///
	/// # Errors
	///
	/// Returns [`PersistError::FieldCount`] when there are not exactly eleven
	/// fields, or [`PersistError::InvalidField`] for the first field that is not
	/// an integer or is out of range.
	pub fn parse(text: &str) -> Result<Self, PersistError> {
		let fields: Vec<&str> = text.trim().split(',').map(str::trim).collect();
		if fields.len() != FIELD_COUNT {
			return Err(PersistError::FieldCount {
				expected: FIELD_COUNT,
				actual: fields.len(),
			});
		}

		let cols: u16 = parse_field(&fields, 0)?;
		let rows: u16 = parse_field(&fields, 1)?;
		let num_frames: usize = parse_field(&fields, 2)?;
		if cols == 0 {
			return Err(invalid(&fields, 0));
		}
		if rows == 0 {
			return Err(invalid(&fields, 1));
		}
		if num_frames == 0 {
			return Err(invalid(&fields, 2));
		}

		let playback_type = PlaybackType::from_code(parse_field(&fields, 3)?);
		let playback_state = PlaybackState::from_code(parse_field(&fields, 4)?).ok_or_else(|| invalid(&fields, 4))?;
		let direction_forward = match parse_field::<i32>(&fields, 5)? {
			0 => false,
			1 => true,
			_ => return Err(invalid(&fields, 5)),
		};
		let current_index = parse_index(&fields, 6, num_frames)?;
		let previous_index = parse_index(&fields, 7, num_frames)?;
		let loop_iteration = parse_field(&fields, 8)?;
		let max_iterations = parse_field(&fields, 9)?;
		let start_index: usize = parse_field(&fields, 10)?;
		if start_index >= num_frames {
			return Err(invalid(&fields, 10));
		}

		Ok(Self {
			cols,
			rows,
			num_frames,
			playback_type,
			playback_state,
			direction_forward,
			current_index,
			previous_index,
			loop_iteration,
			max_iterations,
			start_index,
		})
	}

	/// Returns the payload size in bytes this record promises.
	pub fn payload_len(&self) -> usize {
		self.num_frames
			.saturating_mul(self.cols as usize * self.rows as usize)
			.saturating_mul(crate::constants::INTENSITY_SIZE)
	}

	/// Builds the play cursor this record describes.
	pub fn cursor(&self) -> PlaybackCursor {
		PlaybackCursor {
			playback_type: self.playback_type,
			state: self.playback_state,
			forward: self.direction_forward,
			current: self.current_index,
			previous: self.previous_index,
			loop_iteration: self.loop_iteration,
			max_iterations: self.max_iterations,
			start_index: self.start_index,
		}
	}
}

fn invalid(fields: &[&str], index: usize) -> PersistError {
	PersistError::InvalidField {
		field: FIELD_NAMES[index],
		value: fields[index].to_string(),
	}
}

fn parse_field<T: FromStr>(fields: &[&str], index: usize) -> Result<T, PersistError> {
	fields[index].parse().map_err(|_| invalid(fields, index))
}

fn parse_index(fields: &[&str], index: usize, num_frames: usize) -> Result<Option<usize>, PersistError> {
	match parse_field::<i64>(fields, index)? {
		-1 => Ok(None),
		value if value >= 0 && (value as u64) < num_frames as u64 => Ok(Some(value as usize)),
		_ => Err(invalid(fields, index)),
	}
}

fn index_code(index: Option<usize>) -> i64 {
	index.map_or(-1, |i| i as i64)
}

impl Display for ConfigRecord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{},{},{},{},{},{},{},{},{},{},{}",
			self.cols,
			self.rows,
			self.num_frames,
			self.playback_type.code(),
			self.playback_state.code(),
			u8::from(self.direction_forward),
			index_code(self.current_index),
			index_code(self.previous_index),
			self.loop_iteration,
			self.max_iterations,
			self.start_index
		)
	}
}

impl FromStr for ConfigRecord {
	type Err = PersistError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
