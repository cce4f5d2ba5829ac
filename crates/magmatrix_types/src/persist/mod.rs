//! Saving and loading animations through a [`Storage`] device.
//!
//! An animation saved under index `N` occupies two files:
//!
//! - `A{N}_C.txt`: the [`ConfigRecord`], readable and editable by hand
//! - `A{N}_D.bin`: the frame payload, see [`encode_payload`]
//!
//! Store indices run from `0` to `65535`. Saving never touches the animation.
//! Loading releases the old frames first, so a failed load leaves an animation
//! with no frames that shows the blank frame. The payload is read one frame at a
//! time after the memory check, never buffered whole. Origin and location are
//! runtime placement and are not stored.
//!
//! # Examples
//!
//! ```
//! use magmatrix_storage::MemStorage;
//! use magmatrix_types::animation::{Animation, PlaybackType};
//! use magmatrix_types::memory::MemoryGuard;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut storage = MemStorage::new();
//! let mut anim = Animation::new(3, 4, 4, MemoryGuard::unlimited())?;
//! anim.set_playback_type(PlaybackType::Bounce);
//! anim.save_to(&mut storage, 7)?;
//!
//! let restored = Animation::restore(&mut storage, 7, MemoryGuard::unlimited())?;
//! assert_eq!(restored.playback_type(), PlaybackType::Bounce);
//! assert_eq!(restored.frames(), anim.frames());
//! # Ok(())
//! # }
//! ```

mod payload;
mod record;

#[cfg(test)]
mod tests;

use magmatrix_storage::{OpenMode, Storage, StorageFile};

pub use self::payload::{decode_payload, encode_payload, read_payload};
pub use self::record::{ConfigRecord, FIELD_COUNT, FIELD_NAMES, MAX_RECORD_LEN};

use crate::{animation::Animation, error::PersistError, memory::MemoryGuard};

/// Returns the config record file name for index `index`.
pub fn config_file_name(index: u16) -> String {
	format!("A{}_C.txt", index)
}

/// Returns the payload file name for index `index`.
pub fn data_file_name(index: u16) -> String {
	format!("A{}_D.bin", index)
}

fn write_file<S: Storage>(storage: &mut S, name: &str, data: &[u8]) -> Result<(), PersistError> {
	let mut file = storage.open(name, OpenMode::Write)?;
	file.write_all_checked(data)?;
	file.flush()?;
	file.close()?;
	Ok(())
}

/// Reads the config record stored under `index`.
///
/// At most [`MAX_RECORD_LEN`] bytes are read.
///
/// # Errors
///
/// Returns [`PersistError::Storage`] when the file cannot be read,
/// [`PersistError::RecordTooLong`] when it holds more than [`MAX_RECORD_LEN`]
/// bytes, or a record error when it is malformed.
pub fn read_record<S: Storage>(storage: &mut S, index: u16) -> Result<ConfigRecord, PersistError> {
	let mut file = storage.open(&config_file_name(index), OpenMode::Read)?;
	let mut buf = [0u8; MAX_RECORD_LEN + 1];
	let mut len = 0;
	loop {
		let n = file.read(&mut buf[len..])?;
		if n == 0 {
			break;
		}
		len += n;
		if len > MAX_RECORD_LEN {
			return Err(PersistError::RecordTooLong {
				limit: MAX_RECORD_LEN,
			});
		}
	}
	file.close()?;
	ConfigRecord::parse(&String::from_utf8_lossy(&buf[..len]))
}

/// Writes `anim` to `storage` under index `index`.
///
/// Existing files with the same names are replaced.
///
/// # Errors
///
/// Returns [`PersistError::Storage`] when a file cannot be opened or written.
pub fn save<S: Storage>(anim: &Animation, storage: &mut S, index: u16) -> Result<(), PersistError> {
	let config_name = config_file_name(index);
	let data_name = data_file_name(index);

	let result = write_file(storage, &config_name, ConfigRecord::from_animation(anim).to_string().as_bytes())
		.and_then(|()| write_file(storage, &data_name, &encode_payload(anim)));

	match &result {
		Ok(()) => log::info!("saved {} frames to {} and {}", anim.num_frames(), config_name, data_name),
		Err(e) => log::error!("failed to save animation {}: {}", index, e),
	}
	result
}

/// Replaces the frames and playback state of `anim` with the ones stored under `index`.
///
/// The old frames are released before anything is read. On failure `anim` is
/// left with no frames.
///
/// # Errors
///
/// Returns [`PersistError::Storage`] when a file cannot be read, a record error
/// when the config record is malformed or too long, [`PersistError::ShortPayload`]
/// when the payload is truncated, or [`PersistError::Allocation`] when the
/// frames do not fit in memory.
pub fn load<S: Storage>(anim: &mut Animation, storage: &mut S, index: u16) -> Result<(), PersistError> {
	anim.release_frames();

	let config_name = config_file_name(index);
	let data_name = data_file_name(index);
	let guard = anim.guard().clone();

	let result = read_record(storage, index).and_then(|record| {
		let mut file = storage.open(&data_name, OpenMode::Read)?;
		let frames = read_payload(&mut file, record.cols, record.rows, record.num_frames, &guard)?;
		file.close()?;
		Ok((record, frames))
	});

	match result {
		Ok((record, frames)) => {
			anim.install(record.cols, record.rows, frames, record.cursor());
			log::info!(
				"loaded {} frames of {}x{} from {} and {}",
				record.num_frames,
				record.cols,
				record.rows,
				config_name,
				data_name
			);
			Ok(())
		}
		Err(e) => {
			log::error!("failed to load animation {}: {}", index, e);
			Err(e)
		}
	}
}

impl Animation {
	/// Writes this animation under index `index`. See [`save`].
	pub fn save_to<S: Storage>(&self, storage: &mut S, index: u16) -> Result<(), PersistError> {
		save(self, storage, index)
	}

	/// Replaces this animation with the one stored under `index`. See [`load`].
	pub fn load_from<S: Storage>(&mut self, storage: &mut S, index: u16) -> Result<(), PersistError> {
		load(self, storage, index)
	}

	/// Loads the animation stored under `index` into a new animation.
	pub fn restore<S: Storage>(storage: &mut S, index: u16, guard: MemoryGuard) -> Result<Self, PersistError> {
		let mut anim = Self::placeholder(guard);
		load(&mut anim, storage, index)?;
		Ok(anim)
	}
}
