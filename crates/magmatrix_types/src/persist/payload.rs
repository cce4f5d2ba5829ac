//! The binary frame payload stored in `A{N}_D.bin`.
//!
//! Frames follow each other in order; inside a frame, rows top to bottom, and
//! inside a row, columns left to right. Every intensity is a little-endian `u16`.

use bytes::{Buf, BufMut};
use magmatrix_storage::{StorageError, StorageFile};

use crate::{
	animation::Animation,
	constants::INTENSITY_SIZE,
	error::PersistError,
	frame::Frame,
	memory::MemoryGuard,
};

/// Serializes every frame of `anim`.
pub fn encode_payload(anim: &Animation) -> Vec<u8> {
	let len = anim.frames().iter().map(Frame::byte_len).sum();
	let mut out = Vec::with_capacity(len);
	for frame in anim.frames() {
		for &value in frame.pixels() {
			out.put_u16_le(value);
		}
	}
	out
}

/// Rebuilds `num_frames` frames of `cols × rows` from `bytes`.
///
/// The whole frame set is checked against `guard` before any buffer is
/// allocated. Bytes past the expected length are ignored.
///
/// # Errors
///
/// Returns [`PersistError::ShortPayload`] when `bytes` is too short, or
/// [`PersistError::Allocation`] when the frames do not fit in memory.
pub fn decode_payload(
	mut bytes: &[u8],
	cols: u16,
	rows: u16,
	num_frames: usize,
	guard: &MemoryGuard,
) -> Result<Vec<Frame>, PersistError> {
	let expected = payload_len(cols, rows, num_frames);
	if bytes.len() < expected {
		return Err(PersistError::ShortPayload {
			expected,
			actual: bytes.len(),
		});
	}
	if bytes.len() > expected {
		log::warn!("ignoring {} trailing payload bytes", bytes.len() - expected);
	}

	guard.check(expected)?;
	let mut frames = Vec::with_capacity(num_frames);
	for _ in 0..num_frames {
		frames.push(decode_frame(&mut bytes, cols, rows, guard)?);
	}
	Ok(frames)
}

/// Reads `num_frames` frames of `cols × rows` from an open data file.
///
/// Frames are read one at a time into freshly allocated buffers; the file is
/// never buffered whole. The frame set plus one frame of read buffer is checked
/// against `guard` first. Bytes past the last frame are left unread.
///
/// # Errors
///
/// Returns [`PersistError::ShortPayload`] when the file ends early,
/// [`PersistError::Allocation`] when the frames do not fit in memory, or
/// [`PersistError::Storage`] when the device fails.
pub fn read_payload<F: StorageFile>(
	file: &mut F,
	cols: u16,
	rows: u16,
	num_frames: usize,
	guard: &MemoryGuard,
) -> Result<Vec<Frame>, PersistError> {
	let expected = payload_len(cols, rows, num_frames);
	let frame_len = payload_len(cols, rows, 1);
	guard.check(expected.saturating_add(frame_len))?;

	let mut chunk = vec![0u8; frame_len];
	let mut frames = Vec::with_capacity(num_frames);
	for _ in 0..num_frames {
		match file.read_exact_len(&mut chunk) {
			Ok(()) => {}
			Err(StorageError::ShortRead {
				actual, ..
			}) => {
				return Err(PersistError::ShortPayload {
					expected,
					actual: frames.len() * frame_len + actual,
				});
			}
			Err(e) => return Err(e.into()),
		}
		frames.push(decode_frame(&mut chunk.as_slice(), cols, rows, guard)?);
	}

	if file.read(&mut [0u8; 1])? > 0 {
		log::warn!("ignoring trailing payload bytes after {} frames", num_frames);
	}
	Ok(frames)
}

fn payload_len(cols: u16, rows: u16, num_frames: usize) -> usize {
	num_frames.saturating_mul(cols as usize * rows as usize).saturating_mul(INTENSITY_SIZE)
}

fn decode_frame(bytes: &mut &[u8], cols: u16, rows: u16, guard: &MemoryGuard) -> Result<Frame, PersistError> {
	let mut pixels = guard.allocate_pixels(cols as usize * rows as usize)?;
	for value in &mut pixels {
		*value = bytes.get_u16_le();
	}
	Ok(Frame::from_raw(cols, rows, pixels))
}
