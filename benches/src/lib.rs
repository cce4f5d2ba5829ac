//! Benchmark helper utilities for magmatrix
//!
//! This module provides generators for synthetic animations and their stored
//! payloads, so the benchmarks do not depend on files from a real SD card.

use magmatrix_types::{
	animation::Animation,
	constants::MAX_INTENSITY,
	frame::Frame,
	memory::MemoryGuard,
	persist::encode_payload,
};

/// Generates an animation whose pixels form a diagonal gradient that shifts by one
/// column per frame.
pub fn generate_animation(num_frames: usize, cols: u16, rows: u16) -> Animation {
	let span = u32::from(cols) + u32::from(rows);
	let frames = (0..num_frames)
		.map(|i| {
			let pixels = (0..rows as usize)
				.flat_map(|y| (0..cols as usize).map(move |x| (x, y)))
				.map(|(x, y)| {
					let step = (x + y + i) as u32 % span;
					(step * u32::from(MAX_INTENSITY) / span) as u16
				})
				.collect();
			Frame::from_pixels(cols, rows, pixels).unwrap()
		})
		.collect();
	Animation::from_frames(frames, MemoryGuard::unlimited()).unwrap()
}

/// Generates the `A{N}_D.bin` payload of [`generate_animation`].
pub fn generate_payload(num_frames: usize, cols: u16, rows: u16) -> Vec<u8> {
	encode_payload(&generate_animation(num_frames, cols, rows))
}

/// Common animation sizes for benchmarking
pub mod sizes {
	/// Driven window of the board: 19x10
	pub const DEFAULT: (u16, u16) = (19, 10);
	/// Full board: 21x12
	pub const HARDWARE: (u16, u16) = (21, 12);
	/// Tiled wall of boards: 84x48
	pub const WALL: (u16, u16) = (84, 48);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_animation() {
		let anim = generate_animation(4, 19, 10);
		assert_eq!(anim.num_frames(), 4);
		assert_eq!(anim.size(), (19, 10));
		assert_ne!(anim.frame(0), anim.frame(1));
		assert!(anim.frames().iter().flat_map(Frame::pixels).all(|&p| p <= MAX_INTENSITY));
	}

	#[test]
	fn test_generate_payload() {
		let data = generate_payload(3, 21, 12);
		assert_eq!(data.len(), 3 * 21 * 12 * 2);
	}
}
