//! End-to-end tests for `magmatrix`

mod compose;
mod persist;
mod playback;

use magmatrix::prelude::*;

/// Initializes the logger once; `RUST_LOG` overrides the default level.
pub(crate) fn init_logger() {
	let _ = env_logger::builder()
		.is_test(true)
		.parse_env(env_logger::Env::default().default_filter_or("info"))
		.try_init();
}

/// Builds an animation whose frame `i` is filled with intensity `i + 1`.
pub(crate) fn numbered(num_frames: usize, cols: u16, rows: u16) -> Animation {
	let frames = (0..num_frames)
		.map(|i| {
			let mut frame = Frame::new(cols, rows, &MemoryGuard::unlimited()).unwrap();
			frame.fill(i as u16 + 1);
			frame
		})
		.collect();
	Animation::from_frames(frames, MemoryGuard::unlimited()).unwrap()
}

/// Plays `ticks` ticks and returns the value shown at `(0, 0)` on each one.
pub(crate) fn play(anim: &mut Animation, ticks: usize) -> Vec<u16> {
	let mut shown = Vec::with_capacity(ticks);
	for _ in 0..ticks {
		shown.push(anim.current().get(0, 0));
		anim.advance_forward();
	}
	shown
}
