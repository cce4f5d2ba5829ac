//! Shared read-only blank frames.
//!
//! An idle animation reports a zero-filled frame of its own dimensions. One such
//! frame is built per distinct size and handed out as `Arc<Frame>`; nobody ever
//! receives a mutable reference to it.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex, OnceLock},
};

use crate::frame::Frame;

static BLANK_FRAMES: OnceLock<Mutex<HashMap<(u16, u16), Arc<Frame>>>> = OnceLock::new();

/// Returns the shared blank frame for `width × height`.
pub fn shared(width: u16, height: u16) -> Arc<Frame> {
	let cache = BLANK_FRAMES.get_or_init(|| Mutex::new(HashMap::new()));
	let mut frames = match cache.lock() {
		Ok(guard) => guard,
		Err(poisoned) => poisoned.into_inner(),
	};
	frames
		.entry((width, height))
		.or_insert_with(|| {
			log::debug!("creating shared blank frame {}x{}", width, height);
			Arc::new(Frame::zeroed(width, height))
		})
		.clone()
}
