//! Saving to and loading from a directory on disk

use magmatrix::prelude::*;

use crate::{init_logger, numbered, play};

#[test]
fn round_trip_through_directory() {
	init_logger();
	let dir = tempfile::tempdir().unwrap();
	let mut storage = DirStorage::open(dir.path()).unwrap();

	let mut anim = numbered(4, 19, 10);
	anim.set_playback_type(PlaybackType::Bounce);
	anim.frame_mut(2).unwrap().set(18, 9, MAX_INTENSITY);
	anim.start().unwrap();
	play(&mut anim, 2);
	anim.save_to(&mut storage, 42).unwrap();

	assert!(dir.path().join("A42_C.txt").exists());
	let data = std::fs::metadata(dir.path().join("A42_D.bin")).unwrap();
	assert_eq!(data.len(), 4 * 19 * 10 * 2);

	let mut restored = Animation::restore(&mut storage, 42, MemoryGuard::unlimited()).unwrap();
	assert_eq!(restored.frames(), anim.frames());
	assert_eq!(play(&mut restored, 6), play(&mut anim, 6));
}

#[test]
fn config_record_is_plain_text() {
	let dir = tempfile::tempdir().unwrap();
	let mut storage = DirStorage::open(dir.path()).unwrap();
	numbered(2, 19, 10).save_to(&mut storage, 0).unwrap();

	let text = std::fs::read_to_string(dir.path().join("A0_C.txt")).unwrap();
	assert_eq!(text, "19,10,2,1,0,1,0,-1,0,-1,0");
}

#[test]
fn hand_edited_record_is_loaded() {
	let dir = tempfile::tempdir().unwrap();
	let mut storage = DirStorage::open(dir.path()).unwrap();
	numbered(3, 4, 4).save_to(&mut storage, 1).unwrap();

	// switch to Once, running, starting from frame 1
	std::fs::write(dir.path().join("A1_C.txt"), "4, 4, 3, 0, 1, 1, 1, -1, 0, -1, 1\n").unwrap();

	let mut anim = Animation::restore(&mut storage, 1, MemoryGuard::unlimited()).unwrap();
	assert_eq!(anim.playback_type(), PlaybackType::Once);
	assert_eq!(play(&mut anim, 4), vec![2, 3, 0, 0]);
}

#[test]
fn failed_load_blanks_the_animation() {
	let dir = tempfile::tempdir().unwrap();
	let mut storage = DirStorage::open(dir.path()).unwrap();
	numbered(2, 4, 4).save_to(&mut storage, 3).unwrap();
	std::fs::write(dir.path().join("A3_D.bin"), [0u8; 10]).unwrap();

	let mut anim = numbered(2, 4, 4);
	anim.start().unwrap();
	let result = anim.load_from(&mut storage, 3);

	assert!(matches!(result, Err(PersistError::ShortPayload { .. })));
	assert_eq!(anim.num_frames(), 0);
	assert!(anim.current().is_blank());
}
