//! Unit tests for saving and loading animations

use magmatrix_storage::{MemStorage, StorageError};

use super::*;
use crate::{
	animation::{PlaybackState, PlaybackType},
	frame::Frame,
	memory::FixedBudget,
};

fn sample() -> Animation {
	let frames = (0..3u16)
		.map(|i| {
			let pixels = (0..12u16).map(|p| p * 100 + i).collect();
			Frame::from_pixels(4, 3, pixels).unwrap()
		})
		.collect();
	let mut anim = Animation::from_frames(frames, MemoryGuard::unlimited()).unwrap();
	anim.set_playback_type(PlaybackType::LoopNTimes);
	anim.set_max_iterations(4);
	anim.start().unwrap();
	anim.advance_forward();
	anim
}

#[test_log::test]
fn test_round_trip() {
	let mut storage = MemStorage::new();
	let anim = sample();
	save(&anim, &mut storage, 3).unwrap();

	assert_eq!(storage.get("A3_C.txt"), Some(&b"4,3,3,3,1,1,1,0,1,4,0"[..]));
	assert_eq!(storage.get("A3_D.bin").map(<[u8]>::len), Some(3 * 12 * 2));

	let mut restored = Animation::new(1, 1, 1, MemoryGuard::unlimited()).unwrap();
	load(&mut restored, &mut storage, 3).unwrap();
	assert_eq!(restored.size(), (4, 3));
	assert_eq!(restored.frames(), anim.frames());
	assert_eq!(restored.cursor(), anim.cursor());
	assert_eq!(ConfigRecord::from_animation(&restored), ConfigRecord::from_animation(&anim));
}

#[test]
fn test_restored_animation_keeps_playing() {
	let mut storage = MemStorage::new();
	let mut anim = sample();
	anim.save_to(&mut storage, 0).unwrap();

	let mut restored = Animation::restore(&mut storage, 0, MemoryGuard::unlimited()).unwrap();
	for _ in 0..4 {
		anim.advance_forward();
		restored.advance_forward();
		assert_eq!(restored.current_index(), anim.current_index());
		assert_eq!(restored.current(), anim.current());
	}
}

#[test]
fn test_save_replaces_longer_files() {
	let mut storage = MemStorage::new();
	storage.insert("A1_C.txt", vec![b'9'; 200]);
	storage.insert("A1_D.bin", vec![0xAA; 4096]);

	let anim = sample();
	anim.save_to(&mut storage, 1).unwrap();
	assert_eq!(storage.get("A1_D.bin"), Some(encode_payload(&anim).as_slice()));
	assert!(ConfigRecord::parse(&String::from_utf8_lossy(storage.get("A1_C.txt").unwrap())).is_ok());
}

#[test]
fn test_save_does_not_touch_animation() {
	let mut storage = MemStorage::new();
	storage.fail_open("A2_D.bin");
	let anim = sample();
	let before = anim.clone();

	let result = anim.save_to(&mut storage, 2);
	assert!(matches!(result, Err(PersistError::Storage(StorageError::OpenFailed { .. }))));
	assert_eq!(anim.frames(), before.frames());
	assert_eq!(anim.cursor(), before.cursor());
}

#[test]
fn test_short_write() {
	let mut storage = MemStorage::new();
	storage.set_write_limit(Some(10));
	let result = sample().save_to(&mut storage, 0);
	assert!(matches!(result, Err(PersistError::Storage(StorageError::ShortWrite { .. }))));
}

#[test_log::test]
fn test_missing_files_leave_no_frames() {
	let mut storage = MemStorage::new();
	let mut anim = sample();

	let result = anim.load_from(&mut storage, 9);
	assert!(matches!(result, Err(PersistError::Storage(StorageError::NotFound(_)))));
	assert_eq!(anim.num_frames(), 0);
	assert_eq!(anim.playback_state(), PlaybackState::Idle);
	assert!(anim.current().is_blank());
}

#[test]
fn test_short_payload() {
	let mut storage = MemStorage::new();
	sample().save_to(&mut storage, 5).unwrap();
	storage.truncate("A5_D.bin", 71);

	let mut anim = sample();
	let result = anim.load_from(&mut storage, 5);
	assert!(matches!(
		result,
		Err(PersistError::ShortPayload {
			expected: 72,
			actual: 71
		})
	));
	assert!(anim.is_empty());
}

#[test]
fn test_malformed_record() {
	let mut storage = MemStorage::new();
	sample().save_to(&mut storage, 4).unwrap();
	storage.insert("A4_C.txt", "4,3,3,3,1,1,1,0,1,4");

	let result = Animation::restore(&mut storage, 4, MemoryGuard::unlimited());
	assert!(matches!(result, Err(PersistError::FieldCount { .. })));

	storage.insert("A4_C.txt", "4,3,3,3,1,1,1,0,1,four,0");
	let result = Animation::restore(&mut storage, 4, MemoryGuard::unlimited());
	assert!(matches!(
		result,
		Err(PersistError::InvalidField {
			field: "max_iterations",
			..
		})
	));
}

#[test]
fn test_load_checks_memory() {
	let mut storage = MemStorage::new();
	sample().save_to(&mut storage, 6).unwrap();

	let guard = MemoryGuard::new(FixedBudget::new(50), 0);
	let result = Animation::restore(&mut storage, 6, guard);
	assert!(matches!(result, Err(PersistError::Allocation(_))));
}

#[test_log::test]
fn test_oversized_data_file_is_not_buffered() {
	let mut storage = MemStorage::new();
	storage.insert("A0_C.txt", "1,1,1,1,0,1,-1,-1,0,-1,0");
	let mut payload = vec![0x34, 0x12];
	payload.resize(1 << 20, 0xEE);
	storage.insert("A0_D.bin", payload);

	let guard = MemoryGuard::new(FixedBudget::new(64), 0);
	let anim = Animation::restore(&mut storage, 0, guard).unwrap();
	assert_eq!(anim.frame(0).unwrap().get(0, 0), 0x1234);
	assert!(storage.bytes_read() < 1024, "read {} bytes", storage.bytes_read());
}

#[test]
fn test_payload_checked_before_read() {
	let mut storage = MemStorage::new();
	storage.insert("A0_C.txt", "100,100,50,1,0,1,-1,-1,0,-1,0");
	storage.insert("A0_D.bin", vec![0u8; 1 << 20]);

	let guard = MemoryGuard::new(FixedBudget::new(4096), 0);
	let result = Animation::restore(&mut storage, 0, guard);
	assert!(matches!(result, Err(PersistError::Allocation(_))));
	assert!(storage.bytes_read() <= MAX_RECORD_LEN);
}

#[test]
fn test_oversized_record() {
	let mut storage = MemStorage::new();
	sample().save_to(&mut storage, 8).unwrap();
	storage.insert("A8_C.txt", vec![b'1'; 1 << 20]);

	let result = Animation::restore(&mut storage, 8, MemoryGuard::unlimited());
	assert!(matches!(
		result,
		Err(PersistError::RecordTooLong {
			limit: MAX_RECORD_LEN
		})
	));
	assert!(storage.bytes_read() <= MAX_RECORD_LEN + 1);
}

#[test]
fn test_read_record() {
	let mut storage = MemStorage::new();
	let anim = sample();
	anim.save_to(&mut storage, 2).unwrap();
	assert_eq!(read_record(&mut storage, 2).unwrap(), ConfigRecord::from_animation(&anim));
}

#[test]
fn test_file_names() {
	assert_eq!(config_file_name(0), "A0_C.txt");
	assert_eq!(data_file_name(12345), "A12345_D.bin");
	assert_eq!(config_file_name(u16::MAX), "A65535_C.txt");
}
