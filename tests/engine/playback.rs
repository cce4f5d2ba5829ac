//! Playback policies as seen by a display driver

use magmatrix::prelude::*;

use crate::{init_logger, numbered, play};

#[test]
fn once_plays_each_frame_then_blanks() {
	init_logger();
	let mut anim = numbered(3, 19, 10);
	anim.set_playback_type(PlaybackType::Once);
	anim.start().unwrap();

	assert_eq!(play(&mut anim, 5), vec![1, 2, 3, 0, 0]);
	assert!(anim.is_done());
}

#[test]
fn loop_wraps_forever() {
	let mut anim = numbered(3, 19, 10);
	anim.start().unwrap();

	assert_eq!(play(&mut anim, 7), vec![1, 2, 3, 1, 2, 3, 1]);
	assert_eq!(anim.playback_state(), PlaybackState::Running);
}

#[test]
fn bounce_reverses_at_both_ends() {
	let mut anim = numbered(4, 19, 10);
	anim.set_playback_type(PlaybackType::Bounce);
	anim.start().unwrap();

	assert_eq!(play(&mut anim, 10), vec![1, 2, 3, 4, 3, 2, 1, 2, 3, 4]);
}

#[test]
fn bounce_backward_from_last() {
	let mut anim = numbered(3, 4, 4);
	anim.set_playback_type(PlaybackType::Bounce);
	anim.set_direction_forward(false);
	anim.start().unwrap();

	assert_eq!(play(&mut anim, 7), vec![3, 2, 1, 2, 3, 2, 1]);
}

#[test]
fn loop_n_times_stops_after_limit() {
	let mut anim = numbered(3, 4, 4);
	anim.set_playback_type(PlaybackType::LoopNTimes);
	anim.set_max_iterations(2);
	anim.start().unwrap();

	// the counter reaches the limit on the second visit to the start frame
	assert_eq!(play(&mut anim, 6), vec![1, 2, 3, 1, 0, 0]);
	assert_eq!(anim.loop_iteration(), 2);
}

#[test]
fn restart_after_finish() {
	let mut anim = numbered(2, 4, 4);
	anim.set_playback_type(PlaybackType::Once);
	anim.start().unwrap();
	play(&mut anim, 3);
	assert!(anim.is_done());

	anim.start_at(StartFrame::Last).unwrap();
	assert_eq!(anim.current().get(0, 0), 2);
	assert_eq!(anim.loop_iteration(), 0);
}

#[test]
fn single_frame_policies() {
	for (policy, expected) in [
		(PlaybackType::Loop, vec![1, 1, 1]),
		(PlaybackType::Bounce, vec![1, 1, 1]),
		(PlaybackType::Once, vec![1, 0, 0]),
	] {
		let mut anim = numbered(1, 2, 2);
		anim.set_playback_type(policy);
		anim.start().unwrap();
		assert_eq!(play(&mut anim, 3), expected, "{}", policy);
	}
}
