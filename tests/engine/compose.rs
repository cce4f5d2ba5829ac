//! Compositing sprites onto a shared canvas

use magmatrix::prelude::*;

use crate::{init_logger, numbered};

#[test]
fn sprite_outside_canvas_is_rejected() {
	init_logger();
	let mut canvas = numbered(2, 10, 10);
	let mut sprite = numbered(5, 5, 5);
	sprite.set_location(20, 0);

	assert_eq!(canvas.merge_with(&sprite).unwrap(), MergeOutcome::OutsideCanvas);
	assert_eq!(canvas.num_frames(), 2);
}

#[test]
fn longer_sprite_grows_canvas() {
	let mut canvas = numbered(2, 10, 10);
	let sprite = numbered(5, 5, 5);

	let outcome = canvas.merge_with(&sprite).unwrap();
	assert_eq!(
		outcome,
		MergeOutcome::Merged {
			frames: 5,
			of: 5
		}
	);
	// frame 1 held 2 everywhere, the sprite adds 2 in its corner
	assert_eq!(canvas.frame(1).unwrap().get(4, 4), 4);
	assert_eq!(canvas.frame(1).unwrap().get(5, 5), 2);
	// appended frames only hold the sprite
	assert_eq!(canvas.frame(4).unwrap().get(0, 0), 5);
	assert_eq!(canvas.frame(4).unwrap().get(9, 9), 0);
}

#[test]
fn partial_overlap_is_clipped() {
	let mut canvas = Animation::new(1, 6, 6, MemoryGuard::unlimited()).unwrap();
	let mut sprite = numbered(1, 4, 4);
	sprite.set_location(4, -2);

	canvas.merge_with(&sprite).unwrap();
	let lit: usize = canvas.frame(0).unwrap().pixels().iter().filter(|&&p| p > 0).count();
	assert_eq!(lit, 4);
	assert_eq!(canvas.frame(0).unwrap().get(5, 1), 1);
}

#[test]
fn unmerge_moves_a_sprite() {
	let mut canvas = numbered(3, 12, 8);
	let original = canvas.clone();
	let mut sprite = numbered(3, 3, 3);
	sprite.set_origin(1, 1);

	// draw, erase, move, draw, erase
	sprite.set_location(2, 2);
	canvas.merge_with(&sprite).unwrap();
	canvas.unmerge_with(&sprite);
	sprite.set_location(9, 5);
	canvas.merge_with(&sprite).unwrap();
	assert_eq!(canvas.frame(2).unwrap().get(9, 5), 6);
	canvas.unmerge_with(&sprite);

	assert_eq!(canvas.frames(), original.frames());
}

#[test]
fn merged_values_may_exceed_ceiling() {
	let mut canvas = Animation::new(1, 2, 2, MemoryGuard::unlimited()).unwrap();
	canvas.frame_mut(0).unwrap().fill(MAX_INTENSITY);
	let mut sprite = Animation::new(1, 2, 2, MemoryGuard::unlimited()).unwrap();
	sprite.frame_mut(0).unwrap().fill(1000);

	canvas.merge_with(&sprite).unwrap();
	assert_eq!(canvas.frame(0).unwrap().get(0, 0), MAX_INTENSITY + 1000);
	canvas.unmerge_with(&sprite);
	assert_eq!(canvas.frame(0).unwrap().get(0, 0), MAX_INTENSITY);
}
