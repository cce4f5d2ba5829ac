//! Benchmark suite for the animation engine
//!
//! This benchmark measures payload decoding, merging and playback, the three
//! paths that run on every load or display tick.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use magmatrix_benches::{generate_animation, generate_payload, sizes};
use magmatrix_types::{
	animation::PlaybackType,
	memory::MemoryGuard,
	persist::{decode_payload, encode_payload},
};
use std::hint::black_box;

/// Benchmark payload decoding for each board size
fn bench_decode_payload(c: &mut Criterion) {
	let mut group = c.benchmark_group("payload_decode");
	let guard = MemoryGuard::unlimited();

	for (name, (cols, rows)) in [("default", sizes::DEFAULT), ("hardware", sizes::HARDWARE), ("wall", sizes::WALL)] {
		let num_frames = 32;
		let data = generate_payload(num_frames, cols, rows);

		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
			b.iter(|| {
				let result = decode_payload(black_box(data), cols, rows, num_frames, &guard);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark payload encoding
fn bench_encode_payload(c: &mut Criterion) {
	let mut group = c.benchmark_group("payload_encode");
	let (cols, rows) = sizes::WALL;
	let anim = generate_animation(32, cols, rows);

	group.throughput(Throughput::Elements((32 * cols as usize * rows as usize) as u64));
	group.bench_function("encode_wall", |b| {
		b.iter(|| black_box(encode_payload(black_box(&anim))));
	});

	group.finish();
}

/// Benchmark merging a sprite into a canvas and taking it out again
fn bench_merge(c: &mut Criterion) {
	let mut group = c.benchmark_group("merge");
	let (cols, rows) = sizes::WALL;
	let mut canvas = generate_animation(16, cols, rows);
	let mut sprite = generate_animation(16, 19, 10);
	sprite.set_location(30, 20);

	group.bench_function("merge_unmerge", |b| {
		b.iter(|| {
			let merged = canvas.merge_with(black_box(&sprite));
			canvas.unmerge_with(black_box(&sprite));
			black_box(merged)
		});
	});

	group.finish();
}

/// Benchmark one display tick per playback policy
fn bench_playback(c: &mut Criterion) {
	let mut group = c.benchmark_group("playback");
	let (cols, rows) = sizes::DEFAULT;

	for policy in [PlaybackType::Loop, PlaybackType::Bounce] {
		let mut anim = generate_animation(24, cols, rows);
		anim.set_playback_type(policy);
		if anim.start().is_err() {
			continue;
		}

		group.bench_function(BenchmarkId::new("tick", policy), |b| {
			b.iter(|| {
				anim.advance_forward();
				black_box(anim.current().get(3, 3))
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decode_payload, bench_encode_payload, bench_merge, bench_playback);

criterion_main!(benches);
