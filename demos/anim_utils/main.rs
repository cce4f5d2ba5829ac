//! Animation store CLI utility.
//!
//! A command-line tool for creating, inspecting, playing and compositing
//! animations kept in an `A{N}_C.txt` / `A{N}_D.bin` store, the same layout the
//! matrix controller reads from its SD card.
//!
//! # Features
//!
//! - **new**: create an animation from a generated pattern
//! - **info**: print the config record and frame statistics
//! - **play**: advance the animation tick by tick and draw every frame
//! - **merge**: merge one stored animation into another
//! - **export**: write every frame as a grayscale PNG
//! - **hex**: dump the stored payload of one frame
//!
//! # Configuration
//!
//! Settings are read from `magmatrix.toml` in the working directory (optional)
//! and from `MAGMATRIX_*` environment variables:
//!
//! ```toml
//! store = "anim_store"
//!
//! [memory]
//! safety_margin = 10000
//! budget = 262144
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --example anim_utils new 0 --pattern sweep --frames 19 --policy bounce
//! cargo run --example anim_utils play 0 --ticks 40
//! cargo run --example anim_utils merge 1 0 --at 4,2 --save-as 2
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use magmatrix::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let settings = Settings::load(cli.config.as_deref())?;
	let store = cli.store.clone().unwrap_or_else(|| settings.store.clone());
	log::debug!("using store {} with {:?}", store.display(), settings.memory);

	let mut storage = DirStorage::open(&store).with_context(|| format!("Failed to open store {}", store.display()))?;
	let guard = settings.memory.guard();

	match cli.command {
		Command::New(args) => run_new(args, &mut storage, guard),
		Command::Info(args) => run_info(args, &mut storage, guard),
		Command::Play(args) => run_play(args, &mut storage, guard),
		Command::Merge(args) => run_merge(args, &mut storage, guard),
		Command::Export(args) => run_export(args, &mut storage, guard),
		Command::Hex(args) => run_hex(args, &mut storage),
	}
}

#[derive(Parser)]
#[command(name = "anim_utils")]
#[command(author = "magmatrix project")]
#[command(version)]
#[command(about = "Create, inspect, play and composite matrix animations", long_about = None)]
struct Cli {
	/// Store directory, overrides the configured one
	#[arg(short, long, value_name = "DIR", env = "MAGMATRIX_STORE")]
	store: Option<PathBuf>,

	/// Configuration file (without extension)
	#[arg(short, long, value_name = "FILE")]
	config: Option<String>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Create an animation from a generated pattern
	New(NewArgs),
	/// Show the config record and frame statistics of an animation
	Info(InfoArgs),
	/// Play an animation in the terminal
	Play(PlayArgs),
	/// Merge one animation into another
	Merge(MergeArgs),
	/// Export every frame as a grayscale PNG
	Export(ExportArgs),
	/// Hex dump the payload of one frame
	Hex(HexArgs),
}

#[derive(Args)]
struct NewArgs {
	/// Index to save the animation under
	#[arg(value_name = "INDEX")]
	index: u16,

	/// Frame width
	#[arg(long, default_value_t = DEFAULT_COLS)]
	cols: u16,

	/// Frame height
	#[arg(long, default_value_t = DEFAULT_ROWS)]
	rows: u16,

	/// Number of frames
	#[arg(short, long, default_value_t = DEFAULT_NUM_FRAMES)]
	frames: usize,

	/// Pattern drawn into the frames
	#[arg(short, long, value_enum, default_value_t = Pattern::Sweep)]
	pattern: Pattern,

	/// Playback policy
	#[arg(long, value_enum, default_value_t = Policy::Loop)]
	policy: Policy,

	/// Loop limit for the loop-n policy
	#[arg(long, default_value_t = -1, allow_hyphen_values = true)]
	max_loops: i32,

	/// Play backward
	#[arg(long)]
	backward: bool,

	/// Seed for the noise pattern
	#[arg(long)]
	seed: Option<u64>,
}

#[derive(Args)]
struct InfoArgs {
	/// Index of the animation
	#[arg(value_name = "INDEX")]
	index: u16,

	/// Print JSON instead of text
	#[arg(long)]
	json: bool,
}

#[derive(Args)]
struct PlayArgs {
	/// Index of the animation
	#[arg(value_name = "INDEX")]
	index: u16,

	/// Number of ticks to play
	#[arg(short, long, default_value_t = 20)]
	ticks: usize,

	/// Print intensities instead of shades
	#[arg(long)]
	raw: bool,

	/// Keep the stored playback state instead of restarting
	#[arg(long)]
	resume: bool,

	/// Save the playback state after the last tick
	#[arg(long)]
	save: bool,
}

#[derive(Args)]
struct MergeArgs {
	/// Index of the source animation
	#[arg(value_name = "SOURCE")]
	source: u16,

	/// Index of the target animation
	#[arg(value_name = "TARGET")]
	target: u16,

	/// Location of the source origin, relative to the target origin
	#[arg(long, value_name = "X,Y", value_parser = parse_point, default_value = "0,0", allow_hyphen_values = true)]
	at: (i32, i32),

	/// Origin inside the source
	#[arg(long, value_name = "X,Y", value_parser = parse_point, default_value = "0,0", allow_hyphen_values = true)]
	source_origin: (i32, i32),

	/// Origin inside the target
	#[arg(long, value_name = "X,Y", value_parser = parse_point, default_value = "0,0", allow_hyphen_values = true)]
	target_origin: (i32, i32),

	/// Subtract the source instead of adding it
	#[arg(long)]
	unmerge: bool,

	/// Save the result under this index instead of overwriting the target
	#[arg(long, value_name = "INDEX")]
	save_as: Option<u16>,
}

#[derive(Args)]
struct ExportArgs {
	/// Index of the animation
	#[arg(value_name = "INDEX")]
	index: u16,

	/// Output directory
	#[arg(short, long, value_name = "DIR", default_value = "anim_export")]
	output: PathBuf,

	/// Pixels per matrix cell
	#[arg(long, default_value_t = 16)]
	scale: u32,
}

#[derive(Args)]
struct HexArgs {
	/// Index of the animation
	#[arg(value_name = "INDEX")]
	index: u16,

	/// Frame to dump
	#[arg(short, long, default_value_t = 0)]
	frame: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Pattern {
	/// All zero
	Blank,
	/// A bright column moving left to right
	Sweep,
	/// Alternating checkerboard
	Checker,
	/// Random intensities
	Noise,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
	/// Play through once
	Once,
	/// Loop forever
	Loop,
	/// Run back and forth
	Bounce,
	/// Loop a fixed number of times
	LoopN,
}

impl From<Policy> for PlaybackType {
	fn from(value: Policy) -> Self {
		match value {
			Policy::Once => Self::Once,
			Policy::Loop => Self::Loop,
			Policy::Bounce => Self::Bounce,
			Policy::LoopN => Self::LoopNTimes,
		}
	}
}

/// Tool settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct Settings {
	/// Store directory
	store: PathBuf,
	/// Memory guard settings
	memory: MemoryConfig,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			store: PathBuf::from("anim_store"),
			memory: MemoryConfig::default(),
		}
	}
}

impl Settings {
	fn load(file: Option<&str>) -> Result<Self> {
		let settings = config::Config::builder()
			.add_source(config::File::with_name(file.unwrap_or("magmatrix")).required(file.is_some()))
			.add_source(config::Environment::with_prefix("MAGMATRIX").separator("__"))
			.build()
			.context("Failed to read configuration")?;
		settings.try_deserialize().context("Invalid configuration")
	}
}

#[derive(Debug, Serialize)]
struct AnimationInfo {
	index: u16,
	cols: u16,
	rows: u16,
	num_frames: usize,
	playback_type: PlaybackType,
	playback_state: PlaybackState,
	direction_forward: bool,
	current_index: Option<usize>,
	previous_index: Option<usize>,
	loop_iteration: i32,
	max_iterations: i32,
	start_index: usize,
	frames: Vec<FrameStats>,
}

#[derive(Debug, Serialize)]
struct FrameStats {
	lit: usize,
	peak: u16,
	mean: f64,
}

impl FrameStats {
	fn of(frame: &Frame) -> Self {
		let pixels = frame.pixels();
		let sum: u64 = pixels.iter().map(|&p| u64::from(p)).sum();
		Self {
			lit: pixels.iter().filter(|&&p| p > 0).count(),
			peak: pixels.iter().copied().max().unwrap_or(0),
			mean: sum as f64 / pixels.len().max(1) as f64,
		}
	}
}

fn parse_point(text: &str) -> Result<(i32, i32), String> {
	let (x, y) = text.split_once(',').ok_or_else(|| format!("expected X,Y, got '{}'", text))?;
	let x = x.trim().parse().map_err(|e| format!("invalid x '{}': {}", x, e))?;
	let y = y.trim().parse().map_err(|e| format!("invalid y '{}': {}", y, e))?;
	Ok((x, y))
}

fn restore(storage: &mut DirStorage, index: u16, guard: MemoryGuard) -> Result<Animation> {
	Animation::restore(storage, index, guard).with_context(|| format!("Failed to load animation {}", index))
}

fn draw_pattern(frame: &mut Frame, pattern: Pattern, index: usize, rng: &mut SmallRng) {
	let (cols, rows) = frame.size();
	for y in 0..i32::from(rows) {
		for x in 0..i32::from(cols) {
			let value = match pattern {
				Pattern::Blank => 0,
				Pattern::Sweep => {
					let column = (index % cols as usize) as i32;
					match (x - column).abs() {
						0 => MAX_INTENSITY,
						1 => MAX_INTENSITY / 4,
						_ => 0,
					}
				}
				Pattern::Checker => {
					if (x + y + index as i32) % 2 == 0 {
						MAX_INTENSITY
					} else {
						0
					}
				}
				Pattern::Noise => rng.random_range(0..=MAX_INTENSITY),
			};
			frame.set(x, y, value);
		}
	}
}

fn run_new(args: NewArgs, storage: &mut DirStorage, guard: MemoryGuard) -> Result<()> {
	if args.frames == 0 {
		bail!("frames must be greater than zero");
	}

	let mut anim = Animation::new(args.frames, args.cols, args.rows, guard).context("Failed to create animation")?;
	let mut rng = match args.seed {
		Some(seed) => SmallRng::seed_from_u64(seed),
		None => SmallRng::from_os_rng(),
	};
	for i in 0..args.frames {
		if let Some(frame) = anim.frame_mut(i) {
			draw_pattern(frame, args.pattern, i, &mut rng);
		}
	}

	anim.set_playback_type(args.policy.into());
	anim.set_max_iterations(args.max_loops);
	anim.set_direction_forward(!args.backward);
	anim.save_to(storage, args.index)?;

	println!("Created {} ({:?}, {})", anim, args.pattern, storage.path_of(&config_file_name(args.index)).display());
	Ok(())
}

fn run_info(args: InfoArgs, storage: &mut DirStorage, guard: MemoryGuard) -> Result<()> {
	let anim = restore(storage, args.index, guard)?;
	let record = ConfigRecord::from_animation(&anim);
	let info = AnimationInfo {
		index: args.index,
		cols: record.cols,
		rows: record.rows,
		num_frames: record.num_frames,
		playback_type: record.playback_type,
		playback_state: record.playback_state,
		direction_forward: record.direction_forward,
		current_index: record.current_index,
		previous_index: record.previous_index,
		loop_iteration: record.loop_iteration,
		max_iterations: record.max_iterations,
		start_index: record.start_index,
		frames: anim.frames().iter().map(FrameStats::of).collect(),
	};

	if args.json {
		println!("{}", serde_json::to_string_pretty(&info)?);
		return Ok(());
	}

	println!("Animation {}: {}", args.index, record);
	println!("  Size: {}x{}, {} frames", info.cols, info.rows, info.num_frames);
	println!("  Policy: {} ({})", info.playback_type, if info.direction_forward { "forward" } else { "backward" });
	println!("  State: {}, current {:?}, previous {:?}", info.playback_state, info.current_index, info.previous_index);
	println!("  Loops: {} of {}, started at {}", info.loop_iteration, info.max_iterations, info.start_index);
	for (i, stats) in info.frames.iter().enumerate() {
		println!("  Frame {:3}: lit {:4}, peak {:5}, mean {:8.2}", i, stats.lit, stats.peak, stats.mean);
	}
	Ok(())
}

fn run_play(args: PlayArgs, storage: &mut DirStorage, guard: MemoryGuard) -> Result<()> {
	let mut anim = restore(storage, args.index, guard)?;
	if !args.resume || anim.is_done() {
		anim.start()?;
	}

	for tick in 0..args.ticks {
		println!("tick {} frame {:?}", tick, anim.current_index());
		print!("{}", anim.current().to_ascii_art(!args.raw));
		if anim.is_done() {
			println!("done after {} ticks", tick);
			break;
		}
		anim.advance_forward();
	}

	if args.save {
		anim.save_to(storage, args.index)?;
	}
	Ok(())
}

fn run_merge(args: MergeArgs, storage: &mut DirStorage, guard: MemoryGuard) -> Result<()> {
	let mut source = restore(storage, args.source, guard.clone())?;
	let mut target = restore(storage, args.target, guard)?;

	source.set_origin(args.source_origin.0, args.source_origin.1);
	source.set_location(args.at.0, args.at.1);
	target.set_origin(args.target_origin.0, args.target_origin.1);

	let outcome = if args.unmerge {
		target.unmerge_with(&source)
	} else {
		target.merge_with(&source)?
	};
	if outcome == MergeOutcome::OutsideCanvas {
		bail!("Animation {} at {:?} lies outside animation {}", args.source, args.at, args.target);
	}

	let index = args.save_as.unwrap_or(args.target);
	target.save_to(storage, index)?;
	println!("{} into animation {} ({})", outcome, index, target);
	Ok(())
}

fn run_export(args: ExportArgs, storage: &mut DirStorage, guard: MemoryGuard) -> Result<()> {
	if args.scale == 0 {
		bail!("scale must be greater than zero");
	}
	let anim = restore(storage, args.index, guard)?;
	std::fs::create_dir_all(&args.output)
		.with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

	let width = u32::from(anim.cols()) * args.scale;
	let height = u32::from(anim.rows()) * args.scale;
	for (i, frame) in anim.frames().iter().enumerate() {
		let img = image::GrayImage::from_fn(width, height, |x, y| {
			let value = frame.get((x / args.scale) as i32, (y / args.scale) as i32).min(MAX_INTENSITY);
			image::Luma([(u32::from(value) * 255 / u32::from(MAX_INTENSITY)) as u8])
		});
		let path = args.output.join(format!("A{}_{:03}.png", args.index, i));
		img.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;
	}

	println!("Exported {} frames to {}", anim.num_frames(), args.output.display());
	Ok(())
}

fn run_hex(args: HexArgs, storage: &mut DirStorage) -> Result<()> {
	let record = read_record(storage, args.index)
		.with_context(|| format!("Failed to read {}", config_file_name(args.index)))?;
	if args.frame >= record.num_frames {
		bail!("Frame {} out of range (total frames: {})", args.frame, record.num_frames);
	}

	let frame_len = record.payload_len() / record.num_frames;
	let mut bytes = vec![0u8; frame_len];
	let mut file = storage.open(&data_file_name(args.index), OpenMode::Read)?;
	for _ in 0..=args.frame {
		file.read_exact_len(&mut bytes).context("Payload is shorter than the config record says")?;
	}
	file.close()?;

	let start = args.frame * frame_len;
	let row_len = record.cols as usize * 2;
	for (row, chunk) in bytes.chunks(row_len).enumerate() {
		println!("{:08x}  {}", start + row * row_len, hex::encode(chunk));
	}
	Ok(())
}
