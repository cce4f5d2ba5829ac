//! Free-memory checks for frame buffer allocation.
//!
//! Every buffer whose size comes from user input (new frames, frames appended by
//! a merge, frames rebuilt by a load) is checked against the free memory reported
//! by a [`MemoryProbe`] plus a safety margin before it is allocated. A refused
//! check is an ordinary [`AllocationError`], never an abort.
//!
//! # Examples
//!
//! ```
//! use magmatrix_types::memory::{FixedBudget, MemoryGuard};
//!
//! let guard = MemoryGuard::new(FixedBudget::new(64 * 1024), 10_000);
//! assert!(guard.check(1024).is_ok());
//! assert!(guard.check(60 * 1024).is_err());
//! ```

use std::{fmt::Debug, sync::Arc};

use serde::Deserialize;

use crate::{
	constants::{DEFAULT_SAFETY_MARGIN, INTENSITY_SIZE},
	error::AllocationError,
};

/// Source of the "how much memory is free" answer.
pub trait MemoryProbe: Debug + Send + Sync {
	/// Returns the number of bytes currently available for allocation.
	fn available(&self) -> usize;
}

/// Probe backed by the operating system.
///
/// On Linux this reads `MemAvailable` from `/proc/meminfo`. Everywhere else, or
/// when the file cannot be parsed, memory is reported as unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemMemory;

impl SystemMemory {
	#[cfg(target_os = "linux")]
	fn read_meminfo() -> Option<usize> {
		let text = std::fs::read_to_string("/proc/meminfo").ok()?;
		let line = text.lines().find(|line| line.starts_with("MemAvailable:"))?;
		let kib: usize = line.split_whitespace().nth(1)?.parse().ok()?;
		kib.checked_mul(1024)
	}

	#[cfg(not(target_os = "linux"))]
	fn read_meminfo() -> Option<usize> {
		None
	}
}

impl MemoryProbe for SystemMemory {
	fn available(&self) -> usize {
		Self::read_meminfo().unwrap_or(usize::MAX)
	}
}

/// Probe that always reports the same number of free bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBudget(usize);

impl FixedBudget {
	/// Creates a probe reporting `bytes` free.
	pub fn new(bytes: usize) -> Self {
		Self(bytes)
	}

	/// Returns the reported number of bytes.
	pub fn bytes(&self) -> usize {
		self.0
	}
}

impl MemoryProbe for FixedBudget {
	fn available(&self) -> usize {
		self.0
	}
}

/// Pairs a [`MemoryProbe`] with the safety margin that must stay free.
#[derive(Debug, Clone)]
pub struct MemoryGuard {
	probe: Arc<dyn MemoryProbe>,
	safety_margin: usize,
}

impl Default for MemoryGuard {
	fn default() -> Self {
		Self::new(SystemMemory, DEFAULT_SAFETY_MARGIN)
	}
}

impl MemoryGuard {
	/// Creates a guard from a probe and a margin in bytes.
	pub fn new(probe: impl MemoryProbe + 'static, safety_margin: usize) -> Self {
		Self {
			probe: Arc::new(probe),
			safety_margin,
		}
	}

	/// Creates a guard that never refuses a request.
	pub fn unlimited() -> Self {
		Self::new(FixedBudget::new(usize::MAX), 0)
	}

	/// Returns the safety margin in bytes.
	pub fn safety_margin(&self) -> usize {
		self.safety_margin
	}

	/// Returns the free memory reported by the probe.
	pub fn available(&self) -> usize {
		self.probe.available()
	}

	/// Checks that `requested` bytes can be allocated while keeping the margin free.
	pub fn check(&self, requested: usize) -> Result<(), AllocationError> {
		let available = self.probe.available();
		let needed = requested.saturating_add(self.safety_margin);
		if available < needed {
			log::warn!(
				"refusing allocation of {} bytes: {} bytes available, margin {}",
				requested,
				available,
				self.safety_margin
			);
			return Err(AllocationError::Insufficient {
				requested,
				available,
				margin: self.safety_margin,
			});
		}
		Ok(())
	}

	/// Allocates a zeroed intensity buffer of `len` values after checking it fits.
	pub fn allocate_pixels(&self, len: usize) -> Result<Vec<u16>, AllocationError> {
		let requested = len.checked_mul(INTENSITY_SIZE).unwrap_or(usize::MAX);
		self.check(requested)?;

		let mut pixels = Vec::new();
		if pixels.try_reserve_exact(len).is_err() {
			log::error!("allocator refused {} bytes after the free-memory check passed", requested);
			return Err(AllocationError::Allocator {
				requested,
			});
		}
		pixels.resize(len, 0);
		Ok(pixels)
	}
}

/// Memory settings, loadable from a configuration file.
///
/// # Presets
///
/// - `default()`: system probe, 10 000 byte margin
/// - `embedded()`: 256 KiB fixed budget, 10 000 byte margin (Teensy 3.6 class board)
/// - `unlimited()`: never refuses
///
/// # Examples
///
/// ```
/// use magmatrix_types::memory::MemoryConfig;
///
/// let guard = MemoryConfig::embedded().guard();
/// assert_eq!(guard.available(), 256 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
	/// Bytes that must stay free after any checked allocation
	pub safety_margin: usize,
	/// Fixed number of free bytes to assume, `None` to ask the operating system
	pub budget: Option<usize>,
}

impl Default for MemoryConfig {
	fn default() -> Self {
		Self {
			safety_margin: DEFAULT_SAFETY_MARGIN,
			budget: None,
		}
	}
}

impl MemoryConfig {
	/// Creates a configuration with a fixed budget.
	pub fn new(safety_margin: usize, budget: Option<usize>) -> Self {
		Self {
			safety_margin,
			budget,
		}
	}

	/// Settings for a small microcontroller.
	pub fn embedded() -> Self {
		Self {
			safety_margin: DEFAULT_SAFETY_MARGIN,
			budget: Some(256 * 1024),
		}
	}

	/// Settings that never refuse an allocation.
	pub fn unlimited() -> Self {
		Self {
			safety_margin: 0,
			budget: Some(usize::MAX),
		}
	}

	/// Builds the guard described by this configuration.
	pub fn guard(&self) -> MemoryGuard {
		match self.budget {
			Some(bytes) => MemoryGuard::new(FixedBudget::new(bytes), self.safety_margin),
			None => MemoryGuard::new(SystemMemory, self.safety_margin),
		}
	}
}
