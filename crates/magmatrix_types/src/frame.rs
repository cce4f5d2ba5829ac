//! Frame: one rectangular grid of pixel intensities.
//!
//! A frame behaves as if it were embedded in an infinite plane of zeros:
//! - reading outside `[0, width) × [0, height)` yields `0`
//! - writing outside the grid is silently ignored
//!
//! This lets frames be composited at any offset without clipping at the call site.
//!
//! `set` enforces the display ceiling [`MAX_INTENSITY`]; `merge_pixel` does not,
//! so that a merge can be undone exactly by the matching unmerge. Values saturate
//! at `u16::MAX`, which is where invertibility stops holding.
//!
//! # Examples
//!
//! ```
//! use magmatrix_types::frame::Frame;
//! use magmatrix_types::memory::MemoryGuard;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut frame = Frame::new(4, 3, &MemoryGuard::unlimited())?;
//! frame.set(1, 2, 300);
//! assert_eq!(frame.get(1, 2), 300);
//! assert_eq!(frame.get(-1, 2), 0);
//! assert_eq!(frame.get(4, 0), 0);
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;

use crate::{
	constants::{INTENSITY_SIZE, MAX_INTENSITY},
	error::FrameError,
	memory::MemoryGuard,
};

/// One displayable image: a `width × height` grid of intensities, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
	width: u16,
	height: u16,
	pixels: Vec<u16>,
}

impl Frame {
	/// Creates a zero-filled frame after checking the buffer fits in free memory.
	///
	/// # Errors
	///
	/// Returns [`FrameError::InvalidDimensions`] for a zero width or height, or
	/// [`FrameError::Allocation`] when the guard refuses the buffer.
	pub fn new(width: u16, height: u16, guard: &MemoryGuard) -> Result<Self, FrameError> {
		Self::validate_dimensions(width, height)?;
		let pixels = guard.allocate_pixels(width as usize * height as usize)?;
		Ok(Self {
			width,
			height,
			pixels,
		})
	}

	/// Creates a frame that takes ownership of a caller-supplied buffer.
	///
	/// Values above [`MAX_INTENSITY`] are clamped.
	///
	/// # Errors
	///
	/// Returns [`FrameError::PixelCountMismatch`] if `pixels.len() != width * height`.
	pub fn from_pixels(width: u16, height: u16, mut pixels: Vec<u16>) -> Result<Self, FrameError> {
		Self::validate_dimensions(width, height)?;
		let expected = width as usize * height as usize;
		if pixels.len() != expected {
			return Err(FrameError::PixelCountMismatch {
				expected,
				actual: pixels.len(),
			});
		}
		clamp_all(&mut pixels);
		Ok(Self {
			width,
			height,
			pixels,
		})
	}

	/// Creates a zero-filled frame without consulting a memory guard.
	pub(crate) fn zeroed(width: u16, height: u16) -> Self {
		Self {
			width,
			height,
			pixels: vec![0; width as usize * height as usize],
		}
	}

	/// Wraps a decoded buffer as-is; values above the display ceiling survive.
	pub(crate) fn from_raw(width: u16, height: u16, pixels: Vec<u16>) -> Self {
		debug_assert_eq!(pixels.len(), width as usize * height as usize);
		Self {
			width,
			height,
			pixels,
		}
	}

	fn validate_dimensions(width: u16, height: u16) -> Result<(), FrameError> {
		if width == 0 || height == 0 {
			return Err(FrameError::InvalidDimensions {
				width,
				height,
			});
		}
		Ok(())
	}

	/// Returns the frame width in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Returns the frame height in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Returns `(width, height)`.
	pub fn size(&self) -> (u16, u16) {
		(self.width, self.height)
	}

	/// Returns the total number of pixels.
	pub fn pixel_count(&self) -> usize {
		self.pixels.len()
	}

	/// Returns the size of the intensity buffer in bytes.
	pub fn byte_len(&self) -> usize {
		self.pixels.len() * INTENSITY_SIZE
	}

	/// Returns the row-major intensity buffer.
	pub fn pixels(&self) -> &[u16] {
		&self.pixels
	}

	fn index(&self, x: i32, y: i32) -> Option<usize> {
		if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
			return None;
		}
		Some(y as usize * self.width as usize + x as usize)
	}

	/// Gets the intensity at `(x, y)`, or `0` outside the frame.
	pub fn get(&self, x: i32, y: i32) -> u16 {
		self.index(x, y).map_or(0, |i| self.pixels[i])
	}

	/// Sets the intensity at `(x, y)`, clamped to [`MAX_INTENSITY`].
	///
	/// Coordinates outside the frame are ignored.
	pub fn set(&mut self, x: i32, y: i32, value: u16) {
		if let Some(i) = self.index(x, y) {
			self.pixels[i] = value.min(MAX_INTENSITY);
		}
	}

	/// Adds `delta` to the intensity at `(x, y)`, flooring at zero.
	///
	/// The result is stored without applying the display ceiling.
	pub fn merge_pixel(&mut self, x: i32, y: i32, delta: i32) {
		if let Some(i) = self.index(x, y) {
			let merged = i32::from(self.pixels[i]).saturating_add(delta).clamp(0, i32::from(u16::MAX));
			self.pixels[i] = merged as u16;
		}
	}

	/// Subtracts `value` from the intensity at `(x, y)`, flooring at zero.
	pub fn unmerge_pixel(&mut self, x: i32, y: i32, value: u16) {
		self.merge_pixel(x, y, -i32::from(value));
	}

	/// Adds every nonzero pixel of `other` into this frame, shifted by `(offset_x, offset_y)`.
	pub fn merge_with(&mut self, offset_x: i32, offset_y: i32, other: &Frame) -> &mut Self {
		self.blend(offset_x, offset_y, other, 1)
	}

	/// Subtracts every nonzero pixel of `other`, reversing a matching [`Frame::merge_with`].
	pub fn unmerge_with(&mut self, offset_x: i32, offset_y: i32, other: &Frame) -> &mut Self {
		self.blend(offset_x, offset_y, other, -1)
	}

	fn blend(&mut self, offset_x: i32, offset_y: i32, other: &Frame, sign: i32) -> &mut Self {
		for (y, row) in other.rows().enumerate() {
			let Some(ty) = offset_y.checked_add(y as i32) else {
				break;
			};
			for (x, &value) in row.iter().enumerate() {
				let Some(tx) = offset_x.checked_add(x as i32) else {
					break;
				};
				if value != 0 {
					self.merge_pixel(tx, ty, sign * i32::from(value));
				}
			}
		}
		self
	}

	/// Replaces the whole buffer, clamping values to [`MAX_INTENSITY`].
	///
	/// # Errors
	///
	/// Returns [`FrameError::PixelCountMismatch`] if the length differs from the frame's.
	pub fn overwrite(&mut self, mut pixels: Vec<u16>) -> Result<(), FrameError> {
		if pixels.len() != self.pixels.len() {
			return Err(FrameError::PixelCountMismatch {
				expected: self.pixels.len(),
				actual: pixels.len(),
			});
		}
		clamp_all(&mut pixels);
		self.pixels = pixels;
		Ok(())
	}

	/// Fills every pixel with `value`, clamped to [`MAX_INTENSITY`].
	pub fn fill(&mut self, value: u16) {
		self.pixels.fill(value.min(MAX_INTENSITY));
	}

	/// Sets every pixel to zero.
	pub fn clear(&mut self) {
		self.pixels.fill(0);
	}

	/// Returns `true` if every pixel is zero.
	pub fn is_blank(&self) -> bool {
		self.pixels.iter().all(|&p| p == 0)
	}

	/// Returns an iterator over the rows of the frame.
	pub fn rows(&self) -> FrameRowIterator<'_> {
		FrameRowIterator {
			frame: self,
			current_row: 0,
		}
	}

	/// Renders the frame as text, top row first.
	///
	/// Pretty mode draws one shade character per pixel by intensity quartile; raw
	/// mode prints the comma-separated values.
	pub fn to_ascii_art(&self, pretty: bool) -> String {
		let mut art = String::new();
		for row in self.rows() {
			if pretty {
				art.extend(row.iter().map(|&p| shade(p)));
			} else {
				let values: Vec<String> = row.iter().map(u16::to_string).collect();
				art.push_str(&values.join(","));
			}
			art.push('\n');
		}
		art
	}
}

fn clamp_all(pixels: &mut [u16]) {
	for pixel in pixels {
		*pixel = (*pixel).min(MAX_INTENSITY);
	}
}

fn shade(value: u16) -> char {
	const QUARTER: u16 = MAX_INTENSITY / 4;
	match value {
		0 => ' ',
		v if v <= QUARTER => '░',
		v if v <= 2 * QUARTER => '▒',
		v if v <= 3 * QUARTER => '▓',
		_ => '█',
	}
}

impl Display for Frame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.to_ascii_art(true))
	}
}

/// Iterator over frame rows.
#[derive(Debug, Clone)]
pub struct FrameRowIterator<'a> {
	frame: &'a Frame,
	current_row: u16,
}

impl<'a> Iterator for FrameRowIterator<'a> {
	type Item = &'a [u16];

	fn next(&mut self) -> Option<Self::Item> {
		if self.current_row >= self.frame.height {
			return None;
		}

		let width = self.frame.width as usize;
		let start = self.current_row as usize * width;
		let end = start + width;

		self.current_row += 1;
		Some(&self.frame.pixels[start..end])
	}
}
