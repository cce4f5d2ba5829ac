//! Block storage collaborator for the `magmatrix` persistence codec.
//!
//! The codec only needs `open`/`read`/`write`/`flush`/`close` semantics, each of
//! which reports success or failure. This crate defines that contract and ships
//! two backends:
//!
//! - [`DirStorage`]: named files inside a directory on the host file system
//! - [`MemStorage`]: named byte buffers kept in memory, with fault injection hooks
//!
//! # Examples
//!
//! ```
//! use magmatrix_storage::{MemStorage, OpenMode, Storage, StorageFile};
//!
//! # fn main() -> Result<(), magmatrix_storage::StorageError> {
//! let mut storage = MemStorage::new();
//!
//! let mut file = storage.open("A0_C.txt", OpenMode::Write)?;
//! file.write_all_checked(b"19,10,2")?;
//! file.flush()?;
//! file.close()?;
//!
//! assert_eq!(storage.get("A0_C.txt"), Some(&b"19,10,2"[..]));
//! # Ok(())
//! # }
//! ```

mod dir;
mod error;
mod mem;

pub use dir::{DirFile, DirStorage};
pub use error::StorageError;
pub use mem::{MemFile, MemStorage};

/// Mode a storage file is opened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
	/// Open an existing file for reading from the start
	Read,
	/// Create the file, or truncate it if it already exists, and write from the start
	Write,
}

impl std::fmt::Display for OpenMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Read => write!(f, "read"),
			Self::Write => write!(f, "write"),
		}
	}
}

/// A storage device holding named files.
pub trait Storage {
	/// Handle returned by [`Storage::open`]
	type File<'a>: StorageFile
	where
		Self: 'a;

	/// Opens the named file in the given mode.
	///
	/// # Errors
	///
	/// Returns [`StorageError::NotFound`] when reading a missing file, or
	/// [`StorageError::OpenFailed`] when the device refuses the request.
	fn open(&mut self, name: &str, mode: OpenMode) -> Result<Self::File<'_>, StorageError>;

	/// Returns `true` if a file with this name exists.
	fn exists(&self, name: &str) -> bool;
}

/// An open file on a [`Storage`] device.
pub trait StorageFile {
	/// Reads up to `buf.len()` bytes, returning how many were read. `0` means end of file.
	fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError>;

	/// Writes up to `buf.len()` bytes, returning how many were accepted.
	fn write(&mut self, buf: &[u8]) -> Result<usize, StorageError>;

	/// Pushes buffered data down to the device.
	fn flush(&mut self) -> Result<(), StorageError>;

	/// Closes the file, flushing anything still pending.
	fn close(self) -> Result<(), StorageError>
	where
		Self: Sized;

	/// Fills `buf` completely.
	///
	/// # Errors
	///
	/// Returns [`StorageError::ShortRead`] when the file ends before `buf` is full.
	fn read_exact_len(&mut self, buf: &mut [u8]) -> Result<(), StorageError> {
		let mut filled = 0;
		while filled < buf.len() {
			let n = self.read(&mut buf[filled..])?;
			if n == 0 {
				return Err(StorageError::ShortRead {
					expected: buf.len(),
					actual: filled,
				});
			}
			filled += n;
		}
		Ok(())
	}

	/// Reads everything from the current position to the end of the file.
	fn read_to_end(&mut self, out: &mut Vec<u8>) -> Result<usize, StorageError> {
		let mut chunk = [0u8; 256];
		let mut total = 0;
		loop {
			let n = self.read(&mut chunk)?;
			if n == 0 {
				return Ok(total);
			}
			out.extend_from_slice(&chunk[..n]);
			total += n;
		}
	}

	/// Writes all of `buf`.
	///
	/// # Errors
	///
	/// Returns [`StorageError::ShortWrite`] when the device stops accepting bytes.
	fn write_all_checked(&mut self, buf: &[u8]) -> Result<(), StorageError> {
		let mut written = 0;
		while written < buf.len() {
			let n = self.write(&buf[written..])?;
			if n == 0 {
				return Err(StorageError::ShortWrite {
					expected: buf.len(),
					actual: written,
				});
			}
			written += n;
		}
		Ok(())
	}
}
