//! Error type for storage access.

use thiserror::Error;

use crate::OpenMode;

/// Errors reported by a storage device
#[derive(Debug, Error)]
pub enum StorageError {
	/// The requested file does not exist
	#[error("File not found: '{0}'")]
	NotFound(String),

	/// The device refused to open the file
	#[error("Open file '{name}' for {mode} failed")]
	OpenFailed {
		/// File name
		name: String,
		/// Requested mode
		mode: OpenMode,
	},

	/// The file ended before the requested number of bytes was read
	#[error("Short read: expected {expected} bytes, got {actual} bytes")]
	ShortRead {
		/// Number of bytes requested
		expected: usize,
		/// Number of bytes actually read
		actual: usize,
	},

	/// The device stopped accepting bytes before the buffer was written
	#[error("Short write: expected {expected} bytes, wrote {actual} bytes")]
	ShortWrite {
		/// Number of bytes to write
		expected: usize,
		/// Number of bytes actually written
		actual: usize,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
