//! Directory backed storage.

use std::{
	fs,
	io::{self, Read, Write},
	path::{Path, PathBuf},
};

use crate::{OpenMode, Storage, StorageError, StorageFile};

/// Storage that maps file names to files inside a root directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirStorage {
	root: PathBuf,
}

impl DirStorage {
	/// Creates a storage rooted at `root`, creating the directory if needed.
	pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
		let root = root.as_ref().to_path_buf();
		fs::create_dir_all(&root)?;
		Ok(Self {
			root,
		})
	}

	/// Returns the root directory.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Returns the full path of a file name.
	pub fn path_of(&self, name: &str) -> PathBuf {
		self.root.join(name)
	}
}

impl Storage for DirStorage {
	type File<'a> = DirFile;

	fn open(&mut self, name: &str, mode: OpenMode) -> Result<DirFile, StorageError> {
		let path = self.path_of(name);
		let result = match mode {
			OpenMode::Read => fs::File::open(&path),
			OpenMode::Write => fs::OpenOptions::new().write(true).create(true).truncate(true).open(&path),
		};

		match result {
			Ok(file) => Ok(DirFile {
				file,
			}),
			Err(e) if e.kind() == io::ErrorKind::NotFound && mode == OpenMode::Read => {
				Err(StorageError::NotFound(name.to_string()))
			}
			Err(e) => {
				log::error!("open file '{}' failed: {}", path.display(), e);
				Err(StorageError::OpenFailed {
					name: name.to_string(),
					mode,
				})
			}
		}
	}

	fn exists(&self, name: &str) -> bool {
		self.path_of(name).is_file()
	}
}

/// An open file inside a [`DirStorage`].
#[derive(Debug)]
pub struct DirFile {
	file: fs::File,
}

impl StorageFile for DirFile {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
		Ok(self.file.read(buf)?)
	}

	fn write(&mut self, buf: &[u8]) -> Result<usize, StorageError> {
		Ok(self.file.write(buf)?)
	}

	fn flush(&mut self) -> Result<(), StorageError> {
		self.file.flush()?;
		Ok(())
	}

	fn close(mut self) -> Result<(), StorageError> {
		self.file.flush()?;
		self.file.sync_all()?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_write_then_read() {
		let dir = tempfile::tempdir().unwrap();
		let mut storage = DirStorage::open(dir.path()).unwrap();

		let mut file = storage.open("A1_C.txt", OpenMode::Write).unwrap();
		file.write_all_checked(b"4,3,2").unwrap();
		file.close().unwrap();

		assert!(storage.exists("A1_C.txt"));

		let mut file = storage.open("A1_C.txt", OpenMode::Read).unwrap();
		let mut text = Vec::new();
		file.read_to_end(&mut text).unwrap();
		assert_eq!(text, b"4,3,2");
	}

	#[test]
	fn test_write_truncates() {
		let dir = tempfile::tempdir().unwrap();
		let mut storage = DirStorage::open(dir.path()).unwrap();

		let mut file = storage.open("A2_D.bin", OpenMode::Write).unwrap();
		file.write_all_checked(&[1, 2, 3, 4, 5, 6]).unwrap();
		file.close().unwrap();

		let mut file = storage.open("A2_D.bin", OpenMode::Write).unwrap();
		file.write_all_checked(&[9, 9]).unwrap();
		file.close().unwrap();

		assert_eq!(fs::read(storage.path_of("A2_D.bin")).unwrap(), vec![9, 9]);
	}

	#[test]
	fn test_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let mut storage = DirStorage::open(dir.path()).unwrap();

		let result = storage.open("A3_C.txt", OpenMode::Read);
		assert!(matches!(result, Err(StorageError::NotFound(name)) if name == "A3_C.txt"));
	}

	#[test]
	fn test_short_read() {
		let dir = tempfile::tempdir().unwrap();
		let mut storage = DirStorage::open(dir.path()).unwrap();
		fs::write(storage.path_of("A4_D.bin"), [0u8; 3]).unwrap();

		let mut file = storage.open("A4_D.bin", OpenMode::Read).unwrap();
		let mut buf = [0u8; 8];
		let result = file.read_exact_len(&mut buf);
		assert!(matches!(
			result,
			Err(StorageError::ShortRead {
				expected: 8,
				actual: 3
			})
		));
	}
}
