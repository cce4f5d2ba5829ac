//! In-memory storage.
//!
//! Besides serving as a host-side stand-in for the SD card, `MemStorage` can be
//! told to misbehave: refuse to open a name, stop accepting writes after a byte
//! budget, or lose the tail of a stored file. It also counts the bytes handed out
//! by reads.

use std::collections::{HashMap, HashSet};

use crate::{OpenMode, Storage, StorageError, StorageFile};

/// Storage that keeps every file as a byte vector in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemStorage {
	files: HashMap<String, Vec<u8>>,
	refused: HashSet<String>,
	write_limit: Option<usize>,
	bytes_read: usize,
}

impl MemStorage {
	/// Creates an empty storage.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the contents of a file.
	pub fn get(&self, name: &str) -> Option<&[u8]> {
		self.files.get(name).map(Vec::as_slice)
	}

	/// Stores a file, replacing any previous contents.
	pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
		self.files.insert(name.into(), data.into());
	}

	/// Removes a file, returning its contents.
	pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
		self.files.remove(name)
	}

	/// Returns the number of stored files.
	pub fn len(&self) -> usize {
		self.files.len()
	}

	/// Returns `true` if no file is stored.
	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// Makes every later `open` of `name` fail.
	pub fn fail_open(&mut self, name: impl Into<String>) {
		self.refused.insert(name.into());
	}

	/// Limits how many bytes a single opened file accepts before writes stall.
	pub fn set_write_limit(&mut self, limit: Option<usize>) {
		self.write_limit = limit;
	}

	/// Returns the total number of bytes read from every file so far.
	pub fn bytes_read(&self) -> usize {
		self.bytes_read
	}

	/// Cuts a stored file down to `len` bytes.
	pub fn truncate(&mut self, name: &str, len: usize) {
		if let Some(data) = self.files.get_mut(name) {
			data.truncate(len);
		}
	}
}

impl Storage for MemStorage {
	type File<'a> = MemFile<'a>;

	fn open(&mut self, name: &str, mode: OpenMode) -> Result<MemFile<'_>, StorageError> {
		if self.refused.contains(name) {
			log::error!("open file '{}' for {} refused", name, mode);
			return Err(StorageError::OpenFailed {
				name: name.to_string(),
				mode,
			});
		}

		let write_budget = self.write_limit;
		let data = match mode {
			OpenMode::Read => {
				self.files.get_mut(name).ok_or_else(|| StorageError::NotFound(name.to_string()))?
			}
			OpenMode::Write => {
				let data = self.files.entry(name.to_string()).or_default();
				data.clear();
				data
			}
		};

		Ok(MemFile {
			data,
			pos: 0,
			mode,
			write_budget,
			bytes_read: &mut self.bytes_read,
		})
	}

	fn exists(&self, name: &str) -> bool {
		self.files.contains_key(name)
	}
}

/// An open file inside a [`MemStorage`].
#[derive(Debug)]
pub struct MemFile<'a> {
	data: &'a mut Vec<u8>,
	pos: usize,
	mode: OpenMode,
	write_budget: Option<usize>,
	bytes_read: &'a mut usize,
}

impl StorageFile for MemFile<'_> {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
		if self.mode != OpenMode::Read {
			return Ok(0);
		}
		let remaining = &self.data[self.pos.min(self.data.len())..];
		let n = remaining.len().min(buf.len());
		buf[..n].copy_from_slice(&remaining[..n]);
		self.pos += n;
		*self.bytes_read += n;
		Ok(n)
	}

	fn write(&mut self, buf: &[u8]) -> Result<usize, StorageError> {
		if self.mode != OpenMode::Write {
			return Ok(0);
		}
		let n = match self.write_budget {
			Some(budget) => budget.min(buf.len()),
			None => buf.len(),
		};
		if let Some(budget) = self.write_budget.as_mut() {
			*budget -= n;
		}
		self.data.extend_from_slice(&buf[..n]);
		self.pos += n;
		Ok(n)
	}

	fn flush(&mut self) -> Result<(), StorageError> {
		Ok(())
	}

	fn close(self) -> Result<(), StorageError> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_round_trip() {
		let mut storage = MemStorage::new();
		{
			let mut file = storage.open("A0_D.bin", OpenMode::Write).unwrap();
			file.write_all_checked(&[1, 2, 3]).unwrap();
			file.close().unwrap();
		}

		let mut file = storage.open("A0_D.bin", OpenMode::Read).unwrap();
		let mut buf = [0u8; 3];
		file.read_exact_len(&mut buf).unwrap();
		assert_eq!(buf, [1, 2, 3]);
		assert_eq!(file.read(&mut buf).unwrap(), 0);
	}

	#[test]
	fn test_refused_open() {
		let mut storage = MemStorage::new();
		storage.fail_open("A0_C.txt");

		let result = storage.open("A0_C.txt", OpenMode::Write);
		assert!(matches!(result, Err(StorageError::OpenFailed { .. })));
		assert!(!storage.exists("A0_C.txt"));
	}

	#[test]
	fn test_write_limit() {
		let mut storage = MemStorage::new();
		storage.set_write_limit(Some(4));

		let mut file = storage.open("A0_D.bin", OpenMode::Write).unwrap();
		let result = file.write_all_checked(&[0u8; 10]);
		assert!(matches!(
			result,
			Err(StorageError::ShortWrite {
				expected: 10,
				actual: 4
			})
		));
		assert_eq!(storage.get("A0_D.bin").map(<[u8]>::len), Some(4));
	}

	#[test]
	fn test_truncate() {
		let mut storage = MemStorage::new();
		storage.insert("A0_D.bin", vec![7u8; 8]);
		storage.truncate("A0_D.bin", 5);
		assert_eq!(storage.get("A0_D.bin"), Some(&[7u8; 5][..]));
	}

	#[test]
	fn test_bytes_read() {
		let mut storage = MemStorage::new();
		storage.insert("A0_D.bin", vec![1u8; 100]);

		let mut file = storage.open("A0_D.bin", OpenMode::Read).unwrap();
		let mut buf = [0u8; 10];
		file.read_exact_len(&mut buf).unwrap();
		file.close().unwrap();
		assert_eq!(storage.bytes_read(), 10);
	}

	#[test]
	fn test_missing() {
		let mut storage = MemStorage::new();
		assert!(matches!(
			storage.open("nope", OpenMode::Read),
			Err(StorageError::NotFound(_))
		));
	}
}
