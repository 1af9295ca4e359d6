use std::{fs::File, io};

use log::{debug, trace, warn};
use memmap::MmapOptions;

use crate::{error::Error, utils};

/// One mapping of the file. mmap(2) offsets have to be page aligned, so when the bytes we want don't start on a page boundary the
/// window is pulled back to the previous one and grown by the same amount. Those `align` leading bytes were covered by the last
/// window and are skipped over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
	/// Page aligned file offset the mapping starts at
	pub offset: u64,
	/// Length of the mapping, including the alignment padding
	pub len: usize,
	/// Number of leading bytes in the mapping that belong to the previous window
	pub align: usize
}

impl Window {
	/// The number of new bytes this window covers
	pub fn payload_len(&self) -> usize {
		self.len - self.align
	}
}

/// Yields the windows needed to cover `byte_qty` bytes from the start of a file, each covering at most `chunk_size` new bytes.
/// The payloads of the windows are contiguous and sum to exactly `byte_qty`
pub struct Windows {
	offset: u64,
	remaining: u64,
	chunk_size: u64,
	page_size: u64
}

impl Windows {
	pub fn new(byte_qty: u64, chunk_size: u64, page_size: u64) -> Self {
		assert!(chunk_size > 0 && page_size > 0);

		Windows {
			offset: 0,
			remaining: byte_qty,
			chunk_size,
			page_size
		}
	}
}

impl Iterator for Windows {
	type Item = Window;

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}

		let wlen = self.remaining.min(self.chunk_size);
		let align = self.offset % self.page_size;

		let window = Window {
			offset: self.offset - align,
			len: (wlen + align) as usize,
			align: align as usize
		};

		// The end of the mapping is where the next window's new bytes begin
		self.offset = window.offset + window.len as u64;
		self.remaining -= window.payload_len() as u64;

		Some(window)
	}
}

/// Copies `byte_qty` bytes of `file` into the start of `scratch` through a sliding read-only window of at most `chunk_size` new
/// bytes. Only one window is mapped at a time
pub fn read_pass(file: &File, byte_qty: u64, chunk_size: usize, scratch: &mut [u8]) -> Result<(), Error> {
	for window in Windows::new(byte_qty, chunk_size as u64, utils::page_size()) {
		trace!("window is {} bytes", window.payload_len());
		debug!("Mapping {}@{}", window.len, window.offset);

		let map = unsafe { MmapOptions::new().offset(window.offset).len(window.len).map(file) }
			.map_err(|source| Error::MapFailed { offset: window.offset, len: window.len, source })?;

		advise(map.as_ptr(), map.len());

		scratch[..window.payload_len()].copy_from_slice(&map[window.align..]);

		// Unmapped here, before the next window is mapped
		drop(map);
	}

	Ok(())
}

/// Copies the start of `scratch` into `byte_qty` bytes of `file` through a sliding shared writable window of at most `chunk_size`
/// new bytes, asking the kernel to start writing each window back before it is unmapped. The file must already be at least
/// `byte_qty` bytes long
pub fn write_pass(file: &File, byte_qty: u64, chunk_size: usize, scratch: &[u8]) -> Result<(), Error> {
	for window in Windows::new(byte_qty, chunk_size as u64, utils::page_size()) {
		trace!("window is {} bytes", window.payload_len());
		debug!("Mapping {}@{}", window.len, window.offset);

		let mut map = unsafe { MmapOptions::new().offset(window.offset).len(window.len).map_mut(file) }
			.map_err(|source| Error::MapFailed { offset: window.offset, len: window.len, source })?;

		advise(map.as_ptr(), map.len());

		map[window.align..].copy_from_slice(&scratch[..window.payload_len()]);

		if let Err(e) = map.flush_async() {
			warn!("msync(MS_ASYNC) of {}@{} failed: {}", window.len, window.offset, e);
		}

		drop(map);
	}

	Ok(())
}

/// Tells the kernel the mapping will be read front to back and is needed soon. Purely a hint, so failures are only logged
fn advise(ptr: *const u8, len: usize) {
	for (advice, name) in [(libc::MADV_SEQUENTIAL, "MADV_SEQUENTIAL"), (libc::MADV_WILLNEED, "MADV_WILLNEED")] {
		if unsafe { libc::madvise(ptr as *mut libc::c_void, len, advice) } != 0 {
			warn!("madvise({}) failed: {}", name, io::Error::last_os_error());
		}
	}
}
