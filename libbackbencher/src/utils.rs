pub mod str_parse;

use std::{fs::File, io::{self, Seek}, path::Path};

#[cfg(test)]
pub fn init_test_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// Get the length of the file, by querying metadata and as a last resort seeking to the end of the file and getting the offset
pub fn file_len(file: &mut File) -> Result<u64, io::Error> {
	if let Ok(metadata) = file.metadata() {
		Ok(metadata.len())
	} else {
		let size = file.seek(io::SeekFrom::End(0))?;
		file.seek(io::SeekFrom::Start(0))?;
		Ok(size)
	}
}

/// The size of a virtual memory page, which is also the granularity mmap(2) offsets must be aligned to
pub fn page_size() -> u64 {
	let sz = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
	if sz > 0 {
		sz as u64
	} else {
		// sysconf can't really fail for _SC_PAGESIZE, but 4 KiB is the right answer nearly everywhere
		4096
	}
}

/// The name this process was invoked as, i.e. the final path component of argv[0]
pub fn program_name(arg0: Option<impl AsRef<Path>>) -> String {
	arg0.as_ref()
		.and_then(|p| p.as_ref().file_name())
		.map(|n| n.to_string_lossy().into_owned())
		.filter(|n| !n.is_empty())
		.unwrap_or("backbencher".to_string())
}
