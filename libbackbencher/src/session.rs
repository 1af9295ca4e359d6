use std::{fs::{File, OpenOptions}, os::unix::fs::OpenOptionsExt, path::Path, time::SystemTime};

use log::debug;

use crate::{config::{BenchConfig, Role, RunConfig}, error::{Error, IoContext, IoOp}, io, report::Report, utils};

/// Permissions a newly created target file gets (before the umask)
const CREATE_MODE: u32 = 0o660;

/// The state of one run: the open target file, the resolved configuration and the scratch buffer data is copied through.
/// Dropping a session closes the file
pub struct Session {
	file: File,
	config: RunConfig,
	scratch: Vec<u8>
}

impl Session {
	/// Validates `config` and then opens the file at `path` according to the role. For reading, the file is opened read-only and the
	/// byte count is resolved against its size. For writing, the file is created or truncated and then resized to exactly the byte count.
	///
	/// Configuration errors are returned before the file system is touched
	pub fn open(path: impl AsRef<Path>, config: &BenchConfig) -> Result<Self, Error> {
		config.validate()?;

		let path = path.as_ref();
		debug!("Using file '{}'", path.display());

		// Allocated up front, so a chunk size too big to allocate fails before the file is created or truncated
		let scratch = alloc_scratch(config.chunk_size_or_default())?;

		let (file, config) = match config.role {
			Role::Read => {
				let mut file = File::open(path).during(IoOp::Open)?;
				let file_len = utils::file_len(&mut file).during(IoOp::Stat)?;

				(file, RunConfig::resolve(config, file_len)?)
			}
			Role::Write => {
				let run_config = RunConfig::resolve(config, 0)?;

				let file = OpenOptions::new()
					.read(true)
					.write(true)
					.create(true)
					.truncate(true)
					.mode(CREATE_MODE)
					.open(path)
					.during(IoOp::Open)?;
				file.set_len(run_config.byte_qty).during(IoOp::Truncate)?;

				(file, run_config)
			}
		};

		debug!("Resolved config: {:?}", config);

		Ok(Session {
			file,
			config,
			scratch
		})
	}

	pub fn config(&self) -> &RunConfig {
		&self.config
	}

	/// Times one pass of the copy engine over the file, consuming the session (and so closing the file) once it is done
	pub fn run(mut self) -> Result<Report, Error> {
		let start = SystemTime::now();
		io::run(&mut self.file, &self.config, &mut self.scratch)?;
		let stop = SystemTime::now();

		drop(self.file);

		Ok(Report::new(self.config.role, self.config.method, start, stop, self.config.byte_qty, self.config.chunk_size))
	}
}

/// A zeroed buffer of `len` bytes, or a config error if that much memory can't be had
fn alloc_scratch(len: u64) -> Result<Vec<u8>, Error> {
	let len = usize::try_from(len).map_err(|_| Error::ConfigValidationError(format!("chunk size {} does not fit in memory", len)))?;

	let mut scratch = Vec::new();
	scratch.try_reserve_exact(len).map_err(|e| Error::ConfigValidationError(format!("cannot allocate a {} byte chunk: {}", len, e)))?;
	scratch.resize(len, 0);

	Ok(scratch)
}

#[cfg(test)]
mod test {
	use std::fs;

	use crate::{config::{BenchConfig, Method, Role}, error::{Error, IoOp}, utils};

	use super::Session;

	#[test]
	fn test_write_then_read_back() {
		utils::init_test_logger();

		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bench.dat");
		let byte_qty = 8 * 1024 * 1024;

		let config = BenchConfig::new(Role::Write, Method::Pio).with_byte_qty(byte_qty).with_chunk_size(4096);
		let report = Session::open(&path, &config).unwrap().run().unwrap();

		assert_eq!(fs::metadata(&path).unwrap().len(), byte_qty);
		assert_eq!(report.byte_qty, byte_qty);
		assert_eq!(report.chunk_size, 4096);
		assert!(report.to_string().contains("  Bytes: 8388608.000000\n"));

		let config = BenchConfig::new(Role::Read, Method::Mmap).with_chunk_size(5000);
		let session = Session::open(&path, &config).unwrap();
		assert_eq!(session.config().byte_qty, byte_qty);

		let report = session.run().unwrap();
		assert_eq!(report.role, Role::Read);
		assert_eq!(report.method, Method::Mmap);
		assert!(report.to_string().contains("  Bytes: 8388608.000000\n"));
	}

	#[test]
	fn test_write_truncates_existing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bench.dat");
		fs::write(&path, vec![0xff; 100_000]).unwrap();

		for method in [Method::Pio, Method::Mmap] {
			let config = BenchConfig::new(Role::Write, method).with_byte_qty(12345).with_chunk_size(1000);
			Session::open(&path, &config).unwrap().run().unwrap();

			let data = fs::read(&path).unwrap();
			assert_eq!(data.len(), 12345);
			assert!(data.iter().all(|&b| b == 0));
		}
	}

	#[test]
	fn test_read_clamps_to_file_size() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bench.dat");
		fs::write(&path, vec![1; 10_000]).unwrap();

		let config = BenchConfig::new(Role::Read, Method::Pio).with_byte_qty(1 << 40);
		let session = Session::open(&path, &config).unwrap();
		assert_eq!(session.config().byte_qty, 10_000);
		assert_eq!(session.config().chunk_size, utils::page_size());
		session.run().unwrap();

		let config = BenchConfig::new(Role::Read, Method::Mmap).with_byte_qty(3000);
		let session = Session::open(&path, &config).unwrap();
		assert_eq!(session.config().byte_qty, 3000);
		assert_eq!(session.run().unwrap().byte_qty, 3000);
	}

	#[test]
	fn test_write_without_byte_qty_leaves_file_alone() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("precious.dat");
		fs::write(&path, b"do not truncate me").unwrap();

		let config = BenchConfig::new(Role::Write, Method::Pio);
		assert!(Session::open(&path, &config).err().unwrap().is_config_error());
		assert_eq!(fs::read(&path).unwrap(), b"do not truncate me");

		let missing = dir.path().join("missing.dat");
		assert!(Session::open(&missing, &config).err().unwrap().is_config_error());
		assert!(!missing.exists());
	}

	#[test]
	fn test_unallocatable_chunk_size_leaves_file_alone() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("huge_chunk.dat");

		let config = BenchConfig::new(Role::Write, Method::Pio).with_byte_qty(4096).with_chunk_size(1 << 56);
		match Session::open(&path, &config) {
			Err(e) => assert!(e.is_config_error(), "{}", e),
			Ok(_) => panic!("Expected a 2^56 byte chunk to be unallocatable")
		}
		assert!(!path.exists());
	}

	#[test]
	fn test_read_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let config = BenchConfig::new(Role::Read, Method::Pio);

		match Session::open(dir.path().join("missing.dat"), &config) {
			Err(Error::IoError(IoOp::Open, e)) => assert_eq!(e.raw_os_error(), Some(libc::ENOENT)),
			Err(e) => panic!("Expected an open error, got {}", e),
			Ok(_) => panic!("Expected an open error")
		}
	}
}
