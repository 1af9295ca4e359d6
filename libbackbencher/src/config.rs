use crate::{error::Error, utils};

/// Which direction data moves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum Role {
	#[strum(to_string = "Reading")]
	Read,
	#[default]
	#[strum(to_string = "Writing")]
	Write
}

/// How data moves between the file and the scratch buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum Method {
	/// Explicit read(2)/write(2) calls through the scratch buffer
	#[default]
	#[strum(to_string = "read(2) / write(2)")]
	Pio,
	/// Copying to/from a sliding, page-aligned mmap(2) window
	#[strum(to_string = "mmap(2) / munmap(2)")]
	Mmap
}

/// What the user asked for, before the target file has been looked at
///
/// A byte count or chunk size of 0 is treated the same as one not being given at all
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchConfig {
	pub role: Role,
	pub method: Method,
	pub byte_qty: Option<u64>,
	pub chunk_size: Option<u64>
}

/// The fully resolved configuration of a run. Only constructed once the target file is open and sized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
	pub role: Role,
	pub method: Method,
	pub byte_qty: u64,
	pub chunk_size: u64
}

impl BenchConfig {
	pub fn new(role: Role, method: Method) -> Self {
		BenchConfig {
			role,
			method,
			byte_qty: None,
			chunk_size: None
		}
	}

	pub fn with_byte_qty(mut self, byte_qty: u64) -> Self {
		self.byte_qty = Some(byte_qty);
		self
	}

	pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
		self.chunk_size = Some(chunk_size);
		self
	}

	/// The requested byte count, with 0 meaning "not given"
	pub fn requested_byte_qty(&self) -> Option<u64> {
		self.byte_qty.filter(|&n| n > 0)
	}

	/// The requested chunk size, falling back to the system page size
	pub fn chunk_size_or_default(&self) -> u64 {
		self.chunk_size.filter(|&n| n > 0).unwrap_or_else(utils::page_size)
	}

	/// Checks everything that can be checked without touching the file system
	pub fn validate(&self) -> Result<(), Error> {
		if self.role == Role::Write && self.requested_byte_qty().is_none() {
			return Err(Error::ConfigValidationError("writing requires '-n #' switch".to_string()));
		}

		if usize::try_from(self.chunk_size_or_default()).is_err() {
			return Err(Error::ConfigValidationError(format!("chunk size {} does not fit in memory", self.chunk_size_or_default())));
		}

		Ok(())
	}
}

impl RunConfig {
	/// Resolves `config` against the size of the target file. For reading, the byte count is the file size, or the requested count
	/// clamped to it. For writing, the requested count is used as-is (the file is resized to match)
	pub fn resolve(config: &BenchConfig, file_len: u64) -> Result<Self, Error> {
		config.validate()?;

		let byte_qty = match config.role {
			Role::Read => match config.requested_byte_qty() {
				Some(n) => n.min(file_len),
				None => file_len
			},
			Role::Write => config.requested_byte_qty().ok_or_else(|| Error::ConfigValidationError("writing requires '-n #' switch".to_string()))?
		};

		Ok(RunConfig {
			role: config.role,
			method: config.method,
			byte_qty,
			chunk_size: config.chunk_size_or_default()
		})
	}
}
