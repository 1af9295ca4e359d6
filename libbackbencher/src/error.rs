use std::{fmt::Display, io};

/// The system call (or group of calls) that was being made when an I/O error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum IoOp {
	Open,
	Stat,
	Truncate,
	Read,
	Write,
	/// Writing the final report to stdout
	Report
}

#[derive(Debug)]
pub enum Error {
	/// The requested configuration is illegal. Always raised before any file is touched
	ConfigValidationError(String),
	/// A syscall failed. Carries the operation that failed and the OS error
	IoError(IoOp, io::Error),
	/// mmap(2) refused to map a window of the file
	MapFailed {
		offset: u64,
		len: usize,
		source: io::Error
	},
	/// A single read(2) or write(2) moved fewer bytes than asked for. Partial transfers are never retried
	ShortTransfer {
		op: IoOp,
		requested: usize,
		transferred: usize
	},
}

impl Error {
	pub fn is_config_error(&self) -> bool {
		matches!(self, Error::ConfigValidationError(_))
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::ConfigValidationError(msg) => write!(f, "{}", msg),
			Error::IoError(op, e) => write!(f, "{} failed: {}", op, e),
			Error::MapFailed { offset, len, source } => write!(f, "mmap failed; offset={}, wlen={}: {}", offset, len, source),
			Error::ShortTransfer { op: IoOp::Read, requested, transferred } => write!(f, "short read: wanted {} bytes, got {}", requested, transferred),
			Error::ShortTransfer { op: IoOp::Write, requested, transferred } => write!(f, "output truncated: wanted to write {} bytes, wrote {}", requested, transferred),
			Error::ShortTransfer { op, requested, transferred } => write!(f, "short {}: wanted {} bytes, got {}", op, requested, transferred),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::IoError(_, e) => Some(e),
			Error::MapFailed { source, .. } => Some(source),
			_ => None
		}
	}
}

impl From<(IoOp, io::Error)> for Error {
	fn from((op, e): (IoOp, io::Error)) -> Self {
		Error::IoError(op, e)
	}
}

/// Attaches the failing operation to an `io::Result`, so syscall failures can be propagated with `?`
pub trait IoContext<T> {
	fn during(self, op: IoOp) -> Result<T, Error>;
}

impl<T> IoContext<T> for io::Result<T> {
	fn during(self, op: IoOp) -> Result<T, Error> {
		self.map_err(|e| Error::from((op, e)))
	}
}
