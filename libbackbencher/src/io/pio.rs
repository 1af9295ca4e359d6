use std::io::{Read, Write};

use log::trace;

use crate::error::{Error, IoContext, IoOp};

/// Reads `byte_qty` bytes from `src` into the start of `scratch`, at most `chunk_size` bytes per read(2). Each read must return
/// exactly the amount asked for, anything less (including 0 at end of file) is an error
pub fn read_pass<R: Read>(src: &mut R, byte_qty: u64, chunk_size: usize, scratch: &mut [u8]) -> Result<(), Error> {
	let mut remaining = byte_qty;

	while remaining > 0 {
		let gulp = remaining.min(chunk_size as u64) as usize;
		trace!("reading {} bytes, {} remaining", gulp, remaining);

		let transferred = src.read(&mut scratch[..gulp]).during(IoOp::Read)?;
		if transferred != gulp {
			return Err(Error::ShortTransfer { op: IoOp::Read, requested: gulp, transferred });
		}

		remaining -= gulp as u64;
	}

	Ok(())
}

/// Writes `byte_qty` bytes to `dst` from the start of `scratch`, at most `chunk_size` bytes per write(2). Like [`read_pass`], a short
/// write is an error and is not retried
pub fn write_pass<W: Write>(dst: &mut W, byte_qty: u64, chunk_size: usize, scratch: &[u8]) -> Result<(), Error> {
	let mut remaining = byte_qty;

	while remaining > 0 {
		let gulp = remaining.min(chunk_size as u64) as usize;
		trace!("writing {} bytes, {} remaining", gulp, remaining);

		let transferred = dst.write(&scratch[..gulp]).during(IoOp::Write)?;
		if transferred != gulp {
			return Err(Error::ShortTransfer { op: IoOp::Write, requested: gulp, transferred });
		}

		remaining -= gulp as u64;
	}

	Ok(())
}

#[cfg(test)]
mod test {
	use std::io::{self, Read, Write};

	use crate::error::{Error, IoOp};

	use super::{read_pass, write_pass};

	/// Hands out at most `max` bytes per call
	struct Trickle {
		max: usize,
		calls: usize
	}

	impl Read for Trickle {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			self.calls += 1;
			let n = buf.len().min(self.max);
			buf[..n].fill(0xee);
			Ok(n)
		}
	}

	impl Write for Trickle {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			self.calls += 1;
			Ok(buf.len().min(self.max))
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	struct Broken;

	impl Read for Broken {
		fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
			Err(io::Error::from_raw_os_error(libc::EIO))
		}
	}

	#[test]
	fn test_read_pass_gulps() {
		let data: Vec<u8> = (0..=255).cycle().take(1000).collect();
		let mut src = &data[..];
		let mut scratch = vec![0; 300];

		read_pass(&mut src, 1000, 300, &mut scratch).unwrap();

		// 300 + 300 + 300 + 100, the last gulp only overwrites the front of the buffer
		assert_eq!(&scratch[..100], &data[900..1000]);
		assert_eq!(&scratch[100..300], &data[700..900]);
		assert!(src.is_empty());
	}

	#[test]
	fn test_read_pass_does_not_retry_partial_reads() {
		let mut src = Trickle { max: 10, calls: 0 };
		let mut scratch = vec![0; 64];

		match read_pass(&mut src, 128, 64, &mut scratch) {
			Err(Error::ShortTransfer { op: IoOp::Read, requested: 64, transferred: 10 }) => (),
			res => panic!("Expected a short read, got {:?}", res)
		}
		assert_eq!(src.calls, 1);
	}

	#[test]
	fn test_read_pass_propagates_os_error() {
		let mut scratch = vec![0; 64];

		match read_pass(&mut Broken, 128, 64, &mut scratch) {
			Err(Error::IoError(IoOp::Read, e)) => assert_eq!(e.raw_os_error(), Some(libc::EIO)),
			res => panic!("Expected an I/O error, got {:?}", res)
		}
	}

	#[test]
	fn test_write_pass_gulps() {
		let scratch: Vec<u8> = (0..100).collect();
		let mut dst = Vec::new();

		write_pass(&mut dst, 250, 100, &scratch).unwrap();

		assert_eq!(dst.len(), 250);
		assert_eq!(&dst[..100], &scratch[..]);
		assert_eq!(&dst[100..200], &scratch[..]);
		assert_eq!(&dst[200..], &scratch[..50]);
	}

	#[test]
	fn test_write_pass_zero_write_is_short() {
		let mut dst = Trickle { max: 0, calls: 0 };
		let scratch = vec![0; 64];

		match write_pass(&mut dst, 64, 64, &scratch) {
			Err(Error::ShortTransfer { op: IoOp::Write, requested: 64, transferred: 0 }) => (),
			res => panic!("Expected a short write, got {:?}", res)
		}
		assert_eq!(dst.calls, 1);

		// And the same through a fixed size slice that fills up part way through
		let mut backing = [0u8; 100];
		let mut dst = &mut backing[..];
		match write_pass(&mut dst, 128, 64, &scratch) {
			Err(Error::ShortTransfer { op: IoOp::Write, requested: 64, transferred: 36 }) => (),
			res => panic!("Expected a short write, got {:?}", res)
		}
	}
}
