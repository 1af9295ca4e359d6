pub mod pio;
pub mod mmap;

use std::fs::File;

use crate::{config::{Method, Role, RunConfig}, error::Error};

/// Makes one pass over `file` moving `config.byte_qty` bytes between it and `scratch`, in the direction given by the role and using
/// the method given by the config.
///
/// `file` must be positioned at offset 0, opened readable for reading, and readable and writable for writing, with at least `byte_qty`
/// bytes addressable in it. `scratch` must be at least `chunk_size` bytes long. The first failure ends the pass, nothing is retried
pub fn run(file: &mut File, config: &RunConfig, scratch: &mut [u8]) -> Result<(), Error> {
	let chunk_size = usize::try_from(config.chunk_size)
		.ok()
		.filter(|&cs| cs > 0 && cs <= scratch.len())
		.ok_or_else(|| Error::ConfigValidationError(format!("chunk size {} does not fit the {} byte scratch buffer", config.chunk_size, scratch.len())))?;

	match (config.method, config.role) {
		(Method::Pio, Role::Read) => pio::read_pass(file, config.byte_qty, chunk_size, scratch),
		(Method::Pio, Role::Write) => pio::write_pass(file, config.byte_qty, chunk_size, scratch),
		(Method::Mmap, Role::Read) => mmap::read_pass(file, config.byte_qty, chunk_size, scratch),
		(Method::Mmap, Role::Write) => mmap::write_pass(file, config.byte_qty, chunk_size, scratch),
	}
}
