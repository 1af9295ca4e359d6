use clap::{ArgAction, Parser};
use libbackbencher::{config::{BenchConfig, Method, Role}, utils::str_parse::parse_size};
use log::LevelFilter;

fn byte_count(s: &str) -> Result<u64, String> {
	parse_size(s).map_err(|e| e.to_string())
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
	/// Raise debug verbosity. May be repeated
	#[arg(short = 'D', action = ArgAction::Count)]
	pub debug: u8,
	/// Chunk (and mmap window) size in bytes. Defaults to the system page size. Accepts 0x hex and 0-prefixed octal
	#[arg(short = 'c', value_name = "BYTES", value_parser = byte_count)]
	pub chunk_size: Option<u64>,
	/// Copy through mmap(2) windows instead of read(2)/write(2)
	#[arg(short = 'm')]
	pub mmap: bool,
	/// Number of bytes to move. Required when writing; when reading, clamps the amount read to at most the file size
	#[arg(short = 'n', value_name = "BYTES", value_parser = byte_count)]
	pub byte_qty: Option<u64>,
	/// Read the file instead of writing it
	#[arg(short = 'r')]
	pub read: bool,
	/// The file to benchmark. Created (or truncated) when writing
	pub file: String
}

impl Args {
	pub fn log_level_filter(&self) -> LevelFilter {
		match self.debug {
			0 => LevelFilter::Info,
			1 => LevelFilter::Debug,
			_ => LevelFilter::Trace
		}
	}

	pub fn bench_config(&self) -> BenchConfig {
		BenchConfig {
			role: if self.read { Role::Read } else { Role::Write },
			method: if self.mmap { Method::Mmap } else { Method::Pio },
			byte_qty: self.byte_qty,
			chunk_size: self.chunk_size
		}
	}
}
