use std::{fmt::Display, io::{self, Write}, time::{SystemTime, UNIX_EPOCH}};

use crate::config::{Method, Role};

/// The result of a completed run: when it started and ended, how much was moved, and how fast
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
	pub role: Role,
	pub method: Method,
	/// Seconds since the Unix epoch
	pub start: f64,
	/// Seconds since the Unix epoch
	pub end: f64,
	pub byte_qty: u64,
	pub chunk_size: u64
}

impl Report {
	pub fn new(role: Role, method: Method, start: SystemTime, stop: SystemTime, byte_qty: u64, chunk_size: u64) -> Self {
		Report {
			role,
			method,
			start: epoch_secs(start),
			end: epoch_secs(stop),
			byte_qty,
			chunk_size
		}
	}

	pub fn seconds(&self) -> f64 {
		self.end - self.start
	}

	pub fn bytes(&self) -> f64 {
		self.byte_qty as f64
	}

	/// Bytes per second, or None if no measurable time passed (or the clock went backwards) and the rate is undefined
	pub fn rate(&self) -> Option<f64> {
		let seconds = self.seconds();
		if seconds > 0.0 {
			Some(self.bytes() / seconds)
		} else {
			None
		}
	}

	/// Writes the report and flushes, so a failure to deliver it is seen here
	pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
		write!(w, "{}", self)?;
		w.flush()
	}
}

impl Display for Report {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "{:>7}: {}", "Role", self.role)?;
		writeln!(f, "{:>7}: {}", "Method", self.method)?;
		writeln!(f, "{:>7}: {:.6}", "End", self.end)?;
		writeln!(f, "{:>7}: {:.6}", "Start", self.start)?;
		writeln!(f, "{:>7}: {:.6}", "Seconds", self.seconds())?;
		writeln!(f, "{:>7}: {:.6}", "Bytes", self.bytes())?;
		match self.rate() {
			Some(rate) => writeln!(f, "{:>7}: {}", "Rate", format_g(rate))?,
			None => writeln!(f, "{:>7}: undefined", "Rate")?
		}
		writeln!(f, "{:>7}: {}", "BlkSiz", self.chunk_size)
	}
}

/// Formats the report of a run as text
pub fn format(role: Role, method: Method, start: SystemTime, stop: SystemTime, byte_qty: u64, chunk_size: u64) -> String {
	Report::new(role, method, start, stop, byte_qty, chunk_size).to_string()
}

fn epoch_secs(time: SystemTime) -> f64 {
	match time.duration_since(UNIX_EPOCH) {
		Ok(d) => d.as_secs_f64(),
		Err(e) => -e.duration().as_secs_f64()
	}
}

/// Formats `val` like printf's "%g": 6 significant digits, trailing zeros removed, and scientific notation if the exponent is less
/// than -4 or at least 6
pub fn format_g(val: f64) -> String {
	const PRECISION: i32 = 6;

	if !val.is_finite() {
		return if val.is_nan() {
			"nan".to_string()
		} else if val > 0.0 {
			"inf".to_string()
		} else {
			"-inf".to_string()
		};
	}
	if val == 0.0 {
		return if val.is_sign_negative() { "-0" } else { "0" }.to_string();
	}

	// Round to the precision first, as that can bump the exponent (e.g. 999999.5 -> 1e+06)
	let sci = format!("{:.*e}", (PRECISION - 1) as usize, val);
	let (mantissa, exp) = sci.split_once('e').unwrap_or((&sci, "0"));
	let exp: i32 = exp.parse().unwrap_or(0);

	if exp < -4 || exp >= PRECISION {
		format!("{}e{}{:02}", strip_zeros(mantissa), if exp < 0 { '-' } else { '+' }, exp.abs())
	} else {
		strip_zeros(&format!("{:.*}", (PRECISION - 1 - exp) as usize, val)).to_string()
	}
}

fn strip_zeros(num: &str) -> &str {
	if num.contains('.') {
		num.trim_end_matches('0').trim_end_matches('.')
	} else {
		num
	}
}
