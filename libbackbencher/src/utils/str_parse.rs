use crate::error::Error;

/// Parses an unsigned byte count, picking the radix from the prefix: "0x"/"0X" is hexadecimal, a leading "0" is octal, anything else
/// is decimal. Surrounding whitespace is ignored. Unlike strtoull, trailing garbage is rejected rather than silently dropped
pub fn parse_size(string: &str) -> Result<u64, Error> {
	let trimmed = string.trim();

	let (digits, radix) = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
		(hex, 16)
	} else if trimmed.len() > 1 && trimmed.starts_with('0') {
		(&trimmed[1..], 8)
	} else {
		(trimmed, 10)
	};

	if digits.is_empty() || digits.starts_with('+') {
		return Err(Error::ConfigValidationError(format!("\"{}\" is not a byte count", string)));
	}

	u64::from_str_radix(digits, radix).map_err(|e| Error::ConfigValidationError(format!("\"{}\" is not a byte count: {}", string, e)))
}
