mod action;
mod constants;
mod fresh;
mod machine;
mod state;
mod transition;

pub use crate::{
	action::Action,
	constants::Constants,
	fresh::Fresh,
	machine::{Fault, Machine},
	state::{Snapshot, State},
	transition::Transition,
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
/// What happens when an addition or multiplication leaves the word width
pub enum OverflowPolicy {
	/// Reject the action, the result has to fit the width
	Forbid,
	/// Results wrap around modulo 2^width
	Wrap,
}

/// Largest value representable on `width` bits
pub fn max_value(width: u32) -> u64 {
	if width >= 64 {
		u64::max_value()
	} else {
		(1 << width) - 1
	}
}

/// Whether `value` is representable as an unsigned word of `width` bits
pub fn fits(value: u64, width: u32) -> bool {
	value <= max_value(width)
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
/// Settings that cannot be encoded
pub enum ConfigError {
	#[error("a word width of {0} bits is not supported, it has to be between 1 and 64")]
	InvalidWidth(u32),
	#[error("{what} {value} is not representable on {width} bits")]
	NotRepresentable {
		what: &'static str,
		value: u64,
		width: u32,
	},
}

/// Words are decoded as `u64`, so at most 64 bits
pub fn check_width(width: u32) -> Result<(), ConfigError> {
	if width == 0 || width > 64 {
		Err(ConfigError::InvalidWidth(width))
	} else {
		Ok(())
	}
}

/// `what` names the value in the error
pub fn check_word(what: &'static str, value: u64, width: u32) -> Result<(), ConfigError> {
	if fits(value, width) {
		Ok(())
	} else {
		Err(ConfigError::NotRepresentable { what, value, width })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn max_value_test() {
		assert_eq!(max_value(1), 1);
		assert_eq!(max_value(7), 127);
		assert_eq!(max_value(14), 16383);
		assert_eq!(max_value(64), u64::max_value());
	}

	#[test]
	fn fits_test() {
		assert!(fits(0, 1));
		assert!(fits(1, 1));
		assert!(!fits(2, 1));
		assert!(fits(127, 7));
		assert!(!fits(128, 7));
		assert!(fits(u64::max_value(), 64));
	}

	#[test]
	fn check_test() {
		assert_eq!(check_width(0), Err(ConfigError::InvalidWidth(0)));
		assert_eq!(check_width(65), Err(ConfigError::InvalidWidth(65)));
		assert_eq!(check_width(1), Ok(()));
		assert_eq!(check_width(64), Ok(()));

		assert_eq!(check_word("target", 127, 7), Ok(()));
		assert_eq!(
			check_word("target", 128, 7),
			Err(ConfigError::NotRepresentable {
				what: "target",
				value: 128,
				width: 7,
			})
		);
	}
}
