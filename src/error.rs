use countdown_encoding::ConfigError;
use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
	#[error("a word width of {0} bits is not supported, it has to be between 1 and 64")]
	InvalidWidth(u32),
	#[error("{what} {value} is not representable on {width} bits")]
	NotRepresentable {
		what: &'static str,
		value: u64,
		width: u32,
	},
	/// The solver could not decide a query
	#[error("satisfiability could not be determined: {0}")]
	Unknown(String),
}

impl From<ConfigError> for Error {
	fn from(e: ConfigError) -> Self {
		match e {
			ConfigError::InvalidWidth(width) => Error::InvalidWidth(width),
			ConfigError::NotRepresentable { what, value, width } => {
				Error::NotRepresentable { what, value, width }
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_config_error() {
		let error: Error = ConfigError::NotRepresentable {
			what: "number",
			value: 200,
			width: 7,
		}
		.into();
		assert_eq!(error.to_string(), "number 200 is not representable on 7 bits");
		assert_eq!(Error::from(ConfigError::InvalidWidth(0)), Error::InvalidWidth(0));
	}
}
