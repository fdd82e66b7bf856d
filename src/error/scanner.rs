/// Scanner related errors
#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
	/// Internal compiler error, should never happen
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	/// Errors encountered during scanning
	#[error(transparent)]
	ScanError(#[from] ScanError),
}

/// A specific scanning error with line number and type.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("line {line}: {type}")]
pub struct ScanError {
	/// The line number where the error occurred.
	pub line:   usize,
	/// The type of scanning error.
	pub r#type: ScanErrorType,
}

impl ScanError {
	pub fn new(line: usize, r#type: ScanErrorType) -> Self { Self { line, r#type } }
}

/// Types of scanning errors.
#[derive(Debug, PartialEq, Eq)]
pub enum ScanErrorType {
	/// Error for unexpected characters.
	UnexpectedCharacter(char),
	/// Error for unterminated strings.
	UnterminatedString,
}

impl std::fmt::Display for ScanErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ScanErrorType::*;
		match self {
			UnexpectedCharacter(c) => {
				write!(f, "Unexpected character '{c}'")
			}
			UnterminatedString => {
				write!(f, "Unterminated string literal")
			}
		}
	}
}
