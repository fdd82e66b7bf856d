#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Errors that can occur while evaluating a safe cast
pub enum CastError {
	/// The cast source was never declared in this run
	#[error("null variable '{0}'")]
	NullVariable(String),
	/// The value cannot be converted between these types
	#[error("Cannot cast {from} to {to}")]
	InvalidConversion { from: String, to: String },
	/// No conversion exists for the destination type
	#[error("Unsupported safe cast to {0}")]
	Unsupported(String),
}
