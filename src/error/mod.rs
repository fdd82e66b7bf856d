pub mod cast;
pub mod parser;
pub mod registry;
pub mod scanner;

/// SharpPtrError is the top-level error type of the front-end.
#[derive(thiserror::Error, Debug)]
pub enum SharpPtrError {
	/// Internal compiler error, should never happen
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// The source could not be tokenized
	#[error("Scan error: {0}")]
	ScannerError(#[from] scanner::ScannerError),
	/// The token stream does not match the grammar
	#[error("Parse error: {0}")]
	ParserError(#[from] parser::ParserError),
	/// A safe cast failed during evaluation
	#[error("Cast error: {0}")]
	CastError(#[from] cast::CastError),
}
