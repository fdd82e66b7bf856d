use crate::scanner::TokenType;

#[derive(thiserror::Error, Debug)]
pub enum ParserError {
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	#[error(transparent)]
	ParseError(#[from] ParseError),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("line {line}: {type}")]
pub struct ParseError {
	pub line:   usize,
	pub r#type: ParseErrorType,
}

impl ParseError {
	pub fn new(line: usize, r#type: ParseErrorType) -> Self { Self { line, r#type } }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParseErrorType {
	UnexpectedToken { expected: TokenType, found: TokenType },
	/// A method body ended without `::`.
	UnclosedMethod(String),
	UndeclaredVariable(String),
	DuplicateDeclaration(String),
	/// No grammar rule starts with this lexeme.
	BrokenSyntax(String),
	/// `main:` or `method name:` followed by neither a block nor `::`.
	ExpectedBlock(&'static str),
	MissingArguments(String),
	ExpectedParameter,
	ExpectedArgument,
	ExpectedSeparator(&'static str),
}

impl std::fmt::Display for ParseErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorType::*;
		match self {
			UnexpectedToken { expected, found } => write!(f, "expected {expected}, got {found}"),
			UnclosedMethod(name) => write!(f, "method '{name}' must be closed with '::'"),
			UndeclaredVariable(name) => write!(f, "Variable '{name}' is not declared"),
			DuplicateDeclaration(key) => write!(f, "'{key}' already exists"),
			BrokenSyntax(lexeme) => write!(f, "this syntax is broken near '{lexeme}'"),
			ExpectedBlock(construct) => write!(f, "Expected indentation or '::' after {construct}:"),
			MissingArguments(method) => write!(f, "Expected '(' after method name '{method}'"),
			ExpectedParameter => write!(f, "Expected parameter name"),
			ExpectedArgument => write!(f, "Expected argument value"),
			ExpectedSeparator(list) => write!(f, "Expected ',' or ')' in {list} list"),
		}
	}
}
