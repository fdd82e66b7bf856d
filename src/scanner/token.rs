use std::fmt::Display;

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub r#type: TokenType,
	pub lexeme: String,
	pub line:   usize,
}

impl Token {
	pub fn new(r#type: TokenType, lexeme: impl Into<String>, line: usize) -> Self {
		Self { r#type, lexeme: lexeme.into(), line }
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{}] \"{}\" on line {}", self.r#type, self.lexeme, self.line)
	}
}

/// The different types of tokens in SharpPtr.
///
/// The literal text lives on the [`Token`], so the type itself is a plain tag
/// the parser can compare and look ahead on cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
	/// Identifier, e.g. variable, method or type name. Primitive type names such
	/// as `int` and `string` are identifiers too.
	Identifier,
	/// Number literal, e.g. `100` or `3.5`. Not validated by the scanner.
	Number,
	/// String literal, e.g. `"Alice"`. The lexeme holds the unescaped contents.
	String,
	/// Method call arrow `->`.
	Arrow,
	/// Safe cast operator `-?`.
	SafeCast,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Dot `.`.
	Dot,
	/// Assignment `=`.
	Assign,
	/// Comma `,`.
	Comma,
	/// Colon `:`, opens a block.
	Colon,
	/// Double colon `::`, closes every open block.
	DoubleColon,
	/// Class keyword.
	Class,
	/// Program entry keyword.
	Main,
	/// Method definition keyword.
	Method,
	/// Indentation grew, a block starts.
	Indent,
	/// Indentation shrank, a block ends.
	Dedent,
	/// New Line Character `\n`.
	NewLine,
	/// End of file/input.
	Eof,
}

impl TokenType {
	pub fn keyword_or_identifier(value: &str) -> Self {
		match value {
			"class" => TokenType::Class,
			"main" => TokenType::Main,
			"method" => TokenType::Method,
			_ => TokenType::Identifier,
		}
	}
}

impl Display for TokenType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{self:?}") }
}
