//! Turns SharpPtr source text into tokens.
//!
//! SharpPtr blocks are opened by `:` and shaped by indentation, Python style.
//! The scanner measures the leading whitespace of every non-blank line and
//! keeps a stack of the depths that are currently open. Growing past the top
//! of the stack opens a block and yields `Indent`; shrinking pops every deeper
//! level, one `Dedent` each. The parser never has to look at whitespace.
//!
//! ``` text
//! main:               Main Colon NewLine
//!     int x = 5       Indent Identifier Identifier Assign Number NewLine
//!                     Dedent Eof
//! ```
//!
//! `::` is the explicit block terminator. It closes every open block at once,
//! whatever the indentation of the line it sits on.
mod token;

use std::{iter::Peekable, str::CharIndices};

use TokenType::*;
use anyhow::Context;
pub use token::*;

use crate::error::scanner::{ScanError, ScanErrorType, ScannerError};

/// Indentation units a tab counts for. A space counts for one.
pub const TAB_WIDTH: usize = 4;

/// A scanner for SharpPtr source code
pub struct Scanner<'a> {
	/// User input source code
	source:       &'a str,
	/// User input source code iterator
	source_iter:  Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:        usize,
	/// Points at the character currently being considered
	cursor:       usize,
	/// Tracks what source line `cursor` is on so we can produce tokens that
	/// know their location.
	line:         usize,
	/// Depths of the open blocks, the base depth 0 is never popped
	indent_stack: Vec<usize>,
	/// Set after a line break, the next character starts a logical line
	line_start:   bool,
	/// Lexed tokens
	tokens:       Vec<Token>,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self {
			source,
			source_iter,
			start: 0,
			cursor: 0,
			line: 1,
			indent_stack: vec![0],
			line_start: true,
			tokens: Vec::new(),
		}
	}

	/// Scan all tokens from the source code
	#[tracing::instrument(level = "debug", skip_all)]
	pub fn scan_tokens(mut self) -> Result<Vec<Token>, ScannerError> {
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = self.start;
			if self.line_start {
				self.line_start = false;
				self.indentation();
				continue;
			}
			self.scan_token()?;
		}
		self.unwind();
		self.tokens.push(Token::new(Eof, "", self.line));
		tracing::debug!(tokens = self.tokens.len(), lines = self.line, "scanned source");
		Ok(self.tokens)
	}

	/// Scan a single token from the source code
	fn scan_token(&mut self) -> Result<(), ScannerError> {
		let next_char = self.advance().context("Unexpected EOF")?;
		#[rustfmt::skip]
		let r#type = match next_char {
			'\n' => {
				self.tokens.push(Token::new(NewLine, "\\n", self.line));
				self.line += 1;
				self.line_start = true;
				return Ok(());
			}
			c if c.is_whitespace() => return Ok(()),
			'(' => LeftParen,
			')' => RightParen,
			'{' => LeftBrace,
			'}' => RightBrace,
			'.' => Dot,
			'=' => Assign,
			',' => Comma,
			'-' => if self.match_next('>') { Arrow } else if self.match_next('?') { SafeCast } else {
				return Err(ScanError::new(self.line, ScanErrorType::UnexpectedCharacter('-')).into());
			},
			':' => if self.match_next(':') { self.unwind(); DoubleColon } else { Colon },
			'"' => return self.string(),
			c if c.is_ascii_digit() => self.number(),
			c if c.is_alphabetic() || c == '_' => self.identifier(),
			_ => return Err(ScanError::new(self.line, ScanErrorType::UnexpectedCharacter(next_char)).into()),
		};

		let lexeme = &self.source[self.start..self.cursor];
		self.tokens.push(Token::new(r#type, lexeme, self.line));
		Ok(())
	}

	/// Measure the leading whitespace of a line and open or close blocks.
	///
	/// Blank lines never touch the stack.
	fn indentation(&mut self) {
		let mut depth = 0;
		while let Some(c) = self.peek() {
			match c {
				' ' => depth += 1,
				'\t' => depth += TAB_WIDTH,
				_ => break,
			}
			self.advance();
		}
		if matches!(self.peek(), None | Some('\n' | '\r')) {
			return;
		}

		let top = self.indent_top();
		if depth > top {
			tracing::trace!(line = self.line, depth, "indent");
			self.indent_stack.push(depth);
			self.tokens.push(Token::new(Indent, "INDENT", self.line));
		} else if depth < top {
			while self.indent_stack.len() > 1 && self.indent_top() > depth {
				self.indent_stack.pop();
				tracing::trace!(line = self.line, depth, "dedent");
				self.tokens.push(Token::new(Dedent, "DEDENT", self.line));
			}
		}
	}

	/// Close every open block, one `Dedent` per level above the base.
	fn unwind(&mut self) {
		while self.indent_stack.len() > 1 {
			self.indent_stack.pop();
			self.tokens.push(Token::new(Dedent, "DEDENT", self.line));
		}
	}

	fn indent_top(&self) -> usize { self.indent_stack.last().copied().unwrap_or_default() }

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Scan a string literal, resolving escapes as we go
	fn string(&mut self) -> Result<(), ScannerError> {
		let line = self.line;
		let mut value = std::string::String::new();
		loop {
			let c = self.advance().ok_or_else(|| ScanError::new(line, ScanErrorType::UnterminatedString))?;
			match c {
				'"' => break,
				'\\' => {
					let escaped =
						self.advance().ok_or_else(|| ScanError::new(line, ScanErrorType::UnterminatedString))?;
					value.push(match escaped {
						'n' => '\n',
						't' => '\t',
						'r' => '\r',
						other => other,
					});
					if escaped == '\n' {
						self.line += 1;
					}
				}
				'\n' => {
					self.line += 1;
					value.push(c);
				}
				_ => value.push(c),
			}
		}

		self.tokens.push(Token::new(String, value, line));
		Ok(())
	}

	/// Scan a number literal, digits and dots in any order
	fn number(&mut self) -> TokenType {
		while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
			self.advance();
		}
		Number
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> TokenType {
		while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		TokenType::keyword_or_identifier(text)
	}
}
