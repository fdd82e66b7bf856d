//! # SharpPtr front-end
//!
//! User's source code:
//!
//! ``` text
//! class Player:
//!     int health = 100
//!     method heal(int amount):
//!         health = amount
//!         ::
//! main:
//!     player->heal(5)
//!     health -? string
//! ```

//! ## Scanning
//!
//! The [`scanner`] turns characters into tokens. Leading whitespace is not
//! ignored: a deeper line opens a block with `INDENT`, a shallower one closes
//! blocks with `DEDENT`, and `::` closes everything that is still open.

//! ## Parsing and binding
//!
//! The [`parser`] is a recursive descent parser that builds [`ast::Node`]s.
//! It does not wait for a separate resolution pass: each node is registered in
//! the per-run [`SymbolRegistry`] and the long-lived [`Catalog`] the moment it
//! is parsed, which is how `health = amount` knows `health` exists.

//! ## Evaluation
//!
//! There is no interpreter for statements. The only thing that runs is a safe
//! cast, `health -? string`, which the [`evaluator`] resolves against the
//! variables of the run.

pub mod ast;
pub mod cli;
mod compiler;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod registry;
pub mod scanner;

pub use ast::Node;
pub use compiler::{Compiler, Report};
pub use error::{
	SharpPtrError,
	cast::CastError,
	parser::{ParseError, ParseErrorType, ParserError},
	scanner::{ScanError, ScanErrorType, ScannerError},
};
pub use evaluator::evaluate_safe_cast;
pub use registry::{Catalog, CatalogEntry, SymbolKind, SymbolRegistry};
pub use scanner::{Token, TokenType};

/// Tokenize a whole source text.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScannerError> { scanner::Scanner::new(source).scan_tokens() }

/// Parse a token stream ending in `Eof`, registering symbols in `catalog`.
pub fn parse_all(tokens: Vec<Token>, catalog: &mut Catalog) -> Result<(Vec<Node>, SymbolRegistry), ParserError> {
	parser::Parser::new(tokens, catalog).parse_all()
}
