//! The `Scanner` use `Lexical grammar`, implement `alphabet` as `Characters`,
//! `string` as `Lexme` or `Token`
//! The `Parser` use `Syntactic grammar`, implement `alphabet` as `Tokens`,
//! `string` as `Statement`
//!
//! SharpPtr grammar. Rules are tried top to bottom, each one is picked by at
//! most three tokens of lookahead and never backtracked:
//!
//! ``` BNF
//! program       → ( NEWLINE | "::" | statement )* EOF ;
//! statement     → declaration | class | main | method | call | cast | assignment ;
//! declaration   → IDENTIFIER IDENTIFIER "=" value ;
//! class         → "class" IDENTIFIER ":" NEWLINE INDENT statement* ( DEDENT )? ( "::" )? ;
//! main          → "main" ":" NEWLINE? ( INDENT statement* ( DEDENT )? ( "::" )? | "::" ) ;
//! method        → "method" IDENTIFIER parameters? ":" NEWLINE? ( INDENT statement* DEDENT* "::" | "::" ) ;
//! parameters    → "(" ( IDENTIFIER IDENTIFIER? ( "," IDENTIFIER IDENTIFIER? )* )? ")" ;
//! call          → IDENTIFIER "->" IDENTIFIER "(" ( argument ( "," argument )* )? ")" ;
//! argument      → IDENTIFIER | NUMBER | STRING ;
//! cast          → IDENTIFIER "-?" IDENTIFIER ;
//! assignment    → IDENTIFIER "=" value ;
//! value         → NUMBER | IDENTIFIER ;
//! ```
//!
//! `class` and `main` blocks may end on indentation alone, a `method` block
//! has to be closed by `::`.
//!
//! Parsing and name binding happen in the same pass: every finished node goes
//! through the [`Binder`] before the parser moves on, so an assignment can
//! check that its variable was declared above it.

use std::collections::HashSet;

use TokenType::{
	Arrow, Assign, Class, Colon, Comma, Dedent, DoubleColon, Eof, Identifier, Indent, LeftParen, Main, Method, NewLine,
	Number, RightParen,
};
use anyhow::anyhow;

use crate::{
	ast::{ClassDefinition, MainDefinition, MethodCall, MethodDefinition, Node, Parameter, SafeCast, VariableAssignment},
	error::{
		parser::{ParseError, ParseErrorType, ParseErrorType::*, ParserError},
		registry::RegistryError,
	},
	registry::{Binder, Catalog, SymbolRegistry},
	scanner::{Token, TokenType},
};

/// Recursive descent parser for SharpPtr statements.
pub struct Parser<'c> {
	/// The tokens to parse, always terminated by `Eof` once validated.
	tokens:  Vec<Token>,
	current: usize,
	binder:  Binder<'c>,
	scope:   Scope,
}

/// Flat scope model: one function level, no nesting.
#[derive(Debug, Default)]
struct Scope {
	in_function: bool,
	/// Parameters and declarations of the current `main` or `method` body.
	locals:      HashSet<String>,
}

impl Scope {
	fn enter(&mut self, parameters: impl IntoIterator<Item = String>) {
		self.in_function = true;
		self.locals.clear();
		self.locals.extend(parameters);
	}

	fn leave(&mut self) { self.in_function = false; }

	fn declare(&mut self, name: &str) {
		if self.in_function {
			self.locals.insert(name.to_string());
		}
	}

	fn is_declared(&self, name: &str, registry: &SymbolRegistry) -> bool {
		registry.contains_variable(name) || (self.in_function && self.locals.contains(name))
	}
}

impl<'c> Parser<'c> {
	pub fn new(tokens: Vec<Token>, catalog: &'c mut Catalog) -> Self {
		Self { tokens, current: 0, binder: Binder::new(catalog), scope: Scope::default() }
	}

	/// Parse every top-level statement and hand back the per-run registry.
	#[tracing::instrument(level = "debug", skip_all)]
	pub fn parse_all(mut self) -> Result<(Vec<Node>, SymbolRegistry), ParserError> {
		if !self.tokens.last().is_some_and(|token| token.r#type == Eof) {
			return Err(anyhow!("Token stream is not terminated by Eof").into());
		}

		let mut nodes = Vec::new();
		loop {
			self.skip_newlines();
			let next = self.peek().r#type;
			match next {
				// A stray block terminator, the block it closed is already done.
				DoubleColon => {
					self.advance();
				}
				Eof => break,
				_ => {
					let node = self.statement()?;
					tracing::debug!(%node, "parsed statement");
					nodes.push(node);
				}
			}
		}

		let registry = self.binder.finish();
		tracing::debug!(nodes = nodes.len(), symbols = registry.len(), "parsed program");
		Ok((nodes, registry))
	}

	fn statement(&mut self) -> Result<Node, ParseError> {
		if self.check(Identifier) && self.check_ahead(1, Identifier) && self.check_ahead(2, Assign) {
			return self.declaration();
		}

		match (self.peek().r#type, self.peek_ahead(1)) {
			(Class, _) => self.class(),
			(Main, _) => self.main(),
			(Method, _) => self.method(),
			(Identifier, Arrow) => self.method_call(),
			(Identifier, TokenType::SafeCast) => self.safe_cast(),
			(Identifier, Assign) => self.assignment(),
			_ => Err(self.error(BrokenSyntax(self.peek().lexeme.clone()))),
		}
	}

	/// `int health = 100`
	fn declaration(&mut self) -> Result<Node, ParseError> {
		let r#type = self.consume(Identifier)?.lexeme;
		let name = self.consume(Identifier)?;
		self.consume(Assign)?;
		let value = self.value()?;

		self.scope.declare(&name.lexeme);
		let variable = VariableAssignment { name: name.lexeme, value, r#type: Some(r#type) };
		self.bind(Node::Variable(variable), name.line)
	}

	/// `health = 50`, only for names declared earlier.
	fn assignment(&mut self) -> Result<Node, ParseError> {
		let name = self.consume(Identifier)?;
		if !self.scope.is_declared(&name.lexeme, self.binder.registry()) {
			return Err(ParseError::new(name.line, UndeclaredVariable(name.lexeme)));
		}
		self.consume(Assign)?;
		let value = self.value()?;

		let variable = VariableAssignment { name: name.lexeme, value, r#type: None };
		self.bind(Node::Variable(variable), name.line)
	}

	fn value(&mut self) -> Result<String, ParseError> {
		if self.check(Number) { Ok(self.advance().lexeme) } else { Ok(self.consume(Identifier)?.lexeme) }
	}

	fn class(&mut self) -> Result<Node, ParseError> {
		let line = self.consume(Class)?.line;
		let name = self.consume(Identifier)?.lexeme;
		self.consume(Colon)?;
		self.consume(NewLine)?;
		self.consume(Indent)?;

		let body = self.block()?;
		self.close_block();
		self.bind(Node::Class(ClassDefinition { name, body }), line)
	}

	fn main(&mut self) -> Result<Node, ParseError> {
		let line = self.consume(Main)?.line;
		self.consume(Colon)?;
		if self.check(NewLine) {
			self.advance();
		}

		let body = if self.check(Indent) {
			self.advance();
			self.scope.enter(Vec::new());
			let body = self.block()?;
			self.close_block();
			self.scope.leave();
			body
		} else if self.check(DoubleColon) {
			self.advance();
			Vec::new()
		} else {
			return Err(self.error(ExpectedBlock("main")));
		};

		self.bind(Node::Main(MainDefinition { body }), line)
	}

	fn method(&mut self) -> Result<Node, ParseError> {
		let line = self.consume(Method)?.line;
		let name = self.consume(Identifier)?.lexeme;
		let parameters = if self.check(LeftParen) { self.parameters()? } else { Vec::new() };
		self.consume(Colon)?;
		if self.check(NewLine) {
			self.advance();
		}

		let body = if self.check(Indent) {
			self.advance();
			self.scope.enter(parameters.iter().map(|parameter| parameter.name.clone()));
			let body = self.method_body(&name)?;
			self.scope.leave();
			body
		} else if self.check(DoubleColon) {
			self.advance();
			Vec::new()
		} else {
			return Err(self.error(ExpectedBlock("method")));
		};

		self.bind(Node::Method(MethodDefinition { name, parameters, body }), line)
	}

	/// Statements of an indented `class` or `main` block.
	fn block(&mut self) -> Result<Vec<Node>, ParseError> {
		let mut body = Vec::new();
		loop {
			self.skip_newlines();
			if matches!(self.peek().r#type, Dedent | DoubleColon | Eof) {
				return Ok(body);
			}
			body.push(self.statement()?);
		}
	}

	/// Take the block's own `Dedent`, and the `::` if it comes right after.
	fn close_block(&mut self) {
		if self.check(Dedent) {
			self.advance();
		}
		if self.check(DoubleColon) {
			self.advance();
		}
	}

	/// Statements of a method block, which only `::` may end.
	fn method_body(&mut self, name: &str) -> Result<Vec<Node>, ParseError> {
		let mut body = Vec::new();
		loop {
			self.skip_newlines();
			let next = self.peek().r#type;
			match next {
				DoubleColon => {
					self.advance();
					return Ok(body);
				}
				Dedent if self.closed_by_double_colon() => {
					self.close_block();
					return Ok(body);
				}
				Dedent | Eof => return Err(self.error(UnclosedMethod(name.to_string()))),
				_ => body.push(self.statement()?),
			}
		}
	}

	/// Whether the run of dedents at the cursor was forced by a `::`.
	fn closed_by_double_colon(&self) -> bool {
		self.tokens[self.current..]
			.iter()
			.find(|token| token.r#type != Dedent)
			.is_some_and(|token| token.r#type == DoubleColon)
	}

	/// `(int amount, target)`
	fn parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
		self.consume(LeftParen)?;
		let mut parameters = Vec::new();
		while !self.check(RightParen) && !self.check(Eof) {
			if !self.check(Identifier) {
				return Err(self.error(ExpectedParameter));
			}
			let first = self.advance().lexeme;
			let parameter = if self.check(Identifier) {
				Parameter { name: self.advance().lexeme, r#type: Some(first) }
			} else {
				Parameter { name: first, r#type: None }
			};
			parameters.push(parameter);
			self.separator("parameter")?;
		}
		self.consume(RightParen)?;
		Ok(parameters)
	}

	/// `player->say("hi", 2)`
	fn method_call(&mut self) -> Result<Node, ParseError> {
		let receiver = self.consume(Identifier)?;
		self.consume(Arrow)?;
		let method = self.consume(Identifier)?.lexeme;
		if !self.check(LeftParen) {
			return Err(self.error(MissingArguments(method)));
		}
		let arguments = self.arguments()?;

		let call = MethodCall { receiver: receiver.lexeme, method, arguments };
		self.bind(Node::MethodCall(call), receiver.line)
	}

	fn arguments(&mut self) -> Result<Vec<String>, ParseError> {
		self.consume(LeftParen)?;
		let mut arguments = Vec::new();
		while !self.check(RightParen) && !self.check(Eof) {
			if !matches!(self.peek().r#type, Identifier | Number | TokenType::String) {
				return Err(self.error(ExpectedArgument));
			}
			arguments.push(self.advance().lexeme);
			self.separator("argument")?;
		}
		self.consume(RightParen)?;
		Ok(arguments)
	}

	fn separator(&mut self, list: &'static str) -> Result<(), ParseError> {
		if self.check(Comma) {
			self.advance();
			Ok(())
		} else if self.check(RightParen) {
			Ok(())
		} else {
			Err(self.error(ExpectedSeparator(list)))
		}
	}

	/// `health -? string`
	fn safe_cast(&mut self) -> Result<Node, ParseError> {
		let source = self.consume(Identifier)?;
		self.consume(TokenType::SafeCast)?;
		let target = self.consume(Identifier)?.lexeme;

		self.bind(Node::SafeCast(SafeCast { source: source.lexeme, target }), source.line)
	}

	fn bind(&mut self, node: Node, line: usize) -> Result<Node, ParseError> {
		match self.binder.bind(&node) {
			Ok(()) => Ok(node),
			Err(RegistryError::Duplicate(key)) => Err(ParseError::new(line, DuplicateDeclaration(key))),
		}
	}

	fn skip_newlines(&mut self) {
		while self.check(NewLine) {
			self.advance();
		}
	}

	/// Advance past the expected token or report what was found instead.
	fn consume(&mut self, expected: TokenType) -> Result<Token, ParseError> {
		if self.check(expected) {
			return Ok(self.advance());
		}
		Err(self.error(UnexpectedToken { expected, found: self.peek().r#type }))
	}

	/// Advance to the next token, `Eof` is never consumed.
	fn advance(&mut self) -> Token {
		let token = self.peek().clone();
		if token.r#type != Eof {
			self.current += 1;
		}
		token
	}

	fn check(&self, r#type: TokenType) -> bool { self.peek().r#type == r#type }

	fn check_ahead(&self, distance: usize, r#type: TokenType) -> bool { self.peek_ahead(distance) == r#type }

	/// Peek at the current token.
	fn peek(&self) -> &Token { &self.tokens[self.current.min(self.tokens.len() - 1)] }

	fn peek_ahead(&self, distance: usize) -> TokenType {
		self.tokens.get(self.current + distance).map_or(Eof, |token| token.r#type)
	}

	fn error(&self, r#type: ParseErrorType) -> ParseError { ParseError::new(self.peek().line, r#type) }
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::{registry::SymbolKind, scanner::Scanner};

	fn parse_with(input: &str, catalog: &mut Catalog) -> Result<(Vec<Node>, SymbolRegistry), ParserError> {
		let tokens = Scanner::new(input).scan_tokens().unwrap();
		Parser::new(tokens, catalog).parse_all()
	}

	fn parse(input: &str) -> (Vec<Node>, SymbolRegistry) { parse_with(input, &mut Catalog::new()).unwrap() }

	fn error(input: &str) -> ParseError {
		match parse_with(input, &mut Catalog::new()) {
			Err(ParserError::ParseError(e)) => e,
			other => panic!("expected parse error for {input:?}, got {other:?}"),
		}
	}

	fn rendered(nodes: &[Node]) -> Vec<String> { nodes.iter().flat_map(Node::walk).map(Node::to_string).collect() }

	fn typed(name: &str, value: &str, r#type: &str) -> Node {
		Node::Variable(VariableAssignment { name: name.into(), value: value.into(), r#type: Some(r#type.into()) })
	}

	#[test]
	fn parse_main_with_declaration() {
		let (nodes, registry) = parse("main:\n    int x = 5\n");
		assert_eq!(nodes, vec![Node::Main(MainDefinition { body: vec![typed("x", "5", "int")] })]);
		assert_eq!(registry.variable("x").map(|v| v.value.as_str()), Some("5"));
	}

	#[test]
	fn parse_top_level_statements() {
		let (nodes, _) = parse("int hp = 100\nstring name = bob\nhp = 50\nplayer->jump()\nhp -? string\n");
		assert_eq!(rendered(&nodes), vec!["int hp = 100", "string name = bob", "hp = 50", "player->jump()", "hp-?string"]);
	}

	#[test]
	fn parse_method_call_arguments() {
		let (nodes, registry) = parse("p->say(\"hi there\", 5, name)\np->wave()\n");
		assert_eq!(nodes[0], Node::MethodCall(MethodCall {
			receiver:  "p".into(),
			method:    "say".into(),
			arguments: vec!["hi there".into(), "5".into(), "name".into()],
		}));
		assert!(registry.call("p.say").is_some());
		assert!(registry.call("p.wave").is_some());
	}

	#[test]
	fn method_call_requires_parentheses() {
		let e = error("p->jump\n");
		assert_eq!(e.r#type, MissingArguments("jump".into()));
	}

	#[test]
	fn method_call_argument_errors() {
		assert_eq!(error("p->jump(->)").r#type, ExpectedArgument);
		assert_eq!(error("p->jump(1 2)").r#type, ExpectedSeparator("argument"));
		assert_eq!(error("p->jump(1,").r#type, UnexpectedToken { expected: RightParen, found: Eof });
	}

	#[test]
	fn undeclared_reassignment_fails() {
		let e = error("y = 1\n");
		assert_eq!(e, ParseError::new(1, UndeclaredVariable("y".into())));
		assert_eq!(e.to_string(), "line 1: Variable 'y' is not declared");
	}

	#[test]
	fn declared_reassignment_wins() {
		let (_, registry) = parse("int x = 1\nx = 2\n");
		assert_eq!(registry.variable("x").map(|v| v.value.as_str()), Some("2"));
	}

	#[test]
	fn redeclaration_is_allowed() {
		let (nodes, registry) = parse("int x = 1\nint x = 2\n");
		assert_eq!(nodes.len(), 2);
		assert_eq!(registry.variable("x").map(|v| v.value.as_str()), Some("2"));
	}

	#[test]
	fn duplicate_call_fails() {
		let e = error("p->jump()\np->jump(1)\n");
		assert_eq!(e, ParseError::new(2, DuplicateDeclaration("p.jump".into())));
	}

	#[test]
	fn duplicate_cast_fails() {
		let e = error("int x = 1\nx -? string\nx -? string\n");
		assert_eq!(e, ParseError::new(3, DuplicateDeclaration("x->string".into())));
	}

	#[test]
	fn parameters_are_local() {
		let (nodes, _) = parse("method hit(int amount, who):\n    amount = 5\n    who = me\n    ::\n");
		assert_eq!(rendered(&nodes), vec!["method hit(int amount, who) { 2 items }", "amount = 5", "who = me"]);
	}

	#[test]
	fn parameters_do_not_leak() {
		let e = error("method f(a):\n    int b = 1\n    ::\na = 2\n");
		assert_eq!(e, ParseError::new(4, UndeclaredVariable("a".into())));
	}

	#[test]
	fn parameter_errors() {
		assert_eq!(error("method f(1): ::").r#type, ExpectedParameter);
		assert_eq!(error("method f(a b c): ::").r#type, ExpectedSeparator("parameter"));
	}

	#[test]
	fn empty_method() {
		let (nodes, _) = parse("method f: ::\nmethod g:\n::\n");
		assert_eq!(rendered(&nodes), vec!["method f() { 0 items }", "method g() { 0 items }"]);
	}

	#[test]
	fn method_needs_double_colon() {
		let e = error("method foo:\n    int x = 1\nmain:\n    int y = 2\n");
		assert_eq!(e, ParseError::new(3, UnclosedMethod("foo".into())));
		assert_eq!(e.to_string(), "line 3: method 'foo' must be closed with '::'");

		let e = error("method foo:\n    int x = 1\n");
		assert_eq!(e.r#type, UnclosedMethod("foo".into()));
	}

	#[test]
	fn method_closed_on_body_line() {
		let (nodes, _) = parse("method foo:\n    int x = 1 ::\nint y = 2\n");
		assert_eq!(rendered(&nodes), vec!["method foo() { 1 items }", "int x = 1", "int y = 2"]);
	}

	#[test]
	fn class_closes_on_dedent() {
		let (nodes, _) = parse("class Player:\n    int hp = 100\n    int mp = 5\nmain:\n    hp = 1\n");
		assert_eq!(rendered(&nodes), vec![
			"class Player { 2 items }",
			"int hp = 100",
			"int mp = 5",
			"main { 1 items }",
			"hp = 1"
		]);
	}

	#[test]
	fn class_closes_on_double_colon() {
		let (nodes, _) = parse("class Player:\n    int hp = 100\n::\nint x = 1\n");
		assert_eq!(rendered(&nodes), vec!["class Player { 1 items }", "int hp = 100", "int x = 1"]);
	}

	#[test]
	fn class_with_method() {
		let source = "class Player:\n    int hp = 100\n    method hit(int amount):\n        hp = amount\n        ::\nmain:\n    Player->hit(5)\n";
		let (nodes, registry) = parse(source);
		assert_eq!(rendered(&nodes), vec![
			"class Player { 2 items }",
			"int hp = 100",
			"method hit(int amount) { 1 items }",
			"hp = amount",
			"main { 1 items }",
			"Player->hit(5)",
		]);
		assert!(registry.call("Player.hit").is_some());
	}

	#[test]
	fn class_requires_indented_body() {
		assert_eq!(error("class A:\nint x = 1\n").r#type, UnexpectedToken { expected: Indent, found: Identifier });
		let e = error("class A x");
		assert_eq!(e.to_string(), "line 1: expected Colon, got Identifier");
	}

	#[test]
	fn empty_main() {
		let (nodes, _) = parse("main: ::\n");
		assert_eq!(nodes, vec![Node::Main(MainDefinition { body: vec![] })]);
		let (nodes, _) = parse("main:\n::\n");
		assert_eq!(nodes, vec![Node::Main(MainDefinition { body: vec![] })]);
	}

	#[test]
	fn main_without_block() {
		assert_eq!(error("main: x").r#type, ExpectedBlock("main"));
	}

	#[test]
	fn main_closed_with_double_colon() {
		let (nodes, _) = parse("main:\n    int x = 5\n    x -? string\n    ::\n");
		assert_eq!(rendered(&nodes), vec!["main { 2 items }", "int x = 5", "x-?string"]);
	}

	#[test]
	fn blank_lines_inside_blocks() {
		let (nodes, _) = parse("\n\nmain:\n    int x = 5\n\n    x = 6\n\n");
		assert_eq!(rendered(&nodes), vec!["main { 2 items }", "int x = 5", "x = 6"]);
	}

	#[test]
	fn stray_double_colons_are_skipped() {
		let (nodes, _) = parse(":: ::\nint x = 1\n::\n");
		assert_eq!(rendered(&nodes), vec!["int x = 1"]);
	}

	#[test]
	fn broken_syntax() {
		assert_eq!(error("5\n"), ParseError::new(1, BrokenSyntax("5".into())));
		assert_eq!(error("\nx\n"), ParseError::new(2, BrokenSyntax("x".into())));
		assert_eq!(error("int x =").r#type, UnexpectedToken { expected: Identifier, found: Eof });
	}

	#[test]
	fn missing_eof_is_internal() {
		let mut catalog = Catalog::new();
		let result = Parser::new(vec![Token::new(Identifier, "x", 1)], &mut catalog).parse_all();
		assert!(matches!(result, Err(ParserError::InternalError(_))));
		let result = Parser::new(Vec::new(), &mut catalog).parse_all();
		assert!(matches!(result, Err(ParserError::InternalError(_))));
	}

	#[test]
	fn bindings_reach_catalog() {
		let mut catalog = Catalog::new();
		parse_with("class Player:\n    int hp = 1\nmain:\n    Player->hit(5)\nmethod hit: ::\n", &mut catalog).unwrap();
		assert_eq!(catalog.get("Player").map(|e| e.kind), Some(SymbolKind::Type));
		assert_eq!(catalog.get("main").map(|e| e.kind), Some(SymbolKind::Method));
		assert_eq!(catalog.get("hit").map(|e| e.description.as_str()), Some("user-defined function"));
		assert_eq!(catalog.get("Player.hit").map(|e| e.kind), Some(SymbolKind::Method));
		assert_eq!(catalog.get("hp").map(|e| e.kind), Some(SymbolKind::Variable));
	}

	#[test]
	fn catalog_accumulates_across_runs() {
		let mut catalog = Catalog::new();
		parse_with("int a = 1\n", &mut catalog).unwrap();
		let (_, registry) = parse_with("int b = 2\n", &mut catalog).unwrap();
		assert!(catalog.contains("a"));
		assert!(catalog.contains("b"));
		// The per-run table starts empty every time.
		assert!(!registry.contains_variable("a"));
	}
}
