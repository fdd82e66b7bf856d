use std::{
	fmt::Display,
	fs::read_to_string,
	io::{BufRead, Write},
	path::Path,
};

use anyhow::Context;

use crate::{
	SharpPtrError,
	ast::{Node, SafeCast},
	evaluator::evaluate_safe_cast,
	parser::Parser,
	registry::{Catalog, SymbolRegistry},
	scanner::{Scanner, Token},
};

/// Compiler drives the SharpPtr front-end and keeps the catalog alive between
/// runs.
#[derive(Debug, Default)]
pub struct Compiler {
	catalog: Catalog,
}

/// Everything a single run produced.
#[derive(Debug)]
pub struct Report {
	pub tokens:   Vec<Token>,
	pub nodes:    Vec<Node>,
	pub registry: SymbolRegistry,
	/// Every cast in the tree, in source order, with its result.
	pub casts:    Vec<(SafeCast, String)>,
}

impl Display for Report {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "=== tokens ===")?;
		for token in &self.tokens {
			writeln!(f, "{token}")?;
		}
		writeln!(f, "\n=== nodes ===")?;
		for node in &self.nodes {
			writeln!(f, "{node}")?;
		}
		if !self.casts.is_empty() {
			writeln!(f, "\n=== casts ===")?;
			for (cast, value) in &self.casts {
				writeln!(f, "{cast} => {value}")?;
			}
		}
		write!(f, "\n=== local registry ===\n{}", self.registry)
	}
}

impl Compiler {
	pub fn new() -> Self { Self::default() }

	pub fn catalog(&self) -> &Catalog { &self.catalog }

	/// Compile a source file and print what came out of it.
	pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SharpPtrError> {
		let source = read_to_string(path).context("Failed open source file")?;
		let report = self.run(&source)?;
		println!("{report}");
		println!("=== catalog ===\n{}", self.catalog);
		Ok(())
	}

	/// Run the REPL prompt. A blank line compiles everything typed since the
	/// last one.
	pub fn run_prompt(&mut self) {
		let stdin = std::io::stdin();
		let mut lines = stdin.lock();
		let mut block = String::new();
		let mut input = String::new();
		loop {
			input.clear();
			print!("{}", if block.is_empty() { "> " } else { ". " });
			if let Err(e) = std::io::stdout().flush() {
				eprintln!("Failed flush: {e}");
			}
			match lines.read_line(&mut input) {
				Ok(0) => {
					println!("\nExited sharpptr repl");
					break;
				}
				Ok(_) => {}
				Err(e) => {
					eprintln!("Failed read line: {e}");
					continue;
				}
			}

			let line = input.trim_end_matches(['\n', '\r']);
			if !line.trim().is_empty() {
				block.push_str(line);
				block.push('\n');
				continue;
			}
			if block.is_empty() {
				continue;
			}
			match self.run(&block) {
				Ok(report) => println!("{report}"),
				Err(e) => eprintln!("error: {e}"),
			}
			block.clear();
		}
	}

	/// Tokenize, parse and evaluate every safe cast in `source`.
	///
	/// The catalog keeps whatever was bound before an error stopped the run.
	#[tracing::instrument(level = "debug", skip_all)]
	pub fn run(&mut self, source: &str) -> Result<Report, SharpPtrError> {
		let tokens = Scanner::new(source).scan_tokens()?;
		tracing::debug!(tokens = tokens.len(), "scanned");
		let (nodes, registry) = Parser::new(tokens.clone(), &mut self.catalog).parse_all()?;
		tracing::debug!(nodes = nodes.len(), symbols = registry.len(), "parsed");

		let mut casts = Vec::new();
		for node in nodes.iter().flat_map(Node::walk) {
			if let Node::SafeCast(cast) = node {
				let value = evaluate_safe_cast(cast, &registry)?;
				casts.push((cast.clone(), value));
			}
		}

		Ok(Report { tokens, nodes, registry, casts })
	}
}
