use std::path::PathBuf;

use palc::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sharpptr", after_long_help = "Front-end for the SharpPtr toy language: tokens, symbols and safe casts.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Compile a source file and dump the catalog
	File { path: PathBuf },
	/// Read blocks from stdin, a blank line compiles
	Repl,
}
