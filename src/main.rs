use palc::Parser;
use sharpptr::cli::*;

/// Log to stderr, only when `RUST_LOG` asks for it.
fn init_tracing() {
	use tracing_subscriber::{EnvFilter, fmt, prelude::*};

	if std::env::var("RUST_LOG").is_ok() {
		tracing_subscriber::registry()
			.with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
			.with(EnvFilter::from_default_env())
			.init();
	}
}

fn main() {
	init_tracing();
	let mut compiler = sharpptr::Compiler::new();

	match Cli::parse().mode {
		Mode::File { path } => {
			if let Err(e) = compiler.run_file(&path) {
				eprintln!("error: {e}");
				std::process::exit(1);
			}
		}
		Mode::Repl => compiler.run_prompt(),
	}
}
