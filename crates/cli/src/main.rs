//! Breeze command-line front end.
//!
//! Loads a definitions file, compiles it with the default plugin and prints
//! the initial state, reduced states, generated messages or action types.

mod cli;
mod commands;

use breeze_engine::BreezeConfig;
use clap::Parser;
use cli::Cli;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let output = commands::run(cli.command, BreezeConfig::default())?;
	print!("{output}");
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("breeze_engine=debug,breeze=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
