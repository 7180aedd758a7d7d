use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "breeze")]
#[command(about = "Compile action definitions and run messages through them")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the initial root state
	Init {
		/// Definitions file (`.toml` or JSON)
		#[arg(value_name = "DEFS")]
		definitions: PathBuf,
	},
	/// Fold a JSON array of messages through the root reducer
	Dispatch {
		/// Definitions file (`.toml` or JSON)
		#[arg(value_name = "DEFS")]
		definitions: PathBuf,

		/// JSON file holding an array of messages
		#[arg(value_name = "MESSAGES")]
		messages: PathBuf,

		/// Print the state after every message instead of only the final one
		#[arg(long)]
		trace: bool,
	},
	/// Print the message an action creator produces
	Action {
		/// Definitions file (`.toml` or JSON)
		#[arg(value_name = "DEFS")]
		definitions: PathBuf,

		/// Action name as declared in the definitions
		name: String,

		/// Creator parameters as a JSON value
		#[arg(long, value_name = "JSON")]
		params: Option<String>,
	},
	/// List every action with its message type
	Types {
		/// Definitions file (`.toml` or JSON)
		#[arg(value_name = "DEFS")]
		definitions: PathBuf,
	},
}
