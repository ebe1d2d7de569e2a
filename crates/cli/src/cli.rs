use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tierline")]
#[command(about = "Inspect and search tiered transcript sessions")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Editor configuration file (TOML)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the session as a linear document
	Render {
		/// Session file (JSON)
		session: PathBuf,
	},
	/// Search the session and print every match
	Find(FindArgs),
	/// Export all records as tab separated text
	Tsv {
		/// Session file (JSON)
		session: PathBuf,
	},
	/// List tier values that failed to parse
	Check {
		/// Session file (JSON)
		session: PathBuf,
	},
}

#[derive(Args, Debug)]
pub struct FindArgs {
	/// Session file (JSON)
	pub session: PathBuf,

	/// Search expression
	pub pattern: String,

	/// Treat the expression as a regular expression
	#[arg(long, conflicts_with = "phonex")]
	pub regex: bool,

	/// Treat the expression as a phonetic pattern (IPA tiers only)
	#[arg(long)]
	pub phonex: bool,

	/// Restrict the search to a tier; repeatable
	#[arg(long = "tier", short = 't', value_name = "NAME")]
	pub tiers: Vec<String>,

	/// Match case exactly
	#[arg(long)]
	pub case_sensitive: bool,
}
