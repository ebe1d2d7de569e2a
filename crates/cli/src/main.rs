//! `tierline`: render, search and export transcript sessions from the shell.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use tracing::info;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = commands::load_config(cli.config.as_deref())?;
	let output = match &cli.command {
		Command::Render { session } => commands::render(commands::load_session(session)?, config),
		Command::Find(args) => commands::find(&commands::load_session(&args.session)?, &config, args)?,
		Command::Tsv { session } => commands::tsv(&commands::load_session(session)?)?,
		Command::Check { session } => {
			let report = commands::check(&commands::load_session(session)?);
			if report.is_empty() {
				info!("all tiers valid");
			}
			report
		}
	};
	print!("{output}");
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("debug")
		} else {
			EnvFilter::new("info")
		}
	});
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
