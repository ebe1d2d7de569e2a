//! Subcommand implementations. Each returns the text to print.

use std::path::Path;

use anyhow::{Context, bail};
use tierline_editor::{EditorConfig, SessionEditor};
use tierline_find::{FindExpr, FindManager, SearchType};
use tierline_model::{RecordTransfer, Session, TranscriptElement};
use tracing::{debug, warn};

use crate::cli::FindArgs;

/// Reads a JSON session file.
pub fn load_session(path: &Path) -> anyhow::Result<Session> {
	let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	let session: Session =
		serde_json::from_str(&text).with_context(|| format!("parsing session {}", path.display()))?;
	debug!(
		path = %path.display(),
		elements = session.transcript().len(),
		"session loaded"
	);
	Ok(session)
}

/// Reads the editor configuration, or the defaults without a path.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
	match path {
		Some(path) => Ok(EditorConfig::load(path)?),
		None => Ok(EditorConfig::default()),
	}
}

pub fn render(session: Session, config: EditorConfig) -> String {
	SessionEditor::new(session, config).document().text()
}

pub fn find(session: &Session, config: &EditorConfig, args: &FindArgs) -> anyhow::Result<String> {
	let search_type = if args.regex {
		SearchType::Regex
	} else if args.phonex {
		SearchType::Phonex
	} else {
		SearchType::Plain
	};
	let expr = FindExpr::new(args.pattern.as_str(), search_type)
		.case_sensitive(args.case_sensitive || config.find.case_sensitive);
	let mut filter = config.find_filter();
	filter.tiers.clone_from(&args.tiers);

	let mut manager = FindManager::new(expr, filter);
	let mut out = String::new();
	let count = match manager.search(session) {
		Ok(results) => {
			for result in results {
				out.push_str(&format!("{}\t{}\n", result.range, result.text));
			}
			results.len()
		}
		Err(err) => bail!("invalid search expression: {err}"),
	};
	for diagnostic in manager.diagnostics() {
		warn!(tier = %diagnostic.tier, error = %diagnostic.error, "tier skipped");
	}
	debug!(count, "search finished");
	Ok(out)
}

pub fn tsv(session: &Session) -> anyhow::Result<String> {
	let indices: Vec<usize> = session.transcript().records().map(|(i, _)| i).collect();
	Ok(RecordTransfer::from_session(session, &indices)?.to_tsv())
}

/// One line per tier value stored unvalidated: location, error and raw text.
pub fn check(session: &Session) -> String {
	let mut out = String::new();
	for (index, element) in session.transcript().elements().iter().enumerate() {
		let TranscriptElement::Record(record) = element else {
			continue;
		};
		for tier in record.tiers() {
			if let Some(error) = tier.content().parse_error() {
				out.push_str(&format!("{index}.{}\t{error}\t{}\n", tier.name(), tier.text()));
			}
		}
	}
	out
}
