//! Editor configuration.
//!
//! Configuration is a TOML file; every key is optional.
//!
//! ```toml
//! chat_tier_names = true
//! show_syllabification = true
//! undo_limit = 200
//!
//! [find]
//! case_sensitive = false
//! include_gems = false
//! ```

use std::path::Path;

use serde::Deserialize;
use tierline_document::{DocumentOptions, FormatOptions};
use tierline_edit::DEFAULT_UNDO_LIMIT;
use tierline_find::{FindExpr, FindFilter};

use crate::error::ConfigError;

/// Settings of a [`SessionEditor`](crate::SessionEditor).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
	/// Label lines `*CHI:` / `%xpho:` instead of by tier name.
	pub chat_tier_names: bool,
	/// Render only the current record and its neighbouring comments and gems.
	pub single_record_view: bool,
	pub show_syllabification: bool,
	pub show_alignment: bool,
	/// Undo groups kept; zero keeps all.
	pub undo_limit: usize,
	/// Collect a diagnostic whenever tier text is committed unvalidated.
	pub report_validation_errors: bool,
	pub find: FindConfig,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			chat_tier_names: false,
			single_record_view: false,
			show_syllabification: false,
			show_alignment: false,
			undo_limit: DEFAULT_UNDO_LIMIT,
			report_validation_errors: false,
			find: FindConfig::default(),
		}
	}
}

/// Default find settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FindConfig {
	pub case_sensitive: bool,
	pub include_comments: bool,
	pub include_gems: bool,
}

impl Default for FindConfig {
	fn default() -> Self {
		Self {
			case_sensitive: false,
			include_comments: true,
			include_gems: true,
		}
	}
}

impl EditorConfig {
	/// Parses configuration from TOML text.
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml(&text)
	}

	/// Document options implied by this configuration.
	pub fn document_options(&self) -> DocumentOptions {
		DocumentOptions {
			format: FormatOptions {
				chat_tier_names: self.chat_tier_names,
			},
			single_record_view: self.single_record_view,
			report_validation_errors: self.report_validation_errors,
			..DocumentOptions::default()
		}
	}

	/// Find filter with the configured comment and gem inclusion.
	pub fn find_filter(&self) -> FindFilter {
		FindFilter {
			include_comments: self.find.include_comments,
			include_gems: self.find.include_gems,
			..FindFilter::default()
		}
	}

	/// An empty plain expression with the configured case sensitivity.
	pub fn find_expr(&self) -> FindExpr {
		FindExpr::plain("").case_sensitive(self.find.case_sensitive)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_file_gives_defaults() {
		assert_eq!(EditorConfig::from_toml("").unwrap(), EditorConfig::default());
		assert_eq!(EditorConfig::default().undo_limit, 100);
		assert!(EditorConfig::default().find.include_comments);
	}

	#[test]
	fn partial_tables_keep_remaining_defaults() {
		let config = EditorConfig::from_toml(
			"chat_tier_names = true\nundo_limit = 5\n\n[find]\ninclude_gems = false\n",
		)
		.unwrap();
		assert!(config.chat_tier_names);
		assert_eq!(config.undo_limit, 5);
		assert!(!config.find.include_gems);
		assert!(config.find.include_comments);
		assert!(config.document_options().format.chat_tier_names);
		assert!(config.document_options().live_updates);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(matches!(
			EditorConfig::from_toml("show_everything = true"),
			Err(ConfigError::Parse(_))
		));
		assert!(matches!(
			EditorConfig::from_toml("[find]\nwhole_words = true"),
			Err(ConfigError::Parse(_))
		));
	}

	#[test]
	fn load_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "show_alignment = true").unwrap();
		let config = EditorConfig::load(file.path()).unwrap();
		assert!(config.show_alignment);
	}

	#[test]
	fn load_reports_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing.toml");
		let Err(ConfigError::Io { path: reported, .. }) = EditorConfig::load(&path) else {
			panic!("expected an I/O error");
		};
		assert_eq!(reported, path);
	}
}
