//! Error types for the session editor.

use std::path::PathBuf;

use thiserror::Error;
use tierline_edit::EditError;
use tierline_find::FindError;

/// Errors raised while loading editor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The file is not valid editor configuration.
	#[error("invalid configuration: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Errors raised by editor operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
	#[error(transparent)]
	Edit(#[from] EditError),
	#[error(transparent)]
	Find(#[from] FindError),
}

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
