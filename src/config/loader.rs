//! Reading rule files from disk or memory.
//!
//! Loading always checks the file's structure. The `*_for_grammar` variants
//! also resolve every rule against a grammar vocabulary, so a misspelled
//! start rule, a bad path query, or a malformed pattern is reported when the
//! file is loaded rather than when the first tree is scanned.

use crate::config::schema::{ScanConfig, ValidationError};
use crate::grammar::Vocabulary;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read rule config from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse rule config TOML{}: {source}", origin(.path))]
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },

    #[error("invalid rule config{}: {source}", origin(.path))]
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

pub fn load_from_str(input: &str) -> Result<ScanConfig, ConfigError> {
    parse(input, None, None)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<ScanConfig, ConfigError> {
    let path = path.as_ref();
    parse(&read(path)?, Some(path), None)
}

/// [`load_from_str`], then resolve each rule against `vocabulary`.
pub fn load_str_for_grammar(
    input: &str,
    vocabulary: &dyn Vocabulary,
) -> Result<ScanConfig, ConfigError> {
    parse(input, None, Some(vocabulary))
}

/// [`load_from_path`], then resolve each rule against `vocabulary`.
pub fn load_for_grammar(
    path: impl AsRef<Path>,
    vocabulary: &dyn Vocabulary,
) -> Result<ScanConfig, ConfigError> {
    let path = path.as_ref();
    parse(&read(path)?, Some(path), Some(vocabulary))
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse(
    input: &str,
    path: Option<&Path>,
    vocabulary: Option<&dyn Vocabulary>,
) -> Result<ScanConfig, ConfigError> {
    let path = path.map(Path::to_path_buf);
    let config: ScanConfig = toml_edit::de::from_str(input).map_err(|source| ConfigError::Toml {
        path: path.clone(),
        source,
    })?;

    let mut issues = match config.validate() {
        Ok(()) => Vec::new(),
        Err(err) => err.issues,
    };
    // Grammar checks assume well-formed delimiters.
    if issues.is_empty() {
        if let Some(vocabulary) = vocabulary {
            issues.extend(config.grammar_issues(vocabulary));
        }
    }
    if !issues.is_empty() {
        return Err(ConfigError::Validation {
            path,
            source: ValidationError { issues },
        });
    }

    debug!(rules = config.rules.len(), name = %config.meta.name, "loaded rule config");
    Ok(config)
}
