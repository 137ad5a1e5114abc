//! Error and warning types for the catalog store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

/// Errors that occur while opening a store or loading a locale catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The store was asked to use a file format it cannot read.
    #[error("unsupported catalog format '{format}', expected json, yaml or yml")]
    UnsupportedFormat { format: String },

    /// File system error while creating, reading or writing catalog files.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A catalog file exists but could not be decoded.
    #[error("{path}:{line}:{column}: cannot parse catalog for locale '{locale}': {message}")]
    Parse {
        locale: String,
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// The operation needs a locale that has not been registered.
    #[error("locale '{locale}' is not registered")]
    NotRegistered { locale: String },

    /// A catalog could not be encoded while writing it back to disk.
    #[error("cannot write catalog for locale '{locale}' to '{path}': {message}")]
    Write {
        locale: String,
        path: PathBuf,
        message: String,
    },
}

impl LoadError {
    pub(crate) fn parse(locale: &str, path: PathBuf, error: ParseError) -> Self {
        let (line, column, message) = match error {
            ParseError::Syntax {
                line,
                column,
                message,
            } => (line, column, message),
            ParseError::UnexpectedEof { line, column } => {
                (line, column, "unexpected end of file".to_string())
            }
        };
        LoadError::Parse {
            locale: locale.to_string(),
            path,
            line,
            column,
            message,
        }
    }
}

/// An error that occurred while resolving a message.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The message path was not usable.
    #[error("invalid message path: {reason}")]
    InvalidArgument { reason: String },

    /// Neither the current nor the fallback locale has a message at this path.
    #[error("no message at '{path}'{}", did_you_mean(suggestions))]
    MessageNotFound {
        path: String,
        suggestions: Vec<String>,
    },

    /// The path names a group of messages rather than a single message.
    #[error("'{path}' in locale '{locale}' is a group of messages, not a message")]
    NotALeafMessage { path: String, locale: String },

    /// The message references a placeholder the caller did not supply.
    #[error("message '{path}' needs argument '{placeholder}'")]
    MissingInterpolationArgument { placeholder: String, path: String },

    /// The message text is not a valid template.
    #[error("message '{path}' is not a valid template: {source}")]
    InvalidTemplate {
        path: String,
        #[source]
        source: ParseError,
    },
}

/// Differences between two locale catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// The source locale has a message the target locale lacks or leaves empty.
    MissingMessage { path: String, locale: String },

    /// The target locale has a message the source locale does not know about.
    UnknownMessage { path: String, locale: String },

    /// One locale has a message where the other has a group, or vice versa.
    ShapeMismatch { path: String, locale: String },
}

impl CatalogWarning {
    pub fn path(&self) -> &str {
        match self {
            CatalogWarning::MissingMessage { path, .. }
            | CatalogWarning::UnknownMessage { path, .. }
            | CatalogWarning::ShapeMismatch { path, .. } => path,
        }
    }
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// Rank `available` keys by edit distance to `key` and keep the closest few.
///
/// Short keys only tolerate one edit; longer keys tolerate two. At most three
/// suggestions are returned, closest first and alphabetical among equals.
pub fn compute_suggestions(key: &str, available: &[String]) -> Vec<String> {
    let max_distance = if key.chars().count() <= 3 { 1 } else { 2 };

    let mut scored: Vec<(usize, &String)> = available
        .iter()
        .map(|candidate| (strsim::levenshtein(key, candidate), candidate))
        .filter(|&(distance, _)| distance <= max_distance)
        .collect();
    scored.sort();
    scored.dedup_by(|a, b| a.1 == b.1);

    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
