//! Catalog file decoding.

use serde::de::DeserializeSeed;
use serde_yaml::Deserializer as YamlDeserializer;

use super::error::ParseError;
use crate::types::{CatalogFormat, MessageTree, TreeSeed};

/// Decode the contents of a locale file into a message tree.
///
/// JSON files are read with `serde_json` and YAML files with `serde_yaml`.
/// YAML merge keys (`<<: *anchor`) are applied. A key repeated in one mapping
/// keeps its last value. A YAML document with no content is an empty catalog;
/// any other document whose root is not a mapping is rejected.
pub fn parse_catalog(content: &str, format: CatalogFormat) -> Result<MessageTree, ParseError> {
    let tree = if format.is_yaml() {
        if content.trim().is_empty() {
            return Ok(MessageTree::empty());
        }
        TreeSeed { merge_keys: true }
            .deserialize(YamlDeserializer::from_str(content))
            .map_err(yaml_error)?
    } else {
        serde_json::from_str::<MessageTree>(content).map_err(json_error)?
    };

    match tree {
        MessageTree::Node(_) => Ok(tree),
        // A bare `null` or `~` document.
        MessageTree::Leaf(text) if text.is_empty() => Ok(MessageTree::empty()),
        MessageTree::Leaf(_) => Err(ParseError::Syntax {
            line: 1,
            column: 1,
            message: "catalog root must be a mapping of messages".to_string(),
        }),
    }
}

fn json_error(e: serde_json::Error) -> ParseError {
    if e.is_eof() {
        ParseError::UnexpectedEof {
            line: e.line(),
            column: e.column(),
        }
    } else {
        ParseError::Syntax {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

fn yaml_error(e: serde_yaml::Error) -> ParseError {
    let (line, column) = e
        .location()
        .map(|location| (location.line(), location.column()))
        .unwrap_or((0, 0));
    ParseError::Syntax {
        line,
        column,
        message: e.to_string(),
    }
}
