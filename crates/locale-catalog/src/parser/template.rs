//! Template string parser using winnow.
//!
//! Parses message templates into an AST. Handles:
//! - Literal text segments
//! - `{name}` placeholders, where a name is any non-empty text without
//!   `{`, `}`, `.`, `[`, `!` or `:`
//! - Escape sequences: {{ }}

use super::ast::*;
use super::error::ParseError;
use winnow::combinator::{alt, delimited, repeat};
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse a template string into an AST.
pub fn parse_template(input: &str) -> Result<Template, ParseError> {
    let mut remaining = input;
    match template(&mut remaining) {
        Ok(t) if remaining.is_empty() => Ok(t),
        Ok(_) => Err(stray_brace_error(input, remaining)),
        Err(e) => {
            let (line, column) = calculate_position(input, remaining);
            Err(ParseError::Syntax {
                line,
                column,
                message: format!("parse error: {e}"),
            })
        }
    }
}

/// Describe the brace that stopped the parser.
fn stray_brace_error(input: &str, remaining: &str) -> ParseError {
    if remaining.starts_with('{') && !remaining.contains('}') {
        let (line, column) = calculate_position(input, "");
        return ParseError::UnexpectedEof { line, column };
    }

    let (line, column) = calculate_position(input, remaining);
    let message = if remaining.starts_with('}') {
        "unmatched '}', use '}}' for a literal brace".to_string()
    } else {
        let body: String = remaining.chars().skip(1).take_while(|&c| c != '}').collect();
        format!(
            "invalid placeholder '{{{body}}}', names cannot be empty or contain '.', '[', '!' or ':'"
        )
    };
    ParseError::Syntax {
        line,
        column,
        message,
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let last_newline = consumed_str.rfind('\n');
    let column = match last_newline {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, column)
}

/// Parse a complete template into segments.
fn template(input: &mut &str) -> ModalResult<Template> {
    let segments: Vec<Segment> = repeat(0.., segment).parse_next(input)?;

    Ok(Template {
        segments: merge_literals(segments),
    })
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other @ Segment::Placeholder(_) => result.push(other),
        }
    }

    result
}

/// Parse a single segment (escape, placeholder, or literal run).
fn segment(input: &mut &str) -> ModalResult<Segment> {
    alt((escape_sequence, placeholder, literal_run)).parse_next(input)
}

/// Parse escape sequences: {{ -> {, }} -> }
fn escape_sequence(input: &mut &str) -> ModalResult<Segment> {
    alt((
        "{{".value(Segment::Literal("{".to_string())),
        "}}".value(Segment::Literal("}".to_string())),
    ))
    .parse_next(input)
}

/// Parse a run of text containing no braces.
fn literal_run(input: &mut &str) -> ModalResult<Segment> {
    take_while(1.., |c: char| c != '{' && c != '}')
        .map(|s: &str| Segment::Literal(s.to_string()))
        .parse_next(input)
}

/// Parse a placeholder: {name}
fn placeholder(input: &mut &str) -> ModalResult<Segment> {
    delimited('{', identifier, '}')
        .map(|name: &str| Segment::Placeholder(name.to_string()))
        .parse_next(input)
}

/// Parse a placeholder name: any text without braces, attribute or index
/// access (`.`, `[`), conversions (`!`) or format specs (`:`).
fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| !matches!(c, '{' | '}' | '.' | '[' | '!' | ':')).parse_next(input)
}
