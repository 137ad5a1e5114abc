//! Placeholder substitution for resolved messages.

use std::collections::HashMap;

use crate::parser::{Segment, Template, parse_template};
use crate::store::LookupError;
use crate::types::Value;

/// Parse `text` as a template and substitute every placeholder from `args`.
///
/// `path` is only used to label errors. Arguments that no placeholder refers
/// to are ignored.
///
/// # Errors
///
/// Returns an error if:
/// - `text` has an unmatched brace or a malformed placeholder
/// - a placeholder names an argument that is not in `args`
pub fn interpolate(
    path: &str,
    text: &str,
    args: &HashMap<String, Value>,
) -> Result<String, LookupError> {
    let template = parse_template(text).map_err(|source| LookupError::InvalidTemplate {
        path: path.to_string(),
        source,
    })?;
    render(path, &template, args)
}

/// Render an already parsed template.
pub fn render(
    path: &str,
    template: &Template,
    args: &HashMap<String, Value>,
) -> Result<String, LookupError> {
    let mut output = String::new();
    for segment in &template.segments {
        match segment {
            Segment::Literal(s) => output.push_str(s),
            Segment::Placeholder(name) => {
                let value = args
                    .get(name)
                    .ok_or_else(|| LookupError::MissingInterpolationArgument {
                        placeholder: name.clone(),
                        path: path.to_string(),
                    })?;
                output.push_str(&value.to_string());
            }
        }
    }
    Ok(output)
}
