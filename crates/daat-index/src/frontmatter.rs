//! Leading YAML front-matter block.
//!
//! A document carries front-matter when its first line is exactly `---`.
//! The block ends at the next line that is exactly `---` (trailing
//! whitespace and `\r` ignored). Everything after the closing line is the
//! body. Documents without an opening delimiter are all body.

use serde_json::Value;

use crate::error::{IndexError, Result};

/// Front-matter fields as a JSON object.
pub type Metadata = serde_json::Map<String, Value>;

const DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub metadata: Metadata,
    pub body: String,
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Split `input` into front-matter metadata and body text.
///
/// # Errors
///
/// Returns [`IndexError::FrontMatter`] if the block is unclosed, is not valid
/// YAML, or is not a mapping.
pub fn split_front_matter(input: &str) -> Result<ParsedDocument> {
    let text = input.strip_prefix('\u{feff}').unwrap_or(input);

    let (first_line, rest) = text.split_once('\n').unwrap_or((text, ""));
    if !is_delimiter(first_line) {
        return Ok(ParsedDocument {
            metadata: Metadata::new(),
            body: text.to_owned(),
        });
    }

    let mut offset = 0;
    let mut close = None;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line) {
            close = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }
    let Some((yaml_end, body_start)) = close else {
        return Err(IndexError::FrontMatter("unclosed frontmatter".into()));
    };

    let metadata = parse_metadata(&rest[..yaml_end])?;
    Ok(ParsedDocument {
        metadata,
        body: rest[body_start..].to_owned(),
    })
}

fn parse_metadata(yaml: &str) -> Result<Metadata> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }
    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| IndexError::FrontMatter(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Metadata::new()),
        other => Err(IndexError::FrontMatter(format!(
            "frontmatter must be a mapping, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
