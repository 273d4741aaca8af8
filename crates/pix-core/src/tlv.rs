//! TLV (Tag-Length-Value) framing
//!
//! Every BR Code field is `tag (2 digits) + length (2 digits) + value`.
//! Templates such as the merchant account block nest the same framing
//! inside a value.

use serde::{Deserialize, Serialize};

use crate::error::{PixError, Result};

/// Longest value a two-digit length prefix can describe
pub const MAX_VALUE_LEN: usize = 99;

/// A single decoded field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlvField {
    pub tag: String,
    pub value: String,
}

impl TlvField {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

fn is_tag(tag: &str) -> bool {
    tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_digit())
}

/// Format one field. Values over 99 characters are rejected, never cut.
pub fn format_field(tag: &str, value: &str) -> Result<String> {
    if !is_tag(tag) {
        return Err(PixError::InvalidTag(tag.to_string()));
    }

    let len = value.chars().count();
    if len > MAX_VALUE_LEN {
        return Err(PixError::FieldTooLong {
            tag: tag.to_string(),
            len,
        });
    }

    Ok(format!("{tag}{len:02}{value}"))
}

/// Read a run of fields until the input is exhausted.
pub fn parse_fields(input: &str) -> Result<Vec<TlvField>> {
    let chars: Vec<char> = input.chars().collect();
    let mut fields = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if i + 4 > chars.len() {
            return Err(PixError::Malformed(format!(
                "truncated field header at position {i}"
            )));
        }

        let tag: String = chars[i..i + 2].iter().collect();
        if !is_tag(&tag) {
            return Err(PixError::Malformed(format!(
                "non-numeric tag {tag:?} at position {i}"
            )));
        }

        let len_str: String = chars[i + 2..i + 4].iter().collect();
        let len: usize = len_str
            .parse()
            .ok()
            .filter(|_| len_str.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| {
                PixError::Malformed(format!("invalid length {len_str:?} for tag {tag}"))
            })?;

        let start = i + 4;
        let end = start + len;
        if end > chars.len() {
            return Err(PixError::Malformed(format!(
                "tag {tag} declares {len} characters but only {} remain",
                chars.len() - start
            )));
        }

        fields.push(TlvField {
            tag,
            value: chars[start..end].iter().collect(),
        });
        i = end;
    }

    Ok(fields)
}

/// First field carrying `tag`
pub fn find<'a>(fields: &'a [TlvField], tag: &str) -> Option<&'a TlvField> {
    fields.iter().find(|f| f.tag == tag)
}
