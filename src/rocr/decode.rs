use encoding_rs::{Encoding, UTF_8};
use roxmltree::{Document, ParsingOptions};
use std::borrow::Cow;

use crate::error::{RatingError, Result};

const DECLARATION_LIMIT: usize = 1024;

/// Encoding named by the `encoding` pseudo-attribute of an XML declaration.
///
/// The declaration must be readable as ASCII, so a UTF-16 label found there
/// is taken to mean UTF-8. Unknown labels are ignored.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(DECLARATION_LIMIT)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let end = head.windows(2).position(|w| w == b"?>")?;
    let declaration = std::str::from_utf8(&head[..end]).ok()?;

    let rest = declaration[declaration.find("encoding")? + "encoding".len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = &rest[1..];
    let label = &label[..label.find(quote)?];

    Encoding::for_label(label.as_bytes()).map(Encoding::output_encoding)
}

/// Decode an archive entry to text.
///
/// A UTF-8 or UTF-16 byte-order mark selects the encoding; failing that,
/// the XML declaration's `encoding`; failing that, UTF-8. Malformed
/// sequences are an error, never replaced.
pub fn decode_entry(entry: &str, bytes: &[u8]) -> Result<String> {
    let (encoding, bom_len) = Encoding::for_bom(bytes)
        .unwrap_or_else(|| (declared_encoding(bytes).unwrap_or(UTF_8), 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(Cow::into_owned)
        .ok_or_else(|| RatingError::EntryDecode {
            entry: entry.to_string(),
            encoding: encoding.name(),
        })
}

/// Parse decoded entry text into an XML tree.
pub fn parse_entry<'input>(entry: &str, text: &'input str) -> Result<Document<'input>> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Document::parse_with_options(text, options).map_err(|source| RatingError::Xml {
        entry: entry.to_string(),
        source,
    })
}
