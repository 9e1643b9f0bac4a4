//! Serializer
//!
//! Converts between a document and its persisted bytes. Each paragraph
//! boundary is one newline byte; wrap points between lines are never written.
//! Nothing is added or stripped at the end of the stream, so a trailing
//! newline survives as a final empty paragraph.

use std::io::{Read, Write};

use gapline_core::Result;
use tracing::debug;

use crate::document::Document;

/// Byte that separates paragraphs in a persisted file
pub const PARAGRAPH_DELIMITER: u8 = b'\n';

/// Build a document from a byte slice
pub fn from_bytes(bytes: &[u8], capacity: usize) -> Result<Document> {
    let mut document = Document::new(capacity)?;
    let mut paragraph = document.first_paragraph();
    let mut line = document.first_line();

    for &byte in bytes {
        if byte == PARAGRAPH_DELIMITER {
            paragraph = document.push_paragraph()?;
            line = document.paragraph_first_line(paragraph);
            continue;
        }
        document.line_mut(line).insert(byte);
        // A paragraph never ends on a full line, so open the next wrap
        // segment as soon as this one fills.
        if document.line(line).is_full() {
            line = document.append_line(paragraph)?;
        }
    }

    debug!(
        bytes = bytes.len(),
        paragraphs = document.paragraph_count(),
        lines = document.line_count(),
        "loaded document"
    );
    Ok(document)
}

/// Build a document from a byte stream
pub fn load<R: Read>(mut reader: R, capacity: usize) -> Result<Document> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_bytes(&bytes, capacity)
}

/// Serialize a document into its persisted bytes
pub fn to_bytes(document: &Document) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(document.byte_count() + document.paragraph_count());
    for (index, paragraph) in document.paragraphs().enumerate() {
        if index > 0 {
            bytes.push(PARAGRAPH_DELIMITER);
        }
        for line in document.paragraph_lines(paragraph) {
            bytes.extend(document.line(line).bytes());
        }
    }
    bytes
}

/// Write a document's persisted bytes to a stream
pub fn save<W: Write>(document: &Document, mut writer: W) -> Result<()> {
    writer.write_all(&to_bytes(document))?;
    writer.flush()?;
    Ok(())
}
