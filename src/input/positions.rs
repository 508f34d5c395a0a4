//! Position conversion utilities.
//!
//! Spans are byte ranges. Diagnostics want line/column, and editors consuming
//! source mappings want UTF-16 offsets.

use crate::ast::Position;

/// Convert a byte offset to a line/column position.
///
/// The offset is clamped to the source length and moved back to the nearest
/// char boundary. Columns count characters, not bytes.
pub fn byte_to_position(source: &str, byte_offset: usize) -> Position {
    let mut byte = byte_offset.min(source.len());
    while !source.is_char_boundary(byte) {
        byte -= 1;
    }

    let before = &source[..byte];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = source[line_start..byte].chars().count();

    Position { byte, line, col }
}

/// Convert a byte offset to a UTF-16 offset.
pub fn byte_to_utf16(source: &str, byte_offset: usize) -> usize {
    let mut byte = byte_offset.min(source.len());
    while !source.is_char_boundary(byte) {
        byte -= 1;
    }
    source[..byte].encode_utf16().count()
}
