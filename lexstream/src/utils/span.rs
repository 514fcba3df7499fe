//! Source location tracking
//!
//! Tokens only carry a byte offset. These types turn that offset back into a
//! human-readable line and column when a diagnostic needs one.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number in characters (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Line-start index over a source text for offset → position lookup
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    /// Get the line and column for a byte offset in `source`.
    ///
    /// Offsets past the end clamp to the end of the source; offsets inside a
    /// multi-byte character count that character as already started.
    pub fn position_at(&self, source: &str, offset: usize) -> Position {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        let line_start = self.line_starts[line];
        let column = source[line_start..offset].chars().count();

        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    /// Get a line of text by line number (1-based)
    pub fn get_line<'a>(&self, source: &'a str, line_num: u32) -> Option<&'a str> {
        if line_num == 0 {
            return None;
        }

        let line_idx = (line_num - 1) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|next| next - 1)
            .unwrap_or(source.len());

        Some(source[start..end].trim_end_matches('\r'))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_lookup() {
        let source = "ab\ncd\n\nxyz";
        let map = SourceMap::new(source);

        assert_eq!(map.position_at(source, 0), Position::new(0, 1, 1));
        assert_eq!(map.position_at(source, 4), Position::new(4, 2, 2));
        assert_eq!(map.position_at(source, 7), Position::new(7, 4, 1));
        assert_eq!(map.line_count(), 4);
    }

    #[test]
    fn test_columns_count_characters() {
        let source = "é=1";
        let map = SourceMap::new(source);

        // 'é' is two bytes; '=' starts at byte 2 but is column 2
        assert_eq!(map.position_at(source, 2).column, 2);
    }

    #[test]
    fn test_get_line() {
        let source = "first\r\nsecond\nthird";
        let map = SourceMap::new(source);

        assert_eq!(map.get_line(source, 1), Some("first"));
        assert_eq!(map.get_line(source, 2), Some("second"));
        assert_eq!(map.get_line(source, 3), Some("third"));
        assert_eq!(map.get_line(source, 0), None);
        assert_eq!(map.get_line(source, 4), None);
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let source = "abc";
        let map = SourceMap::new(source);
        assert_eq!(map.position_at(source, 99), Position::new(3, 1, 4));
    }
}
