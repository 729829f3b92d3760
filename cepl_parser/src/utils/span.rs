//! Source location tracking
//!
//! Every token carries a [`Span`] so diagnostics can point at the exact
//! line and column that broke the grammar.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text. Lines and columns are 1-based, the offset is a byte index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
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

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Position after consuming `ch`
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self::new(self.offset + 1, self.line + 1, 1)
        } else {
            Self::new(self.offset + ch.len_utf8(), self.line, self.column + 1)
        }
    }

    /// Position after consuming every character of `text`
    pub fn advance_str(self, text: &str) -> Self {
        text.chars().fold(self, Position::advance)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range `[start, end)` of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Zero-width span at `pos`, used for the end-of-input marker
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Self) -> Self {
        let start = if other.start.offset < self.start.offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.offset > self.end.offset {
            other.end
        } else {
            self.end
        };
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Span for synthesized nodes that have no source text of their own
    pub fn dummy() -> Self {
        Self::point(Position::start())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// A value paired with the source span it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Source text indexed by line for diagnostic snippets
#[derive(Debug, Clone)]
pub struct SourceMap {
    name: String,
    source: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .char_indices()
                    .filter(|(_, ch)| *ch == '\n')
                    .map(|(offset, _)| offset + 1),
            )
            .collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of a 1-based line without its terminator
    pub fn line(&self, line: u32) -> Option<&str> {
        let index = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        self.source
            .get(start..end)
            .map(|text| text.trim_end_matches('\r'))
    }

    /// Source text covered by `span`, empty if the span is out of range
    pub fn span_text(&self, span: &Span) -> &str {
        self.source
            .get(span.start.offset..span.end.offset)
            .unwrap_or("")
    }

    /// Render `message` with a cargo-style pointer at `span`
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut out = format!("error: {}\n", message);
        out.push_str(&format!("  --> {}:{}\n", self.name, span.start));

        if let Some(text) = self.line(span.start.line) {
            let gutter = span.start.line.to_string();
            let pad = " ".repeat(gutter.len());
            let width = if span.start.line == span.end.line {
                span.end.column.saturating_sub(span.start.column) as usize
            } else {
                text.chars().count() + 1 - span.start.column as usize
            };

            out.push_str(&format!("{} |\n", pad));
            out.push_str(&format!("{} | {}\n", gutter, text));
            out.push_str(&format!(
                "{} | {}{}\n",
                pad,
                " ".repeat(span.start.column.saturating_sub(1) as usize),
                "^".repeat(width.max(1))
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracks_lines() {
        let pos = Position::start().advance_str("r as x\n  s");
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 4);
        assert_eq!(pos.offset, 10);
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(Position::new(2, 1, 3), Position::new(4, 1, 5));
        let b = Span::new(Position::new(7, 1, 8), Position::new(9, 1, 10));
        let merged = b.merge(a);
        assert_eq!(merged.start.offset, 2);
        assert_eq!(merged.end.offset, 9);
        assert_eq!(merged.len(), 7);
    }

    #[test]
    fn test_source_map_lines() {
        let map = SourceMap::new("q.cepl", "H as h\r\n: T as t\n");
        assert_eq!(map.line(1), Some("H as h"));
        assert_eq!(map.line(2), Some(": T as t"));
        assert_eq!(map.line(3), Some(""));
        assert_eq!(map.line(0), None);
        assert_eq!(map.line(9), None);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("q.cepl", "H as h )");
        let span = Span::new(Position::new(7, 1, 8), Position::new(8, 1, 9));
        let rendered = map.format_error(&span, "unexpected token ')'");

        assert!(rendered.contains("--> q.cepl:1:8"));
        assert!(rendered.contains("1 | H as h )"));
        assert!(rendered.ends_with(&format!(" | {}^\n", " ".repeat(7))));
    }
}
