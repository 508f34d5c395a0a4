use serde::Serialize;

use crate::ast::Span;

/// Append-only text sink.
///
/// Emitters only ever append; nothing in the core reads back what was
/// written.
pub trait Buffer {
    fn append(&mut self, fragment: &str);

    /// Called before a node with a span is rendered. Sinks that track source
    /// mappings record the current output position here.
    fn mark(&mut self, _span: &Span) {}
}

impl Buffer for String {
    fn append(&mut self, fragment: &str) {
        self.push_str(fragment);
    }
}

/// Generated position to source position mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub gen_line: usize,
    pub gen_col: usize,
    pub src_line: usize,
    pub src_col: usize,
}

/// Output buffer that accumulates generated code with mappings
pub struct Output {
    lines: Vec<String>,
    current_line: String,
    line_number: usize,
    mappings: Vec<Mapping>,
    track_mappings: bool,
}

impl Output {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current_line: String::new(),
            line_number: 0,
            mappings: Vec::new(),
            track_mappings: false,
        }
    }

    /// Output that records a [`Mapping`] for every spanned node.
    pub fn with_mappings() -> Self {
        Self {
            track_mappings: true,
            ..Self::new()
        }
    }

    /// Zero-based line the next fragment lands on
    pub fn line(&self) -> usize {
        self.line_number
    }

    /// Column (in characters) the next fragment lands on
    pub fn column(&self) -> usize {
        self.current_line.chars().count()
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Finish and return the generated code
    pub fn finish(mut self) -> (String, Vec<Mapping>) {
        if !self.current_line.is_empty() {
            self.lines.push(std::mem::take(&mut self.current_line));
        }

        let code = self.lines.concat();
        (code, self.mappings)
    }
}

impl Buffer for Output {
    fn append(&mut self, fragment: &str) {
        // Fragments may carry verbatim multi-line source; keep line tracking
        // exact by splitting on newlines.
        let mut rest = fragment;
        while let Some(i) = rest.find('\n') {
            self.current_line.push_str(&rest[..=i]);
            self.lines.push(std::mem::take(&mut self.current_line));
            self.line_number += 1;
            rest = &rest[i + 1..];
        }
        self.current_line.push_str(rest);
    }

    fn mark(&mut self, span: &Span) {
        if !self.track_mappings {
            return;
        }
        let src = span.start_position();
        self.mappings.push(Mapping {
            gen_line: self.line_number,
            gen_col: self.column(),
            src_line: src.line,
            src_col: src.col,
        });
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_string_buffer_appends_in_order() {
        let mut buf = String::new();
        buf.append("a");
        buf.append(", ");
        buf.append("b");
        assert_eq!(buf, "a, b");
    }

    #[test]
    fn test_output_tracks_lines() {
        let mut out = Output::new();
        out.append("foo = <<~EOS\n  text\nEOS");
        assert_eq!(out.line(), 2);
        assert_eq!(out.column(), 3);
        out.append("\n");
        let (code, mappings) = out.finish();
        assert_eq!(code, "foo = <<~EOS\n  text\nEOS\n");
        assert!(mappings.is_empty());
    }

    #[test]
    fn test_mark_records_mapping() {
        let source: Arc<str> = Arc::from("a\n  bb");
        let span = Span::new(source, 4, 6).unwrap();

        let mut out = Output::with_mappings();
        out.append("x = ");
        out.mark(&span);
        out.append("bb");

        let (code, mappings) = out.finish();
        assert_eq!(code, "x = bb");
        assert_eq!(
            mappings,
            vec![Mapping { gen_line: 0, gen_col: 4, src_line: 1, src_col: 2 }]
        );
    }

    #[test]
    fn test_mark_ignored_without_tracking() {
        let source: Arc<str> = Arc::from("abc");
        let mut out = Output::new();
        out.mark(&Span::full(source));
        assert!(out.mappings().is_empty());
    }
}
