//! Diagnostics extracted from rendering collaborator failures.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::ops::Range;

// `file.dot:8:12: syntax error`
static FILE_LINE_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":(\d+):(\d+):").expect("valid regex"));
// `syntax error in line 5 near 'digraph'`
static IN_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bin line (\d+)").expect("valid regex"));
// `line 15: unexpected end of file`
static LINE_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bline (\d+):").expect("valid regex"));

/// A validation failure reported by the rendering collaborator.
///
/// Line and column are 1-based and only present when the message carried them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl Diagnostic {
    /// Builds a diagnostic from raw collaborator output, extracting the position
    /// when the message follows one of the Graphviz error formats.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();

        if let Some(caps) = FILE_LINE_COLUMN.captures(&message) {
            return Self {
                line: caps[1].parse().ok(),
                column: caps[2].parse().ok(),
                message,
            };
        }

        let line = IN_LINE
            .captures(&message)
            .or_else(|| LINE_COLON.captures(&message))
            .and_then(|caps| caps[1].parse().ok());

        Self {
            message,
            line,
            column: None,
        }
    }

    /// Maps this diagnostic onto a byte range of `text`.
    ///
    /// The line is clamped into the document. With a column the range starts at
    /// that column and runs to the end of the line; without a line number the
    /// first line is marked.
    pub fn span_in(&self, text: &str) -> Range<usize> {
        let lines = line_ranges(text);

        let Some(line) = self.line.filter(|line| *line > 0) else {
            return lines[0].clone();
        };

        let index = line.min(lines.len()) - 1;
        let range = lines[index].clone();

        match self.column.filter(|column| *column > 0) {
            Some(column) => {
                let line_text = &text[range.clone()];
                let offset = line_text
                    .char_indices()
                    .nth(column - 1)
                    .map(|(offset, _)| offset)
                    .unwrap_or(line_text.len());
                (range.start + offset)..range.end
            }
            None => range,
        }
    }

    /// Resolves this diagnostic against the document it was produced for.
    pub fn resolve(&self, text: &str) -> LintDiagnostic {
        let span = self.span_in(text);
        LintDiagnostic {
            from: span.start,
            to: span.end,
            severity: Severity::Error,
            message: self.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic positioned in a concrete document, ready for an editor gutter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintDiagnostic {
    pub from: usize,
    pub to: usize,
    pub severity: Severity,
    pub message: String,
}

/// Byte ranges of every line in `text`, newline excluded. Never empty.
fn line_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (offset, ch) in text.char_indices() {
        if ch == '\n' {
            let end = if text[start..offset].ends_with('\r') {
                offset - 1
            } else {
                offset
            };
            ranges.push(start..end);
            start = offset + 1;
        }
    }
    ranges.push(start..text.len());
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_in_line_format() {
        let diagnostic = Diagnostic::from_message("Error: <stdin>: syntax error in line 5");
        assert_eq!(diagnostic.message, "Error: <stdin>: syntax error in line 5");
        assert_eq!(diagnostic.line, Some(5));
        assert_eq!(diagnostic.column, None);
    }

    #[test]
    fn parses_in_line_near_token_format() {
        let diagnostic =
            Diagnostic::from_message("Error: <stdin>: syntax error in line 3 near 'digraph'");
        assert_eq!(diagnostic.line, Some(3));
    }

    #[test]
    fn parses_in_line_with_position_suffix() {
        let diagnostic =
            Diagnostic::from_message("Error: unexpected token in line 7 at position 12");
        assert_eq!(diagnostic.line, Some(7));
        assert_eq!(diagnostic.column, None);
    }

    #[test]
    fn parses_line_colon_format() {
        let diagnostic = Diagnostic::from_message("line 15: unexpected end of file");
        assert_eq!(diagnostic.line, Some(15));
    }

    #[test]
    fn parses_file_line_column_format() {
        let diagnostic = Diagnostic::from_message("file.dot:8:12: syntax error");
        assert_eq!(diagnostic.line, Some(8));
        assert_eq!(diagnostic.column, Some(12));
    }

    #[test]
    fn parses_uppercase_in_line() {
        let diagnostic = Diagnostic::from_message("ERROR: SYNTAX ERROR IN LINE 4");
        assert_eq!(diagnostic.line, Some(4));
    }

    #[test]
    fn message_without_position_keeps_text_only() {
        let diagnostic = Diagnostic::from_message("GraphViz internal error");
        assert_eq!(diagnostic.message, "GraphViz internal error");
        assert_eq!(diagnostic.line, None);
        assert_eq!(diagnostic.column, None);
    }

    #[test]
    fn span_marks_whole_line() {
        let text = "digraph {\n  a -> ;\n}";
        let diagnostic = Diagnostic::from_message("syntax error in line 2");
        assert_eq!(&text[diagnostic.span_in(text)], "  a -> ;");
    }

    #[test]
    fn span_narrows_from_column() {
        let text = "digraph {\n  a -> ;\n}";
        let diagnostic = Diagnostic::from_message("x.dot:2:6: syntax error");
        assert_eq!(&text[diagnostic.span_in(text)], "> ;");
    }

    #[test]
    fn span_clamps_line_past_end() {
        let text = "graph {\n}";
        let diagnostic = Diagnostic::from_message("syntax error in line 40");
        assert_eq!(&text[diagnostic.span_in(text)], "}");
    }

    #[test]
    fn span_without_line_marks_first_line() {
        let text = "graph {\r\n a -- b\r\n}";
        let diagnostic = Diagnostic::from_message("Unknown error occurred");
        let resolved = diagnostic.resolve(text);
        assert_eq!((resolved.from, resolved.to), (0, 7));
        assert_eq!(resolved.severity, Severity::Error);
    }

    #[test]
    fn column_past_line_end_clamps_to_end() {
        let text = "ab\ncd";
        let diagnostic = Diagnostic::from_message("f:1:99: oops");
        assert_eq!(diagnostic.span_in(text), 2..2);
    }
}
