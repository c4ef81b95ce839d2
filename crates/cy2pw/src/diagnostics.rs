use crate::parser::{ParseError, Span};
use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use serde::Serialize;
use std::fmt;

/// A conversion failure located in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertError {
    pub message: String,
    /// 1-based
    pub line: usize,
    /// 1-based, counted in characters
    pub column: usize,
    #[serde(skip)]
    pub span: std::ops::Range<usize>,
}

impl ConvertError {
    pub fn from_parse_error<T: fmt::Display>(error: &ParseError<'_, T>, source: &str) -> Self {
        let span: Span = *error.span();
        let (line, column) = line_and_column(source, span.start);
        Self {
            // Only the first line, expected-token lists can get long
            message: error.to_string().lines().next().unwrap_or_default().to_string(),
            line,
            column,
            span: span.into_range(),
        }
    }

    /// Renders the error with the offending source line, without colors.
    pub fn report(&self, filename: &str, source: &str) -> String {
        let mut bytes = Vec::new();
        let written = Report::build(ReportKind::Error, (filename, self.span.clone()))
            .with_config(
                Config::default()
                    .with_color(false)
                    .with_index_type(IndexType::Byte),
            )
            .with_message(&self.message)
            .with_label(Label::new((filename, self.span.clone())).with_message(&self.message))
            .finish()
            .write((filename, Source::from(source)), &mut bytes);
        match written {
            Ok(()) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => format!("{filename}:{self}"),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ConvertError {}

/// 1-based line and column of the byte `offset` in `source`.
pub fn line_and_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_line_and_column() {
        assert_eq!(line_and_column("abc", 0), (1, 1));
        assert_eq!(line_and_column("abc\ndef", 5), (2, 2));
        assert_eq!(line_and_column("a\n", 2), (2, 1));
    }

    #[test]
    fn test_parse_error_location() {
        let source = "cy.get('.a')\n  .click(\n";
        let errors = parse(source).unwrap_err();
        let error = ConvertError::from_parse_error(&errors[0], source);
        assert_eq!(error.line, 3);
        assert_eq!(error.column, 1);
        assert!(error.message.contains("end of input"));
    }

    #[test]
    fn test_report_mentions_file() {
        let source = "foo(\n  bar baz)";
        let errors = parse(source).unwrap_err();
        let error = ConvertError::from_parse_error(&errors[0], source);
        assert_eq!((error.line, error.column), (2, 7));
        let report = error.report("broken.cy.js", source);
        assert!(report.contains("broken.cy.js"));
        assert!(report.contains("bar baz"));
    }
}
