use crate::codegen::{PrintOptions, print};
use crate::diagnostics::ConvertError;
use crate::parser::parse;
use std::fmt;

/// Final layout pass over generated test files.
pub trait Formatter {
    fn format(&self, text: &str) -> Result<String, FormatError>;
}

/// Formats by parsing the text again and printing it with `options`.
///
/// Failing to parse means the generated text is not valid source, so it
/// doubles as a check of the output.
#[derive(Debug, Clone, Default)]
pub struct Reprinter {
    pub options: PrintOptions,
}

impl Reprinter {
    pub fn new(options: PrintOptions) -> Self {
        Self { options }
    }
}

impl Formatter for Reprinter {
    fn format(&self, text: &str) -> Result<String, FormatError> {
        let program = parse(text).map_err(|errors| match errors.first() {
            Some(error) => FormatError::Syntax(ConvertError::from_parse_error(error, text)),
            None => FormatError::Other("Unknown parse failure".to_string()),
        })?;
        Ok(print(&program, &self.options))
    }
}

#[derive(Debug)]
pub enum FormatError {
    Syntax(ConvertError),
    Other(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Syntax(error) => write!(f, "Generated code does not parse at {error}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Formats `text`, falling back to the unformatted text when formatting fails.
pub fn format_or_keep(formatter: &dyn Formatter, text: String) -> String {
    match formatter.format(&text) {
        Ok(formatted) => formatted,
        Err(error) => {
            log::warn!("Formatting failed, keeping unformatted output: {error}");
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Formatter for Broken {
        fn format(&self, _text: &str) -> Result<String, FormatError> {
            Err(FormatError::Other("broken".to_string()))
        }
    }

    #[test]
    fn test_reprinter_normalizes_layout() {
        let formatter = Reprinter::default();
        assert_eq!(formatter.format("foo( 1,2 )").unwrap(), "foo(1, 2);\n");
    }

    #[test]
    fn test_reprinter_rejects_invalid_code() {
        let error = Reprinter::default().format("foo(").unwrap_err();
        assert!(matches!(error, FormatError::Syntax(_)));
    }

    #[test]
    fn test_failure_keeps_text() {
        assert_eq!(format_or_keep(&Broken, "a ( )".to_string()), "a ( )");
    }
}
