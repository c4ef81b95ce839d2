//! Converts Cypress test sources into Playwright test sources.
//!
//! ```
//! let output = cy2pw::convert("it('works', () => { cy.get('.a').click() })").unwrap();
//! assert!(output.contains("await page.locator('.a').click();"));
//! ```

pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod format;
pub mod parser;
pub mod transform;

pub use diagnostics::ConvertError;
pub use format::{FormatError, Formatter, Reprinter};

/// Import added to converted files that declare tests.
pub const PLAYWRIGHT_IMPORT: &str = "import { test, expect } from '@playwright/test';";

/// Converts `source` and formats the result with the default [`Reprinter`].
pub fn convert(source: &str) -> Result<String, ConvertError> {
    convert_with(source, &Reprinter::default())
}

/// Converts `source` and formats the result with `formatter`.
///
/// Only a source that fails to parse is an error. Formatting failures are
/// logged and the unformatted text is returned.
pub fn convert_with(source: &str, formatter: &dyn Formatter) -> Result<String, ConvertError> {
    let program = parser::parse(source).map_err(|errors| match errors.first() {
        Some(error) => ConvertError::from_parse_error(error, source),
        None => ConvertError {
            message: "Unknown parse failure".to_string(),
            line: 1,
            column: 1,
            span: 0..0,
        },
    })?;
    let program = transform::transform(program);
    let mut text = codegen::print(&program, &codegen::PrintOptions::default());
    if text.contains("test(") {
        text = format!("{PLAYWRIGHT_IMPORT}\n\n{text}");
    }
    Ok(format::format_or_keep(formatter, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl Formatter for Identity {
        fn format(&self, text: &str) -> Result<String, FormatError> {
            Ok(text.to_string())
        }
    }

    #[test]
    fn test_import_only_with_tests() {
        let output = convert("it('a', () => {\n  cy.visit('/');\n});").unwrap();
        assert!(output.starts_with("import { test, expect } from '@playwright/test';\n\ntest('a', async ({ page }) => {"));
        assert_eq!(convert("cy.visit('/');").unwrap(), "await page.goto('/');\n");
    }

    #[test]
    fn test_parse_error_location() {
        let error = convert("cy.get('.a')\n  .click(\n").unwrap_err();
        assert_eq!(error.line, 3);
    }

    #[test]
    fn test_formatter_is_used() {
        assert_eq!(convert_with("cy.reload()", &Identity).unwrap(), "await page.reload();\n");
    }
}
