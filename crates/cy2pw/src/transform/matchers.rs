//! Chai matcher strings and the Playwright assertions they become.
//!
//! Keys are dotted matcher strings without the `not.` prefix, including the
//! fused forms built from `invoke`, `location`, `title`, `hash` and `url`.

use crate::parser::{Expression, Literal, escape_for_regex};

/// Rewrites the assertion arguments, `None` when their shape is not supported.
pub type Transform = fn(&[Expression]) -> Option<Vec<Expression>>;

#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    pub target: &'static str,
    pub transform: Transform,
}

impl Matcher {
    const fn new(target: &'static str) -> Self {
        Self { target, transform: keep }
    }

    const fn with(target: &'static str, transform: Transform) -> Self {
        Self { target, transform }
    }

    pub fn arguments(&self, arguments: &[Expression]) -> Option<Vec<Expression>> {
        (self.transform)(arguments)
    }
}

/// Assertions on a locator subject.
pub fn locator_matcher(name: &str) -> Option<Matcher> {
    let matcher = match name {
        "be.visible" | "exist" => Matcher::new("toBeVisible"),
        "be.checked" => Matcher::new("toBeChecked"),
        "be.disabled" => Matcher::new("toBeDisabled"),
        "be.empty" => Matcher::new("toBeEmpty"),
        "be.enabled" => Matcher::new("toBeEnabled"),
        "be.hidden" => Matcher::new("toBeHidden"),
        "be.focused" | "have.focus" => Matcher::new("toBeFocused"),
        "contain" => Matcher::with("toHaveText", wrap_first),
        "contain.text" | "invoke.text.include" | "invoke.text.contain" => Matcher::new("toContainText"),
        "have.length" => Matcher::new("toHaveCount"),
        "have.text" | "invoke.text.match" | "invoke.text.eq" | "invoke.text.equal" => Matcher::new("toHaveText"),
        "have.value" => Matcher::new("toHaveValue"),
        "have.class" => Matcher::with("toHaveClass", wrap_first),
        "have.id" => Matcher::new("toHaveId"),
        "invoke.val.deep.equal" => Matcher::new("toHaveValues"),

        "invoke.attr.equal" | "have.attr.equal" => Matcher::new("toHaveAttribute"),
        "have.attr" => Matcher::with("toHaveAttribute", match_anything_second),
        "have.attr.include" => Matcher::with("toHaveAttribute", wrap_second),
        "have.attr.match" => Matcher::with("toHaveAttribute", first_two),

        "invoke.css.equal" | "have.css.equal" => Matcher::new("toHaveCSS"),
        "have.css" => Matcher::with("toHaveCSS", match_anything_second),
        "have.css.include" => Matcher::with("toHaveCSS", wrap_second),
        "have.css.match" => Matcher::with("toHaveCSS", first_two),

        "invoke.prop.equal" | "have.prop" | "have.prop.equal" => Matcher::new("toHaveJSProperty"),
        "have.prop.include" => Matcher::with("toHaveJSProperty", wrap_second),
        "have.prop.match" => Matcher::with("toHaveJSProperty", first_two),
        _ => return None,
    };
    Some(matcher)
}

/// Assertions on the page: URL, title and hash.
pub fn page_matcher(name: &str) -> Option<Matcher> {
    let matcher = match name {
        "url.eq" | "url.equal" | "url.match" => Matcher::new("toHaveURL"),
        "url.include" | "url.contain" => Matcher::with("toHaveURL", wrap_first),

        "title.eq" | "title.equal" | "title.match" => Matcher::new("toHaveTitle"),
        "title.include" | "title.contain" => Matcher::with("toHaveTitle", wrap_first),

        "hash.be.empty" => Matcher::with("toHaveURL", |_| Some(vec![Expression::regex("^[^#]*$", "")])),
        "hash.eq" | "hash.equal" => Matcher::with("toHaveURL", |arguments| {
            let hash = arguments.first()?.as_string()?;
            Some(vec![Expression::regex(format!("#{}$", escape_for_regex(hash)), "")])
        }),
        "hash.include" | "hash.contain" => Matcher::with("toHaveURL", |arguments| {
            let hash = arguments.first()?.as_string()?;
            Some(vec![Expression::regex(format!("#.*{}", escape_for_regex(hash)), "")])
        }),
        "hash.match" => Matcher::with("toHaveURL", |arguments| {
            let (pattern, flags) = regex_parts(arguments.first()?)?;
            Some(vec![Expression::regex(format!(".*#{}", unanchored(pattern)), flags)])
        }),

        "location.pathname.eq" | "location.pathname.equal" | "location.pathname.include" => {
            Matcher::with("toHaveURL", |arguments| {
                let path = arguments.first()?.as_string()?;
                let path = if path.starts_with('/') {
                    path.to_string()
                } else {
                    format!("/{path}")
                };
                Some(vec![Expression::regex(escape_for_regex(&path), "")])
            })
        }
        "location.pathname.match" => Matcher::with("toHaveURL", |arguments| {
            let (pattern, flags) = regex_parts(arguments.first()?)?;
            let pattern = match pattern.strip_prefix('^') {
                Some(anchored) if anchored.starts_with("\\/") => anchored.to_string(),
                Some(anchored) => format!("\\/{anchored}"),
                None => format!("\\/.*{pattern}"),
            };
            Some(vec![Expression::regex(pattern, flags)])
        }),
        _ => return None,
    };
    Some(matcher)
}

/// Assertions on plain values.
pub fn value_matcher(name: &str) -> Option<Matcher> {
    let matcher = match name {
        "be.gt" | "be.above" | "be.greaterThan" => Matcher::new("toBeGreaterThan"),
        "be.lt" | "be.below" | "be.lessThan" => Matcher::new("toBeLessThan"),
        "be.gte" | "be.at.least" => Matcher::new("toBeGreaterThanOrEqual"),
        "be.lte" | "be.at.most" => Matcher::new("toBeLessThanOrEqual"),
        "deep.equal" | "deep.eq" => Matcher::new("toEqual"),
        "eq" | "equal" => Matcher::new("toBe"),
        "include" | "contain" => Matcher::new("toContain"),
        "match" => Matcher::new("toMatch"),
        "have.length" => Matcher::new("toHaveLength"),
        _ => return None,
    };
    Some(matcher)
}

/// Regular expression matching `expression` as a substring, other
/// expressions are returned as they are.
pub fn wrap_string_with_regex(expression: &Expression) -> Expression {
    match expression {
        Expression::Literal(Literal::String(value)) => Expression::regex(escape_for_regex(value), ""),
        Expression::Literal(Literal::Number(raw)) => Expression::regex(escape_for_regex(raw), ""),
        expression => expression.clone(),
    }
}

fn keep(arguments: &[Expression]) -> Option<Vec<Expression>> {
    Some(arguments.to_vec())
}

fn wrap_first(arguments: &[Expression]) -> Option<Vec<Expression>> {
    Some(vec![wrap_string_with_regex(arguments.first()?)])
}

fn match_anything_second(arguments: &[Expression]) -> Option<Vec<Expression>> {
    match arguments {
        [name] => Some(vec![name.clone(), Expression::regex(".*", "")]),
        [name, value, ..] => Some(vec![name.clone(), value.clone()]),
        [] => None,
    }
}

fn wrap_second(arguments: &[Expression]) -> Option<Vec<Expression>> {
    match arguments {
        [name, value, ..] => Some(vec![name.clone(), wrap_string_with_regex(value)]),
        _ => None,
    }
}

fn first_two(arguments: &[Expression]) -> Option<Vec<Expression>> {
    match arguments {
        [name, value, ..] => Some(vec![name.clone(), value.clone()]),
        _ => None,
    }
}

fn regex_parts(expression: &Expression) -> Option<(&str, &str)> {
    match expression {
        Expression::Literal(Literal::Regex { pattern, flags }) => Some((pattern.as_str(), flags.as_str())),
        _ => None,
    }
}

/// Drops a leading `^`, otherwise allows anything in front of `pattern`.
fn unanchored(pattern: &str) -> String {
    match pattern.strip_prefix('^') {
        Some(pattern) => pattern.to_string(),
        None => format!(".*{pattern}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regex(pattern: &str) -> Expression {
        Expression::regex(pattern, "")
    }

    #[test]
    fn test_locator_matchers() {
        let matcher = locator_matcher("have.class").unwrap();
        assert_eq!(matcher.target, "toHaveClass");
        assert_eq!(matcher.arguments(&[Expression::string("a.b")]), Some(vec![regex(r"a\.b")]));

        let matcher = locator_matcher("have.attr").unwrap();
        assert_eq!(
            matcher.arguments(&[Expression::string("href")]),
            Some(vec![Expression::string("href"), regex(".*")])
        );
        assert_eq!(locator_matcher("have.attr.include").unwrap().arguments(&[]), None);
        assert!(locator_matcher("be.gt").is_none());
    }

    #[test]
    fn test_page_matchers() {
        let hash = page_matcher("hash.eq").unwrap();
        assert_eq!(hash.arguments(&[Expression::string("#/a")]), Some(vec![regex(r"##\/a$")]));
        assert_eq!(hash.arguments(&[Expression::identifier("dynamic")]), None);

        let pathname = page_matcher("location.pathname.include").unwrap();
        assert_eq!(
            pathname.arguments(&[Expression::string("/commands/navigation")]),
            Some(vec![regex(r"\/commands\/navigation")])
        );

        let matched = page_matcher("hash.match").unwrap();
        assert_eq!(matched.arguments(&[regex("^#users")]), Some(vec![regex(".*##users")]));
        assert_eq!(matched.arguments(&[regex("users")]), Some(vec![regex(".*#.*users")]));
    }

    #[test]
    fn test_wrap_string_with_regex() {
        assert_eq!(wrap_string_with_regex(&Expression::number(42)), regex("42"));
        assert_eq!(wrap_string_with_regex(&Expression::identifier("x")), Expression::identifier("x"));
        assert_eq!(value_matcher("be.at.least").unwrap().target, "toBeGreaterThanOrEqual");
    }
}
