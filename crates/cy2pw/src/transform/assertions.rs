//! BDD `expect(...)` chains and the Playwright assertions they become.

use super::Context;
use super::matchers::{locator_matcher, page_matcher, value_matcher};
use super::subject::{FIXME_PREFIX, Mapped, Subject, SubjectKind};
use crate::parser::Expression;

/// Chai words that only make the sentence read well.
const FILLER_WORDS: [&str; 7] = ["that", "which", "is", "does", "still", "also", "but"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assertion {
    Expect,
    Property,
    BeA,
    BeEmpty,
    BeFalse,
    BeNull,
    BeOneOf,
    BeTrue,
    BeUndefined,
    DeepEqual,
    Eq,
    Equal,
    Exist,
    HaveLength,
    HaveProperty,
    HaveText,
    Contain,
    Include,
    IncludeKeys,
    Match,
}

impl Assertion {
    fn from_name(name: &str) -> Option<Self> {
        let assertion = match name {
            "expect" => Self::Expect,
            "property" => Self::Property,
            "a" | "an" | "be_a" | "be_an" => Self::BeA,
            "empty" | "be_empty" => Self::BeEmpty,
            "false" | "be_false" => Self::BeFalse,
            "null" | "be_null" => Self::BeNull,
            "oneOf" | "be_oneOf" => Self::BeOneOf,
            "true" | "ok" | "be_true" | "be_ok" => Self::BeTrue,
            "undefined" | "be_undefined" => Self::BeUndefined,
            "eql" | "deep_eq" | "deep_equal" | "deep_equals" | "be_deep_equal" => Self::DeepEqual,
            "eq" => Self::Eq,
            "equal" | "equals" | "be_equal" => Self::Equal,
            "exist" | "exists" => Self::Exist,
            "length" | "have_length" | "lengthOf" | "have_lengthOf" => Self::HaveLength,
            "have_property" | "have_own_property" => Self::HaveProperty,
            "have_text" => Self::HaveText,
            "contain" | "contains" | "to_contain" => Self::Contain,
            "include" | "includes" | "to_include" => Self::Include,
            "include_keys" | "contain_keys" | "have_keys" | "have_all_keys" | "include_all_keys" => Self::IncludeKeys,
            "match" | "matches" => Self::Match,
            _ => return None,
        };
        Some(assertion)
    }
}

/// Drops `not` and filler words from a joined assertion name, returning
/// whether the assertion is negated and the remaining name.
fn split_negation(name: &str) -> (bool, String) {
    let mut is_not = false;
    let mut words = Vec::new();
    for word in name.split('_') {
        if word == "not" {
            is_not = !is_not;
        } else if !FILLER_WORDS.contains(&word) {
            words.push(word);
        }
    }
    (is_not, words.join("_"))
}

/// Translates one step of an `expect(...)` chain.
pub fn translate(subject: Subject, arguments: Vec<Expression>, context: &mut Context<'_>) -> Mapped {
    let (is_not, name) = split_negation(context.method);
    let assertion = match Assertion::from_name(&name) {
        // `.property('a')` written in the chain asserts the property exists
        Some(Assertion::Property) if context.property_name.is_none() => Assertion::HaveProperty,
        Some(assertion) => assertion,
        None => return fallback(subject, &name, arguments, is_not),
    };
    let is_locator = subject.kind == SubjectKind::Locator;
    let assert_that = |subject: Subject, method: &str, arguments: Vec<Expression>| {
        let expression = if is_locator {
            subject.expect_async(method, arguments, is_not)
        } else {
            subject.expect_sync(method, arguments, is_not)
        };
        Mapped::expression(subject, expression)
    };
    match assertion {
        Assertion::Expect => expect(arguments, context),
        Assertion::Property => match context.property_name {
            Some(name) => Mapped::subject(subject.property(name)),
            None => placeholder(subject, "property", arguments, is_not),
        },
        Assertion::BeA => match arguments.first().and_then(Expression::as_string) {
            Some(type_name) => {
                let any = Expression::method_call(
                    Expression::identifier("expect"),
                    "any",
                    vec![Expression::identifier(capitalize(type_name))],
                );
                assert_that(subject, "toEqual", vec![any])
            }
            None => placeholder(subject, "toBeA", arguments, is_not),
        },
        Assertion::BeEmpty if is_locator => assert_that(subject, "toBeEmpty", Vec::new()),
        Assertion::BeEmpty => assert_that(subject, "toHaveLength", vec![Expression::number(0)]),
        Assertion::BeFalse => assert_that(subject, "toBeFalsy", Vec::new()),
        Assertion::BeNull => assert_that(subject, "toBeNull", Vec::new()),
        Assertion::BeOneOf => match arguments.into_iter().next() {
            Some(candidates) => {
                let contains = Subject::new(SubjectKind::Value, candidates).expect_sync(
                    "toContain",
                    vec![subject.expression.clone()],
                    is_not,
                );
                Mapped::expression(subject, contains)
            }
            None => placeholder(subject, "oneOf", Vec::new(), is_not),
        },
        Assertion::BeTrue => assert_that(subject, "toBeTruthy", Vec::new()),
        Assertion::BeUndefined => assert_that(subject, "toBeUndefined", Vec::new()),
        Assertion::DeepEqual => assert_that(subject, "toEqual", arguments),
        Assertion::Eq if is_locator => match arguments.as_slice() {
            [index] => Mapped::subject(subject.chain("nth", vec![index.clone()], SubjectKind::Locator)),
            _ => placeholder(subject, "eq", arguments, is_not),
        },
        Assertion::Eq | Assertion::Equal => assert_that(subject, "toBe", arguments),
        Assertion::Exist if is_locator => assert_that(subject, "toBeVisible", Vec::new()),
        Assertion::Exist => assert_that(subject, "toBeDefined", Vec::new()),
        Assertion::HaveLength if is_locator => assert_that(subject, "toHaveCount", arguments),
        Assertion::HaveLength => assert_that(subject, "toHaveLength", arguments),
        Assertion::HaveProperty if subject.kind == SubjectKind::Response => {
            match arguments.first().and_then(Expression::as_string) {
                Some(name) => {
                    let expected = arguments.get(1).cloned();
                    response_property(&subject, name, expected, is_not, context.is_last)
                }
                None => placeholder(subject, "toHaveProperty", arguments, is_not),
            }
        }
        Assertion::HaveProperty => match arguments.first().and_then(Expression::as_string) {
            Some(name) => {
                let value = subject.member(name, SubjectKind::Value);
                let has_property = subject.expect_sync("toHaveProperty", arguments, is_not);
                Mapped::expression(value, has_property)
            }
            None => placeholder(subject, "toHaveProperty", arguments, is_not),
        },
        Assertion::HaveText if is_locator => assert_that(subject, "toHaveText", arguments),
        Assertion::HaveText => assert_that(subject, "toBe", arguments),
        Assertion::Contain if is_locator => assert_that(subject, "toHaveText", arguments),
        Assertion::Include if is_locator => assert_that(subject, "toContainText", arguments),
        Assertion::Contain | Assertion::Include => assert_that(subject, "toContain", arguments),
        Assertion::IncludeKeys => {
            let keys = match arguments.as_slice() {
                [keys @ Expression::Array(_)] => keys.clone(),
                keys => Expression::Array(keys.iter().cloned().map(Some).collect()),
            };
            let contains_keys = Expression::method_call(Expression::identifier("expect"), "arrayContaining", vec![keys]);
            let object_keys = Expression::method_call(
                Expression::identifier("Object"),
                "keys",
                vec![subject.expression.clone()],
            );
            let assertion = Subject::new(SubjectKind::Value, object_keys).expect_sync(
                "toEqual",
                vec![contains_keys],
                is_not,
            );
            Mapped::expression(subject, assertion)
        }
        Assertion::Match if is_locator => assert_that(subject, "toHaveText", arguments),
        Assertion::Match => assert_that(subject, "toMatch", arguments),
    }
}

/// The subject of `expect(value)`: the scope subject when `value` names it,
/// a locator when it is derived from a locator scope, a plain value otherwise.
fn expect(arguments: Vec<Expression>, context: &Context<'_>) -> Mapped {
    let value = arguments.into_iter().next().unwrap_or_else(|| Expression::identifier("undefined"));
    if let (Some(name), Some(scope)) = (value.as_identifier(), &context.state.scope)
        && scope.is_identifier(name)
    {
        return Mapped::subject(scope.clone());
    }
    let kind = if context.state.is_locator_scope_expression(&value) {
        SubjectKind::Locator
    } else {
        SubjectKind::Value
    };
    Mapped::subject(Subject::new(kind, value))
}

/// A response field read as a Playwright value. A field followed by more
/// assertions is only navigated to.
pub fn response_property(subject: &Subject, name: &str, expected: Option<Expression>, is_not: bool, is_last: bool) -> Mapped {
    let value = subject.property(name);
    let assertion = match expected {
        Some(expected) => value.expect_sync("toBe", vec![expected], is_not),
        None if is_last => subject.expect_sync("toHaveProperty", vec![Expression::string(name)], is_not),
        None => return Mapped::subject(value),
    };
    Mapped::expression(value, assertion)
}

/// Playwright matchers pass through, Chai matchers are looked up in the
/// matcher tables, anything else becomes a placeholder assertion.
fn fallback(subject: Subject, name: &str, arguments: Vec<Expression>, is_not: bool) -> Mapped {
    let is_locator = subject.kind == SubjectKind::Locator;
    if let Some(rest) = name.strip_prefix("to")
        && rest.starts_with(|c: char| c.is_ascii_uppercase())
        && !name.contains('_')
    {
        let expression = if is_locator || subject.kind == SubjectKind::Page {
            subject.expect_async(name, arguments, is_not)
        } else {
            subject.expect_sync(name, arguments, is_not)
        };
        return Mapped::expression(subject, expression);
    }

    let dotted = name.replace('_', ".");
    let web_matcher = match subject.kind {
        SubjectKind::Locator => locator_matcher(&dotted),
        SubjectKind::Page => page_matcher(&dotted),
        _ => None,
    };
    if let Some(matcher) = web_matcher {
        return match matcher.arguments(&arguments) {
            Some(matcher_arguments) => {
                let expression = subject.expect_async(matcher.target, matcher_arguments, is_not);
                Mapped::expression(subject, expression)
            }
            None => placeholder(subject, name, arguments, is_not),
        };
    }
    let value = value_matcher(&dotted).or_else(|| value_matcher(&format!("be.{dotted}")));
    match value.and_then(|matcher| Some((matcher.target, matcher.arguments(&arguments)?))) {
        Some((target, matcher_arguments)) => {
            let expression = subject.expect_sync(target, matcher_arguments, is_not);
            Mapped::expression(subject, expression)
        }
        None => placeholder(subject, name, arguments, is_not),
    }
}

/// `await expect(subject)[.not].FIXME_name(arguments)`
fn placeholder(subject: Subject, name: &str, arguments: Vec<Expression>, is_not: bool) -> Mapped {
    log::warn!("No translation for assertion '{name}', emitting a placeholder");
    let expression = subject.expect_async(&format!("{FIXME_PREFIX}{name}"), arguments, is_not);
    Mapped::expression(subject, expression)
}

/// `string` -> `String`, the constructor `expect.any` checks against.
fn capitalize(type_name: &str) -> String {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{PrintOptions, print};
    use crate::parser::parse;
    use crate::transform::transform;

    fn rewrite(code: &str) -> String {
        print(&transform(parse(code).unwrap()), &PrintOptions::default())
    }

    #[test]
    fn test_split_negation() {
        assert_eq!(split_negation("not_have_property"), (true, "have_property".to_string()));
        assert_eq!(split_negation("not_not_be_true"), (false, "be_true".to_string()));
        assert_eq!(split_negation("that_equals"), (false, "equals".to_string()));
    }

    #[test]
    fn test_value_assertions() {
        assert_eq!(rewrite("expect(x).to.be.true;"), "expect(x).toBeTruthy();\n");
        assert_eq!(rewrite("expect(x).to.equal(1);"), "expect(x).toBe(1);\n");
        assert_eq!(rewrite("expect(x).to.deep.equal({ a: 1 });"), "expect(x).toEqual({ a: 1 });\n");
        assert_eq!(rewrite("expect(x).to.be.a('string');"), "expect(x).toEqual(expect.any(String));\n");
        assert_eq!(rewrite("expect(x).to.be.oneOf([1, 2]);"), "expect([1, 2]).toContain(x);\n");
        assert_eq!(rewrite("expect(x).to.be.empty;"), "expect(x).toHaveLength(0);\n");
        assert_eq!(
            rewrite("expect(x).to.be.gt(1).and.lt(5);"),
            "expect(x).toBeGreaterThan(1);\nexpect(x).toBeLessThan(5);\n"
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(rewrite("expect(x).to.not.equal(1);"), "expect(x).not.toBe(1);\n");
        assert_eq!(rewrite("expect(x).not.to.include('a');"), "expect(x).not.toContain('a');\n");
    }

    #[test]
    fn test_properties() {
        assert_eq!(
            rewrite("expect(a.b).to.not.have.property('c');"),
            "expect(a.b).not.toHaveProperty('c');\n"
        );
        assert_eq!(
            rewrite("expect(user).to.have.property('name').that.equals('Ada');"),
            "expect(user).toHaveProperty('name');\nexpect(user.name).toBe('Ada');\n"
        );
        assert_eq!(rewrite("expect(user).to.have.property('id', 3);"), "expect(user).toHaveProperty('id', 3);\n");
        assert_eq!(
            rewrite("expect(list).to.include.keys('a', 'b');"),
            "expect(Object.keys(list)).toEqual(expect.arrayContaining(['a', 'b']));\n"
        );
    }

    #[test]
    fn test_scoped_subjects() {
        assert_eq!(
            rewrite("cy.get('.a').then(($el) => {\n  expect($el).to.have.class('x');\n});"),
            "const $el = page.locator('.a');\nawait expect($el).toHaveClass(/x/);\n"
        );
        assert_eq!(
            rewrite("cy.request('/a').then((response) => {\n  expect(response.status).to.eq(200);\n  expect(response.body).to.have.length(3);\n});"),
            "const response = await page.request.get('/a');\nexpect(response.status()).toBe(200);\nexpect(await response.json()).toHaveLength(3);\n"
        );
    }

    #[test]
    fn test_element_text() {
        assert_eq!(
            rewrite("cy.get('li').then(($lis) => {\n  expect($lis.eq(0), 'first item').to.contain('Walk the dog');\n  expect($lis).to.include('cat');\n});"),
            "const $lis = page.locator('li');\nawait expect($lis.nth(0)).toHaveText('Walk the dog');\nawait expect($lis).toContainText('cat');\n"
        );
    }

    #[test]
    fn test_response_properties() {
        assert_eq!(
            rewrite("cy.request('/c').then((response) => {\n  expect(response).property('status').to.equal(200);\n});"),
            "const response = await page.request.get('/c');\nexpect(response.status()).toBe(200);\n"
        );
        assert_eq!(
            rewrite("cy.request('/c').then((response) => {\n  expect(response).to.have.property('status', 201);\n  expect(response).to.have.property('body');\n});"),
            "const response = await page.request.get('/c');\nexpect(response.status()).toBe(201);\nexpect(response).toHaveProperty('body');\n"
        );
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(rewrite("expect(x).toBe(1);"), "expect(x).toBe(1);\n");
        assert_eq!(rewrite("expect(x).to.weird(1);"), "await expect(x).FIXME_weird(1);\n");
        assert_eq!(rewrite("expect(x).to.not.be.weird;"), "await expect(x).not.FIXME_be_weird();\n");
    }
}
