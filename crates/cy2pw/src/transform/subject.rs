use crate::parser::{Expression, Statement};

/// What the next command in a chain acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    Page,
    Locator,
    Window,
    Url,
    String,
    Request,
    Response,
    Value,
    Keyboard,
    Mouse,
    Void,
}

impl SubjectKind {
    /// Subjects that translate to Playwright objects with auto-waiting methods.
    pub fn is_dom(self) -> bool {
        matches!(self, Self::Page | Self::Locator)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub kind: SubjectKind,
    pub expression: Expression,
}

impl Subject {
    pub fn new(kind: SubjectKind, expression: Expression) -> Self {
        Self { kind, expression }
    }

    pub fn page() -> Self {
        Self::new(SubjectKind::Page, Expression::identifier("page"))
    }

    pub fn void() -> Self {
        Self::new(SubjectKind::Void, Expression::identifier("undefined"))
    }

    /// `subject.method(arguments)` as the next subject.
    pub fn chain(&self, method: &str, arguments: Vec<Expression>, kind: SubjectKind) -> Self {
        Self::new(kind, self.call_sync(method, arguments))
    }

    /// `await subject.method(arguments)` as the next subject.
    pub fn chain_async(&self, method: &str, arguments: Vec<Expression>, kind: SubjectKind) -> Self {
        Self::new(kind, self.call_async(method, arguments))
    }

    /// `subject.a.b` for the dotted `path`.
    pub fn member(&self, path: &str, kind: SubjectKind) -> Self {
        let expression = path
            .split('.')
            .filter(|segment| !segment.is_empty())
            .fold(self.expression.clone(), Expression::member);
        Self::new(kind, expression)
    }

    /// `subject.a.b`, except that the response fields which are methods in
    /// Playwright become calls: `body` -> `await response.json()`,
    /// `status` -> `response.status()`.
    pub fn property(&self, path: &str) -> Self {
        if self.kind != SubjectKind::Response {
            return self.member(path, SubjectKind::Value);
        }
        let path = path.strip_prefix("response.").unwrap_or(path);
        let (head, rest) = path.split_once('.').unwrap_or((path, ""));
        let value = match head {
            "body" => self.chain_async("json", Vec::new(), SubjectKind::Value),
            "status" | "statusCode" => self.chain("status", Vec::new(), SubjectKind::Value),
            head => self.chain(head, Vec::new(), SubjectKind::Value),
        };
        value.member(rest, SubjectKind::Value)
    }

    pub fn call_sync(&self, method: &str, arguments: Vec<Expression>) -> Expression {
        Expression::method_call(self.expression.clone(), method, arguments)
    }

    pub fn call_async(&self, method: &str, arguments: Vec<Expression>) -> Expression {
        Expression::awaited(self.call_sync(method, arguments))
    }

    /// `expect(subject)[.not].method(arguments)`
    pub fn expect_sync(&self, method: &str, arguments: Vec<Expression>, is_not: bool) -> Expression {
        expect_call(self.expression.clone(), method, arguments, is_not)
    }

    /// `await expect(subject)[.not].method(arguments)`
    pub fn expect_async(&self, method: &str, arguments: Vec<Expression>, is_not: bool) -> Expression {
        Expression::awaited(self.expect_sync(method, arguments, is_not))
    }

    /// `await expect.poll(async () => subject)[.not].method(arguments)`
    pub fn expect_poll(&self, method: &str, arguments: Vec<Expression>, is_not: bool) -> Expression {
        let poll = Expression::method_call(
            Expression::identifier("expect"),
            "poll",
            vec![async_arrow(self.expression.clone())],
        );
        Expression::awaited(matcher_call(poll, method, arguments, is_not))
    }

    pub fn is_identifier(&self, name: &str) -> bool {
        self.expression.as_identifier() == Some(name)
    }
}

/// `expect(value)[.not].method(arguments)`, tagged as translated.
pub fn expect_call(value: Expression, method: &str, arguments: Vec<Expression>, is_not: bool) -> Expression {
    let expect = Expression::Call(crate::parser::Call {
        callee: Box::new(Expression::identifier("expect")),
        arguments: vec![value],
        optional: false,
        processed: true,
    });
    matcher_call(expect, method, arguments, is_not)
}

fn matcher_call(expect: Expression, method: &str, arguments: Vec<Expression>, is_not: bool) -> Expression {
    let expect = if is_not {
        Expression::member(expect, "not")
    } else {
        expect
    };
    Expression::method_call(expect, method, arguments)
}

/// `async () => body`
pub fn async_arrow(body: Expression) -> Expression {
    Expression::arrow(
        Vec::new(),
        crate::parser::FunctionBody::Expression(Box::new(body)),
        true,
    )
}

/// Result of translating one chain entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped {
    pub subject: Subject,
    pub statements: Vec<Statement>,
}

impl Mapped {
    pub fn subject(subject: Subject) -> Self {
        Self {
            subject,
            statements: Vec::new(),
        }
    }

    pub fn with(subject: Subject, statements: Vec<Statement>) -> Self {
        Self { subject, statements }
    }

    /// Keeps `subject` and emits `expression` as a single statement.
    pub fn expression(subject: Subject, expression: Expression) -> Self {
        Self::with(subject, vec![Statement::Expression(expression)])
    }
}

pub const FIXME_PREFIX: &str = "FIXME_";

/// Emits `subject.FIXME_name(arguments)` and keeps the subject.
///
/// Page and locator subjects get an awaited placeholder since every real
/// method on them returns a promise.
pub fn fixme(subject: Subject, name: &str, arguments: Vec<Expression>) -> Mapped {
    log::warn!("No translation for '{name}' on a {:?} subject, emitting a placeholder", subject.kind);
    let method = format!("{FIXME_PREFIX}{name}");
    let expression = if subject.kind.is_dom() {
        subject.call_async(&method, arguments)
    } else {
        subject.call_sync(&method, arguments)
    };
    Mapped::expression(subject, expression)
}

/// Chains `subject.FIXME_name(arguments)` as a new subject of `kind`.
pub fn fixme_subject(subject: &Subject, name: &str, arguments: Vec<Expression>, kind: SubjectKind) -> Mapped {
    log::warn!("No translation for '{name}' on a {:?} subject, emitting a placeholder", subject.kind);
    Mapped::subject(subject.chain(&format!("{FIXME_PREFIX}{name}"), arguments, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{PrintOptions, print_expression};

    fn printed(expression: &Expression) -> String {
        print_expression(expression, &PrintOptions::default())
    }

    fn locator() -> Subject {
        Subject::page().chain("locator", vec![Expression::string(".a")], SubjectKind::Locator)
    }

    #[test]
    fn test_builders() {
        let subject = locator();
        assert_eq!(printed(&subject.expression), "page.locator('.a')");
        assert_eq!(printed(&subject.call_async("click", vec![])), "await page.locator('.a').click()");
        assert_eq!(
            printed(&subject.member("response.body", SubjectKind::Value).expression),
            "page.locator('.a').response.body"
        );
    }

    #[test]
    fn test_response_properties() {
        let response = Subject::new(SubjectKind::Response, Expression::identifier("response"));
        assert_eq!(printed(&response.property("status").expression), "response.status()");
        assert_eq!(printed(&response.property("body.items").expression), "(await response.json()).items");
        assert_eq!(printed(&response.property("headers").expression), "response.headers()");
        let value = Subject::new(SubjectKind::Value, Expression::identifier("user"));
        assert_eq!(printed(&value.property("status").expression), "user.status");
    }

    #[test]
    fn test_expect_shapes() {
        let subject = locator();
        assert_eq!(
            printed(&subject.expect_async("toBeVisible", vec![], true)),
            "await expect(page.locator('.a')).not.toBeVisible()"
        );
        let value = Subject::new(SubjectKind::Value, Expression::identifier("count"));
        assert_eq!(
            printed(&value.expect_poll("toBe", vec![Expression::number(3)], false)),
            "await expect.poll(async () => count).toBe(3)"
        );
    }

    #[test]
    fn test_fixme_shape_follows_subject() {
        let mapped = fixme(locator(), "nextUntil", vec![Expression::string("#b")]);
        let Statement::Expression(expression) = &mapped.statements[0] else {
            panic!("expected an expression statement");
        };
        assert_eq!(printed(expression), "await page.locator('.a').FIXME_nextUntil('#b')");

        let value = Subject::new(SubjectKind::Value, Expression::identifier("x"));
        let mapped = fixme(value, "foo", vec![]);
        let Statement::Expression(expression) = &mapped.statements[0] else {
            panic!("expected an expression statement");
        };
        assert_eq!(printed(expression), "x.FIXME_foo()");
    }
}
