use super::scope::State;
use super::subject::Subject;
use crate::parser::{Expression, Literal, Member, MemberProperty};

/// One step of a command or assertion chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    pub method: String,
    pub arguments: Vec<Expression>,
    /// The call or member access the entry was read from.
    pub source: &'a Expression,
    /// The next entry starts again from the page subject.
    pub break_chain: bool,
    /// Set on `property` steps unwound from an `expect(a.b)` argument.
    pub property_name: Option<String>,
}

impl<'a> Entry<'a> {
    fn new(method: impl Into<String>, arguments: Vec<Expression>, source: &'a Expression) -> Self {
        Self {
            method: method.into(),
            arguments,
            source,
            break_chain: false,
            property_name: None,
        }
    }

    fn property(name: &str, source: &'a Expression) -> Self {
        Self {
            property_name: Some(name.to_string()),
            ..Self::new("property", Vec::new(), source)
        }
    }

    fn is_processed(&self) -> bool {
        self.source.as_call().is_some_and(|call| call.processed)
    }

    fn is_should(&self) -> bool {
        matches!(self.method.as_str(), "should" | "and")
    }

    fn string_argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).and_then(Expression::as_string)
    }
}

/// Entries of a `cy...` chain together with the subject its first entry acts on.
#[derive(Debug)]
pub struct CommandChain<'a> {
    pub root: Subject,
    pub entries: Vec<Entry<'a>>,
}

/// Reads `cy.a().b().c()` or, inside a locator scope, `$el.a().b()`.
///
/// Returns `None` when the spine does not end at the chain root or any of its
/// calls was produced by an earlier rewrite.
pub fn tokenize_command_chain<'a>(expression: &'a Expression, state: &State) -> Option<CommandChain<'a>> {
    let mut entries = Vec::new();
    let mut current = expression;
    let root = loop {
        let Expression::Call(call) = current else {
            return None;
        };
        let Expression::Member(Member {
            object,
            property: MemberProperty::Identifier(method),
            ..
        }) = &*call.callee
        else {
            return None;
        };
        entries.push(Entry::new(method.as_str(), call.arguments.clone(), current));
        match &**object {
            Expression::Call(_) => current = object,
            Expression::Identifier(name) if name == "cy" => break Subject::page(),
            Expression::Identifier(name) => match state.locator_scope(name) {
                Some(scope) => break scope.clone(),
                None => return None,
            },
            _ => return None,
        }
    };
    entries.reverse();
    if entries.iter().any(Entry::is_processed) {
        return None;
    }
    Some(CommandChain { root, entries })
}

/// Reads a BDD assertion such as `expect(a.b).to.not.have.property('c')`.
///
/// Nested member access in the `expect` argument is unwound into `property`
/// steps and chained words are joined with `_` into the following call, so
/// the example gives `expect(a)`, `property` (b), `not_have_property('c')`.
pub fn tokenize_expect_chain(expression: &Expression) -> Option<Vec<Entry<'_>>> {
    let mut entries: Vec<Entry<'_>> = Vec::new();
    let mut current = expression;
    loop {
        match current {
            Expression::Call(call) => match &*call.callee {
                Expression::Member(Member {
                    object,
                    property: MemberProperty::Identifier(method),
                    ..
                }) => {
                    entries.push(Entry::new(method.as_str(), call.arguments.clone(), current));
                    current = object;
                }
                Expression::Identifier(name) if name == "expect" => {
                    let mut argument = call.arguments.first()?;
                    while let Expression::Member(Member {
                        object,
                        property: MemberProperty::Identifier(name),
                        optional: false,
                    }) = argument
                    {
                        entries.push(Entry::property(name, argument));
                        argument = object;
                    }
                    entries.push(Entry::new("expect", vec![argument.clone()], current));
                    break;
                }
                _ => return None,
            },
            Expression::Member(Member {
                object,
                property: MemberProperty::Identifier(name),
                ..
            }) => {
                match entries.last_mut() {
                    None => entries.push(Entry::new(name.as_str(), Vec::new(), current)),
                    Some(_) if name == "to" || name == "and" => {}
                    Some(next) => next.method = format!("{name}_{}", next.method),
                }
                current = object;
            }
            _ => return None,
        }
    }
    entries.reverse();
    if entries.len() < 2 || entries.iter().any(Entry::is_processed) {
        return None;
    }
    Some(entries)
}

/// Merges adjacent entries that express one intent.
pub fn fuse_ligatures(entries: Vec<Entry<'_>>) -> Vec<Entry<'_>> {
    let mut fused = Vec::with_capacity(entries.len());
    let mut entries = entries.into_iter().peekable();
    while let Some(mut entry) = entries.next() {
        let Some(next) = entries.peek_mut() else {
            fused.push(entry);
            break;
        };
        if next.is_should() && fuse_into_assertion(&entry, next) {
            continue;
        }
        if entry.method == "invoke"
            && entry.string_argument(0) == Some("val")
            && entry.arguments.len() > 1
            && next.method == "trigger"
            && next.string_argument(0) == Some("change")
        {
            // A range input set through its value, typed instead
            let value = match &entry.arguments[1] {
                Expression::Literal(Literal::Number(raw)) => Expression::string(raw.as_str()),
                value => value.clone(),
            };
            entry.method = "type".to_string();
            entry.arguments = vec![value];
            entry.break_chain = true;
            entries.next();
        }
        fused.push(entry);
    }
    fused
}

/// Folds `entry` into the matcher string of the assertion `next`.
fn fuse_into_assertion(entry: &Entry<'_>, next: &mut Entry<'_>) -> bool {
    let Some(matcher) = next.string_argument(0) else {
        return false;
    };
    let (negation, matcher) = match matcher.strip_prefix("not.") {
        Some(matcher) => ("not.", matcher.to_string()),
        None => ("", matcher.to_string()),
    };
    let fused = |prefix: String| Expression::string(format!("{negation}{prefix}.{matcher}"));
    match (entry.method.as_str(), entry.arguments.as_slice()) {
        ("invoke", [property]) if property.is_string() => {
            next.arguments[0] = fused(format!("invoke.{}", property.as_string().unwrap_or_default()));
        }
        ("invoke", [property, value]) if property.is_string() => {
            let mut arguments = vec![
                fused(format!("invoke.{}", property.as_string().unwrap_or_default())),
                value.clone(),
            ];
            arguments.extend(next.arguments.drain(1..));
            next.arguments = arguments;
        }
        ("location", arguments) => {
            let prefix = match arguments.first().and_then(Expression::as_string) {
                Some(part) => format!("location.{part}"),
                None => "location".to_string(),
            };
            next.arguments[0] = fused(prefix);
        }
        ("title" | "hash" | "url", []) => next.arguments[0] = fused(entry.method.clone()),
        ("should" | "and", [attribute, name]) => {
            let Some(attribute @ ("have.attr" | "have.prop")) = attribute.as_string() else {
                return false;
            };
            if !name.is_string() {
                return false;
            }
            let mut arguments = vec![fused(attribute.to_string()), name.clone()];
            arguments.extend(next.arguments.drain(1..));
            next.arguments = arguments;
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Statement, parse};
    use crate::transform::subject::SubjectKind;

    fn expression(code: &str) -> Expression {
        match parse(code).unwrap().body.remove(0) {
            Statement::Expression(expression) => expression,
            statement => panic!("expected an expression statement, got {statement:?}"),
        }
    }

    fn methods(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(|entry| entry.method.clone()).collect()
    }

    #[test]
    fn test_command_chain() {
        let code = expression("cy.get('.a').find('b').click()");
        let chain = tokenize_command_chain(&code, &State::default()).unwrap();
        assert_eq!(methods(&chain.entries), ["get", "find", "click"]);
        assert_eq!(chain.root, Subject::page());
        assert_eq!(chain.entries[0].arguments, vec![Expression::string(".a")]);
    }

    #[test]
    fn test_command_chain_roots() {
        let state = State::default();
        assert!(tokenize_command_chain(&expression("foo.get('.a')"), &state).is_none());
        assert!(tokenize_command_chain(&expression("cy.get('.a').length"), &state).is_none());
        assert!(tokenize_command_chain(&expression("cy.fixtures[0].click()"), &state).is_none());

        let mut state = State::default();
        let scoped = state.scope_variable(SubjectKind::Locator, "$el").state;
        let code = expression("$el.find('a')");
        let chain = tokenize_command_chain(&code, &scoped).unwrap();
        assert!(chain.root.is_identifier("$el"));
    }

    #[test]
    fn test_processed_calls_are_skipped() {
        let code = Expression::method_call(Expression::identifier("cy"), "get", vec![Expression::string(".a")]);
        assert!(tokenize_command_chain(&code, &State::default()).is_none());
    }

    #[test]
    fn test_expect_chain() {
        let code = expression("expect(a.b).to.not.have.property('c')");
        let entries = tokenize_expect_chain(&code).unwrap();
        assert_eq!(methods(&entries), ["expect", "property", "not_have_property"]);
        assert_eq!(entries[0].arguments, vec![Expression::identifier("a")]);
        assert_eq!(entries[1].property_name.as_deref(), Some("b"));

        let code = expression("expect(x).to.be.true");
        assert_eq!(methods(&tokenize_expect_chain(&code).unwrap()), ["expect", "be_true"]);

        let code = expression("expect(x).to.be.gt(1).and.lt(5)");
        assert_eq!(methods(&tokenize_expect_chain(&code).unwrap()), ["expect", "be_gt", "lt"]);

        assert!(tokenize_expect_chain(&expression("expect(x)")).is_none());
        assert!(tokenize_expect_chain(&expression("assert(x).to.be.true")).is_none());
    }

    #[test]
    fn test_invoke_ligature() {
        let code = expression("cy.get('a').invoke('text').should('not.match', /x/)");
        let chain = tokenize_command_chain(&code, &State::default()).unwrap();
        let entries = fuse_ligatures(chain.entries);
        assert_eq!(methods(&entries), ["get", "should"]);
        assert_eq!(
            entries[1].arguments,
            vec![Expression::string("not.invoke.text.match"), Expression::regex("x", "")]
        );
    }

    #[test]
    fn test_attribute_ligature() {
        let code = expression("cy.get('a').should('have.attr', 'href').and('include', 'x')");
        let chain = tokenize_command_chain(&code, &State::default()).unwrap();
        let entries = fuse_ligatures(chain.entries);
        assert_eq!(methods(&entries), ["get", "and"]);
        assert_eq!(
            entries[1].arguments,
            vec![
                Expression::string("have.attr.include"),
                Expression::string("href"),
                Expression::string("x")
            ]
        );
    }

    #[test]
    fn test_attribute_value_is_not_fused() {
        let code = expression("cy.get('a').should('have.attr', 'href', '/y').and('include', 'y')");
        let chain = tokenize_command_chain(&code, &State::default()).unwrap();
        let entries = fuse_ligatures(chain.entries);
        assert_eq!(methods(&entries), ["get", "should", "and"]);
        assert_eq!(entries[1].arguments.len(), 3);

        let code = expression("cy.get('a').invoke('attr', 'href', 'x').should('eq', 'y')");
        let chain = tokenize_command_chain(&code, &State::default()).unwrap();
        assert_eq!(methods(&fuse_ligatures(chain.entries)), ["get", "invoke", "should"]);
    }

    #[test]
    fn test_range_ligature() {
        let code = expression("cy.get('input').invoke('val', 25).trigger('change').get('b')");
        let chain = tokenize_command_chain(&code, &State::default()).unwrap();
        let entries = fuse_ligatures(chain.entries);
        assert_eq!(methods(&entries), ["get", "type", "get"]);
        assert!(entries[1].break_chain);
        assert_eq!(entries[1].arguments, vec![Expression::string("25")]);
    }

    #[test]
    fn test_location_ligature() {
        let code = expression("cy.location('pathname').should('include', '/a')");
        let chain = tokenize_command_chain(&code, &State::default()).unwrap();
        let entries = fuse_ligatures(chain.entries);
        assert_eq!(methods(&entries), ["should"]);
        assert_eq!(entries[0].string_argument(0), Some("location.pathname.include"));
    }
}
