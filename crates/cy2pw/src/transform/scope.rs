use super::subject::{Subject, SubjectKind};
use crate::parser::{
    Call, DeclarationKind, Expression, Literal, Member, MemberProperty, Program, Statement, VisitMut,
    walk_expression, walk_statements,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Per-callback state, copied into child scopes so siblings never see each
/// other's bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// Names already bound in the enclosing block.
    pub variables: BTreeSet<String>,
    /// Ambient subject inside a `then`/`within` callback.
    pub scope: Option<Subject>,
}

impl State {
    pub fn is_scope_identifier(&self, name: &str) -> bool {
        self.scope.as_ref().is_some_and(|scope| scope.is_identifier(name))
    }

    /// Locator scope whose identifier is `name`.
    pub fn locator_scope(&self, name: &str) -> Option<&Subject> {
        self.scope
            .as_ref()
            .filter(|scope| scope.kind == SubjectKind::Locator && scope.is_identifier(name))
    }

    /// Whether `expression` reads from the locator scope variable, like `$el.nth(0)`.
    pub fn is_locator_scope_expression(&self, expression: &Expression) -> bool {
        self.scope
            .as_ref()
            .filter(|scope| scope.kind == SubjectKind::Locator)
            .and_then(|scope| scope.expression.as_identifier())
            .is_some_and(|name| is_rooted_at(expression, name))
    }

    /// Binds `name` to a subject of `kind` for a nested callback.
    pub fn scope_variable(&mut self, kind: SubjectKind, name: &str) -> ScopeVariable {
        let needs_block = !self.variables.insert(name.to_string());
        let scope = Subject::new(kind, Expression::identifier(name));
        ScopeVariable {
            state: State {
                variables: self.variables.clone(),
                scope: Some(scope.clone()),
            },
            scope,
            needs_block,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeVariable {
    pub scope: Subject,
    pub state: State,
    /// The name is taken in the enclosing block, so the declaration needs a
    /// block of its own.
    pub needs_block: bool,
}

/// Subjects saved with `as('name')`, scoped to one file.
#[derive(Debug, Default)]
pub struct Aliases {
    kinds: HashMap<String, SubjectKind>,
    rebound: HashSet<String>,
}

impl Aliases {
    /// Notes the alias names bound more than once in `program`.
    pub fn for_program(program: &mut Program) -> Self {
        let mut counter = AliasCounter::default();
        walk_statements(&mut counter, &mut program.body);
        Self {
            kinds: HashMap::new(),
            rebound: counter
                .counts
                .into_iter()
                .filter_map(|(name, count)| (count > 1).then_some(name))
                .collect(),
        }
    }

    pub fn kind(&self, name: &str) -> Option<SubjectKind> {
        self.kinds.get(name).copied()
    }

    /// Records `name` and returns the statement binding `value` to it.
    pub fn bind(&mut self, name: &str, kind: SubjectKind, value: Expression, state: &mut State) -> Statement {
        if let Some(previous) = self.kinds.insert(name.to_string(), kind) {
            log::warn!("Alias '@{name}' bound again, {previous:?} replaced by {kind:?}");
        }
        if state.variables.contains(name) {
            return Statement::Expression(Expression::Assignment {
                operator: "=".to_string(),
                target: Box::new(Expression::identifier(name)),
                value: Box::new(value),
            });
        }
        state.variables.insert(name.to_string());
        let declaration_kind = if self.rebound.contains(name) {
            DeclarationKind::Let
        } else {
            DeclarationKind::Const
        };
        Statement::declare(declaration_kind, name, value)
    }
}

#[derive(Default)]
struct AliasCounter {
    counts: HashMap<String, usize>,
}

impl VisitMut for AliasCounter {
    fn visit_expression(&mut self, expression: &mut Expression) {
        if let Expression::Call(call) = expression
            && let Expression::Member(member) = &*call.callee
            && member.property == MemberProperty::Identifier("as".to_string())
            && let Some(name) = call.arguments.first().and_then(Expression::as_string)
        {
            *self.counts.entry(alias_identifier(name)).or_default() += 1;
        }
        walk_expression(self, expression);
    }
}

/// Variable name for the alias `name`, `user-list` becomes `user_list`.
pub fn alias_identifier(name: &str) -> String {
    let mut identifier: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if identifier.is_empty() || identifier.starts_with(|c: char| c.is_ascii_digit()) {
        identifier.insert(0, '_');
    }
    identifier
}

/// Turns jQuery-style access on the locator `variable` into locator calls:
/// `$el[0]` becomes `$el.nth(0)`, `$el.length` becomes `await $el.count()`
/// and `$el.className` becomes `await $el.getAttribute('class')`.
pub fn members_to_calls(statements: &mut [Statement], variable: &str) {
    walk_statements(&mut ScopeMembers { variable }, statements);
}

struct ScopeMembers<'a> {
    variable: &'a str,
}

impl ScopeMembers<'_> {
    fn rewrite(&self, member: &Member) -> Option<Expression> {
        if !is_rooted_at(&member.object, self.variable) {
            return None;
        }
        let object = (*member.object).clone();
        match &member.property {
            MemberProperty::Computed(index) if matches!(**index, Expression::Literal(Literal::Number(_))) => {
                // Left open so the rest of the chain is still translated
                Some(Expression::call(Expression::member(object, "nth"), vec![(**index).clone()]))
            }
            MemberProperty::Identifier(name) if name == "length" => Some(Expression::awaited(
                Expression::method_call(object, "count", Vec::new()),
            )),
            MemberProperty::Identifier(name) if name == "className" => Some(Expression::awaited(
                Expression::method_call(object, "getAttribute", vec![Expression::string("class")]),
            )),
            _ => None,
        }
    }
}

impl VisitMut for ScopeMembers<'_> {
    fn visit_expression(&mut self, expression: &mut Expression) {
        if let Expression::Call(call) = expression {
            // Methods stay methods, only their receiver is rewritten
            match &mut *call.callee {
                Expression::Member(member) => {
                    self.visit_expression(&mut member.object);
                    if let MemberProperty::Computed(property) = &mut member.property {
                        self.visit_expression(property);
                    }
                }
                callee => self.visit_expression(callee),
            }
            for argument in &mut call.arguments {
                self.visit_expression(argument);
            }
            return;
        }
        walk_expression(self, expression);
        if let Expression::Member(member) = expression
            && let Some(replacement) = self.rewrite(member)
        {
            *expression = replacement;
        }
    }
}

/// Whether the member/call spine of `expression` ends at `variable`.
fn is_rooted_at(expression: &Expression, variable: &str) -> bool {
    match expression {
        Expression::Identifier(name) => name == variable,
        Expression::Member(member) => is_rooted_at(&member.object, variable),
        Expression::Call(Call { callee, .. }) => match &**callee {
            Expression::Member(member) => is_rooted_at(&member.object, variable),
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{PrintOptions, print};
    use crate::parser::parse;

    fn rewrite_members(code: &str, variable: &str) -> String {
        let mut program = parse(code).unwrap();
        members_to_calls(&mut program.body, variable);
        print(&program, &PrintOptions::default())
    }

    #[test]
    fn test_scope_variable_blocks_on_reuse() {
        let mut state = State::default();
        let first = state.scope_variable(SubjectKind::Locator, "$el");
        assert!(!first.needs_block);
        assert!(first.state.is_scope_identifier("$el"));
        let second = state.scope_variable(SubjectKind::Locator, "$el");
        assert!(second.needs_block);
    }

    #[test]
    fn test_child_state_is_a_copy() {
        let mut state = State::default();
        let mut child = state.scope_variable(SubjectKind::Value, "x").state;
        child.variables.insert("inner".to_string());
        assert!(!state.variables.contains("inner"));
        assert!(state.variables.contains("x"));
    }

    #[test]
    fn test_members_to_calls() {
        assert_eq!(
            rewrite_members("expect($el.length).to.eq(2);\n$el[0].click();\nfoo.length;", "$el"),
            "expect(await $el.count()).to.eq(2);\n$el.nth(0).click();\nfoo.length;\n"
        );
        assert_eq!(
            rewrite_members("x = $el.find('a')[1].className;", "$el"),
            "x = await $el.find('a').nth(1).getAttribute('class');\n"
        );
        assert_eq!(rewrite_members("other($el).length;", "$el"), "other($el).length;\n");
    }

    #[test]
    fn test_alias_identifier() {
        assert_eq!(alias_identifier("user-list"), "user_list");
        assert_eq!(alias_identifier("2fa"), "_2fa");
        assert_eq!(alias_identifier("todos"), "todos");
    }

    #[test]
    fn test_alias_binding() {
        let mut program = parse("cy.get('a').as('x');\ncy.get('b').as('x');\ncy.get('c').as('y');").unwrap();
        let mut aliases = Aliases::for_program(&mut program);
        let mut state = State::default();
        let value = Expression::identifier("v");
        assert!(matches!(
            aliases.bind("x", SubjectKind::Locator, value.clone(), &mut state),
            Statement::Declaration(declaration) if declaration.kind == DeclarationKind::Let
        ));
        assert!(matches!(
            aliases.bind("x", SubjectKind::Response, value.clone(), &mut state),
            Statement::Expression(Expression::Assignment { .. })
        ));
        assert_eq!(aliases.kind("x"), Some(SubjectKind::Response));
        assert!(matches!(
            aliases.bind("y", SubjectKind::Locator, value, &mut state),
            Statement::Declaration(declaration) if declaration.kind == DeclarationKind::Const
        ));
    }
}
