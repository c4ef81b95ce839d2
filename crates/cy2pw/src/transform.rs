//! Rewrites Cypress test programs into Playwright test programs.
//!
//! Every `cy...` chain and every BDD `expect(...)` chain is read into entries,
//! adjacent entries are fused where they form one intent, and the entries are
//! folded left to right over a [`Subject`]. Each step yields the next subject
//! and the statements that replace the chain.

mod assertions;
mod chain;
mod commands;
mod keyboard;
mod matchers;
mod scope;
mod subject;
mod viewports;

pub use chain::{CommandChain, Entry, fuse_ligatures, tokenize_command_chain, tokenize_expect_chain};
pub use scope::State;
pub use subject::{FIXME_PREFIX, Mapped, Subject, SubjectKind};

use crate::parser::{
    Call, Declaration, Expression, ForHead, Function, FunctionBody, Member, MemberProperty, Pattern, Program,
    Statement, SwitchCase, VisitMut, walk_expression, walk_function, walk_statement,
};
use scope::Aliases;

/// Rewrites `program` and marks every function that now awaits as `async`.
pub fn transform(mut program: Program) -> Program {
    let mut transformer = Transformer::new(&mut program);
    let body = transformer.rewrite_statements(program.body, &mut State::default());
    let mut program = Program { body };
    promote_async(&mut program);
    program
}

/// What a chain step sees besides its subject and arguments.
pub struct Context<'a> {
    pub method: &'a str,
    /// The step is the final one of its chain.
    pub is_last: bool,
    pub property_name: Option<&'a str>,
    pub state: &'a mut State,
    transformer: &'a mut Transformer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Commands,
    Assertions,
}

struct Transformer {
    aliases: Aliases,
}

impl Transformer {
    fn new(program: &mut Program) -> Self {
        Self {
            aliases: Aliases::for_program(program),
        }
    }

    fn rewrite_statements(&mut self, statements: Vec<Statement>, state: &mut State) -> Vec<Statement> {
        let mut rewritten = Vec::with_capacity(statements.len());
        for statement in statements {
            rewritten.extend(self.rewrite_statement(statement, state));
        }
        rewritten
    }

    fn rewrite_statement(&mut self, statement: Statement, state: &mut State) -> Vec<Statement> {
        let statement = match statement {
            Statement::Expression(expression) => return self.rewrite_expression_statement(expression, state),
            Statement::Declaration(declaration) => Statement::Declaration(self.rewrite_declaration(declaration, state)),
            Statement::Function(mut function) => {
                self.rewrite_function(&mut function, state);
                Statement::Function(function)
            }
            Statement::Block(body) => Statement::Block(self.rewrite_statements(body, state)),
            Statement::If {
                test,
                consequent,
                alternate,
            } => {
                let test = self.rewrite_expression(test, state);
                let consequent = self.rewrite_nested(*consequent, state);
                let alternate = match alternate {
                    Some(alternate) => Some(self.rewrite_nested(*alternate, state)),
                    None => None,
                };
                Statement::If {
                    test,
                    consequent,
                    alternate,
                }
            }
            Statement::For {
                init,
                test,
                update,
                body,
            } => {
                let init = match init {
                    Some(init) => Some(self.rewrite_for_head(init, state)),
                    None => None,
                };
                let test = match test {
                    Some(test) => Some(self.rewrite_expression(test, state)),
                    None => None,
                };
                let update = match update {
                    Some(update) => Some(self.rewrite_expression(update, state)),
                    None => None,
                };
                Statement::For {
                    init,
                    test,
                    update,
                    body: self.rewrite_nested(*body, state),
                }
            }
            Statement::ForIn { left, right, body } => Statement::ForIn {
                left: self.rewrite_for_head(left, state),
                right: self.rewrite_expression(right, state),
                body: self.rewrite_nested(*body, state),
            },
            Statement::ForOf {
                left,
                right,
                body,
                is_await,
            } => Statement::ForOf {
                left: self.rewrite_for_head(left, state),
                right: self.rewrite_expression(right, state),
                body: self.rewrite_nested(*body, state),
                is_await,
            },
            Statement::While { test, body } => Statement::While {
                test: self.rewrite_expression(test, state),
                body: self.rewrite_nested(*body, state),
            },
            Statement::DoWhile { body, test } => Statement::DoWhile {
                body: self.rewrite_nested(*body, state),
                test: self.rewrite_expression(test, state),
            },
            Statement::Switch { discriminant, cases } => {
                let discriminant = self.rewrite_expression(discriminant, state);
                let mut rewritten = Vec::with_capacity(cases.len());
                for case in cases {
                    let test = match case.test {
                        Some(test) => Some(self.rewrite_expression(test, state)),
                        None => None,
                    };
                    rewritten.push(SwitchCase {
                        test,
                        body: self.rewrite_statements(case.body, state),
                    });
                }
                Statement::Switch {
                    discriminant,
                    cases: rewritten,
                }
            }
            Statement::Try {
                block,
                handler,
                finalizer,
            } => {
                let block = self.rewrite_statements(block, state);
                let handler = match handler {
                    Some(mut handler) => {
                        handler.body = self.rewrite_statements(handler.body, state);
                        Some(handler)
                    }
                    None => None,
                };
                let finalizer = match finalizer {
                    Some(finalizer) => Some(self.rewrite_statements(finalizer, state)),
                    None => None,
                };
                Statement::Try {
                    block,
                    handler,
                    finalizer,
                }
            }
            Statement::Return(Some(argument)) => Statement::Return(Some(self.rewrite_expression(argument, state))),
            Statement::Throw(argument) => Statement::Throw(self.rewrite_expression(argument, state)),
            Statement::Export(declaration) => Statement::Export(self.rewrite_nested(*declaration, state)),
            Statement::ExportDefault(expression) => Statement::ExportDefault(self.rewrite_expression(expression, state)),
            statement @ (Statement::Trivia(_)
            | Statement::Return(None)
            | Statement::Break(_)
            | Statement::Continue(_)
            | Statement::Import(_)
            | Statement::Empty) => statement,
        };
        vec![statement]
    }

    /// Rewrites the body of a loop or branch, which has room for one statement.
    fn rewrite_nested(&mut self, statement: Statement, state: &mut State) -> Box<Statement> {
        let mut statements = self.rewrite_statement(statement, state);
        let statement = if statements.len() == 1 {
            statements.remove(0)
        } else {
            Statement::Block(statements)
        };
        Box::new(statement)
    }

    fn rewrite_declaration(&mut self, mut declaration: Declaration, state: &mut State) -> Declaration {
        for declarator in &mut declaration.declarators {
            if let Some(init) = declarator.init.take() {
                declarator.init = Some(self.rewrite_expression(init, state));
            }
        }
        declaration
    }

    fn rewrite_for_head(&mut self, head: ForHead, state: &mut State) -> ForHead {
        match head {
            ForHead::Declaration(declaration) => ForHead::Declaration(self.rewrite_declaration(declaration, state)),
            ForHead::Expression(expression) => ForHead::Expression(self.rewrite_expression(expression, state)),
        }
    }

    fn rewrite_function(&mut self, function: &mut Function, state: &mut State) {
        let body = std::mem::replace(&mut function.body, FunctionBody::Block(Vec::new()));
        function.body = match body {
            FunctionBody::Block(statements) => FunctionBody::Block(self.rewrite_statements(statements, state)),
            FunctionBody::Expression(expression) => {
                FunctionBody::Expression(Box::new(self.rewrite_expression(*expression, state)))
            }
        };
    }

    fn rewrite_expression(&mut self, mut expression: Expression, state: &mut State) -> Expression {
        ExpressionRewriter {
            transformer: self,
            state,
        }
        .visit_expression(&mut expression);
        expression
    }

    fn rewrite_expression_statement(&mut self, expression: Expression, state: &mut State) -> Vec<Statement> {
        if let Some(Mapped {
            subject,
            mut statements,
        }) = self.translate_commands(&expression, state)
        {
            // A chain ending in a query still has to run
            if statements.is_empty() && !is_root(&subject, state) {
                statements.push(Statement::Expression(subject.expression));
            }
            return statements;
        }
        let expression = self.rewrite_expression(expression, state);
        match self.translate_expect(&expression, state) {
            Some(mapped) if !mapped.statements.is_empty() => mapped.statements,
            _ => vec![Statement::Expression(expression)],
        }
    }

    /// Replacement for a chain used as a value.
    fn translate_nested(&mut self, expression: &Expression, state: &mut State) -> Option<Expression> {
        let Mapped {
            subject,
            mut statements,
        } = self.translate_commands(expression, state)?;
        if statements.is_empty() {
            return Some(subject.expression);
        }
        if subject.kind != SubjectKind::Void {
            statements.push(Statement::Return(Some(subject.expression)));
        }
        let function = Expression::arrow(Vec::new(), FunctionBody::Block(statements), true);
        Some(Expression::awaited(Expression::call(function, Vec::new())))
    }

    fn translate_commands(&mut self, expression: &Expression, state: &mut State) -> Option<Mapped> {
        let CommandChain { root, entries } = tokenize_command_chain(expression, state)?;
        let entries = fuse_ligatures(entries);
        log::debug!("Translating chain {}", describe(&entries));
        Some(self.fold(root, entries, state, Table::Commands))
    }

    fn translate_expect(&mut self, expression: &Expression, state: &mut State) -> Option<Mapped> {
        let entries = tokenize_expect_chain(expression)?;
        log::debug!("Translating assertion {}", describe(&entries));
        let root = state.scope.clone().unwrap_or_else(Subject::page);
        Some(self.fold(root, entries, state, Table::Assertions))
    }

    fn fold(&mut self, root: Subject, entries: Vec<Entry<'_>>, state: &mut State, table: Table) -> Mapped {
        let count = entries.len();
        let mut subject = root;
        let mut statements = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let Entry {
                method,
                mut arguments,
                break_chain,
                property_name,
                ..
            } = entry;
            // Callbacks are rewritten with their own scope
            for argument in &mut arguments {
                if !matches!(argument, Expression::Function(_)) {
                    Globals.visit_expression(argument);
                }
            }
            let mut context = Context {
                method: &method,
                is_last: index + 1 == count,
                property_name: property_name.as_deref(),
                state: &mut *state,
                transformer: &mut *self,
            };
            let mapped = match table {
                Table::Commands => commands::translate(subject, arguments, &mut context),
                Table::Assertions => assertions::translate(subject, arguments, &mut context),
            };
            statements.extend(mapped.statements);
            subject = if break_chain { Subject::page() } else { mapped.subject };
        }
        Mapped::with(subject, statements)
    }
}

fn describe(entries: &[Entry<'_>]) -> String {
    entries
        .iter()
        .map(|entry| entry.method.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

/// The subject a chain starts from, left alone when nothing was derived from it.
fn is_root(subject: &Subject, state: &State) -> bool {
    subject.kind == SubjectKind::Void
        || subject.is_identifier("page")
        || state
            .scope
            .as_ref()
            .is_some_and(|scope| scope.expression == subject.expression)
}

/// Rewrites hooks, framework globals and chains nested in an expression.
struct ExpressionRewriter<'a> {
    transformer: &'a mut Transformer,
    state: &'a mut State,
}

impl ExpressionRewriter<'_> {
    fn rewrite_hook(&mut self, call: &mut Call, hook: Hook) {
        let callback = call
            .arguments
            .iter()
            .rposition(|argument| matches!(argument, Expression::Function(_)));
        *call.callee = hook.callee.clone();
        for (index, argument) in call.arguments.iter_mut().enumerate() {
            let Expression::Function(function) = argument else {
                self.visit_expression(argument);
                continue;
            };
            if Some(index) != callback || hook.kind == HookKind::Describe {
                self.visit_function(function);
                continue;
            }
            function.is_async = true;
            if hook.kind != HookKind::Setup {
                function.params = vec![Pattern::destructure(&["page"])];
            }
            let body = std::mem::replace(&mut function.body, FunctionBody::Block(Vec::new()));
            function.body = FunctionBody::Block(body.into_statements());
            self.transformer.rewrite_function(function, &mut State::default());
        }
    }
}

impl VisitMut for ExpressionRewriter<'_> {
    fn visit_expression(&mut self, expression: &mut Expression) {
        match expression {
            Expression::Call(call) => {
                if let Some(hook) = Hook::detect(call) {
                    self.rewrite_hook(call, hook);
                    return;
                }
                if let Some(variable) = environment_variable(call) {
                    *expression = variable;
                    return;
                }
            }
            Expression::Member(member) => {
                if let Some(replacement) = global_member(member) {
                    *expression = replacement;
                    return;
                }
            }
            _ => {}
        }
        if let Some(replacement) = self.transformer.translate_nested(expression, self.state) {
            *expression = replacement;
            return;
        }
        walk_expression(self, expression);
    }

    fn visit_function(&mut self, function: &mut Function) {
        self.transformer.rewrite_function(function, self.state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookKind {
    Describe,
    Test,
    /// `beforeEach`/`afterEach`, run with the page fixture
    Fixture,
    /// `beforeAll`/`afterAll`, run without a page
    Setup,
}

#[derive(Debug, Clone, PartialEq)]
struct Hook {
    kind: HookKind,
    callee: Expression,
}

impl Hook {
    fn detect(call: &Call) -> Option<Self> {
        let (name, modifier) = match &*call.callee {
            Expression::Identifier(name) => (name.as_str(), None),
            Expression::Member(Member {
                object,
                property: MemberProperty::Identifier(modifier),
                ..
            }) if modifier == "only" || modifier == "skip" => (object.as_identifier()?, Some(modifier.as_str())),
            _ => return None,
        };
        if !call
            .arguments
            .iter()
            .any(|argument| matches!(argument, Expression::Function(_)))
        {
            return None;
        }
        let test = Expression::identifier("test");
        let (kind, callee) = match name {
            "describe" | "context" => (HookKind::Describe, Expression::member(test, "describe")),
            "it" | "specify" => (HookKind::Test, test),
            "beforeEach" | "afterEach" => (HookKind::Fixture, Expression::member(test, name)),
            "before" | "beforeAll" => (HookKind::Setup, Expression::member(test, "beforeAll")),
            "after" | "afterAll" => (HookKind::Setup, Expression::member(test, "afterAll")),
            _ => return None,
        };
        let callee = match modifier {
            Some(modifier) => Expression::member(callee, modifier),
            None => callee,
        };
        Some(Self { kind, callee })
    }
}

/// `Cypress.env('NAME')` -> `process.env['NAME']`
fn environment_variable(call: &Call) -> Option<Expression> {
    let Expression::Member(member) = &*call.callee else {
        return None;
    };
    if member.object.as_identifier() != Some("Cypress") || member.property != MemberProperty::Identifier("env".into()) {
        return None;
    }
    let [name] = call.arguments.as_slice() else {
        return None;
    };
    name.as_string()?;
    Some(Expression::computed_member(
        Expression::member(Expression::identifier("process"), "env"),
        name.clone(),
    ))
}

/// `Cypress.platform` -> `process.platform`, `this.alias` -> `alias`
fn global_member(member: &Member) -> Option<Expression> {
    let MemberProperty::Identifier(property) = &member.property else {
        return None;
    };
    match &*member.object {
        Expression::Identifier(object) if object == "Cypress" && matches!(property.as_str(), "log" | "arch" | "platform") => {
            Some(Expression::member(Expression::identifier("process"), property))
        }
        Expression::This => Some(Expression::identifier(property.as_str())),
        _ => None,
    }
}

/// Replaces framework globals and leaves chains alone.
struct Globals;

impl VisitMut for Globals {
    fn visit_expression(&mut self, expression: &mut Expression) {
        let replacement = match expression {
            Expression::Call(call) => environment_variable(call),
            Expression::Member(member) => global_member(member),
            _ => None,
        };
        match replacement {
            Some(replacement) => *expression = replacement,
            None => walk_expression(self, expression),
        }
    }
}

/// Marks functions that contain `await` as `async`, innermost first.
pub fn promote_async(program: &mut Program) {
    let mut promotion = AsyncPromotion;
    for statement in &mut program.body {
        promotion.visit_statement(statement);
    }
}

struct AsyncPromotion;

impl VisitMut for AsyncPromotion {
    fn visit_function(&mut self, function: &mut Function) {
        walk_function(self, function);
        if function.is_async || function.is_generator {
            return;
        }
        let mut finder = AwaitFinder::default();
        match &mut function.body {
            FunctionBody::Block(statements) => {
                for statement in statements {
                    finder.visit_statement(statement);
                }
            }
            FunctionBody::Expression(expression) => finder.visit_expression(expression),
        }
        function.is_async = finder.found;
    }
}

/// Looks for `await` in one function body, nested functions excluded.
#[derive(Default)]
struct AwaitFinder {
    found: bool,
}

impl VisitMut for AwaitFinder {
    fn visit_statement(&mut self, statement: &mut Statement) {
        if let Statement::ForOf { is_await: true, .. } = statement {
            self.found = true;
            return;
        }
        walk_statement(self, statement);
    }

    fn visit_expression(&mut self, expression: &mut Expression) {
        if let Expression::Await(_) = expression {
            self.found = true;
            return;
        }
        walk_expression(self, expression);
    }

    fn visit_function(&mut self, _function: &mut Function) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{PrintOptions, print};
    use crate::parser::parse;

    fn rewrite(code: &str) -> String {
        print(&transform(parse(code).unwrap()), &PrintOptions::default())
    }

    #[test]
    fn test_hooks() {
        let output = rewrite(
            "describe('todo', () => {\n  beforeEach(() => {\n    cy.visit('/')\n  })\n  it('adds', () => {\n    cy.get('.a').click()\n  })\n})",
        );
        assert_eq!(
            output,
            "test.describe('todo', () => {\n  test.beforeEach(async ({ page }) => {\n    await page.goto('/');\n  });\n  test('adds', async ({ page }) => {\n    await page.locator('.a').click();\n  });\n});\n"
        );
    }

    #[test]
    fn test_hook_modifiers() {
        let output = rewrite("context.only('a', function () {\n  it.skip('b', function () {})\n  before(() => {})\n})");
        assert!(output.contains("test.describe.only('a', function () {"));
        assert!(output.contains("test.skip('b', async function ({ page }) {})"));
        assert!(output.contains("test.beforeAll(async () => {})"));
    }

    #[test]
    fn test_globals() {
        assert_eq!(rewrite("const a = Cypress.env('API');"), "const a = process.env['API'];\n");
        assert_eq!(rewrite("if (Cypress.platform === 'win32') {}"), "if (process.platform === 'win32') {}\n");
        assert_eq!(rewrite("foo(this.user);"), "foo(user);\n");
    }

    #[test]
    fn test_globals_in_chain_arguments() {
        assert_eq!(rewrite("cy.visit(Cypress.env('URL'));"), "await page.goto(process.env['URL']);\n");
        assert_eq!(
            rewrite("cy.get('.a').type(Cypress.env('USER'));"),
            "await page.locator('.a').fill(process.env['USER']);\n"
        );
    }

    #[test]
    fn test_nested_chain() {
        assert_eq!(
            rewrite("const title = cy.title();"),
            "const title = await page.title();\n"
        );
        assert_eq!(
            rewrite("foo(cy.get('.a').click());"),
            "foo(await (async () => {\n  await page.locator('.a').click();\n  return page.locator('.a');\n})());\n"
        );
    }

    #[test]
    fn test_idle_chain_keeps_subject() {
        assert_eq!(
            rewrite("cy.get('.a').as('item');\ncy.wait('@item');"),
            "const item = page.locator('.a');\nawait item;\n"
        );
    }

    #[test]
    fn test_promote_async() {
        assert_eq!(
            rewrite("function open() {\n  cy.visit('/')\n  return () => 1\n}"),
            "async function open() {\n  await page.goto('/');\n  return () => 1;\n}\n"
        );
        let mut program = parse("const f = () => () => x;").unwrap();
        promote_async(&mut program);
        assert_eq!(print(&program, &PrintOptions::default()), "const f = () => () => x;\n");
    }

    #[test]
    fn test_untouched_code() {
        let code = "import { x } from './x';\nconst list = [1, 2].map((n) => n * 2);\n";
        assert_eq!(rewrite(code), code);
    }
}
