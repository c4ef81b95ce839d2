use crate::parser::{
    Call, CatchClause, Declaration, Expression, ForHead, Function, FunctionBody, Literal, Member,
    MemberProperty, MethodKind, Pattern, PatternProperty, Program, Property, PropertyKey, Statement,
    SwitchCase, Template, Trivia, binary_precedence, quote,
};
use serde::Deserialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    pub single_quote: bool,
    pub semicolons: bool,
    pub indent_width: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            single_quote: true,
            semicolons: true,
            indent_width: 2,
        }
    }
}

pub fn print(program: &Program, options: &PrintOptions) -> String {
    let mut printer = Printer::new(options);
    printer.statements(&program.body);
    let mut output = printer.output.trim_start_matches('\n').to_string();
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

pub fn print_expression(expression: &Expression, options: &PrintOptions) -> String {
    let mut printer = Printer::new(options);
    printer.expression(expression, precedence::SEQUENCE);
    printer.output
}

mod precedence {
    pub const SEQUENCE: u8 = 1;
    pub const ASSIGNMENT: u8 = 2;
    pub const CONDITIONAL: u8 = 3;
    pub const UNARY: u8 = 15;
    pub const UPDATE: u8 = 16;
    pub const CALL: u8 = 17;
    pub const PRIMARY: u8 = 20;
}

fn expression_precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::Sequence(_) => precedence::SEQUENCE,
        Expression::Assignment { .. } | Expression::Spread(_) => precedence::ASSIGNMENT,
        Expression::Function(function) if function.is_arrow => precedence::ASSIGNMENT,
        Expression::Conditional { .. } => precedence::CONDITIONAL,
        Expression::Binary { operator, .. } => binary_precedence(operator).unwrap_or(precedence::CONDITIONAL),
        Expression::Unary { .. } | Expression::Await(_) => precedence::UNARY,
        Expression::Update { prefix: true, .. } => precedence::UNARY,
        Expression::Update { prefix: false, .. } => precedence::UPDATE,
        Expression::Call(_) | Expression::Member(_) | Expression::New { .. } | Expression::TaggedTemplate { .. } => {
            precedence::CALL
        }
        _ => precedence::PRIMARY,
    }
}

/// The expression printed first when `expression` is printed without parentheses.
fn leftmost(expression: &Expression) -> &Expression {
    match expression {
        Expression::Call(Call { callee, .. }) => leftmost(callee),
        Expression::Member(Member { object, .. }) => leftmost(object),
        Expression::TaggedTemplate { tag, .. } => leftmost(tag),
        Expression::Binary { left, .. } => leftmost(left),
        Expression::Assignment { target, .. } => leftmost(target),
        Expression::Conditional { test, .. } => leftmost(test),
        Expression::Update {
            prefix: false,
            argument,
            ..
        } => leftmost(argument),
        Expression::Sequence(expressions) => expressions.first().map_or(expression, leftmost),
        _ => expression,
    }
}

fn is_nullish_mix(parent: &str, child: &Expression) -> bool {
    let Expression::Binary { operator, .. } = child else {
        return false;
    };
    match parent {
        "??" => operator == "||" || operator == "&&",
        "||" | "&&" => operator == "??",
        _ => false,
    }
}

struct Printer<'a> {
    options: &'a PrintOptions,
    output: String,
    indent: usize,
}

impl<'a> Printer<'a> {
    fn new(options: &'a PrintOptions) -> Self {
        Self {
            options,
            output: String::new(),
            indent: 0,
        }
    }

    fn newline(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indent * self.options.indent_width {
            self.output.push(' ');
        }
    }

    fn semicolon(&mut self) {
        if self.options.semicolons {
            self.output.push(';');
        }
    }

    fn string(&mut self, value: &str) {
        let quote_char = if self.options.single_quote {
            // Prefer the quote that needs fewer escapes
            let singles = value.matches('\'').count();
            let doubles = value.matches('"').count();
            if singles > doubles { '"' } else { '\'' }
        } else {
            let singles = value.matches('\'').count();
            let doubles = value.matches('"').count();
            if doubles > singles { '\'' } else { '"' }
        };
        self.output.push_str(&quote(value, quote_char));
    }

    // ------ Statements ------

    /// Prints each statement on its own line, blank lines only between statements.
    fn statements(&mut self, statements: &[Statement]) {
        let mut printed_any = false;
        let mut pending_blank_line = false;
        for statement in statements {
            match statement {
                Statement::Trivia(Trivia::BlankLine) => {
                    pending_blank_line = printed_any;
                }
                Statement::Empty => {}
                statement => {
                    if pending_blank_line {
                        self.output.push('\n');
                        pending_blank_line = false;
                    }
                    self.newline();
                    self.statement(statement);
                    printed_any = true;
                }
            }
        }
    }

    fn block(&mut self, statements: &[Statement]) {
        let is_empty = statements
            .iter()
            .all(|statement| matches!(statement, Statement::Trivia(Trivia::BlankLine) | Statement::Empty));
        if is_empty {
            self.output.push_str("{}");
            return;
        }
        self.output.push('{');
        self.indent += 1;
        self.statements(statements);
        self.indent -= 1;
        self.newline();
        self.output.push('}');
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Trivia(Trivia::Comment(comment)) => self.output.push_str(comment),
            Statement::Trivia(Trivia::BlankLine) | Statement::Empty => self.output.push(';'),
            Statement::Expression(expression) => {
                let start = self.output.len();
                let needs_parentheses = match leftmost(expression) {
                    Expression::Object(_) => true,
                    Expression::Function(function) => !function.is_arrow,
                    _ => false,
                };
                if needs_parentheses {
                    self.output.push('(');
                    self.expression(expression, precedence::SEQUENCE);
                    self.output.push(')');
                } else {
                    self.expression(expression, precedence::SEQUENCE);
                }
                if !self.options.semicolons && self.output[start..].starts_with(['(', '[', '`']) {
                    self.output.insert(start, ';');
                }
                self.semicolon();
            }
            Statement::Declaration(declaration) => {
                self.declaration(declaration);
                self.semicolon();
            }
            Statement::Function(function) => self.function(function),
            Statement::Block(statements) => self.block(statements),
            Statement::If {
                test,
                consequent,
                alternate,
            } => {
                self.output.push_str("if (");
                self.expression(test, precedence::SEQUENCE);
                self.output.push_str(") ");
                self.statement(consequent);
                if let Some(alternate) = alternate {
                    self.output.push_str(" else ");
                    self.statement(alternate);
                }
            }
            Statement::For {
                init,
                test,
                update,
                body,
            } => {
                self.output.push_str("for (");
                if let Some(init) = init {
                    self.for_head(init);
                }
                self.output.push(';');
                if let Some(test) = test {
                    self.output.push(' ');
                    self.expression(test, precedence::SEQUENCE);
                }
                self.output.push(';');
                if let Some(update) = update {
                    self.output.push(' ');
                    self.expression(update, precedence::SEQUENCE);
                }
                self.output.push_str(") ");
                self.statement(body);
            }
            Statement::ForIn { left, right, body } => {
                self.output.push_str("for (");
                self.for_head(left);
                self.output.push_str(" in ");
                self.expression(right, precedence::SEQUENCE);
                self.output.push_str(") ");
                self.statement(body);
            }
            Statement::ForOf {
                left,
                right,
                body,
                is_await,
            } => {
                self.output.push_str(if *is_await { "for await (" } else { "for (" });
                self.for_head(left);
                self.output.push_str(" of ");
                self.expression(right, precedence::ASSIGNMENT);
                self.output.push_str(") ");
                self.statement(body);
            }
            Statement::While { test, body } => {
                self.output.push_str("while (");
                self.expression(test, precedence::SEQUENCE);
                self.output.push_str(") ");
                self.statement(body);
            }
            Statement::DoWhile { body, test } => {
                self.output.push_str("do ");
                self.statement(body);
                self.output.push_str(" while (");
                self.expression(test, precedence::SEQUENCE);
                self.output.push(')');
                self.semicolon();
            }
            Statement::Switch {
                discriminant,
                cases,
            } => {
                self.output.push_str("switch (");
                self.expression(discriminant, precedence::SEQUENCE);
                self.output.push_str(") {");
                self.indent += 1;
                for SwitchCase { test, body } in cases {
                    self.newline();
                    match test {
                        Some(test) => {
                            self.output.push_str("case ");
                            self.expression(test, precedence::SEQUENCE);
                            self.output.push(':');
                        }
                        None => self.output.push_str("default:"),
                    }
                    self.indent += 1;
                    self.statements(body);
                    self.indent -= 1;
                }
                self.indent -= 1;
                self.newline();
                self.output.push('}');
            }
            Statement::Try {
                block,
                handler,
                finalizer,
            } => {
                self.output.push_str("try ");
                self.block(block);
                if let Some(CatchClause { param, body }) = handler {
                    self.output.push_str(" catch ");
                    if let Some(param) = param {
                        self.output.push('(');
                        self.pattern(param);
                        self.output.push_str(") ");
                    }
                    self.block(body);
                }
                if let Some(finalizer) = finalizer {
                    self.output.push_str(" finally ");
                    self.block(finalizer);
                }
            }
            Statement::Return(argument) => {
                self.output.push_str("return");
                if let Some(argument) = argument {
                    self.output.push(' ');
                    self.expression(argument, precedence::SEQUENCE);
                }
                self.semicolon();
            }
            Statement::Throw(argument) => {
                self.output.push_str("throw ");
                self.expression(argument, precedence::SEQUENCE);
                self.semicolon();
            }
            Statement::Break(label) | Statement::Continue(label) => {
                self.output
                    .push_str(if matches!(statement, Statement::Break(_)) { "break" } else { "continue" });
                if let Some(label) = label {
                    self.output.push(' ');
                    self.output.push_str(label);
                }
                self.semicolon();
            }
            Statement::Import(text) => {
                self.output.push_str(text);
                self.semicolon();
            }
            Statement::Export(declaration) => {
                self.output.push_str("export ");
                self.statement(declaration);
            }
            Statement::ExportDefault(expression) => {
                self.output.push_str("export default ");
                self.expression(expression, precedence::ASSIGNMENT);
                self.semicolon();
            }
        }
    }

    fn declaration(&mut self, declaration: &Declaration) {
        self.output.push_str(declaration.kind.as_str());
        self.output.push(' ');
        for (index, declarator) in declaration.declarators.iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            self.pattern(&declarator.target);
            if let Some(init) = &declarator.init {
                self.output.push_str(" = ");
                self.expression(init, precedence::ASSIGNMENT);
            }
        }
    }

    fn for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::Declaration(declaration) => self.declaration(declaration),
            ForHead::Expression(expression) => self.expression(expression, precedence::SEQUENCE),
        }
    }

    fn function(&mut self, function: &Function) {
        if function.is_async {
            self.output.push_str("async ");
        }
        if function.is_arrow {
            self.parameters(&function.params);
            self.output.push_str(" => ");
            match &function.body {
                FunctionBody::Block(statements) => self.block(statements),
                FunctionBody::Expression(body) => {
                    if matches!(leftmost(body), Expression::Object(_)) {
                        self.output.push('(');
                        self.expression(body, precedence::SEQUENCE);
                        self.output.push(')');
                    } else {
                        self.expression(body, precedence::ASSIGNMENT);
                    }
                }
            }
            return;
        }
        self.output.push_str("function");
        if function.is_generator {
            self.output.push('*');
        }
        self.output.push(' ');
        if let Some(name) = &function.name {
            self.output.push_str(name);
        }
        self.parameters(&function.params);
        self.output.push(' ');
        self.function_body(&function.body);
    }

    fn function_body(&mut self, body: &FunctionBody) {
        match body {
            FunctionBody::Block(statements) => self.block(statements),
            FunctionBody::Expression(expression) => {
                self.output.push('{');
                self.indent += 1;
                self.newline();
                self.output.push_str("return ");
                self.expression(expression, precedence::SEQUENCE);
                self.semicolon();
                self.indent -= 1;
                self.newline();
                self.output.push('}');
            }
        }
    }

    fn parameters(&mut self, params: &[Pattern]) {
        self.output.push('(');
        for (index, param) in params.iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            self.pattern(param);
        }
        self.output.push(')');
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(name) => self.output.push_str(name),
            Pattern::Object(properties) => {
                if properties.is_empty() {
                    self.output.push_str("{}");
                    return;
                }
                self.output.push_str("{ ");
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(", ");
                    }
                    match property {
                        PatternProperty::KeyValue { key, value } => {
                            self.property_key(key);
                            self.output.push_str(": ");
                            self.pattern(value);
                        }
                        PatternProperty::Shorthand { name, default } => {
                            self.output.push_str(name);
                            if let Some(default) = default {
                                self.output.push_str(" = ");
                                self.expression(default, precedence::ASSIGNMENT);
                            }
                        }
                        PatternProperty::Rest(pattern) => {
                            self.output.push_str("...");
                            self.pattern(pattern);
                        }
                    }
                }
                self.output.push_str(" }");
            }
            Pattern::Array(elements) => {
                self.output.push('[');
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(", ");
                    }
                    if let Some(element) = element {
                        self.pattern(element);
                    }
                }
                // A trailing hole needs its own comma
                if matches!(elements.last(), Some(None)) {
                    self.output.push(',');
                }
                self.output.push(']');
            }
            Pattern::Default { target, value } => {
                self.pattern(target);
                self.output.push_str(" = ");
                self.expression(value, precedence::ASSIGNMENT);
            }
            Pattern::Rest(pattern) => {
                self.output.push_str("...");
                self.pattern(pattern);
            }
            Pattern::Expression(expression) => self.expression(expression, precedence::CALL),
        }
    }

    // ------ Expressions ------

    /// Prints `expression`, in parentheses when it binds looser than `min_precedence`.
    fn expression(&mut self, expression: &Expression, min_precedence: u8) {
        if expression_precedence(expression) < min_precedence {
            self.output.push('(');
            self.expression_inner(expression);
            self.output.push(')');
        } else {
            self.expression_inner(expression);
        }
    }

    fn expression_inner(&mut self, expression: &Expression) {
        match expression {
            Expression::Identifier(name) => self.output.push_str(name),
            Expression::This => self.output.push_str("this"),
            Expression::Literal(literal) => self.literal(literal),
            Expression::Template(template) => self.template(template),
            Expression::TaggedTemplate { tag, template } => {
                self.expression(tag, precedence::CALL);
                self.template(template);
            }
            Expression::Array(elements) => {
                self.output.push('[');
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(", ");
                    }
                    if let Some(element) = element {
                        self.expression(element, precedence::ASSIGNMENT);
                    }
                }
                if matches!(elements.last(), Some(None)) {
                    self.output.push(',');
                }
                self.output.push(']');
            }
            Expression::Object(properties) => self.object(properties),
            Expression::Function(function) => self.function(function),
            Expression::Call(Call {
                callee,
                arguments,
                optional,
                ..
            }) => {
                self.expression(callee, precedence::CALL);
                if *optional {
                    self.output.push_str("?.");
                }
                self.arguments(arguments);
            }
            Expression::New { callee, arguments } => {
                self.output.push_str("new ");
                if matches!(leftmost(callee), Expression::Call(_)) || matches!(**callee, Expression::Call(_)) {
                    self.output.push('(');
                    self.expression(callee, precedence::SEQUENCE);
                    self.output.push(')');
                } else {
                    self.expression(callee, precedence::CALL);
                }
                self.arguments(arguments);
            }
            Expression::Member(Member {
                object,
                property,
                optional,
            }) => {
                let is_integer = matches!(&**object, Expression::Literal(Literal::Number(raw)) if raw.chars().all(|c| c.is_ascii_digit()));
                if is_integer {
                    self.output.push('(');
                    self.expression(object, precedence::SEQUENCE);
                    self.output.push(')');
                } else {
                    self.expression(object, precedence::CALL);
                }
                match property {
                    MemberProperty::Identifier(name) => {
                        self.output.push_str(if *optional { "?." } else { "." });
                        self.output.push_str(name);
                    }
                    MemberProperty::Computed(property) => {
                        if *optional {
                            self.output.push_str("?.");
                        }
                        self.output.push('[');
                        self.expression(property, precedence::SEQUENCE);
                        self.output.push(']');
                    }
                }
            }
            Expression::Unary { operator, argument } => {
                self.output.push_str(operator);
                let is_word = operator.chars().all(|c| c.is_ascii_alphabetic());
                // `- -x` must not become `--x`
                let repeats_sign = matches!(
                    &**argument,
                    Expression::Unary { operator: inner, .. } | Expression::Update { operator: inner, prefix: true, .. }
                        if (operator == "-" || operator == "+") && inner.starts_with(operator.as_str())
                );
                if is_word {
                    self.output.push(' ');
                }
                if repeats_sign {
                    self.output.push('(');
                    self.expression(argument, precedence::SEQUENCE);
                    self.output.push(')');
                } else {
                    self.expression(argument, precedence::UNARY);
                }
            }
            Expression::Update {
                operator,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.output.push_str(operator);
                    self.expression(argument, precedence::UPDATE);
                } else {
                    self.expression(argument, precedence::CALL);
                    self.output.push_str(operator);
                }
            }
            Expression::Binary { operator, left, right } => {
                let precedence = binary_precedence(operator).unwrap_or(precedence::CONDITIONAL);
                let (left_min, right_min) = if operator == "**" {
                    (precedence::UPDATE, precedence)
                } else {
                    (precedence, precedence + 1)
                };
                self.binary_operand(operator, left, left_min);
                let _ = write!(self.output, " {operator} ");
                self.binary_operand(operator, right, right_min);
            }
            Expression::Assignment {
                operator,
                target,
                value,
            } => {
                self.expression(target, precedence::CALL);
                let _ = write!(self.output, " {operator} ");
                self.expression(value, precedence::ASSIGNMENT);
            }
            Expression::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test, precedence::CONDITIONAL + 1);
                self.output.push_str(" ? ");
                self.expression(consequent, precedence::ASSIGNMENT);
                self.output.push_str(" : ");
                self.expression(alternate, precedence::ASSIGNMENT);
            }
            Expression::Sequence(expressions) => {
                for (index, expression) in expressions.iter().enumerate() {
                    if index > 0 {
                        self.output.push_str(", ");
                    }
                    self.expression(expression, precedence::ASSIGNMENT);
                }
            }
            Expression::Await(argument) => {
                self.output.push_str("await ");
                self.expression(argument, precedence::UNARY);
            }
            Expression::Spread(argument) => {
                self.output.push_str("...");
                self.expression(argument, precedence::ASSIGNMENT);
            }
        }
    }

    fn binary_operand(&mut self, operator: &str, operand: &Expression, min_precedence: u8) {
        // `??` cannot be mixed with `||` or `&&` without parentheses
        if is_nullish_mix(operator, operand) {
            self.output.push('(');
            self.expression(operand, precedence::SEQUENCE);
            self.output.push(')');
        } else {
            self.expression(operand, min_precedence);
        }
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::String(value) => self.string(value),
            Literal::Number(raw) => self.output.push_str(raw),
            Literal::Boolean(value) => self.output.push_str(if *value { "true" } else { "false" }),
            Literal::Null => self.output.push_str("null"),
            Literal::Regex { pattern, flags } => {
                let pattern = if pattern.is_empty() { "(?:)" } else { pattern.as_str() };
                let _ = write!(self.output, "/{pattern}/{flags}");
            }
        }
    }

    fn template(&mut self, template: &Template) {
        self.output.push('`');
        for (index, quasi) in template.quasis.iter().enumerate() {
            self.output.push_str(quasi);
            if let Some(expression) = template.expressions.get(index) {
                self.output.push_str("${");
                self.expression(expression, precedence::SEQUENCE);
                self.output.push('}');
            }
        }
        self.output.push('`');
    }

    fn arguments(&mut self, arguments: &[Expression]) {
        self.output.push('(');
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            self.expression(argument, precedence::ASSIGNMENT);
        }
        self.output.push(')');
    }

    fn object(&mut self, properties: &[Property]) {
        if properties.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{ ");
        for (index, property) in properties.iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            match property {
                Property::KeyValue { key, value } => {
                    self.property_key(key);
                    self.output.push_str(": ");
                    self.expression(value, precedence::ASSIGNMENT);
                }
                Property::Shorthand(name) => self.output.push_str(name),
                Property::Method { key, kind, function } => {
                    match kind {
                        MethodKind::Getter => self.output.push_str("get "),
                        MethodKind::Setter => self.output.push_str("set "),
                        MethodKind::Method => {
                            if function.is_async {
                                self.output.push_str("async ");
                            }
                            if function.is_generator {
                                self.output.push('*');
                            }
                        }
                    }
                    self.property_key(key);
                    self.parameters(&function.params);
                    self.output.push(' ');
                    self.function_body(&function.body);
                }
                Property::Spread(argument) => {
                    self.output.push_str("...");
                    self.expression(argument, precedence::ASSIGNMENT);
                }
            }
        }
        self.output.push_str(" }");
    }

    fn property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Identifier(name) => self.output.push_str(name),
            PropertyKey::String(value) => self.string(value),
            PropertyKey::Number(raw) => self.output.push_str(raw),
            PropertyKey::Computed(expression) => {
                self.output.push('[');
                self.expression(expression, precedence::ASSIGNMENT);
                self.output.push(']');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn reprint(code: &str) -> String {
        print(&parse(code).unwrap(), &PrintOptions::default())
    }

    #[test]
    fn test_reprint_statements() {
        assert_eq!(reprint("const a = 1\nfoo(a, \"b\")"), "const a = 1;\nfoo(a, 'b');\n");
        assert_eq!(
            reprint("if (a) { b() } else c()"),
            "if (a) {\n  b();\n} else c();\n"
        );
    }

    #[test]
    fn test_nested_blocks_are_indented() {
        assert_eq!(
            reprint("describe('a', () => {\n  it('b', async ({ page }) => {\n    await page.goto('/')\n  })\n})"),
            "describe('a', () => {\n  it('b', async ({ page }) => {\n    await page.goto('/');\n  });\n});\n"
        );
    }

    #[test]
    fn test_parentheses_follow_precedence() {
        assert_eq!(reprint("(a + b) * c"), "(a + b) * c;\n");
        assert_eq!(reprint("a + b * c"), "a + b * c;\n");
        assert_eq!(reprint("(await x).y"), "(await x).y;\n");
        assert_eq!(reprint("(async () => 1)()"), "(async () => 1)();\n");
        assert_eq!(reprint("a ?? (b || c)"), "a ?? (b || c);\n");
        assert_eq!(reprint("- (-a)"), "-(-a);\n");
    }

    #[test]
    fn test_object_literals_in_ambiguous_positions() {
        assert_eq!(reprint("x = () => ({ a: 1 })"), "x = () => ({ a: 1 });\n");
        assert_eq!(reprint("({ a } = b)"), "({ a } = b);\n");
    }

    #[test]
    fn test_strings_prefer_single_quotes() {
        assert_eq!(reprint(r#"f("it's")"#), "f(\"it's\");\n");
        assert_eq!(reprint(r#"f("a\nb")"#), "f('a\\nb');\n");
    }

    #[test]
    fn test_comments_and_blank_lines() {
        assert_eq!(
            reprint("// one\na()\n\n\n// two\nb()\n"),
            "// one\na();\n\n// two\nb();\n"
        );
    }

    #[test]
    fn test_options() {
        let options = PrintOptions {
            single_quote: false,
            semicolons: false,
            indent_width: 4,
        };
        let program = parse("if (a) { b('x') }\n[1].map(f)").unwrap();
        assert_eq!(print(&program, &options), "if (a) {\n    b(\"x\")\n}\n;[1].map(f)\n");
    }

    #[test]
    fn test_print_expression() {
        let expression = Expression::method_call(
            Expression::identifier("page"),
            "locator",
            vec![Expression::string(".a")],
        );
        assert_eq!(print_expression(&expression, &PrintOptions::default()), "page.locator('.a')");
    }
}
