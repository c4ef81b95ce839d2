use super::{
    Call, Declaration, Expression, ForHead, Function, FunctionBody, Member, MemberProperty, Pattern,
    PatternProperty, Property, PropertyKey, Statement,
};

/// Mutable tree walk, override a `visit_*` method and call the matching
/// `walk_*` function to keep descending.
pub trait VisitMut {
    fn visit_statement(&mut self, statement: &mut Statement) {
        walk_statement(self, statement);
    }

    fn visit_expression(&mut self, expression: &mut Expression) {
        walk_expression(self, expression);
    }

    fn visit_function(&mut self, function: &mut Function) {
        walk_function(self, function);
    }

    fn visit_pattern(&mut self, pattern: &mut Pattern) {
        walk_pattern(self, pattern);
    }
}

pub fn walk_statements<V: VisitMut + ?Sized>(visitor: &mut V, statements: &mut [Statement]) {
    for statement in statements {
        visitor.visit_statement(statement);
    }
}

pub fn walk_statement<V: VisitMut + ?Sized>(visitor: &mut V, statement: &mut Statement) {
    match statement {
        Statement::Trivia(_)
        | Statement::Import(_)
        | Statement::Break(_)
        | Statement::Continue(_)
        | Statement::Empty => {}
        Statement::Expression(expression)
        | Statement::Throw(expression)
        | Statement::ExportDefault(expression) => visitor.visit_expression(expression),
        Statement::Return(argument) => {
            if let Some(argument) = argument {
                visitor.visit_expression(argument);
            }
        }
        Statement::Declaration(declaration) => walk_declaration(visitor, declaration),
        Statement::Function(function) => visitor.visit_function(function),
        Statement::Block(body) => walk_statements(visitor, body),
        Statement::If {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expression(test);
            visitor.visit_statement(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_statement(alternate);
            }
        }
        Statement::For {
            init,
            test,
            update,
            body,
        } => {
            if let Some(init) = init {
                walk_for_head(visitor, init);
            }
            for expression in [test, update].into_iter().flatten() {
                visitor.visit_expression(expression);
            }
            visitor.visit_statement(body);
        }
        Statement::ForIn { left, right, body } | Statement::ForOf { left, right, body, .. } => {
            walk_for_head(visitor, left);
            visitor.visit_expression(right);
            visitor.visit_statement(body);
        }
        Statement::While { test, body } | Statement::DoWhile { body, test } => {
            visitor.visit_expression(test);
            visitor.visit_statement(body);
        }
        Statement::Switch {
            discriminant,
            cases,
        } => {
            visitor.visit_expression(discriminant);
            for case in cases {
                if let Some(test) = &mut case.test {
                    visitor.visit_expression(test);
                }
                walk_statements(visitor, &mut case.body);
            }
        }
        Statement::Try {
            block,
            handler,
            finalizer,
        } => {
            walk_statements(visitor, block);
            if let Some(handler) = handler {
                if let Some(param) = &mut handler.param {
                    visitor.visit_pattern(param);
                }
                walk_statements(visitor, &mut handler.body);
            }
            if let Some(finalizer) = finalizer {
                walk_statements(visitor, finalizer);
            }
        }
        Statement::Export(declaration) => visitor.visit_statement(declaration),
    }
}

fn walk_declaration<V: VisitMut + ?Sized>(visitor: &mut V, declaration: &mut Declaration) {
    for declarator in &mut declaration.declarators {
        visitor.visit_pattern(&mut declarator.target);
        if let Some(init) = &mut declarator.init {
            visitor.visit_expression(init);
        }
    }
}

fn walk_for_head<V: VisitMut + ?Sized>(visitor: &mut V, head: &mut ForHead) {
    match head {
        ForHead::Declaration(declaration) => walk_declaration(visitor, declaration),
        ForHead::Expression(expression) => visitor.visit_expression(expression),
    }
}

pub fn walk_expression<V: VisitMut + ?Sized>(visitor: &mut V, expression: &mut Expression) {
    match expression {
        Expression::Identifier(_) | Expression::This | Expression::Literal(_) => {}
        Expression::Template(template) => {
            for expression in &mut template.expressions {
                visitor.visit_expression(expression);
            }
        }
        Expression::TaggedTemplate { tag, template } => {
            visitor.visit_expression(tag);
            for expression in &mut template.expressions {
                visitor.visit_expression(expression);
            }
        }
        Expression::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                visitor.visit_expression(element);
            }
        }
        Expression::Object(properties) => {
            for property in properties {
                match property {
                    Property::KeyValue { key, value } => {
                        walk_property_key(visitor, key);
                        visitor.visit_expression(value);
                    }
                    Property::Shorthand(_) => {}
                    Property::Method { key, function, .. } => {
                        walk_property_key(visitor, key);
                        visitor.visit_function(function);
                    }
                    Property::Spread(argument) => visitor.visit_expression(argument),
                }
            }
        }
        Expression::Function(function) => visitor.visit_function(function),
        Expression::Call(Call {
            callee, arguments, ..
        })
        | Expression::New { callee, arguments } => {
            visitor.visit_expression(callee);
            for argument in arguments {
                visitor.visit_expression(argument);
            }
        }
        Expression::Member(Member {
            object, property, ..
        }) => {
            visitor.visit_expression(object);
            if let MemberProperty::Computed(property) = property {
                visitor.visit_expression(property);
            }
        }
        Expression::Unary { argument, .. }
        | Expression::Update { argument, .. }
        | Expression::Await(argument)
        | Expression::Spread(argument) => visitor.visit_expression(argument),
        Expression::Binary { left, right, .. } => {
            visitor.visit_expression(left);
            visitor.visit_expression(right);
        }
        Expression::Assignment { target, value, .. } => {
            visitor.visit_expression(target);
            visitor.visit_expression(value);
        }
        Expression::Conditional {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expression(test);
            visitor.visit_expression(consequent);
            visitor.visit_expression(alternate);
        }
        Expression::Sequence(expressions) => {
            for expression in expressions {
                visitor.visit_expression(expression);
            }
        }
    }
}

fn walk_property_key<V: VisitMut + ?Sized>(visitor: &mut V, key: &mut PropertyKey) {
    if let PropertyKey::Computed(expression) = key {
        visitor.visit_expression(expression);
    }
}

pub fn walk_function<V: VisitMut + ?Sized>(visitor: &mut V, function: &mut Function) {
    for param in &mut function.params {
        visitor.visit_pattern(param);
    }
    match &mut function.body {
        FunctionBody::Block(statements) => walk_statements(visitor, statements),
        FunctionBody::Expression(expression) => visitor.visit_expression(expression),
    }
}

pub fn walk_pattern<V: VisitMut + ?Sized>(visitor: &mut V, pattern: &mut Pattern) {
    match pattern {
        Pattern::Identifier(_) => {}
        Pattern::Object(properties) => {
            for property in properties {
                match property {
                    PatternProperty::KeyValue { key, value } => {
                        walk_property_key(visitor, key);
                        visitor.visit_pattern(value);
                    }
                    PatternProperty::Shorthand { default, .. } => {
                        if let Some(default) = default {
                            visitor.visit_expression(default);
                        }
                    }
                    PatternProperty::Rest(pattern) => visitor.visit_pattern(pattern),
                }
            }
        }
        Pattern::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                visitor.visit_pattern(element);
            }
        }
        Pattern::Default { target, value } => {
            visitor.visit_pattern(target);
            visitor.visit_expression(value);
        }
        Pattern::Rest(pattern) => visitor.visit_pattern(pattern),
        Pattern::Expression(expression) => visitor.visit_expression(expression),
    }
}
