use chumsky::{input::ValueInput, pratt::*, prelude::*};
use std::fmt;
use std::iter;
use std::ops::Range;

mod ast;
pub use ast::*;

mod layout;
use layout::layout;

mod lexer;
pub use lexer::{Token, lex};

mod literal;
pub use literal::{escape_for_regex, quote, unescape};

mod visit;
pub use visit::{VisitMut, walk_expression, walk_function, walk_pattern, walk_statement, walk_statements};

pub type Span = SimpleSpan;
pub type ParseError<'code, T> = Rich<'code, T, Span>;

type Extra<'code> = extra::Err<ParseError<'code, Token<'code>>>;

#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub span: Span,
    pub node: T,
}

/// Parses a whole source file.
pub fn parse(code: &str) -> Result<Program, Vec<ParseError<'_, Token<'_>>>> {
    let tokens = match lex(code) {
        Ok(tokens) => layout(tokens),
        Err(errors) => return Err(detached(errors)),
    };
    let (statements, _) = grammar(code);
    statements
        .then_ignore(end())
        .map(|body| Program { body })
        .parse(tokens.map(Span::from(code.len()..code.len()), |Spanned { node, span }| (node, span)))
        .into_result()
        .map_err(detached)
}

/// Errors that no longer borrow the tokens they were reported on.
fn detached<'a, 'b, T: fmt::Display, U>(errors: Vec<ParseError<'a, T>>) -> Vec<ParseError<'b, U>> {
    errors
        .into_iter()
        .map(|error| ParseError::custom(*error.span(), error.to_string()))
        .collect()
}

/// Binding power of binary operators, higher binds tighter.
pub fn binary_precedence(operator: &str) -> Option<u8> {
    Some(match operator {
        "??" | "||" => 4,
        "&&" => 5,
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "==" | "!=" | "===" | "!==" => 9,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 10,
        "<<" | ">>" | ">>>" => 11,
        "+" | "-" => 12,
        "*" | "/" | "%" => 13,
        "**" => 14,
        _ => return None,
    })
}

fn is_assignment_operator(operator: &str) -> bool {
    matches!(
        operator,
        "=" | "+="
            | "-="
            | "*="
            | "/="
            | "%="
            | "**="
            | "<<="
            | ">>="
            | ">>>="
            | "&="
            | "|="
            | "^="
            | "&&="
            | "||="
            | "??="
    )
}

/// Words that can never name a variable.
fn is_reserved(word: &str) -> bool {
    matches!(
        word,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "in"
            | "instanceof"
            | "new"
            | "null"
            | "return"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
    )
}

enum Suffix {
    Member { name: String, optional: bool },
    Computed { property: Expression, optional: bool },
    Call { arguments: Vec<Expression>, optional: bool },
    TaggedTemplate(Template),
}

impl Suffix {
    fn apply(self, object: Expression) -> Expression {
        match self {
            Self::Member { name, optional } => Expression::Member(Member {
                object: Box::new(object),
                property: MemberProperty::Identifier(name),
                optional,
            }),
            Self::Computed { property, optional } => Expression::Member(Member {
                object: Box::new(object),
                property: MemberProperty::Computed(Box::new(property)),
                optional,
            }),
            Self::Call { arguments, optional } => Expression::Call(Call {
                callee: Box::new(object),
                arguments,
                optional,
                processed: false,
            }),
            Self::TaggedTemplate(template) => Expression::TaggedTemplate {
                tag: Box::new(object),
                template,
            },
        }
    }
}

fn method(
    is_async: bool,
    kind: MethodKind,
    is_generator: bool,
    key: PropertyKey,
    params: Vec<Pattern>,
    body: Vec<Statement>,
) -> Property {
    Property::Method {
        key,
        kind,
        function: Function {
            name: None,
            params,
            body: FunctionBody::Block(body),
            is_async,
            is_arrow: false,
            is_generator,
        },
    }
}

/// Statement list and expression parsers over laid out tokens of `code`.
fn grammar<'code, I>(
    code: &'code str,
) -> (
    impl Parser<'code, I, Vec<Statement>, Extra<'code>> + Clone,
    impl Parser<'code, I, Expression, Extra<'code>> + Clone,
)
where
    I: ValueInput<'code, Token = Token<'code>, Span = Span>,
{
    let mut statement = Recursive::declare();
    let mut assignment = Recursive::declare();

    let newlines = just(Token::Newline).repeated();
    let skip_trivia = any().filter(|token: &Token| token.is_trivia()).repeated();
    let comma = just(Token::Comma);
    let colon = just(Token::Colon);
    let ellipsis = just(Token::Ellipsis);
    let bracket_round_open = just(Token::BracketRoundOpen);
    let bracket_round_close = just(Token::BracketRoundClose);
    let bracket_curly_open = just(Token::BracketCurlyOpen);
    let bracket_curly_close = just(Token::BracketCurlyClose);
    let bracket_square_open = just(Token::BracketSquareOpen);
    let bracket_square_close = just(Token::BracketSquareClose);
    let keyword = |word: &'code str| just(Token::Identifier(word));
    let operator = |symbol: &'code str| just(Token::Operator(symbol));

    let name = select! { Token::Identifier(name) => name.to_string() };
    let identifier = select! { Token::Identifier(name) if !is_reserved(name) => name.to_string() };
    let string = select! { Token::Text(raw) => unescape(raw) };
    let number = select! { Token::Number(raw) => raw.to_string() };
    let trivia = select! {
        Token::Comment(comment) => Trivia::Comment(comment.to_string()),
        Token::BlankLine => Trivia::BlankLine,
    };
    let template = select! { Token::Template(raw) => raw }
        .try_map(move |raw, span| template_literal(code, raw, span));

    let terminator = choice((
        just(Token::Semicolon).ignored(),
        just(Token::Newline).ignored(),
        bracket_curly_close.clone().rewind().ignored(),
        trivia.clone().rewind().ignored(),
        end(),
    ));

    let expression = assignment
        .clone()
        .then(comma.clone().ignore_then(assignment.clone()).repeated().collect::<Vec<_>>())
        .map(|(first, rest): (Expression, Vec<Expression>)| {
            if rest.is_empty() {
                first
            } else {
                Expression::Sequence(iter::once(first).chain(rest).collect())
            }
        });

    let parenthesized = expression
        .clone()
        .delimited_by(bracket_round_open.clone(), bracket_round_close.clone());

    let property_key = choice((
        name.clone().map(PropertyKey::Identifier),
        string.clone().map(PropertyKey::String),
        number.clone().map(PropertyKey::Number),
        assignment
            .clone()
            .delimited_by(bracket_square_open.clone(), bracket_square_close.clone())
            .map(|key| PropertyKey::Computed(Box::new(key))),
    ));

    let default_value = operator("=").ignore_then(assignment.clone());

    // ------ Patterns ------

    let pattern = recursive(|pattern| {
        let element = pattern
            .clone()
            .then(default_value.clone().or_not())
            .map(|(target, value): (Pattern, Option<Expression>)| match value {
                Some(value) => Pattern::Default {
                    target: Box::new(target),
                    value: Box::new(value),
                },
                None => target,
            });

        let object_property = choice((
            ellipsis.clone().ignore_then(pattern.clone()).map(PatternProperty::Rest),
            property_key
                .clone()
                .then_ignore(colon.clone())
                .then(element.clone())
                .map(|(key, value)| PatternProperty::KeyValue { key, value }),
            name.clone().then(default_value.clone().or_not())
                .map(|(name, default)| PatternProperty::Shorthand { name, default }),
        ));

        let object = object_property
            .separated_by(comma.clone())
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(bracket_curly_open.clone(), bracket_curly_close.clone())
            .map(Pattern::Object);

        let array = choice((
            ellipsis
                .clone()
                .ignore_then(pattern.clone())
                .map(|rest| Pattern::Rest(Box::new(rest))),
            element,
        ))
        .or_not()
        .separated_by(comma.clone())
        .collect::<Vec<_>>()
        .delimited_by(bracket_square_open.clone(), bracket_square_close.clone())
        .map(|mut elements| {
            // The slot after a trailing comma is not a hole
            if elements.last().is_some_and(Option::is_none) {
                elements.pop();
            }
            Pattern::Array(elements)
        });

        choice((identifier.clone().map(Pattern::Identifier), object, array))
    });

    let binding_element = pattern
        .clone()
        .then(default_value.clone().or_not())
        .map(|(target, value)| match value {
            Some(value) => Pattern::Default {
                target: Box::new(target),
                value: Box::new(value),
            },
            None => target,
        });

    let parameters = choice((
        ellipsis
            .clone()
            .ignore_then(pattern.clone())
            .map(|rest| Pattern::Rest(Box::new(rest))),
        binding_element,
    ))
    .separated_by(comma.clone())
    .allow_trailing()
    .collect::<Vec<_>>()
    .delimited_by(bracket_round_open.clone(), bracket_round_close.clone());

    // ------ Statement lists ------

    let statement_list = trivia
        .clone()
        .map(Statement::Trivia)
        .or(statement.clone())
        .padded_by(newlines.clone())
        .repeated()
        .collect::<Vec<_>>();

    let block = statement_list
        .clone()
        .delimited_by(bracket_curly_open.clone(), bracket_curly_close.clone());

    // ------ Functions ------

    let function = group((
        keyword("async").or_not(),
        keyword("function"),
        operator("*").or_not(),
        identifier.clone().or_not(),
        parameters.clone(),
        block.clone(),
    ))
    .map(|(is_async, _, generator, name, params, body)| Function {
        name,
        params,
        body: FunctionBody::Block(body),
        is_async: is_async.is_some(),
        is_arrow: false,
        is_generator: generator.is_some(),
    });

    let arrow = group((
        keyword("async").or_not(),
        choice((
            identifier.clone().map(|parameter| vec![Pattern::Identifier(parameter)]),
            parameters.clone(),
        )),
        just(Token::Arrow),
        choice((
            block.clone().map(FunctionBody::Block),
            assignment
                .clone()
                .map(|body| FunctionBody::Expression(Box::new(body))),
        )),
    ))
    .map(|(is_async, params, _, body)| Function {
        name: None,
        params,
        body,
        is_async: is_async.is_some(),
        is_arrow: true,
        is_generator: false,
    });

    // ------ Expressions ------

    let argument = ellipsis
        .clone()
        .ignore_then(assignment.clone())
        .map(|argument| Expression::Spread(Box::new(argument)))
        .or(assignment.clone());

    let arguments = argument
        .clone()
        .separated_by(comma.clone())
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(bracket_round_open.clone(), bracket_round_close.clone());

    let computed = expression
        .clone()
        .delimited_by(bracket_square_open.clone(), bracket_square_close.clone());

    let array = argument
        .or_not()
        .separated_by(comma.clone())
        .collect::<Vec<_>>()
        .delimited_by(bracket_square_open.clone(), bracket_square_close.clone())
        .map(|mut elements| {
            if elements.last().is_some_and(Option::is_none) {
                elements.pop();
            }
            Expression::Array(elements)
        });

    let method_kind = choice((
        keyword("get").to(MethodKind::Getter),
        keyword("set").to(MethodKind::Setter),
    ));

    let property = choice((
        ellipsis.clone().ignore_then(assignment.clone()).map(Property::Spread),
        group((
            keyword("async").or_not(),
            method_kind.or_not(),
            operator("*").or_not(),
            property_key.clone(),
            parameters.clone(),
            block.clone(),
        ))
        .map(|(is_async, kind, generator, key, params, body)| {
            method(
                is_async.is_some(),
                kind.unwrap_or(MethodKind::Method),
                generator.is_some(),
                key,
                params,
                body,
            )
        }),
        // `get() {}` and friends, where the modifier is the key itself
        group((property_key.clone(), parameters.clone(), block.clone()))
            .map(|(key, params, body)| method(false, MethodKind::Method, false, key, params, body)),
        property_key
            .clone()
            .then_ignore(colon.clone())
            .then(assignment.clone())
            .map(|(key, value)| Property::KeyValue { key, value }),
        name.clone().map(Property::Shorthand),
    ));

    let object = property
        .padded_by(skip_trivia.clone())
        .separated_by(comma.clone())
        .allow_trailing()
        .collect::<Vec<_>>()
        .then_ignore(skip_trivia.clone())
        .delimited_by(bracket_curly_open.clone(), bracket_curly_close.clone())
        .map(Expression::Object);

    let atom = choice((
        keyword("this").to(Expression::This),
        keyword("true").to(Expression::boolean(true)),
        keyword("false").to(Expression::boolean(false)),
        keyword("null").to(Expression::Literal(Literal::Null)),
        function.clone().map(|function| Expression::Function(Box::new(function))),
        keyword("class").try_map(|_, span| {
            Err::<Expression, _>(ParseError::custom(span, "Class expressions are not supported"))
        }),
        identifier.clone().map(Expression::Identifier),
        number.clone().map(Expression::number),
        string.clone().map(Expression::string),
        select! { Token::Regex { pattern, flags } => Expression::regex(pattern, flags) },
        template.clone().map(Expression::Template),
        parenthesized.clone(),
        array,
        object,
    ))
    .boxed();

    let new = keyword("new")
        .ignore_then(
            atom.clone().foldl(
                choice((
                    just(Token::Dot)
                        .ignore_then(name.clone())
                        .map(|name| Suffix::Member { name, optional: false }),
                    computed.clone().map(|property| Suffix::Computed {
                        property,
                        optional: false,
                    }),
                ))
                .repeated(),
                |callee, suffix| suffix.apply(callee),
            ),
        )
        .then(arguments.clone().or_not())
        .map(|(callee, arguments)| Expression::New {
            callee: Box::new(callee),
            arguments: arguments.unwrap_or_default(),
        });

    let suffix = choice((
        just(Token::Dot)
            .ignore_then(name.clone())
            .map(|name| Suffix::Member { name, optional: false }),
        just(Token::QuestionDot).ignore_then(choice((
            arguments.clone().map(|arguments| Suffix::Call {
                arguments,
                optional: true,
            }),
            computed.clone().map(|property| Suffix::Computed {
                property,
                optional: true,
            }),
            name.clone().map(|name| Suffix::Member { name, optional: true }),
        ))),
        computed.map(|property| Suffix::Computed {
            property,
            optional: false,
        }),
        arguments.clone().map(|arguments| Suffix::Call {
            arguments,
            optional: false,
        }),
        template.map(Suffix::TaggedTemplate),
    ));

    let call_member = new
        .or(atom)
        .foldl(suffix.repeated(), |object, suffix| suffix.apply(object))
        .boxed();

    let operation = call_member.clone().pratt((
        infix(left(4), select! { Token::Operator(op @ ("??" | "||")) => op }, |left, op, right, _| {
            Expression::binary(op, left, right)
        }),
        infix(left(5), operator("&&").to("&&"), |left, op, right, _| {
            Expression::binary(op, left, right)
        }),
        infix(left(6), operator("|").to("|"), |left, op, right, _| {
            Expression::binary(op, left, right)
        }),
        infix(left(7), operator("^").to("^"), |left, op, right, _| {
            Expression::binary(op, left, right)
        }),
        infix(left(8), operator("&").to("&"), |left, op, right, _| {
            Expression::binary(op, left, right)
        }),
        infix(
            left(9),
            select! { Token::Operator(op @ ("==" | "!=" | "===" | "!==")) => op },
            |left, op, right, _| Expression::binary(op, left, right),
        ),
        infix(
            left(10),
            select! {
                Token::Operator(op @ ("<" | ">" | "<=" | ">=")) => op,
                Token::Identifier(op @ ("instanceof" | "in")) => op,
            },
            |left, op, right, _| Expression::binary(op, left, right),
        ),
        infix(left(11), select! { Token::Operator(op @ ("<<" | ">>" | ">>>")) => op }, |left, op, right, _| {
            Expression::binary(op, left, right)
        }),
        infix(left(12), select! { Token::Operator(op @ ("+" | "-")) => op }, |left, op, right, _| {
            Expression::binary(op, left, right)
        }),
        infix(left(13), select! { Token::Operator(op @ ("*" | "/" | "%")) => op }, |left, op, right, _| {
            Expression::binary(op, left, right)
        }),
        infix(right(14), operator("**").to("**"), |left, op, right, _| {
            Expression::binary(op, left, right)
        }),
        prefix(
            15,
            select! {
                Token::Operator(op @ ("!" | "-" | "+" | "~")) => op,
                Token::Identifier(op @ ("typeof" | "void" | "delete")) => op,
            },
            |op: &str, argument, _| Expression::Unary {
                operator: op.to_string(),
                argument: Box::new(argument),
            },
        ),
        prefix(15, keyword("await"), |_, argument, _| {
            Expression::Await(Box::new(argument))
        }),
        prefix(
            15,
            select! { Token::Operator(op @ ("++" | "--")) => op },
            |op: &str, argument, _| Expression::Update {
                operator: op.to_string(),
                prefix: true,
                argument: Box::new(argument),
            },
        ),
        postfix(
            16,
            select! { Token::Operator(op @ ("++" | "--")) => op },
            |argument, op: &str, _| Expression::Update {
                operator: op.to_string(),
                prefix: false,
                argument: Box::new(argument),
            },
        ),
    ));

    let conditional = operation
        .then(
            just(Token::Question)
                .ignore_then(assignment.clone())
                .then_ignore(colon.clone())
                .then(assignment.clone())
                .or_not(),
        )
        .map(|(test, branches)| match branches {
            Some((consequent, alternate)) => Expression::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            None => test,
        });

    let assignment_operator =
        select! { Token::Operator(op) if is_assignment_operator(op) => op.to_string() };

    assignment.define(
        choice((
            arrow.map(|function| Expression::Function(Box::new(function))),
            conditional
                .then(assignment_operator.then(assignment.clone()).or_not())
                .map(|(target, value)| match value {
                    Some((operator, value)) => Expression::Assignment {
                        operator,
                        target: Box::new(target),
                        value: Box::new(value),
                    },
                    None => target,
                }),
        ))
        .boxed(),
    );

    // ------ Statements ------

    let declaration_kind = select! {
        Token::Identifier("var") => DeclarationKind::Var,
        Token::Identifier("let") => DeclarationKind::Let,
        Token::Identifier("const") => DeclarationKind::Const,
    };

    let declaration = declaration_kind
        .clone()
        .then(
            pattern
                .clone()
                .then(default_value.or_not())
                .map(|(target, init)| Declarator { target, init })
                .separated_by(comma.clone())
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .map(|(kind, declarators)| Declaration { kind, declarators });

    let if_statement = keyword("if")
        .ignore_then(parenthesized.clone())
        .then(statement.clone())
        .then(
            skip_trivia
                .clone()
                .ignore_then(keyword("else"))
                .ignore_then(statement.clone())
                .or_not(),
        )
        .map(|((test, consequent), alternate)| Statement::If {
            test,
            consequent: Box::new(consequent),
            alternate: alternate.map(Box::new),
        });

    let for_left = choice((
        declaration_kind.then(pattern.clone()).map(|(kind, target)| {
            ForHead::Declaration(Declaration {
                kind,
                declarators: vec![Declarator { target, init: None }],
            })
        }),
        call_member.clone().map(ForHead::Expression),
    ));

    let for_in_of = group((
        keyword("for").ignore_then(keyword("await").or_not()),
        bracket_round_open.clone().ignore_then(for_left),
        choice((
            keyword("of").ignore_then(assignment.clone()).map(|right| (true, right)),
            keyword("in").ignore_then(expression.clone()).map(|right| (false, right)),
        ))
        .then_ignore(bracket_round_close.clone()),
        statement.clone(),
    ))
    .map(|(is_await, left, (is_of, right), body)| {
        let body = Box::new(body);
        if is_of {
            Statement::ForOf {
                left,
                right,
                body,
                is_await: is_await.is_some(),
            }
        } else {
            Statement::ForIn { left, right, body }
        }
    });

    let for_classic = keyword("for")
        .ignore_then(
            group((
                choice((
                    declaration.clone().map(ForHead::Declaration),
                    expression.clone().map(ForHead::Expression),
                ))
                .or_not()
                .then_ignore(just(Token::Semicolon)),
                expression.clone().or_not().then_ignore(just(Token::Semicolon)),
                expression.clone().or_not(),
            ))
            .delimited_by(bracket_round_open.clone(), bracket_round_close.clone()),
        )
        .then(statement.clone())
        .map(|((init, test, update), body)| Statement::For {
            init,
            test,
            update,
            body: Box::new(body),
        });

    let while_statement = keyword("while")
        .ignore_then(parenthesized.clone())
        .then(statement.clone())
        .map(|(test, body)| Statement::While {
            test,
            body: Box::new(body),
        });

    let do_while = keyword("do")
        .ignore_then(statement.clone())
        .then_ignore(skip_trivia.clone())
        .then_ignore(keyword("while"))
        .then(parenthesized.clone())
        .then_ignore(just(Token::Semicolon).or_not())
        .map(|(body, test)| Statement::DoWhile {
            body: Box::new(body),
            test,
        });

    let jump = choice((
        keyword("return")
            .ignore_then(expression.clone().or_not())
            .map(Statement::Return),
        keyword("throw").ignore_then(expression.clone()).map(Statement::Throw),
        keyword("break").ignore_then(identifier.clone().or_not()).map(Statement::Break),
        keyword("continue")
            .ignore_then(identifier.clone().or_not())
            .map(Statement::Continue),
    ))
    .then_ignore(terminator.clone());

    let catch = skip_trivia
        .clone()
        .ignore_then(keyword("catch"))
        .ignore_then(
            pattern
                .clone()
                .delimited_by(bracket_round_open.clone(), bracket_round_close.clone())
                .or_not(),
        )
        .then(block.clone())
        .map(|(param, body)| CatchClause { param, body });

    let finally = skip_trivia
        .clone()
        .ignore_then(keyword("finally"))
        .ignore_then(block.clone());

    let try_statement = keyword("try")
        .ignore_then(block.clone())
        .then(catch.or_not())
        .then(finally.or_not())
        .try_map(|((block, handler), finalizer), span| {
            if handler.is_none() && finalizer.is_none() {
                return Err(ParseError::custom(span, "Expected `catch` or `finally` after `try` block"));
            }
            Ok(Statement::Try {
                block,
                handler,
                finalizer,
            })
        });

    let case = choice((
        keyword("case").ignore_then(expression.clone()).map(Some),
        keyword("default").to(None),
    ))
    .then_ignore(colon.clone())
    .then(statement_list.clone())
    .map(|(test, body)| SwitchCase { test, body });

    let switch = keyword("switch")
        .ignore_then(parenthesized.clone())
        .then(
            case.padded_by(skip_trivia.clone())
                .repeated()
                .collect::<Vec<_>>()
                .then_ignore(skip_trivia.clone())
                .delimited_by(bracket_curly_open.clone(), bracket_curly_close.clone()),
        )
        .map(|(discriminant, cases)| Statement::Switch { discriminant, cases });

    // Module declarations are kept as source text, braces may span lines
    let balanced = recursive(|balanced| {
        choice((
            balanced
                .delimited_by(bracket_curly_open.clone(), bracket_curly_close.clone())
                .ignored(),
            any()
                .filter(|token: &Token| {
                    !matches!(token, Token::BracketCurlyOpen | Token::BracketCurlyClose)
                })
                .ignored(),
        ))
        .repeated()
    });
    let verbatim = choice((
        balanced
            .delimited_by(bracket_curly_open.clone(), bracket_curly_close.clone())
            .ignored(),
        any()
            .filter(|token: &Token| {
                !token.is_trivia()
                    && !matches!(
                        token,
                        Token::Semicolon | Token::BracketCurlyOpen | Token::BracketCurlyClose
                    )
            })
            .ignored(),
    ))
    .repeated();
    let source_text = move |span: Span| Statement::Import(code[span.into_range()].to_string());

    let import = keyword("import")
        .then(
            select! {
                Token::Identifier(_) => (),
                Token::Text(_) => (),
                Token::BracketCurlyOpen => (),
                Token::Operator("*") => (),
            }
            .rewind(),
        )
        .then(verbatim.clone())
        .map_with(|_, extra| extra.span())
        .map(source_text)
        .then_ignore(terminator.clone());

    let export_list = keyword("export")
        .then(choice((bracket_curly_open.clone(), operator("*"))).rewind())
        .then(verbatim)
        .map_with(|_, extra| extra.span())
        .map(source_text)
        .then_ignore(terminator.clone());

    let export = keyword("export").ignore_then(choice((
        keyword("default")
            .ignore_then(assignment.clone())
            .then_ignore(terminator.clone())
            .map(Statement::ExportDefault),
        statement.clone().map(|statement| Statement::Export(Box::new(statement))),
    )));

    statement.define(
        choice((
            just(Token::Semicolon).to(Statement::Empty),
            block.clone().map(Statement::Block),
            declaration
                .then_ignore(terminator.clone())
                .map(Statement::Declaration),
            function.map(Statement::Function),
            if_statement,
            for_in_of,
            for_classic,
            while_statement,
            do_while,
            jump,
            try_statement,
            switch,
            import,
            export_list,
            export,
            keyword("class").try_map(|_, span| {
                Err::<Statement, _>(ParseError::custom(span, "Class declarations are not supported"))
            }),
            expression
                .clone()
                .then_ignore(terminator)
                .map(Statement::Expression),
        ))
        .boxed(),
    );

    (statement_list, expression)
}

/// Splits a template literal's raw content into text and parsed substitutions.
fn template_literal<'a>(code: &str, raw: &str, span: Span) -> Result<Template, ParseError<'a, Token<'a>>> {
    let base = span.start + 1;
    let bytes = raw.as_bytes();
    let mut quasis = Vec::new();
    let mut expressions = Vec::new();
    let mut index = 0;
    let mut quasi_start = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => index += 2,
            b'$' if bytes.get(index + 1) == Some(&b'{') => {
                quasis.push(raw[quasi_start..index].to_string());
                let start = index + 2;
                let mut end = start;
                let mut depth = 1;
                while end < bytes.len() {
                    match bytes[end] {
                        b'{' => depth += 1,
                        b'}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    end += 1;
                }
                expressions.push(parse_fragment(code, base + start..base + end)?);
                index = end + 1;
                quasi_start = index.min(bytes.len());
            }
            _ => index += 1,
        }
    }
    quasis.push(raw[quasi_start.min(raw.len())..].to_string());
    Ok(Template { quasis, expressions })
}

/// Parses the expression of a template substitution at `range` in the file.
fn parse_fragment<'a>(code: &str, range: Range<usize>) -> Result<Expression, ParseError<'a, Token<'a>>> {
    let first = |errors: Vec<ParseError<'a, Token<'a>>>| {
        errors
            .into_iter()
            .next()
            .unwrap_or_else(|| ParseError::custom(Span::from(range.clone()), "Invalid template substitution"))
    };
    let tokens = lex(&code[range.clone()])
        .map_err(|errors| first(detached(errors)))?
        .into_iter()
        .map(|Spanned { span, node }| Spanned {
            span: Span::from(range.start + span.start..range.start + span.end),
            node,
        })
        .collect();
    let tokens = layout(tokens);
    let (_, expression) = grammar(code);
    expression
        .then_ignore(end())
        .parse(tokens.map(Span::from(range.end..range.end), |Spanned { node, span }| (node, span)))
        .into_result()
        .map_err(|errors| first(detached(errors)))
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! parse_single_expression {
        ($code:expr) => {{
            let program = parse($code).unwrap();
            match program.body.into_iter().find(|statement| !matches!(statement, Statement::Trivia(_))) {
                Some(Statement::Expression(expression)) => expression,
                other => panic!("Expected expression statement, got {:?}", other),
            }
        }};
    }

    #[test]
    fn test_member_call_chain() {
        let expression = parse_single_expression!("cy.get('.a')\n  .click()");
        let Expression::Call(call) = expression else {
            panic!("Expected call, got {:?}", expression);
        };
        let Expression::Member(member) = *call.callee else {
            panic!("Expected member callee");
        };
        assert_eq!(member.property, MemberProperty::Identifier("click".to_string()));
        assert!(matches!(*member.object, Expression::Call(_)));
    }

    #[test]
    fn test_arrow_functions() {
        let expression = parse_single_expression!("it('a', async ({ page }) => { await page.goto('/') })");
        let Expression::Call(call) = expression else {
            panic!("Expected call, got {:?}", expression);
        };
        let Some(Expression::Function(function)) = call.arguments.get(1) else {
            panic!("Expected arrow function argument, got {:?}", call.arguments);
        };
        assert!(function.is_arrow);
        assert!(function.is_async);
        assert_eq!(function.params, vec![Pattern::destructure(&["page"])]);
        let expression = parse_single_expression!("xs.map(x => x * 2)");
        assert!(matches!(expression, Expression::Call(_)));
        let expression = parse_single_expression!("(a + b) * c");
        assert!(matches!(expression, Expression::Binary { ref operator, .. } if operator == "*"));
    }

    #[test]
    fn test_automatic_semicolon_insertion() {
        let program = parse("const a = 1\nconst b = 2\nfoo()\n").unwrap();
        assert_eq!(program.body.len(), 3);
        assert!(parse("const a = 1 const b = 2").is_err());
        let program = parse("function f() {\n  return\n  1\n}").unwrap();
        let Statement::Function(function) = &program.body[0] else {
            panic!("Expected function, got {:?}", program.body);
        };
        assert_eq!(function.body, FunctionBody::Block(vec![
            Statement::Return(None),
            Statement::Expression(Expression::number("1")),
        ]));
    }

    #[test]
    fn test_precedence() {
        let expression = parse_single_expression!("a + b * c");
        let Expression::Binary { operator, right, .. } = expression else {
            panic!("Expected binary expression");
        };
        assert_eq!(operator, "+");
        assert!(matches!(*right, Expression::Binary { ref operator, .. } if operator == "*"));
        let expression = parse_single_expression!("!a && b");
        assert!(matches!(expression, Expression::Binary { ref operator, ref left, .. }
            if operator == "&&" && matches!(**left, Expression::Unary { .. })));
        let expression = parse_single_expression!("a = b ? c : d");
        assert!(matches!(expression, Expression::Assignment { ref value, .. }
            if matches!(**value, Expression::Conditional { .. })));
    }

    #[test]
    fn test_template_substitutions() {
        let expression = parse_single_expression!("`Hello ${name}, you have ${count + 1} items`");
        let Expression::Template(template) = expression else {
            panic!("Expected template");
        };
        assert_eq!(template.quasis, vec!["Hello ", ", you have ", " items"]);
        assert_eq!(template.expressions.len(), 2);
    }

    #[test]
    fn test_comments_become_trivia() {
        let program = parse("// first\nfoo()\n\n// second\nbar()").unwrap();
        assert_eq!(
            program.body[0],
            Statement::Trivia(Trivia::Comment("// first".to_string()))
        );
        assert!(program.body.contains(&Statement::Trivia(Trivia::BlankLine)));
        assert!(program.body.contains(&Statement::Trivia(Trivia::Comment("// second".to_string()))));
    }

    #[test]
    fn test_statements() {
        let code = r#"
            import { a } from 'b'
            for (const item of items) { if (item) continue; else break }
            for (let i = 0; i < 3; i++) {}
            for (const key in object) {}
            try { run() } catch (error) { log(error) } finally { done() }
            switch (x) { case 1: y(); break; default: z() }
            do { i-- } while (i > 0)
            function named(a, { b = 2 }, ...rest) { return a }
        "#;
        let program = parse(code).unwrap();
        let statements: Vec<_> = program
            .body
            .iter()
            .filter(|statement| !matches!(statement, Statement::Trivia(_)))
            .collect();
        assert!(matches!(statements[0], Statement::Import(text) if text == "import { a } from 'b'"));
        assert!(matches!(statements[1], Statement::ForOf { .. }));
        assert!(matches!(statements[2], Statement::For { .. }));
        assert!(matches!(statements[3], Statement::ForIn { .. }));
        assert!(matches!(statements[4], Statement::Try { .. }));
        assert!(matches!(statements[5], Statement::Switch { cases, .. } if cases.len() == 2));
        assert!(matches!(statements[6], Statement::DoWhile { .. }));
        assert!(matches!(statements[7], Statement::Function(function) if function.params.len() == 3));
    }

    #[test]
    fn test_else_on_next_line() {
        let program = parse("if (a) {\n  b()\n}\nelse {\n  c()\n}").unwrap();
        assert!(matches!(&program.body[0], Statement::If { alternate: Some(_), .. }));
    }

    #[test]
    fn test_object_literal() {
        let expression = parse_single_expression!("foo({\n  // note\n  a: 1,\n  b,\n  ...rest,\n  get c() { return 2 },\n})");
        let Expression::Call(call) = expression else {
            panic!("Expected call");
        };
        let Some(Expression::Object(properties)) = call.arguments.first() else {
            panic!("Expected object argument, got {:?}", call.arguments);
        };
        assert_eq!(properties.len(), 4);
        assert!(matches!(&properties[3], Property::Method { kind: MethodKind::Getter, .. }));
    }

    #[test]
    fn test_error_span() {
        let errors = parse("foo(\n  bar baz)").unwrap_err();
        assert_eq!(errors[0].span().into_range(), 11..14);
    }
}
