use super::{ParseError, Span, Spanned};
use chumsky::prelude::*;
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'code> {
    BracketRoundOpen,
    BracketRoundClose,
    BracketCurlyOpen,
    BracketCurlyClose,
    BracketSquareOpen,
    BracketSquareClose,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Ellipsis,
    QuestionDot,
    Question,
    Arrow,
    Operator(&'code str),
    Number(&'code str),
    // Raw content between the quotes, escapes are resolved by the parser
    Text(&'code str),
    // Raw content between the backticks
    Template(&'code str),
    Regex {
        pattern: &'code str,
        flags: &'code str,
    },
    Identifier(&'code str),
    Comment(&'code str),
    Newline,
    // Two or more line breaks between statements, only produced by `layout`
    BlankLine,
}

impl<'code> Token<'code> {
    pub fn into_cow_str(self) -> Cow<'code, str> {
        match self {
            Self::BracketRoundOpen => "(".into(),
            Self::BracketRoundClose => ")".into(),
            Self::BracketCurlyOpen => "{".into(),
            Self::BracketCurlyClose => "}".into(),
            Self::BracketSquareOpen => "[".into(),
            Self::BracketSquareClose => "]".into(),
            Self::Comma => ",".into(),
            Self::Semicolon => ";".into(),
            Self::Colon => ":".into(),
            Self::Dot => ".".into(),
            Self::Ellipsis => "...".into(),
            Self::QuestionDot => "?.".into(),
            Self::Question => "?".into(),
            Self::Arrow => "=>".into(),
            Self::Operator(operator) => operator.into(),
            Self::Number(number) => number.into(),
            Self::Text(text) => format!("'{text}'").into(),
            Self::Template(template) => format!("`{template}`").into(),
            Self::Regex { pattern, flags } => format!("/{pattern}/{flags}").into(),
            Self::Identifier(identifier) => identifier.into(),
            Self::Comment(comment) => comment.into(),
            Self::Newline => "\n".into(),
            Self::BlankLine => "\n\n".into(),
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_) | Self::Newline | Self::BlankLine)
    }

    /// Whether a `/` following this token starts a regular expression rather than a division.
    fn allows_regex_after(&self) -> bool {
        match self {
            Self::BracketRoundClose
            | Self::BracketSquareClose
            | Self::BracketCurlyClose
            | Self::Number(_)
            | Self::Text(_)
            | Self::Template(_)
            | Self::Regex { .. } => false,
            Self::Operator(operator) => !matches!(*operator, "++" | "--"),
            Self::Identifier(identifier) => matches!(
                *identifier,
                "return"
                    | "typeof"
                    | "instanceof"
                    | "in"
                    | "of"
                    | "new"
                    | "delete"
                    | "void"
                    | "throw"
                    | "case"
                    | "do"
                    | "else"
                    | "yield"
                    | "await"
            ),
            _ => true,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.into_cow_str())
    }
}

/// Splits source code into tokens.
///
/// Each token is parsed separately because whether `/` begins a regular
/// expression literal depends on the previous significant token.
pub fn lex<'code>(code: &'code str) -> Result<Vec<Spanned<Token<'code>>>, Vec<ParseError<'code, char>>> {
    let token = token().lazy();
    let regex = regex_literal().lazy();
    let mut tokens: Vec<Spanned<Token<'code>>> = Vec::new();
    let mut offset = 0;
    loop {
        let rest = &code[offset..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() && c != '\n' && c != '\r');
        if trimmed.is_empty() {
            break;
        }
        let regex_allowed = trimmed.starts_with('/')
            && !trimmed.starts_with("//")
            && !trimmed.starts_with("/*")
            && tokens
                .iter()
                .rev()
                .find(|token| !token.node.is_trivia())
                .map_or(true, |token| token.node.allows_regex_after());
        let result = if regex_allowed {
            regex.parse(rest)
        } else {
            token.parse(rest)
        };
        match result.into_result() {
            Ok(Spanned { span, node }) => {
                let span = Span::from(offset + span.start..offset + span.end);
                offset = span.end;
                tokens.push(Spanned { span, node });
            }
            Err(errors) => {
                return Err(errors
                    .into_iter()
                    .map(|error| {
                        let span = Span::from(offset + error.span().start..offset + error.span().end);
                        ParseError::custom(span, error.to_string())
                    })
                    .collect());
            }
        }
    }
    Ok(tokens)
}

fn token<'code>() -> impl Parser<'code, &'code str, Spanned<Token<'code>>, extra::Err<ParseError<'code, char>>> {
    let bracket = choice((
        just('(').to(Token::BracketRoundOpen),
        just(')').to(Token::BracketRoundClose),
        just('{').to(Token::BracketCurlyOpen),
        just('}').to(Token::BracketCurlyClose),
        just('[').to(Token::BracketSquareOpen),
        just(']').to(Token::BracketSquareClose),
    ));

    let punctuation = choice((
        just("...").to(Token::Ellipsis),
        just("=>").to(Token::Arrow),
        just("?.")
            .then_ignore(any().filter(char::is_ascii_digit).not())
            .to(Token::QuestionDot),
        just(',').to(Token::Comma),
        just(';').to(Token::Semicolon),
        just(':').to(Token::Colon),
    ));

    let operator = choice((
        choice((
            just(">>>="),
            just("==="),
            just("!=="),
            just("**="),
            just("<<="),
            just(">>="),
            just(">>>"),
            just("&&="),
            just("||="),
            just("??="),
        ))
        .ignored(),
        choice((
            just("=="),
            just("!="),
            just("<="),
            just(">="),
            just("&&"),
            just("||"),
            just("??"),
            just("++"),
            just("--"),
            just("+="),
            just("-="),
            just("*="),
            just("/="),
            just("%="),
            just("&="),
            just("|="),
            just("^="),
            just("**"),
            just("<<"),
            just(">>"),
        ))
        .ignored(),
        one_of("=+-*/%<>!~&|^").ignored(),
    ))
    .to_slice()
    .map(Token::Operator);

    let digits = any()
        .filter(char::is_ascii_digit)
        .then(any().filter(|character: &char| character.is_ascii_digit() || *character == '_').repeated());

    let number = choice((
        just('0')
            .then(one_of("xXoObB"))
            .then(any().filter(char::is_ascii_hexdigit).repeated().at_least(1))
            .to_slice(),
        digits
            .clone()
            .then(just('.').then(digits.clone().or_not()).or_not())
            .to_slice(),
        just('.').then(digits.clone()).to_slice(),
    ))
    .then(one_of("eE").then(one_of("+-").or_not()).then(digits).or_not())
    .then(just('n').or_not())
    .to_slice()
    .map(Token::Number);

    let escape = just('\\').then(any()).to_slice();

    let text = choice((
        just('\'')
            .ignore_then(choice((escape.clone(), none_of("\\'\n").to_slice())).repeated().to_slice())
            .then_ignore(just('\'')),
        just('"')
            .ignore_then(choice((escape.clone(), none_of("\\\"\n").to_slice())).repeated().to_slice())
            .then_ignore(just('"')),
    ))
    .map(Token::Text);

    // Substitutions may contain objects and blocks, so braces have to stay balanced
    let substitution_inner = recursive(|substitution_inner| {
        choice((
            just('{').then(substitution_inner).then(just('}')).to_slice(),
            none_of("{}").to_slice(),
        ))
        .repeated()
        .to_slice()
    });

    let template = just('`')
        .ignore_then(
            choice((
                escape,
                just("${").then(substitution_inner).then(just('}')).to_slice(),
                none_of("`\\").to_slice(),
            ))
            .repeated()
            .to_slice(),
        )
        .then_ignore(just('`'))
        .map(Token::Template);

    let identifier = any()
        .filter(|character: &char| character.is_alphabetic() || *character == '_' || *character == '$')
        .then(
            any()
                .filter(|character: &char| character.is_alphanumeric() || *character == '_' || *character == '$')
                .repeated(),
        )
        .to_slice()
        .map(Token::Identifier);

    let comment = choice((
        just("//")
            .then(any().and_is(text::newline().not()).repeated())
            .to_slice(),
        just("/*")
            .then(any().and_is(just("*/").not()).repeated())
            .then(just("*/"))
            .to_slice(),
    ))
    .map(Token::Comment);

    let token = choice((
        comment,
        text::newline().to(Token::Newline),
        bracket,
        punctuation,
        number,
        operator,
        just('?').to(Token::Question),
        just('.').to(Token::Dot),
        text,
        template,
        identifier,
    ));

    text::inline_whitespace().ignore_then(token.map_with(|token, extra| Spanned {
        node: token,
        span: extra.span(),
    }))
}

fn regex_literal<'code>()
-> impl Parser<'code, &'code str, Spanned<Token<'code>>, extra::Err<ParseError<'code, char>>> {
    let escape = just('\\').then(none_of('\n')).to_slice();

    let class = just('[')
        .then(choice((escape.clone(), none_of("]\\\n").to_slice())).repeated())
        .then(just(']'))
        .to_slice();

    let pattern = choice((escape, class, none_of("/\\[\n").to_slice()))
        .repeated()
        .at_least(1)
        .to_slice();

    let flags = any().filter(char::is_ascii_alphabetic).repeated().to_slice();

    text::inline_whitespace().ignore_then(
        just('/')
            .ignore_then(pattern)
            .then_ignore(just('/'))
            .then(flags)
            .map(|(pattern, flags)| Token::Regex { pattern, flags })
            .map_with(|token, extra| Spanned {
                node: token,
                span: extra.span(),
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(code: &str) -> Vec<Token<'_>> {
        lex(code)
            .unwrap()
            .into_iter()
            .map(|token| token.node)
            .filter(|token| !token.is_trivia())
            .collect()
    }

    #[test]
    fn test_chain() {
        assert_eq!(
            tokens("cy.get('.a').click()"),
            vec![
                Token::Identifier("cy"),
                Token::Dot,
                Token::Identifier("get"),
                Token::BracketRoundOpen,
                Token::Text(".a"),
                Token::BracketRoundClose,
                Token::Dot,
                Token::Identifier("click"),
                Token::BracketRoundOpen,
                Token::BracketRoundClose,
            ]
        );
    }

    #[test]
    fn test_regex_or_division() {
        assert_eq!(
            tokens("a / b"),
            vec![Token::Identifier("a"), Token::Operator("/"), Token::Identifier("b")]
        );
        assert_eq!(
            tokens("x.should('match', /^a[/]b$/i)")[6],
            Token::Regex {
                pattern: "^a[/]b$",
                flags: "i"
            }
        );
        assert_eq!(
            tokens("return /ab/"),
            vec![
                Token::Identifier("return"),
                Token::Regex {
                    pattern: "ab",
                    flags: ""
                }
            ]
        );
    }

    #[test]
    fn test_template_with_nested_braces() {
        assert_eq!(
            tokens("`a ${ {b: 1}.b } c`"),
            vec![Token::Template("a ${ {b: 1}.b } c")]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("1 2.5 .5 0xff 1e3 1_000"),
            vec![
                Token::Number("1"),
                Token::Number("2.5"),
                Token::Number(".5"),
                Token::Number("0xff"),
                Token::Number("1e3"),
                Token::Number("1_000"),
            ]
        );
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            tokens("a === b !== c ?? d?.e"),
            vec![
                Token::Identifier("a"),
                Token::Operator("==="),
                Token::Identifier("b"),
                Token::Operator("!=="),
                Token::Identifier("c"),
                Token::Operator("??"),
                Token::Identifier("d"),
                Token::QuestionDot,
                Token::Identifier("e"),
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines_are_kept() {
        let all: Vec<_> = lex("// hello\na /* b */")
            .unwrap()
            .into_iter()
            .map(|token| token.node)
            .collect();
        assert_eq!(
            all,
            vec![
                Token::Comment("// hello"),
                Token::Newline,
                Token::Identifier("a"),
                Token::Comment("/* b */"),
            ]
        );
    }

    #[test]
    fn test_spans_are_absolute() {
        let tokens = lex("  foo  bar").unwrap();
        assert_eq!(tokens[1].span.into_range(), 7..10);
    }

    #[test]
    fn test_unterminated_string_fails() {
        let errors = lex("let a = 'oops").unwrap_err();
        assert!(!errors.is_empty());
    }
}
