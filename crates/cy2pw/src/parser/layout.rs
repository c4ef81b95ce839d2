use super::{Span, Spanned, Token};

/// Drops the line breaks and comments the grammar has no place for.
///
/// A line break survives as [`Token::Newline`] only where it ends a statement,
/// that is after a token that can end one and before a token that cannot
/// continue it. Comments and blank lines survive only between statements and
/// become trivia there. Nothing inside round or square brackets survives.
pub fn layout(tokens: Vec<Spanned<Token<'_>>>) -> Vec<Spanned<Token<'_>>> {
    let mut layout = Layout::default();
    let mut gap = Vec::new();
    for token in tokens {
        if token.node.is_trivia() {
            gap.push(token);
            continue;
        }
        layout.flush(std::mem::take(&mut gap), Some(token.node));
        layout.push(token);
    }
    layout.flush(gap, None);
    layout.tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bracket {
    /// `head` is set for the parentheses after `if`, `for`, `while` and friends.
    Round { head: bool },
    Square,
    Curly,
}

#[derive(Default)]
struct Layout<'code> {
    tokens: Vec<Spanned<Token<'code>>>,
    brackets: Vec<Bracket>,
    previous: Option<Token<'code>>,
    before_previous: Option<Token<'code>>,
    // The previous token closed a statement head, its body follows
    closed_head: bool,
}

impl<'code> Layout<'code> {
    fn push(&mut self, token: Spanned<Token<'code>>) {
        self.closed_head = false;
        match token.node {
            Token::BracketRoundOpen => {
                let head = matches!(
                    self.previous,
                    Some(Token::Identifier("if" | "for" | "while" | "with" | "switch" | "catch"))
                ) || (self.previous == Some(Token::Identifier("await"))
                    && self.before_previous == Some(Token::Identifier("for")));
                self.brackets.push(Bracket::Round { head });
            }
            Token::BracketSquareOpen => self.brackets.push(Bracket::Square),
            Token::BracketCurlyOpen => self.brackets.push(Bracket::Curly),
            Token::BracketRoundClose | Token::BracketSquareClose | Token::BracketCurlyClose => {
                self.closed_head = self.brackets.pop() == Some(Bracket::Round { head: true });
            }
            _ => {}
        }
        self.before_previous = self.previous;
        self.previous = Some(token.node);
        self.tokens.push(token);
    }

    /// Emits what is kept of the trivia between `previous` and `next`.
    fn flush(&mut self, gap: Vec<Spanned<Token<'code>>>, next: Option<Token<'code>>) {
        if gap.is_empty() || !matches!(self.brackets.last(), None | Some(Bracket::Curly)) {
            return;
        }
        let line_break = gap
            .iter()
            .find(|token| match token.node {
                Token::Newline => true,
                Token::Comment(comment) => comment.contains('\n'),
                _ => false,
            })
            .map(|token| token.span);
        let ends = !self.closed_head && self.previous.is_some_and(ends_statement);
        let continues = next.is_some_and(continues_statement);
        let closes = matches!(next, None | Some(Token::BracketCurlyClose));

        if let Some(span) = line_break {
            if ends && !continues && !closes {
                self.tokens.push(Spanned {
                    span,
                    node: Token::Newline,
                });
            }
        }

        let between_statements = matches!(
            self.previous,
            None | Some(Token::Semicolon | Token::BracketCurlyOpen | Token::BracketCurlyClose)
        ) || (line_break.is_some() && ends);
        if !closes && (continues || !between_statements) {
            return;
        }
        let mut newlines = 0;
        let mut last_newline = Span::from(0..0);
        for token in gap {
            match token.node {
                Token::Newline => {
                    newlines += 1;
                    last_newline = token.span;
                }
                Token::Comment(_) => {
                    if newlines >= 2 {
                        self.tokens.push(Spanned {
                            span: last_newline,
                            node: Token::BlankLine,
                        });
                    }
                    newlines = 0;
                    self.tokens.push(token);
                }
                _ => {}
            }
        }
        if newlines >= 2 && !closes {
            self.tokens.push(Spanned {
                span: last_newline,
                node: Token::BlankLine,
            });
        }
    }
}

fn ends_statement(token: Token) -> bool {
    match token {
        Token::BracketRoundClose
        | Token::BracketSquareClose
        | Token::BracketCurlyClose
        | Token::Number(_)
        | Token::Text(_)
        | Token::Template(_)
        | Token::Regex { .. } => true,
        Token::Operator(operator) => matches!(operator, "++" | "--"),
        Token::Identifier(word) => !matches!(
            word,
            "async"
                | "await"
                | "case"
                | "catch"
                | "class"
                | "const"
                | "default"
                | "delete"
                | "do"
                | "else"
                | "export"
                | "extends"
                | "finally"
                | "for"
                | "function"
                | "if"
                | "import"
                | "in"
                | "instanceof"
                | "let"
                | "new"
                | "of"
                | "switch"
                | "throw"
                | "try"
                | "typeof"
                | "var"
                | "void"
                | "while"
                | "with"
                | "yield"
        ),
        _ => false,
    }
}

/// Whether a statement goes on with `token` even after a line break.
fn continues_statement(token: Token) -> bool {
    match token {
        Token::Dot
        | Token::QuestionDot
        | Token::Question
        | Token::Colon
        | Token::Comma
        | Token::Arrow
        | Token::BracketRoundOpen
        | Token::BracketRoundClose
        | Token::BracketSquareOpen
        | Token::BracketSquareClose
        | Token::Template(_) => true,
        Token::Operator(operator) => !matches!(operator, "++" | "--" | "!" | "~"),
        Token::Identifier(word) => matches!(word, "in" | "of" | "instanceof"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex;

    fn laid_out(code: &str) -> Vec<Token<'_>> {
        layout(lex(code).unwrap()).into_iter().map(|token| token.node).collect()
    }

    #[test]
    fn test_line_break_ends_statement() {
        assert_eq!(
            laid_out("a()\nb"),
            vec![
                Token::Identifier("a"),
                Token::BracketRoundOpen,
                Token::BracketRoundClose,
                Token::Newline,
                Token::Identifier("b"),
            ]
        );
    }

    #[test]
    fn test_line_break_inside_chain_is_dropped() {
        assert!(!laid_out("cy.get('a')\n  .click()\n").contains(&Token::Newline));
        assert!(!laid_out("foo(a,\n  b)").contains(&Token::Newline));
        assert!(!laid_out("const c = d &&\n  e").contains(&Token::Newline));
        assert!(!laid_out("if (a)\n  b()").contains(&Token::Newline));
    }

    #[test]
    fn test_trivia_between_statements() {
        assert_eq!(
            laid_out("a() // one\n\n// two\nb()"),
            vec![
                Token::Identifier("a"),
                Token::BracketRoundOpen,
                Token::BracketRoundClose,
                Token::Newline,
                Token::Comment("// one"),
                Token::BlankLine,
                Token::Comment("// two"),
                Token::Identifier("b"),
                Token::BracketRoundOpen,
                Token::BracketRoundClose,
            ]
        );
    }

    #[test]
    fn test_trivia_inside_expressions_is_dropped() {
        let tokens = laid_out("foo(a, // one\n  b)\ncy.get('a')\n  // two\n  .click()");
        assert!(!tokens.iter().any(|token| matches!(token, Token::Comment(_))));
    }
}
