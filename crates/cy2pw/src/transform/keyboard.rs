use crate::parser::Expression;
use chumsky::prelude::*;

/// A piece of a `type()` text.
#[derive(Debug, Clone, PartialEq)]
pub enum Keystroke {
    Text(String),
    /// Name between braces, `{enter}` gives `enter`.
    Key(String),
}

fn keystrokes<'a>() -> impl Parser<'a, &'a str, Vec<Keystroke>> {
    choice((
        // Cypress types a literal brace for `{{}`
        just("{{}").to(Keystroke::Text("{".to_string())),
        just('{')
            .ignore_then(none_of("{}").repeated().at_least(1).to_slice())
            .then_ignore(just('}'))
            .map(|key: &str| Keystroke::Key(key.to_string())),
        any()
            .and_is(just('{').not())
            .repeated()
            .at_least(1)
            .to_slice()
            .map(|text: &str| Keystroke::Text(text.to_string())),
        just('{').to(Keystroke::Text("{".to_string())),
    ))
    .repeated()
    .collect()
}

/// Splits `text` into literal runs and `{key}` directives.
pub fn split_keystrokes(text: &str) -> Vec<Keystroke> {
    let parsed = keystrokes()
        .parse(text)
        .into_result()
        .unwrap_or_else(|_| vec![Keystroke::Text(text.to_string())]);
    let mut merged: Vec<Keystroke> = Vec::with_capacity(parsed.len());
    for keystroke in parsed {
        match (merged.last_mut(), keystroke) {
            (Some(Keystroke::Text(previous)), Keystroke::Text(text)) => previous.push_str(&text),
            (_, keystroke) => merged.push(keystroke),
        }
    }
    merged
}

/// Playwright key for a Cypress key name.
pub fn key(name: &str) -> Option<Expression> {
    let key = match name.to_ascii_lowercase().as_str() {
        "backspace" => "Backspace",
        "del" => "Delete",
        "downarrow" => "ArrowDown",
        "end" | "movetoend" => "End",
        "enter" => "Enter",
        "esc" => "Escape",
        "home" | "movetostart" => "Home",
        "insert" => "Insert",
        "leftarrow" => "ArrowLeft",
        "pagedown" => "PageDown",
        "pageup" => "PageUp",
        "rightarrow" => "ArrowRight",
        "uparrow" => "ArrowUp",
        "selectall" => return Some(select_all()),
        _ => return None,
    };
    Some(Expression::string(key))
}

/// `process.platform === 'darwin' ? 'Meta+a' : 'Control+a'`
fn select_all() -> Expression {
    Expression::Conditional {
        test: Box::new(Expression::binary(
            "===",
            Expression::member(Expression::identifier("process"), "platform"),
            Expression::string("darwin"),
        )),
        consequent: Box::new(Expression::string("Meta+a")),
        alternate: Box::new(Expression::string("Control+a")),
    }
}

/// Playwright modifier key for a Cypress modifier name.
pub fn modifier(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "alt" | "option" => Some("Alt"),
        "ctrl" | "control" => Some("Control"),
        "cmd" | "command" | "meta" => Some("Meta"),
        "shift" => Some("Shift"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Keystroke {
        Keystroke::Text(value.to_string())
    }

    fn key_named(value: &str) -> Keystroke {
        Keystroke::Key(value.to_string())
    }

    #[test]
    fn test_split_keystrokes() {
        assert_eq!(
            split_keystrokes("{selectall}{backspace}hi"),
            vec![key_named("selectall"), key_named("backspace"), text("hi")]
        );
        assert_eq!(split_keystrokes("plain text"), vec![text("plain text")]);
        assert_eq!(split_keystrokes(""), vec![]);
    }

    #[test]
    fn test_literal_braces() {
        assert_eq!(split_keystrokes("a{{}b}"), vec![text("a{b}")]);
        assert_eq!(split_keystrokes("x{ y"), vec![text("x{ y")]);
        assert_eq!(split_keystrokes("{shift}A{enter}"), vec![key_named("shift"), text("A"), key_named("enter")]);
    }

    #[test]
    fn test_tables() {
        assert_eq!(key("Enter"), Some(Expression::string("Enter")));
        assert_eq!(key("del"), Some(Expression::string("Delete")));
        assert!(matches!(key("selectall"), Some(Expression::Conditional { .. })));
        assert_eq!(key("shift"), None);
        assert_eq!(modifier("cmd"), Some("Meta"));
        assert_eq!(modifier("option"), Some("Alt"));
        assert_eq!(modifier("enter"), None);
    }
}
