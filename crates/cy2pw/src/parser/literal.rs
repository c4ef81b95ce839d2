/// Resolves escape sequences of a string literal's raw content.
pub fn unescape(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut characters = raw.chars().peekable();
    while let Some(character) = characters.next() {
        if character != '\\' {
            value.push(character);
            continue;
        }
        let Some(escaped) = characters.next() else {
            break;
        };
        match escaped {
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'v' => value.push('\u{b}'),
            '0' => value.push('\0'),
            // Line continuation
            '\n' => {}
            '\r' => {
                if characters.peek() == Some(&'\n') {
                    characters.next();
                }
            }
            'x' => {
                let digits: String = characters.by_ref().take(2).collect();
                push_code_point(&mut value, &digits);
            }
            'u' => {
                let digits: String = if characters.peek() == Some(&'{') {
                    characters.next();
                    characters.by_ref().take_while(|character| *character != '}').collect()
                } else {
                    characters.by_ref().take(4).collect()
                };
                push_code_point(&mut value, &digits);
            }
            other => value.push(other),
        }
    }
    value
}

fn push_code_point(value: &mut String, digits: &str) {
    match u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
        Some(character) => value.push(character),
        None => value.push(char::REPLACEMENT_CHARACTER),
    }
}

/// Renders `value` as a string literal delimited by `quote`.
pub fn quote(value: &str, quote: char) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push(quote);
    for character in value.chars() {
        match character {
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '\u{8}' => literal.push_str("\\b"),
            '\u{c}' => literal.push_str("\\f"),
            '\u{2028}' | '\u{2029}' => literal.push_str(&format!("\\u{:04x}", character as u32)),
            character if character == quote => {
                literal.push('\\');
                literal.push(character);
            }
            character if character.is_control() => {
                literal.push_str(&format!("\\u{:04x}", character as u32));
            }
            character => literal.push(character),
        }
    }
    literal.push(quote);
    literal
}

/// Escapes every regular expression metacharacter so `text` matches literally.
pub fn escape_for_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        if matches!(
            character,
            '.' | '*' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r"it\'s"), "it's");
        assert_eq!(unescape(r"\x41B\u{43}"), "ABC");
        assert_eq!(unescape("a\\\nb"), "ab");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("it's", '\''), r"'it\'s'");
        assert_eq!(quote("say \"hi\"", '\''), "'say \"hi\"'");
        assert_eq!(quote("a\nb", '"'), r#""a\nb""#);
    }

    #[test]
    fn test_escape_for_regex() {
        assert_eq!(escape_for_regex("a.b"), r"a\.b");
        assert_eq!(escape_for_regex("/users/1?x=(y)"), r"\/users\/1\?x=\(y\)");
    }
}
