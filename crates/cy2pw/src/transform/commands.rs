//! Cypress commands and the Playwright calls they become.
//!
//! Each handler receives the subject produced by the previous command, the
//! raw call arguments and the chain [`Context`], and returns the next subject
//! together with the statements that perform the command.

use super::Context;
use super::assertions::response_property;
use super::keyboard::{Keystroke, key, modifier, split_keystrokes};
use super::matchers::{locator_matcher, page_matcher, value_matcher, wrap_string_with_regex};
use super::scope::{State, alias_identifier, members_to_calls};
use super::subject::{Mapped, Subject, SubjectKind, expect_call, fixme, fixme_subject};
use super::viewports::device_viewport;
use crate::parser::{
    Declaration, DeclarationKind, Declarator, Expression, ForHead, Function, FunctionBody, Literal, Pattern, Property,
    Statement, unescape,
};

const HTTP_METHODS: [&str; 9] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "TRACE", "CONNECT"];

/// Methods with a shortcut on `page.request`, the rest go through `fetch`.
const SHORTCUT_METHODS: [&str; 6] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickKind {
    Click,
    DoubleClick,
    RightClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Callback {
    Then,
    Should,
    Within,
}

impl Callback {
    fn name(self) -> &'static str {
        match self {
            Self::Then => "then",
            Self::Should => "should",
            Self::Within => "within",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    As,
    Attr,
    Blur,
    Check,
    Children,
    Clear,
    Click(ClickKind),
    Contains,
    End,
    Eq,
    Filter,
    Find,
    /// `findBy*`/`findAllBy*` from Testing Library, with the `getBy*` method to use.
    FindBy(&'static str),
    FindByDisplayValue,
    First,
    Focus,
    Focused,
    Get,
    Go,
    Hash,
    Intercept,
    Invoke,
    Its,
    Last,
    Location,
    Log,
    Not,
    Parent,
    Parents,
    ParentsUntil,
    Reload,
    Request,
    Root,
    ScrollIntoView,
    ScrollTo,
    Select,
    Should,
    Submit,
    Text,
    Then,
    Title,
    /// jQuery traversals with no locator equivalent.
    Traversal,
    Trigger,
    Type,
    Uncheck,
    Url,
    Val,
    Viewport,
    Visit,
    Wait,
    Window,
    Within,
    Wrap,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        let command = match name {
            "as" => Self::As,
            "attr" => Self::Attr,
            "blur" => Self::Blur,
            "check" => Self::Check,
            "children" => Self::Children,
            "clear" => Self::Clear,
            "click" => Self::Click(ClickKind::Click),
            "dblclick" => Self::Click(ClickKind::DoubleClick),
            "rightclick" => Self::Click(ClickKind::RightClick),
            "contains" => Self::Contains,
            "end" => Self::End,
            "eq" | "nth" => Self::Eq,
            "filter" => Self::Filter,
            "find" => Self::Find,
            "findByLabelText" | "findAllByLabelText" => Self::FindBy("getByLabel"),
            "findByPlaceholderText" | "findAllByPlaceholderText" => Self::FindBy("getByPlaceholder"),
            "findByAltText" | "findAllByAltText" => Self::FindBy("getByAltText"),
            "findByRole" | "findAllByRole" => Self::FindBy("getByRole"),
            "findByTestId" | "findAllByTestId" => Self::FindBy("getByTestId"),
            "findByText" | "findAllByText" => Self::FindBy("getByText"),
            "findByTitle" | "findAllByTitle" => Self::FindBy("getByTitle"),
            "findByDisplayValue" | "findAllByDisplayValue" => Self::FindByDisplayValue,
            "first" => Self::First,
            "focus" => Self::Focus,
            "focused" => Self::Focused,
            "get" => Self::Get,
            "go" => Self::Go,
            "hash" => Self::Hash,
            "intercept" => Self::Intercept,
            "invoke" => Self::Invoke,
            "its" => Self::Its,
            "last" => Self::Last,
            "location" => Self::Location,
            "log" => Self::Log,
            "not" => Self::Not,
            "parent" => Self::Parent,
            "parents" => Self::Parents,
            "parentsUntil" => Self::ParentsUntil,
            "reload" => Self::Reload,
            "request" => Self::Request,
            "root" => Self::Root,
            "scrollIntoView" => Self::ScrollIntoView,
            "scrollTo" => Self::ScrollTo,
            "select" => Self::Select,
            "should" | "and" => Self::Should,
            "submit" => Self::Submit,
            "text" => Self::Text,
            "then" => Self::Then,
            "title" => Self::Title,
            "closest" | "next" | "nextAll" | "nextUntil" | "prev" | "prevAll" | "prevUntil" | "siblings" => {
                Self::Traversal
            }
            "trigger" => Self::Trigger,
            "type" => Self::Type,
            "uncheck" => Self::Uncheck,
            "url" => Self::Url,
            "val" => Self::Val,
            "viewport" => Self::Viewport,
            "visit" => Self::Visit,
            "wait" => Self::Wait,
            "window" => Self::Window,
            "within" => Self::Within,
            "wrap" => Self::Wrap,
            _ => return None,
        };
        Some(command)
    }
}

/// Translates one command of a `cy...` chain.
pub fn translate(subject: Subject, arguments: Vec<Expression>, context: &mut Context<'_>) -> Mapped {
    let method = context.method;
    let Some(command) = Command::from_name(method) else {
        return fixme(subject, method, arguments);
    };
    match command {
        Command::As => alias(subject, arguments, context),
        Command::Attr => match arguments.as_slice() {
            [name] if subject.kind == SubjectKind::Locator => {
                Mapped::subject(subject.chain_async("getAttribute", vec![name.clone()], SubjectKind::String))
            }
            _ => fixme(subject, method, arguments),
        },
        Command::Blur => action(subject, "blur", Vec::new()),
        Command::Check => check(subject, "check", arguments),
        Command::Uncheck => check(subject, "uncheck", arguments),
        Command::Children => children(subject, arguments, context),
        Command::Clear => {
            let options = options_object(pick_options(arguments.last(), &["force", "timeout"]));
            action(subject, "clear", options.into_iter().collect())
        }
        Command::Click(kind) => click(kind, subject, arguments),
        Command::Contains => contains(subject, arguments, context),
        Command::End => Mapped::subject(subject),
        Command::Eq => match arguments.as_slice() {
            [index] if subject.kind == SubjectKind::Locator => {
                Mapped::subject(subject.chain("nth", vec![index.clone()], SubjectKind::Locator))
            }
            _ => fixme(subject, method, arguments),
        },
        Command::Filter => match arguments.first().and_then(Expression::as_string) {
            Some(selector) if subject.kind == SubjectKind::Locator => Mapped::subject(locator(
                &subject,
                Expression::string(format!("{selector}:scope")),
                context.state,
            )),
            _ => fixme_subject(&subject, method, arguments, SubjectKind::Locator),
        },
        Command::Find => match arguments.into_iter().next() {
            Some(selector) => Mapped::subject(locator(&subject, selector, context.state)),
            None => fixme(subject, method, Vec::new()),
        },
        Command::FindBy(target) => find_by(subject, target, arguments, context.state),
        Command::FindByDisplayValue => {
            fixme_subject(&locator_root(&subject, context.state), method, arguments, SubjectKind::Locator)
        }
        Command::First | Command::Last if subject.kind == SubjectKind::Locator => {
            Mapped::subject(subject.chain(method, Vec::new(), SubjectKind::Locator))
        }
        Command::First | Command::Last => fixme_subject(&subject, method, arguments, SubjectKind::Locator),
        Command::Focus => action(subject, "focus", Vec::new()),
        Command::Focused => {
            let focused = Subject::page().chain("locator", vec![Expression::string("*:focus")], SubjectKind::Locator);
            idle(focused, context)
        }
        Command::Get => get(arguments, context),
        Command::Go => go(subject, arguments),
        Command::Hash => Mapped::subject(current_url().member("hash", SubjectKind::String)),
        Command::Intercept => intercept(subject, arguments),
        Command::Invoke => invoke(subject, arguments),
        Command::Its => its(subject, arguments),
        Command::Location => match arguments.first() {
            None => Mapped::subject(current_url()),
            Some(part) => match part.as_string() {
                Some(part) => Mapped::subject(current_url().member(part, SubjectKind::String)),
                None => fixme(subject, method, arguments),
            },
        },
        Command::Log => {
            let log = Expression::method_call(Expression::identifier("console"), "log", arguments);
            Mapped::expression(subject, log)
        }
        Command::Not => match arguments.first().and_then(Expression::as_string) {
            Some(selector) if subject.kind == SubjectKind::Locator => Mapped::subject(subject.chain(
                "locator",
                vec![Expression::string(format!(":scope:not({selector})"))],
                SubjectKind::Locator,
            )),
            _ => fixme_subject(&subject, method, arguments, SubjectKind::Locator),
        },
        Command::Parent => match arguments.into_iter().next() {
            None => Mapped::subject(locator(&subject, Expression::string(".."), context.state)),
            Some(selector) => Mapped::subject(ancestor(&subject, selector, context.state)),
        },
        Command::Parents => {
            let selector = arguments.into_iter().next().unwrap_or_else(|| Expression::string("*"));
            Mapped::subject(ancestor(&subject, selector, context.state))
        }
        Command::ParentsUntil => match arguments.first().and_then(Expression::as_string) {
            Some(selector) => {
                let selector = Expression::string(format!("{selector} *"));
                Mapped::subject(ancestor(&subject, selector, context.state))
            }
            None => fixme_subject(&subject, method, arguments, SubjectKind::Locator),
        },
        Command::Reload => action(Subject::page(), "reload", Vec::new()),
        Command::Request => request(subject, arguments),
        Command::Root => {
            let root = locator_root(&Subject::page(), context.state);
            if root.kind == SubjectKind::Page {
                Mapped::subject(root.chain("locator", vec![Expression::string(":root")], SubjectKind::Locator))
            } else {
                Mapped::subject(root)
            }
        }
        Command::ScrollIntoView => action(subject, "scrollIntoViewIfNeeded", Vec::new()),
        Command::ScrollTo if subject.kind == SubjectKind::Locator => {
            action(subject, "scrollIntoViewIfNeeded", Vec::new())
        }
        Command::ScrollTo => fixme(subject, method, arguments),
        Command::Select => select(subject, arguments),
        Command::Should => should(subject, arguments, context),
        Command::Submit => {
            let submit = Expression::arrow(
                vec![Pattern::Identifier("form".to_string())],
                FunctionBody::Expression(Box::new(Expression::method_call(
                    Expression::identifier("form"),
                    "submit",
                    Vec::new(),
                ))),
                false,
            );
            action(subject, "evaluate", vec![submit])
        }
        Command::Text if subject.kind == SubjectKind::Locator => {
            Mapped::subject(subject.chain_async("textContent", Vec::new(), SubjectKind::String))
        }
        Command::Val if subject.kind == SubjectKind::Locator => {
            Mapped::subject(subject.chain_async("inputValue", Vec::new(), SubjectKind::String))
        }
        Command::Text | Command::Val => fixme(subject, method, arguments),
        Command::Then => scoped_callback(Callback::Then, subject, arguments, context),
        Command::Title => Mapped::subject(Subject::page().chain_async("title", Vec::new(), SubjectKind::String)),
        Command::Traversal => fixme_subject(&subject, method, arguments, SubjectKind::Locator),
        Command::Trigger => {
            // Chaining onto an element after an event is unreliable, start over from the page
            let dispatch = subject.call_async("dispatchEvent", arguments);
            Mapped::expression(Subject::page(), dispatch)
        }
        Command::Type => type_text(subject, arguments),
        Command::Url => Mapped::subject(Subject::page().chain("url", Vec::new(), SubjectKind::String)),
        Command::Viewport => viewport(subject, arguments),
        Command::Visit => visit(subject, arguments),
        Command::Wait => wait(subject, arguments, context),
        Command::Window => Mapped::subject(Subject::page().chain_async(
            "evaluateHandle",
            vec![Expression::string("window")],
            SubjectKind::Window,
        )),
        Command::Within => scoped_callback(Callback::Within, subject, arguments, context),
        Command::Wrap => match arguments.into_iter().next() {
            Some(value) => {
                let kind = if context.state.is_locator_scope_expression(&value) {
                    SubjectKind::Locator
                } else {
                    SubjectKind::Value
                };
                Mapped::subject(Subject::new(kind, value))
            }
            None => fixme(subject, method, Vec::new()),
        },
    }
}

/// `await subject.method(arguments)`, keeping the subject.
fn action(subject: Subject, method: &str, arguments: Vec<Expression>) -> Mapped {
    let expression = subject.call_async(method, arguments);
    Mapped::expression(subject, expression)
}

/// A query that ends its chain is an existence check.
fn idle(subject: Subject, context: &Context<'_>) -> Mapped {
    if !context.is_last || subject.kind != SubjectKind::Locator {
        return Mapped::subject(subject);
    }
    let visible = subject.expect_async("toBeVisible", Vec::new(), false);
    Mapped::expression(subject, visible)
}

/// Removes a trailing options object from `arguments`.
fn take_options(arguments: &mut Vec<Expression>) -> Option<Expression> {
    if arguments.last().is_some_and(Expression::is_object) {
        arguments.pop()
    } else {
        None
    }
}

/// The properties of `options` listed in `names`, in that order.
fn pick_options(options: Option<&Expression>, names: &[&str]) -> Vec<(String, Expression)> {
    let Some(options) = options else {
        return Vec::new();
    };
    names
        .iter()
        .filter_map(|name| {
            options
                .object_property(name)
                .map(|value| (name.to_string(), value.clone()))
        })
        .collect()
}

fn options_object(properties: Vec<(String, Expression)>) -> Option<Expression> {
    (!properties.is_empty()).then(|| Expression::object(properties))
}

fn boolean_option(options: Option<&Expression>, name: &str) -> bool {
    matches!(
        options.and_then(|options| options.object_property(name)),
        Some(Expression::Literal(Literal::Boolean(true)))
    )
}

/// Function given as `name` in an options object, either as a method or a value.
fn option_function(options: Option<&Expression>, name: &str) -> Option<Function> {
    let Some(Expression::Object(properties)) = options else {
        return None;
    };
    properties.iter().find_map(|property| match property {
        Property::Method { key, function, .. } if key.name() == Some(name) => Some(function.clone()),
        Property::KeyValue {
            key,
            value: Expression::Function(function),
        } if key.name() == Some(name) => Some((**function).clone()),
        _ => None,
    })
}

/// Where a query for the page starts: the element of an enclosing
/// `within`/`then` callback, if any.
fn locator_root(subject: &Subject, state: &State) -> Subject {
    match &state.scope {
        Some(scope) if subject.kind == SubjectKind::Page && scope.kind == SubjectKind::Locator => scope.clone(),
        _ => subject.clone(),
    }
}

/// `subject.locator(selector)`, with jQuery's `:first`/`:last` suffixes
/// turned into `first()`/`last()`.
fn locator(subject: &Subject, selector: Expression, state: &State) -> Subject {
    let root = locator_root(subject, state);
    if let Some(value) = selector.as_string() {
        for (suffix, narrowing) in [(":first", "first"), (":last", "last")] {
            if let Some(selector) = value.strip_suffix(suffix) {
                return root
                    .chain("locator", vec![Expression::string(selector)], SubjectKind::Locator)
                    .chain(narrowing, Vec::new(), SubjectKind::Locator);
            }
        }
    }
    root.chain("locator", vec![selector], SubjectKind::Locator)
}

/// `page.locator(selector).filter({ has: subject })`
fn ancestor(subject: &Subject, selector: Expression, state: &State) -> Subject {
    let has = Expression::object([("has", subject.expression.clone())]);
    locator(&Subject::page(), selector, state).chain("filter", vec![has], SubjectKind::Locator)
}

/// `new URL(page.url())`
fn current_url() -> Subject {
    let url = Expression::New {
        callee: Box::new(Expression::identifier("URL")),
        arguments: vec![Subject::page().call_sync("url", Vec::new())],
    };
    Subject::new(SubjectKind::Url, url)
}

fn alias(subject: Subject, arguments: Vec<Expression>, context: &mut Context<'_>) -> Mapped {
    let Some(name) = arguments.first().and_then(Expression::as_string) else {
        return fixme(subject, "as", arguments);
    };
    let name = alias_identifier(name);
    let statement = context
        .transformer
        .aliases
        .bind(&name, subject.kind, subject.expression.clone(), context.state);
    Mapped::with(subject, vec![statement])
}

fn get(arguments: Vec<Expression>, context: &mut Context<'_>) -> Mapped {
    let Some(selector) = arguments.into_iter().next() else {
        return fixme(Subject::page(), "get", Vec::new());
    };
    if let Some(alias) = selector.as_string().and_then(|selector| selector.strip_prefix('@')) {
        let name = alias_identifier(alias);
        let kind = context.transformer.aliases.kind(&name).unwrap_or(SubjectKind::Locator);
        return idle(Subject::new(kind, Expression::identifier(name)), context);
    }
    let found = locator(&Subject::page(), selector, context.state);
    idle(found, context)
}

fn children(subject: Subject, arguments: Vec<Expression>, context: &mut Context<'_>) -> Mapped {
    if subject.kind != SubjectKind::Locator {
        return fixme_subject(&subject, "children", arguments, SubjectKind::Locator);
    }
    let selector = match arguments.first() {
        None => ":scope > *".to_string(),
        Some(selector) => match selector.as_string() {
            Some(selector) => format!(":scope > {selector}"),
            None => return fixme_subject(&subject, "children", arguments, SubjectKind::Locator),
        },
    };
    Mapped::subject(locator(&subject, Expression::string(selector), context.state))
}

fn contains(subject: Subject, mut arguments: Vec<Expression>, context: &mut Context<'_>) -> Mapped {
    if !subject.kind.is_dom() {
        return fixme(subject, "contains", arguments);
    }
    let original = arguments.clone();
    take_options(&mut arguments);
    let root = locator_root(&subject, context.state);
    let found = match arguments.as_slice() {
        [text] => root.chain("getByText", vec![wrap_string_with_regex(text)], SubjectKind::Locator),
        [selector, text] => {
            let has_text = Expression::object([("hasText", wrap_string_with_regex(text))]);
            root.chain("locator", vec![selector.clone(), has_text], SubjectKind::Locator)
        }
        _ => return fixme(subject, "contains", original),
    };
    idle(found.chain("first", Vec::new(), SubjectKind::Locator), context)
}

fn find_by(subject: Subject, target: &str, mut arguments: Vec<Expression>, state: &State) -> Mapped {
    let container = arguments
        .last()
        .and_then(|options| options.object_property("container"))
        .cloned();
    let root = match container {
        Some(container) => {
            arguments.pop();
            Subject::new(SubjectKind::Locator, container)
        }
        None => locator_root(&subject, state),
    };
    Mapped::subject(root.chain(target, arguments, SubjectKind::Locator))
}

fn check(subject: Subject, method: &str, mut arguments: Vec<Expression>) -> Mapped {
    if subject.kind != SubjectKind::Locator {
        return fixme(subject, method, arguments);
    }
    let original = arguments.clone();
    let options = take_options(&mut arguments);
    let options: Vec<Expression> = options_object(pick_options(options.as_ref(), &["force", "timeout"]))
        .into_iter()
        .collect();
    let values = match arguments.first() {
        None => return action(subject, method, options),
        Some(Expression::Array(elements)) => elements
            .iter()
            .map(|element| element.as_ref().and_then(Expression::as_string))
            .collect::<Option<Vec<_>>>(),
        Some(value) => value.as_string().map(|value| vec![value]),
    };
    let Some(values) = values else {
        return fixme(subject, method, original);
    };
    let statements = values
        .into_iter()
        .map(|value| {
            let selector = Expression::string(format!("input[value=\"{value}\"]:scope"));
            let input = subject.chain("locator", vec![selector], SubjectKind::Locator);
            Statement::Expression(input.call_async(method, options.clone()))
        })
        .collect();
    Mapped::with(subject, statements)
}

fn click(kind: ClickKind, subject: Subject, mut arguments: Vec<Expression>) -> Mapped {
    let method = match kind {
        ClickKind::DoubleClick => "dblclick",
        ClickKind::Click | ClickKind::RightClick => "click",
    };
    let name = match kind {
        ClickKind::Click => "click",
        ClickKind::DoubleClick => "dblclick",
        ClickKind::RightClick => "rightclick",
    };
    if !subject.kind.is_dom() {
        return fixme(subject, name, arguments);
    }
    let original = arguments.clone();
    let options = take_options(&mut arguments);

    let mut properties = Vec::new();
    if kind == ClickKind::RightClick {
        properties.push(("button".to_string(), Expression::string("right")));
    }
    let mut position = None;
    match arguments.as_slice() {
        [] => {}
        [x, y] if x.is_number() && y.is_number() => {
            let point = Expression::object([("x", x.clone()), ("y", y.clone())]);
            properties.push(("position".to_string(), point));
        }
        [named] => match named.as_string() {
            Some("center") => {}
            Some(named) => match position_coordinates(named) {
                Some(point) => position = Some((named.to_string(), point)),
                None => return fixme(subject, name, original),
            },
            None => return fixme(subject, name, original),
        },
        _ => return fixme(subject, name, original),
    }

    let modifiers: Vec<Option<Expression>> = [
        ("altKey", "Alt"),
        ("ctrlKey", "Control"),
        ("metaKey", "Meta"),
        ("shiftKey", "Shift"),
    ]
    .into_iter()
    .filter(|(option, _)| boolean_option(options.as_ref(), option))
    .map(|(_, modifier)| Some(Expression::string(modifier)))
    .collect();
    if !modifiers.is_empty() {
        properties.push(("modifiers".to_string(), Expression::Array(modifiers)));
    }
    properties.extend(pick_options(options.as_ref(), &["force", "timeout"]));

    if boolean_option(options.as_ref(), "multiple") {
        let each = Subject::new(SubjectKind::Locator, Expression::identifier("locator"));
        let click = each.call_async(method, options_object(properties).into_iter().collect());
        let every = Statement::ForOf {
            left: ForHead::Declaration(Declaration {
                kind: DeclarationKind::Const,
                declarators: vec![Declarator {
                    target: Pattern::Identifier("locator".to_string()),
                    init: None,
                }],
            }),
            right: subject.call_async("all", Vec::new()),
            body: Box::new(Statement::Expression(click)),
            is_await: false,
        };
        return Mapped::with(subject, vec![every]);
    }

    let Some((named, point)) = position else {
        let click = subject.call_async(method, options_object(properties).into_iter().collect());
        return Mapped::expression(subject, click);
    };
    properties.push(("position".to_string(), point));
    let click = subject.call_async(method, options_object(properties).into_iter().collect());
    let mut block = Vec::new();
    // The top left corner is a fixed offset, only the other positions read the size
    if named != "topLeft" {
        let measured = Expression::binary(
            "||",
            Expression::awaited(subject.call_sync("boundingBox", Vec::new())),
            Expression::object([("width", Expression::number(0)), ("height", Expression::number(0))]),
        );
        block.push(Statement::declare(DeclarationKind::Const, "box", measured));
    }
    block.push(Statement::comment(format!("// {named}")));
    block.push(Statement::Expression(click));
    Mapped::with(subject, vec![Statement::Block(block)])
}

/// Point inside the measured `box` for a named click position.
fn position_coordinates(position: &str) -> Option<Expression> {
    let size = |dimension: &str| Expression::member(Expression::identifier("box"), dimension);
    let start = || Expression::number(5);
    let middle = |dimension: &str| Expression::binary("/", size(dimension), Expression::number(2));
    let end = |dimension: &str| Expression::binary("-", size(dimension), Expression::number(5));
    let (x, y) = match position {
        "topLeft" => (start(), start()),
        "top" => (middle("width"), start()),
        "topRight" => (end("width"), start()),
        "left" => (start(), middle("height")),
        "right" => (end("width"), middle("height")),
        "bottomLeft" => (start(), end("height")),
        "bottom" => (middle("width"), end("height")),
        "bottomRight" => (end("width"), end("height")),
        _ => return None,
    };
    Some(Expression::object([("x", x), ("y", y)]))
}

fn go(subject: Subject, arguments: Vec<Expression>) -> Mapped {
    let window = Subject::new(SubjectKind::Window, Expression::identifier("window"));
    let steps = match arguments.as_slice() {
        [direction] => match direction {
            Expression::Literal(Literal::String(direction)) if direction == "back" => Some(("goBack", 1)),
            Expression::Literal(Literal::String(direction)) if direction == "forward" => Some(("goForward", 1)),
            Expression::Unary { operator, argument } if operator == "-" => history_steps(argument).map(|n| ("goBack", n)),
            steps => history_steps(steps).map(|n| ("goForward", n)),
        },
        _ => None,
    };
    let Some((method, count)) = steps else {
        return fixme(subject, "go", arguments);
    };
    let page = Subject::page();
    let statements = (0..count)
        .map(|_| Statement::Expression(page.call_async(method, Vec::new())))
        .collect();
    Mapped::with(window, statements)
}

fn history_steps(expression: &Expression) -> Option<usize> {
    let steps = expression.as_number()?;
    (steps >= 1.0 && steps.fract() == 0.0 && steps <= 100.0).then_some(steps as usize)
}

fn intercept(subject: Subject, arguments: Vec<Expression>) -> Mapped {
    let url = match arguments.as_slice() {
        [url] => Some(url),
        [method, url] if method.as_string().is_some_and(is_http_method) => Some(url),
        _ => None,
    };
    match url {
        Some(url) if !url.is_object() => Mapped::subject(Subject::page().chain(
            "waitForResponse",
            vec![url.clone()],
            SubjectKind::Response,
        )),
        _ => fixme(subject, "intercept", arguments),
    }
}

fn is_http_method(method: &str) -> bool {
    HTTP_METHODS.contains(&method.to_ascii_uppercase().as_str())
}

fn invoke(subject: Subject, arguments: Vec<Expression>) -> Mapped {
    let Some(name) = arguments.first().and_then(Expression::as_string) else {
        return fixme(subject, "invoke", arguments);
    };
    if subject.kind != SubjectKind::Locator {
        let name = name.to_string();
        return Mapped::subject(subject.chain(&name, arguments[1..].to_vec(), SubjectKind::Value));
    }
    match (name, &arguments[1..]) {
        ("val", []) => Mapped::subject(subject.chain_async("inputValue", Vec::new(), SubjectKind::String)),
        ("text", []) => Mapped::subject(subject.chain_async("textContent", Vec::new(), SubjectKind::String)),
        ("attr", [attribute]) => {
            Mapped::subject(subject.chain_async("getAttribute", vec![attribute.clone()], SubjectKind::String))
        }
        ("val", [value]) => {
            let setter = Expression::arrow(
                vec![
                    Pattern::Identifier("input".to_string()),
                    Pattern::Identifier("value".to_string()),
                ],
                FunctionBody::Expression(Box::new(Expression::Assignment {
                    operator: "=".to_string(),
                    target: Box::new(Expression::member(Expression::identifier("input"), "value")),
                    value: Box::new(Expression::call(
                        Expression::identifier("String"),
                        vec![Expression::identifier("value")],
                    )),
                })),
                false,
            );
            let value = value.clone();
            action(subject, "evaluate", vec![setter, value])
        }
        _ => fixme(subject, "invoke", arguments),
    }
}

fn its(subject: Subject, arguments: Vec<Expression>) -> Mapped {
    let Some(path) = arguments.first().and_then(Expression::as_string) else {
        return fixme(subject, "its", arguments);
    };
    match subject.kind {
        SubjectKind::Locator if path == "length" => {
            Mapped::subject(subject.chain_async("count", Vec::new(), SubjectKind::Value))
        }
        _ => Mapped::subject(subject.property(path)),
    }
}

fn request(subject: Subject, mut arguments: Vec<Expression>) -> Mapped {
    let original = arguments.clone();
    let mut method = Expression::string("GET");
    if let Some(first) = arguments.first().and_then(Expression::as_string)
        && is_http_method(first)
        && arguments.len() > 1
    {
        method = Expression::string(first.to_ascii_uppercase());
        arguments.remove(0);
    }

    let mut properties = Vec::new();
    let url = match arguments.as_slice() {
        [options @ Expression::Object(_)] => {
            let Some(url) = options.object_property("url") else {
                return fixme(subject, "request", original);
            };
            if let Some(value) = options.object_property("method") {
                method = match value.as_string() {
                    Some(name) => Expression::string(name.to_ascii_uppercase()),
                    None => value.clone(),
                };
            }
            for (from, to) in [
                ("body", "data"),
                ("headers", "headers"),
                ("qs", "params"),
                ("timeout", "timeout"),
                ("failOnStatusCode", "failOnStatusCode"),
            ] {
                if let Some(value) = options.object_property(from) {
                    properties.push((to.to_string(), value.clone()));
                }
            }
            url.clone()
        }
        [url] => url.clone(),
        [url, body] if !url.is_object() => {
            properties.push(("data".to_string(), body.clone()));
            url.clone()
        }
        _ => return fixme(subject, "request", original),
    };

    let shortcut = method
        .as_string()
        .filter(|name| SHORTCUT_METHODS.contains(name))
        .map(str::to_ascii_lowercase);
    let fetch = match shortcut {
        Some(shortcut) => shortcut,
        None => {
            properties.insert(0, ("method".to_string(), method));
            "fetch".to_string()
        }
    };
    let mut call_arguments = vec![url];
    call_arguments.extend(options_object(properties));
    let response = Subject::page()
        .member("request", SubjectKind::Request)
        .chain_async(&fetch, call_arguments, SubjectKind::Response);
    Mapped::subject(response)
}

fn select(subject: Subject, mut arguments: Vec<Expression>) -> Mapped {
    if subject.kind != SubjectKind::Locator {
        return fixme(subject, "select", arguments);
    }
    let original = arguments.clone();
    let options = take_options(&mut arguments);
    let supported = match arguments.as_slice() {
        [value] if value.is_string() => true,
        [Expression::Array(elements)] => elements
            .iter()
            .all(|element| element.as_ref().is_some_and(Expression::is_string)),
        _ => false,
    };
    if !supported {
        return fixme(subject, "select", original);
    }
    arguments.extend(options_object(pick_options(options.as_ref(), &["force", "timeout"])));
    action(subject, "selectOption", arguments)
}

/// Text, keys and interpolated values of a `type()` argument.
enum Typed {
    Text(String),
    Key(String),
    Value(Expression),
}

fn type_text(subject: Subject, mut arguments: Vec<Expression>) -> Mapped {
    if !subject.kind.is_dom() {
        return fixme(subject, "type", arguments);
    }
    let original = arguments.clone();
    let options = take_options(&mut arguments);
    let [text] = arguments.as_slice() else {
        return fixme(subject, "type", original);
    };
    let has_delay = options.as_ref().and_then(|options| options.object_property("delay")).is_some();
    let method = if has_delay { "type" } else { "fill" };
    let typing_options: Vec<Expression> =
        options_object(pick_options(options.as_ref(), &["force", "timeout", "delay"]))
            .into_iter()
            .collect();
    let key_options: Vec<Expression> = options_object(pick_options(options.as_ref(), &["force", "timeout"]))
        .into_iter()
        .collect();

    let mut pieces = Vec::new();
    match text {
        Expression::Literal(Literal::String(value)) => push_keystrokes(value.as_str(), &mut pieces),
        Expression::Template(template) => {
            for (index, quasi) in template.quasis.iter().enumerate() {
                push_keystrokes(unescape(quasi).as_str(), &mut pieces);
                if let Some(expression) = template.expressions.get(index) {
                    pieces.push(Typed::Value(expression.clone()));
                }
            }
        }
        value => pieces.push(Typed::Value(value.clone())),
    }

    if !pieces.iter().any(|piece| matches!(piece, Typed::Key(_))) {
        let value = match text {
            Expression::Literal(Literal::String(_)) => {
                let joined: String = pieces
                    .iter()
                    .filter_map(|piece| match piece {
                        Typed::Text(text) => Some(text.as_str()),
                        _ => None,
                    })
                    .collect();
                Expression::string(joined)
            }
            text => text.clone(),
        };
        return action(subject, method, with_options(value, &typing_options));
    }

    let keyboard = Subject::page().member("keyboard", SubjectKind::Keyboard);
    let mut held = Vec::new();
    let mut statements = Vec::new();
    for piece in pieces {
        let expression = match piece {
            Typed::Text(text) => subject.call_async(method, with_options(Expression::string(text), &typing_options)),
            Typed::Value(value) => subject.call_async(method, with_options(value, &typing_options)),
            Typed::Key(name) => {
                if let Some(held_key) = modifier(&name) {
                    held.push(held_key);
                    keyboard.call_async("down", vec![Expression::string(held_key)])
                } else if let Some(pressed) = key(&name) {
                    subject.call_async("press", with_options(pressed, &key_options))
                } else {
                    let placeholder = fixme(subject.clone(), "type", vec![Expression::string(format!("{{{name}}}"))]);
                    statements.extend(placeholder.statements);
                    continue;
                }
            }
        };
        statements.push(Statement::Expression(expression));
    }
    for held_key in held.into_iter().rev() {
        statements.push(Statement::Expression(
            keyboard.call_async("up", vec![Expression::string(held_key)]),
        ));
    }
    Mapped::with(subject, statements)
}

fn push_keystrokes(text: &str, pieces: &mut Vec<Typed>) {
    pieces.extend(split_keystrokes(text).into_iter().map(|keystroke| match keystroke {
        Keystroke::Text(text) => Typed::Text(text),
        Keystroke::Key(name) => Typed::Key(name),
    }));
}

fn with_options(value: Expression, options: &[Expression]) -> Vec<Expression> {
    let mut arguments = vec![value];
    arguments.extend_from_slice(options);
    arguments
}

fn viewport(subject: Subject, arguments: Vec<Expression>) -> Mapped {
    let size = |width: Expression, height: Expression| {
        let size = Expression::object([("width", width), ("height", height)]);
        Statement::Expression(Subject::page().call_async("setViewportSize", vec![size]))
    };
    match arguments.as_slice() {
        [width, height] if !width.is_string() => Mapped::with(Subject::void(), vec![size(width.clone(), height.clone())]),
        [preset, orientation @ ..] if orientation.len() <= 1 => {
            let Some((name, (width, height))) = preset
                .as_string()
                .and_then(|name| device_viewport(name).map(|viewport| (name, viewport)))
            else {
                return fixme(subject, "viewport", arguments);
            };
            let landscape = orientation.first().and_then(Expression::as_string) == Some("landscape");
            let (comment, width, height) = if landscape {
                (format!("// {name}, landscape"), height, width)
            } else {
                (format!("// {name}"), width, height)
            };
            let statements = vec![
                Statement::comment(comment),
                size(Expression::number(width), Expression::number(height)),
            ];
            Mapped::with(Subject::void(), statements)
        }
        _ => fixme(subject, "viewport", arguments),
    }
}

fn visit(subject: Subject, mut arguments: Vec<Expression>) -> Mapped {
    let original = arguments.clone();
    let options = take_options(&mut arguments);
    let url = match arguments.into_iter().next() {
        Some(url) => url,
        None => match options.as_ref().and_then(|options| options.object_property("url")) {
            Some(url) => url.clone(),
            None => return fixme(subject, "visit", original),
        },
    };
    let page = Subject::page();
    let mut statements = Vec::new();
    if let Some(callback) = option_function(options.as_ref(), "onBeforeLoad") {
        statements.push(Statement::Expression(
            page.call_async("addInitScript", vec![window_script(callback)]),
        ));
    }
    let mut goto = vec![url];
    goto.extend(options_object(pick_options(options.as_ref(), &["timeout"])));
    statements.push(Statement::Expression(page.call_async("goto", goto)));
    if let Some(callback) = option_function(options.as_ref(), "onLoad") {
        statements.push(Statement::Expression(
            page.call_async("evaluate", vec![window_script(callback)]),
        ));
    }
    let window = Subject::new(SubjectKind::Window, Expression::identifier("window"));
    Mapped::with(window, statements)
}

/// Runs the body of a `(win) => {...}` callback in the browser with `win`
/// bound to `window`.
fn window_script(callback: Function) -> Expression {
    let Function { params, body, .. } = callback;
    let mut statements = Vec::new();
    if let Some(param) = params.into_iter().next() {
        statements.push(Statement::Declaration(Declaration {
            kind: DeclarationKind::Const,
            declarators: vec![Declarator {
                target: param,
                init: Some(Expression::identifier("window")),
            }],
        }));
    }
    statements.extend(body.into_statements());
    Expression::arrow(Vec::new(), FunctionBody::Block(statements), true)
}

fn wait(subject: Subject, arguments: Vec<Expression>, context: &Context<'_>) -> Mapped {
    match arguments.as_slice() {
        [duration] if duration.is_number() => {
            let pause = Subject::page().call_async("waitForTimeout", arguments);
            Mapped::expression(subject, pause)
        }
        [alias] => {
            let Some(name) = alias.as_string().and_then(|alias| alias.strip_prefix('@')) else {
                return fixme(subject, "wait", arguments);
            };
            let name = alias_identifier(name);
            match context.transformer.aliases.kind(&name) {
                Some(kind) => Mapped::subject(Subject::new(
                    kind,
                    Expression::awaited(Expression::identifier(name)),
                )),
                None => fixme(subject, "wait", arguments),
            }
        }
        _ => fixme(subject, "wait", arguments),
    }
}

fn should(subject: Subject, arguments: Vec<Expression>, context: &mut Context<'_>) -> Mapped {
    if matches!(arguments.first(), Some(Expression::Function(_))) {
        return scoped_callback(Callback::Should, subject, arguments, context);
    }
    let Some(matcher) = arguments.first().and_then(Expression::as_string) else {
        return fixme(subject, "should", arguments);
    };
    let (is_not, name) = match matcher.strip_prefix("not.") {
        Some(name) => (true, name),
        None => (false, matcher),
    };
    let rest = &arguments[1..];

    if subject.kind == SubjectKind::Response
        && name == "have.property"
        && let Some(field) = rest.first().and_then(Expression::as_string)
    {
        return response_property(&subject, field, rest.get(1).cloned(), is_not, true);
    }

    if subject.kind == SubjectKind::Locator {
        match name {
            "have.html" => {
                let outer_html = Expression::arrow(
                    vec![Pattern::Identifier("element".to_string())],
                    FunctionBody::Expression(Box::new(Expression::member(
                        Expression::identifier("element"),
                        "outerHTML",
                    ))),
                    false,
                );
                let html = Subject::new(SubjectKind::String, subject.call_sync("evaluate", vec![outer_html]));
                let assertion = html.expect_poll("toContain", rest.to_vec(), is_not);
                return Mapped::expression(subject, assertion);
            }
            "match" => {
                let mut evaluate = vec![matches_selector()];
                evaluate.extend(rest.first().cloned());
                let matched = Subject::new(SubjectKind::Value, subject.call_sync("evaluateAll", evaluate));
                let assertion = matched.expect_poll("toBeTruthy", Vec::new(), is_not);
                return Mapped::expression(subject, assertion);
            }
            _ => {}
        }
    }

    let table = match subject.kind {
        SubjectKind::Locator => locator_matcher(name).map(|matcher| (matcher, false)),
        SubjectKind::Page => page_matcher(name).map(|matcher| (matcher, false)),
        _ => None,
    };
    let resolved = table.or_else(|| value_matcher(name).map(|matcher| (matcher, true)));
    let Some((matcher, is_value)) = resolved else {
        return fixme(subject, "should", arguments);
    };
    let Some(matcher_arguments) = matcher.arguments(rest) else {
        return fixme(subject, "should", arguments);
    };
    let assertion = if is_value {
        subject.expect_poll(matcher.target, matcher_arguments, is_not)
    } else {
        subject.expect_async(matcher.target, matcher_arguments, is_not)
    };
    Mapped::expression(subject, assertion)
}

/// `(elements, match) => { const matches = new Set(document.querySelectorAll(match)); return !!elements.find((e) => matches.has(e)); }`
fn matches_selector() -> Expression {
    let identifier = Expression::identifier;
    let matches = Expression::New {
        callee: Box::new(identifier("Set")),
        arguments: vec![Expression::method_call(
            identifier("document"),
            "querySelectorAll",
            vec![identifier("match")],
        )],
    };
    let has = Expression::arrow(
        vec![Pattern::Identifier("e".to_string())],
        FunctionBody::Expression(Box::new(Expression::method_call(
            identifier("matches"),
            "has",
            vec![identifier("e")],
        ))),
        false,
    );
    let not = |argument: Expression| Expression::Unary {
        operator: "!".to_string(),
        argument: Box::new(argument),
    };
    let found = not(not(Expression::method_call(identifier("elements"), "find", vec![has])));
    Expression::arrow(
        vec![
            Pattern::Identifier("elements".to_string()),
            Pattern::Identifier("match".to_string()),
        ],
        FunctionBody::Block(vec![
            Statement::declare(DeclarationKind::Const, "matches", matches),
            Statement::Return(Some(found)),
        ]),
        false,
    )
}

/// Inlines the body of a `then`, `should` or `within` callback with its
/// parameter bound to the subject.
fn scoped_callback(callback: Callback, subject: Subject, arguments: Vec<Expression>, context: &mut Context<'_>) -> Mapped {
    let name = callback.name();
    let Some(function) = arguments.first().and_then(Expression::as_function).cloned() else {
        return fixme(subject, name, arguments);
    };
    let variable = match function.params.as_slice() {
        [] if callback == Callback::Within => Some("scope".to_string()),
        [] => None,
        [Pattern::Identifier(variable), ..] => Some(variable.clone()),
        _ => return fixme(subject, name, arguments),
    };
    let mut statements = function.body.into_statements();

    let Some(variable) = variable else {
        let body = context.transformer.rewrite_statements(statements, context.state);
        return match callback {
            Callback::Should => Mapped::expression(subject, until_passing(body)),
            Callback::Then | Callback::Within => Mapped::with(subject, body),
        };
    };

    let declaration = Statement::declare(DeclarationKind::Const, variable.as_str(), subject.expression.clone());
    if subject.kind == SubjectKind::Window && callback == Callback::Then {
        // The callback runs in the browser, its body stays as written
        context.state.variables.insert(variable.clone());
        let script = Expression::arrow(
            vec![Pattern::Identifier(variable.clone())],
            FunctionBody::Block(statements),
            false,
        );
        let handle = Subject::new(SubjectKind::Window, Expression::identifier(variable));
        let evaluate = Statement::Expression(handle.call_async("evaluate", vec![script]));
        return Mapped::with(subject, vec![declaration, evaluate]);
    }

    let scoped = context.state.scope_variable(subject.kind, &variable);
    if subject.kind == SubjectKind::Locator {
        members_to_calls(&mut statements, &variable);
    }
    let mut state = scoped.state;
    let mut body = vec![declaration];
    body.extend(context.transformer.rewrite_statements(statements, &mut state));
    match callback {
        Callback::Should => Mapped::expression(subject, until_passing(body)),
        Callback::Then | Callback::Within if scoped.needs_block => Mapped::with(subject, vec![Statement::Block(body)]),
        Callback::Then | Callback::Within => Mapped::with(subject, body),
    }
}

/// `await expect(async () => { body }).toPass()`
fn until_passing(body: Vec<Statement>) -> Expression {
    let retried = Expression::arrow(Vec::new(), FunctionBody::Block(body), true);
    Expression::awaited(expect_call(retried, "toPass", Vec::new(), false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{PrintOptions, print};
    use crate::parser::parse;
    use crate::transform::transform;

    fn rewrite(code: &str) -> String {
        print(&transform(parse(code).unwrap()), &PrintOptions::default())
    }

    macro_rules! assert_rewrite {
        ($code:expr, $expected:expr $(,)?) => {
            assert_eq!(rewrite($code), $expected, "rewriting {}", $code)
        };
    }

    #[test]
    fn test_queries() {
        assert_rewrite!("cy.get('.a').click();", "await page.locator('.a').click();\n");
        assert_rewrite!("cy.get('.a');", "await expect(page.locator('.a')).toBeVisible();\n");
        assert_rewrite!(
            "cy.get('li:first').find('a').eq(2).click();",
            "await page.locator('li').first().locator('a').nth(2).click();\n"
        );
        assert_rewrite!(
            "cy.get('ul').children().first().focus();",
            "await page.locator('ul').locator(':scope > *').first().focus();\n"
        );
        assert_rewrite!(
            "cy.get('.a').parents('form').submit();",
            "await page.locator('form').filter({ has: page.locator('.a') }).evaluate((form) => form.submit());\n"
        );
    }

    #[test]
    fn test_contains() {
        assert_rewrite!("cy.contains('Save');", "await expect(page.getByText(/Save/).first()).toBeVisible();\n");
        assert_rewrite!(
            "cy.contains('button', 'Save').click();",
            "await page.locator('button', { hasText: /Save/ }).first().click();\n"
        );
    }

    #[test]
    fn test_should_matchers() {
        assert_rewrite!(
            "cy.get('.a').should('have.class', 'x');",
            "await expect(page.locator('.a')).toHaveClass(/x/);\n"
        );
        assert_rewrite!(
            "cy.get('.a').should('not.be.visible');",
            "await expect(page.locator('.a')).not.toBeVisible();\n"
        );
        assert_rewrite!(
            "cy.get('.a').should('have.length', 3).and('be.visible');",
            "await expect(page.locator('.a')).toHaveCount(3);\nawait expect(page.locator('.a')).toBeVisible();\n"
        );
        assert_rewrite!(
            "cy.url().should('include', '/users');",
            "await expect(page).toHaveURL(/\\/users/);\n"
        );
        assert_rewrite!(
            "cy.get('.a').its('length').should('be.gt', 2);",
            "await expect.poll(async () => await page.locator('.a').count()).toBeGreaterThan(2);\n"
        );
    }

    #[test]
    fn test_placeholders() {
        assert_rewrite!(
            "cy.get('.a').nextUntil('#b');",
            "page.locator('.a').FIXME_nextUntil('#b');\n"
        );
        assert_rewrite!("cy.tick(1000);", "await page.FIXME_tick(1000);\n");
        assert_rewrite!(
            "cy.get('.a').should('be.weird');",
            "await page.locator('.a').FIXME_should('be.weird');\n"
        );
        assert_rewrite!("cy.go('sideways');", "await page.FIXME_go('sideways');\n");
    }

    #[test]
    fn test_click_variants() {
        assert_rewrite!(
            "cy.get('.a').rightclick({ force: true });",
            "await page.locator('.a').click({ button: 'right', force: true });\n"
        );
        assert_rewrite!(
            "cy.get('.a').click(10, 20, { shiftKey: true });",
            "await page.locator('.a').click({ position: { x: 10, y: 20 }, modifiers: ['Shift'] });\n"
        );
        assert_rewrite!(
            "cy.get('.a').dblclick({ multiple: true });",
            "for (const locator of await page.locator('.a').all()) await locator.dblclick();\n"
        );
        assert_rewrite!(
            "cy.get('.a').click('topRight');",
            "{\n  const box = await page.locator('.a').boundingBox() || { width: 0, height: 0 };\n  // topRight\n  await page.locator('.a').click({ position: { x: box.width - 5, y: 5 } });\n}\n"
        );
        assert_rewrite!(
            "cy.get('.a').click('topLeft');",
            "{\n  // topLeft\n  await page.locator('.a').click({ position: { x: 5, y: 5 } });\n}\n"
        );
        assert_rewrite!("cy.get('.a').click('middle');", "await page.locator('.a').FIXME_click('middle');\n");
    }

    #[test]
    fn test_type() {
        assert_rewrite!(
            "cy.get('.a').type('{selectall}{backspace}hi');",
            "await page.locator('.a').press(process.platform === 'darwin' ? 'Meta+a' : 'Control+a');\nawait page.locator('.a').press('Backspace');\nawait page.locator('.a').fill('hi');\n"
        );
        assert_rewrite!(
            "cy.get('.a').type('slow', { delay: 50 });",
            "await page.locator('.a').type('slow', { delay: 50 });\n"
        );
        assert_rewrite!(
            "cy.get('.a').type('{shift}{alt}x');",
            "await page.keyboard.down('Shift');\nawait page.keyboard.down('Alt');\nawait page.locator('.a').fill('x');\nawait page.keyboard.up('Alt');\nawait page.keyboard.up('Shift');\n"
        );
        assert_rewrite!("cy.get('.a').type('{{}');", "await page.locator('.a').fill('{');\n");
        assert_rewrite!(
            "cy.get('.a').type(`${name}{enter}`);",
            "await page.locator('.a').fill(name);\nawait page.locator('.a').press('Enter');\n"
        );
        assert_rewrite!(
            "cy.get('.a').type('{f13}');",
            "await page.locator('.a').FIXME_type('{f13}');\n"
        );
    }

    #[test]
    fn test_check_and_select() {
        assert_rewrite!(
            "cy.get('[type=\"radio\"]').check(['a', 'b']);",
            "await page.locator('[type=\"radio\"]').locator('input[value=\"a\"]:scope').check();\nawait page.locator('[type=\"radio\"]').locator('input[value=\"b\"]:scope').check();\n"
        );
        assert_rewrite!(
            "cy.get('select').select('apples');",
            "await page.locator('select').selectOption('apples');\n"
        );
        assert_rewrite!("cy.check();", "await page.FIXME_check();\n");
    }

    #[test]
    fn test_viewport() {
        assert_rewrite!("cy.viewport(320, 480);", "await page.setViewportSize({ width: 320, height: 480 });\n");
        assert_rewrite!(
            "cy.viewport('iphone-6', 'landscape');",
            "// iphone-6, landscape\nawait page.setViewportSize({ width: 667, height: 375 });\n"
        );
        assert_rewrite!("cy.viewport('nokia-3310');", "await page.FIXME_viewport('nokia-3310');\n");
    }

    #[test]
    fn test_navigation() {
        assert_rewrite!("cy.go(-2);", "await page.goBack();\nawait page.goBack();\n");
        assert_rewrite!("cy.go('forward');", "await page.goForward();\n");
        assert_rewrite!("cy.reload();", "await page.reload();\n");
        assert_rewrite!(
            "cy.visit('/', { timeout: 5000, onBeforeLoad(win) { win.foo = 1; } });",
            "await page.addInitScript(async () => {\n  const win = window;\n  win.foo = 1;\n});\nawait page.goto('/', { timeout: 5000 });\n"
        );
        assert_rewrite!(
            "const path = cy.location('pathname');",
            "const path = new URL(page.url()).pathname;\n"
        );
    }

    #[test]
    fn test_request_and_aliases() {
        assert_rewrite!(
            "cy.request('POST', '/api', { a: 1 }).its('body').should('deep.equal', {});",
            "await expect.poll(async () => await (await page.request.post('/api', { data: { a: 1 } })).json()).toEqual({});\n"
        );
        assert_rewrite!(
            "cy.request({ url: '/api', method: 'options', qs: { q: 1 } });",
            "await page.request.fetch('/api', { method: 'OPTIONS', params: { q: 1 } });\n"
        );
        assert_rewrite!(
            "cy.intercept('GET', '/users').as('users');\ncy.wait('@users').its('response.statusCode').should('eq', 200);",
            "const users = page.waitForResponse('/users');\nawait expect.poll(async () => (await users).status()).toBe(200);\n"
        );
        assert_rewrite!(
            "cy.request('/a').should('have.property', 'status', 200);",
            "expect((await page.request.get('/a')).status()).toBe(200);\n"
        );
        assert_rewrite!("cy.wait(500);", "await page.waitForTimeout(500);\n");
        assert_rewrite!("cy.wait('@missing');", "await page.FIXME_wait('@missing');\n");
    }

    #[test]
    fn test_then_callbacks() {
        assert_rewrite!(
            "cy.get('.a').then(($el) => {\n  expect($el.length).to.eq(2);\n  cy.wrap($el).click();\n});",
            "const $el = page.locator('.a');\nexpect(await $el.count()).toBe(2);\nawait $el.click();\n"
        );
        assert_rewrite!(
            "cy.get('.a').then(($el) => {});\ncy.get('.b').then(($el) => {});",
            "const $el = page.locator('.a');\n{\n  const $el = page.locator('.b');\n}\n"
        );
        assert_rewrite!(
            "cy.get('.list').within(() => {\n  cy.get('li').click();\n});",
            "const scope = page.locator('.list');\nawait scope.locator('li').click();\n"
        );
    }

    #[test]
    fn test_indexed_scope_element_is_awaited() {
        assert_rewrite!(
            "cy.get('.a').then(($a) => {\n  $a[1].focus();\n});",
            "const $a = page.locator('.a');\nawait $a.nth(1).focus();\n"
        );
    }

    #[test]
    fn test_should_callback_retries() {
        assert_rewrite!(
            "cy.get('.a').should(($el) => {\n  expect($el).to.have.length(1);\n});",
            "await expect(async () => {\n  const $el = page.locator('.a');\n  await expect($el).toHaveCount(1);\n}).toPass();\n"
        );
    }

    #[test]
    fn test_window_callback_runs_in_browser() {
        assert_rewrite!(
            "cy.window().then((win) => {\n  win.localStorage.clear();\n});",
            "const win = await page.evaluateHandle('window');\nawait win.evaluate((win) => {\n  win.localStorage.clear();\n});\n"
        );
    }
}
