#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Statement>,
}

/// Source text that carries no meaning but is kept to make the output readable.
#[derive(Debug, Clone, PartialEq)]
pub enum Trivia {
    /// Full comment text including its `//` or `/* */` delimiters.
    Comment(String),
    BlankLine,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Trivia(Trivia),
    Expression(Expression),
    Declaration(Declaration),
    Function(Function),
    Block(Vec<Statement>),
    If {
        test: Expression,
        consequent: Box<Statement>,
        alternate: Option<Box<Statement>>,
    },
    For {
        init: Option<ForHead>,
        test: Option<Expression>,
        update: Option<Expression>,
        body: Box<Statement>,
    },
    ForIn {
        left: ForHead,
        right: Expression,
        body: Box<Statement>,
    },
    ForOf {
        left: ForHead,
        right: Expression,
        body: Box<Statement>,
        is_await: bool,
    },
    While {
        test: Expression,
        body: Box<Statement>,
    },
    DoWhile {
        body: Box<Statement>,
        test: Expression,
    },
    Switch {
        discriminant: Expression,
        cases: Vec<SwitchCase>,
    },
    Try {
        block: Vec<Statement>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<Statement>>,
    },
    Return(Option<Expression>),
    Throw(Expression),
    Break(Option<String>),
    Continue(Option<String>),
    /// Import declarations are never rewritten, so only their text is kept.
    Import(String),
    Export(Box<Statement>),
    ExportDefault(Expression),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub target: Pattern,
    pub init: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForHead {
    Declaration(Declaration),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default:`
    pub test: Option<Expression>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    This,
    Literal(Literal),
    Template(Template),
    TaggedTemplate {
        tag: Box<Expression>,
        template: Template,
    },
    /// `None` elements are holes: `[a, , b]`
    Array(Vec<Option<Expression>>),
    Object(Vec<Property>),
    Function(Box<Function>),
    Call(Call),
    New {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Member(Member),
    Unary {
        operator: String,
        argument: Box<Expression>,
    },
    Update {
        operator: String,
        prefix: bool,
        argument: Box<Expression>,
    },
    /// Arithmetic, comparison and logical operators share one node.
    Binary {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Assignment {
        operator: String,
        target: Box<Expression>,
        value: Box<Expression>,
    },
    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
    Sequence(Vec<Expression>),
    Await(Box<Expression>),
    Spread(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Decoded value, escapes already resolved.
    String(String),
    /// Raw source text of the number.
    Number(String),
    Boolean(bool),
    Null,
    Regex { pattern: String, flags: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Raw text between substitutions, always one more than `expressions`.
    pub quasis: Vec<String>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub optional: bool,
    /// Set on calls produced by the rewriter so they are never translated twice.
    pub processed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub object: Box<Expression>,
    pub property: MemberProperty,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    Identifier(String),
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    pub is_async: bool,
    pub is_arrow: bool,
    pub is_generator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Vec<Statement>),
    Expression(Box<Expression>),
}

impl FunctionBody {
    /// Block statements of the body, an expression body becomes its own statement.
    pub fn into_statements(self) -> Vec<Statement> {
        match self {
            Self::Block(statements) => statements,
            Self::Expression(expression) => vec![Statement::Expression(*expression)],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    KeyValue { key: PropertyKey, value: Expression },
    Shorthand(String),
    Method {
        key: PropertyKey,
        kind: MethodKind,
        function: Function,
    },
    Spread(Expression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Identifier(String),
    String(String),
    Number(String),
    Computed(Box<Expression>),
}

impl PropertyKey {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) | Self::String(name) | Self::Number(name) => Some(name),
            Self::Computed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Identifier(String),
    Object(Vec<PatternProperty>),
    Array(Vec<Option<Pattern>>),
    Default {
        target: Box<Pattern>,
        value: Box<Expression>,
    },
    Rest(Box<Pattern>),
    /// Member targets, only valid in `for (a.b of c)` style heads.
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternProperty {
    KeyValue { key: PropertyKey, value: Pattern },
    Shorthand {
        name: String,
        default: Option<Expression>,
    },
    Rest(Pattern),
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    pub fn number(value: impl ToString) -> Self {
        Self::Literal(Literal::Number(value.to_string()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    pub fn regex(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::Literal(Literal::Regex {
            pattern: pattern.into(),
            flags: flags.into(),
        })
    }

    /// `object.property`, numeric properties become `object[0]`.
    pub fn member(object: Expression, property: &str) -> Self {
        let property = if !property.is_empty() && property.chars().all(|c| c.is_ascii_digit()) {
            MemberProperty::Computed(Box::new(Self::number(property)))
        } else {
            MemberProperty::Identifier(property.to_string())
        };
        Self::Member(Member {
            object: Box::new(object),
            property,
            optional: false,
        })
    }

    pub fn computed_member(object: Expression, property: Expression) -> Self {
        Self::Member(Member {
            object: Box::new(object),
            property: MemberProperty::Computed(Box::new(property)),
            optional: false,
        })
    }

    /// A call that is still open for translation.
    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Self::Call(Call {
            callee: Box::new(callee),
            arguments,
            optional: false,
            processed: false,
        })
    }

    /// `object.method(arguments)`, tagged as already translated.
    pub fn method_call(object: Expression, method: &str, arguments: Vec<Expression>) -> Self {
        Self::Call(Call {
            callee: Box::new(Self::member(object, method)),
            arguments,
            optional: false,
            processed: true,
        })
    }

    pub fn awaited(expression: Expression) -> Self {
        Self::Await(Box::new(expression))
    }

    pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, Expression)>) -> Self {
        Self::Object(
            properties
                .into_iter()
                .map(|(key, value)| {
                    let key = key.into();
                    match value {
                        Self::Identifier(name) if name == key => Property::Shorthand(name),
                        value => Property::KeyValue {
                            key: PropertyKey::Identifier(key),
                            value,
                        },
                    }
                })
                .collect(),
        )
    }

    pub fn arrow(params: Vec<Pattern>, body: FunctionBody, is_async: bool) -> Self {
        Self::Function(Box::new(Function {
            name: None,
            params,
            body,
            is_async,
            is_arrow: true,
            is_generator: false,
        }))
    }

    pub fn binary(operator: &str, left: Expression, right: Expression) -> Self {
        Self::Binary {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::Literal(Literal::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Literal(Literal::Number(raw)) => parse_number(raw),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Self::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        self.as_string().is_some()
    }

    pub fn is_number(&self) -> bool {
        self.as_number().is_some()
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// The value of a non-computed property of an object literal.
    pub fn object_property(&self, name: &str) -> Option<&Expression> {
        let Self::Object(properties) = self else {
            return None;
        };
        properties.iter().find_map(|property| match property {
            Property::KeyValue { key, value } if key.name() == Some(name) => Some(value),
            _ => None,
        })
    }
}

/// Numeric value of a number literal's raw text.
pub fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.replace('_', "");
    let raw = raw.trim_end_matches('n');
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|value| value as f64);
    }
    raw.parse().ok()
}

impl Statement {
    pub fn expression(expression: Expression) -> Self {
        Self::Expression(expression)
    }

    pub fn declare(kind: DeclarationKind, name: impl Into<String>, init: Expression) -> Self {
        Self::Declaration(Declaration {
            kind,
            declarators: vec![Declarator {
                target: Pattern::Identifier(name.into()),
                init: Some(init),
            }],
        })
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Trivia(Trivia::Comment(text.into()))
    }
}

impl Pattern {
    /// `{ page }`
    pub fn destructure(names: &[&str]) -> Self {
        Self::Object(
            names
                .iter()
                .map(|name| PatternProperty::Shorthand {
                    name: name.to_string(),
                    default: None,
                })
                .collect(),
        )
    }
}
