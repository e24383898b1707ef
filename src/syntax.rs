//! Syntax module for the legacy annotation surface.
//!
//! This module provides the structural types for bracketed attribute sections
//! and their arguments, with source location tracking. The argument model is a
//! single declaration-ordered list; the positional and named views are derived
//! from it so that precedence rules can run as one ordered scan.

use serde::{Deserialize, Serialize};

pub mod parser;

/// Named arguments of the exception-expectation annotation.
pub const ARG_EXPECTED_EXCEPTION: &str = "ExpectedException";
pub const ARG_EXPECTED_EXCEPTION_NAME: &str = "ExpectedExceptionName";
pub const ARG_EXPECTED_MESSAGE: &str = "ExpectedMessage";
pub const ARG_MATCH_TYPE: &str = "MatchType";
pub const ARG_USER_MESSAGE: &str = "UserMessage";
pub const ARG_HANDLER: &str = "Handler";

/// Both spellings the attribute may carry in source.
pub const ANNOTATION_NAMES: [&str; 2] = ["ExpectedException", "ExpectedExceptionAttribute"];

/// Represents a span in the attribute-section source text.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// One attribute argument value, structurally parsed, raw text preserved.
///
/// `Number` never appears legally on the annotation itself; it is tolerated at
/// parse time because sibling attributes (`TestCase(1)`) carry such arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgumentValue {
    /// `typeof(X)`; carries the verbatim text inside the parentheses.
    TypeRef(String),
    /// A string literal; `None` encodes the `null` keyword.
    Str(Option<String>),
    /// A dotted enum member reference such as `MessageMatch.Contains`.
    EnumMember(String),
    /// A numeric literal, verbatim.
    Number(String),
}

/// One argument of an attribute entry: optionally named, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: Option<String>,
    pub value: ArgumentValue,
    pub span: Span,
}

/// The canonical argument model of one annotation occurrence.
///
/// Holds the arguments exactly as declared: order preserved, duplicates
/// allowed, no validation beyond structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArgumentModel {
    pub arguments: Vec<Argument>,
}

/// A single parsed attribute entry, e.g. `ExpectedException(typeof(X))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

/// One bracket group `[A, B(...)]` with its line index within the section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketGroup {
    pub entries: Vec<AttributeEntry>,
    pub span: Span,
    pub line: usize,
}

/// A full attribute section: every bracket group above one test method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeSection {
    pub groups: Vec<BracketGroup>,
}

/// How the thrown exception's message text is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    Exact,
    Contains,
    Regex,
    StartsWith,
}

impl ArgumentModel {
    /// Positional view, in declaration order.
    pub fn positional(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| a.name.is_none())
    }

    /// Named view, in declaration order.
    pub fn named(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| a.name.is_some())
    }

    /// The first positional argument, if any.
    pub fn first_positional(&self) -> Option<&Argument> {
        self.positional().next()
    }

    /// The last declaration of the given name. Later duplicates shadow
    /// earlier ones, which is exactly the assignment order the legacy
    /// annotation applied its named arguments in.
    pub fn last_named(&self, name: &str) -> Option<&Argument> {
        self.arguments
            .iter()
            .filter(|a| a.name.as_deref() == Some(name))
            .last()
    }
}

impl ArgumentValue {
    /// Returns the kind of this value as a string (for diagnostics).
    pub fn kind_name(&self) -> &'static str {
        match self {
            ArgumentValue::TypeRef(_) => "type reference",
            ArgumentValue::Str(_) => "string",
            ArgumentValue::EnumMember(_) => "enum member",
            ArgumentValue::Number(_) => "number",
        }
    }

    /// Pretty-prints the value in its source spelling.
    pub fn pretty(&self) -> String {
        match self {
            ArgumentValue::TypeRef(name) => format!("typeof({})", name),
            ArgumentValue::Str(Some(text)) => format!("\"{}\"", escape_string(text)),
            ArgumentValue::Str(None) => "null".to_string(),
            ArgumentValue::EnumMember(path) => path.clone(),
            ArgumentValue::Number(raw) => raw.clone(),
        }
    }
}

impl std::fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

impl Argument {
    /// Pretty-prints the argument as `Name = value` or bare `value`.
    pub fn pretty(&self) -> String {
        match &self.name {
            Some(name) => format!("{} = {}", name, self.value.pretty()),
            None => self.value.pretty(),
        }
    }
}

impl AttributeEntry {
    /// Whether this entry is the exception-expectation annotation, under
    /// either spelling.
    pub fn is_expectation(&self) -> bool {
        ANNOTATION_NAMES.contains(&self.name.as_str())
    }

    /// Pretty-prints the entry as `Name` or `Name(arg, arg)`.
    pub fn pretty(&self) -> String {
        if self.arguments.is_empty() {
            return self.name.clone();
        }
        let inner = self
            .arguments
            .iter()
            .map(Argument::pretty)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, inner)
    }
}

impl BracketGroup {
    /// Pretty-prints the group as `[A, B(...)]`.
    pub fn pretty(&self) -> String {
        let inner = self
            .entries
            .iter()
            .map(AttributeEntry::pretty)
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{}]", inner)
    }
}

impl MatchMode {
    /// Parses an enum member reference, with or without its
    /// `MessageMatch.` qualifier.
    pub fn from_member(path: &str) -> Option<Self> {
        let member = path.rsplit('.').next().unwrap_or(path);
        match member {
            "Exact" => Some(MatchMode::Exact),
            "Contains" => Some(MatchMode::Contains),
            "Regex" => Some(MatchMode::Regex),
            "StartsWith" => Some(MatchMode::StartsWith),
            _ => None,
        }
    }

    /// The comparison operator this mode renders as in a message assertion.
    pub const fn operator(&self) -> &'static str {
        match self {
            MatchMode::Exact => "==",
            MatchMode::Contains => "contains",
            MatchMode::Regex => "matches",
            MatchMode::StartsWith => "startsWith",
        }
    }
}

/// Escapes a string for emission inside double quotes, the inverse of the
/// parser's unescaping.
pub fn escape_string(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            other => result.push(other),
        }
    }
    result
}
