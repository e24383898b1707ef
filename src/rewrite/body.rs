//! Body synthesis: from the three resolutions and the original statements to
//! the replacement statement sequence, and its text rendering.
//!
//! The synthesized shapes are a contract. Hosts and tests rely on the exact
//! forms: `Throws<T>({ ... });` wrapping the original statements,
//! `captured = Throws<T>({ ... });` when a later statement needs the thrown
//! exception, `assert(captured.message <op> "...");` for the message check,
//! and `Handler(captured);` for the handler invocation, in that order.

use serde::{Deserialize, Serialize};

use crate::resolve::Resolution;
use crate::syntax::{escape_string, MatchMode};

/// Identifier the caught exception is bound to when a later statement needs
/// it.
pub const CAPTURED_BINDING: &str = "captured";

/// One statement of a synthesized test body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// An original statement, carried through unchanged.
    Verbatim(String),
    /// The throws-assertion wrapping the original body.
    AssertThrows {
        exception_type: String,
        body: Vec<Statement>,
        binding: Option<String>,
        user_message: Option<String>,
    },
    /// Secondary assertion on the caught exception's message text.
    AssertMessage {
        binding: String,
        mode: MatchMode,
        expected: String,
    },
    /// Handler invocation with the caught exception.
    InvokeHandler { method: String, binding: String },
}

/// Build the replacement body for one occurrence.
///
/// The original statements move inside the throws-assertion unchanged. A
/// message plan or handler plan forces a capture of the thrown exception;
/// with a capture present the user message is dropped rather than decorated.
pub fn synthesize(resolution: &Resolution, original_body: &[String]) -> Vec<Statement> {
    let needs_capture = resolution.message.is_some() || resolution.handler.is_some();

    let body = original_body
        .iter()
        .cloned()
        .map(Statement::Verbatim)
        .collect();

    let throws = Statement::AssertThrows {
        exception_type: resolution.exception_type.type_name().to_string(),
        body,
        binding: needs_capture.then(|| CAPTURED_BINDING.to_string()),
        user_message: if needs_capture {
            None
        } else {
            resolution.user_message.clone()
        },
    };

    let mut statements = vec![throws];

    if let Some(plan) = &resolution.message {
        statements.push(Statement::AssertMessage {
            binding: CAPTURED_BINDING.to_string(),
            mode: plan.mode,
            expected: plan.expected.clone(),
        });
    }

    if let Some(plan) = &resolution.handler {
        statements.push(Statement::InvokeHandler {
            method: plan.method.clone(),
            binding: CAPTURED_BINDING.to_string(),
        });
    }

    statements
}

impl Statement {
    /// Pretty-prints the statement. Simple statements take one line; the
    /// throws-assertion prints as a brace block with its body indented four
    /// spaces, or `{}` when the original body was empty.
    pub fn pretty(&self) -> String {
        match self {
            Statement::Verbatim(text) => text.clone(),
            Statement::AssertThrows {
                exception_type,
                body,
                binding,
                user_message,
            } => {
                let mut result = String::new();
                if let Some(binding) = binding {
                    result.push_str(binding);
                    result.push_str(" = ");
                }
                result.push_str("Throws<");
                result.push_str(exception_type);
                result.push_str(">(");
                if body.is_empty() {
                    result.push_str("{}");
                } else {
                    result.push_str("{\n");
                    for statement in body {
                        for line in statement.pretty().lines() {
                            result.push_str("    ");
                            result.push_str(line);
                            result.push('\n');
                        }
                    }
                    result.push('}');
                }
                if let Some(message) = user_message {
                    result.push_str(", \"");
                    result.push_str(&escape_string(message));
                    result.push('"');
                }
                result.push_str(");");
                result
            }
            Statement::AssertMessage {
                binding,
                mode,
                expected,
            } => format!(
                "assert({}.message {} \"{}\");",
                binding,
                mode.operator(),
                escape_string(expected)
            ),
            Statement::InvokeHandler { method, binding } => format!("{}({});", method, binding),
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

/// Renders a whole body, one statement per line.
pub fn render_body(statements: &[Statement]) -> String {
    statements
        .iter()
        .map(Statement::pretty)
        .collect::<Vec<_>>()
        .join("\n")
}
