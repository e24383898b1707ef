//! Attribute-section parser - clean, minimal implementation.
//!
//! Converts the raw text of a test method's attribute section into structural
//! [`AttributeSection`] values with source location tracking. This parser is
//! purely syntactic - no screening of argument names or value kinds happens
//! here.

use crate::errors::{to_source_span, ErrorKind, MigrateError, SourceContext};
use crate::syntax::{
    Argument, ArgumentValue, AttributeEntry, AttributeSection, BracketGroup, Span,
};
use pest::{error::Error, iterators::Pair, Parser};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct AttributeParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse the attribute section of one test method.
///
/// The section text is the bracket groups joined with newlines, exactly as
/// they appear above the method; spans in the result index into that text.
pub fn parse_section(
    source_text: &str,
    source_context: &SourceContext,
) -> Result<AttributeSection, MigrateError> {
    if source_text.trim().is_empty() {
        return Ok(AttributeSection::default());
    }

    let pairs = AttributeParser::parse(Rule::section, source_text)
        .map_err(|e| convert_parse_error(e, source_context))?;

    let section = pairs.peek().unwrap(); // pest guarantees section rule exists

    let groups: Result<Vec<_>, _> = section
        .into_inner()
        .filter(|p| p.as_rule() == Rule::bracket_group)
        .map(|p| build_group(p, source_text, source_context))
        .collect();

    Ok(AttributeSection { groups: groups? })
}

// ============================================================================
// STRUCTURE BUILDERS
// ============================================================================

fn build_group(
    pair: Pair<Rule>,
    source_text: &str,
    source: &SourceContext,
) -> Result<BracketGroup, MigrateError> {
    let span = get_span(&pair);
    let line = line_at(source_text, span.start);

    let entries: Result<Vec<_>, _> = pair
        .into_inner()
        .map(|p| build_entry(p, source))
        .collect();

    Ok(BracketGroup {
        entries: entries?,
        span,
        line,
    })
}

fn build_entry(pair: Pair<Rule>, source: &SourceContext) -> Result<AttributeEntry, MigrateError> {
    let span = get_span(&pair);
    let mut inner = pair.into_inner();

    let name_pair = inner.next().ok_or_else(|| {
        make_error(
            source,
            ErrorKind::MissingElement {
                element: "attribute name".into(),
            },
            span,
        )
    })?;
    let name = name_pair.as_str().to_string();

    let mut arguments = Vec::new();
    if let Some(group) = inner.next() {
        for argument in group.into_inner() {
            arguments.push(build_argument(argument, source)?);
        }
    }

    Ok(AttributeEntry {
        name,
        arguments,
        span,
    })
}

fn build_argument(pair: Pair<Rule>, source: &SourceContext) -> Result<Argument, MigrateError> {
    let span = get_span(&pair);
    let inner = pair.into_inner().next().unwrap(); // grammar guarantees inner exists

    match inner.as_rule() {
        Rule::named_argument => {
            let mut parts = inner.into_inner();
            let name_pair = parts.next().unwrap(); // grammar guarantees identifier
            let value_pair = parts.next().ok_or_else(|| {
                make_error(
                    source,
                    ErrorKind::MissingElement {
                        element: "value after '='".into(),
                    },
                    span,
                )
            })?;
            Ok(Argument {
                name: Some(name_pair.as_str().to_string()),
                value: build_value(value_pair, source)?,
                span,
            })
        }
        Rule::value => Ok(Argument {
            name: None,
            value: build_value(inner, source)?,
            span,
        }),
        rule => Err(make_error(
            source,
            ErrorKind::MalformedAttribute {
                construct: format!("argument (unsupported rule: {:?})", rule),
            },
            span,
        )),
    }
}

fn build_value(pair: Pair<Rule>, source: &SourceContext) -> Result<ArgumentValue, MigrateError> {
    let span = get_span(&pair);
    let inner = pair.into_inner().next().unwrap(); // grammar guarantees inner exists

    match inner.as_rule() {
        Rule::typeof_ref => {
            let name = inner.into_inner().next().ok_or_else(|| {
                make_error(
                    source,
                    ErrorKind::MissingElement {
                        element: "type name inside typeof".into(),
                    },
                    span,
                )
            })?;
            Ok(ArgumentValue::TypeRef(name.as_str().to_string()))
        }
        Rule::null_lit => Ok(ArgumentValue::Str(None)),
        Rule::string => Ok(ArgumentValue::Str(Some(unescape_string(inner.as_str())))),
        Rule::number => Ok(ArgumentValue::Number(inner.as_str().to_string())),
        Rule::enum_ref => Ok(ArgumentValue::EnumMember(inner.as_str().to_string())),
        rule => Err(make_error(
            source,
            ErrorKind::MalformedAttribute {
                construct: format!("value (unsupported rule: {:?})", rule),
            },
            span,
        )),
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn get_span(pair: &Pair<Rule>) -> Span {
    Span {
        start: pair.as_span().start(),
        end: pair.as_span().end(),
    }
}

/// Line index of a byte offset within the section text.
fn line_at(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .map(|prefix| prefix.matches('\n').count())
        .unwrap_or(0)
}

fn unescape_string(text: &str) -> String {
    // Remove surrounding quotes
    let inner = &text[1..text.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn make_error(source: &SourceContext, kind: ErrorKind, span: Span) -> MigrateError {
    let error_code = format!("unexpect::parse::{}", kind.code_suffix());
    MigrateError {
        kind,
        source_info: crate::errors::SourceInfo {
            source: source.to_named_source(),
            primary_span: to_source_span(span),
            phase: "parse".to_string(),
        },
        diagnostic_info: crate::errors::DiagnosticInfo {
            help: None,
            error_code,
        },
    }
}

fn convert_parse_error(error: Error<Rule>, source: &SourceContext) -> MigrateError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span {
            start: pos,
            end: pos,
        },
        pest::error::InputLocation::Span((start, end)) => Span { start, end },
    };

    // Simple error message improvement
    let message = if error.to_string().contains("expected \"]\"") {
        "bracket group (missing closing bracket)"
    } else if error.to_string().contains("expected \")\"") {
        "argument list (missing closing parenthesis)"
    } else if error.to_string().contains("expected \"\\\"\"") {
        "string literal (missing closing quote)"
    } else {
        "attribute syntax"
    };

    make_error(
        source,
        ErrorKind::MalformedAttribute {
            construct: message.to_string(),
        },
        span,
    )
}
