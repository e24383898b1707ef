//! Resolution: from argument model to the three migration decisions.
//!
//! A single screening pass rejects argument shapes outside the supported set.
//! After it, the three resolvers are total functions and mutually
//! independent: each reads only the argument model (plus the fixture context
//! for the handler), never another resolver's output.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{to_source_span, ErrorReporting, MigrateError, PhaseContext};
use crate::occurrence::Occurrence;
use crate::syntax::{self, ArgumentModel, ArgumentValue, MatchMode};

pub mod exception_type;
pub mod handler;
pub mod message;

pub use exception_type::{ResolvedExceptionType, DEFAULT_EXCEPTION_TYPE};
pub use handler::{HandlerPlan, IMPLICIT_HANDLER_METHOD};
pub use message::MessagePlan;

/// Expected value kind of each supported named argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExpectedKind {
    TypeRef,
    Str,
    Enum,
}

impl ExpectedKind {
    const fn describe(&self) -> &'static str {
        match self {
            ExpectedKind::TypeRef => "type reference",
            ExpectedKind::Str => "string",
            ExpectedKind::Enum => "enum member",
        }
    }
}

static KNOWN_ARGUMENTS: Lazy<HashMap<&'static str, ExpectedKind>> = Lazy::new(|| {
    HashMap::from([
        (syntax::ARG_EXPECTED_EXCEPTION, ExpectedKind::TypeRef),
        (syntax::ARG_EXPECTED_EXCEPTION_NAME, ExpectedKind::Str),
        (syntax::ARG_EXPECTED_MESSAGE, ExpectedKind::Str),
        (syntax::ARG_MATCH_TYPE, ExpectedKind::Enum),
        (syntax::ARG_USER_MESSAGE, ExpectedKind::Str),
        (syntax::ARG_HANDLER, ExpectedKind::Str),
    ])
});

/// Everything the three resolvers decided for one occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub exception_type: ResolvedExceptionType,
    pub message: Option<MessagePlan>,
    pub user_message: Option<String>,
    pub handler: Option<HandlerPlan>,
}

/// Screen the argument model, then run the three resolvers.
///
/// Either fully succeeds or fully fails; no partial resolution escapes.
pub fn resolve(occurrence: &Occurrence) -> Result<Resolution, MigrateError> {
    let ctx = occurrence.reporting();
    screen_arguments(&occurrence.arguments, &ctx)?;

    Ok(Resolution {
        exception_type: exception_type::resolve(&occurrence.arguments),
        message: message::resolve_plan(&occurrence.arguments),
        user_message: message::resolve_user_message(&occurrence.arguments),
        handler: handler::resolve(&occurrence.arguments, &occurrence.fixture),
    })
}

/// Reject argument shapes outside the supported set.
///
/// Checks, in declaration order: at most one positional argument, of type
/// reference or string kind; every named argument known by name, carrying the
/// value kind its name requires; match-mode members limited to the four the
/// legacy surface defines.
pub fn screen_arguments(
    model: &ArgumentModel,
    ctx: &PhaseContext,
) -> Result<(), MigrateError> {
    let positionals: Vec<_> = model.positional().collect();
    if positionals.len() > 1 {
        let surplus = positionals[1];
        return Err(ctx.surplus_positional(positionals.len(), to_source_span(surplus.span)));
    }
    if let Some(first) = positionals.first() {
        match &first.value {
            ArgumentValue::TypeRef(_) | ArgumentValue::Str(_) => {}
            other => {
                return Err(ctx.value_kind(
                    "positional argument",
                    "type reference or string",
                    other.kind_name(),
                    to_source_span(first.span),
                ));
            }
        }
    }

    for argument in model.named() {
        let Some(name) = argument.name.as_deref() else {
            continue;
        };
        let Some(expected) = KNOWN_ARGUMENTS.get(name) else {
            return Err(ctx.unknown_argument(name, to_source_span(argument.span)));
        };
        match (expected, &argument.value) {
            (ExpectedKind::TypeRef, ArgumentValue::TypeRef(_)) => {}
            (ExpectedKind::Str, ArgumentValue::Str(_)) => {}
            (ExpectedKind::Enum, ArgumentValue::EnumMember(member)) => {
                if MatchMode::from_member(member).is_none() {
                    return Err(ctx.unknown_match_mode(member, to_source_span(argument.span)));
                }
            }
            (expected, actual) => {
                return Err(ctx.value_kind(
                    name,
                    expected.describe(),
                    actual.kind_name(),
                    to_source_span(argument.span),
                ));
            }
        }
    }

    Ok(())
}
