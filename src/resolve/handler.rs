//! Handler resolution: whether the rewritten test invokes a handler method
//! with the caught exception.

use serde::{Deserialize, Serialize};

use crate::occurrence::FixtureContext;
use crate::syntax::{ArgumentModel, ArgumentValue, ARG_HANDLER};

/// Method name the legacy self-handling marker binds to.
pub const IMPLICIT_HANDLER_METHOD: &str = "HandleException";

/// Invocation of a handler method with the caught exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerPlan {
    pub method: String,
}

/// An explicit handler argument wins outright; otherwise the fixture's
/// self-handling capability implies the fixed well-known method; otherwise no
/// handler. A `null` handler argument counts as absent, so the capability
/// fallback still applies.
///
/// The named method is never checked against the fixture's member list; that
/// is the hosting front end's concern if it chooses to validate.
pub fn resolve(model: &ArgumentModel, fixture: &FixtureContext) -> Option<HandlerPlan> {
    if let Some(argument) = model.last_named(ARG_HANDLER) {
        if let ArgumentValue::Str(Some(method)) = &argument.value {
            return Some(HandlerPlan {
                method: method.clone(),
            });
        }
    }

    if fixture.expects_exception {
        return Some(HandlerPlan {
            method: IMPLICIT_HANDLER_METHOD.to_string(),
        });
    }

    None
}
