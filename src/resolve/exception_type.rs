//! Exception type resolution: which single type the rewritten assertion
//! checks against.

use serde::{Deserialize, Serialize};

use crate::syntax::{
    ArgumentModel, ArgumentValue, ARG_EXPECTED_EXCEPTION, ARG_EXPECTED_EXCEPTION_NAME,
};

/// Root exception type of the legacy platform, asserted on when no specific
/// type is determinable.
pub const DEFAULT_EXCEPTION_TYPE: &str = "System.Exception";

/// The single exception type the rewritten assertion checks against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedExceptionType {
    /// Type text exactly as written in source, fully- or simply-qualified.
    Named(String),
    /// No specific type was determinable; the platform root applies.
    Default,
}

impl ResolvedExceptionType {
    /// The type name to emit.
    pub fn type_name(&self) -> &str {
        match self {
            ResolvedExceptionType::Named(name) => name,
            ResolvedExceptionType::Default => DEFAULT_EXCEPTION_TYPE,
        }
    }
}

/// Decide the exception type under the precedence policy: a positional
/// argument wins unconditionally; otherwise the last type-denoting named
/// argument in declaration order; a null or empty winner, or no candidate at
/// all, falls back to the default type.
///
/// One forward scan over the declaration-ordered list. Independent lookups by
/// name would lose the later-declaration rule, so the scan must stay.
pub fn resolve(model: &ArgumentModel) -> ResolvedExceptionType {
    let mut winner: Option<&ArgumentValue> = None;

    for argument in &model.arguments {
        match argument.name.as_deref() {
            // Positional wins outright, wherever it was declared.
            None => return from_value(&argument.value),
            Some(ARG_EXPECTED_EXCEPTION) | Some(ARG_EXPECTED_EXCEPTION_NAME) => {
                winner = Some(&argument.value);
            }
            Some(_) => {}
        }
    }

    winner.map(from_value).unwrap_or(ResolvedExceptionType::Default)
}

fn from_value(value: &ArgumentValue) -> ResolvedExceptionType {
    match value {
        ArgumentValue::TypeRef(name) => ResolvedExceptionType::Named(name.clone()),
        ArgumentValue::Str(Some(name)) if !name.is_empty() => {
            ResolvedExceptionType::Named(name.clone())
        }
        _ => ResolvedExceptionType::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Argument, Span};

    fn named(name: &str, value: ArgumentValue) -> Argument {
        Argument {
            name: Some(name.into()),
            value,
            span: Span::default(),
        }
    }

    fn positional(value: ArgumentValue) -> Argument {
        Argument {
            name: None,
            value,
            span: Span::default(),
        }
    }

    fn model(arguments: Vec<Argument>) -> ArgumentModel {
        ArgumentModel { arguments }
    }

    #[test]
    fn test_no_arguments_resolves_to_default() {
        let resolved = resolve(&model(vec![]));
        assert_eq!(resolved, ResolvedExceptionType::Default);
        assert_eq!(resolved.type_name(), "System.Exception");
    }

    #[test]
    fn test_positional_typeof() {
        let resolved = resolve(&model(vec![positional(ArgumentValue::TypeRef(
            "System.InvalidOperationException".into(),
        ))]));
        assert_eq!(
            resolved,
            ResolvedExceptionType::Named("System.InvalidOperationException".into())
        );
    }

    #[test]
    fn test_positional_string_name() {
        let resolved = resolve(&model(vec![positional(ArgumentValue::Str(Some(
            "ArgumentException".into(),
        )))]));
        assert_eq!(
            resolved,
            ResolvedExceptionType::Named("ArgumentException".into())
        );
    }

    #[test]
    fn test_positional_beats_named_declared_before() {
        let resolved = resolve(&model(vec![
            named(
                "ExpectedExceptionName",
                ArgumentValue::Str(Some("FormatException".into())),
            ),
            positional(ArgumentValue::TypeRef("ArgumentException".into())),
        ]));
        assert_eq!(
            resolved,
            ResolvedExceptionType::Named("ArgumentException".into())
        );
    }

    #[test]
    fn test_positional_beats_named_declared_after() {
        let resolved = resolve(&model(vec![
            positional(ArgumentValue::TypeRef("ArgumentException".into())),
            named(
                "ExpectedException",
                ArgumentValue::TypeRef("FormatException".into()),
            ),
        ]));
        assert_eq!(
            resolved,
            ResolvedExceptionType::Named("ArgumentException".into())
        );
    }

    #[test]
    fn test_later_named_wins_across_both_names() {
        let resolved = resolve(&model(vec![
            named(
                "ExpectedException",
                ArgumentValue::TypeRef("ArgumentException".into()),
            ),
            named(
                "ExpectedExceptionName",
                ArgumentValue::Str(Some("FormatException".into())),
            ),
        ]));
        assert_eq!(
            resolved,
            ResolvedExceptionType::Named("FormatException".into())
        );

        let resolved = resolve(&model(vec![
            named(
                "ExpectedExceptionName",
                ArgumentValue::Str(Some("FormatException".into())),
            ),
            named(
                "ExpectedException",
                ArgumentValue::TypeRef("ArgumentException".into()),
            ),
        ]));
        assert_eq!(
            resolved,
            ResolvedExceptionType::Named("ArgumentException".into())
        );
    }

    #[test]
    fn test_duplicate_name_later_wins() {
        let resolved = resolve(&model(vec![
            named("ExpectedExceptionName", ArgumentValue::Str(Some("A".into()))),
            named("ExpectedExceptionName", ArgumentValue::Str(Some("B".into()))),
        ]));
        assert_eq!(resolved, ResolvedExceptionType::Named("B".into()));
    }

    #[test]
    fn test_empty_string_falls_back_to_default() {
        let resolved = resolve(&model(vec![named(
            "ExpectedExceptionName",
            ArgumentValue::Str(Some(String::new())),
        )]));
        assert_eq!(resolved, ResolvedExceptionType::Default);
    }

    #[test]
    fn test_null_falls_back_to_default() {
        let resolved = resolve(&model(vec![named(
            "ExpectedExceptionName",
            ArgumentValue::Str(None),
        )]));
        assert_eq!(resolved, ResolvedExceptionType::Default);
    }

    #[test]
    fn test_positional_null_falls_back_to_default() {
        let resolved = resolve(&model(vec![positional(ArgumentValue::Str(None))]));
        assert_eq!(resolved, ResolvedExceptionType::Default);
    }

    #[test]
    fn test_verbatim_text_is_preserved() {
        // No namespace inference: the simple name stays simple.
        let resolved = resolve(&model(vec![named(
            "ExpectedException",
            ArgumentValue::TypeRef("InvalidOperationException".into()),
        )]));
        assert_eq!(
            resolved.type_name(),
            "InvalidOperationException"
        );
    }
}
