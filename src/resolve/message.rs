//! Message plan resolution: whether and how the thrown exception's message
//! text is asserted, plus the optional user-facing failure message.

use serde::{Deserialize, Serialize};

use crate::syntax::{
    ArgumentModel, ArgumentValue, MatchMode, ARG_EXPECTED_MESSAGE, ARG_MATCH_TYPE,
    ARG_USER_MESSAGE,
};

/// Secondary assertion on the caught exception's message text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePlan {
    pub expected: String,
    pub mode: MatchMode,
}

/// A plan exists only when an expected message is present and non-null; a
/// match mode without one is ignored entirely. An absent mode defaults to
/// exact comparison. For duplicated names the last declaration wins.
pub fn resolve_plan(model: &ArgumentModel) -> Option<MessagePlan> {
    let expected = last_string(model, ARG_EXPECTED_MESSAGE)?;

    let mode = model
        .last_named(ARG_MATCH_TYPE)
        .and_then(|argument| match &argument.value {
            ArgumentValue::EnumMember(member) => MatchMode::from_member(member),
            _ => None,
        })
        .unwrap_or(MatchMode::Exact);

    Some(MessagePlan { expected, mode })
}

/// The optional user-facing failure message. Independent of the plan: either
/// can be present without the other.
pub fn resolve_user_message(model: &ArgumentModel) -> Option<String> {
    last_string(model, ARG_USER_MESSAGE)
}

/// Last-declared string value for a name; `null` counts as absent.
fn last_string(model: &ArgumentModel, name: &str) -> Option<String> {
    match &model.last_named(name)?.value {
        ArgumentValue::Str(Some(text)) => Some(text.clone()),
        _ => None,
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

    fn model(arguments: Vec<Argument>) -> ArgumentModel {
        ArgumentModel { arguments }
    }

    #[test]
    fn test_message_without_mode_defaults_to_exact() {
        let plan = resolve_plan(&model(vec![named(
            "ExpectedMessage",
            ArgumentValue::Str(Some("boom".into())),
        )]))
        .unwrap();
        assert_eq!(plan.expected, "boom");
        assert_eq!(plan.mode, MatchMode::Exact);
    }

    #[test]
    fn test_each_mode_member_maps() {
        for (member, mode) in [
            ("MessageMatch.Exact", MatchMode::Exact),
            ("MessageMatch.Contains", MatchMode::Contains),
            ("MessageMatch.Regex", MatchMode::Regex),
            ("MessageMatch.StartsWith", MatchMode::StartsWith),
        ] {
            let plan = resolve_plan(&model(vec![
                named("ExpectedMessage", ArgumentValue::Str(Some("m".into()))),
                named("MatchType", ArgumentValue::EnumMember(member.into())),
            ]))
            .unwrap();
            assert_eq!(plan.mode, mode, "member {member}");
        }
    }

    #[test]
    fn test_unqualified_member_accepted() {
        let plan = resolve_plan(&model(vec![
            named("ExpectedMessage", ArgumentValue::Str(Some("m".into()))),
            named("MatchType", ArgumentValue::EnumMember("Contains".into())),
        ]))
        .unwrap();
        assert_eq!(plan.mode, MatchMode::Contains);
    }

    #[test]
    fn test_mode_without_message_yields_no_plan() {
        let plan = resolve_plan(&model(vec![named(
            "MatchType",
            ArgumentValue::EnumMember("MessageMatch.Regex".into()),
        )]));
        assert_eq!(plan, None);
    }

    #[test]
    fn test_null_message_counts_as_absent() {
        let plan = resolve_plan(&model(vec![named(
            "ExpectedMessage",
            ArgumentValue::Str(None),
        )]));
        assert_eq!(plan, None);
    }

    #[test]
    fn test_duplicate_message_later_wins() {
        let plan = resolve_plan(&model(vec![
            named("ExpectedMessage", ArgumentValue::Str(Some("first".into()))),
            named("ExpectedMessage", ArgumentValue::Str(Some("second".into()))),
        ]))
        .unwrap();
        assert_eq!(plan.expected, "second");
    }

    #[test]
    fn test_user_message_is_independent() {
        let arguments = model(vec![named(
            "UserMessage",
            ArgumentValue::Str(Some("This test failed.".into())),
        )]);
        assert_eq!(resolve_plan(&arguments), None);
        assert_eq!(
            resolve_user_message(&arguments),
            Some("This test failed.".into())
        );
    }

    #[test]
    fn test_null_user_message_counts_as_absent() {
        let arguments = model(vec![named("UserMessage", ArgumentValue::Str(None))]);
        assert_eq!(resolve_user_message(&arguments), None);
    }
}
