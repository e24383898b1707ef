//! Shared builders for the integration suites.

#![allow(dead_code)]

use unexpect::occurrence::{FixtureContext, Occurrence};

/// Assembles an occurrence from raw attribute lines, panicking on any
/// structural problem. Scenario tests feed well-formed annotations.
pub fn occurrence(method: &str, attributes: &[&str]) -> Occurrence {
    occurrence_with(method, attributes, &[], FixtureContext::default())
}

/// Same, with the test body supplied.
pub fn occurrence_with_body(method: &str, attributes: &[&str], body: &[&str]) -> Occurrence {
    occurrence_with(method, attributes, body, FixtureContext::default())
}

/// Same, inside a fixture that declares the self-handling capability.
pub fn occurrence_in_capability_fixture(
    method: &str,
    attributes: &[&str],
    body: &[&str],
) -> Occurrence {
    let fixture = FixtureContext {
        expects_exception: true,
        methods: vec!["HandleException".to_string()],
    };
    occurrence_with(method, attributes, body, fixture)
}

pub fn occurrence_with(
    method: &str,
    attributes: &[&str],
    body: &[&str],
    fixture: FixtureContext,
) -> Occurrence {
    let lines: Vec<String> = attributes.iter().map(|line| line.to_string()).collect();
    let body: Vec<String> = body.iter().map(|line| line.to_string()).collect();
    Occurrence::from_attribute_source(method, &lines, body, fixture)
        .expect("occurrence should assemble")
}

/// Assembly that is allowed to fail, for error-path assertions.
pub fn try_occurrence(
    method: &str,
    attributes: &[&str],
) -> Result<Occurrence, unexpect::MigrateError> {
    let lines: Vec<String> = attributes.iter().map(|line| line.to_string()).collect();
    Occurrence::from_attribute_source(method, &lines, Vec::new(), FixtureContext::default())
}
