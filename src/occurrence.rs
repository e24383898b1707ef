//! Occurrence assembly.
//!
//! Locates the exception-expectation annotation within a parsed attribute
//! section and packages everything the engine needs to migrate one test
//! method: the argument model, the original body, the fixture facts, and the
//! annotation's position for the attribute edit.

use serde::{Deserialize, Serialize};

use crate::errors::{to_source_span, ErrorReporting, MigrateError, PhaseContext, SourceContext};
use crate::syntax::{parser, ArgumentModel, AttributeSection, Span};

/// Where the annotation sits within its bracket group.
///
/// `group_index` counts the bracket groups sharing the annotation's line, in
/// source order. A line usually carries one group, but `[A] [B]` is legal;
/// the index keeps edits aimed at the annotation's own group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttributeForm {
    /// The annotation is its bracket group's only entry; removal takes the
    /// whole line when the group stands alone on it, or just the group when
    /// siblings share the line.
    SoleInBracket {
        line: usize,
        group_index: usize,
        groups_on_line: usize,
    },
    /// The annotation shares a bracket group with other attributes; removal
    /// excises just the entry and one separator.
    ListEntry {
        line: usize,
        group_index: usize,
        entry_index: usize,
        entry_count: usize,
    },
}

impl AttributeForm {
    /// Line index of the bracket group within the attribute section.
    pub const fn line(&self) -> usize {
        match self {
            AttributeForm::SoleInBracket { line, .. } => *line,
            AttributeForm::ListEntry { line, .. } => *line,
        }
    }
}

/// Structural facts about the enclosing test fixture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureContext {
    /// Whether the fixture declares the legacy self-handling marker
    /// (`IExpectException`).
    pub expects_exception: bool,
    /// Method names declared by the fixture. The engine never resolves
    /// against these; hosts may use them for existence warnings.
    pub methods: Vec<String>,
}

/// One instance of the legacy annotation on one test method - the unit of
/// migration. All fields are per-occurrence; nothing is shared across
/// occurrences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occurrence {
    /// Test method name, for reporting only.
    pub method: String,
    /// The annotation's arguments, in declaration order.
    pub arguments: ArgumentModel,
    /// Original body statements, verbatim.
    pub body: Vec<String>,
    pub fixture: FixtureContext,
    pub attribute_form: AttributeForm,
    /// Attribute-section text for error labels. Defaults to a fallback for
    /// occurrences built directly from structured data.
    #[serde(skip, default)]
    pub source: SourceContext,
}

impl Occurrence {
    /// Assemble an occurrence from the raw attribute lines above a method.
    ///
    /// The lines are parsed as one section; the first entry spelled
    /// `ExpectedException` (or `ExpectedExceptionAttribute`) is taken as the
    /// annotation. No entry at all is the typed `AnnotationNotFound` error.
    pub fn from_attribute_source(
        method: impl Into<String>,
        attribute_lines: &[String],
        body: Vec<String>,
        fixture: FixtureContext,
    ) -> Result<Self, MigrateError> {
        let method = method.into();
        let section_text = attribute_lines.join("\n");
        let source = SourceContext::from_file(method.clone(), section_text.clone());

        let section = parser::parse_section(&section_text, &source)?;

        let Some((attribute_form, arguments)) = find_annotation(&section) else {
            let ctx = PhaseContext::new(source, "arguments");
            let whole = Span {
                start: 0,
                end: section_text.len(),
            };
            return Err(ctx.annotation_not_found(to_source_span(whole)));
        };

        Ok(Self {
            method,
            arguments,
            body,
            fixture,
            attribute_form,
            source,
        })
    }

    /// Error-reporting context for this occurrence's resolution phase.
    pub fn reporting(&self) -> PhaseContext {
        PhaseContext::new(self.source.clone(), "arguments")
    }
}

/// Locates the first annotation entry in a section and derives its form and
/// argument model. Further annotation entries, not a shape the legacy
/// framework accepted, are ignored.
pub fn find_annotation(section: &AttributeSection) -> Option<(AttributeForm, ArgumentModel)> {
    for (position, group) in section.groups.iter().enumerate() {
        for (entry_index, entry) in group.entries.iter().enumerate() {
            if !entry.is_expectation() {
                continue;
            }
            let line = group.line;
            let group_index = section.groups[..position]
                .iter()
                .filter(|g| g.line == line)
                .count();
            let groups_on_line = section.groups.iter().filter(|g| g.line == line).count();
            let form = if group.entries.len() == 1 {
                AttributeForm::SoleInBracket {
                    line,
                    group_index,
                    groups_on_line,
                }
            } else {
                AttributeForm::ListEntry {
                    line,
                    group_index,
                    entry_index,
                    entry_count: group.entries.len(),
                }
            };
            let model = ArgumentModel {
                arguments: entry.arguments.clone(),
            };
            return Some((form, model));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::syntax::ArgumentValue;

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sole_attribute_form() {
        let occ = Occurrence::from_attribute_source(
            "TestMethod",
            &lines(&["[Test]", "[ExpectedException]"]),
            vec![],
            FixtureContext::default(),
        )
        .unwrap();
        assert_eq!(
            occ.attribute_form,
            AttributeForm::SoleInBracket {
                line: 1,
                group_index: 0,
                groups_on_line: 1,
            }
        );
        assert!(occ.arguments.arguments.is_empty());
    }

    #[test]
    fn test_list_entry_form() {
        let occ = Occurrence::from_attribute_source(
            "TestMethod",
            &lines(&["[Test, ExpectedException(typeof(System.ArgumentException))]"]),
            vec![],
            FixtureContext::default(),
        )
        .unwrap();
        assert_eq!(
            occ.attribute_form,
            AttributeForm::ListEntry {
                line: 0,
                group_index: 0,
                entry_index: 1,
                entry_count: 2,
            }
        );
        assert_eq!(
            occ.arguments.first_positional().map(|a| &a.value),
            Some(&ArgumentValue::TypeRef("System.ArgumentException".into()))
        );
    }

    #[test]
    fn test_suffixed_spelling_recognized() {
        let occ = Occurrence::from_attribute_source(
            "TestMethod",
            &lines(&["[ExpectedExceptionAttribute]"]),
            vec![],
            FixtureContext::default(),
        )
        .unwrap();
        assert_eq!(
            occ.attribute_form,
            AttributeForm::SoleInBracket {
                line: 0,
                group_index: 0,
                groups_on_line: 1,
            }
        );
    }

    #[test]
    fn test_shared_line_locates_annotation_group() {
        let occ = Occurrence::from_attribute_source(
            "TestMethod",
            &lines(&["[A, B] [Test, ExpectedException(typeof(MyError))]"]),
            vec![],
            FixtureContext::default(),
        )
        .unwrap();
        assert_eq!(
            occ.attribute_form,
            AttributeForm::ListEntry {
                line: 0,
                group_index: 1,
                entry_index: 1,
                entry_count: 2,
            }
        );
    }

    #[test]
    fn test_shared_line_sole_entry_counts_sibling_groups() {
        let occ = Occurrence::from_attribute_source(
            "TestMethod",
            &lines(&["[Test] [ExpectedException(typeof(MyError))]"]),
            vec![],
            FixtureContext::default(),
        )
        .unwrap();
        assert_eq!(
            occ.attribute_form,
            AttributeForm::SoleInBracket {
                line: 0,
                group_index: 1,
                groups_on_line: 2,
            }
        );
    }

    #[test]
    fn test_no_annotation_is_typed_error() {
        let err = Occurrence::from_attribute_source(
            "TestMethod",
            &lines(&["[Test]"]),
            vec![],
            FixtureContext::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AnnotationNotFound);
    }

    #[test]
    fn test_first_annotation_wins() {
        let occ = Occurrence::from_attribute_source(
            "TestMethod",
            &lines(&[
                "[ExpectedException(\"A\")]",
                "[ExpectedException(\"B\")]",
            ]),
            vec![],
            FixtureContext::default(),
        )
        .unwrap();
        assert_eq!(
            occ.arguments.first_positional().map(|a| &a.value),
            Some(&ArgumentValue::Str(Some("A".into())))
        );
    }
}
