//! Attribute edit planning: the precise removal edit for the annotation,
//! described structurally so a host text-edit layer can apply it without
//! re-discovering anything.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorReporting, MigrateError, PhaseContext, SourceContext};
use crate::occurrence::AttributeForm;
use crate::syntax::parser;

/// Which separator comma vanishes together with a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeparatorSide {
    Preceding,
    Following,
}

/// The removal edit for one annotation.
///
/// `group_index` counts the bracket groups on the edited line; it keeps the
/// edit aimed at the annotation's own group when `[A] [B]` share a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttributeEdit {
    /// The bracket group held only the annotation and owned its line: the
    /// whole line goes, brackets included.
    RemoveWholeLine { line: usize },
    /// The bracket group held only the annotation but shares its line with
    /// sibling groups: excise the group plus one run of separating
    /// whitespace.
    RemoveGroup { line: usize, group_index: usize },
    /// The annotation shared its bracket group: excise the entry plus one
    /// separator, leaving the sibling entries in place.
    RemoveListEntry {
        line: usize,
        group_index: usize,
        entry_index: usize,
        separator: SeparatorSide,
    },
}

impl std::fmt::Display for AttributeEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeEdit::RemoveWholeLine { line } => {
                write!(f, "remove attribute line {}", line)
            }
            AttributeEdit::RemoveGroup { line, group_index } => {
                write!(f, "remove bracket group {} on line {}", group_index, line)
            }
            AttributeEdit::RemoveListEntry {
                line,
                group_index,
                entry_index,
                separator,
            } => {
                let side = match separator {
                    SeparatorSide::Preceding => "preceding",
                    SeparatorSide::Following => "following",
                };
                write!(
                    f,
                    "remove list entry {} of group {} on line {} with its {} comma",
                    entry_index, group_index, line, side
                )
            }
        }
    }
}

/// Derive the edit from the annotation's position. A sole annotation takes
/// its whole line, unless sibling groups share the line, in which case only
/// its group goes. A first list entry takes its following comma; every other
/// entry takes the preceding one. Either way no dangling separator can
/// survive the edit.
pub fn plan_edit(form: &AttributeForm) -> AttributeEdit {
    match *form {
        AttributeForm::SoleInBracket {
            line,
            group_index,
            groups_on_line,
        } => {
            if groups_on_line > 1 {
                AttributeEdit::RemoveGroup { line, group_index }
            } else {
                AttributeEdit::RemoveWholeLine { line }
            }
        }
        AttributeForm::ListEntry {
            line,
            group_index,
            entry_index,
            ..
        } => AttributeEdit::RemoveListEntry {
            line,
            group_index,
            entry_index,
            separator: if entry_index == 0 {
                SeparatorSide::Following
            } else {
                SeparatorSide::Preceding
            },
        },
    }
}

/// Apply an edit to the attribute lines of one method.
///
/// This is the reference text-edit layer used by the CLI preview and the
/// round-trip tests. Hosts with their own buffers are free to reimplement
/// it; the edit description carries everything they need. List-entry
/// removal re-parses the edited line and splices by entry spans, keeping the
/// sibling entries byte-for-byte intact.
pub fn apply_edit(lines: &[String], edit: &AttributeEdit) -> Result<Vec<String>, MigrateError> {
    match *edit {
        AttributeEdit::RemoveWholeLine { line } => {
            if line >= lines.len() {
                return Err(edit_mismatch(lines, "line index past the attribute lines"));
            }
            Ok(lines
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != line)
                .map(|(_, text)| text.clone())
                .collect())
        }
        AttributeEdit::RemoveGroup { line, group_index } => {
            let Some(text) = lines.get(line) else {
                return Err(edit_mismatch(lines, "line index past the attribute lines"));
            };
            let mut result = lines.to_vec();
            result[line] = excise_group(text, group_index)?;
            Ok(result)
        }
        AttributeEdit::RemoveListEntry {
            line,
            group_index,
            entry_index,
            separator,
        } => {
            let Some(text) = lines.get(line) else {
                return Err(edit_mismatch(lines, "line index past the attribute lines"));
            };
            let mut result = lines.to_vec();
            result[line] = excise_entry(text, group_index, entry_index, separator)?;
            Ok(result)
        }
    }
}

/// Remove one entry (and the planned separator) from a single bracket line.
fn excise_entry(
    text: &str,
    group_index: usize,
    entry_index: usize,
    separator: SeparatorSide,
) -> Result<String, MigrateError> {
    let source = SourceContext::from_file("attribute-edit", text);
    let section = parser::parse_section(text, &source)?;

    let Some(group) = section.groups.get(group_index) else {
        return Err(edit_mismatch(
            &[text.to_string()],
            "group index past the bracket groups on the edited line",
        ));
    };
    if entry_index >= group.entries.len() {
        return Err(edit_mismatch(
            &[text.to_string()],
            "entry index past the bracket group",
        ));
    }

    let entry_span = group.entries[entry_index].span;
    let (cut_start, cut_end) = match separator {
        // Consume from the end of the previous entry: that takes the comma
        // and any space with it.
        SeparatorSide::Preceding => {
            let Some(previous) = entry_index
                .checked_sub(1)
                .and_then(|index| group.entries.get(index))
            else {
                return Err(edit_mismatch(
                    &[text.to_string()],
                    "no preceding entry to take the separator from",
                ));
            };
            (previous.span.end, entry_span.end)
        }
        // Consume up to the start of the next entry.
        SeparatorSide::Following => {
            let next = group.entries.get(entry_index + 1).map(|e| e.span.start);
            (entry_span.start, next.unwrap_or(entry_span.end))
        }
    };

    let mut edited = String::with_capacity(text.len());
    edited.push_str(&text[..cut_start]);
    edited.push_str(&text[cut_end..]);
    Ok(edited)
}

/// Remove one whole bracket group from a line that carries several. The
/// separator rule mirrors list entries: the first group takes the gap up to
/// the next group, every later group takes the gap back to the previous one.
fn excise_group(text: &str, group_index: usize) -> Result<String, MigrateError> {
    let source = SourceContext::from_file("attribute-edit", text);
    let section = parser::parse_section(text, &source)?;

    let Some(group) = section.groups.get(group_index) else {
        return Err(edit_mismatch(
            &[text.to_string()],
            "group index past the bracket groups on the edited line",
        ));
    };

    let (cut_start, cut_end) = if group_index == 0 {
        let next = section.groups.get(1).map(|g| g.span.start);
        (group.span.start, next.unwrap_or(group.span.end))
    } else {
        (section.groups[group_index - 1].span.end, group.span.end)
    };

    let mut edited = String::with_capacity(text.len());
    edited.push_str(&text[..cut_start]);
    edited.push_str(&text[cut_end..]);
    Ok(edited)
}

fn edit_mismatch(lines: &[String], reason: &str) -> MigrateError {
    let ctx = PhaseContext::new(
        SourceContext::from_file("attribute-edit", lines.join("\n")),
        "host",
    );
    ctx.malformed_request(&format!("edit does not match the attribute lines: {reason}"))
}
