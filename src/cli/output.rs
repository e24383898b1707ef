//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for pretty-printing, colorizing output,
//! diff rendering, and generating JSON. By centralizing output logic here,
//! we ensure a consistent user experience across all commands.

use difference::Changeset;
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::{PlannedTest, TestDescription};
use crate::errors::MigrateError;
use crate::occurrence::AttributeForm;
use crate::rewrite::{attribute, RewritePlan};
use crate::syntax::{ArgumentModel, AttributeSection};

#[derive(Serialize)]
struct PlanDocument<'a> {
    plans: &'a [PlannedTest],
}

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Emits the planned rewrites as a single JSON document on stdout.
pub fn print_plans_json(planned: &[PlannedTest], pretty: bool) {
    let document = PlanDocument { plans: planned };
    // Serializing our own plan types cannot fail.
    let text = if pretty {
        serde_json::to_string_pretty(&document).expect("plan serialization")
    } else {
        serde_json::to_string(&document).expect("plan serialization")
    };
    println!("{}", text);
}

/// Prints a colored before/after preview of one planned test: the body
/// rewrite first, then the attribute lines with the annotation removed.
pub fn print_preview(test: &TestDescription, plan: &RewritePlan) -> Result<(), MigrateError> {
    let mut stdout = StandardStream::stdout(color_choice());

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    println!("--- {} ---", test.method);
    let _ = stdout.reset();

    let old_body = test.body.join("\n");
    let new_body = plan.body_text();
    let changeset = Changeset::new(&old_body, &new_body, "\n");
    print_diff(&mut stdout, &changeset.diffs);

    println!("edit: {}", plan.attribute_edit);
    let remaining = attribute::apply_edit(&test.attributes, &plan.attribute_edit)?;
    let changeset = Changeset::new(&test.attributes.join("\n"), &remaining.join("\n"), "\n");
    print_diff(&mut stdout, &changeset.diffs);
    println!();
    Ok(())
}

/// Prints one per-test verdict line of a `check` run, with any host-level
/// warnings indented beneath it.
pub fn print_check_line(method: &str, ok: bool, warnings: &[String]) {
    let mut stdout = StandardStream::stdout(color_choice());
    let (color, verdict) = if ok {
        (Color::Green, "ok")
    } else {
        (Color::Red, "fail")
    };

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    print!("{:>4}", verdict);
    let _ = stdout.reset();
    println!("  {}", method);

    for warning in warnings {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        println!("      warning: {}", warning);
        let _ = stdout.reset();
    }
}

/// Prints the closing tally of a `check` run.
pub fn print_check_summary(checked: usize, failures: usize, warnings: usize) {
    let mut stdout = StandardStream::stdout(color_choice());
    let color = if failures == 0 { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    println!(
        "{} checked, {} failed, {} warnings",
        checked, failures, warnings
    );
    let _ = stdout.reset();
}

/// Prints every parsed bracket group of an attribute section.
pub fn print_section(section: &AttributeSection) {
    for group in &section.groups {
        println!("line {}: {}", group.line, group.pretty());
    }
}

/// Prints the extracted argument model of the annotation, one argument per
/// line, preceded by where the annotation sits in its bracket group.
pub fn print_argument_model(model: &ArgumentModel, form: &AttributeForm) {
    let mut stdout = StandardStream::stdout(color_choice());
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    match form {
        AttributeForm::SoleInBracket { line, .. } => {
            println!("sole attribute in its bracket group (line {})", line);
        }
        AttributeForm::ListEntry {
            line,
            entry_index,
            entry_count,
            ..
        } => {
            println!(
                "entry {} of {} in its bracket group (line {})",
                entry_index + 1,
                entry_count,
                line
            );
        }
    }
    let _ = stdout.reset();

    if model.arguments.is_empty() {
        println!("(no arguments)");
        return;
    }
    for argument in &model.arguments {
        match &argument.name {
            Some(name) => println!("named      {} = {}", name, argument.value.pretty()),
            None => println!("positional {}", argument.value.pretty()),
        }
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn print_diff(stdout: &mut StandardStream, diffs: &[difference::Difference]) {
    for diff in diffs {
        match diff {
            difference::Difference::Same(ref x) => {
                let _ = stdout.reset();
                println!(" {}", x);
            }
            difference::Difference::Add(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                println!("+{}", x);
            }
            difference::Difference::Rem(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                println!("-{}", x);
            }
        }
    }
}
