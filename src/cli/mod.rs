//! The unexpect command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions: request loading, occurrence assembly,
//! planning, and output. It is a reference host; the engine itself never
//! touches the filesystem.

use clap::Parser;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, process};
use walkdir::WalkDir;

use crate::cli::args::{Command, UnexpectArgs};
use crate::engine;
use crate::errors::{
    print_error, ErrorReporting, MigrateError, PhaseContext, SourceContext,
};
use crate::occurrence::{find_annotation, FixtureContext, Occurrence};
use crate::rewrite::{RewritePlan, Statement};
use crate::syntax::{parser, MatchMode};

pub mod args;
pub mod output;

/// One test method of a migration request, as hosts describe it: the raw
/// attribute lines above the method, the body statements, and the fixture
/// facts the engine cannot discover on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDescription {
    pub method: String,
    pub attributes: Vec<String>,
    #[serde(default)]
    pub body: Vec<String>,
    #[serde(default)]
    pub fixture: FixtureContext,
}

/// A migration request: every annotated test method of one fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationRequest {
    pub tests: Vec<TestDescription>,
}

/// One planned test, as emitted by `plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTest {
    pub method: String,
    pub plan: RewritePlan,
}

/// The main entry point for the CLI.
pub fn run() {
    let args = UnexpectArgs::parse();

    // Dispatch to the appropriate subcommand handler. Handlers report
    // per-test failures themselves and return how many they saw.
    let outcome = match args.command {
        Command::Plan {
            path,
            filter,
            pretty,
        } => handle_plan(&path, filter.as_deref(), pretty),
        Command::Preview { path, filter } => handle_preview(&path, filter.as_deref()),
        Command::Check { path, filter } => handle_check(&path, filter.as_deref()),
        Command::Args { attribute } => handle_args(&attribute),
    };

    match outcome {
        Ok(0) => {}
        Ok(_) => process::exit(1),
        Err(error) => {
            print_error(error);
            process::exit(1);
        }
    }
}

// ============================================================================
// SUBCOMMAND HANDLERS
// ============================================================================

/// Handles the `plan` subcommand: plans every occurrence in parallel and
/// emits the successful plans as JSON on stdout.
fn handle_plan(path: &Path, filter: Option<&str>, pretty: bool) -> Result<usize, MigrateError> {
    let filter = build_filter(filter)?;
    let mut planned = Vec::new();
    let mut failures = 0usize;

    for (origin, request) in load_requests(path)? {
        let mut methods = Vec::new();
        let mut occurrences = Vec::new();
        for test in selected(&request, filter.as_ref()) {
            match assemble(&origin, test) {
                Ok(occurrence) => {
                    methods.push(test.method.clone());
                    occurrences.push(occurrence);
                }
                Err(error) => {
                    failures += 1;
                    print_error(error);
                }
            }
        }

        for (method, result) in methods.into_iter().zip(engine::plan_all(&occurrences)) {
            match result {
                Ok(plan) => planned.push(PlannedTest { method, plan }),
                Err(error) => {
                    failures += 1;
                    print_error(error);
                }
            }
        }
    }

    output::print_plans_json(&planned, pretty);
    Ok(failures)
}

/// Handles the `preview` subcommand: per test, a colored before/after diff
/// of the body and the attribute lines.
fn handle_preview(path: &Path, filter: Option<&str>) -> Result<usize, MigrateError> {
    let filter = build_filter(filter)?;
    let mut failures = 0usize;

    for (origin, request) in load_requests(path)? {
        for test in selected(&request, filter.as_ref()) {
            match assemble(&origin, test).and_then(|occurrence| engine::plan_occurrence(&occurrence))
            {
                Ok(plan) => output::print_preview(test, &plan)?,
                Err(error) => {
                    failures += 1;
                    print_error(error);
                }
            }
        }
    }

    Ok(failures)
}

/// Handles the `check` subcommand: plans without emitting rewrites, reports
/// per-test status plus the host-level warnings the engine itself must not
/// enforce.
fn handle_check(path: &Path, filter: Option<&str>) -> Result<usize, MigrateError> {
    let filter = build_filter(filter)?;
    let mut checked = 0usize;
    let mut failures = 0usize;
    let mut warning_count = 0usize;

    for (origin, request) in load_requests(path)? {
        for test in selected(&request, filter.as_ref()) {
            checked += 1;
            match assemble(&origin, test).and_then(|occurrence| engine::plan_occurrence(&occurrence))
            {
                Ok(plan) => {
                    let warnings = collect_warnings(test, &plan);
                    warning_count += warnings.len();
                    output::print_check_line(&test.method, true, &warnings);
                }
                Err(error) => {
                    failures += 1;
                    output::print_check_line(&test.method, false, &[]);
                    print_error(error);
                }
            }
        }
    }

    output::print_check_summary(checked, failures, warning_count);
    Ok(failures)
}

/// Handles the `args` subcommand: parse attribute text, print the parsed
/// groups and the extracted argument model.
fn handle_args(attribute: &str) -> Result<usize, MigrateError> {
    let source = SourceContext::from_file("arguments", attribute);
    let section = parser::parse_section(attribute, &source)?;
    output::print_section(&section);

    let Some((form, model)) = find_annotation(&section) else {
        let ctx = PhaseContext::new(source, "arguments");
        return Err(ctx.annotation_not_found(crate::errors::unspanned()));
    };
    output::print_argument_model(&model, &form);
    Ok(0)
}

// ============================================================================
// REQUEST LOADING AND ASSEMBLY
// ============================================================================

fn host_context(label: &str) -> PhaseContext {
    PhaseContext::new(SourceContext::fallback(label), "host")
}

/// Load one request file, or every `*.json` file under a directory.
fn load_requests(path: &Path) -> Result<Vec<(PathBuf, MigrationRequest)>, MigrateError> {
    if !path.is_dir() {
        return Ok(vec![load_request_file(path)?]);
    }

    let mut requests = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry
            .map_err(|e| host_context(&path.display().to_string()).invalid_path(&e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
            requests.push(load_request_file(entry.path())?);
        }
    }

    if requests.is_empty() {
        let ctx = host_context(&path.display().to_string());
        return Err(ctx.invalid_path(&format!("{} (no request files found)", path.display())));
    }
    Ok(requests)
}

fn load_request_file(path: &Path) -> Result<(PathBuf, MigrationRequest), MigrateError> {
    let ctx = host_context(&path.display().to_string());
    let content = fs::read_to_string(path)
        .map_err(|_| ctx.invalid_path(&path.display().to_string()))?;
    let request: MigrationRequest =
        serde_json::from_str(&content).map_err(|e| ctx.malformed_request(&e.to_string()))?;
    Ok((path.to_path_buf(), request))
}

fn build_filter(pattern: Option<&str>) -> Result<Option<Regex>, MigrateError> {
    let Some(pattern) = pattern else {
        return Ok(None);
    };
    Regex::new(pattern).map(Some).map_err(|e| {
        host_context("--filter").malformed_request(&format!("invalid filter regex: {e}"))
    })
}

fn selected<'a>(
    request: &'a MigrationRequest,
    filter: Option<&'a Regex>,
) -> impl Iterator<Item = &'a TestDescription> {
    request
        .tests
        .iter()
        .filter(move |test| filter.map_or(true, |re| re.is_match(&test.method)))
}

/// Assemble one occurrence, labeling its diagnostics with the request file
/// it came from. In a directory batch the method name alone does not say
/// which file holds the failing test.
fn assemble(origin: &Path, test: &TestDescription) -> Result<Occurrence, MigrateError> {
    let label = format!("{}: {}", origin.display(), test.method);
    match Occurrence::from_attribute_source(
        test.method.clone(),
        &test.attributes,
        test.body.clone(),
        test.fixture.clone(),
    ) {
        Ok(mut occurrence) => {
            occurrence.source.name = label;
            Ok(occurrence)
        }
        Err(error) => Err(error.with_source_name(label)),
    }
}

/// Host-level lint over a finished plan. The engine deliberately leaves these
/// checks to its hosts: a handler method the fixture does not declare, and a
/// regex-mode expected message that is not a valid pattern.
fn collect_warnings(test: &TestDescription, plan: &RewritePlan) -> Vec<String> {
    let mut warnings = Vec::new();
    for statement in &plan.new_body {
        match statement {
            Statement::InvokeHandler { method, .. }
                if !test.fixture.methods.iter().any(|m| m == method) =>
            {
                warnings.push(format!(
                    "handler method '{}' is not declared by the fixture",
                    method
                ));
            }
            Statement::AssertMessage {
                mode: MatchMode::Regex,
                expected,
                ..
            } => {
                if let Err(error) = Regex::new(expected) {
                    warnings.push(format!(
                        "regex-mode expected message is not a valid pattern: {}",
                        error
                    ));
                }
            }
            _ => {}
        }
    }
    warnings
}
