//! The per-occurrence migration pipeline.
//!
//! One occurrence in, one rewrite plan out, atomically: screening and
//! resolution either all succeed or the occurrence fails with a typed error
//! and no partial plan escapes. Occurrences share nothing, so the batch
//! entry point runs them in parallel.

use rayon::prelude::*;

use crate::errors::MigrateError;
use crate::occurrence::Occurrence;
use crate::resolve;
use crate::rewrite::{self, RewritePlan};

/// Plan the migration of a single occurrence.
///
/// Runs the three resolvers over the screened argument model, then combines
/// their results with the original body into the replacement statement
/// sequence and the attribute-removal edit.
pub fn plan_occurrence(occurrence: &Occurrence) -> Result<RewritePlan, MigrateError> {
    let resolution = resolve::resolve(occurrence)?;

    let new_body = rewrite::synthesize(&resolution, &occurrence.body);
    let attribute_edit = rewrite::plan_edit(&occurrence.attribute_form);

    Ok(RewritePlan {
        new_body,
        attribute_edit,
    })
}

/// Plan a whole batch, one worker per occurrence.
///
/// Results stay positionally aligned with the input; each occurrence
/// succeeds or fails on its own.
pub fn plan_all(occurrences: &[Occurrence]) -> Vec<Result<RewritePlan, MigrateError>> {
    occurrences.par_iter().map(plan_occurrence).collect()
}
