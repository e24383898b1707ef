pub use crate::errors::{ErrorReporting, MigrateError, PhaseContext, SourceContext};

pub mod cli;
pub mod engine;
pub mod errors;
pub mod occurrence;
pub mod resolve;
pub mod rewrite;
pub mod syntax;
