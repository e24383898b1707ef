//! Rewrite planning: the replacement test body and the attribute edit.

use serde::{Deserialize, Serialize};

pub mod attribute;
pub mod body;

pub use attribute::{apply_edit, plan_edit, AttributeEdit, SeparatorSide};
pub use body::{render_body, synthesize, Statement, CAPTURED_BINDING};

/// The engine's whole output for one occurrence: the replacement body and the
/// removal edit, produced together or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewritePlan {
    pub new_body: Vec<Statement>,
    pub attribute_edit: AttributeEdit,
}

impl RewritePlan {
    /// Text rendering of the new body, for display and diffing.
    pub fn body_text(&self) -> String {
        body::render_body(&self.new_body)
    }
}
