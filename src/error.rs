//! Error types for script segmentation and project persistence.
//!
//! The section store itself never fails; these errors come from the
//! Automerge-backed document, the render payload builder and the
//! project-creation convenience path.

use thiserror::Error;

/// Result type alias for scriptcut operations.
pub type CutResult<T> = Result<T, CutError>;

/// Errors that can occur while building, persisting or exporting a project.
#[derive(Error, Debug)]
pub enum CutError {
    /// Automerge error during document operations.
    #[error("Automerge error: {0}")]
    Automerge(#[from] automerge::AutomergeError),

    /// Autosurgeon hydration error.
    #[error("Hydration error: {0}")]
    Hydrate(#[from] autosurgeon::HydrateError),

    /// Autosurgeon reconcile error.
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] autosurgeon::ReconcileError),

    /// Segmentation produced no sections.
    #[error("Script produced no sections")]
    EmptyScript,

    /// Script is below the minimum length accepted for a new project.
    #[error("Script too short: {length} characters, at least {minimum} required")]
    ScriptTooShort { length: usize, minimum: usize },

    /// A section has no text left after trimming.
    #[error("Section has empty text: {0}")]
    EmptySection(String),

    /// The project has no sections to render.
    #[error("Project has no sections")]
    NoSections,

    /// Section not found in the document.
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// Field not found in the document.
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Schema violation - document structure is invalid.
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CutError {
    /// Creates an EmptyScript error.
    pub fn empty_script() -> Self {
        Self::EmptyScript
    }

    /// Creates a ScriptTooShort error.
    pub fn script_too_short(length: usize, minimum: usize) -> Self {
        Self::ScriptTooShort { length, minimum }
    }

    /// Creates an EmptySection error.
    pub fn empty_section(id: impl Into<String>) -> Self {
        Self::EmptySection(id.into())
    }

    /// Creates a SectionNotFound error.
    pub fn section_not_found(id: impl Into<String>) -> Self {
        Self::SectionNotFound(id.into())
    }

    /// Creates a FieldNotFound error.
    pub fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound(field.into())
    }

    /// Creates a SchemaViolation error.
    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Creates a Serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for CutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
