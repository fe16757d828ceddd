//! Error types for Lineage operations.
//!
//! This module provides the main error type [`LineageError`]. Only input that
//! makes vertex identity ambiguous fails a layout run; every other anomaly in
//! the records is reported as a [`Diagnostic`] alongside a successful result.

use std::io;

use thiserror::Error;

use lineage_core::identifier::PersonId;

use crate::diagnostic::Diagnostic;

/// The main error type for Lineage operations.
#[derive(Debug, Error)]
pub enum LineageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Two or more records share an identifier. Holds every duplicated id, sorted.
    #[error("Duplicate person identifier(s): {}", join_ids(.0))]
    DuplicateIdentifier(Vec<PersonId>),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for LineageError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl LineageError {
    /// Returns the diagnostics carried by this error, if any.
    ///
    /// Only [`LineageError::DuplicateIdentifier`] carries diagnostics: one
    /// [`Diagnostic::DuplicateIdentifier`] per duplicated id.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Self::DuplicateIdentifier(ids) => ids
                .iter()
                .map(|id| Diagnostic::DuplicateIdentifier { id: id.clone() })
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn join_ids(ids: &[PersonId]) -> String {
    ids.iter()
        .map(|id| format!("`{id}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
