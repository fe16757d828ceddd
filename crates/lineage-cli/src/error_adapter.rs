//! Error adapter for converting LineageError to miette diagnostics.
//!
//! This module provides the bridge between the library's error and
//! diagnostic types and miette's report formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`LineageError::DuplicateIdentifier`] naming several identifiers is
//! rendered as one report per identifier.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, Severity as MietteSeverity};

use lineage::{
    LineageError,
    diagnostic::{Diagnostic, Severity},
};

/// Adapter for a single lineage [`Diagnostic`].
pub struct DiagnosticAdapter {
    diag: Diagnostic,
}

impl DiagnosticAdapter {
    /// Create a new diagnostic adapter.
    pub fn new(diag: Diagnostic) -> Self {
        Self { diag }
    }
}

impl fmt::Debug for DiagnosticAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.diag, f)
    }
}

impl std::error::Error for DiagnosticAdapter {}

impl MietteDiagnostic for DiagnosticAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.diag.code()))
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }
}

/// Adapter for [`LineageError`] variants without diagnostics.
pub struct ErrorAdapter<'a>(pub &'a LineageError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            LineageError::Io(_) => "lineage::io",
            LineageError::DuplicateIdentifier(_) => "lineage::duplicate",
            LineageError::Input(_) => "lineage::input",
            LineageError::Config(_) => "lineage::config",
            LineageError::Layout(_) => "lineage::layout",
            LineageError::Export(_) => "lineage::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            LineageError::Input(_) => "the input must be a JSON array of person records",
            LineageError::Config(_) => "check the [layout] and [style] sections of the config file",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A record-level diagnostic.
    Diagnostic(DiagnosticAdapter),
    /// A plain error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert a [`LineageError`] into a list of reportable errors.
///
/// Errors that carry diagnostics yield one [`Reportable`] per diagnostic;
/// every other error yields a single [`Reportable`].
pub fn to_reportables(err: &LineageError) -> Vec<Reportable<'_>> {
    let diagnostics = err.diagnostics();
    if diagnostics.is_empty() {
        return vec![Reportable::Error(ErrorAdapter(err))];
    }
    diagnostics
        .into_iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use lineage::identifier::PersonId;

    use super::*;

    #[test]
    fn test_duplicates_render_separately() {
        let err = LineageError::DuplicateIdentifier(vec![PersonId::new("a"), PersonId::new("b")]);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert_eq!(
            reportables[0].to_string(),
            "identifier `a` is used by more than one record"
        );
        assert_eq!(reportables[0].code().unwrap().to_string(), "L001");
        assert_eq!(reportables[0].severity(), Some(MietteSeverity::Error));
    }

    #[test]
    fn test_plain_error() {
        let err = LineageError::Config("bad gap".to_string());

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad gap");
                assert_eq!(e.code().unwrap().to_string(), "lineage::config");
                assert!(e.help().is_some());
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_warning_severity() {
        let adapter = DiagnosticAdapter::new(Diagnostic::DanglingReference {
            child_id: PersonId::new("c"),
            missing_parent_id: PersonId::new("ghost"),
        });
        assert_eq!(adapter.severity(), Some(MietteSeverity::Warning));
        assert_eq!(adapter.code().unwrap().to_string(), "L002");
        assert!(adapter.help().is_some());
    }
}
