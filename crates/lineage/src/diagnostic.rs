//! Diagnostics reported while building and ranking a family graph.
//!
//! Inconsistent genealogical data is expected: a parent record may have been
//! deleted, or two people may have been entered as each other's ancestors.
//! Rather than failing, the engine repairs the graph locally and reports what
//! it did as a [`Diagnostic`].
//!
//! Codes are organized by phase:
//! - `L00x` - Graph building
//! - `L01x` - Rank assignment

use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use lineage_core::identifier::PersonId;

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The input cannot be laid out as given.
    Error,

    /// The input was repaired; the layout is still complete.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Stable codes identifying each kind of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Two records share an identifier.
    L001,

    /// A parent reference points at a record that is not in the snapshot.
    L002,

    /// A spouse reference points at a record that is not in the snapshot.
    L003,

    /// The same parent is listed more than once on one record.
    L004,

    /// A parent/child edge was excluded from ranking to break a cycle.
    L010,
}

impl DiagnosticCode {
    /// Returns the code as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::L001 => "L001",
            DiagnosticCode::L002 => "L002",
            DiagnosticCode::L003 => "L003",
            DiagnosticCode::L004 => "L004",
            DiagnosticCode::L010 => "L010",
        }
    }

    /// Returns a short description of the code.
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticCode::L001 => "duplicate identifier",
            DiagnosticCode::L002 => "dangling parent reference",
            DiagnosticCode::L003 => "dangling spouse reference",
            DiagnosticCode::L004 => "redundant parent reference",
            DiagnosticCode::L010 => "cycle broken",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A non-fatal finding about the input records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// `child_id` lists `missing_parent_id` as a parent, but no such record exists.
    /// The edge is dropped.
    DanglingReference {
        child_id: PersonId,
        missing_parent_id: PersonId,
    },

    /// `person_id` lists `missing_spouse_id` as a spouse, but no such record exists.
    DanglingSpouseReference {
        person_id: PersonId,
        missing_spouse_id: PersonId,
    },

    /// `child_id` lists `parent_id` more than once. A single edge is kept.
    RedundantParentReference {
        child_id: PersonId,
        parent_id: PersonId,
    },

    /// The `(parent, child)` edge closes a cycle and was excluded from ranking.
    /// It is still rendered, flagged as unranked.
    CycleBroken { excluded_edge: (PersonId, PersonId) },

    /// Two or more records share `id`.
    DuplicateIdentifier { id: PersonId },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::DuplicateIdentifier { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            Diagnostic::DuplicateIdentifier { .. } => DiagnosticCode::L001,
            Diagnostic::DanglingReference { .. } => DiagnosticCode::L002,
            Diagnostic::DanglingSpouseReference { .. } => DiagnosticCode::L003,
            Diagnostic::RedundantParentReference { .. } => DiagnosticCode::L004,
            Diagnostic::CycleBroken { .. } => DiagnosticCode::L010,
        }
    }

    /// Returns a hint on how to fix the underlying record, if there is one.
    pub fn help(&self) -> Option<String> {
        match self {
            Diagnostic::DanglingReference {
                missing_parent_id, ..
            } => Some(format!(
                "remove `{missing_parent_id}` from parent_ids or restore the missing record"
            )),
            Diagnostic::DanglingSpouseReference {
                missing_spouse_id, ..
            } => Some(format!(
                "remove `{missing_spouse_id}` from spouse_ids or restore the missing record"
            )),
            Diagnostic::CycleBroken { .. } => {
                Some("a person cannot be their own ancestor; check parent_ids".to_string())
            }
            Diagnostic::DuplicateIdentifier { .. } => {
                Some("every record needs a unique id".to_string())
            }
            Diagnostic::RedundantParentReference { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DanglingReference {
                child_id,
                missing_parent_id,
            } => write!(
                f,
                "`{child_id}` references unknown parent `{missing_parent_id}`"
            ),
            Diagnostic::DanglingSpouseReference {
                person_id,
                missing_spouse_id,
            } => write!(
                f,
                "`{person_id}` references unknown spouse `{missing_spouse_id}`"
            ),
            Diagnostic::RedundantParentReference {
                child_id,
                parent_id,
            } => write!(f, "`{child_id}` lists parent `{parent_id}` more than once"),
            Diagnostic::CycleBroken {
                excluded_edge: (parent, child),
            } => write!(
                f,
                "edge `{parent}` -> `{child}` closes an ancestry cycle and was excluded from ranking"
            ),
            Diagnostic::DuplicateIdentifier { id } => {
                write!(f, "identifier `{id}` is used by more than one record")
            }
        }
    }
}

impl Serialize for Diagnostic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Diagnostic", 3)?;
        state.serialize_field("severity", &self.severity().to_string())?;
        state.serialize_field("code", self.code().as_str())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dangling() -> Diagnostic {
        Diagnostic::DanglingReference {
            child_id: PersonId::new("c"),
            missing_parent_id: PersonId::new("ghost"),
        }
    }

    #[test]
    fn test_severity() {
        assert!(dangling().severity().is_warning());
        assert!(
            Diagnostic::DuplicateIdentifier {
                id: PersonId::new("a")
            }
            .severity()
            .is_error()
        );
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_codes() {
        assert_eq!(dangling().code(), DiagnosticCode::L002);
        assert_eq!(DiagnosticCode::L010.to_string(), "L010");
        assert_eq!(DiagnosticCode::L004.description(), "redundant parent reference");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            dangling().to_string(),
            "`c` references unknown parent `ghost`"
        );

        let cycle = Diagnostic::CycleBroken {
            excluded_edge: (PersonId::new("b"), PersonId::new("a")),
        };
        assert_eq!(
            cycle.to_string(),
            "edge `b` -> `a` closes an ancestry cycle and was excluded from ranking"
        );
    }

    #[test]
    fn test_help() {
        assert!(dangling().help().unwrap().contains("ghost"));
        assert!(
            Diagnostic::RedundantParentReference {
                child_id: PersonId::new("c"),
                parent_id: PersonId::new("p"),
            }
            .help()
            .is_none()
        );
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(dangling()).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["code"], "L002");
        assert_eq!(json["message"], "`c` references unknown parent `ghost`");
    }
}
