//! Person identifiers.
//!
//! This module provides the [`PersonId`] type used to key vertices, edges and
//! diagnostics throughout Lineage.

use std::{borrow::Borrow, fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

/// Stable unique identifier of a person record.
///
/// Identifiers are compared lexicographically. Layout tie-breaks (cycle
/// breaking, ordering within a generation) rely on this total order, so two
/// runs over the same records always make the same choices.
///
/// Cloning is cheap: the string is shared behind an [`Arc`].
///
/// # Examples
///
/// ```
/// use lineage_core::identifier::PersonId;
///
/// let alice = PersonId::new("alice");
/// let bob = PersonId::new("bob");
///
/// assert!(alice < bob);
/// assert_eq!(alice, "alice");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PersonId(Arc<str>);

impl PersonId {
    /// Creates a `PersonId` from a string slice.
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PersonId({:?})", &*self.0)
    }
}

impl FromStr for PersonId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PersonId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<PersonId> for String {
    fn from(value: PersonId) -> Self {
        value.0.to_string()
    }
}

impl Borrow<str> for PersonId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PersonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PersonId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for PersonId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
