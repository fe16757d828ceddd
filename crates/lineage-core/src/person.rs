//! Person records.
//!
//! A [`Person`] is the unit of input for the layout engine. Records are owned
//! by whatever stores them; the engine only reads a snapshot of them.
//!
//! The serde representation matches the stored record shape, so a JSON array
//! exported from the record store deserializes directly into `Vec<Person>`:
//!
//! ```
//! use lineage_core::person::Person;
//!
//! let json = r#"[
//!     {"id": "a", "first_name": "Ada", "last_name": "Byron", "birth_date": "1815-12-10"},
//!     {"id": "b", "first_name": "Anne", "last_name": "King", "parent_ids": ["a"]}
//! ]"#;
//!
//! let persons: Vec<Person> = serde_json::from_str(json).unwrap();
//! assert_eq!(persons[1].parent_ids()[0], "a");
//! assert_eq!(persons[0].lifespan_label().as_deref(), Some("1815"));
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::identifier::PersonId;

/// A family member with references to parents and spouses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,

    #[serde(default)]
    first_name: String,

    #[serde(default)]
    last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    birth_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    death_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,

    /// Parent identifiers. Zero, one, two or more entries are all valid.
    #[serde(default, deserialize_with = "null_as_empty")]
    parent_ids: Vec<PersonId>,

    /// Spouse identifiers. Not guaranteed to be mirrored on the spouse's record.
    #[serde(default, deserialize_with = "null_as_empty")]
    spouse_ids: Vec<PersonId>,
}

impl Person {
    /// Creates a person with the given identifier and no other data.
    pub fn new(id: impl Into<PersonId>) -> Self {
        Self {
            id: id.into(),
            first_name: String::new(),
            last_name: String::new(),
            birth_date: None,
            death_date: None,
            gender: None,
            photo_url: None,
            notes: None,
            parent_ids: Vec::new(),
            spouse_ids: Vec::new(),
        }
    }

    /// Sets the first and last name.
    pub fn with_name(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self.last_name = last_name.to_string();
        self
    }

    /// Sets the birth date (`YYYY-MM-DD`).
    pub fn with_birth_date(mut self, date: &str) -> Self {
        self.birth_date = Some(date.to_string());
        self
    }

    /// Sets the death date (`YYYY-MM-DD`).
    pub fn with_death_date(mut self, date: &str) -> Self {
        self.death_date = Some(date.to_string());
        self
    }

    /// Sets the gender tag.
    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }

    /// Sets the photo reference.
    pub fn with_photo_url(mut self, url: &str) -> Self {
        self.photo_url = Some(url.to_string());
        self
    }

    /// Sets the free-text notes.
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Replaces the parent references.
    pub fn with_parents<I, T>(mut self, parent_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PersonId>,
    {
        self.parent_ids = parent_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the spouse references.
    pub fn with_spouses<I, T>(mut self, spouse_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PersonId>,
    {
        self.spouse_ids = spouse_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn birth_date(&self) -> Option<&str> {
        self.birth_date.as_deref()
    }

    pub fn death_date(&self) -> Option<&str> {
        self.death_date.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn parent_ids(&self) -> &[PersonId] {
        &self.parent_ids
    }

    pub fn spouse_ids(&self) -> &[PersonId] {
        &self.spouse_ids
    }

    /// Returns `"{first} {last}"`, or the identifier when both are blank.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.id.to_string()
        } else {
            name.to_string()
        }
    }

    /// Returns a short lifespan label such as `"1901"` or `"1901 - 1978"`.
    ///
    /// Dates are read as `YYYY-MM-DD` and only their year is shown. Returns
    /// `None` without a valid birth date; an invalid death date is omitted.
    pub fn lifespan_label(&self) -> Option<String> {
        let birth = self.birth_date.as_deref().and_then(year_of)?;
        match self.death_date.as_deref().and_then(year_of) {
            Some(death) => Some(format!("{birth} - {death}")),
            None => Some(birth.to_string()),
        }
    }
}

fn year_of(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.year())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<PersonId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<PersonId>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
