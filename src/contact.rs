//! The contact record collected from the user.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Structured contact fields, as typed into the form.
///
/// Every field is free-form text. A required field that is empty or only
/// whitespace counts as missing; values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: String,
    /// Single mobile number, no format checks
    pub phone: String,
    pub email: String,
    pub company: String,
    pub title: String,
    pub website: String,
    /// May span several lines
    pub address: String,
    pub notes: String,
}

/// Names a single field of a [`ContactRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Phone,
    Email,
    Company,
    Title,
    Website,
    Address,
    Notes,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::FirstName,
        Field::LastName,
        Field::Phone,
        Field::Email,
        Field::Company,
        Field::Title,
        Field::Website,
        Field::Address,
        Field::Notes,
    ];

    /// Fields that must be present before a vCard can be produced.
    pub const REQUIRED: [Field; 3] = [Field::FirstName, Field::LastName, Field::Phone];

    /// Human-readable label, as shown next to the form input.
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Phone => "Mobile Number",
            Field::Email => "Email",
            Field::Company => "Company",
            Field::Title => "Job Title",
            Field::Website => "Website",
            Field::Address => "Address",
            Field::Notes => "Notes",
        }
    }

    /// Key used in the JSON representation.
    pub fn key(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Company => "company",
            Field::Title => "title",
            Field::Website => "website",
            Field::Address => "address",
            Field::Notes => "notes",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = Error;

    /// Accepts the JSON key (`firstName`), kebab-case (`first-name`) or
    /// snake_case (`first_name`), case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let norm: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Field::ALL
            .into_iter()
            .find(|f| f.key().to_lowercase() == norm)
            .ok_or_else(|| Error::ConfigError(format!("Unknown contact field: {}", s)))
    }
}

impl ContactRecord {
    /// Read one field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Company => &self.company,
            Field::Title => &self.title,
            Field::Website => &self.website,
            Field::Address => &self.address,
            Field::Notes => &self.notes,
        }
    }

    /// Replace one field in place.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Company => &mut self.company,
            Field::Title => &mut self.title,
            Field::Website => &mut self.website,
            Field::Address => &mut self.address,
            Field::Notes => &mut self.notes,
        };
        *slot = value.into();
    }

    /// Whether the field holds anything besides whitespace.
    pub fn has(&self, field: Field) -> bool {
        !self.get(field).trim().is_empty()
    }

    /// Required fields that are currently absent, in form order.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| f.is_required() && !self.has(*f))
            .collect()
    }

    pub fn is_ready(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Load a record from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Invalid contact JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_roundtrip_each_field() {
        let mut rec = ContactRecord::default();
        for (i, field) in Field::ALL.into_iter().enumerate() {
            rec.set(field, format!("value-{}", i));
        }
        for (i, field) in Field::ALL.into_iter().enumerate() {
            assert_eq!(rec.get(field), format!("value-{}", i));
        }
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let rec = ContactRecord {
            first_name: "Jane".into(),
            last_name: "   ".into(),
            phone: "\t".into(),
            ..Default::default()
        };
        assert_eq!(rec.missing_required(), vec![Field::LastName, Field::Phone]);
        assert!(!rec.is_ready());
    }

    #[test]
    fn only_name_and_phone_are_required() {
        let required: Vec<Field> = Field::ALL.into_iter().filter(|f| f.is_required()).collect();
        assert_eq!(required, Field::REQUIRED.to_vec());
        assert!(!Field::Email.is_required());
    }

    #[test]
    fn field_parses_several_spellings() {
        assert_eq!("firstName".parse::<Field>().unwrap(), Field::FirstName);
        assert_eq!("first-name".parse::<Field>().unwrap(), Field::FirstName);
        assert_eq!("LAST_NAME".parse::<Field>().unwrap(), Field::LastName);
        assert_eq!("website".parse::<Field>().unwrap(), Field::Website);
        assert!("fax".parse::<Field>().is_err());
    }

    #[test]
    fn json_uses_camel_case_and_defaults_missing_keys() {
        let rec = ContactRecord::from_json(
            r#"{"firstName":"Jane","lastName":"Doe","phone":"+1-555-000-0000"}"#,
        )
        .unwrap();
        assert_eq!(rec.first_name, "Jane");
        assert_eq!(rec.last_name, "Doe");
        assert!(rec.email.is_empty());
        assert!(rec.is_ready());

        let out = serde_json::to_value(&rec).unwrap();
        assert_eq!(out["lastName"], "Doe");
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = ContactRecord::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
