//! vCard 3.0 record builder.
//!
//! [`build`] is pure and deterministic: the same record always yields the
//! same bytes, so it can be re-run on every keystroke to drive a live
//! preview. Required fields must hold more than whitespace; optional lines
//! appear whenever their field is non-empty. Values are inserted verbatim;
//! vCard-reserved characters (`;`, `,`, `\`) are not escaped.

use std::fmt;

use crate::contact::{ContactRecord, Field};

/// Text shown in place of the preview until the required fields are filled.
pub const PREVIEW_PLACEHOLDER: &str =
    "Fill in the form above to see the vCard data that will be encoded in the QR code.";

const LINE_END: &str = "\n";

/// A finished vCard payload. Only [`build`] can produce one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VCardText(String);

impl VCardText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for VCardText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VCardText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returned by [`build`] when a required field is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotReady {
    missing: Vec<Field>,
}

impl NotReady {
    /// Missing required fields, in form order.
    pub fn missing(&self) -> &[Field] {
        &self.missing
    }
}

impl fmt::Display for NotReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.missing.iter().map(|f| f.label()).collect();
        write!(f, "missing required fields: {}", labels.join(", "))
    }
}

impl std::error::Error for NotReady {}

/// Build the vCard text for `record`.
pub fn build(record: &ContactRecord) -> Result<VCardText, NotReady> {
    let missing = record.missing_required();
    if !missing.is_empty() {
        return Err(NotReady { missing });
    }

    let mut lines: Vec<String> = Vec::with_capacity(12);
    lines.push("BEGIN:VCARD".to_string());
    lines.push("VERSION:3.0".to_string());
    lines.push(format!("FN:{} {}", record.first_name, record.last_name));
    lines.push(format!("N:{};{};;;", record.last_name, record.first_name));

    let optional: [(Field, &str); 6] = [
        (Field::Phone, "TEL;TYPE=CELL:"),
        (Field::Email, "EMAIL:"),
        (Field::Company, "ORG:"),
        (Field::Title, "TITLE:"),
        (Field::Website, "URL:"),
        (Field::Address, "ADR;TYPE=WORK:;;"),
    ];
    for (field, prefix) in optional {
        if record.get(field).is_empty() {
            continue;
        }
        match field {
            Field::Address => lines.push(format!("{}{};;;;", prefix, flatten_lines(&record.address))),
            _ => lines.push(format!("{}{}", prefix, record.get(field))),
        }
    }
    if !record.notes.is_empty() {
        lines.push(format!("NOTE:{}", record.notes));
    }

    lines.push("END:VCARD".to_string());
    Ok(VCardText(lines.join(LINE_END)))
}

/// The vCard text, or [`PREVIEW_PLACEHOLDER`] when the record is not ready.
pub fn preview(record: &ContactRecord) -> String {
    match build(record) {
        Ok(text) => text.into_string(),
        Err(_) => PREVIEW_PLACEHOLDER.to_string(),
    }
}

/// Join a multi-line value into one line, each break becoming `", "`.
pub fn flatten_lines(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n").replace('\n', ", ")
}
