//! Line format for stored entries.
//!
//! # Record Format
//!
//! ```text
//! Resource|Action|Subject|Flag\r\n
//! ```
//!
//! `Flag` is `1` for Grant and `0` for Deny. Fields are not escaped, so the
//! encoder rejects any field containing `|`, CR or LF.
//!
//! # Corrupt Records
//!
//! A line that does not decode is skipped and logged at `warn` with its line
//! number; the rest of the file still loads. The next rewrite of the file
//! drops the bad line.

use tracing::warn;
use warden_types::{AccessEntry, EntryValue};

use crate::StoreError;

/// Separates the four fields of a record.
pub const FIELD_SEPARATOR: char = '|';

/// Terminates every record.
pub const RECORD_TERMINATOR: &str = "\r\n";

const FIELD_COUNT: usize = 4;

/// Entries decoded from a store file, plus how many lines were skipped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub entries: Vec<AccessEntry>,
    pub skipped: usize,
}

/// Rejects fields the line format cannot carry.
pub fn validate_entry(entry: &AccessEntry) -> Result<(), StoreError> {
    validate_field("resource", entry.resource())?;
    validate_field("action", entry.action())?;
    validate_field("subject", entry.subject())
}

pub(crate) fn validate_field(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.contains([FIELD_SEPARATOR, '\r', '\n']) {
        return Err(StoreError::InvalidField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Encodes one entry as a terminated record.
pub fn encode_entry(entry: &AccessEntry) -> Result<String, StoreError> {
    validate_entry(entry)?;

    Ok(format!(
        "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{RECORD_TERMINATOR}",
        entry.resource(),
        entry.action(),
        entry.subject(),
        entry.value().as_flag(),
    ))
}

/// Encodes a full entry set. Fails without output on the first bad entry.
pub fn encode_entries(entries: &[AccessEntry]) -> Result<String, StoreError> {
    let mut out = String::with_capacity(entries.len() * 48);
    for entry in entries {
        out.push_str(&encode_entry(entry)?);
    }
    Ok(out)
}

/// Decodes one record (without its terminator).
pub fn decode_line(line: &str) -> Result<AccessEntry, String> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        ));
    }

    let (resource, action, subject, flag) = (fields[0], fields[1], fields[2], fields[3]);
    if resource.is_empty() {
        return Err("empty resource".to_string());
    }
    if action.is_empty() {
        return Err("empty action".to_string());
    }
    if subject.len() < 2 {
        return Err(format!("subject {subject:?} too short"));
    }
    let value = EntryValue::from_flag(flag).ok_or_else(|| format!("invalid flag {flag:?}"))?;

    Ok(AccessEntry::new(resource, action, subject, value))
}

/// Decodes a whole store file, skipping blank and corrupt lines.
pub fn decode_entries(text: &str) -> Decoded {
    let mut decoded = Decoded::default();

    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }

        match decode_line(line) {
            Ok(entry) => decoded.entries.push(entry),
            Err(reason) => {
                warn!(line = index + 1, %reason, "skipping corrupt acl record");
                decoded.skipped += 1;
            }
        }
    }

    decoded
}
