use super::schema::pdf_data;
use diesel::prelude::*;
use std::fmt;

/// Persisted status of a classified document.
///
/// `New` is never stored; it is the absence of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    Exists,
    Read,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Exists => "Exists",
            DocumentStatus::Read => "Read",
        }
    }

    /// Anything other than `Read` counts as seen-but-unread.
    pub fn from_stored(value: &str) -> Self {
        if value == "Read" {
            DocumentStatus::Read
        } else {
            DocumentStatus::Exists
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of `pdf_data`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = pdf_data)]
pub struct PdfRecord {
    pub hash: String,
    pub file_name: String,
    pub status: String,
}

impl PdfRecord {
    pub fn document_status(&self) -> DocumentStatus {
        DocumentStatus::from_stored(&self.status)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pdf_data)]
pub struct NewPdfRecord<'a> {
    pub hash: &'a str,
    pub file_name: &'a str,
    pub status: &'a str,
}

/// Result of a mark-as-read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    /// No row existed; one was created with status `Read`.
    Inserted,
    /// An `Exists` row was moved to `Read`.
    Updated,
    /// The row was already `Read`; nothing was written.
    AlreadyRead { file_name: String },
}
