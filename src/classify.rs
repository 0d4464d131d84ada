use crate::error::Error;
use crate::fingerprint::Fingerprint;
use crate::store::{DocumentStatus, DocumentStore, MarkOutcome, NewPdfRecord};
use std::fmt;
use tracing::{debug, info, warn};

/// Outcome of comparing a fingerprint against stored records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// No row matches.
    New,
    /// A row exists but was never confirmed read.
    ExistsUnread { file_name: String },
    /// A row exists and was confirmed read, under `file_name`.
    ReadAlready { file_name: String },
}

impl Classification {
    /// Name stored for the matching row, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Classification::New => None,
            Classification::ExistsUnread { file_name }
            | Classification::ReadAlready { file_name } => Some(file_name),
        }
    }

    /// Whether marking as read would change anything.
    pub fn can_mark_read(&self) -> bool {
        !matches!(self, Classification::ReadAlready { .. })
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::New => write!(f, "new"),
            Classification::ExistsUnread { .. } => write!(f, "exists-unread"),
            Classification::ReadAlready { .. } => write!(f, "read-already"),
        }
    }
}

/// Look up a fingerprint. Never writes.
pub fn classify<S>(store: &S, fingerprint: &Fingerprint) -> Result<Classification, Error>
where
    S: DocumentStore + ?Sized,
{
    let classification = match store.find_by_hash(fingerprint.as_str())? {
        None => Classification::New,
        Some(record) => match record.document_status() {
            DocumentStatus::Read => Classification::ReadAlready {
                file_name: record.file_name,
            },
            DocumentStatus::Exists => Classification::ExistsUnread {
                file_name: record.file_name,
            },
        },
    };
    debug!("Classified {} as {}", fingerprint, classification);
    Ok(classification)
}

/// Record that the document with this fingerprint has been read.
///
/// An unseen hash is inserted under `file_name`; an `Exists` row is promoted
/// keeping its stored name; a `Read` row is left untouched.
pub fn mark_as_read<S>(
    store: &S,
    fingerprint: &Fingerprint,
    file_name: &str,
) -> Result<MarkOutcome, Error>
where
    S: DocumentStore + ?Sized,
{
    let outcome = store.mark_read(fingerprint.as_str(), file_name)?;
    match &outcome {
        MarkOutcome::Inserted => info!("'{}' marked as read", file_name),
        MarkOutcome::Updated => info!("Existing record for '{}' marked as read", file_name),
        MarkOutcome::AlreadyRead { file_name: stored } => {
            warn!("Already marked as read as '{}', nothing written", stored)
        }
    }
    Ok(outcome)
}

/// Record a document as seen but unread. Existing rows are never touched.
pub fn register<S>(store: &S, fingerprint: &Fingerprint, file_name: &str) -> Result<bool, Error>
where
    S: DocumentStore + ?Sized,
{
    let created = store.insert_if_absent(&NewPdfRecord {
        hash: fingerprint.as_str(),
        file_name,
        status: DocumentStatus::Exists.as_str(),
    })?;
    if created {
        info!("Registered '{}'", file_name);
    } else {
        debug!("'{}' already on record, register skipped", file_name);
    }
    Ok(created)
}
