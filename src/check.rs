use anyhow::Result;
use colored::*;
use pdf_duper::{Classification, DocumentStore, Fingerprint, MarkOutcome};
use std::io::{BufRead, Write};

use crate::utils::prompt::prompt_confirm_from;

/// How `check` handles the mark-as-read confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Ask on the terminal.
    Ask,
    /// Mark without asking (`--yes`).
    Assume,
    /// Report only (`--no-prompt`).
    Skip,
}

impl Confirmation {
    pub fn from_flags(yes: bool, no_prompt: bool) -> Self {
        if no_prompt {
            Confirmation::Skip
        } else if yes {
            Confirmation::Assume
        } else {
            Confirmation::Ask
        }
    }
}

#[derive(Debug)]
pub struct CheckOutcome {
    pub classification: Classification,
    pub marked: Option<MarkOutcome>,
}

/// Classify an already computed fingerprint, report it, and mark it as read
/// if confirmed. A document already read is never offered for marking.
pub fn check_document<S, R, W>(
    store: &S,
    fingerprint: &Fingerprint,
    name: &str,
    confirmation: Confirmation,
    input: &mut R,
    output: &mut W,
) -> Result<CheckOutcome>
where
    S: DocumentStore + ?Sized,
    R: BufRead,
    W: Write,
{
    let classification = pdf_duper::classify(store, fingerprint)?;
    write_classification(output, name, &classification)?;

    let confirmed = match confirmation {
        _ if !classification.can_mark_read() => false,
        Confirmation::Skip => false,
        Confirmation::Assume => true,
        Confirmation::Ask => prompt_confirm_from("Mark as read?", Some(false), input, output)?,
    };

    let marked = if confirmed {
        let outcome = pdf_duper::mark_as_read(store, fingerprint, name)?;
        write_mark_outcome(output, name, &outcome)?;
        Some(outcome)
    } else {
        None
    };

    Ok(CheckOutcome {
        classification,
        marked,
    })
}

pub fn write_classification<W: Write>(
    output: &mut W,
    name: &str,
    classification: &Classification,
) -> std::io::Result<()> {
    match classification {
        Classification::New => {
            writeln!(output, "{}", format!("'{}' is a new PDF.", name).green())
        }
        Classification::ExistsUnread { file_name } => writeln!(
            output,
            "{}",
            format!(
                "A file with the same content already exists ({}), but it hasn't been marked as read yet.",
                file_name
            )
            .yellow()
        ),
        Classification::ReadAlready { file_name } => writeln!(
            output,
            "{}",
            format!(
                "A file with the same content has already been marked as read ({}).",
                file_name
            )
            .red()
        ),
    }
}

pub fn write_mark_outcome<W: Write>(
    output: &mut W,
    name: &str,
    outcome: &MarkOutcome,
) -> std::io::Result<()> {
    match outcome {
        MarkOutcome::Inserted | MarkOutcome::Updated => {
            writeln!(output, "{}", format!("'{}' has been marked as read!", name).green())
        }
        MarkOutcome::AlreadyRead { file_name } => writeln!(
            output,
            "{}",
            format!("Already marked as read as '{}'; nothing changed.", file_name).yellow()
        ),
    }
}
