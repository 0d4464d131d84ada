use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pdf-duper")]
#[command(about = "Tells you whether you've already read a PDF with the same content", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check whether a PDF's content has been seen or read before
    Check(CheckArgs),
    /// Mark a PDF's content as read
    MarkRead(DocumentArgs),
    /// Record a PDF's content as seen but not yet read
    Register(DocumentArgs),
    /// Print the content fingerprint of a PDF
    Fingerprint(FingerprintArgs),
    /// List classified PDFs
    List(ListArgs),
    /// Create the pdf_data table if it does not exist
    InitDb,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// PDF file to fingerprint
    pub path: PathBuf,
    /// Name to record instead of the file's own name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
    /// Mark as read without asking
    #[arg(long, short = 'y', conflicts_with = "no_prompt")]
    pub yes: bool,
    /// Only report; never offer to mark as read
    #[arg(long)]
    pub no_prompt: bool,
}

#[derive(Debug, Args)]
pub struct FingerprintArgs {
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Write the listing to a CSV file instead of the terminal
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
    /// Include content hashes
    #[arg(long)]
    pub with_hash: bool,
}

impl DocumentArgs {
    /// `--name`, or the file name component of the path.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.to_string_lossy().into_owned()),
        }
    }
}

/// Long help, printed when no subcommand is given.
pub fn write_long_help<W: Write>(out: &mut W) -> io::Result<()> {
    Cli::command().write_long_help(out)
}
