pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod fingerprint;
pub mod progress;
pub mod store;

pub use classify::{classify, mark_as_read, register, Classification};
pub use config::AppConfig;
pub use error::{Error, ErrorKind};
pub use fingerprint::{Fingerprint, FingerprintAlgorithm, Fingerprinter};
pub use progress::{ProgressReporter, SilentReporter};
pub use store::{DocumentStore, MarkOutcome, Store};
