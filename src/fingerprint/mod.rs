use crate::error::Error;
use crate::progress::{ProgressReporter, SilentReporter};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::hash::Hasher as _;
use std::path::Path;
use tracing::debug;
use twox_hash::XxHash64;

pub mod extract;

pub use extract::{concat_pages, extract_pages, extract_text};

/// Digest applied to a document's concatenated text.
///
/// Changing it on an existing database makes every stored hash unreachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    #[default]
    Blake3,
    Xxh64,
}

impl FingerprintAlgorithm {
    /// Length of the hex string this algorithm produces.
    pub fn hex_len(self) -> usize {
        match self {
            FingerprintAlgorithm::Blake3 => 64,
            FingerprintAlgorithm::Xxh64 => 16,
        }
    }
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintAlgorithm::Blake3 => write!(f, "blake3"),
            FingerprintAlgorithm::Xxh64 => write!(f, "xxh64"),
        }
    }
}

/// Lowercase hex digest of a document's extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap a hash already stored in the database.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Fingerprint(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn digest_text(algorithm: FingerprintAlgorithm, text: &str) -> Fingerprint {
    let bytes = text.as_bytes();
    let hex = match algorithm {
        FingerprintAlgorithm::Blake3 => blake3::hash(bytes).to_hex().to_string(),
        FingerprintAlgorithm::Xxh64 => {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(bytes);
            format!("{:016x}", hasher.finish())
        }
    };
    Fingerprint(hex)
}

/// Turns PDFs into fingerprints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fingerprinter {
    algorithm: FingerprintAlgorithm,
}

impl Fingerprinter {
    pub fn new(algorithm: FingerprintAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> FingerprintAlgorithm {
        self.algorithm
    }

    pub fn fingerprint_bytes(&self, data: &[u8]) -> Result<Fingerprint, Error> {
        self.fingerprint_bytes_with(data, &SilentReporter)
    }

    pub fn fingerprint_bytes_with(
        &self,
        data: &[u8],
        reporter: &dyn ProgressReporter,
    ) -> Result<Fingerprint, Error> {
        let pages = extract_pages(data, reporter)?;
        Ok(self.fingerprint_pages(pages))
    }

    /// Fingerprint already extracted page texts.
    pub fn fingerprint_pages<I, S>(&self, pages: I) -> Fingerprint
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        digest_text(self.algorithm, &concat_pages(pages))
    }

    pub fn fingerprint_file(&self, path: &Path) -> Result<Fingerprint, Error> {
        self.fingerprint_file_with(path, &SilentReporter)
    }

    pub fn fingerprint_file_with(
        &self,
        path: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<Fingerprint, Error> {
        let data = fs::read(path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        let fingerprint = self.fingerprint_bytes_with(&data, reporter)?;
        debug!("{} fingerprint for {}: {}", self.algorithm, path.display(), fingerprint);
        Ok(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake3_empty_string() {
        // Known BLAKE3 digest of zero bytes
        assert_eq!(
            digest_text(FingerprintAlgorithm::Blake3, "").as_str(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn test_fixed_length_lowercase_hex() {
        for algorithm in [FingerprintAlgorithm::Blake3, FingerprintAlgorithm::Xxh64] {
            for text in ["", "Hello", "ünïcödé text"] {
                let fp = digest_text(algorithm, text);
                assert_eq!(fp.as_str().len(), algorithm.hex_len());
                assert!(fp
                    .as_str()
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            }
        }
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = digest_text(FingerprintAlgorithm::Xxh64, "Hello");
        let b = digest_text(FingerprintAlgorithm::Xxh64, "Hello");
        assert_eq!(a, b);
        assert_ne!(a, digest_text(FingerprintAlgorithm::Xxh64, "Hello!"));
    }

    #[test]
    fn test_page_boundaries_do_not_matter() {
        let fingerprinter = Fingerprinter::default();
        assert_eq!(
            fingerprinter.fingerprint_pages(["Hel", "lo"]),
            fingerprinter.fingerprint_pages(["Hello"])
        );
    }

    #[test]
    fn test_all_empty_pages_hash_like_empty_string() {
        let fingerprinter = Fingerprinter::new(FingerprintAlgorithm::Blake3);
        assert_eq!(
            fingerprinter.fingerprint_pages(["", "", ""]),
            digest_text(FingerprintAlgorithm::Blake3, "")
        );
    }

    #[test]
    fn test_algorithm_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            fingerprint: FingerprintAlgorithm,
        }
        let w: Wrapper = config::Config::builder()
            .set_override("fingerprint", "xxh64")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(w.fingerprint, FingerprintAlgorithm::Xxh64);
    }
}
