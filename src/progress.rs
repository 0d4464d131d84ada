/// Trait for reporting fingerprinting progress.
///
/// The CLI implements it with an indicatif spinner. All methods have default
/// no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_extract_start(&self, _page_count: usize) {}
    fn on_page_extracted(&self, _page_number: u32, _page_count: usize) {}
    fn on_extract_complete(&self, _text_len: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
