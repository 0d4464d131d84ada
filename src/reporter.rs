use indicatif::{ProgressBar, ProgressStyle};
use pdf_duper::ProgressReporter;
use std::time::Duration;

/// Spinner shown while a PDF is being fingerprinted.
pub struct CliReporter {
    bar: ProgressBar,
}

impl CliReporter {
    pub fn new(file_name: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message(format!("Fingerprinting {}...", file_name));
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl ProgressReporter for CliReporter {
    fn on_extract_start(&self, page_count: usize) {
        self.bar
            .set_message(format!("Extracting text from {} pages...", page_count));
    }

    fn on_page_extracted(&self, page_number: u32, page_count: usize) {
        self.bar
            .set_message(format!("Extracting text... page {}/{}", page_number, page_count));
    }

    fn on_extract_complete(&self, text_len: usize, duration_secs: f64) {
        self.bar.set_message(format!(
            "Extracted {} bytes of text in {:.2}s",
            text_len, duration_secs
        ));
    }
}

impl Drop for CliReporter {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
