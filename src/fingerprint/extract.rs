use crate::error::Error;
use crate::progress::ProgressReporter;
use lopdf::Document;
use std::time::Instant;
use tracing::{debug, trace};

/// Extract the text of every page, in page order.
///
/// Fails with `DocumentUnreadable` if the document cannot be parsed, is
/// encrypted, or any single page fails; partial output is never returned.
pub fn extract_pages(data: &[u8], reporter: &dyn ProgressReporter) -> Result<Vec<String>, Error> {
    let start = Instant::now();
    let doc = Document::load_mem(data)?;

    if doc.is_encrypted() {
        return Err(Error::DocumentUnreadable(
            "document is encrypted".to_string(),
        ));
    }

    // BTreeMap keyed on page number, so iteration is page order
    let pages = doc.get_pages();
    let page_count = pages.len();
    reporter.on_extract_start(page_count);
    debug!("Extracting text from {} pages", page_count);

    let mut texts = Vec::with_capacity(page_count);
    for page_number in pages.keys() {
        let raw = doc.extract_text(&[*page_number]).map_err(|e| {
            Error::DocumentUnreadable(format!("page {}: {}", page_number, e))
        })?;
        let text = strip_page_break(raw);
        trace!("Page {} yielded {} bytes of text", page_number, text.len());
        reporter.on_page_extracted(*page_number, page_count);
        texts.push(text);
    }

    let text_len = texts.iter().map(String::len).sum();
    reporter.on_extract_complete(text_len, start.elapsed().as_secs_f64());
    Ok(texts)
}

/// lopdf ends every text object with a line break, so a page's text always
/// carries a trailing one. Drop it so the page contributes only its own text.
fn strip_page_break(mut text: String) -> String {
    let len = text.trim_end_matches(&['\r', '\n'][..]).len();
    text.truncate(len);
    text
}

/// Extract the concatenated text of the whole document.
pub fn extract_text(data: &[u8]) -> Result<String, Error> {
    let pages = extract_pages(data, &crate::progress::SilentReporter)?;
    Ok(concat_pages(pages))
}

/// Join page texts with no separator.
///
/// Documents whose page breaks fall at different points over the same text
/// produce the same string.
pub fn concat_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages.into_iter().fold(String::new(), |mut acc, page| {
        acc.push_str(page.as_ref());
        acc
    })
}
