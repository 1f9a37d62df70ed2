//! Pages command handler.
//!
//! Runs the same extraction the server uses, which makes it handy for
//! checking whether a PDF has a usable text layer.

use std::path::Path;

use anyhow::{Result, bail};
use readaloud_core::PageTextSource;
use readaloud_pdf::PdfTextSource;

/// Execute the pages command.
pub fn execute(file: &Path, page: Option<usize>) -> Result<()> {
    let source = PdfTextSource::new();
    let total = source.page_count(file);
    if total == 0 {
        bail!("{} has no readable pages", file.display());
    }

    match page {
        None => println!("{}: {total} pages", file.display()),
        Some(page) if page >= total => {
            bail!("Page {page} is past the end ({total} pages, numbered from 0)");
        }
        Some(page) => {
            let text = source.extract_text(file, page)?;
            if text.is_empty() {
                println!("(no text on page {page})");
            } else {
                println!("{text}");
            }
        }
    }
    Ok(())
}
