//! Books command handler.

use std::fmt::Write as _;

use anyhow::Result;
use readaloud_core::{BookCatalog, LibraryScanner, ReaderSettings};

/// Execute the books command.
pub fn execute(settings: &ReaderSettings, json: bool) -> Result<()> {
    let scanner = LibraryScanner::new(&settings.library_root, settings.excluded_dirs.clone());
    let catalog = scanner.scan()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else if catalog.is_empty() {
        println!("No books found under {}", scanner.root().display());
    } else {
        print!("{}", render_catalog(&catalog));
    }
    Ok(())
}

/// Render the catalog as an indented listing, one folder per block.
pub fn render_catalog(catalog: &BookCatalog) -> String {
    let mut out = String::new();
    for (folder, books) in catalog {
        let _ = writeln!(out, "{folder}/");
        for book in books {
            let _ = writeln!(
                out,
                "  {:<40} {:>10}  {}",
                book.name,
                format_size(book.size),
                book.relative_path
            );
        }
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f >= MB {
        format!("{:.1} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readaloud_core::BookEntry;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_render_catalog() {
        let mut catalog = BookCatalog::new();
        catalog.insert(
            "heresy".to_owned(),
            vec![BookEntry {
                name: "Horus Rising".to_owned(),
                path: "/srv/heresy/Horus Rising.pdf".to_owned(),
                relative_path: "heresy/Horus Rising.pdf".to_owned(),
                size: 2048,
            }],
        );

        let rendered = render_catalog(&catalog);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "heresy/");
        assert!(lines[1].starts_with("  Horus Rising"));
        assert!(lines[1].contains("2.0 KB"));
        assert!(lines[1].ends_with("heresy/Horus Rising.pdf"));
    }
}
