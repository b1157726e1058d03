//! The kiosk's Markdown answer file.

use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::error::Result;

/// Read the Markdown file, or render the failure as a Markdown page.
pub fn read_markdown_file(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to read markdown file");
            format!("# Error Reading Markdown File\n\nAn error occurred while reading the file: {e}")
        }
    }
}

/// Overwrite the Markdown file, creating parent directories as needed.
pub fn write_markdown_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    info!(path = %path.display(), bytes = content.len(), "markdown file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_into_new_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk/answer.md");
        write_markdown_file(&path, "# Hello").unwrap();
        assert_eq!(read_markdown_file(&path), "# Hello");
    }

    #[test]
    fn unreadable_file_becomes_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let page = read_markdown_file(dir.path().join("missing.md"));
        assert!(page.starts_with("# Error Reading Markdown File\n\n"));
    }
}
