//! Tab-separated flat-file sink
//!
//! Writes one `Title\tHref\tDescription` record per line, UTF-8, no header.
//! The file is opened in append mode so a run only ever grows it.

use crate::crawler::PageLink;
use crate::output::{OutputResult, ResultSink};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Appends records to a flat file, one tab-separated line each
pub struct FileSink {
    file: File,
}

impl FileSink {
    /// Opens (or creates) the results file in append mode
    pub fn open(path: &Path) -> OutputResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Formats a record as a single output line
    ///
    /// An absent description serializes as an empty final field.
    fn format_record(record: &PageLink) -> String {
        format!(
            "{}\t{}\t{}\n",
            record.title,
            record.href,
            record.description.as_deref().unwrap_or("")
        )
    }
}

impl ResultSink for FileSink {
    fn append(&mut self, record: &PageLink) -> OutputResult<()> {
        self.file.write_all(Self::format_record(record).as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn record(title: &str, href: &str, description: Option<&str>) -> PageLink {
        PageLink {
            title: title.to_string(),
            href: href.to_string(),
            description: description.map(|d| d.to_string()),
        }
    }

    #[test]
    fn test_format_record_with_description() {
        let line = FileSink::format_record(&record(
            "Example",
            "https://example.com/sites/42",
            Some("a description"),
        ));
        assert_eq!(line, "Example\thttps://example.com/sites/42\ta description\n");
    }

    #[test]
    fn test_format_record_without_description() {
        let line = FileSink::format_record(&record("Example", "https://example.com/sites/42", None));
        assert_eq!(line, "Example\thttps://example.com/sites/42\t\n");
    }

    #[test]
    fn test_append_grows_file() {
        let file = NamedTempFile::new().unwrap();
        let mut sink = FileSink::open(file.path()).unwrap();

        sink.append(&record("One", "https://example.com/sites/1", None))
            .unwrap();
        sink.append(&record("Two", "https://example.com/sites/2", Some("second")))
            .unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "One\thttps://example.com/sites/1\t");
        assert_eq!(lines[1], "Two\thttps://example.com/sites/2\tsecond");
    }

    #[test]
    fn test_reopen_appends_not_truncates() {
        let file = NamedTempFile::new().unwrap();
        {
            let mut sink = FileSink::open(file.path()).unwrap();
            sink.append(&record("One", "https://example.com/sites/1", None))
                .unwrap();
        }
        {
            let mut sink = FileSink::open(file.path()).unwrap();
            sink.append(&record("Two", "https://example.com/sites/2", None))
                .unwrap();
        }

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
