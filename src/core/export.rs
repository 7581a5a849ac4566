//! Markdown export: the serialized document plus a dated filename.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use log::info;

use crate::core::document::Document;
use crate::core::markdown;
use crate::core::storage::atomic_write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub markdown: String,
}

/// `blackboard-YYYY-MM-DD.md`
pub fn export_filename(date: NaiveDate) -> String {
    format!("blackboard-{}.md", date.format("%Y-%m-%d"))
}

impl Export {
    pub fn from_document(document: &Document, date: NaiveDate) -> Self {
        Self {
            filename: export_filename(date),
            markdown: markdown::serialize(document),
        }
    }

    /// Raw text is lifted into blocks first so both modes share one serializer.
    pub fn from_raw_text(text: &str, date: NaiveDate) -> Self {
        Self::from_document(&Document::from_raw_text(text), date)
    }

    /// Today's date in UTC.
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Write into `dir`, replacing any export from the same day.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        atomic_write(&path, &self.markdown)?;
        info!("Exported {} bytes to {}", self.markdown.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_filename_is_zero_padded_iso_date() {
        assert_eq!(export_filename(may_first()), "blackboard-2024-05-01.md");
    }

    #[test]
    fn test_raw_text_export() {
        let export = Export::from_raw_text("## Title\n\n☐ Task", may_first());
        assert_eq!(export.markdown, "## Title\n\n☐ Task");
        assert_eq!(export.filename, "blackboard-2024-05-01.md");
    }

    #[test]
    fn test_empty_document_exports_empty_string() {
        let export = Export::from_document(&Document::new(), may_first());
        assert_eq!(export.markdown, "");
    }

    #[test]
    fn test_write_to_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let export = Export::from_raw_text("# Hi", may_first());
        let path = export.write_to(&tmp.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "blackboard-2024-05-01.md");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Hi");
    }
}
