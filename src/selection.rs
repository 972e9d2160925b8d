// File selection and upload variants.
//
// A `Variant` captures everything that differs between the three upload
// flows the backend supports: the multipart field name, whether several
// files may be sent at once, the endpoint path and whether the response is
// rendered as tables (vendor summary) or as a short status message.

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// One statement, vendor-by-vendor credit/debit tables.
    #[default]
    Summary,
    /// One statement, forwarded downstream as a single month.
    Monthly,
    /// Several statements, one summary line per month.
    Batch,
}

impl Variant {
    /// Multipart field name carrying each file.
    pub fn field_name(self) -> &'static str {
        match self {
            Variant::Summary | Variant::Monthly => "file",
            Variant::Batch => "files",
        }
    }

    pub fn accepts_multiple(self) -> bool {
        matches!(self, Variant::Batch)
    }

    /// Path appended to the configured base URL.
    pub fn endpoint_path(self) -> &'static str {
        match self {
            Variant::Summary => "",
            Variant::Monthly | Variant::Batch => "/process",
        }
    }

    /// Whether a response without month information is a vendor summary
    /// (tables) rather than a bare success.
    pub fn renders_tables(self) -> bool {
        matches!(self, Variant::Summary)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Summary => "summary",
            Variant::Monthly => "monthly",
            Variant::Batch => "batch",
        };
        f.write_str(name)
    }
}

/// Ordered list of files picked for the next upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSelection {
    files: Vec<PathBuf>,
}

impl UploadSelection {
    /// Build a selection for `variant`. Single-file variants keep only the
    /// first path. Nothing is checked beyond a warning for non-PDF names.
    pub fn new<I>(paths: I, variant: Variant) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut files: Vec<PathBuf> = paths.into_iter().collect();
        if !variant.accepts_multiple() {
            files.truncate(1);
        }
        for file in &files {
            if !looks_like_pdf(file) {
                warn!(path = %file.display(), "selected file does not have a .pdf extension");
            }
        }
        UploadSelection { files }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

fn looks_like_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn single_file_variants_keep_first_file() {
        let sel = UploadSelection::new(paths(&["jan.pdf", "feb.pdf"]), Variant::Monthly);
        assert_eq!(sel.files(), &[PathBuf::from("jan.pdf")]);
    }

    #[test]
    fn batch_keeps_every_file_in_order() {
        let sel = UploadSelection::new(paths(&["jan.pdf", "feb.pdf", "mar.PDF"]), Variant::Batch);
        assert_eq!(sel.len(), 3);
        assert_eq!(sel.files()[2], PathBuf::from("mar.PDF"));
    }

    #[test]
    fn non_pdf_names_are_not_rejected() {
        let sel = UploadSelection::new(paths(&["notes.txt"]), Variant::Summary);
        assert!(!sel.is_empty());
    }

    #[test]
    fn field_names_follow_variant() {
        assert_eq!(Variant::Summary.field_name(), "file");
        assert_eq!(Variant::Monthly.field_name(), "file");
        assert_eq!(Variant::Batch.field_name(), "files");
    }
}
