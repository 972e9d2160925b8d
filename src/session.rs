// Per-user upload session: the current selection plus the outcome of the
// last attempt. `UploadStatus` is an enum so a result and an error can
// never be shown at the same time.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::UploadError;
use crate::export;
use crate::response::{TransactionKind, UploadResult};
use crate::selection::{UploadSelection, Variant};

/// Anything that can carry a selection to the statement service.
pub trait Uploader {
    fn upload(&self, variant: Variant, selection: &UploadSelection)
        -> Result<UploadResult, UploadError>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded(UploadResult),
    Failed(String),
}

pub struct UploadSession<U> {
    uploader: U,
    variant: Variant,
    selection: UploadSelection,
    status: UploadStatus,
}

impl<U: Uploader> UploadSession<U> {
    pub fn new(uploader: U, variant: Variant) -> Self {
        UploadSession {
            uploader,
            variant,
            selection: UploadSelection::default(),
            status: UploadStatus::Idle,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn selection(&self) -> &UploadSelection {
        &self.selection
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    /// Replace the selection and forget the previous outcome.
    pub fn select_files<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.selection = UploadSelection::new(paths, self.variant);
        self.status = UploadStatus::Idle;
    }

    /// Run one upload attempt.
    ///
    /// With nothing selected this returns `NoSelection` and leaves the
    /// status as it was. Otherwise the status goes through `Loading` and
    /// ends in `Succeeded` or `Failed`, and the same outcome is returned.
    pub fn upload(&mut self) -> Result<(), UploadError> {
        if self.selection.is_empty() {
            return Err(UploadError::NoSelection);
        }

        self.status = UploadStatus::Loading;
        match self.uploader.upload(self.variant, &self.selection) {
            Ok(result) => {
                info!(variant = %self.variant, "upload succeeded");
                self.status = UploadStatus::Succeeded(result);
                Ok(())
            }
            Err(err) => {
                warn!(variant = %self.variant, error = %err, "upload failed");
                self.status = UploadStatus::Failed(err.user_message());
                Err(err)
            }
        }
    }

    /// The loaded result, if the last attempt succeeded.
    pub fn result(&self) -> Option<&UploadResult> {
        match &self.status {
            UploadStatus::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// CSV text for one vendor list, or `None` when there is nothing to
    /// export (no summary loaded, unknown vendor, empty list).
    pub fn export_csv(&self, vendor: &str, kind: TransactionKind) -> Result<Option<String>> {
        let Some(summary) = self.result().and_then(|r| r.vendor(vendor)) else {
            return Ok(None);
        };
        let txns = summary.transactions(kind);
        if txns.is_empty() {
            return Ok(None);
        }
        export::to_csv(txns).map(Some)
    }

    /// Write `<vendor>-<kind>.csv` into `dir`. Returns `None` when there
    /// was nothing to export and no file was written.
    pub fn save_csv(&self, vendor: &str, kind: TransactionKind, dir: &Path) -> Result<Option<PathBuf>> {
        let Some(csv) = self.export_csv(vendor, kind)? else {
            return Ok(None);
        };
        let path = export::save(dir, vendor, kind, &csv)?;
        info!(path = %path.display(), "csv exported");
        Ok(Some(path))
    }

    /// Every vendor/kind pair of the loaded summary that has transactions.
    pub fn exportable(&self) -> Vec<(String, TransactionKind)> {
        self.result()
            .map(|r| r.vendors())
            .unwrap_or_default()
            .iter()
            .flat_map(|v| {
                TransactionKind::ALL
                    .into_iter()
                    .filter(move |k| !v.transactions(*k).is_empty())
                    .map(move |k| (v.vendor.clone(), k))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{interpret, Transaction, VendorSummary};
    use std::cell::Cell;

    /// Replays a canned HTTP answer and counts calls.
    struct Canned {
        status: u16,
        body: Cell<&'static str>,
        calls: Cell<usize>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Canned {
                status,
                body: Cell::new(body),
                calls: Cell::new(0),
            }
        }
    }

    impl Uploader for &Canned {
        fn upload(
            &self,
            variant: Variant,
            _selection: &UploadSelection,
        ) -> Result<UploadResult, UploadError> {
            self.calls.set(self.calls.get() + 1);
            interpret(self.status, Some("Internal Server Error"), self.body.get(), variant)
        }
    }

    const VENDOR_A: &str = r#"{"VendorA": {"credit": [{"date":"2024-01-02","amount":100,"desc":"pay"}], "debit": []}}"#;

    fn pdf() -> Vec<PathBuf> {
        vec![PathBuf::from("statement.pdf")]
    }

    #[test]
    fn empty_selection_sends_nothing_and_keeps_status() {
        let server = Canned::new(200, VENDOR_A);
        let mut session = UploadSession::new(&server, Variant::Summary);
        session.select_files(pdf());
        session.upload().unwrap();

        session.selection = UploadSelection::default();
        let err = session.upload().unwrap_err();
        assert!(matches!(err, UploadError::NoSelection));
        assert_eq!(server.calls.get(), 1);
        assert!(session.result().is_some());
    }

    #[test]
    fn empty_selection_from_idle_stays_idle() {
        let server = Canned::new(200, "{}");
        let mut session = UploadSession::new(&server, Variant::Monthly);
        assert!(matches!(session.upload(), Err(UploadError::NoSelection)));
        assert_eq!(session.status(), &UploadStatus::Idle);
        assert_eq!(server.calls.get(), 0);
    }

    #[test]
    fn logical_error_clears_data() {
        let server = Canned::new(200, r#"{"error": "unreadable pdf"}"#);
        let mut session = UploadSession::new(&server, Variant::Summary);
        session.select_files(pdf());
        assert!(session.upload().is_err());
        assert_eq!(session.status(), &UploadStatus::Failed("unreadable pdf".into()));
        assert!(session.result().is_none());
        assert_ne!(session.status(), &UploadStatus::Loading);
    }

    #[test]
    fn failed_retry_drops_previous_data() {
        let server = Canned::new(200, VENDOR_A);
        let mut session = UploadSession::new(&server, Variant::Summary);
        session.select_files(pdf());
        session.upload().unwrap();
        assert!(session.result().is_some());

        server.body.set(r#"{"error": "unreadable pdf"}"#);
        assert!(session.upload().is_err());
        assert_eq!(server.calls.get(), 2);
        assert!(session.result().is_none());
        assert_eq!(session.status(), &UploadStatus::Failed("unreadable pdf".into()));
        assert_eq!(session.export_csv("VendorA", TransactionKind::Credit).unwrap(), None);
    }

    #[test]
    fn successful_retry_clears_previous_error() {
        let server = Canned::new(200, r#"{"error": "unreadable pdf"}"#);
        let mut session = UploadSession::new(&server, Variant::Monthly);
        session.select_files(pdf());
        assert!(session.upload().is_err());

        server.body.set(r#"{"month": "2024-03", "rows_sent": 42}"#);
        session.upload().unwrap();
        assert_eq!(
            session.status(),
            &UploadStatus::Succeeded(UploadResult::SingleMonth {
                month: "2024-03".into(),
                rows_sent: 42
            })
        );
    }

    #[test]
    fn status_failure_uses_reason_phrase() {
        let server = Canned::new(500, "oops");
        let mut session = UploadSession::new(&server, Variant::Batch);
        session.select_files(pdf());
        assert!(session.upload().is_err());
        assert_eq!(session.status(), &UploadStatus::Failed("Internal Server Error".into()));
    }

    #[test]
    fn new_selection_resets_outcome() {
        let server = Canned::new(200, r#"{"month": "2024-03", "rows_sent": 42}"#);
        let mut session = UploadSession::new(&server, Variant::Monthly);
        session.select_files(pdf());
        session.upload().unwrap();
        assert!(session.result().is_some());

        session.select_files(vec![PathBuf::from("other.pdf")]);
        assert_eq!(session.status(), &UploadStatus::Idle);
    }

    #[test]
    fn export_is_repeatable_and_skips_empty_lists() {
        let server = Canned::new(200, VENDOR_A);
        let mut session = UploadSession::new(&server, Variant::Summary);
        session.select_files(pdf());
        session.upload().unwrap();

        let first = session.export_csv("VendorA", TransactionKind::Credit).unwrap();
        let second = session.export_csv("VendorA", TransactionKind::Credit).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.as_deref(),
            Some("Date,Amount,Description\r\n2024-01-02,100,pay")
        );

        assert_eq!(session.export_csv("VendorA", TransactionKind::Debit).unwrap(), None);
        assert_eq!(session.export_csv("Nobody", TransactionKind::Credit).unwrap(), None);
        assert_eq!(
            session.exportable(),
            vec![("VendorA".to_string(), TransactionKind::Credit)]
        );
    }

    #[test]
    fn save_csv_writes_only_when_there_is_data() {
        let server = Canned::new(200, VENDOR_A);
        let mut session = UploadSession::new(&server, Variant::Summary);
        session.select_files(pdf());
        session.upload().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = session
            .save_csv("VendorA", TransactionKind::Credit, dir.path())
            .unwrap()
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "VendorA-credit.csv");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);

        assert!(session
            .save_csv("VendorA", TransactionKind::Debit, dir.path())
            .unwrap()
            .is_none());
        assert!(!dir.path().join("VendorA-debit.csv").exists());
    }

    #[test]
    fn export_needs_a_summary_result() {
        let server = Canned::new(200, r#"{"month": "2024-03", "rows_sent": 42}"#);
        let mut session = UploadSession::new(&server, Variant::Monthly);
        session.select_files(pdf());
        session.upload().unwrap();
        assert_eq!(session.export_csv("month", TransactionKind::Credit).unwrap(), None);
        assert!(session.exportable().is_empty());
    }

    #[test]
    fn vendor_lookup_matches_by_name() {
        let result = UploadResult::Segregated(vec![VendorSummary {
            vendor: "Acme".into(),
            credit: vec![],
            debit: vec![Transaction {
                date: "2024-02-01".into(),
                amount: 9.99,
                desc: None,
            }],
        }]);
        assert!(result.vendor("Acme").is_some());
        assert!(result.vendor("acme").is_none());
    }
}
