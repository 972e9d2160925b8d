// CSV export of a vendor's credit or debit lines.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::format_amount;
use crate::response::{Transaction, TransactionKind};

/// Serialize transactions as `Date,Amount,Description` rows joined by CRLF,
/// with no line break after the last row.
pub fn to_csv(txns: &[Transaction]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    wtr.write_record(["Date", "Amount", "Description"])?;
    for txn in txns {
        let amount = format_amount(txn.amount);
        wtr.write_record([
            txn.date.as_str(),
            amount.as_str(),
            txn.desc.as_deref().unwrap_or(""),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    let mut out = String::from_utf8(bytes).context("csv output is not utf-8")?;
    if out.ends_with("\r\n") {
        out.truncate(out.len() - 2);
    }
    Ok(out)
}

/// `<vendor>-<kind>.csv`, with path separators in the vendor replaced.
pub fn file_name(vendor: &str, kind: TransactionKind) -> String {
    let safe: String = vendor
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    format!("{safe}-{kind}.csv")
}

/// Write `contents` into `dir`, creating the directory if needed.
pub fn save(dir: &Path, vendor: &str, kind: TransactionKind, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(file_name(vendor, kind));
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
