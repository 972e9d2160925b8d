// UI layer: interactive menu built on `dialoguer`, plus the colored
// printing shared with the one-shot command in `main.rs`.

use anyhow::{bail, Result};
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::report;
use crate::response::TransactionKind;
use crate::session::{UploadSession, UploadStatus, Uploader};

/// Main interactive menu. Runs until the user chooses "Exit".
pub fn main_menu<U: Uploader>(session: &mut UploadSession<U>, download_dir: &Path) -> Result<()> {
    loop {
        let upload_label = if session.variant().accepts_multiple() {
            "Select PDF files"
        } else {
            "Select PDF file"
        };
        let items = vec![upload_label, "Upload & process", "Download CSV", "Exit"];
        let selection = Select::new()
            .with_prompt(format!("Statement uploader ({})", session.variant()))
            .items(&items)
            .default(0)
            .interact()?;
        match selection {
            0 => {
                let paths = pick_files(session.variant().accepts_multiple())?;
                session.select_files(paths);
                for file in session.selection().files() {
                    println!("  {}", file.display());
                }
            }
            1 => {
                run_upload(session)?;
            }
            2 => handle_download(session, download_dir)?,
            3 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Run one upload behind a spinner and print the outcome.
pub fn run_upload<U: Uploader>(session: &mut UploadSession<U>) -> Result<bool> {
    if session.selection().is_empty() {
        print_warning("Please select a PDF file first!");
        return Ok(false);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Processing...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = session.upload();
    spinner.finish_and_clear();

    print_status(session.status());
    Ok(outcome.is_ok())
}

/// One-shot variant of `run_upload`: a failed attempt becomes an error.
pub fn upload_or_bail<U: Uploader>(session: &mut UploadSession<U>) -> Result<()> {
    if !run_upload(session)? {
        bail!("statement upload did not succeed");
    }
    Ok(())
}

/// Print the current outcome: green report, red error.
pub fn print_status(status: &UploadStatus) {
    match status {
        UploadStatus::Succeeded(result) => {
            for line in report::render(result) {
                println!("{}", line.green());
            }
        }
        UploadStatus::Failed(message) => {
            println!("{}", report::error_line(message).red());
        }
        UploadStatus::Idle | UploadStatus::Loading => {}
    }
}

pub fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

/// Native file picker filtered to PDFs; falls back to a typed path when
/// the dialog is dismissed or unavailable.
fn pick_files(multiple: bool) -> Result<Vec<PathBuf>> {
    let dialog = rfd::FileDialog::new().add_filter("PDF", &["pdf"]);
    let picked = if multiple {
        dialog.pick_files().unwrap_or_default()
    } else {
        dialog.pick_file().into_iter().collect()
    };
    if !picked.is_empty() {
        return Ok(picked);
    }

    let prompt = if multiple {
        "PDF file paths (comma separated)"
    } else {
        "PDF file path"
    };
    let typed: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(typed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Let the user pick a vendor list from the loaded summary and save it.
fn handle_download<U: Uploader>(session: &UploadSession<U>, download_dir: &Path) -> Result<()> {
    let choices = session.exportable();
    if choices.is_empty() {
        print_warning("Nothing to download: upload a statement summary first.");
        return Ok(());
    }

    let labels: Vec<String> = choices
        .iter()
        .map(|(vendor, kind)| format!("{vendor}: download {kind} CSV"))
        .collect();
    let idx = Select::new()
        .with_prompt("Which list?")
        .items(&labels)
        .default(0)
        .interact()?;
    let (vendor, kind) = &choices[idx];
    save_and_report(session, vendor, *kind, download_dir)
}

/// Save one CSV and tell the user where it went.
pub fn save_and_report<U: Uploader>(
    session: &UploadSession<U>,
    vendor: &str,
    kind: TransactionKind,
    dir: &Path,
) -> Result<()> {
    match session.save_csv(vendor, kind, dir)? {
        Some(path) => println!("Saved {}", path.display()),
        None => print_warning(&format!("No {kind} transactions for {vendor}.")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::response::{interpret, UploadResult};
    use crate::selection::{UploadSelection, Variant};

    struct Fixed(&'static str);

    impl Uploader for Fixed {
        fn upload(
            &self,
            variant: Variant,
            _selection: &UploadSelection,
        ) -> Result<UploadResult, UploadError> {
            interpret(200, None, self.0, variant)
        }
    }

    #[test]
    fn failed_upload_is_an_error() {
        let mut session = UploadSession::new(Fixed(r#"{"error": "unreadable pdf"}"#), Variant::Monthly);
        session.select_files(vec![PathBuf::from("s.pdf")]);
        assert!(upload_or_bail(&mut session).is_err());
    }

    #[test]
    fn empty_selection_is_an_error() {
        let mut session = UploadSession::new(Fixed("{}"), Variant::Summary);
        assert!(upload_or_bail(&mut session).is_err());
    }

    #[test]
    fn successful_upload_is_ok() {
        let mut session =
            UploadSession::new(Fixed(r#"{"month": "2024-03", "rows_sent": 42}"#), Variant::Monthly);
        session.select_files(vec![PathBuf::from("s.pdf")]);
        assert!(upload_or_bail(&mut session).is_ok());
    }
}
