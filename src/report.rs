// Plain-text rendering of upload outcomes. Colors are applied by the
// caller; everything here is pure so it can be asserted on directly.

use crate::response::{Transaction, TransactionKind, UploadResult, VendorSummary};

const HEADERS: [&str; 3] = ["Date", "Amount", "Description"];

/// Message shown for a failed attempt.
pub fn error_line(message: &str) -> String {
    format!("Error: {message}")
}

/// Lines describing a successful result, top to bottom.
pub fn render(result: &UploadResult) -> Vec<String> {
    match result {
        UploadResult::SingleMonth { month, rows_sent } => vec![format!(
            "Upload successful for month: {month}. Rows sent: {rows_sent}."
        )],
        UploadResult::MultiMonth(months) => {
            let mut lines = vec!["Upload successful.".to_string()];
            lines.extend(
                months
                    .iter()
                    .map(|m| format!("{}: {} rows", m.month, m.rows_sent)),
            );
            lines
        }
        UploadResult::Success => vec!["Upload successful.".to_string()],
        UploadResult::Segregated(vendors) => render_summary(vendors),
    }
}

fn render_summary(vendors: &[VendorSummary]) -> Vec<String> {
    let mut lines = vec!["Extracted Transaction Summary".to_string()];
    if vendors.is_empty() {
        lines.push("No vendors found.".to_string());
    }
    for vendor in vendors {
        lines.push(String::new());
        lines.push(format!("== {} ==", vendor.vendor));
        for kind in TransactionKind::ALL {
            lines.push(format!("-- {} --", kind.title()));
            let txns = vendor.transactions(kind);
            if txns.is_empty() {
                lines.push(format!("No {kind} transactions."));
            } else {
                lines.extend(table(txns));
            }
        }
    }
    lines
}

/// Amounts print like the server sent them: `100`, `12.5`.
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

fn table(txns: &[Transaction]) -> Vec<String> {
    let rows: Vec<[String; 3]> = txns
        .iter()
        .map(|t| {
            [
                t.date.clone(),
                format_amount(t.amount),
                t.desc.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let fmt_row = |cells: [&str; 3]| {
        format!(
            "| {:<w0$} | {:>w1$} | {:<w2$} |",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        )
    };
    let rule = format!(
        "+{}+{}+{}+",
        "-".repeat(widths[0] + 2),
        "-".repeat(widths[1] + 2),
        "-".repeat(widths[2] + 2)
    );

    let mut out = vec![rule.clone(), fmt_row(HEADERS), rule.clone()];
    for row in &rows {
        out.push(fmt_row([&row[0], &row[1], &row[2]]));
    }
    out.push(rule);
    out
}
