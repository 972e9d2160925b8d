// Response contract of the statement endpoint.
//
// The server answers every upload with a JSON object. An `error` field at
// any status is a failure; otherwise the shape depends on what was uploaded
// and is recognised by field presence, in this order:
//
//   monthly_results  >  month + rows_sent  >  bare success  >  vendor summary
//
// The bare success only applies to the message-rendering variants. The
// summary variant reads entries shaped like `{credit, debit}` as vendors and
// falls back to the bare success when there are none. An error-free body on
// a success status is never a failure.

use crate::error::UploadError;
use crate::selection::Variant;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// One transaction line as extracted by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Credit, TransactionKind::Debit];

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }

    /// Capitalized label used as a section heading.
    pub fn title(self) -> &'static str {
        match self {
            TransactionKind::Credit => "Credit",
            TransactionKind::Debit => "Debit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            other => Err(format!("unknown transaction type '{other}' (expected credit or debit)")),
        }
    }
}

/// Credit and debit lines of one vendor, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSummary {
    pub vendor: String,
    pub credit: Vec<Transaction>,
    pub debit: Vec<Transaction>,
}

impl VendorSummary {
    pub fn transactions(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Credit => &self.credit,
            TransactionKind::Debit => &self.debit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRows {
    pub month: String,
    pub rows_sent: u64,
}

/// A successfully interpreted response.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadResult {
    Segregated(Vec<VendorSummary>),
    SingleMonth { month: String, rows_sent: u64 },
    MultiMonth(Vec<MonthRows>),
    Success,
}

impl UploadResult {
    pub fn vendor(&self, name: &str) -> Option<&VendorSummary> {
        match self {
            UploadResult::Segregated(vendors) => vendors.iter().find(|v| v.vendor == name),
            _ => None,
        }
    }

    pub fn vendors(&self) -> &[VendorSummary] {
        match self {
            UploadResult::Segregated(vendors) => vendors,
            _ => &[],
        }
    }
}

#[derive(Deserialize)]
struct VendorLists {
    #[serde(default)]
    credit: Vec<Transaction>,
    #[serde(default)]
    debit: Vec<Transaction>,
}

/// Turn a raw HTTP answer into a result or a failure.
///
/// `reason` is the status reason phrase, used as the message when a failed
/// response carries no usable `error` field.
pub fn interpret(
    status: u16,
    reason: Option<&str>,
    body: &str,
    variant: Variant,
) -> Result<UploadResult, UploadError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| error_field(&v))
            .unwrap_or_else(|| match reason {
                Some(r) if !r.is_empty() => r.to_string(),
                _ => format!("HTTP {status}"),
            });
        return Err(UploadError::Status { status, message });
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| UploadError::InvalidResponse(e.to_string()))?;
    if let Some(message) = error_field(&value) {
        return Err(UploadError::Rejected(message));
    }
    Ok(classify(value, variant))
}

/// Pick the result shape of an error-free body.
pub fn classify(value: Value, variant: Variant) -> UploadResult {
    let Value::Object(mut map) = value else {
        return UploadResult::Success;
    };

    if let Some(months) = map.remove("monthly_results").and_then(as_object) {
        return UploadResult::MultiMonth(parse_monthly(months));
    }

    let month = map.get("month").filter(|m| !m.is_null());
    let rows_sent = map.get("rows_sent").and_then(as_count);
    if let (Some(month), Some(rows_sent)) = (month, rows_sent) {
        return UploadResult::SingleMonth {
            month: display_value(month),
            rows_sent,
        };
    }

    if !variant.renders_tables() {
        return UploadResult::Success;
    }

    let total = map.len();
    let vendors: Vec<VendorSummary> = map
        .into_iter()
        .filter_map(|(vendor, lists)| {
            let lists = parse_vendor(&vendor, lists)?;
            Some(VendorSummary {
                vendor,
                credit: lists.credit,
                debit: lists.debit,
            })
        })
        .collect();
    if vendors.is_empty() && total > 0 {
        return UploadResult::Success;
    }
    UploadResult::Segregated(vendors)
}

fn as_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Non-negative whole number, also when sent as `42.0`.
fn as_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        let f = value.as_f64()?;
        (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then(|| f as u64)
    })
}

// Entries without a usable count are left out of the listing.
fn parse_monthly(months: Map<String, Value>) -> Vec<MonthRows> {
    months
        .into_iter()
        .filter_map(|(month, entry)| {
            let Some(rows_sent) = entry.get("rows_sent").and_then(as_count) else {
                warn!(%month, "monthly result without a row count");
                return None;
            };
            Some(MonthRows { month, rows_sent })
        })
        .collect()
}

fn parse_vendor(vendor: &str, lists: Value) -> Option<VendorLists> {
    let map = lists.as_object()?;
    if !map.contains_key("credit") && !map.contains_key("debit") {
        return None;
    }
    match serde_json::from_value(lists) {
        Ok(lists) => Some(lists),
        Err(e) => {
            warn!(%vendor, error = %e, "skipping malformed vendor entry");
            None
        }
    }
}

// `null`, `false` and "" do not count as an error.
fn error_field(value: &Value) -> Option<String> {
    let map: &Map<String, Value> = value.as_object()?;
    match map.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(display_value(other)),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
