// Library root
// -----------
// Upload bank-statement PDFs to the statement service and show what it
// extracted. The binary (`main.rs`) wires these modules into a one-shot
// command and an interactive menu.
//
// Module responsibilities:
// - `api`: blocking HTTP client that builds the multipart form and posts it.
// - `response`: the JSON response contract and its classification.
// - `session`: selection + last outcome, CSV export of loaded summaries.
// - `selection`: picked files and the upload variant (field name, path).
// - `report` / `export`: text rendering and CSV serialization.
// - `config`: endpoint and download directory resolution.
// - `ui`: terminal menu flows on top of `session`.
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod report;
pub mod response;
pub mod selection;
pub mod session;
pub mod ui;

pub use error::UploadError;
pub use response::{TransactionKind, UploadResult};
pub use selection::{UploadSelection, Variant};
pub use session::{UploadSession, UploadStatus, Uploader};
