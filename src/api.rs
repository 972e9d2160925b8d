// API client module: a small blocking HTTP client that posts statement
// PDFs to the statement service and interprets the JSON it answers with.
// One call, one request: no timeout, no retry.

use anyhow::Context;
use reqwest::blocking::{multipart, Client};
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::UploadError;
use crate::response::{interpret, UploadResult};
use crate::selection::{UploadSelection, Variant};
use crate::session::Uploader;

const PDF_MIME: &str = "application/pdf";

/// Holds a reqwest blocking client and the resolved configuration.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    /// Build a client for `config`. The request timeout is disabled: an
    /// upload runs until the server answers or the connection fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client, config })
    }

    /// POST every selected file as one multipart form and interpret the
    /// answer. An empty selection returns `NoSelection` without touching
    /// the network.
    pub fn upload(
        &self,
        variant: Variant,
        selection: &UploadSelection,
    ) -> Result<UploadResult, UploadError> {
        if selection.is_empty() {
            return Err(UploadError::NoSelection);
        }

        let url = self.config.endpoint_for(variant);
        let form = build_form(variant, selection)?;
        info!(%url, %variant, files = selection.len(), "uploading statements");

        let res = self.client.post(&url).multipart(form).send()?;
        let status = res.status();
        // A failed status may come with an unreadable body; the reason
        // phrase is used instead in that case.
        let body = match res.text() {
            Ok(body) => body,
            Err(_) if !status.is_success() => String::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        interpret(status.as_u16(), status.canonical_reason(), &body, variant)
    }
}

impl Uploader for ApiClient {
    fn upload(
        &self,
        variant: Variant,
        selection: &UploadSelection,
    ) -> Result<UploadResult, UploadError> {
        ApiClient::upload(self, variant, selection)
    }
}

/// One part per file under the variant's field name.
fn build_form(variant: Variant, selection: &UploadSelection) -> Result<multipart::Form, UploadError> {
    let mut form = multipart::Form::new();
    for path in selection.files() {
        form = form.part(variant.field_name(), file_part(path)?);
    }
    Ok(form)
}

fn file_part(path: &Path) -> Result<multipart::Part, UploadError> {
    let io_err = |source| UploadError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("statement.pdf")
        .to_string();

    let part = multipart::Part::reader_with_length(file, len)
        .file_name(file_name)
        .mime_str(PDF_MIME)?;
    Ok(part)
}
