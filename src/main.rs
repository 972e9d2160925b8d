// Entrypoint for the statement uploader.
// - With file arguments: one upload, print the report, optional CSV export.
// - Without: hand a session to the interactive menu in `ui`.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use statement_uploader::api::ApiClient;
use statement_uploader::config::Config;
use statement_uploader::{ui, TransactionKind, UploadSession, Variant};

#[derive(Parser, Debug)]
#[command(name = "statement-uploader", version, about = "Upload PDF bank statements and show the extracted results")]
struct Cli {
    /// Which upload flow to use
    #[arg(long, value_enum, default_value_t = Variant::Summary)]
    variant: Variant,

    /// Base URL of the statement service (overrides STATEMENT_API_URL)
    #[arg(long)]
    url: Option<String>,

    /// Full endpoint URL, used as-is
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory for CSV exports
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Export one list after upload, as VENDOR:credit or VENDOR:debit
    #[arg(long = "export", value_name = "VENDOR:KIND")]
    exports: Vec<ExportTarget>,

    /// Export every non-empty vendor list after upload
    #[arg(long)]
    export_all: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// PDF statements to upload; starts the interactive menu when omitted
    files: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
struct ExportTarget {
    vendor: String,
    kind: TransactionKind,
}

impl FromStr for ExportTarget {
    type Err = String;

    // Split on the last ':' so vendor names may contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (vendor, kind) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected VENDOR:KIND, got '{s}'"))?;
        if vendor.is_empty() {
            return Err("vendor name is empty".to_string());
        }
        Ok(ExportTarget {
            vendor: vendor.to_string(),
            kind: kind.parse()?,
        })
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,statement_uploader=debug"
    } else {
        "warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_env()?
        .with_api_url(cli.url)
        .with_endpoint(cli.endpoint)
        .with_download_dir(cli.out_dir);
    debug!(endpoint = %config.endpoint_for(cli.variant), "configuration resolved");
    let download_dir = config.download_dir();

    let api = ApiClient::new(config)?;
    let mut session = UploadSession::new(api, cli.variant);

    if cli.files.is_empty() {
        if !cli.exports.is_empty() || cli.export_all {
            bail!("--export/--export-all need statement files on the command line");
        }
        return ui::main_menu(&mut session, &download_dir);
    }

    session.select_files(cli.files);
    ui::upload_or_bail(&mut session)?;

    let mut targets: Vec<(String, TransactionKind)> = cli
        .exports
        .into_iter()
        .map(|t| (t.vendor, t.kind))
        .collect();
    if cli.export_all {
        targets.extend(session.exportable());
    }
    for (vendor, kind) in &targets {
        ui::save_and_report(&session, vendor, *kind, &download_dir)?;
    }

    Ok(())
}
