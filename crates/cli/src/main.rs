use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use trustplist_engine as tp;

/// Extract per-certificate trust records from a directory of trust-store exports.
#[derive(Parser, Debug)]
#[command(name = "trustplist", version)]
struct Args {
    /// Directory holding the exported plist documents
    #[arg(long, short = 'd', default_value = ".")]
    directory: PathBuf,

    /// Print one JSON report per document instead of text
    #[arg(long)]
    json: bool,

    /// Record unparsable modDate values as issues instead of failing the document
    #[arg(long)]
    lenient_mod_date: bool,

    /// Keep the RDNs decoded before a DER fault in the issuer name
    #[arg(long)]
    keep_partial_issuer: bool,
}

impl Args {
    fn extract_config(&self) -> tp::ExtractConfig {
        let mut cfg = tp::ExtractConfig::secure_default();
        if self.lenient_mod_date {
            cfg.mod_date_policy = tp::ModDatePolicy::Lenient;
        }
        cfg.keep_partial_issuer = self.keep_partial_issuer;
        cfg
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let cfg = args.extract_config();
    cfg.validate()?;

    let documents = list_documents(&args.directory)?;
    info!(directory = %args.directory.display(), documents = documents.len(), "scanning trust-store exports");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0usize;
    for path in &documents {
        if let Err(e) = process_document(path, &cfg, args.json, &mut out) {
            error!(path = %path.display(), "{e:#}");
            failed += 1;
        }
    }
    out.flush()?;

    if failed > 0 {
        error!(failed, total = documents.len(), "some documents could not be extracted");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Regular files directly inside `dir`, sorted by file name.
fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

fn process_document(path: &Path, cfg: &tp::ExtractConfig, json: bool, out: &mut impl Write) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let source_id = path.display().to_string();
    let report = tp::extract_trust_store_report(&bytes, &source_id, cfg)?;
    if json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        write_text(&report, out)?;
    }
    Ok(())
}

fn write_text(report: &tp::ExtractionReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "# {} ({} records)", report.source_id, report.records.len())?;
    for record in &report.records {
        writeln!(out, "{}", record.fingerprint)?;
        if let Some(issuer) = &record.issuer {
            writeln!(out, "  issuer:   {issuer}")?;
        }
        if let Some(date) = &record.mod_date {
            writeln!(out, "  modified: {}", date.format("%Y-%m-%dT%H:%M:%SZ"))?;
        }
        if let Some(serial) = &record.serial_number {
            writeln!(out, "  serial:   {serial}")?;
        }
        for (name, value) in &record.trust_settings {
            writeln!(out, "  {name} = {value}")?;
        }
    }
    for issue in &report.issues {
        writeln!(
            out,
            "  ! {} {}: {}",
            issue.fingerprint.as_deref().unwrap_or("-"),
            issue.field,
            issue.message
        )?;
    }
    Ok(())
}
