//! Running statements through the pipeline and writing CSV output.
//!
//! Every document is its own pipeline on a `JoinSet`; nothing is shared between
//! them. A password-protected document fails with `PasswordRequired`, after which
//! the user is asked for a password and that document alone is retried.

use anyhow::{Context, Result, bail};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use stmtx_core::Layout;
use stmtx_export::{csv_file_name, write_csv};
use stmtx_ingest::{Conversion, Document, ExtractError, Extractor, ParseOutcome, process_document};

use crate::config::Config;

pub const NO_TRANSACTIONS: &str = "No transactions detected. The statement may use a different layout.";

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub password: Option<String>,
    pub layout: Option<Layout>,
    /// Overrides `output.dir`; next to each source document when neither is set
    pub out_dir: Option<PathBuf>,
    /// Print rows as JSON on stdout instead of writing CSV files
    pub json: bool,
    /// Ask for a password on stdin when a document needs one
    pub interactive: bool,
}

/// Per-run tallies, for the exit status and the closing summary line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub converted: usize,
    pub empty: usize,
    pub failed: usize,
}

async fn run_pipeline(
    command: String,
    document: Document,
    password: Option<String>,
    layout: Option<Layout>,
) -> Result<Conversion, ExtractError> {
    let extractor = Extractor::for_document(&document, &command);
    process_document(&extractor, document, password.as_deref(), layout).await
}

fn prompt_password(name: &str) -> Result<Option<String>> {
    print!("Password required to open {name} (empty to skip): ");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    let s = s.trim().to_string();
    Ok((!s.is_empty()).then_some(s))
}

/// Retry a locked document with passwords from stdin until it opens or the user gives up.
///
/// `Ok(None)` means the document stayed locked.
async fn unlock(cfg: &Config, document: Document, opts: &ConvertOptions) -> Result<Option<Conversion>> {
    if !opts.interactive {
        warn!(document = %document.name, "password required (pass --password)");
        return Ok(None);
    }
    loop {
        let Some(password) = prompt_password(&document.name)? else {
            return Ok(None);
        };
        let result = run_pipeline(
            cfg.extract.pdftotext_command.clone(),
            document.clone(),
            Some(password),
            opts.layout,
        )
        .await;
        match result {
            Ok(conversion) => return Ok(Some(conversion)),
            Err(ExtractError::PasswordRequired(_)) => println!("Incorrect password."),
            Err(e) => return Err(e).with_context(|| format!("Failed to parse {}", document.name)),
        }
    }
}

/// Parse a single document, asking for a password if it turns out to be locked.
pub async fn parse_document(
    cfg: &Config,
    document: Document,
    opts: &ConvertOptions,
) -> Result<Option<Conversion>> {
    let result = run_pipeline(
        cfg.extract.pdftotext_command.clone(),
        document.clone(),
        opts.password.clone(),
        opts.layout,
    )
    .await;
    match result {
        Ok(conversion) => Ok(Some(conversion)),
        Err(ExtractError::PasswordRequired(_)) => unlock(cfg, document, opts).await,
        Err(e) => Err(e).with_context(|| format!("Failed to parse {}", document.name)),
    }
}

/// Convert `documents` concurrently and report each outcome in input order.
pub async fn convert_documents(
    cfg: &Config,
    documents: Vec<Document>,
    opts: &ConvertOptions,
) -> Result<ConvertSummary> {
    let mut set = JoinSet::new();
    for (index, document) in documents.into_iter().enumerate() {
        let command = cfg.extract.pdftotext_command.clone();
        let password = opts.password.clone();
        let layout = opts.layout;
        set.spawn(async move {
            let result = run_pipeline(command, document.clone(), password, layout).await;
            (index, document, result)
        });
    }

    let mut summary = ConvertSummary::default();
    let mut results = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => {
                error!("statement pipeline panicked: {e}");
                summary.failed += 1;
            }
        }
    }
    results.sort_by_key(|(index, _, _)| *index);

    for (_, document, result) in results {
        let conversion = match result {
            Ok(conversion) => Some(conversion),
            Err(ExtractError::PasswordRequired(_)) => {
                match unlock(cfg, document.clone(), opts).await {
                    Ok(conversion) => conversion,
                    Err(e) => {
                        error!("{e:#}");
                        summary.failed += 1;
                        continue;
                    }
                }
            }
            Err(e) => {
                error!(document = %document.name, "Failed to parse: {e}");
                summary.failed += 1;
                continue;
            }
        };

        let Some(conversion) = conversion else {
            println!("{}: password required, skipped", document.name);
            summary.failed += 1;
            continue;
        };

        match report(cfg, &conversion, opts) {
            Ok(true) => summary.converted += 1,
            Ok(false) => summary.empty += 1,
            Err(e) => {
                error!(document = %document.name, "{e:#}");
                summary.failed += 1;
            }
        }
    }

    info!(
        converted = summary.converted,
        empty = summary.empty,
        failed = summary.failed,
        "conversion finished"
    );
    Ok(summary)
}

/// Print or write one conversion. Returns false when nothing was detected.
fn report(cfg: &Config, conversion: &Conversion, opts: &ConvertOptions) -> Result<bool> {
    let name = &conversion.document.name;
    let (layout, transactions) = match &conversion.outcome {
        ParseOutcome::NoTransactions => {
            println!("{name}: {NO_TRANSACTIONS}");
            return Ok(false);
        }
        ParseOutcome::Parsed {
            layout,
            transactions,
        } => (*layout, transactions),
    };

    if opts.json {
        let json = serde_json::to_string_pretty(transactions).context("serialize transactions")?;
        println!("{json}");
        return Ok(true);
    }

    let out_dir = output_dir(cfg, opts, &conversion.document.path);
    std::fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let out = out_dir.join(csv_file_name(name));
    write_csv(&out, transactions, layout)?;

    println!(
        "{name}: Parsed {} transactions using {} parser -> {}",
        transactions.len(),
        layout.as_str().to_uppercase(),
        out.display()
    );
    Ok(true)
}

fn output_dir(cfg: &Config, opts: &ConvertOptions, source: &Path) -> PathBuf {
    opts.out_dir
        .clone()
        .or_else(|| cfg.output.dir.clone())
        .or_else(|| source.parent().map(Path::to_path_buf))
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Documents from command-line paths; anything that is neither PDF nor text is rejected.
pub fn documents_from_paths(paths: &[PathBuf]) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for p in paths {
        if !p.exists() {
            bail!("file not found: {}", p.display());
        }
        let doc = Document::from_path(p);
        if !(doc.is_pdf() || doc.is_text()) {
            bail!("{}: expected a .pdf statement (or .txt extracted text)", p.display());
        }
        docs.push(doc);
    }
    Ok(docs)
}
