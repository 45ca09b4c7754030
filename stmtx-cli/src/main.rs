use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stmtx_core::Layout;
use stmtx_ingest::ParseOutcome;

mod config;
mod convert;
mod inbox;
mod inbox_cmd;
mod preview;
mod state;

use convert::{ConvertOptions, NO_TRANSACTIONS, convert_documents, documents_from_paths, parse_document};
use inbox_cmd::{InboxCommand, run_inbox_command};

#[derive(Parser, Debug)]
#[command(
    name = "stmtx",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("STMTX_BUILD_SHA"), ")"),
    about = "Bank statement to CSV converter"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert statements to CSV (one file per statement)
    Convert {
        /// Statement PDFs, or .txt files with already extracted text
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Password for protected statements (prompted for when missing)
        #[arg(long)]
        password: Option<String>,

        /// Force a layout instead of detecting it (old|new)
        #[arg(long)]
        layout: Option<Layout>,

        /// Directory for CSV output (default: output.dir, else next to each statement)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print transactions as JSON instead of writing CSV files
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Page through the transactions of one statement
    Preview {
        file: PathBuf,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        layout: Option<Layout>,

        /// Page to show (clamped to the available pages)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Print the page as text instead of opening the interactive view
        #[arg(long, default_value_t = false)]
        plain: bool,
    },

    /// Statements staged for import from other applications
    Inbox {
        #[command(subcommand)]
        command: InboxCommand,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.stmtx/config.toml with defaults
    Init,

    /// Print the effective configuration
    Show,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stmtx=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            files,
            password,
            layout,
            out_dir,
            json,
        } => {
            let cfg = config::load_config()?;
            let documents = documents_from_paths(&files)?;
            let total = documents.len();
            let opts = ConvertOptions {
                password,
                layout,
                out_dir,
                json,
                interactive: !json,
            };

            let summary = convert_documents(&cfg, documents, &opts).await?;
            if summary.failed > 0 {
                bail!("{} of {} statements failed", summary.failed, total);
            }
        }

        Command::Preview {
            file,
            password,
            layout,
            page,
            plain,
        } => {
            let cfg = config::load_config()?;
            let pager = cfg.paginator()?;
            let document = documents_from_paths(std::slice::from_ref(&file))?
                .pop()
                .context("no document")?;
            let opts = ConvertOptions {
                password,
                layout,
                interactive: true,
                ..Default::default()
            };

            let Some(conversion) = parse_document(&cfg, document, &opts).await? else {
                bail!("password required to open {}", file.display());
            };
            match &conversion.outcome {
                ParseOutcome::NoTransactions => println!("{NO_TRANSACTIONS}"),
                ParseOutcome::Parsed {
                    layout,
                    transactions,
                } => {
                    if plain {
                        let page = pager.page(transactions, page);
                        print!("{}", preview::render_page(&page, *layout));
                    } else {
                        preview::run_preview(&conversion.document.name, transactions, *layout, pager)?;
                    }
                }
            }
        }

        Command::Inbox { command } => {
            let cfg = config::load_config()?;
            run_inbox_command(&cfg, command).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}
