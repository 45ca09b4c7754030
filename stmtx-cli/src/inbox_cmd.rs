use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;
use tracing::warn;

use crate::config::Config;
use crate::convert::{ConvertOptions, convert_documents};
use crate::inbox::Inbox;

#[derive(Subcommand, Debug)]
pub enum InboxCommand {
    /// Stage statements for a later import (non-PDF files are dropped)
    Stage {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the pending share, if any
    List,

    /// Convert every pending statement, then release the share
    Import {
        /// Password for protected statements
        #[arg(long)]
        password: Option<String>,

        /// Directory for CSV output (default: output.dir, else the current directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Drop the pending share without converting it
    Clear {
        /// Only clear if the pending share has this id
        #[arg(long)]
        id: Option<String>,
    },
}

pub async fn run_inbox_command(cfg: &Config, command: InboxCommand) -> Result<()> {
    let inbox = Inbox::open(cfg.inbox_dir()?);

    match command {
        InboxCommand::Stage { files } => {
            let share = inbox.stage(&files)?;
            println!(
                "Staged {} PDF{} as share {} in {}",
                share.files.len(),
                if share.files.len() == 1 { "" } else { "s" },
                share.id,
                inbox.dir().display()
            );
        }

        InboxCommand::List => match inbox.pending()? {
            None => println!("No shared PDF is pending."),
            Some(share) => {
                println!("Share {} (staged {})", share.id, share.created_at.to_rfc3339());
                for f in &share.files {
                    println!("- {} ({} bytes)", f.name, f.size);
                }
            }
        },

        InboxCommand::Import { password, out_dir } => {
            let Some(share) = inbox.pending()? else {
                println!("No shared PDF is pending. Convert a file directly with `stmtx convert`.");
                return Ok(());
            };

            let out_dir = match out_dir.or_else(|| cfg.output.dir.clone()) {
                Some(dir) => dir,
                None => std::env::current_dir().context("current directory")?,
            };
            let opts = ConvertOptions {
                password,
                out_dir: Some(out_dir),
                interactive: true,
                ..Default::default()
            };
            let documents = share.files.iter().map(|f| f.document()).collect();
            let summary = convert_documents(cfg, documents, &opts).await?;
            println!(
                "Imported {} PDF{} from share {}.",
                share.files.len(),
                if share.files.len() == 1 { "" } else { "s" },
                share.id
            );

            if let Err(e) = inbox.consume(Some(&share.id)) {
                warn!("shared cleanup failed: {e}");
            }
            if summary.failed > 0 {
                anyhow::bail!("{} of {} shared statements failed", summary.failed, share.files.len());
            }
        }

        InboxCommand::Clear { id } => {
            if inbox.consume(id.as_deref())? {
                println!("Cleared pending share.");
            } else {
                println!("No shared PDF is pending.");
            }
        }
    }

    Ok(())
}
