//! # Doc Checker CLI (`doc-checker`)
//!
//! ## Usage
//!
//! ```bash
//! doc-checker --config ./config/doc-checker.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `doc-checker analyze <FILES>...` | Analyze 2-3 documents for contradictions |
//! | `doc-checker demo` | Run the flow on the built-in sample documents |
//! | `doc-checker reports list` | List saved reports, newest first |
//! | `doc-checker reports show <ID>` | Print one saved report |
//! | `doc-checker alerts` | Show the pathway alert feed |
//!
//! ## Examples
//!
//! ```bash
//! # Analyze two documents and save one report
//! doc-checker analyze handbook.docx rules.txt --reports 1
//!
//! # Machine-readable result, JSON events on stderr
//! doc-checker --progress json analyze a.pdf b.pdf --json
//!
//! # Export a report as Markdown
//! doc-checker reports show 1726740000000 --format markdown > report.md
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use doc_checker::commands::{self, ReportFormat};
use doc_checker::config;
use doc_checker::observer::ObserverMode;

/// Doc Checker: find contradictions between policy documents.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist, built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "doc-checker",
    about = "Doc Checker: find contradictions between policy documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/doc-checker.toml")]
    config: PathBuf,

    /// Lifecycle event output on stderr. Defaults to `human` on a TTY,
    /// `off` otherwise.
    #[arg(long, global = true, value_enum)]
    progress: Option<ObserverMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze documents for contradictions.
    ///
    /// Accepts pdf, docx, and txt files. At least two are required and at
    /// most three fit in one batch.
    Analyze {
        /// Documents to analyze.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of reports to generate from the result.
        #[arg(long, default_value_t = 0)]
        reports: u32,

        /// Print the result as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Run the flow on three built-in sample documents with the mock source.
    Demo {
        /// Number of reports to generate from the result.
        #[arg(long, default_value_t = 0)]
        reports: u32,
    },

    /// Inspect saved reports.
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },

    /// Show recent changes detected in monitored policy sources.
    Alerts,
}

#[derive(Subcommand)]
enum ReportsAction {
    /// List saved reports, newest first.
    List,
    /// Print one report.
    Show {
        /// Report id (as shown by `reports list`).
        id: u64,

        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("doc_checker=info,doc_checker_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Alerts = cli.command {
        commands::run_alerts();
        return Ok(());
    }

    let cfg = config::load_or_default(&cli.config)?;
    let mode = cli.progress.unwrap_or_else(ObserverMode::default_for_tty);

    match cli.command {
        Commands::Analyze {
            files,
            reports,
            json,
        } => {
            commands::run_analyze(&cfg, &files, reports, json, mode).await?;
        }
        Commands::Demo { reports } => {
            commands::run_demo(&cfg, reports, mode).await?;
        }
        Commands::Reports { action } => match action {
            ReportsAction::List => commands::run_reports_list(&cfg).await?,
            ReportsAction::Show { id, format } => {
                commands::run_reports_show(&cfg, id, format).await?
            }
        },
        Commands::Alerts => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
