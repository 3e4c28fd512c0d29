use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod commands;
mod ui;

#[derive(Parser)]
#[command(
    name = "xlfsync",
    version,
    about = "Keep XLIFF translation documents in sync with their source strings"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only log warnings and errors to the console
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile per-language .xlf documents with freshly extracted strings
    Sync {
        /// JSON array of {"id", "source", "note"?} produced by an extractor
        #[arg(long)]
        sources: PathBuf,
        /// Logical path of the source artifact, stored as `original`
        #[arg(long)]
        document_id: String,
        /// Directory holding the .xlf files
        #[arg(long)]
        dir: Option<PathBuf>,
        /// File name stem; defaults to the document id's file stem
        #[arg(long)]
        stem: Option<String>,
        /// Target languages (repeatable); defaults to `target_langs` from config
        #[arg(long = "lang")]
        langs: Vec<String>,
        /// Sort units by id after reconciling
        #[arg(long, default_value_t = false)]
        sort: bool,
        #[arg(long, default_value_t = false)]
        backup: bool,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Sort the units of a document by id
    Sort {
        #[arg(long)]
        xlf: PathBuf,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Report units that are not translated yet
    Check {
        #[arg(short, long)]
        root: PathBuf,
        /// Fail when any unit is untranslated
        #[arg(long, default_value_t = false)]
        strict: bool,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Print the id → target map of a document as JSON
    Translations {
        #[arg(long)]
        xlf: PathBuf,
    },

    /// Create an empty document for a target language
    New {
        #[arg(long)]
        xlf: PathBuf,
        #[arg(long)]
        lang: String,
        /// Defaults to `source_lang` from config, then `en`
        #[arg(long)]
        source_lang: Option<String>,
    },

    /// Dump JSON schemas of the machine-readable outputs
    Schema {
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!(event = "command_start", cmd = %cmd_name);

        let result = match self {
            Commands::Sync {
                sources,
                document_id,
                dir,
                stem,
                langs,
                sort,
                backup,
                dry_run,
                format,
            } => commands::sync::run_sync(commands::sync::SyncArgs {
                sources,
                document_id,
                dir,
                stem,
                langs,
                sort,
                backup,
                dry_run,
                format,
            }),
            Commands::Sort { xlf, dry_run } => commands::sort::run_sort(xlf, dry_run),
            Commands::Check {
                root,
                strict,
                format,
            } => commands::check::run_check(root, strict, format, use_color),
            Commands::Translations { xlf } => commands::translations::run_translations(xlf),
            Commands::New {
                xlf,
                lang,
                source_lang,
            } => commands::new::run_new(xlf, lang, source_lang),
            Commands::Schema { out_dir } => commands::schema::run_schema(out_dir),
        };

        match &result {
            Ok(_) => info!(event = "command_done", cmd = %cmd_name),
            Err(e) => error!(event = "command_failed", cmd = %cmd_name, error = ?e),
        }

        result
    }
}

fn init_tracing(quiet: bool) -> WorkerGuard {
    let log_dir = std::env::var_os("XLFSYNC_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = rolling::daily(log_dir, "xlfsync.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if quiet { "warn" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _guard = init_tracing(cli.quiet);

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
