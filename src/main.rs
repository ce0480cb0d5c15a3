//! pdfcatalog CLI
//!
//! Interactive catalog view plus a one-shot search command.

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pdfcatalog::logging::{self, LogTarget};
use pdfcatalog::{Action, AppConfig, DataLocation, ViewState, DEFAULT_BASE_URL};
use std::path::PathBuf;
use std::time::Duration;

/// pdfcatalog - Search a CSV-described catalog of PDF documents
#[derive(Parser)]
#[command(name = "pdfcatalog")]
#[command(author = "pdfcatalog Contributors")]
#[command(version)]
#[command(about = "Searchable, paginated view over a PDF catalog", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SourceArgs {
    /// Server root serving the CSV files
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Read the CSV files from a local directory instead of HTTP
    #[arg(long, global = true, conflicts_with = "base_url")]
    dir: Option<PathBuf>,

    /// Path of the initial dataset
    #[arg(long, global = true, default_value = pdfcatalog::INITIAL_DATA_PATH)]
    initial_path: String,

    /// Path of the complete dataset
    #[arg(long, global = true, default_value = pdfcatalog::ALL_DATA_PATH)]
    all_path: String,

    /// Request timeout in seconds (default: wait forever)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log file for the interactive view
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog interactively (default)
    Browse,

    /// Load the catalog and print one page of matches
    Search {
        /// Search text (matches title or keywords, case-insensitive)
        #[arg(default_value = "", allow_hyphen_values = true)]
        query: String,

        /// Page to print (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl SourceArgs {
    fn to_config(&self) -> AppConfig {
        let location = match &self.dir {
            Some(dir) => DataLocation::Dir(dir.clone()),
            None => DataLocation::Http(self.base_url.clone()),
        };

        AppConfig {
            location,
            initial_path: self.initial_path.clone(),
            all_path: self.all_path.clone(),
            timeout: self.timeout.map(Duration::from_secs),
            log_file: self.log_file.clone(),
            ..Default::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = cli.source.to_config();
    let command = cli.command.unwrap_or(Commands::Browse);

    let (target, level) = match command {
        Commands::Browse => (
            LogTarget::File(config.log_path()),
            if cli.source.verbose { "debug" } else { "info" },
        ),
        Commands::Search { .. } => (
            LogTarget::Stderr,
            if cli.source.verbose { "debug" } else { "warn" },
        ),
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = match logging::init(&target, level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{} {}", style("Warning:").yellow().bold(), e);
            None
        }
    };

    let result = match command {
        Commands::Browse => pdfcatalog::tui::run(&config),
        Commands::Search { query, page, json } => cmd_search(&config, query, page, json),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Search command implementation
fn cmd_search(config: &AppConfig, query: String, page: usize, json: bool) -> pdfcatalog::Result<()> {
    let handle = config.loader()?.spawn()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("Loading catalog...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    // Results are applied in completion order, same as the interactive view
    let mut view = ViewState::default();
    while let Some(action) = handle.next_action() {
        view = view.reduce(action);
        if !view.loading {
            spinner.set_message("Loading all data...");
        }
    }
    spinner.finish_and_clear();

    let view = view
        .reduce(Action::SetQuery(query))
        .reduce(Action::SetPage(page));
    let current = view.page();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "query": view.query,
                "page": current.current_page,
                "max_page": current.max_page(),
                "total": current.total,
                "has_previous": current.has_previous(),
                "has_next": current.has_next(),
                "rows": current.rows,
            })
        );
        return Ok(());
    }

    let label = if view.query.is_empty() {
        "all documents".to_string()
    } else {
        format!("'{}'", view.query)
    };
    println!(
        "{} {} - {} matches, page {}/{}",
        style("→").cyan().bold(),
        style(label).yellow(),
        style(current.total).green(),
        current.current_page,
        current.max_page()
    );
    println!();

    for (i, record) in current.rows.iter().enumerate() {
        println!(
            "  {} {}",
            style(format!("{:3}.", current.start_index + i + 1)).dim(),
            style(&record.title).cyan()
        );
        if !record.path.is_empty() {
            println!("       {}", style(&record.path).dim());
        }
        if !record.update_at.is_empty() || !record.create_at.is_empty() {
            println!(
                "       {} {}  {} {}",
                style("updated").dim(),
                record.update_at,
                style("created").dim(),
                record.create_at
            );
        }
    }

    if current.has_next() {
        println!();
        println!(
            "  {} --page {}",
            style("Next page:").dim(),
            current.current_page + 1
        );
    }

    Ok(())
}
