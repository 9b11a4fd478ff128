use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventscope::cli::output::Output;
use eventscope::config::OutputFormat;

/// Parse output format from string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "eventscope")]
#[command(
    version,
    about = "Discover event producers and generate AsyncAPI specifications"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a local repository checkout for event producers
    Scan {
        #[arg(help = "Path to the repository to scan")]
        path: PathBuf,
        #[arg(long, short, help = "Output directory for the catalog")]
        output: Option<PathBuf>,
        #[arg(long, value_parser = parse_output_format, help = "Spec format: yaml, json, both")]
        format: Option<OutputFormat>,
        #[arg(long, help = "Service name for the generated document")]
        service: Option<String>,
        #[arg(long, help = "Only discover producers, don't generate documents")]
        discover_only: bool,
    },

    /// Scan repositories through the configured Sourcegraph instance
    Search {
        #[arg(long, short, help = "Specific repository to scan")]
        repository: Option<String>,
        #[arg(long, short, help = "Output directory for the catalog")]
        output: Option<PathBuf>,
    },

    /// Inspect the generated catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List specifications in the catalog
    List {
        #[arg(long, short, help = "Catalog directory")]
        output: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Write a default project configuration file
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31meventscope encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("{}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Scan {
            path,
            output,
            format,
            service,
            discover_only,
        } => {
            use eventscope::cli::commands::scan::{self, ScanOptions};

            let rt = Runtime::new()?;
            rt.block_on(scan::run(ScanOptions {
                path,
                output,
                format,
                service,
                discover_only,
            }))?;
        }
        Commands::Search { repository, output } => {
            let rt = Runtime::new()?;
            rt.block_on(eventscope::cli::commands::search::run(repository, output))?;
        }
        Commands::Catalog { action } => match action {
            CatalogAction::List { output, format } => {
                eventscope::cli::commands::catalog::list(output, &format)?;
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                eventscope::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                eventscope::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                eventscope::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
