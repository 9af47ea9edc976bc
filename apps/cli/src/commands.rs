//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use bookgen_core::pipeline::{BuildConfig, build_book, check_summary, outline_book};
use bookgen_shared::{AppConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// bookgen: generate a book's table of contents from its directory layout.
#[derive(Parser)]
#[command(
    name = "bookgen",
    version,
    about = "Generate an mdBook SUMMARY.md from the documents on disk, then build the book.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Book directory (holds bookgen.toml and the content root).
    #[arg(long, default_value = ".", global = true, env = "BOOKGEN_BOOK_DIR")]
    pub book_dir: PathBuf,

    /// Config file to use instead of <book-dir>/bookgen.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `build` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Regenerate SUMMARY.md and run the renderer.
    Build {
        /// Only write SUMMARY.md, do not run the renderer.
        #[arg(long)]
        no_render: bool,
    },

    /// Print the generated summary to stdout without writing anything.
    Print,

    /// Exit with an error if SUMMARY.md is not what `build` would write.
    Check,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write bookgen.toml with the defaults into the book directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = format!("bookgen={level},bookgen_core={level},bookgen_shared={level}");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `bookgen print` output stays clean.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Command::Build { no_render: false });

    match command {
        Command::Build { no_render } => {
            let config = resolve_config(&cli.book_dir, cli.config.as_deref())?;
            cmd_build(&config, !no_render)
        }
        Command::Print => {
            let config = resolve_config(&cli.book_dir, cli.config.as_deref())?;
            cmd_print(&config)
        }
        Command::Check => {
            let config = resolve_config(&cli.book_dir, cli.config.as_deref())?;
            cmd_check(&config)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&cli.book_dir),
            ConfigAction::Show => cmd_config_show(&cli.book_dir, cli.config.as_deref()),
        },
    }
}

fn load_app_config(book_dir: &Path, config_path: Option<&Path>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config(book_dir)?,
    };
    Ok(config)
}

/// Load and validate the config once; everything downstream receives it by reference.
fn resolve_config(book_dir: &Path, config_path: Option<&Path>) -> Result<BuildConfig> {
    let app = load_app_config(book_dir, config_path)?;
    let config = BuildConfig::new(book_dir, &app);
    config.outline.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(config: &BuildConfig, render: bool) -> Result<()> {
    info!(book_dir = %config.book_dir.display(), render, "building book");

    let report = build_book(config, render)?;

    println!();
    println!("  Summary written: {}", report.summary_path.display());
    for (label, count) in &report.sections {
        println!("  {label}: {count}");
    }
    println!("  Entries: {}", report.entry_count());
    println!(
        "  Rendered: {}",
        if report.rendered { "yes" } else { "no" }
    );
    println!("  Time:    {:.2}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_print(config: &BuildConfig) -> Result<()> {
    let outline = outline_book(config)?;
    print!("{}", outline.render(&config.outline.indent));
    Ok(())
}

fn cmd_check(config: &BuildConfig) -> Result<()> {
    check_summary(config)?;
    println!("{} is up to date", config.summary_path().display());
    Ok(())
}

fn cmd_config_init(book_dir: &Path) -> Result<()> {
    let path = init_config(book_dir)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(book_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_app_config(book_dir, config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
