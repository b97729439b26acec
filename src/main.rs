use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use boardselector::widget::{self, OutputFormat};
use boardselector::{Config, VERSION, on_builder_inited};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, debug, error};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Board database and search widget generator for Zephyr documentation
#[derive(Parser, Debug)]
#[command(name = "boardselector", version, about)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose output")]
    verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Build the board database")]
    Build(BuildArgs),

    #[command(about = "Print the search widget")]
    Widget(WidgetArgs),

    #[command(about = "Expand the search directive in a page")]
    Page(PageArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    #[arg(short = 'c', long, value_name = "FILE", help = "Configuration file")]
    config: Option<PathBuf>,

    #[arg(short = 'r', long, value_name = "DIR", help = "Project root containing Kconfig")]
    root: Option<PathBuf>,

    #[arg(short = 'm', long = "module", value_name = "DIR", help = "Module directory (repeatable)")]
    modules: Vec<PathBuf>,

    #[arg(short = 'e', long = "ext-path", value_name = "DIR", help = "External Kconfig search root (repeatable)")]
    ext_paths: Vec<PathBuf>,

    #[arg(short = 'o', long, value_name = "DIR", help = "Output directory")]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct WidgetArgs {
    #[arg(short = 'f', long, value_enum, default_value = "html", help = "Output format")]
    format: FormatArg,
}

#[derive(Parser, Debug)]
struct PageArgs {
    #[arg(value_name = "FILE", help = "Page source")]
    file: PathBuf,

    #[arg(short = 'f', long, value_enum, default_value = "html", help = "Output format")]
    format: FormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FormatArg {
    Html,
    Latex,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Latex => OutputFormat::Latex,
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("boardselector v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let result = match args.command {
        Commands::Build(build_args) => handle_build(build_args),
        Commands::Widget(widget_args) => {
            print!("{}", widget::render(widget_args.format.into()));
            Ok(())
        }
        Commands::Page(page_args) => handle_page(page_args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn handle_build(args: BuildArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir().context("cannot read working directory")?)?,
    };
    // Asking for a build from the command line implies the database
    config.generate_db = true;
    if let Some(root) = args.root {
        config.project_root = root;
    }
    if !args.modules.is_empty() {
        config.module_dirs = args.modules;
    }
    if !args.ext_paths.is_empty() {
        config.ext_paths = args.ext_paths;
    }
    if let Some(out) = args.out {
        config.output_dir = out;
    }

    let outcome = on_builder_inited(&config)?.context("database generation is disabled")?;
    println!("{}", outcome.publication.database.display());
    Ok(())
}

fn handle_page(args: PageArgs) -> Result<()> {
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    if !widget::page_requests_widget(&source) {
        debug!("{} has no search directive", args.file.display());
    }
    print!("{}", widget::expand_page(&source, args.format.into()));
    Ok(())
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("BOARDSELECTOR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    let mut filter = EnvFilter::from_default_env();
    if env::var("RUST_LOG").is_err() {
        if let Ok(directive) = format!("boardselector={}", level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}
