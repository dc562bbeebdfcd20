//! CLI command definitions, routing, and tracing setup.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use snippetlib_core::pipeline::{BuildResult, ProgressReporter, build_library};
use snippetlib_extractor::HttpFetcher;
use snippetlib_shared::{
    AppConfig, LibraryConfig, init_config, load_config, session_cookie,
};
use snippetlib_transform::TransformerRegistry;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// snippetlib: mirror a component site into a local snippet library.
#[derive(Parser)]
#[command(
    name = "snippetlib",
    version,
    about = "Mirror a component site into a local library of snippet files and a catalog.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
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
    /// Fetch component pages and write the library.
    Build(BuildArgs),

    /// List registered transformer names.
    Transformers,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Overrides for a single build; unset flags fall back to the config file.
#[derive(Args, Debug, Default)]
pub(crate) struct BuildArgs {
    /// Output directory for component files.
    #[arg(short, long)]
    pub out: Option<String>,

    /// Extraction mode: embedded-framework or source-comment.
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Transformers to apply, in order (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub transformers: Option<Vec<String>>,

    /// Process at most this many component pages.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Also write HTML index pages.
    #[arg(long)]
    pub index: bool,

    /// Root URL of the component site.
    #[arg(long)]
    pub root_url: Option<String>,

    /// Print the merged catalog as JSON when done.
    #[arg(long)]
    pub print_catalog: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
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

    let filter = match cli.verbose {
        0 => "snippetlib=info",
        1 => "snippetlib=debug",
        _ => "snippetlib=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

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
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build(args) => cmd_build(&args).await,
        Command::Transformers => cmd_transformers(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(args: &BuildArgs) -> Result<()> {
    let mut config = load_config()?;
    apply_overrides(&mut config, args);

    let library = LibraryConfig::try_from(&config)?;
    let cookie = session_cookie(&config);
    if cookie.is_none() {
        warn!(
            env = %config.site.session_cookie_env,
            "no session cookie set, protected pages may not render their code"
        );
    }

    let fetcher = HttpFetcher::new(library.root_url.clone(), cookie.as_deref())?;
    let registry = TransformerRegistry::with_builtins();

    info!(
        root_url = %library.root_url,
        output = %library.output_root.display(),
        mode = %library.mode,
        "building component library"
    );

    let reporter = CliProgress::new();
    let result = build_library(&library, &fetcher, &registry, &reporter).await?;

    println!();
    println!("  Library built!");
    println!("  Pages:      {}", result.pages_processed);
    println!("  Components: {}", result.components_written);
    if result.components_skipped > 0 {
        println!("  Skipped:    {}", result.components_skipped);
    }
    if library.build_index {
        println!("  Index:      {} pages", result.index_pages);
    }
    println!("  Path:       {}", library.output_root.display());
    println!("  Time:       {:.1}s", result.elapsed.as_secs_f64());
    if !result.errors.is_empty() {
        println!("  Failed:     {}", result.errors.len());
        for (url, message) in &result.errors {
            println!("    {url}: {message}");
        }
    }
    println!();

    if args.print_catalog {
        println!("{}", result.catalog.to_json_pretty()?);
    }

    if result.pages_processed == 0 && !result.errors.is_empty() {
        return Err(eyre!("every component page failed ({} errors)", result.errors.len()));
    }

    Ok(())
}

/// Fold command-line flags over the loaded config.
fn apply_overrides(config: &mut AppConfig, args: &BuildArgs) {
    if let Some(out) = &args.out {
        config.library.output_dir.clone_from(out);
    }
    if let Some(mode) = &args.mode {
        config.library.mode.clone_from(mode);
    }
    if let Some(transformers) = &args.transformers {
        config.library.transformers.clone_from(transformers);
    }
    if let Some(count) = args.count {
        config.library.max_pages = Some(count);
    }
    if args.index {
        config.library.build_index = true;
    }
    if let Some(root_url) = &args.root_url {
        config.site.root_url.clone_from(root_url);
    }
}

fn cmd_transformers() -> Result<()> {
    for name in TransformerRegistry::with_builtins().names() {
        println!("{name}");
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_started(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching [{current}/{total}] {url}"));
    }

    fn component_written(&self, url: &str) {
        self.spinner.set_message(format!("Wrote {url}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
