use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tallybook::cli::{
    handle_budgets_command, handle_export_command, handle_stats_command, handle_themes_command,
    parse_user, BudgetsArgs, ExportArgs, StatsArgs,
};
use tallybook::config::{paths::TallyPaths, settings::Settings};
use tallybook::storage::Storage;

/// Environment variable overriding the configured log filter
const LOG_ENV: &str = "TALLYBOOK_LOG";

#[derive(Parser)]
#[command(
    name = "tallybook",
    version,
    about = "Personal finance statistics and report export",
    long_about = "Tallybook aggregates income and expense transactions into category \
                  breakdowns, monthly series and budget comparisons, and exports them \
                  as CSV, PDF or JSON reports."
)]
struct Cli {
    /// User whose records are read
    #[arg(short, long, global = true, env = "TALLYBOOK_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category breakdown, monthly series and current-month summary
    Stats(StatsArgs),

    /// Budget vs. actual spending for a month
    Budgets(BudgetsArgs),

    /// Export transactions or a financial report to a file
    Export(ExportArgs),

    /// List the report themes
    Themes {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration and paths
    Config,
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("tallybook={}", settings.log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = TallyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings);

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let require_user = || -> Result<_> {
        let raw = cli
            .user
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("--user (or TALLYBOOK_USER) is required"))?;
        Ok(parse_user(raw)?)
    };

    match cli.command {
        Some(Commands::Stats(args)) => {
            handle_stats_command(&storage, &settings, require_user()?, args)?;
        }
        Some(Commands::Budgets(args)) => {
            handle_budgets_command(&storage, &settings, require_user()?, args)?;
        }
        Some(Commands::Export(args)) => {
            handle_export_command(&storage, &settings, require_user()?, args)?;
        }
        Some(Commands::Themes { json }) => {
            handle_themes_command(json)?;
        }
        Some(Commands::Config) => {
            println!("Tallybook Configuration");
            println!("=======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  First day of week:  {}", settings.first_day_of_week);
            println!("  Default theme:      {}", settings.default_theme);
            println!("  Default paper size: {}", settings.default_paper_size);
            println!("  Max export rows:    {}", settings.max_export_rows);
            println!("  Log level:          {}", settings.log_level);
        }
        None => {
            println!("Tallybook - personal finance statistics and reports");
            println!();
            println!("Run 'tallybook --help' for usage information.");
        }
    }

    Ok(())
}
