mod commands;
mod config;
mod sources;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "showcal-cli")]
#[command(about = "Sync Green Light Cinema showtimes to a Google Calendar")]
struct Cli {
    /// The ID of the calendar to use. Falls back to the CALENDAR_ID
    /// environment variable (a .env file is honored).
    #[arg(long, global = true)]
    calendar_id: Option<String>,

    /// Path to the service account credentials JSON file. Falls back to the
    /// CREDENTIALS_FILE environment variable; CREDENTIALS_JSON may carry the
    /// file contents directly.
    #[arg(long, global = true)]
    credentials_file: Option<std::path::PathBuf>,

    /// Compute decisions but make no external calls.
    #[arg(long, global = true)]
    dry_run: bool,

    /// (Testing) Path to a JSON file containing calendar events.
    #[arg(long, global = true)]
    calendar_file: Option<std::path::PathBuf>,

    /// (Testing) Path to a JSON file containing extracted showtimes.
    #[arg(long, global = true)]
    showtimes_file: Option<std::path::PathBuf>,

    /// (Testing) Path to an HTML file containing the showtimes page.
    #[arg(long, global = true)]
    showtimes_html_file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all calendars the service account has access to
    ListCalendars,
    /// Create a new calendar and print its ID
    CreateCalendar {
        /// Calendar title
        name: Option<String>,
    },
    /// Delete the configured calendar
    DeleteCalendar,
    /// Print the ACL of the calendar
    Acl,
    /// Add a user to the calendar ACL with the writer role
    AddWriter { email: String },
    /// Remove a user from the calendar ACL
    RemoveWriter { email: String },
    /// Add an owner to the calendar ACL
    AddOwner { email: String },
    /// Remove an owner from the calendar ACL
    RemoveOwner { email: String },
    /// Read and print existing calendar events
    ReadCalendar,
    /// Read and print current showtimes
    ReadShowtimes,
    /// Delete calendar events with the given IDs
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Diff calendar events with current showtimes and update accordingly
    Update,
    /// Clear all existing calendar events
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = config::AppConfig::resolve(&cli);

    if cfg.dry_run {
        eprintln!("=== DRY RUN ENABLED ===");
    }

    match cli.command {
        Commands::ListCalendars => commands::calendars::list(&cfg).await,
        Commands::CreateCalendar { name } => commands::calendars::create(&cfg, name).await,
        Commands::DeleteCalendar => commands::calendars::delete(&cfg).await,
        Commands::Acl => commands::calendars::print_acl(&cfg).await,
        Commands::AddWriter { email } => commands::calendars::add_writer(&cfg, &email).await,
        Commands::RemoveWriter { email } => commands::calendars::remove_writer(&cfg, &email).await,
        Commands::AddOwner { email } => commands::calendars::add_owner(&cfg, &email).await,
        Commands::RemoveOwner { email } => commands::calendars::remove_owner(&cfg, &email).await,
        Commands::ReadCalendar => commands::events::read_calendar(&cfg).await,
        Commands::ReadShowtimes => commands::events::read_showtimes(&cfg).await,
        Commands::Delete { ids } => commands::events::delete(&cfg, &ids).await,
        Commands::Update => commands::update::run(&cfg).await,
        Commands::Clear => commands::events::clear(&cfg).await,
    }
}
