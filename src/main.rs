mod app;
mod commands;
mod config;
mod domain;
mod error;
mod input;
mod logging;
mod notifications;
mod persistence;
mod reminders;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::{AppState, StatusKind};
use chrono::Local;
use clap::{Parser, Subcommand};
use commands::Session;
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{Confirmation, SortKey, Tracker};
use notifications::DesktopNotifier;
use persistence::{ensure_data_dir, init_local_data_dir, FileStore, PersistenceGateway};
use ratatui::{backend::CrosstermBackend, Terminal};
use reminders::ReminderQueue;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Track groceries as they run out and build your shopping list", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .pantry directory in the current directory
    Init,
    #[command(flatten)]
    Pantry(PantryCommand),
}

/// Subcommands that work on the stored collection
#[derive(Subcommand)]
enum PantryCommand {
    /// Add an item that should last the given number of days
    Add {
        name: String,
        #[arg(allow_hyphen_values = true)]
        days: String,
    },
    /// List current items
    List {
        /// Sort order. Defaults to the configured one.
        #[arg(short, long, value_enum)]
        sort: Option<SortKey>,
        /// Only show items whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Show the shopping list
    Shopping,
    /// Move an item to the shopping list (id or unique id prefix)
    Finish { id: String },
    /// Remove an item entirely (id or unique id prefix)
    Delete { id: String },
    /// Remove every item from the shopping list
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move items that have run out to the shopping list
    Sweep,
    /// Show or change your display name
    Name { name: Option<String> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => init(),
        Some(Commands::Pantry(command)) => run_command(command),
        None => run_tui(),
    }
}

fn init() -> Result<()> {
    let dir = init_local_data_dir()?;
    println!("Initialized pantry directory: {}", dir.display());
    println!();
    println!("Pantry will now use this local directory for storage.");
    println!("Run 'pantry' to start tracking groceries.");
    Ok(())
}

/// Resolve the data directory, then load config and start logging
fn open_data_dir() -> Result<(PathBuf, Config, PersistenceGateway)> {
    let dir = ensure_data_dir()?;
    let config = Config::load(&dir)?;
    logging::init(&dir, &config.log_level)?;
    let gateway = PersistenceGateway::new(FileStore::new(&dir));
    Ok((dir, config, gateway))
}

fn run_command(command: PantryCommand) -> Result<()> {
    let (_, config, gateway) = open_data_dir()?;
    let now = Local::now();
    let mut session = Session::open(gateway, config.reminder_settings(), config.use_emoji, now)?;
    let mut out = io::stdout().lock();

    match command {
        PantryCommand::Add { name, days } => commands::add(&mut session, &name, &days, now, &mut out)?,
        PantryCommand::List { sort, filter } => commands::list(
            &session,
            sort.unwrap_or(config.default_sort),
            filter.as_deref(),
            now,
            &mut out,
        )?,
        PantryCommand::Shopping => commands::shopping(&session, &mut out)?,
        PantryCommand::Finish { id } => commands::finish(&mut session, &id, &mut out)?,
        PantryCommand::Delete { id } => commands::delete(&mut session, &id, &mut out)?,
        PantryCommand::Clear { yes } => {
            let confirmation = if yes { Confirmation::Confirmed } else { prompt_clear()? };
            commands::clear(&mut session, confirmation, &mut out)?
        }
        PantryCommand::Sweep => commands::sweep(&session, &mut out)?,
        PantryCommand::Name { name } => commands::name(&mut session, name.as_deref(), &mut out)?,
    }

    session.close()
}

/// Ask on stdin before emptying the shopping list
fn prompt_clear() -> Result<Confirmation> {
    print!("Are you sure you want to clear all finished items? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Confirmation::Confirmed,
        _ => Confirmation::Cancelled,
    })
}

fn run_tui() -> Result<()> {
    let (dir, config, gateway) = open_data_dir()?;
    eprintln!("Using pantry directory: {}", dir.display());

    // A corrupt store aborts here, before anything can overwrite it
    let (items, profile) = gateway.load().context("Failed to load pantry")?;
    let reminders = ReminderQueue::new(gateway.load_reminders().context("Failed to load reminders")?);

    let tracker = Tracker::new(items, config.reminder_settings());
    let notifier = DesktopNotifier::new(config.desktop_notifications);
    let mut app = AppState::new(tracker, gateway, reminders, Box::new(notifier), config, profile);
    info!(dir = %dir.display(), "starting");

    // Startup sweep
    app.tick(Local::now());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit
    if app.needs_save() {
        app.persist();
    }
    if let Some(status) = app.status.as_ref().filter(|s| s.kind == StatusKind::Error) {
        eprintln!("Warning: {}", status.text);
    }

    if let Err(err) = &result {
        error!(error = %err, "tui exited with an error");
        eprintln!("Error: {}", err);
    }

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Audible feedback for finish/delete
        if app.take_bell() {
            execute!(terminal.backend_mut(), Print("\x07"))?;
        }

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        // Sweep, reminders, autosave
        app.tick(Local::now());
    }
}
