// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use clap::Parser;

use osrs_tracker::config::{init_stderr_logging, Cli, Command, Config};
use osrs_tracker::{AppSettings, SqliteStore, Tracker};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(&cli);

    match cli.command {
        None | Some(Command::Tui) => run_ui_mode(&config),
        Some(command) => {
            init_stderr_logging();
            let mut tracker = open_tracker(&config)?;
            match command {
                Command::Accounts => run_accounts(&tracker),
                Command::AddAccount {
                    name,
                    membership,
                    mode,
                } => {
                    let account = tracker.add_account(&name, membership, mode)?;
                    println!("✓ Created {} ({})", account.label(), account.id);
                    Ok(())
                }
                Command::Status => run_status(&tracker),
                Command::Toggle { item_id } => run_toggle(&mut tracker, &item_id),
                Command::Settings { count_third_age } => run_settings(&mut tracker, count_third_age),
                Command::Tui => Ok(()),
            }
        }
    }
}

fn open_tracker(config: &Config) -> Result<Tracker> {
    let store = SqliteStore::open(&config.db_path)?;
    let mut tracker = Tracker::load(Box::new(store))?;

    if let Some(account_id) = &config.account {
        tracker.select_account(account_id)?;
    }

    Ok(tracker)
}

fn run_accounts(tracker: &Tracker) -> Result<()> {
    println!("👥 Accounts");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if tracker.accounts().is_empty() {
        println!("No accounts. Create one with: osrs-tracker add-account --name <NAME>");
        return Ok(());
    }

    for account in tracker.accounts() {
        println!(
            "{:<24} {:<28} {:<8} {}",
            account.id,
            account.name,
            account.membership.display_name(),
            account.game_mode.display_name()
        );
    }

    Ok(())
}

fn run_status(tracker: &Tracker) -> Result<()> {
    let (Some(account), Some(session)) = (tracker.active_account(), tracker.session()) else {
        println!("❌ No account selected");
        return Ok(());
    };
    let settings = tracker.settings();

    println!("📊 {} ({})", account.label(), account.id);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for category in session.catalog().categories() {
        let progress = session.category_progress(category, settings);
        let mark = if progress.is_complete() { "✓" } else { " " };
        println!("{} {:<24} {}", mark, category.title, progress);
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Overall: {}", session.overall_progress(settings));
    if settings.excludes_third_age() {
        println!("(3rd age items excluded)");
    }

    Ok(())
}

fn run_toggle(tracker: &mut Tracker, item_id: &str) -> Result<()> {
    let done = tracker.toggle_item(item_id)?;
    let label = tracker
        .session()
        .and_then(|s| s.catalog().find_item(item_id))
        .map(|(_, item)| item.label.clone())
        .unwrap_or_else(|| item_id.to_string());

    if done {
        println!("✓ Completed: {}", label);
    } else {
        println!("○ Cleared: {}", label);
    }

    if let Some(progress) = tracker.overall_progress() {
        println!("Overall: {}", progress);
    }

    Ok(())
}

fn run_settings(tracker: &mut Tracker, count_third_age: Option<bool>) -> Result<()> {
    if let Some(value) = count_third_age {
        tracker.update_settings(AppSettings {
            count_third_age: value,
        })?;
    }

    println!("⚙️  Settings");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Count 3rd age items: {}", tracker.settings().count_third_age);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    osrs_tracker::config::init_file_logging(&config.log_path)?;
    tracing::info!("Starting osrs-tracker {}", osrs_tracker::VERSION);

    let tracker = open_tracker(config)?;
    let mut app = ui::App::new(tracker);
    ui::run_ui(&mut app)?;

    println!("\n✅ Progress saved to {}", config.db_path.display());
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the subcommands: osrs-tracker --help");
    std::process::exit(1);
}
