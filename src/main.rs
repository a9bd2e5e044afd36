// src/main.rs

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sunnypath::config::CONFIG;
use sunnypath::gamification::{days_left, milestone_action, progress_percent, remaining_points};
use sunnypath::profile::ProfileStore;
use sunnypath::types::UserRole;
use sunnypath::Session;

#[derive(Parser)]
#[command(name = "sunnypath", about = "SunnyPath companion core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the saved profile and its progress toward the sunshine target.
    Status,
    /// Erase the saved profile slot.
    Reset,
    /// Seed the demo profile and run one ferry action against the
    /// configured provider.
    Demo {
        /// Optional supporter message to attach to the ferry.
        #[arg(long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let level = if CONFIG.is_debug() {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Command::Status => status(),
        Command::Reset => reset(),
        Command::Demo { message } => demo(message.as_deref()).await,
    }
}

fn status() -> anyhow::Result<()> {
    let store = ProfileStore::from_config();
    let Some(profile) = store.load() else {
        println!("No saved profile at {}", CONFIG.profile_path().display());
        return Ok(());
    };

    let percent = progress_percent(profile.sunshine_points, profile.sunshine_target);
    println!("{} (age {})", profile.name, profile.age);
    println!(
        "Sunshine: {}/{} ({:.0}%)",
        profile.sunshine_points, profile.sunshine_target, percent
    );
    println!("Supporters: {}", profile.supporter_count);
    println!(
        "Days until return: {}",
        days_left(profile.target_return_date, chrono::Utc::now())
    );
    match milestone_action(percent) {
        Some(action) => println!("Milestone: {}", action),
        None => println!("Still {} points to go", remaining_points(&profile)),
    }
    Ok(())
}

fn reset() -> anyhow::Result<()> {
    let store = ProfileStore::from_config();
    store.clear()?;
    info!("Profile slot cleared");
    Ok(())
}

async fn demo(message: Option<&str>) -> anyhow::Result<()> {
    // Deliberately no startup(): the demo always enters as a fresh supporter
    // so role selection seeds the demo profile.
    let mut session = Session::from_config()?;
    session.select_role(UserRole::Fundraiser);
    session.start_ferry_flow();

    let outcome = session.ferry(message).await?;
    let profile = session
        .profile()
        .ok_or_else(|| anyhow::anyhow!("ferry left no profile"))?;

    println!(
        "Ferry complete: {}/{} sunshine, outcome {:?}",
        profile.sunshine_points, profile.sunshine_target, outcome
    );
    Ok(())
}
