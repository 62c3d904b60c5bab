use clap::{Parser, Subcommand};
use habit_tracker::{
    DerivedHabitView, HabitConfig, HabitStateController, NewHabit, RemoteHabitClient,
    ui::render_habits,
};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "habit_tracker", about = "Track habit streaks against a remote habit service")]
struct Cli {
    /// Base address of the habit service (overrides HABITS_API_URL).
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every habit with its elapsed days.
    List,
    /// Register a habit, then show the refreshed list.
    Add {
        name: String,
        /// Reference date, e.g. 2024-01-01.
        complete_date: String,
        icon: String,
    },
    /// Advance a habit's streak, then show the refreshed list.
    Streak { name: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = HabitConfig::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_url(url)?;
    }

    let client = RemoteHabitClient::from_config(&config)?;
    info!("using habit service at {}", client.base_url());
    let controller = HabitStateController::new(client, |views: &[DerivedHabitView]| {
        print!("{}", render_habits(views));
    })
    .serialized(config.serialize_operations);

    match cli.command {
        Command::List => controller.refresh().await?,
        Command::Add {
            name,
            complete_date,
            icon,
        } => {
            let habit = NewHabit::new(&name, &complete_date, &icon)?;
            controller.add(&habit).await?;
        }
        Command::Streak { name } => controller.update_streak(&name).await?,
    }

    Ok(())
}
