use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "wakecycle-cli", version, about = "Wakecycle CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default wake-time recommendation
    Recommend {
        /// Evaluate at this instant instead of the system clock (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },
    /// Replay picker events and print every published update
    Session {
        /// Evaluate at this instant instead of the system clock (RFC 3339)
        #[arg(long)]
        now: Option<String>,
        /// Events in order: init, confirm, wheel:HH:MM:am|pm, control:HH:MM, control:<RFC 3339>
        #[arg(required = true)]
        events: Vec<String>,
    },
    /// Snap an instant onto the wheel rows
    Snap {
        /// Instant to snap (RFC 3339)
        #[arg(long)]
        at: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WAKECYCLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Recommend { now } => commands::alarm::recommend(now.as_deref()),
        Commands::Session { now, events } => commands::alarm::session(now.as_deref(), &events),
        Commands::Snap { at } => commands::alarm::snap(&at),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
