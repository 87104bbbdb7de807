use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::client::dispatcher::{CommandDispatcher, DEFAULT_INSTANCE_A, DEFAULT_INSTANCE_B};

#[derive(Parser, Debug)]
#[command(name = "lanpong-cli")]
#[command(about = "🏓 Control a pair of ping-pong instances")]
#[command(version)]
pub struct Cli {
    /// First instance
    #[arg(long, default_value = DEFAULT_INSTANCE_A)]
    pub instance_a: String,

    /// Second instance
    #[arg(long, default_value = DEFAULT_INSTANCE_B)]
    pub instance_b: String,

    /// Timeout for each control call, in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the game on both instances
    Start {
        /// Time between pings in milliseconds
        delay_ms: u64,
    },
    /// Pause both instances
    Pause,
    /// Resume both instances with their last delay
    Resume,
    /// Stop both instances
    Stop,
}

impl Commands {
    /// The single line printed for this command's outcome.
    pub fn report<E: std::fmt::Display>(&self, outcome: Result<(), E>) -> Result<String, String> {
        match (self, outcome) {
            (Commands::Start { delay_ms }, Ok(())) => {
                Ok(format!("Started game with {delay_ms}ms delay"))
            }
            (Commands::Pause, Ok(())) => Ok("Paused game".to_string()),
            (Commands::Resume, Ok(())) => Ok("Resumed game".to_string()),
            (Commands::Stop, Ok(())) => Ok("Stopped game".to_string()),
            (Commands::Start { .. }, Err(e)) => Err(format!("Error starting game: {e}")),
            (Commands::Pause, Err(e)) => Err(format!("Error pausing game: {e}")),
            (Commands::Resume, Err(e)) => Err(format!("Error resuming game: {e}")),
            (Commands::Stop, Err(e)) => Err(format!("Error stopping game: {e}")),
        }
    }
}

/// Dispatch one command to both instances and print its outcome.
///
/// Per-call failures are reported, never returned.
pub async fn run_cli(cli: Cli) {
    let outcome = match CommandDispatcher::new(
        &cli.instance_a,
        &cli.instance_b,
        Duration::from_millis(cli.timeout_ms),
    ) {
        Ok(dispatcher) => match cli.command {
            Commands::Start { delay_ms } => dispatcher.start(delay_ms).await.map(|_| ()),
            Commands::Pause => dispatcher.pause().await.map(|_| ()),
            Commands::Resume => dispatcher.resume().await.map(|_| ()),
            Commands::Stop => dispatcher.stop().await.map(|_| ()),
        },
        Err(e) => Err(e),
    };

    match cli.command.report(outcome) {
        Ok(line) => println!("{line}"),
        Err(line) => eprintln!("{line}"),
    }
}
