use std::process::ExitCode;

use clap::Parser;
use lanpong::cli::{run_cli, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Usage errors exit 1; --help and --version are not errors.
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    run_cli(cli).await;
    ExitCode::SUCCESS
}
