//! Panda Pomodoro - a terminal countdown and Pomodoro timer
//!
//! Run a manual countdown or the Pomodoro cycle:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 focus segments

use std::io::IsTerminal;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::debug;

use panda_pomodoro::app::{App, AppOptions};
use panda_pomodoro::cli::{Cli, Commands, RunArgs};
use panda_pomodoro::sound::select_player;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }

    // A blocking stdin read may still be in flight; dropping the runtime
    // would wait for it.
    std::process::exit(0);
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the status line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => run(cli.run).await,
    }
}

/// Runs the interactive timer until the user quits.
async fn run(args: RunArgs) -> Result<()> {
    let player = select_player(&args.sound_options());
    debug!(backend = player.backend().as_str(), "alert backend selected");

    let options = AppOptions {
        form: args.form_state(),
        mascot: !args.no_mascot,
        tray: args.tray,
        interactive: std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
    };
    let app = App::new(std::io::stdout(), player, options);
    app.run().await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
