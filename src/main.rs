//! Mind Backlog - Main Entry Point
//!
//! Command line front end over the `mind_backlog` library.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mind_backlog::{BacklogHandler, Config};
use std::path::PathBuf;

/// Mind Backlog - capture problems, start on them now or file them for later
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the data files (overrides the configuration)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture a problem; with --step it starts active, otherwise it goes to the backlog
    Add {
        /// What is on your mind
        problem: String,
        /// The next concrete step, if you can start now
        #[arg(long)]
        step: Option<String>,
    },
    /// List problems
    List {
        /// Only this list: backlog, active or completed
        #[arg(long)]
        status: Option<String>,
        /// Only problems containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Sort order: newest, oldest or alphabetical
        #[arg(long)]
        sort: Option<String>,
        /// Show every step
        #[arg(long)]
        steps: bool,
    },
    /// Move a problem to backlog, active or completed
    Status {
        /// Problem ID or a unique prefix of it
        id: String,
        /// New status
        status: String,
    },
    /// Append the next step to a problem
    Step {
        /// Problem ID or a unique prefix of it
        id: String,
        /// What to do next
        text: String,
    },
    /// Toggle the done flag of a problem's last step
    Toggle {
        /// Problem ID or a unique prefix of it
        id: String,
    },
    /// Delete a problem and its steps
    Remove {
        /// Problem ID or a unique prefix of it
        id: String,
    },
    /// Count problems per list
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    tracing::debug!(data_dir = %config.data_dir.display(), "using configuration");

    let handler = BacklogHandler::new(&config);
    let result = match args.command {
        Command::Add { problem, step } => handler.handle_add(problem, step).await,
        Command::List {
            status,
            search,
            sort,
            steps,
        } => handler.handle_list(status, search, sort, steps).await,
        Command::Status { id, status } => handler.handle_change_status(id, status).await,
        Command::Step { id, text } => handler.handle_add_step(id, text).await,
        Command::Toggle { id } => handler.handle_toggle_step(id).await,
        Command::Remove { id } => handler.handle_remove(id).await,
        Command::Summary => handler.handle_summary().await,
    };
    handler.flush().await;

    println!("{}", result?);
    Ok(())
}
