//! `dataroom` - terminal front-end for the data room.
//!
//! ```bash
//! dataroom status
//! dataroom login
//! dataroom list
//! dataroom search "board minutes"
//! dataroom delete 42
//! dataroom browse        # pick and import files from Google Drive
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use dataroom_client::app::{AuthState, DataRoomApp};
use dataroom_client::{ApiClient, Dialogs};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dataroom", version, about = "Acme Data Room terminal client")]
struct Cli {
    /// Backend API root
    #[arg(long, env = "DATAROOM_API_URL", default_value = "http://localhost:5001/api")]
    api_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show whether Google Drive is connected
    Status,
    /// Print the Google sign-in URL
    Login,
    /// Disconnect Google Drive
    Logout,
    /// List imported files
    List,
    /// Search imported files by name
    Search { query: String },
    /// Print the URL serving a file
    View { id: i64 },
    /// Delete an imported file (asks for confirmation)
    Delete { id: i64 },
    /// Browse Google Drive and import files
    Browse,
}

/// Dialogs on stdin/stdout.
struct TerminalDialogs;

impl Dialogs for TerminalDialogs {
    fn alert(&self, message: &str) {
        println!("{}", message);
    }

    fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }

    fn open_in_new_context(&self, url: &str) {
        println!("Open in your browser: {}", url);
    }

    fn redirect(&self, url: &str) {
        println!("Sign in with Google: {}", url);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let dialogs = TerminalDialogs;
    let mut app = DataRoomApp::new(ApiClient::new(cli.api_url));

    match cli.command {
        Command::Login => {
            app.login(&dialogs).await;
            return Ok(());
        }
        Command::View { id } => {
            dialogs.open_in_new_context(&app.api().view_url(id));
            return Ok(());
        }
        _ => {}
    }

    app.mount().await;

    if app.auth() != AuthState::Authenticated {
        println!("{}", app.screen());
        return Ok(());
    }

    match cli.command {
        Command::Status => println!("Google Drive connected"),
        Command::Logout => {
            app.logout().await;
            if app.auth() == AuthState::Unauthenticated {
                println!("Logged out");
            }
        }
        Command::List => println!("{}", app.screen()),
        Command::Search { query } => {
            app.search(&query).await;
            println!("{}", app.screen());
        }
        Command::Delete { id } => {
            if !app.files().iter().any(|f| f.id == id) {
                anyhow::bail!("No file with id {}", id);
            }
            if app.delete_file(id, &dialogs).await {
                println!("{}", app.screen());
            }
        }
        Command::Browse => browse(&mut app, &dialogs).await?,
        Command::Login | Command::View { .. } => {}
    }

    Ok(())
}

const BROWSE_HELP: &str =
    "Commands: n(ext), p(revious), s <query>, t <number> (toggle), i(mport), q(uit)";

async fn browse(app: &mut DataRoomApp, dialogs: &TerminalDialogs) -> Result<()> {
    app.open_picker().await;
    let stdin = io::stdin();

    loop {
        println!("{}", app.picker().render());
        println!("{}", BROWSE_HELP);
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (command, argument) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "n" | "next" => {
                let (picker, api) = app.picker_mut();
                picker.next_page(api).await;
            }
            "p" | "prev" | "previous" => {
                let (picker, api) = app.picker_mut();
                picker.previous_page(api).await;
            }
            "s" | "search" => {
                let (picker, api) = app.picker_mut();
                picker.search(api, argument).await;
            }
            "t" | "toggle" => {
                let id = argument
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| app.picker().visible_files().nth(index))
                    .map(|file| file.id.clone());
                match id {
                    Some(id) => {
                        let (picker, _) = app.picker_mut();
                        picker.toggle_id(&id);
                    }
                    None => println!("No file numbered '{}'", argument.trim()),
                }
            }
            "i" | "import" => {
                if app.import_selected(dialogs).await.is_some() {
                    println!("{}", app.screen());
                    break;
                }
                println!("Select at least one file first");
            }
            "q" | "quit" => {
                app.close_picker();
                break;
            }
            "" => {}
            other => println!("Unknown command '{}'", other),
        }
    }

    Ok(())
}
