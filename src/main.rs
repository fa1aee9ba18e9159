//! dfcheck - interactive command-line client for a remote deepfake
//! detection service
//!
//! Thin driver over the library: parses commands from stdin, forwards
//! them to the workflow controller and renders its view state. All
//! control flow lives in the library.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dfcheck::config::Config;
use dfcheck::services::session::AuthMode;
use dfcheck::WorkflowController;

/// Command-line arguments for dfcheck
#[derive(Parser, Debug)]
#[command(name = "dfcheck")]
#[command(about = "Client for a remote deepfake detection service")]
#[command(version)]
struct Args {
    /// Base URL of the detection service
    #[arg(short, long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dfcheck=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::resolve(args.api_url.as_deref());

    println!("dfcheck {}", env!("CARGO_PKG_VERSION"));
    println!("Detection service: {}", config.api_url);
    println!("Type 'help' for commands.");

    let mut controller = WorkflowController::new(&config)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_prompt(&controller)?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let arg = parts.next();

        match command {
            "help" => print_help(),
            "login" => {
                let Some(email) = arg else {
                    println!("Usage: login <email>");
                    continue;
                };
                let password = read_password(&mut lines)?;
                controller.login(email, &password).await;
            }
            "register" => {
                let Some(email) = arg else {
                    println!("Usage: register <email>");
                    continue;
                };
                controller.set_auth_mode(AuthMode::Register);
                let password = read_password(&mut lines)?;
                controller.register(email, &password).await;
            }
            "logout" => {
                controller.logout();
                println!("Logged out.");
            }
            "select" => {
                let Some(path) = arg else {
                    println!("Usage: select <path>");
                    continue;
                };
                controller.select_file(Path::new(path));
                if let Some(selection) = controller.selection() {
                    println!(
                        "Selected {} (preview copy at {})",
                        selection.filename,
                        selection.preview.path().display()
                    );
                }
            }
            "submit" => {
                println!("Processing...");
                controller.submit().await;
            }
            "result" => print_result(&controller),
            "history" => print_history(&controller),
            "clear" => {
                controller.clear_history();
                println!("History cleared.");
            }
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. Type 'help' for commands.", other),
        }

        report_messages(&controller);
        if command == "submit" {
            print_result(&controller);
        }
    }

    Ok(())
}

fn print_prompt(controller: &WorkflowController) -> io::Result<()> {
    let marker = if controller.is_authenticated() {
        "dfcheck"
    } else {
        "dfcheck (logged out)"
    };
    print!("{}> ", marker);
    io::stdout().flush()
}

fn read_password(lines: &mut impl Iterator<Item = io::Result<String>>) -> io::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => line,
        None => Ok(String::new()),
    }
}

/// Surface whichever message slot the last action populated
fn report_messages(controller: &WorkflowController) {
    if let Some(msg) = controller.auth_error() {
        println!("Auth error: {}", msg);
    }
    if let Some(msg) = controller.detection_error() {
        println!("Error: {}", msg);
    }
    if let Some(msg) = controller.info_message() {
        println!("{}", msg);
    }
}

fn print_result(controller: &WorkflowController) {
    match controller.result() {
        Some(result) => {
            let label = if result.is_deepfake {
                "Deepfake Detected"
            } else {
                "Real Media"
            };
            // Display rounding only; the stored value is untouched
            println!("{} (confidence {:.1}%)", label, result.confidence * 100.0);
        }
        None => println!("No result yet."),
    }
}

fn print_history(controller: &WorkflowController) {
    if controller.history().is_empty() {
        println!("History is empty.");
        return;
    }
    for entry in controller.history().entries() {
        let label = if entry.is_deepfake {
            "Deepfake Detected"
        } else {
            "Real Media"
        };
        println!(
            "{}  {}  {} ({:.1}%)",
            entry.detected_at.format("%Y-%m-%d %H:%M:%S"),
            entry.filename,
            label,
            entry.confidence * 100.0
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  login <email>     Log in (prompts for password)");
    println!("  register <email>  Create an account (prompts for password)");
    println!("  logout            Log out and clear session state");
    println!("  select <path>     Select an image or video file");
    println!("  submit            Upload the selection and run detection");
    println!("  result            Show the most recent verdict");
    println!("  history           Show completed detections, newest first");
    println!("  clear             Clear the detection history");
    println!("  quit              Exit");
}
