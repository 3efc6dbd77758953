use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gyre::sys::server::SOCKET_PATH;
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(version, about = "Control a running gyre instance", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the menu overlay
    Show,
    /// Hide the menu overlay
    Hide,
    /// Enter edit mode
    Edit,
    /// Add an application to the menu by name, class or desktop entry id
    Add { query: String },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let line = match args.command {
        Command::Show => "show".to_string(),
        Command::Hide => "hide".to_string(),
        Command::Edit => "edit".to_string(),
        Command::Add { query } => format!("add {query}"),
    };

    let mut stream = UnixStream::connect(SOCKET_PATH)
        .with_context(|| format!("connecting to {SOCKET_PATH}; is gyre running?"))?;
    writeln!(stream, "{line}")?;

    Ok(())
}
