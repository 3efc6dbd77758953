use crate::events::AppEvent;
use appdex::desktop::{self, AppQuery};
use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/gyre.sock";

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        handle_command(line.trim(), &tx).await;
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_command(command: &str, tx: &Sender<AppEvent>) {
    match command {
        "show" => {
            let _ = tx.send(AppEvent::Show).await;
        }
        "hide" => {
            let _ = tx.send(AppEvent::Hide).await;
        }
        "edit" => {
            let _ = tx.send(AppEvent::EnterEdit).await;
        }
        cmd if cmd.starts_with("add ") => {
            let query = AppQuery::new(cmd["add ".len()..].trim());
            // entry resolution may scan the filesystem
            let found =
                tokio::task::spawn_blocking(move || desktop::find_desktop_entry(&query)).await;
            match found {
                Ok(Some(app)) => {
                    let _ = tx.send(AppEvent::AddIcon(app)).await;
                }
                Ok(None) => log::warn!("No desktop entry matches '{}'", command),
                Err(e) => log::error!("Entry lookup failed: {}", e),
            }
        }
        _ => {}
    }
}
