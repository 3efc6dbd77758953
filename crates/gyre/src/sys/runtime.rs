use crate::events::AppEvent;
use appdex::desktop::{self, AppInfo};
use appdex::store;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

pub fn start_background_services(tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create Tokio runtime");

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    match tokio::task::spawn_blocking(index_menu_apps).await {
                        Ok(apps) => {
                            let _ = tx.send(AppEvent::AppsIndexed(apps)).await;
                        }
                        Err(e) => log::error!("Application indexing failed: {}", e),
                    }
                });
            }

            std::future::pending::<()>().await;
        });
    });
}

/// Scans the desktop entries and resolves the persisted menu order against
/// them. A missing order file means an empty menu.
fn index_menu_apps() -> Vec<AppInfo> {
    desktop::refresh_cache();
    let entries = desktop::get_all_entries();

    match store::load_order() {
        Ok(saved) => store::resolve_order(&saved, &entries),
        Err(e) => {
            log::error!("Failed to load menu order: {}", e);
            Vec::new()
        }
    }
}
