//! Event journal: appends every bus event to a JSON-lines file

use hcs_common::events::HomeEvent;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub fn spawn_event_journal(
    mut rx: broadcast::Receiver<HomeEvent>,
    path: PathBuf,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(file) => file,
            Err(e) => {
                warn!("Event journal {} unavailable: {}", path.display(), e);
                return;
            }
        };
        debug!("Event journal writing to {}", path.display());

        loop {
            // Queued events are written before cancellation is honoured
            let event = tokio::select! {
                biased;
                received = rx.recv() => match received {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Event journal lagged, {} events skipped", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = cancel.cancelled() => break,
            };

            let mut line = match event.to_json_line() {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to serialize {} event: {}", event.name(), e);
                    continue;
                }
            };
            line.push('\n');
            if let Err(e) = file.write_all(line.as_bytes()).await {
                warn!("Event journal write failed: {}", e);
                break;
            }
        }

        if let Err(e) = file.flush().await {
            warn!("Event journal flush failed: {}", e);
        }
    })
}
