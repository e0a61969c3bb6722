use std::sync::Arc;

use anyhow::Context;
use pawfect_backend::config::{self, AppConfig};
use pawfect_backend::domain::SystemClock;
use pawfect_backend::io::PetCareApi;
use pawfect_backend::storage::FileStore;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = config::resolve_data_directory()?;
    let config = AppConfig::load_or_create(&data_dir)?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level in configuration")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Using data directory {}", data_dir.display());
    let store = Arc::new(FileStore::new(&data_dir).context("Failed to open data directory")?);
    let api = PetCareApi::open(store, &config, Arc::new(SystemClock))
        .context("Failed to load pet care state")?;

    let pets = api.get_all_pets();
    info!("Loaded {} pets", pets.pets.len());
    for (index, pet) in pets.pets.iter().enumerate() {
        let done = pet.tasks.iter().filter(|t| t.completed).count();
        let marker = if pets.active_index == Some(index) { "*" } else { " " };
        info!("{} {} ({}/{} tasks done)", marker, pet.name, done, pet.tasks.len());
    }
    let checklist = api.get_checklist();
    info!(
        "{}: {}/{} done, all completed: {}",
        checklist.date_display, checklist.completed, checklist.total, checklist.all_completed
    );

    let mut events = api.subscribe();
    api.start_scheduler();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, shutting down");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => info!(
                    "Refresh ({:?}) for {}, reset performed: {}",
                    event.reason, event.day, event.reset_performed
                ),
                Err(RecvError::Lagged(skipped)) => warn!("Missed {} refresh events", skipped),
                Err(RecvError::Closed) => break,
            },
        }
    }

    api.shutdown().await;
    Ok(())
}
