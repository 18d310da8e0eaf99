mod shell;

use anyhow::Context;
use railbook_booking::ReservationEngine;
use railbook_catalog::TrainCatalog;
use railbook_directory::UserDirectory;
use railbook_store::app_config::Config;
use railbook_store::JsonStore;
use shell::Shell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("failed to load configuration")?;
    tracing::info!(data_dir = %config.storage.data_dir, "starting railbook");

    // A broken user store is fatal at startup; everything after this point
    // survives per-command I/O faults.
    let directory = UserDirectory::open(JsonStore::new(config.storage.users_file()))
        .context("failed to load the user store")?;
    let catalog = TrainCatalog::open(JsonStore::new(config.storage.trains_file()))
        .context("failed to load the train catalog")?;

    let mut engine = ReservationEngine::new(catalog, directory);
    let repaired = engine
        .reconcile()
        .context("failed to reconcile seat occupancy")?;
    if repaired > 0 {
        tracing::warn!(repaired, "repaired inconsistent seat flags at startup");
    }

    Shell::new(engine).run().context("shell terminated abnormally")
}
