use std::sync::Arc;

use clap::Parser;
use log::{error, warn};
use timetable_generator::catalog::InMemoryCatalog;
use timetable_generator::config::ServerConfig;
use timetable_generator::server::{self, AppState};
use timetable_generator::store::InMemoryStore;
use timetable_generator::ScheduleService;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    let default_filter = if config.verbose {
        "timetable_generator=debug,info"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> timetable_generator::Result<()> {
    let limits = config.limits();

    let catalog = match &config.catalog_path {
        Some(path) => InMemoryCatalog::load(path)?,
        None => {
            warn!("No catalog configured; every generation request will report missing courses");
            InMemoryCatalog::default()
        }
    };

    let service = ScheduleService::new(Arc::new(catalog), Arc::new(InMemoryStore::new()), limits);
    let state = AppState { service, limits };

    server::run_server(config.bind_addr, state).await?;
    Ok(())
}
