pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

pub use api::{activities_router, management_router, reservations_router};
pub use config::{AppConfig, Service};
pub use model::*;
pub use store::{EntityStore, MemoryStore, PostgresStore, SharedStore};

use anyhow::Context;
use axum::{serve, Router};
use log::info;
use tokio::net::TcpListener;

use crate::api::state::{ActivitiesState, ManagementState, ReservationsState};
use crate::logic::reference::RemoteService;

/// Client for the management service, for the services that depend on it
fn management_client(service: Service, config: &AppConfig) -> anyhow::Result<RemoteService> {
    let base_url = config
        .management_url(service)
        .with_context(|| format!("No management URL configured for {}", service))?;
    let remote = RemoteService::new(base_url, config.management_timeout())?;
    info!("{} validates references against {}", service, remote.base_url());
    Ok(remote)
}

/// Wire storage, references and routes for one service.
///
/// Seeds the tables first when `seed_on_start` is set.
pub async fn build_app(service: Service, config: &AppConfig) -> anyhow::Result<Router> {
    let postgres = if config.database.in_memory {
        info!("Using in-memory storage");
        None
    } else {
        let store =
            PostgresStore::new(&config.database_url(), config.database.max_connections).await?;
        store.migrate(service).await?;
        Some(store)
    };

    let router = match service {
        Service::Management => {
            let state = match &postgres {
                Some(pg) => ManagementState::new(pg.table(), pg.table(), pg.table()),
                None => ManagementState::in_memory(),
            };
            if config.seed_on_start {
                seed::seed_management(&state).await?;
            }
            management_router(state)
        }
        Service::Activities => {
            let management = management_client(service, config)?;
            let state = match &postgres {
                Some(pg) => ActivitiesState::new(pg.table(), pg.table(), &management),
                None => ActivitiesState::in_memory(&management),
            };
            if config.seed_on_start {
                seed::seed_activities(&state).await?;
            }
            activities_router(state)
        }
        Service::Reservations => {
            let management = management_client(service, config)?;
            let state = match &postgres {
                Some(pg) => ReservationsState::new(pg.table(), &management),
                None => ReservationsState::in_memory(&management),
            };
            if config.seed_on_start {
                seed::seed_reservations(&state).await?;
            }
            reservations_router(state)
        }
    };

    if config.seed_on_start {
        info!("Seed data loaded for {}", service);
    }

    Ok(router)
}

/// Entry point shared by the three binaries
pub async fn run_service(service: Service) -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("sqlx", log::LevelFilter::Warn)
        .try_init();

    let config = AppConfig::load(service)?;
    info!(
        "Configuration loaded for {}: server={}",
        service,
        config.server_address()
    );

    let app = build_app(service, &config).await?;

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    info!("{} running on http://{}", service, bind_address);

    serve(listener, app).await?;

    Ok(())
}
