use std::{net::SocketAddr, sync::Arc};

use backend::{
    config::AppConfig,
    create_router, provider,
    store::{MemoryPlaceStore, PgPlaceStore, PlaceStore},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    let (directions, geocoding) = provider::build(&config).expect("construct map providers");

    let places = match &config.database_url {
        Some(url) => {
            let store = PgPlaceStore::connect(url).await.expect("connect place store");
            store.migrate().await.expect("run place store migrations");
            PlaceStore::Postgres(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving from an empty in-memory place store");
            PlaceStore::Memory(MemoryPlaceStore::new())
        }
    };

    let state = AppState {
        directions: Arc::new(directions),
        geocoding: Arc::new(geocoding),
        places: Arc::new(places),
    };
    let app = create_router(state);

    let addr: SocketAddr = config.bind_addr.parse().expect("valid socket address");
    tracing::info!("starting backend on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}
