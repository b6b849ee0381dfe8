use habit_tracker::{AppState, Config, HabitRepository, JsonFileStore, KeyValueStore, router, stats};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();

    let mut store = JsonFileStore::new(&config.data_path);
    store.init().await?;
    info!("using data file {}", store.path().display());

    let mut repo = HabitRepository::new(Box::new(store) as Box<dyn KeyValueStore>, config.user_id.clone());
    if config.seed_demo && repo.seed_demo_data(stats::today()).await {
        info!("seeded demo habits");
    }

    let app = router(AppState::new(repo));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
