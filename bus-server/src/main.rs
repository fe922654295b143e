use std::net::SocketAddr;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use bus_server::gtfs::load_feed;
use bus_server::index::{IndexConfig, TransitIndex};
use bus_server::planner::PlanConfig;
use bus_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = std::env::var("GTFS_DATA_DIR").unwrap_or_else(|_| "data/gtfs".to_string());
    let data_dir = PathBuf::from(data_dir);

    println!("Loading GTFS feed from {}...", data_dir.display());
    let feed = load_feed(&data_dir).expect("Failed to load GTFS feed");

    let index =
        TransitIndex::build(feed, &IndexConfig::default()).expect("Failed to build transit index");
    println!(
        "Indexed {} stops, {} routes, {} trips",
        index.stop_count(),
        index.route_count(),
        index.trip_count()
    );

    let state = AppState::new(index, PlanConfig::default());
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("Invalid BIND_ADDR");

    println!("Bus Trip Planner listening on http://{addr}");
    println!();
    println!("Open http://{addr} in your browser for the map interface.");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health           - Health check");
    println!("  GET  /api/info         - Dataset summary");
    println!("  GET  /api/stops/nearby - Stops near a point");
    println!("  POST /api/plan         - Plan a trip");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
