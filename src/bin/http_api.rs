//! Nomad Spoon HTTP API
//!
//! Serves the storefront's JSON endpoints.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nomad_spoon::{build_info, config, db, http};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("nomad_spoon=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    build_info::print_startup_banner("HTTP");

    let db_path = config::database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&db_path)?;
    database.with_conn(db::migrations::run_migrations)?;
    tracing::info!(path = %db_path.display(), "database ready");

    let addr = config::http_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, http::router(database)).await?;

    Ok(())
}
