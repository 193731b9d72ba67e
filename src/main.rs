use anyhow::Context;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing_subscriber::EnvFilter;

use taskflow_server::{
    app_state::{AppState, SharedState},
    data_access::data_context::DataContext,
    description::DescriptionClient,
    fixtures, map_routes,
    persist::SaveFile,
    settings::Settings,
    world::World,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    // ── Boot the World ─────────────────────────────────────────
    let data_context = match &settings.save_file {
        Some(path) => {
            let save_file = SaveFile::open(path).with_context(|| format!("opening save file {path}"))?;
            let mut world = save_file.load_world().context("loading world from save file")?;
            if settings.seed_fixtures {
                let changes = fixtures::seed(&mut world);
                if !changes.is_empty() {
                    save_file.flush(&world, &changes).context("saving fixtures")?;
                }
            }
            tracing::info!(path = %path, revision = world.revision, "world loaded from save file");
            DataContext::with_save_file(world, save_file)
        }
        None => {
            let mut world = World::new();
            if settings.seed_fixtures {
                fixtures::seed(&mut world);
            }
            tracing::info!("running in memory, nothing is persisted");
            DataContext::in_memory(world)
        }
    };

    let describer = DescriptionClient::new(settings.description_endpoint.clone());
    if !describer.is_configured() {
        tracing::warn!("no description endpoint configured, description generation is disabled");
    }

    // ── Shared state ───────────────────────────────────────────
    let state: SharedState = Arc::new(AppState::new(data_context, describer));

    // ── Router ─────────────────────────────────────────────────
    let mut app = map_routes(state);
    if let Some(dir) = &settings.static_dir {
        app = app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }
    let app = app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    // ── Start ──────────────────────────────────────────────────
    let addr = settings.socket_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "server running");

    axum::serve(listener, app).await?;
    Ok(())
}
