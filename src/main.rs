use tokio::net::TcpListener;
use groq_summarizer::{
    config::Config,
    api::routes::create_router,
    telemetry::init_tracing,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config.log_level)?;

    let server_addr = config.server_addr;
    tracing::info!(
        %server_addr,
        model = %config.groq_model,
        cache = config.enable_cache,
        max_summary_length = config.max_summary_length,
        "Starting server"
    );

    let app_state = AppState::from_config(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!(%server_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
