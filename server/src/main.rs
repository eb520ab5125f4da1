mod config;
mod db;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    let state = state::AppState::postgres(pool, config.session_ttl_hours);

    // Bootstrap admin is non-fatal: the server still serves existing accounts.
    if let Some(admin) = &config.bootstrap_admin {
        if let Err(e) = services::auth::seed_admin(&state, admin).await {
            tracing::warn!(error = %e, username = %admin.username, "bootstrap admin not created");
        }
    }

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "roster listening");
    axum::serve(listener, app).await.expect("server failed");
}
