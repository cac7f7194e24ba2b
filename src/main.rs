use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::net::SocketAddr;

use car_dashboard_api::{config::AppConfig, routes::build_app, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,car_dashboard_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let state = AppState::new(config)?;

    let report = state.gateway.validate_configuration();
    for issue in &report.issues {
        tracing::warn!(%issue, "gateway configuration");
    }
    for recommendation in &report.recommendations {
        tracing::info!(%recommendation, "gateway configuration");
    }
    tracing::info!(
        endpoint = %state.config.gateway.endpoint,
        environment = ?state.config.environment,
        "gateway configured"
    );

    let app = build_app(state);

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
