use hipchat_web::{
    build_router,
    hipchat::HipChatClientFactory,
    session::{
        repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
        SessionService, TokenConfig,
    },
    AppConfig, AppState,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hipchat_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HipChat web front-end");

    if let Err(e) = run(AppConfig::from_env()).await {
        error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Easy to switch between implementations:
    let user_repository: Arc<dyn UserRepository + Send + Sync> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            info!("Using PostgreSQL user store");
            Arc::new(PostgresUserRepository::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory user store");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let session_service = Arc::new(SessionService::new(user_repository, TokenConfig::new()));
    let chat_clients = Arc::new(HipChatClientFactory::new(
        &config.hipchat_api_url,
        config.http_timeout,
    )?);

    info!(
        hipchat_api_url = %config.hipchat_api_url,
        base_uri = %config.base_uri,
        "Configuration loaded"
    );

    let bind_addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config, session_service, chat_clients));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
