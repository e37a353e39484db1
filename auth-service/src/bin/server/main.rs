use std::sync::Arc;

use auth::Authenticator;
use auth::KeyMaterial;
use auth_service::config::Config;
use auth_service::domain::user::ports::UserServicePort;
use auth_service::domain::user::service::UserService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;
use auth_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let store = match config.database.url {
        Some(_) => "postgresql",
        None => "memory",
    };

    tracing::info!(
        http_port = config.server.http_port,
        database = store,
        token_ttl_hours = config.jwt.expiration_hours,
        cookie_name = %config.cookie.name,
        cookie_secure = config.cookie.secure,
        "Configuration loaded"
    );

    let keys = KeyMaterial::load(&config.jwt.private_key_file, &config.jwt.public_key_file)
        .inspect_err(|e| tracing::error!(error = %e, "Key material unavailable"))?;
    tracing::info!(
        private_key_file = %config.jwt.private_key_file.display(),
        public_key_file = %config.jwt.public_key_file.display(),
        "Key material loaded"
    );

    let authenticator = Arc::new(Authenticator::new(&keys, config.jwt.token_ttl())?);

    let user_service: Arc<dyn UserServicePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(UserService::new(Arc::new(PostgresUserRepository::new(
                pg_pool,
            ))))
        }
        None => {
            tracing::warn!("No database configured, users are kept in memory");
            Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new())))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator, config.cookie.clone());

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
