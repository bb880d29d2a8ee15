use std::sync::Arc;

use auth::Authenticator;
use coffee_api::config::Config;
use coffee_api::domain::user::service::UserService;
use coffee_api::inbound::http::router::create_router;
use coffee_api::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coffee_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "coffee-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_host = %config.database.host,
        database_name = %config.database.name,
        http_port = config.server.http_port,
        token_ttl_hours = ?config.jwt.expiration_hours,
        guard_login = config.auth.guard_login,
        verify_subject_exists = config.auth.verify_subject_exists,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(config.database.connect_options())
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pg_pool).await?;
        tracing::info!(database = "postgresql", "Database migrations completed");
    }

    let mut authenticator = Authenticator::new(config.jwt.secret.as_bytes());
    if let Some(hours) = config.jwt.expiration_hours {
        authenticator = authenticator.with_token_ttl_hours(hours);
    }
    let authenticator = Arc::new(authenticator);

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator, config.auth.clone());
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
