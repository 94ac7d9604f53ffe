use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use patient_service::config::Config;
use patient_service::domain::patient::service::PatientService;
use patient_service::domain::user::service::AuthService;
use patient_service::inbound::http::router::create_router;
use patient_service::outbound::external::HttpPatientSource;
use patient_service::outbound::repositories::PostgresPatientRepository;
use patient_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patient_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "patient-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        token_ttl_minutes = config.jwt.access_token_expire_minutes,
        importer_base_url = %config.importer.base_url,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let jwt_handler = JwtHandler::with_algorithm(
        config.jwt.secret.as_bytes(),
        config.jwt.algorithm()?,
        config.jwt.token_ttl()?,
    )?;
    let authenticator = Arc::new(Authenticator::with_jwt_handler(jwt_handler));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let patient_repository = Arc::new(PostgresPatientRepository::new(pg_pool));
    let patient_source = Arc::new(HttpPatientSource::new(
        &config.importer.base_url,
        config.importer.timeout(),
    )?);

    let auth_service = Arc::new(AuthService::new(user_repository, authenticator));
    let patient_service = Arc::new(PatientService::new(patient_repository, patient_source));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, patient_service);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
