use std::process::ExitCode;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use backend::bootstrap::broker::connect_with_retry;
use backend::bootstrap::db::init_user_store;
use backend::bootstrap::StartupError;
use backend::broker::TopologyDescriptor;
use backend::config::{load_dotenv, AppConfig};
use backend::infra::state::build_state;
use backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use backend::routes;
use backend::telemetry;
use tracing::{error, info, warn};

#[actix_web::main]
async fn main() -> ExitCode {
    // Before tracing, so RUST_LOG from the file applies.
    let dotenv = load_dotenv(None);
    telemetry::init_tracing();
    match dotenv {
        Ok(Some(path)) => info!(path = %path.display(), "loaded environment file"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "failed to load environment file"),
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "sync-backend failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    if config.uses_default_secret() {
        warn!("JWT_SECRET not set; using the development default");
    }

    let users = init_user_store(&config).await?;

    let broker = Arc::new(
        connect_with_retry(
            &config.rabbitmq_url,
            &TopologyDescriptor::sync(),
            config.broker_retry,
            config.publish_timeout,
        )
        .await?,
    );

    let app_state = build_state()
        .with_security(config.security())
        .with_users(users)
        .with_broker(broker.clone())
        .build();
    let data = web::Data::new(app_state);
    let cors_origins = config.cors_allowed_origins.clone();

    info!(
        host = %config.host,
        port = config.port,
        environment = %config.environment,
        "starting sync-backend"
    );

    let served = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    info!("http server stopped, closing broker");
    if let Err(e) = broker.close().await {
        warn!(error = %e, "broker close failed");
    }

    served.map_err(StartupError::from)
}
