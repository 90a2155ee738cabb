use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use mangalya::config::{Settings, StoreBackend};
use mangalya::core::PhotoLimits;
use mangalya::error::{handle_json_payload_error, handle_query_payload_error};
use mangalya::routes::{self, AppState};
use mangalya::services::{LocalMediaStorage, MemoryStore, PostgresClient, Store, TokenIssuer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // Initialize logging, environment wins over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Mangalya backend...");
    info!("Configuration loaded successfully");

    let store: Arc<dyn Store> = match settings.database.backend {
        StoreBackend::Postgres => {
            let postgres = PostgresClient::from_settings(
                &settings.database.url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
            })?;

            info!(
                "PostgreSQL store initialized (max: {} connections)",
                settings.database.max_connections.unwrap_or(10)
            );
            Arc::new(postgres)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store, data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let tokens = Arc::new(TokenIssuer::new(
        &settings.auth.jwt_secret,
        settings.auth.access_token_ttl_secs,
        settings.auth.refresh_token_ttl_secs,
    ));

    let media = Arc::new(LocalMediaStorage::new(
        settings.media.root.clone(),
        settings.media.base_url.clone(),
    ));
    tokio::fs::create_dir_all(media.root()).await?;

    info!("Serving media from {}", media.root().display());

    let app_state = AppState {
        store,
        tokens,
        media,
        photo_limits: PhotoLimits {
            max_per_profile: settings.media.max_photos_per_profile,
            max_bytes: settings.media.max_photo_bytes,
        },
        credits: settings.credits.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let media_root = settings.media.root.clone();
    let media_mount = settings.media.base_url.trim_end_matches('/').to_string();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .service(actix_files::Files::new(&media_mount, &media_root))
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
