use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use iso_profiles::config::{LoggingSettings, Settings, StoreBackend};
use iso_profiles::routes::{self, AppState};
use iso_profiles::services::{MemoryStore, PostgresClient, ProfileStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting ISO Profiles service...");

    let store = match settings.store.backend {
        StoreBackend::Postgres => match PostgresClient::from_settings(&settings.database).await {
            Ok(client) => ProfileStore::Postgres(client),
            Err(e) => {
                error!("Failed to connect to PostgreSQL: {}", e);
                return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
            }
        },
        StoreBackend::Memory => {
            info!("Using in-memory profile store; data is lost on restart");
            ProfileStore::Memory(MemoryStore::new())
        }
    };

    info!("Profile store initialized ({})", store.backend_name());

    let app_state = AppState::new(store);

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure_extractors)
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
