// Seed the profiles table with generated demo data.
//
// Usage: seed [COUNT]   (default 120)

use iso_profiles::config::Settings;
use iso_profiles::core::seed::generate_profiles;
use iso_profiles::services::PostgresClient;
use tracing::{error, info};

const DEFAULT_COUNT: usize = 120;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .pretty()
        .init();

    let count = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                error!("COUNT must be a positive number, got {:?}", arg);
                std::process::exit(2);
            }
        },
        None => DEFAULT_COUNT,
    };

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = match PostgresClient::from_settings(&settings.database).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::process::exit(1);
        }
    };

    info!("Start seeding {} profiles...", count);

    let profiles = generate_profiles(count, &mut rand::thread_rng());
    for profile in profiles {
        match client.create_profile(profile).await {
            Ok(created) => info!("Created profile with id: {}", created.id),
            Err(e) => {
                error!("Failed to insert profile: {}", e);
                std::process::exit(1);
            }
        }
    }

    info!("Seeding finished.");
}
