use airport_service::build_rocket;
use airport_service::config::AppConfig;
use airport_service::db::Database;
use dotenv::dotenv;
use rocket::{launch, Build, Rocket};

#[launch]
async fn rocket() -> Rocket<Build> {
    dotenv().ok();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Connect to the database
    let database = Database::new(&config.database_url, config.max_connections)
        .await
        .expect("Failed to connect to database");
    database
        .init_schema()
        .await
        .expect("Failed to apply database schema");

    build_rocket(config, database.pool)
}
