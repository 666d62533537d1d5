use log::info;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Executor;
use std::time::Duration;

/// Tables in dependency order. `row` and `rows` are reserved words in MySQL 8
/// and are always quoted.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INT AUTO_INCREMENT PRIMARY KEY,
        email VARCHAR(255) NOT NULL,
        password VARCHAR(255) NOT NULL,
        is_staff BOOLEAN NOT NULL DEFAULT FALSE,
        CONSTRAINT users_email_uindex UNIQUE (email)
    )",
    "CREATE TABLE IF NOT EXISTS countries (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(25) NOT NULL,
        CONSTRAINT countries_name_uindex UNIQUE (name)
    )",
    "CREATE TABLE IF NOT EXISTS cities (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(25) NOT NULL,
        country_id INT NOT NULL,
        CONSTRAINT cities_name_uindex UNIQUE (name),
        CONSTRAINT cities_country_id_fk
            FOREIGN KEY (country_id) REFERENCES countries(id)
            ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS airports (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(25) NOT NULL,
        closest_big_city_id INT NULL,
        CONSTRAINT airports_name_uindex UNIQUE (name),
        CONSTRAINT airports_closest_big_city_id_fk
            FOREIGN KEY (closest_big_city_id) REFERENCES cities(id)
            ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS routes (
        id INT AUTO_INCREMENT PRIMARY KEY,
        source_id INT NOT NULL,
        destination_id INT NOT NULL,
        distance INT NOT NULL,
        CONSTRAINT routes_source_destination_uindex UNIQUE (source_id, destination_id),
        CONSTRAINT routes_distance_positive CHECK (distance > 0),
        CONSTRAINT routes_source_id_fk
            FOREIGN KEY (source_id) REFERENCES airports(id)
            ON DELETE CASCADE,
        CONSTRAINT routes_destination_id_fk
            FOREIGN KEY (destination_id) REFERENCES airports(id)
            ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS airplane_types (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(25) NOT NULL,
        CONSTRAINT airplane_types_name_uindex UNIQUE (name)
    )",
    "CREATE TABLE IF NOT EXISTS airplanes (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(25) NOT NULL,
        `rows` INT NOT NULL,
        seats_in_row INT NOT NULL,
        airplane_type_id INT NOT NULL,
        image VARCHAR(255) NULL,
        CONSTRAINT airplanes_name_uindex UNIQUE (name),
        CONSTRAINT airplanes_layout_positive CHECK (`rows` > 0 AND seats_in_row > 0),
        CONSTRAINT airplanes_airplane_type_id_fk
            FOREIGN KEY (airplane_type_id) REFERENCES airplane_types(id)
            ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS crews (
        id INT AUTO_INCREMENT PRIMARY KEY,
        first_name VARCHAR(35) NOT NULL,
        last_name VARCHAR(35) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS flights (
        id INT AUTO_INCREMENT PRIMARY KEY,
        route_id INT NOT NULL,
        airplane_id INT NULL,
        departure_time DATETIME NOT NULL,
        arrival_time DATETIME NOT NULL,
        CONSTRAINT flights_route_airplane_departure_uindex
            UNIQUE (route_id, airplane_id, departure_time),
        CONSTRAINT flights_arrival_after_departure CHECK (arrival_time > departure_time),
        CONSTRAINT flights_route_id_fk
            FOREIGN KEY (route_id) REFERENCES routes(id)
            ON DELETE CASCADE,
        CONSTRAINT flights_airplane_id_fk
            FOREIGN KEY (airplane_id) REFERENCES airplanes(id)
            ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS flight_crews (
        flight_id INT NOT NULL,
        crew_id INT NOT NULL,
        PRIMARY KEY (flight_id, crew_id),
        CONSTRAINT flight_crews_flight_id_fk
            FOREIGN KEY (flight_id) REFERENCES flights(id)
            ON DELETE CASCADE,
        CONSTRAINT flight_crews_crew_id_fk
            FOREIGN KEY (crew_id) REFERENCES crews(id)
            ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id INT AUTO_INCREMENT PRIMARY KEY,
        user_id INT NOT NULL,
        created_at DATETIME NOT NULL,
        CONSTRAINT orders_user_id_fk
            FOREIGN KEY (user_id) REFERENCES users(id)
            ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS tickets (
        id INT AUTO_INCREMENT PRIMARY KEY,
        `row` INT NOT NULL,
        seat INT NOT NULL,
        flight_id INT NOT NULL,
        order_id INT NOT NULL,
        CONSTRAINT tickets_row_seat_flight_uindex UNIQUE (`row`, seat, flight_id),
        CONSTRAINT tickets_position_positive CHECK (`row` > 0 AND seat > 0),
        CONSTRAINT tickets_flight_id_fk
            FOREIGN KEY (flight_id) REFERENCES flights(id)
            ON DELETE CASCADE,
        CONSTRAINT tickets_order_id_fk
            FOREIGN KEY (order_id) REFERENCES orders(id)
            ON DELETE CASCADE
    )",
    // MySQL rejects CHECK constraints on columns with ON DELETE actions, so the
    // route self-loop guard lives in triggers
    "DROP TRIGGER IF EXISTS routes_distinct_endpoints_insert",
    "CREATE TRIGGER routes_distinct_endpoints_insert
        BEFORE INSERT ON routes FOR EACH ROW
        BEGIN
            IF NEW.source_id = NEW.destination_id THEN
                SIGNAL SQLSTATE '45000'
                    SET MESSAGE_TEXT = 'The source and the destination can''t be the same.';
            END IF;
        END",
    "DROP TRIGGER IF EXISTS routes_distinct_endpoints_update",
    "CREATE TRIGGER routes_distinct_endpoints_update
        BEFORE UPDATE ON routes FOR EACH ROW
        BEGIN
            IF NEW.source_id = NEW.destination_id THEN
                SIGNAL SQLSTATE '45000'
                    SET MESSAGE_TEXT = 'The source and the destination can''t be the same.';
            END IF;
        END",
];

// Database connection manager
pub struct Database {
    pub pool: MySqlPool,
}

impl Database {
    // Create a new database connection pool
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    // Apply the schema; every statement is idempotent
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        apply_schema(&self.pool).await
    }
}

// Statements go over the text protocol: MySQL cannot prepare CREATE TRIGGER
pub async fn apply_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        pool.execute(*statement).await?;
    }
    info!("Schema applied ({} statements)", SCHEMA.len());
    Ok(())
}
