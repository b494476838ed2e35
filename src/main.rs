use dotenvy::dotenv;
use rental_service::{build_server, JsonStore};
use std::env;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let data_file = env::var("DATA_FILE").unwrap_or_else(|_| "rental_data.json".to_string());

    let store = Arc::new(JsonStore::open(&data_file).expect("Failed to open data file"));

    log::info!(
        "Starting server at http://{}:{} (data file: {})",
        host,
        port,
        data_file
    );

    build_server(store, &host, port)?.await
}
