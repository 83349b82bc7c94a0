mod api;
mod app;
mod config;
mod database;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_web::{web, HttpServer};
use dotenv::dotenv;
use std::process;
use std::sync::Arc;

use crate::config::Config;
use crate::services::{MongoUserStore, UserStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Configuration error: {}", e);
            process::exit(1);
        }
    };

    log::info!("🚀 Starting User Service...");

    // A store failure here is fatal; the listener is never bound
    let db = match database::MongoDB::new(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            log::error!("❌ Database connection error: {}", e);
            process::exit(1);
        }
    };

    log::info!("✅ MongoDB connected: {}", db.database().name());

    let store: web::Data<dyn UserStore> =
        web::Data::from(Arc::new(MongoUserStore::new(&db)) as Arc<dyn UserStore>);

    let server = HttpServer::new(move || app::build_app(store.clone()))
        .bind((config.host.as_str(), config.port))?;

    for addr in server.addrs() {
        log::info!("🌐 Server running on http://{}", addr);
    }

    server.run().await
}
