mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;
mod store;
mod utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use crate::config::AppConfig;
use crate::store::postgres::PgStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = db::create_pool(&config)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;

    let store = PgStore::new(pool);

    info!("Starting server at {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(store.clone()))
            .configure(handlers::configure::<PgStore>)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
