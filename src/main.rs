use std::time::Duration;

use actix_cors::Cors;
use actix_ratelimit::{MemoryStore, MemoryStoreActor, RateLimiter};
use actix_web::{middleware, web, App, HttpServer};

#[macro_use]
extern crate diesel;
extern crate dotenv;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate lazy_static;

use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel_migrations::embed_migrations;
use dotenv::dotenv;
use log::info;

mod api;
mod db;
mod monitoring;
mod notifications;
mod settings;
mod shards;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type Conn = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

embed_migrations!("./migrations");

lazy_static! {
    static ref CONFIG: settings::Settings =
        settings::Settings::new().expect("config can be loaded");
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let manager = ConnectionManager::<PgConnection>::new(CONFIG.database.url());
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("Failed to create pool.");

    let _result = embedded_migrations::run_with_output(
        &pool
            .get()
            .expect("Failed to get a connection from the pool"),
        &mut std::io::stdout(),
    );

    db::sync_catalog(&pool, CONFIG.challenge_types.clone())
        .await
        .map_err(|error| std::io::Error::new(std::io::ErrorKind::Other, error))?;

    let shard_set = shards::ShardSet::new(pool, &CONFIG.shards);
    let monitor = monitoring::MonitorClient::new(CONFIG.monitoring.base_url.clone());
    let store = MemoryStore::new();

    info!("listening on {}", CONFIG.server.address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
        App::new()
            .data(shard_set.clone())
            .data(monitor.clone())
            .wrap(cors)
            .wrap(middleware::Compress::default())
            .wrap(
                RateLimiter::new(MemoryStoreActor::from(store.clone()).start())
                    .with_interval(Duration::from_secs(CONFIG.rate_limit.interval_seconds))
                    .with_max_requests(CONFIG.rate_limit.max_requests),
            )
            .configure(api::health::api_config)
            .service(
                web::scope("/api")
                    .configure(api::accounts::api_config)
                    .configure(api::affiliates::api_config)
                    .configure(api::challenges::api_config)
                    .configure(api::email::api_config)
                    .configure(api::notifications::api_config)
                    .configure(api::support::api_config)
                    .configure(api::users::api_config),
            )
    })
    .bind(&CONFIG.server.address)?
    .run()
    .await
}
