use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use std::io;

use projectdesk::{config::Config, db, routes, services::Services};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|err| {
        log::error!("invalid configuration: {}", err);
        io::Error::other(err)
    })?;

    let pool = db::connect(&config).await.map_err(|err| {
        log::error!("failed to connect to the database: {}", err);
        io::Error::other(err)
    })?;

    db::migrate(&pool).await.map_err(|err| {
        log::error!("failed to run migrations: {}", err);
        io::Error::other(err)
    })?;

    let seeded = db::seed_superuser(&pool, &config.superuser, config.bcrypt_cost)
        .await
        .map_err(|err| {
            log::error!("failed to seed the superuser: {}", err);
            io::Error::other(err)
        })?;
    if seeded {
        log::info!("created superuser {}", config.superuser.email);
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let services = Services::from_config(pool, &config);
    let max_photo_bytes = config.max_photo_bytes;

    log::info!("Starting projectdesk server at {}", config.server_url());
    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(move |cfg| routes::config(cfg, services, max_photo_bytes))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
