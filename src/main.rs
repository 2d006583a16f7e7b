use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;

use taskledger::{config::Config, routes, state::AppState, store::PgStore};

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let bind_addr = (config.server_host.clone(), config.server_port);
    let server_url = config.server_url();

    let state = match config.database_url.clone() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await
                .map_err(startup_error)?;
            PgStore::new(pool.clone())
                .migrate()
                .await
                .map_err(startup_error)?;
            log::info!("Database connected successfully");
            AppState::postgres(pool, config)
        }
        None => {
            log::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            AppState::in_memory(config)
        }
    };
    let state = web::Data::new(state);

    log::info!("Starting TaskLedger server at {}", server_url);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind(bind_addr)?
    .run()
    .await
}
