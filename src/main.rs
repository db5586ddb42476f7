use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use taskboard::{
    auth::TokenIssuer,
    config::Config,
    routes::{self, health},
    store::{MemoryStore, PgStore},
    AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_ttl_hours);

    let state = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections)
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            AppState::new(Arc::new(store), tokens, config.bcrypt_cost)
        }
        None => {
            log::warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
            AppState::new(Arc::new(MemoryStore::new()), tokens, config.bcrypt_cost)
        }
    };

    log::info!("Starting taskboard server at {}", config.server_url());
    let cors_origin = config.cors_origin.clone();
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .configure(|cfg| state.configure(cfg))
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
