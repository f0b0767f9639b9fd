use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use product_catalog::ai::create_ai_service;
use product_catalog::config::ServerConfig;
use product_catalog::db::establish_connection_pool;
use product_catalog::repository::DieselRepository;
use product_catalog::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let ai = match create_ai_service(&config.ai) {
        Ok(ai) => web::Data::from(ai),
        Err(e) => {
            log::error!("Failed to initialize AI service: {e}");
            std::process::exit(1);
        }
    };

    log::info!("Listening on {}:{}", config.address, config.port);

    let cors_origins = config.cors_origins.clone();

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(middleware::Compress::default())
            .wrap(routes::cors(&cors_origins))
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(ai.clone())
            .configure(routes::configure)
    });

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server.bind((config.address.as_str(), config.port))?.run().await
}
