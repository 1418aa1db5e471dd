mod config;
mod databases;
mod error;
mod routes;
mod services;
mod state;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::{error, warn};

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();

    let pool = match config.database_url.as_deref() {
        Some(url) => match databases::setup_backend(url).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                error!("database setup failed: {:#}", e);
                None
            }
        },
        None => {
            warn!("DATABASE_URL is not set; registration will report a configuration error");
            None
        }
    };

    if config.smtp.is_none() {
        warn!("SMTP settings are not set; verification emails will be skipped");
    }

    let port = config.port;
    let app_state = web::Data::new(AppState::new(pool, config));

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .route("/health", web::get().to(routes::health_check))
            .configure(routes::register::init)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
