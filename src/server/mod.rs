pub mod handlers;
pub mod page;

use crate::{
    config::Config,
    error::Result,
    logger,
    openai::{ImageClient, ImageGenerator},
    session::SessionStore,
};
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;

pub use handlers::SESSION_COOKIE;

pub struct AppState {
    pub generator: Arc<dyn ImageGenerator>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            generator,
            sessions: SessionStore::new(),
        }
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let client = ImageClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/generate", web::post().to(handlers::generate))
        .route("/download", web::get().to(handlers::download))
        .route("/health", web::get().to(handlers::health));
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let port = config.port();
    let state = AppState::from_config(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let state = web::Data::new(state);

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
