use colorgen::{config::API_KEY_ENV, logger, Config};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::config_for_build())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    if config.api_key.is_none() {
        log::warn!(
            "⚠️  {} is not set; every generation will fail until it is",
            API_KEY_ENV
        );
    }

    colorgen::server::run(config).await?;
    Ok(())
}
