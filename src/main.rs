mod card;
mod classify;
mod config;
mod format;
mod hooks;
mod http;
mod payload;
mod relay;
mod signature;
mod targets;
mod transform;

use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use color_eyre::eyre::{self, WrapErr as _};

use crate::{relay::HttpRelay, targets::Targets};

#[actix_web::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install()?;
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(tracing_subscriber::fmt().finish())?;

    let config::Config {
        bind,
        targets,
        webhook_secret,
        relay_timeout_secs,
        max_payload_bytes,
    } = config::Config::from_env()?;

    let targets = web::Data::new(
        Targets::from_entries(&targets).wrap_err("Failed to parse HOOKCARD_TARGETS")?,
    );
    if targets.is_empty() {
        tracing::warn!("No webhook targets configured, every delivery will get 404");
    }
    let webhook_key = webhook_secret.map(|secret| secret.unsecure().to_vec());
    if webhook_key.is_none() {
        tracing::warn!("HOOKCARD_WEBHOOK_SECRET is not set, deliveries are not authenticated");
    }
    let relay_timeout = Duration::from_secs(relay_timeout_secs);

    tracing::info!(
        bind = bind.as_str(),
        targets = targets.len(),
        "Starting webhook relay"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(targets.clone())
            .data(HttpRelay::new(relay_timeout))
            .app_data(http::WebhookConfig::new(webhook_key.clone()))
            .app_data(web::PayloadConfig::new(max_payload_bytes))
            .wrap(Logger::default())
            .route(
                "/gh/webhook/{id}",
                web::post().to(hooks::relay_hook::<Targets, HttpRelay>),
            )
            .route(
                "/gh/webhook/",
                web::post().to(hooks::relay_hook::<Targets, HttpRelay>),
            )
    })
    .bind(bind.as_str())?
    .run()
    .await
    .map_err(Into::into)
}
