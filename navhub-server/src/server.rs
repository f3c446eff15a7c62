use actix_web::{App, HttpServer, web};
use anyhow::Context;
use navhub_weather::{Config, WeatherLookup};
use tracing::info;

use crate::routes;

/// Bind the configured address and serve until shutdown (Ctrl-C / SIGTERM).
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let lookup = web::Data::new(WeatherLookup::from_config(&config.providers)?);
    let bind = config.bind_address();

    info!(%bind, "Starting navhub server");

    HttpServer::new(move || {
        App::new()
            .app_data(lookup.clone())
            .configure(routes::configure)
    })
    .bind(&bind)
    .with_context(|| format!("Failed to bind {bind}"))?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    info!("navhub server stopped");
    Ok(())
}
