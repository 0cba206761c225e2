use actix_web::{web, App, HttpServer, middleware::Compress};
use anyhow::Context;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi; // bring trait into scope for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use pantry::openapi::ApiDoc;
use pantry::{config, cors, AppState, Config, SecurityHeaders};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env automatically only in debug builds; deployments set the environment themselves.
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    let cfg = Config::from_env().context("invalid configuration")?;

    let level = if cfg.mode.is_production() { Level::INFO } else { Level::DEBUG };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!(mode = ?cfg.mode, data_file = %cfg.data_file.display(), "bootstrapping pantry server");

    let state = web::Data::new(AppState::from_config(&cfg));
    let security = SecurityHeaders::from_config(&cfg);
    let openapi = ApiDoc::openapi();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Compress::default())
            .wrap(security.clone())
            .wrap(cors())
            .app_data(state.clone())
            .configure(config)
            .service(SwaggerUi::new("/docs/{_:.*}").url("/docs/openapi.json", openapi.clone()))
    })
    .bind(("0.0.0.0", cfg.port))
    .with_context(|| format!("failed to bind port {}", cfg.port))?;

    info!("Listening on http://0.0.0.0:{}", cfg.port);

    server.run().await?;
    Ok(())
}
