use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{json, Map, Value};

use crate::auth::{AuthGate, Session};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::*;
use crate::session::SessionRegistry;
use crate::store::DocumentStore;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.service(
        web::scope("/api")
            .service(web::resource("/auth").route(web::post().to(authenticate)))
            .service(web::resource("/health").route(web::get().to(health)))
            .service(web::resource("/recipes").route(web::get().to(list_recipes)))
            .service(web::resource("/recipes/{id}").route(web::put().to(update_recipe)))
            .service(
                web::resource("/prices")
                    .route(web::get().to(get_prices))
                    .route(web::put().to(update_prices)),
            ),
    );
    cfg.route("/", web::get().to(index));
}

/// Body parse failures surface as 400 with the parser's message.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        tracing::debug!("rejected request body: {err}");
        ApiError::BadRequest(err.to_string()).into()
    })
}

/// Everything the handlers share, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub sessions: SessionRegistry,
    pub auth: AuthGate,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            store: Arc::new(DocumentStore::open(&cfg.data_file)),
            sessions: SessionRegistry::new(),
            auth: AuthGate::new(cfg.password.clone()),
            static_dir: cfg.static_dir.clone(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Session token issued", body = AuthResponse),
        (status = 401, description = "Invalid password"),
        (status = 400, description = "Malformed body")
    )
)]
pub async fn authenticate(data: web::Data<AppState>, payload: web::Json<Map<String, Value>>) -> Result<HttpResponse, ApiError> {
    let request = AuthRequest::from(payload.into_inner());
    let token = data.auth.authenticate(request.password(), &data.sessions)?;
    Ok(HttpResponse::Ok().json(AuthResponse { success: true, token }))
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    responses(
        (status = 200, description = "All recipes, in stored order"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_recipes(_session: Session, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(json!({ "recipes": data.store.recipes() })))
}

#[utoipa::path(
    get,
    path = "/api/prices",
    responses(
        (status = 200, description = "Prices mapping"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_prices(_session: Session, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(data.store.prices()))
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    params(("id" = Id, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe updated"),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Recipe not found"),
        (status = 500, description = "Save failed")
    )
)]
pub async fn update_recipe(
    _session: Session,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<RecipePatch>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let recipe = data.store.update_recipe(id, &payload)?;
    tracing::info!(id, "recipe updated");
    Ok(HttpResponse::Ok().json(json!({ "success": true, "recipe": recipe })))
}

#[utoipa::path(
    put,
    path = "/api/prices",
    responses(
        (status = 200, description = "Prices replaced"),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Save failed")
    )
)]
pub async fn update_prices(
    _session: Session,
    data: web::Data<AppState>,
    payload: web::Json<Prices>,
) -> Result<HttpResponse, ApiError> {
    let prices = data.store.replace_prices(payload.into_inner())?;
    tracing::info!(entries = prices.len(), "prices replaced");
    Ok(HttpResponse::Ok().json(json!({ "success": true, "prices": prices })))
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "ok".into(), timestamp: chrono::Utc::now().to_rfc3339() })
}

/// Serve the front end's entry document from the static directory.
pub async fn index(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let path = data.static_dir.join("index.html");
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(HttpResponse::Ok().content_type(mime::TEXT_HTML_UTF_8).body(bytes)),
        Err(e) => {
            tracing::warn!(path = %path.display(), "index document unavailable: {e}");
            Err(ApiError::NotFound)
        }
    }
}
