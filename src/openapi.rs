use crate::models::{AuthRequest, AuthResponse, HealthResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::authenticate,
        crate::routes::list_recipes,
        crate::routes::get_prices,
        crate::routes::update_recipe,
        crate::routes::update_prices,
        crate::routes::health,
    ),
    components(schemas(AuthRequest, AuthResponse, HealthResponse)),
    tags(
        (name = "recipes", description = "Recipe and price operations"),
    )
)]
pub struct ApiDoc;
