//! Router configuration for the HTTP API.
//!
//! The unversioned routes keep the paths existing clients call; the `/v1`
//! tree adds plain CRUD per record kind.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::models::{Campaign, Character, Entity, Item, Shop, User};

/// Create/read/update/delete routes for one record kind.
fn crud_routes<E: Entity>(collection: &str) -> Router<AppState> {
    Router::new()
        .route(
            &format!("/{}", collection),
            post(handlers::create_entity::<E>),
        )
        .route(
            &format!("/{}/{{id}}", collection),
            get(handlers::get_entity::<E>)
                .put(handlers::update_entity::<E>)
                .delete(handlers::delete_entity::<E>),
        )
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .merge(crud_routes::<User>("users"))
        .merge(crud_routes::<Campaign>("campaigns"))
        .merge(crud_routes::<Character>("characters"))
        .merge(crud_routes::<Shop>("shops"))
        .merge(crud_routes::<Item>("items"))
        .route("/users/{id}/campaigns", get(handlers::list_user_campaigns))
        .route("/users/{id}/characters", get(handlers::list_user_characters))
        .route("/shops/{id}/items", get(handlers::list_shop_items))
        .route("/campaigns/{id}/shops", get(handlers::list_campaign_shops));

    Router::new()
        .route("/health", get(handlers::health_check))
        // existing clients send the body with GET; POST is accepted too
        .route(
            "/get-campaign-shops",
            get(handlers::get_campaign_shops).post(handlers::get_campaign_shops),
        )
        .route(
            "/get-current-shop",
            get(handlers::get_current_shop).post(handlers::get_current_shop),
        )
        .nest("/v1", api_v1)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
