pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod openapi;
pub mod queries;
pub mod routes;
pub mod sdk;

use std::sync::Arc;

use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/movies", get(routes::list_movies))
        .route("/movies/{movie_id}", get(routes::read_movie))
        .route("/ratings", get(routes::list_ratings))
        .route("/ratings/{user_id}/{movie_id}", get(routes::read_rating))
        .route("/tags", get(routes::list_tags))
        .route("/tags/{user_id}/{movie_id}/{tag_text}", get(routes::read_tag))
        .route("/links", get(routes::list_links))
        .route("/links/{movie_id}", get(routes::read_link))
        .route("/analytics", get(routes::analytics))
        .route("/openapi.json", get(openapi::openapi_json))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
