pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod feed;
pub mod likes;
pub mod marks;
pub mod models;
pub mod query;
pub mod refdata;
pub mod routes;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::Catalog, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
    pub catalog: Catalog,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/films",
            get(routes::list_films).post(routes::create_film).put(routes::update_film),
        )
        .route("/films/popular", get(routes::popular_films))
        .route("/films/common", get(routes::common_films))
        .route("/films/search", get(routes::search_films))
        .route("/films/director/{director_id}", get(routes::films_by_director))
        .route("/films/{film_id}", get(routes::get_film).delete(routes::delete_film))
        .route("/films/{film_id}/like/{user_id}", put(routes::put_like).delete(routes::delete_like))
        .route("/films/{film_id}/mark/{user_id}/{mark}", put(routes::put_mark))
        .route("/films/{film_id}/mark/{user_id}", delete(routes::delete_mark))
        .route("/users", post(routes::create_user))
        .route("/users/{user_id}", get(routes::get_user))
        .route("/users/{user_id}/feed", get(routes::user_feed))
        .route("/genres", get(routes::list_genres))
        .route("/genres/{genre_id}", get(routes::get_genre))
        .route("/mpa", get(routes::list_mpa))
        .route("/mpa/{mpa_id}", get(routes::get_mpa))
        .route("/directors", get(routes::list_directors).post(routes::create_director))
        .route("/directors/{director_id}", get(routes::get_director))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
