use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Director, DirectorPayload, FeedEvent, Film, FilmPayload, Genre, Mpa, User, UserPayload},
    refdata, users,
};

pub async fn list_films(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(state.catalog.list_all().await?))
}

pub async fn create_film(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FilmPayload>,
) -> AppResult<Json<Film>> {
    validate_film(&payload)?;
    Ok(Json(state.catalog.create(payload).await?))
}

pub async fn update_film(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FilmPayload>,
) -> AppResult<Json<Film>> {
    validate_film(&payload)?;
    Ok(Json(state.catalog.update(payload).await?))
}

pub async fn get_film(
    State(state): State<Arc<AppState>>,
    Path(film_id): Path<i32>,
) -> AppResult<Json<Film>> {
    Ok(Json(state.catalog.get(film_id).await?))
}

pub async fn delete_film(
    State(state): State<Arc<AppState>>,
    Path(film_id): Path<i32>,
) -> AppResult<()> {
    state.catalog.delete(film_id).await
}

pub async fn put_like(
    State(state): State<Arc<AppState>>,
    Path((film_id, user_id)): Path<(i32, i32)>,
) -> AppResult<()> {
    state.catalog.put_like(film_id, user_id).await
}

pub async fn delete_like(
    State(state): State<Arc<AppState>>,
    Path((film_id, user_id)): Path<(i32, i32)>,
) -> AppResult<()> {
    state.catalog.delete_like(film_id, user_id).await
}

pub async fn put_mark(
    State(state): State<Arc<AppState>>,
    Path((film_id, user_id, mark)): Path<(i32, i32, i32)>,
) -> AppResult<()> {
    if !(1..=10).contains(&mark) {
        return Err(AppError::invalid("mark", mark));
    }
    state.catalog.put_mark(film_id, user_id, mark).await
}

pub async fn delete_mark(
    State(state): State<Arc<AppState>>,
    Path((film_id, user_id)): Path<(i32, i32)>,
) -> AppResult<()> {
    state.catalog.delete_mark(film_id, user_id).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularQuery {
    count: Option<u64>,
    genre_id: Option<i32>,
    year: Option<i32>,
}

pub async fn popular_films(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PopularQuery>,
) -> AppResult<Json<Vec<Film>>> {
    let count = q.count.unwrap_or(10);
    if count == 0 {
        return Err(AppError::invalid("count", count));
    }
    if let Some(year) = q.year {
        if year < 1895 {
            return Err(AppError::invalid("year", year));
        }
    }
    Ok(Json(state.catalog.get_popular(count, q.genre_id, q.year).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonQuery {
    user_id: i32,
    friend_id: i32,
}

pub async fn common_films(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CommonQuery>,
) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(state.catalog.get_common_films(q.user_id, q.friend_id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorSortQuery {
    sort_by: String,
}

pub async fn films_by_director(
    State(state): State<Arc<AppState>>,
    Path(director_id): Path<i32>,
    Query(q): Query<DirectorSortQuery>,
) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(state.catalog.get_by_director(director_id, &q.sort_by).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: String,
    by: String,
}

pub async fn search_films(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<Vec<Film>>> {
    let by: Vec<String> =
        q.by.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
    Ok(Json(state.catalog.search(&q.query, &by).await?))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserPayload>,
) -> AppResult<Json<User>> {
    validate_user(&payload)?;
    Ok(Json(users::create(&state.db, payload).await?))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<User>> {
    Ok(Json(users::get(&state.db, user_id).await?))
}

pub async fn user_feed(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<FeedEvent>>> {
    Ok(Json(users::feed(&state.db, user_id).await?))
}

pub async fn list_genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(refdata::list_genres(&state.db).await?))
}

pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    Path(genre_id): Path<i32>,
) -> AppResult<Json<Genre>> {
    Ok(Json(refdata::get_genre(&state.db, genre_id).await?))
}

pub async fn list_mpa(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Mpa>>> {
    Ok(Json(refdata::list_mpa(&state.db).await?))
}

pub async fn get_mpa(
    State(state): State<Arc<AppState>>,
    Path(mpa_id): Path<i32>,
) -> AppResult<Json<Mpa>> {
    Ok(Json(refdata::get_mpa(&state.db, mpa_id).await?))
}

pub async fn create_director(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DirectorPayload>,
) -> AppResult<Json<Director>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::invalid("name", &payload.name));
    }
    Ok(Json(refdata::create_director(&state.db, payload).await?))
}

pub async fn list_directors(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Director>>> {
    Ok(Json(refdata::list_directors(&state.db).await?))
}

pub async fn get_director(
    State(state): State<Arc<AppState>>,
    Path(director_id): Path<i32>,
) -> AppResult<Json<Director>> {
    Ok(Json(refdata::get_director(&state.db, director_id).await?))
}

// Request-shape rules enforced before payloads reach the catalog core.

const FIRST_FILM: jiff::civil::Date = jiff::civil::Date::constant(1895, 12, 28);

fn validate_film(payload: &FilmPayload) -> AppResult<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::invalid("name", &payload.name));
    }
    if payload.description.chars().count() > 200 {
        return Err(AppError::invalid("description", payload.description.chars().count()));
    }
    if payload.release_date < FIRST_FILM {
        return Err(AppError::invalid("releaseDate", payload.release_date));
    }
    if payload.duration <= 0 {
        return Err(AppError::invalid("duration", payload.duration));
    }
    Ok(())
}

fn validate_user(payload: &UserPayload) -> AppResult<()> {
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::invalid("email", &payload.email));
    }
    if payload.login.trim().is_empty() || payload.login.contains(' ') {
        return Err(AppError::invalid("login", &payload.login));
    }
    let today: jiff::civil::Date = jiff::Zoned::now().into();
    if payload.birthday > today {
        return Err(AppError::invalid("birthday", payload.birthday));
    }
    Ok(())
}
