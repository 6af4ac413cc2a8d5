//! Reference entities: genres and MPA ratings are fixed sets seeded by
//! migration; directors are created by callers and referenced from films.

use sea_orm::{ActiveValue::Set, ConnectionTrait, EntityTrait, QueryOrder};
use tracing::info;

use crate::{
    entities::{director, genre, mpa},
    error::{AppError, AppResult},
    models::{Director, DirectorPayload, Genre, Mpa},
};

pub async fn list_genres<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Genre>> {
    let rows = genre::Entity::find()
        .order_by_asc(genre::Column::GenreId)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|g| Genre { id: g.genre_id, name: g.name }).collect())
}

pub async fn get_genre<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Genre> {
    let row = genre::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("genre", id))?;
    Ok(Genre { id: row.genre_id, name: row.name })
}

pub async fn list_mpa<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Mpa>> {
    let rows = mpa::Entity::find().order_by_asc(mpa::Column::MpaId).all(db).await?;
    Ok(rows.into_iter().map(|m| Mpa { id: m.mpa_id, name: m.name }).collect())
}

pub async fn get_mpa<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Mpa> {
    let row = mpa::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("mpa", id))?;
    Ok(Mpa { id: row.mpa_id, name: row.name })
}

pub async fn create_director<C: ConnectionTrait>(
    db: &C,
    payload: DirectorPayload,
) -> AppResult<Director> {
    let model = director::ActiveModel {
        director_id: Default::default(),
        name: Set(payload.name.clone()),
    };
    let res = director::Entity::insert(model).exec(db).await?;
    info!(director_id = res.last_insert_id, name = %payload.name, "director created");
    Ok(Director { id: res.last_insert_id, name: payload.name })
}

pub async fn list_directors<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Director>> {
    let rows = director::Entity::find()
        .order_by_asc(director::Column::DirectorId)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|d| Director { id: d.director_id, name: d.name }).collect())
}

pub async fn get_director<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Director> {
    let row = director::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("director", id))?;
    Ok(Director { id: row.director_id, name: row.name })
}
