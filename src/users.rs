use sea_orm::{ActiveValue::Set, ConnectionTrait, EntityTrait};
use tracing::info;

use crate::{
    entities::user,
    error::{AppError, AppResult},
    feed,
    models::{FeedEvent, User, UserPayload},
};

pub async fn create<C: ConnectionTrait>(db: &C, payload: UserPayload) -> AppResult<User> {
    // Blank display name falls back to the login.
    let name = match payload.name {
        Some(n) if !n.trim().is_empty() => n,
        _ => payload.login.clone(),
    };
    let model = user::ActiveModel {
        user_id: Default::default(),
        email: Set(payload.email),
        login: Set(payload.login),
        name: Set(name),
        birthday: Set(payload.birthday.to_string()),
    };
    let res = user::Entity::insert(model).exec(db).await?;
    info!(user_id = res.last_insert_id, "user created");
    get(db, res.last_insert_id).await
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<User> {
    let row = user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("user", id))?;
    to_model(row)
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    Ok(user::Entity::find_by_id(id).one(db).await?.is_some())
}

/// The user's activity feed, oldest event first. The user must exist.
pub async fn feed<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Vec<FeedEvent>> {
    if !exists(db, id).await? {
        return Err(AppError::not_found("user", id));
    }
    feed::find_for_user(db, id).await
}

fn to_model(row: user::Model) -> AppResult<User> {
    let birthday = row
        .birthday
        .parse()
        .map_err(|_| AppError::invalid("birthday", &row.birthday))?;
    Ok(User {
        id: row.user_id,
        email: row.email,
        login: row.login,
        name: row.name,
        birthday,
    })
}
