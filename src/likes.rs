use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    sea_query::OnConflict,
};

use crate::{
    entities::like,
    error::{AppError, AppResult},
};

/// Records that a user likes a film. The (film, user) key is unique, so a
/// repeated put collapses into the existing relation.
pub async fn put<C: ConnectionTrait>(db: &C, film_id: i32, user_id: i32) -> AppResult<()> {
    let model = like::ActiveModel { film_id: Set(film_id), user_id: Set(user_id) };
    like::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([like::Column::FilmId, like::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn delete<C: ConnectionTrait>(db: &C, film_id: i32, user_id: i32) -> AppResult<()> {
    let res = like::Entity::delete_many()
        .filter(like::Column::FilmId.eq(film_id))
        .filter(like::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::not_found("like", film_id));
    }
    Ok(())
}
