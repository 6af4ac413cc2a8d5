use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect,
    Value,
    sea_query::{Expr, OnConflict},
};

use crate::{
    entities::{film, mark},
    error::{AppError, AppResult},
};

/// Stores a user's 1-10 mark for a film, overwriting any previous mark for
/// the same (film, user) pair, and refreshes the film's derived rating.
pub async fn upsert<C: ConnectionTrait>(
    db: &C,
    film_id: i32,
    user_id: i32,
    value: i32,
) -> AppResult<()> {
    let model = mark::ActiveModel {
        film_id: Set(film_id),
        user_id: Set(user_id),
        value: Set(value),
    };
    mark::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([mark::Column::FilmId, mark::Column::UserId])
                .update_column(mark::Column::Value)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    recompute_rate(db, film_id).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, film_id: i32, user_id: i32) -> AppResult<()> {
    let res = mark::Entity::delete_many()
        .filter(mark::Column::FilmId.eq(film_id))
        .filter(mark::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::not_found("mark", film_id));
    }
    recompute_rate(db, film_id).await
}

/// Rewrites the film's rating as the mean of its current marks, NULL when
/// no marks remain. Must run on the same connection as the mark mutation
/// that triggered it so both commit together.
async fn recompute_rate<C: ConnectionTrait>(db: &C, film_id: i32) -> AppResult<()> {
    let values: Vec<i32> = mark::Entity::find()
        .select_only()
        .column(mark::Column::Value)
        .filter(mark::Column::FilmId.eq(film_id))
        .into_tuple()
        .all(db)
        .await?;

    let rate = if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<i32>() as f64 / values.len() as f64)
    };

    film::Entity::update_many()
        .col_expr(film::Column::Rate, Expr::value(Value::Double(rate)))
        .filter(film::Column::FilmId.eq(film_id))
        .exec(db)
        .await?;

    Ok(())
}
