//! Read-only projections over films, marks, likes and association tables.
//! Each listing is one bounded query; enrichment is a secondary batched
//! pass, never a per-film round trip.

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, Order, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
    sea_query::{Condition, Expr, Func, NullOrdering, Query as SeaQuery, SelectStatement},
};

use crate::{
    entities::{director, film, film_director, film_genre, genre, like, mpa},
    error::{AppError, AppResult},
    models::{Director, Film, Genre, Mpa, SearchField, SortBy},
};

/// Up to `count` films ranked by descending derived rating, unrated films
/// last, ascending id as the deterministic tiebreak. Optional genre and
/// release-year filters.
pub async fn popular<C: ConnectionTrait>(
    db: &C,
    count: u64,
    genre_id: Option<i32>,
    year: Option<i32>,
) -> AppResult<Vec<film::Model>> {
    let mut query = film::Entity::find();
    if let Some(genre_id) = genre_id {
        query = query
            .join(JoinType::InnerJoin, film::Relation::FilmGenres.def())
            .filter(film_genre::Column::GenreId.eq(genre_id));
    }
    if let Some(year) = year {
        // release dates are ISO strings, so a year filter is a prefix match
        query = query.filter(film::Column::ReleaseDate.like(format!("{year}-%")));
    }
    let rows = query
        .order_by_with_nulls(film::Column::Rate, Order::Desc, NullOrdering::Last)
        .order_by_asc(film::Column::FilmId)
        .limit(count)
        .all(db)
        .await?;
    Ok(rows)
}

/// Films carrying the given director, ordered by release date or by like
/// count depending on the requested dimension.
pub async fn by_director<C: ConnectionTrait>(
    db: &C,
    director_id: i32,
    sort: SortBy,
) -> AppResult<Vec<film::Model>> {
    let base = film::Entity::find()
        .join(JoinType::InnerJoin, film::Relation::FilmDirectors.def())
        .filter(film_director::Column::DirectorId.eq(director_id));

    let rows = match sort {
        SortBy::Year => {
            base.order_by_asc(film::Column::ReleaseDate)
                .order_by_asc(film::Column::FilmId)
                .all(db)
                .await?
        },
        SortBy::Likes => {
            base.join(JoinType::LeftJoin, film::Relation::Likes.def())
                .group_by(film::Column::FilmId)
                .order_by_desc(like::Column::UserId.count())
                .order_by_asc(film::Column::FilmId)
                .all(db)
                .await?
        },
    };
    Ok(rows)
}

/// Case-insensitive substring search over film titles and/or director
/// names; a film matching on both dimensions appears once.
pub async fn search<C: ConnectionTrait>(
    db: &C,
    text: &str,
    fields: &HashSet<SearchField>,
) -> AppResult<Vec<film::Model>> {
    let pattern = format!("%{}%", text.to_lowercase());

    let mut cond = Condition::any();
    if fields.contains(&SearchField::Title) {
        cond = cond.add(
            Expr::expr(Func::lower(Expr::col((film::Entity, film::Column::Name))))
                .like(pattern.clone()),
        );
    }
    if fields.contains(&SearchField::Director) {
        cond = cond.add(
            Expr::expr(Func::lower(Expr::col((director::Entity, director::Column::Name))))
                .like(pattern.clone()),
        );
    }

    let rows = film::Entity::find()
        .join(JoinType::LeftJoin, film::Relation::FilmDirectors.def())
        .join(JoinType::LeftJoin, film_director::Relation::Director.def())
        .filter(cond)
        .distinct()
        .order_by_with_nulls(film::Column::Rate, Order::Desc, NullOrdering::Last)
        .order_by_asc(film::Column::FilmId)
        .all(db)
        .await?;
    Ok(rows)
}

/// Films liked by both users, most popular first.
pub async fn common<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    friend_id: i32,
) -> AppResult<Vec<film::Model>> {
    let rows = film::Entity::find()
        .filter(film::Column::FilmId.in_subquery(liked_by(user_id)))
        .filter(film::Column::FilmId.in_subquery(liked_by(friend_id)))
        .order_by_with_nulls(film::Column::Rate, Order::Desc, NullOrdering::Last)
        .order_by_asc(film::Column::FilmId)
        .all(db)
        .await?;
    Ok(rows)
}

fn liked_by(user_id: i32) -> SelectStatement {
    SeaQuery::select()
        .column(like::Column::FilmId)
        .from(like::Entity)
        .and_where(like::Column::UserId.eq(user_id))
        .to_owned()
}

/// Turns raw film rows into enriched models, preserving row order. One
/// batched lookup per association kind regardless of result size.
pub async fn load_films<C: ConnectionTrait>(
    db: &C,
    rows: Vec<film::Model>,
) -> AppResult<Vec<Film>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|f| f.film_id).collect();

    let mut genres: HashMap<i32, Vec<Genre>> = HashMap::new();
    for (link, found) in film_genre::Entity::find()
        .filter(film_genre::Column::FilmId.is_in(ids.clone()))
        .find_also_related(genre::Entity)
        .order_by_asc(film_genre::Column::GenreId)
        .all(db)
        .await?
    {
        if let Some(g) = found {
            genres
                .entry(link.film_id)
                .or_default()
                .push(Genre { id: g.genre_id, name: g.name });
        }
    }

    let mut directors: HashMap<i32, Vec<Director>> = HashMap::new();
    for (link, found) in film_director::Entity::find()
        .filter(film_director::Column::FilmId.is_in(ids))
        .find_also_related(director::Entity)
        .order_by_asc(film_director::Column::DirectorId)
        .all(db)
        .await?
    {
        if let Some(d) = found {
            directors
                .entry(link.film_id)
                .or_default()
                .push(Director { id: d.director_id, name: d.name });
        }
    }

    let mpa_ids: Vec<i32> = rows.iter().map(|f| f.mpa_id).collect();
    let mpa_by_id: HashMap<i32, Mpa> = mpa::Entity::find()
        .filter(mpa::Column::MpaId.is_in(mpa_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.mpa_id, Mpa { id: m.mpa_id, name: m.name }))
        .collect();

    rows.into_iter()
        .map(|row| {
            let release_date = row
                .release_date
                .parse()
                .map_err(|_| AppError::invalid("releaseDate", &row.release_date))?;
            let mpa = mpa_by_id
                .get(&row.mpa_id)
                .cloned()
                .ok_or_else(|| AppError::not_found("mpa", row.mpa_id))?;
            Ok(Film {
                id: row.film_id,
                name: row.name,
                description: row.description,
                release_date,
                duration: row.duration,
                mpa,
                rate: row.rate,
                genres: genres.remove(&row.film_id).unwrap_or_default(),
                directors: directors.remove(&row.film_id).unwrap_or_default(),
            })
        })
        .collect()
}
