use std::collections::{BTreeSet, HashSet};

use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::{debug, info};

use crate::{
    entities::{director, film, film_director, film_genre, genre, like, mark, mpa},
    error::{AppError, AppResult},
    feed, likes, marks,
    models::{EventType, Film, FilmPayload, Operation, SearchField, SortBy},
    query, users,
};

/// Orchestrates film storage, the like/mark relation stores, rating
/// recomputation and the activity feed. One transaction per mutating
/// operation; a mark write and its rating recomputation always commit
/// together.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Film>> {
        let rows = film::Entity::find().all(&self.db).await?;
        debug!(count = rows.len(), "films listed");
        query::load_films(&self.db, rows).await
    }

    pub async fn create(&self, payload: FilmPayload) -> AppResult<Film> {
        let txn = self.db.begin().await?;
        check_mpa(&txn, payload.mpa.id).await?;
        let model = film::ActiveModel {
            film_id: Default::default(),
            name: Set(payload.name.clone()),
            description: Set(payload.description.clone()),
            release_date: Set(payload.release_date.to_string()),
            duration: Set(payload.duration),
            mpa_id: Set(payload.mpa.id),
            rate: Set(None),
        };
        let res = film::Entity::insert(model).exec(&txn).await?;
        let film_id = res.last_insert_id;
        replace_links(&txn, film_id, &payload).await?;
        txn.commit().await?;
        info!(film_id, name = %payload.name, "film created");
        self.get(film_id).await
    }

    pub async fn update(&self, payload: FilmPayload) -> AppResult<Film> {
        let film_id = payload.id.ok_or_else(|| AppError::invalid("id", "null"))?;
        let txn = self.db.begin().await?;
        check_film(&txn, film_id).await?;
        check_mpa(&txn, payload.mpa.id).await?;
        let model = film::ActiveModel {
            film_id: Set(film_id),
            name: Set(payload.name.clone()),
            description: Set(payload.description.clone()),
            release_date: Set(payload.release_date.to_string()),
            duration: Set(payload.duration),
            mpa_id: Set(payload.mpa.id),
            // derived from marks, not part of the caller-owned attributes
            rate: NotSet,
        };
        film::Entity::update(model).exec(&txn).await?;
        replace_links(&txn, film_id, &payload).await?;
        txn.commit().await?;
        info!(film_id, name = %payload.name, "film updated");
        self.get(film_id).await
    }

    pub async fn get(&self, id: i32) -> AppResult<Film> {
        let row = film::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("film", id))?;
        let mut films = query::load_films(&self.db, vec![row]).await?;
        films.pop().ok_or_else(|| AppError::not_found("film", id))
    }

    /// Removes a film together with its marks, likes and genre/director
    /// links. Feed history referencing the film is retained.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let deleted = film::Entity::delete_by_id(id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(AppError::not_found("film", id));
        }
        like::Entity::delete_many().filter(like::Column::FilmId.eq(id)).exec(&txn).await?;
        mark::Entity::delete_many().filter(mark::Column::FilmId.eq(id)).exec(&txn).await?;
        film_genre::Entity::delete_many()
            .filter(film_genre::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        film_director::Entity::delete_many()
            .filter(film_director::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        info!(film_id = id, "film deleted");
        Ok(())
    }

    pub async fn put_like(&self, film_id: i32, user_id: i32) -> AppResult<()> {
        self.check_user_and_film(user_id, film_id).await?;
        let txn = self.db.begin().await?;
        likes::put(&txn, film_id, user_id).await?;
        feed::record(&txn, user_id, film_id, EventType::Like, Operation::Add).await?;
        txn.commit().await?;
        info!(film_id, user_id, "like added");
        Ok(())
    }

    pub async fn delete_like(&self, film_id: i32, user_id: i32) -> AppResult<()> {
        self.check_user_and_film(user_id, film_id).await?;
        let txn = self.db.begin().await?;
        // event recorded only once the relation is actually gone
        likes::delete(&txn, film_id, user_id).await?;
        feed::record(&txn, user_id, film_id, EventType::Like, Operation::Remove).await?;
        txn.commit().await?;
        info!(film_id, user_id, "like removed");
        Ok(())
    }

    pub async fn put_mark(&self, film_id: i32, user_id: i32, value: i32) -> AppResult<()> {
        if !(1..=10).contains(&value) {
            return Err(AppError::invalid("mark", value));
        }
        self.check_user_and_film(user_id, film_id).await?;
        let txn = self.db.begin().await?;
        marks::upsert(&txn, film_id, user_id, value).await?;
        feed::record(&txn, user_id, film_id, EventType::Mark, Operation::Add).await?;
        txn.commit().await?;
        info!(film_id, user_id, value, "mark set");
        Ok(())
    }

    pub async fn delete_mark(&self, film_id: i32, user_id: i32) -> AppResult<()> {
        self.check_user_and_film(user_id, film_id).await?;
        let txn = self.db.begin().await?;
        marks::delete(&txn, film_id, user_id).await?;
        feed::record(&txn, user_id, film_id, EventType::Mark, Operation::Remove).await?;
        txn.commit().await?;
        info!(film_id, user_id, "mark removed");
        Ok(())
    }

    pub async fn get_popular(
        &self,
        count: u64,
        genre_id: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<Film>> {
        if let Some(year) = year {
            if year < 0 {
                return Err(AppError::invalid("year", year));
            }
        }
        let rows = query::popular(&self.db, count, genre_id, year).await?;
        query::load_films(&self.db, rows).await
    }

    pub async fn get_by_director(&self, director_id: i32, sort_by: &str) -> AppResult<Vec<Film>> {
        let sort =
            SortBy::parse(sort_by).ok_or_else(|| AppError::invalid("sortBy", sort_by))?;
        if director::Entity::find_by_id(director_id).one(&self.db).await?.is_none() {
            return Err(AppError::not_found("director", director_id));
        }
        let rows = query::by_director(&self.db, director_id, sort).await?;
        query::load_films(&self.db, rows).await
    }

    pub async fn get_common_films(&self, user_id: i32, friend_id: i32) -> AppResult<Vec<Film>> {
        self.check_user(user_id).await?;
        self.check_user(friend_id).await?;
        let rows = query::common(&self.db, user_id, friend_id).await?;
        query::load_films(&self.db, rows).await
    }

    pub async fn search(&self, text: &str, by: &[String]) -> AppResult<Vec<Film>> {
        let mut fields = HashSet::new();
        for token in by {
            let field = SearchField::parse(token)
                .ok_or_else(|| AppError::invalid("by", token))?;
            fields.insert(field);
        }
        if fields.is_empty() {
            return Err(AppError::invalid("by", "empty"));
        }
        debug!(query = %text, fields = by.len(), "searching films");
        let rows = query::search(&self.db, text, &fields).await?;
        query::load_films(&self.db, rows).await
    }

    async fn check_user(&self, id: i32) -> AppResult<()> {
        if !users::exists(&self.db, id).await? {
            return Err(AppError::not_found("user", id));
        }
        Ok(())
    }

    // user existence is checked before the film's
    async fn check_user_and_film(&self, user_id: i32, film_id: i32) -> AppResult<()> {
        self.check_user(user_id).await?;
        check_film(&self.db, film_id).await
    }
}

async fn check_film<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    if film::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(AppError::not_found("film", id));
    }
    Ok(())
}

async fn check_mpa<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    if mpa::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(AppError::not_found("mpa", id));
    }
    Ok(())
}

/// Rewrites a film's genre and director links from the payload's declared
/// sets, verifying every referenced id first. Duplicate references collapse
/// into one link.
async fn replace_links<C: ConnectionTrait>(
    db: &C,
    film_id: i32,
    payload: &FilmPayload,
) -> AppResult<()> {
    let genre_ids: BTreeSet<i32> = payload.genres.iter().map(|g| g.id).collect();
    let director_ids: BTreeSet<i32> = payload.directors.iter().map(|d| d.id).collect();

    if !genre_ids.is_empty() {
        let found: HashSet<i32> = genre::Entity::find()
            .filter(genre::Column::GenreId.is_in(genre_ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|g| g.genre_id)
            .collect();
        if let Some(missing) = genre_ids.iter().find(|id| !found.contains(id)) {
            return Err(AppError::not_found("genre", *missing));
        }
    }
    if !director_ids.is_empty() {
        let found: HashSet<i32> = director::Entity::find()
            .filter(director::Column::DirectorId.is_in(director_ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|d| d.director_id)
            .collect();
        if let Some(missing) = director_ids.iter().find(|id| !found.contains(id)) {
            return Err(AppError::not_found("director", *missing));
        }
    }

    film_genre::Entity::delete_many()
        .filter(film_genre::Column::FilmId.eq(film_id))
        .exec(db)
        .await?;
    film_director::Entity::delete_many()
        .filter(film_director::Column::FilmId.eq(film_id))
        .exec(db)
        .await?;

    for genre_id in genre_ids {
        let link = film_genre::ActiveModel { film_id: Set(film_id), genre_id: Set(genre_id) };
        film_genre::Entity::insert(link).exec_without_returning(db).await?;
    }
    for director_id in director_ids {
        let link =
            film_director::ActiveModel { film_id: Set(film_id), director_id: Set(director_id) };
        film_director::Entity::insert(link).exec_without_returning(db).await?;
    }

    Ok(())
}
