use filmdex::{
    catalog::Catalog,
    error::AppError,
    models::{
        DirectorPayload, DirectorRef, EventType, Film, FilmPayload, GenreRef, MpaRef, Operation,
        UserPayload,
    },
    refdata, users,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

async fn setup() -> (DatabaseConnection, Catalog) {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await.expect("connect");
    Migrator::up(&db, None).await.expect("migrate");
    (db.clone(), Catalog::new(db))
}

async fn seed_user(db: &DatabaseConnection, login: &str) -> i32 {
    users::create(
        db,
        UserPayload {
            email: format!("{login}@example.com"),
            login: login.to_string(),
            name: None,
            birthday: jiff::civil::date(1990, 6, 15),
        },
    )
    .await
    .expect("create user")
    .id
}

async fn seed_director(db: &DatabaseConnection, name: &str) -> i32 {
    refdata::create_director(db, DirectorPayload { name: name.to_string() })
        .await
        .expect("create director")
        .id
}

fn payload(name: &str, year: i16) -> FilmPayload {
    FilmPayload {
        id: None,
        name: name.to_string(),
        description: format!("About {name}."),
        release_date: jiff::civil::date(year, 3, 1),
        duration: 120,
        mpa: MpaRef { id: 1 },
        genres: Vec::new(),
        directors: Vec::new(),
    }
}

async fn seed_film(catalog: &Catalog, name: &str, year: i16) -> i32 {
    catalog.create(payload(name, year)).await.expect("create film").id
}

fn ids(films: &[Film]) -> Vec<i32> {
    films.iter().map(|f| f.id).collect()
}

#[tokio::test]
async fn rate_follows_mark_lifecycle() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;
    let v = seed_user(&db, "v").await;
    let film = seed_film(&catalog, "Solaris", 1972).await;

    assert_eq!(catalog.get(film).await.unwrap().rate, None);

    catalog.put_mark(film, u, 8).await.unwrap();
    assert_eq!(catalog.get(film).await.unwrap().rate, Some(8.0));

    catalog.put_mark(film, v, 4).await.unwrap();
    assert_eq!(catalog.get(film).await.unwrap().rate, Some(6.0));

    catalog.delete_mark(film, u).await.unwrap();
    assert_eq!(catalog.get(film).await.unwrap().rate, Some(4.0));

    catalog.delete_mark(film, v).await.unwrap();
    assert_eq!(catalog.get(film).await.unwrap().rate, None);
}

#[tokio::test]
async fn remark_overwrites_previous_value() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;
    let film = seed_film(&catalog, "Stalker", 1979).await;

    catalog.put_mark(film, u, 3).await.unwrap();
    catalog.put_mark(film, u, 9).await.unwrap();
    assert_eq!(catalog.get(film).await.unwrap().rate, Some(9.0));

    // a single stored mark: one delete succeeds, the next finds nothing
    catalog.delete_mark(film, u).await.unwrap();
    let err = catalog.delete_mark(film, u).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "mark", .. }));
}

#[tokio::test]
async fn mark_out_of_range_rejected() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;
    let film = seed_film(&catalog, "Alien", 1979).await;

    for bad in [0, 11, -5] {
        let err = catalog.put_mark(film, u, bad).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidValue { field: "mark", .. }));
    }
    assert_eq!(catalog.get(film).await.unwrap().rate, None);
}

#[tokio::test]
async fn user_checked_before_film() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;

    let err = catalog.put_like(999, 888).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "user", .. }));

    let err = catalog.put_like(999, u).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "film", .. }));
}

#[tokio::test]
async fn popular_orders_and_limits() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;
    let v = seed_user(&db, "v").await;

    let top = seed_film(&catalog, "Top", 2000).await;
    let mid_a = seed_film(&catalog, "Mid A", 2001).await;
    let unrated = seed_film(&catalog, "Unrated", 2002).await;
    let mid_b = seed_film(&catalog, "Mid B", 2003).await;

    catalog.put_mark(top, u, 9).await.unwrap();
    catalog.put_mark(top, v, 9).await.unwrap();
    catalog.put_mark(mid_a, u, 7).await.unwrap();
    catalog.put_mark(mid_b, v, 7).await.unwrap();

    // descending rate, equal rates by ascending id, unrated last
    let all = catalog.get_popular(10, None, None).await.unwrap();
    assert_eq!(ids(&all), vec![top, mid_a, mid_b, unrated]);

    // repeated calls keep the order stable
    let again = catalog.get_popular(10, None, None).await.unwrap();
    assert_eq!(ids(&again), ids(&all));

    let two = catalog.get_popular(2, None, None).await.unwrap();
    assert_eq!(ids(&two), vec![top, mid_a]);
}

#[tokio::test]
async fn popular_filters_by_genre_and_year() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;

    let mut comedy_2000 = payload("Comedy 2000", 2000);
    comedy_2000.genres = vec![GenreRef { id: 1 }];
    let comedy_2000 = catalog.create(comedy_2000).await.unwrap().id;

    let mut drama_2000 = payload("Drama 2000", 2000);
    drama_2000.genres = vec![GenreRef { id: 2 }];
    let drama_2000 = catalog.create(drama_2000).await.unwrap().id;

    let mut comedy_2001 = payload("Comedy 2001", 2001);
    comedy_2001.genres = vec![GenreRef { id: 1 }];
    let comedy_2001 = catalog.create(comedy_2001).await.unwrap().id;

    catalog.put_mark(comedy_2001, u, 10).await.unwrap();

    let comedies = catalog.get_popular(10, Some(1), None).await.unwrap();
    assert_eq!(ids(&comedies), vec![comedy_2001, comedy_2000]);

    let comedies_2000 = catalog.get_popular(10, Some(1), Some(2000)).await.unwrap();
    assert_eq!(ids(&comedies_2000), vec![comedy_2000]);

    let year_2000 = catalog.get_popular(10, None, Some(2000)).await.unwrap();
    assert_eq!(ids(&year_2000), vec![comedy_2000, drama_2000]);
}

#[tokio::test]
async fn popular_rejects_negative_year() {
    let (_db, catalog) = setup().await;
    let err = catalog.get_popular(10, None, Some(-1)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidValue { field: "year", .. }));
}

#[tokio::test]
async fn search_unions_title_and_director_matches() {
    let (db, catalog) = setup().await;
    let scott = seed_director(&db, "Ridley Scott").await;

    let mut alien = payload("Alien", 1979);
    alien.directors = vec![DirectorRef { id: scott }];
    let alien = catalog.create(alien).await.unwrap().id;

    let pilgrim = seed_film(&catalog, "Scott Pilgrim vs. the World", 2010).await;

    // matches on both dimensions, must still appear once
    let mut great_scott = payload("Great Scott", 1995);
    great_scott.directors = vec![DirectorRef { id: scott }];
    let great_scott = catalog.create(great_scott).await.unwrap().id;

    let _solaris = seed_film(&catalog, "Solaris", 1972).await;

    let by = ["title".to_string(), "director".to_string()];
    let both = catalog.search("SCOTT", &by).await.unwrap();
    let mut found = ids(&both);
    found.sort();
    assert_eq!(found, vec![alien, pilgrim, great_scott]);
    assert_eq!(both.len(), 3, "union must not duplicate films");

    let titles = catalog.search("scott", &by[..1]).await.unwrap();
    let mut found = ids(&titles);
    found.sort();
    assert_eq!(found, vec![pilgrim, great_scott]);

    let directed = catalog.search("scott", &by[1..]).await.unwrap();
    let mut found = ids(&directed);
    found.sort();
    assert_eq!(found, vec![alien, great_scott]);

    let none = catalog.search("quentin", &by).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn search_unknown_field_rejected() {
    let (_db, catalog) = setup().await;
    let err = catalog.search("x", &["genre".to_string()]).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidValue { field: "by", .. }));

    let err = catalog.search("x", &[]).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidValue { field: "by", .. }));
}

#[tokio::test]
async fn common_films_are_symmetric_and_ranked() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;
    let v = seed_user(&db, "v").await;

    let shared_low = seed_film(&catalog, "Shared Low", 2000).await;
    let shared_high = seed_film(&catalog, "Shared High", 2001).await;
    let only_u = seed_film(&catalog, "Only U", 2002).await;

    for film in [shared_low, shared_high] {
        catalog.put_like(film, u).await.unwrap();
        catalog.put_like(film, v).await.unwrap();
    }
    catalog.put_like(only_u, u).await.unwrap();
    catalog.put_mark(shared_high, u, 10).await.unwrap();
    catalog.put_mark(shared_low, v, 5).await.unwrap();

    let forward = catalog.get_common_films(u, v).await.unwrap();
    let backward = catalog.get_common_films(v, u).await.unwrap();
    assert_eq!(ids(&forward), vec![shared_high, shared_low]);
    assert_eq!(ids(&forward), ids(&backward));

    let err = catalog.get_common_films(u, 404).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "user", .. }));
}

#[tokio::test]
async fn delete_film_cascades_but_keeps_feed_history() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;
    let film = seed_film(&catalog, "Doomed", 1999).await;

    catalog.put_like(film, u).await.unwrap();
    catalog.put_mark(film, u, 8).await.unwrap();

    catalog.delete(film).await.unwrap();

    let err = catalog.get(film).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "film", .. }));

    let popular = catalog.get_popular(10, None, None).await.unwrap();
    assert!(!ids(&popular).contains(&film));

    // append-only history survives the film
    let feed = users::feed(&db, u).await.unwrap();
    assert_eq!(feed.len(), 2);
    assert!(feed.iter().all(|e| e.entity_id == film));

    let err = catalog.delete(film).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "film", .. }));
}

#[tokio::test]
async fn repeated_like_collapses_to_one_relation() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;
    let film = seed_film(&catalog, "Liked Twice", 2005).await;

    catalog.put_like(film, u).await.unwrap();
    catalog.put_like(film, u).await.unwrap();

    // one relation: a single remove drains it
    catalog.delete_like(film, u).await.unwrap();
    let err = catalog.delete_like(film, u).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "like", .. }));

    // each logical add call was still recorded
    let feed = users::feed(&db, u).await.unwrap();
    let ops: Vec<_> = feed.iter().map(|e| (e.event_type, e.operation)).collect();
    assert_eq!(
        ops,
        vec![
            (EventType::Like, Operation::Add),
            (EventType::Like, Operation::Add),
            (EventType::Like, Operation::Remove),
        ]
    );
}

#[tokio::test]
async fn feed_records_ordered_typed_events() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;
    let film = seed_film(&catalog, "Tracked", 2010).await;

    catalog.put_like(film, u).await.unwrap();
    catalog.put_mark(film, u, 7).await.unwrap();
    catalog.delete_mark(film, u).await.unwrap();
    catalog.delete_like(film, u).await.unwrap();

    let feed = users::feed(&db, u).await.unwrap();
    let ops: Vec<_> = feed.iter().map(|e| (e.event_type, e.operation)).collect();
    assert_eq!(
        ops,
        vec![
            (EventType::Like, Operation::Add),
            (EventType::Mark, Operation::Add),
            (EventType::Mark, Operation::Remove),
            (EventType::Like, Operation::Remove),
        ]
    );
    assert!(feed.windows(2).all(|w| w[0].event_id < w[1].event_id));
    assert!(feed.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn failed_removal_records_no_event() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;
    let film = seed_film(&catalog, "Untouched", 2012).await;

    let err = catalog.delete_mark(film, u).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "mark", .. }));

    assert!(users::feed(&db, u).await.unwrap().is_empty());
}

#[tokio::test]
async fn by_director_sorts_by_year_and_likes() {
    let (db, catalog) = setup().await;
    let director = seed_director(&db, "Kurosawa").await;
    let u = seed_user(&db, "u").await;
    let v = seed_user(&db, "v").await;

    let mut older = payload("Older", 1954);
    older.directors = vec![DirectorRef { id: director }];
    let older = catalog.create(older).await.unwrap().id;

    let mut newer = payload("Newer", 1985);
    newer.directors = vec![DirectorRef { id: director }];
    let newer = catalog.create(newer).await.unwrap().id;

    let unrelated = seed_film(&catalog, "Unrelated", 1960).await;

    catalog.put_like(newer, u).await.unwrap();
    catalog.put_like(newer, v).await.unwrap();
    catalog.put_like(older, u).await.unwrap();

    let by_year = catalog.get_by_director(director, "year").await.unwrap();
    assert_eq!(ids(&by_year), vec![older, newer]);

    let by_likes = catalog.get_by_director(director, "likes").await.unwrap();
    assert_eq!(ids(&by_likes), vec![newer, older]);
    assert!(!ids(&by_likes).contains(&unrelated));

    let err = catalog.get_by_director(director, "rating").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidValue { field: "sortBy", .. }));

    let err = catalog.get_by_director(404, "year").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "director", .. }));
}

#[tokio::test]
async fn create_enriches_and_validates_references() {
    let (db, catalog) = setup().await;
    let director = seed_director(&db, "Lynch").await;

    let mut film = payload("Dune", 1984);
    film.mpa = MpaRef { id: 3 };
    // duplicate genre references collapse into one association
    film.genres = vec![GenreRef { id: 2 }, GenreRef { id: 1 }, GenreRef { id: 2 }];
    film.directors = vec![DirectorRef { id: director }];

    let created = catalog.create(film).await.unwrap();
    assert_eq!(created.mpa.name, "PG-13");
    assert_eq!(
        created.genres.iter().map(|g| g.id).collect::<Vec<_>>(),
        vec![1, 2],
        "genres come back deduplicated and ordered by id"
    );
    assert_eq!(created.directors.len(), 1);
    assert_eq!(created.directors[0].name, "Lynch");
    assert_eq!(created.rate, None);

    let mut bad_mpa = payload("Bad MPA", 2000);
    bad_mpa.mpa = MpaRef { id: 99 };
    let err = catalog.create(bad_mpa).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "mpa", .. }));

    let mut bad_genre = payload("Bad Genre", 2000);
    bad_genre.genres = vec![GenreRef { id: 99 }];
    let err = catalog.create(bad_genre).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "genre", .. }));
}

#[tokio::test]
async fn update_preserves_derived_rate() {
    let (db, catalog) = setup().await;
    let u = seed_user(&db, "u").await;

    let mut film = payload("Original", 1990);
    film.genres = vec![GenreRef { id: 1 }];
    let created = catalog.create(film).await.unwrap();

    catalog.put_mark(created.id, u, 7).await.unwrap();

    let mut updated = payload("Renamed", 1991);
    updated.id = Some(created.id);
    updated.genres = vec![GenreRef { id: 3 }];
    let updated = catalog.update(updated).await.unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.rate, Some(7.0), "update must not clobber the derived rating");
    assert_eq!(updated.genres.iter().map(|g| g.id).collect::<Vec<_>>(), vec![3]);

    let mut missing = payload("Ghost", 2000);
    missing.id = Some(4040);
    let err = catalog.update(missing).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "film", .. }));
}

#[tokio::test]
async fn list_all_returns_enriched_films() {
    let (db, catalog) = setup().await;
    let director = seed_director(&db, "Villeneuve").await;

    let mut film = payload("Arrival", 2016);
    film.genres = vec![GenreRef { id: 2 }];
    film.directors = vec![DirectorRef { id: director }];
    catalog.create(film).await.unwrap();
    seed_film(&catalog, "Plain", 2017).await;

    let all = catalog.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    let arrival = all.iter().find(|f| f.name == "Arrival").unwrap();
    assert_eq!(arrival.genres.len(), 1);
    assert_eq!(arrival.directors.len(), 1);
    assert_eq!(arrival.mpa.name, "G");
}

#[tokio::test]
async fn feed_requires_existing_user() {
    let (db, _catalog) = setup().await;
    let err = users::feed(&db, 7).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "user", .. }));
}
