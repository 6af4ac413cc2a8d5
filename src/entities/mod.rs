pub mod director;
pub mod feed_event;
pub mod film;
pub mod film_director;
pub mod film_genre;
pub mod genre;
pub mod like;
pub mod mark;
pub mod mpa;
pub mod user;
