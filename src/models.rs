use jiff::civil::Date;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Mpa {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub id: i32,
    pub name: String,
}

/// A fully enriched film as returned to callers: genre and director sets
/// resolved, MPA attached, `rate` the mean of current marks (absent while
/// the film has none).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub release_date: Date,
    pub duration: i32,
    pub mpa: Mpa,
    pub rate: Option<f64>,
    pub genres: Vec<Genre>,
    pub directors: Vec<Director>,
}

/// Incoming film shape for create/update. Genre, director and MPA entries
/// are references by id; names are resolved server-side.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmPayload {
    pub id: Option<i32>,
    pub name: String,
    pub description: String,
    pub release_date: Date,
    pub duration: i32,
    pub mpa: MpaRef,
    #[serde(default)]
    pub genres: Vec<GenreRef>,
    #[serde(default)]
    pub directors: Vec<DirectorRef>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct MpaRef {
    pub id: i32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct GenreRef {
    pub id: i32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct DirectorRef {
    pub id: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: Date,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserPayload {
    pub email: String,
    pub login: String,
    pub name: Option<String>,
    pub birthday: Date,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DirectorPayload {
    pub name: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Like,
    Mark,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Like => "LIKE",
            EventType::Mark => "MARK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LIKE" => Some(EventType::Like),
            "MARK" => Some(EventType::Mark),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Remove => "REMOVE",
            Operation::Update => "UPDATE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADD" => Some(Operation::Add),
            "REMOVE" => Some(Operation::Remove),
            "UPDATE" => Some(Operation::Update),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEvent {
    pub event_id: i64,
    pub user_id: i32,
    pub entity_id: i32,
    pub event_type: EventType,
    pub operation: Operation,
    pub timestamp: i64,
}

/// Ordering dimension for director listings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortBy {
    Year,
    Likes,
}

impl SortBy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "year" => Some(SortBy::Year),
            "likes" => Some(SortBy::Likes),
            _ => None,
        }
    }
}

/// Search dimension for the film search; drawn from the closed set the
/// search endpoint accepts in its `by` parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SearchField {
    Title,
    Director,
}

impl SearchField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(SearchField::Title),
            "director" => Some(SearchField::Director),
            _ => None,
        }
    }
}
