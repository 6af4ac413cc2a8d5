use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "films")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub film_id: i32,
    pub name: String,
    pub description: String,
    pub release_date: String,
    pub duration: i32,
    pub mpa_id: i32,
    pub rate: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mpa::Entity",
        from = "Column::MpaId",
        to = "super::mpa::Column::MpaId"
    )]
    Mpa,
    #[sea_orm(has_many = "super::film_genre::Entity")]
    FilmGenres,
    #[sea_orm(has_many = "super::film_director::Entity")]
    FilmDirectors,
    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
    #[sea_orm(has_many = "super::mark::Entity")]
    Marks,
}

impl Related<super::mpa::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mpa.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
