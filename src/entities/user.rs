use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub user_id: i32,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
    #[sea_orm(has_many = "super::mark::Entity")]
    Marks,
    #[sea_orm(has_many = "super::feed_event::Entity")]
    FeedEvents,
}

impl ActiveModelBehavior for ActiveModel {}
