use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::UserId))
                    .col(string(Users::Email))
                    .col(string(Users::Login))
                    .col(string(Users::Name))
                    .col(string(Users::Birthday))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MpaRatings::Table)
                    .if_not_exists()
                    .col(pk_auto(MpaRatings::MpaId))
                    .col(string(MpaRatings::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(pk_auto(Genres::GenreId))
                    .col(string(Genres::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Directors::Table)
                    .if_not_exists()
                    .col(pk_auto(Directors::DirectorId))
                    .col(string(Directors::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(pk_auto(Films::FilmId))
                    .col(string(Films::Name))
                    .col(string(Films::Description))
                    .col(string(Films::ReleaseDate))
                    .col(integer(Films::Duration))
                    .col(integer(Films::MpaId))
                    .col(double_null(Films::Rate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_films_release_date")
                    .table(Films::Table)
                    .col(Films::ReleaseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmGenres::Table)
                    .if_not_exists()
                    .col(integer(FilmGenres::FilmId))
                    .col(integer(FilmGenres::GenreId))
                    .primary_key(
                        Index::create()
                            .col(FilmGenres::FilmId)
                            .col(FilmGenres::GenreId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmDirectors::Table)
                    .if_not_exists()
                    .col(integer(FilmDirectors::FilmId))
                    .col(integer(FilmDirectors::DirectorId))
                    .primary_key(
                        Index::create()
                            .col(FilmDirectors::FilmId)
                            .col(FilmDirectors::DirectorId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_film_directors_director")
                    .table(FilmDirectors::Table)
                    .col(FilmDirectors::DirectorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Likes::Table)
                    .if_not_exists()
                    .col(integer(Likes::FilmId))
                    .col(integer(Likes::UserId))
                    .primary_key(Index::create().col(Likes::FilmId).col(Likes::UserId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_likes_user")
                    .table(Likes::Table)
                    .col(Likes::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(integer(Marks::FilmId))
                    .col(integer(Marks::UserId))
                    .col(integer(Marks::Value))
                    .primary_key(Index::create().col(Marks::FilmId).col(Marks::UserId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeedEvents::Table)
                    .if_not_exists()
                    .col(big_integer(FeedEvents::EventId).auto_increment().primary_key())
                    .col(integer(FeedEvents::UserId))
                    .col(integer(FeedEvents::EntityId))
                    .col(string(FeedEvents::EventType))
                    .col(string(FeedEvents::Operation))
                    .col(big_integer(FeedEvents::Timestamp))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feed_events_user")
                    .table(FeedEvents::Table)
                    .col(FeedEvents::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FeedEvents::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Marks::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Likes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmDirectors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmGenres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Films::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Directors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MpaRatings::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
    Email,
    Login,
    Name,
    Birthday,
}

#[derive(DeriveIden)]
enum MpaRatings {
    Table,
    MpaId,
    Name,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    GenreId,
    Name,
}

#[derive(DeriveIden)]
enum Directors {
    Table,
    DirectorId,
    Name,
}

#[derive(DeriveIden)]
enum Films {
    Table,
    FilmId,
    Name,
    Description,
    ReleaseDate,
    Duration,
    MpaId,
    Rate,
}

#[derive(DeriveIden)]
enum FilmGenres {
    Table,
    FilmId,
    GenreId,
}

#[derive(DeriveIden)]
enum FilmDirectors {
    Table,
    FilmId,
    DirectorId,
}

#[derive(DeriveIden)]
enum Likes {
    Table,
    FilmId,
    UserId,
}

#[derive(DeriveIden)]
enum Marks {
    Table,
    FilmId,
    UserId,
    Value,
}

#[derive(DeriveIden)]
enum FeedEvents {
    Table,
    EventId,
    UserId,
    EntityId,
    EventType,
    Operation,
    Timestamp,
}
