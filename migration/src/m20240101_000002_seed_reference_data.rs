use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const GENRES: &[&str] = &["Comedy", "Drama", "Cartoon", "Thriller", "Documentary", "Action"];
const MPA_RATINGS: &[&str] = &["G", "PG", "PG-13", "R", "NC-17"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in GENRES {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Genres::Table)
                        .columns([Genres::Name])
                        .values_panic([(*name).into()])
                        .to_owned(),
                )
                .await?;
        }

        for name in MPA_RATINGS {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(MpaRatings::Table)
                        .columns([MpaRatings::Name])
                        .values_panic([(*name).into()])
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Genres::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(MpaRatings::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum MpaRatings {
    Table,
    Name,
}
