use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only hit log; `created` is the caller-supplied timestamp
        manager
            .create_table(
                Table::create()
                    .table(Hits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hits::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(Hits::App))
                    .col(string(Hits::Uri))
                    .col(string(Hits::Ip))
                    .col(timestamp(Hits::Created))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hits_created")
                    .table(Hits::Table)
                    .col(Hits::Created)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hits_uri_created")
                    .table(Hits::Table)
                    .col(Hits::Uri)
                    .col(Hits::Created)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hits::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Hits {
    Table,
    Id,
    App,
    Uri,
    Ip,
    Created,
}
