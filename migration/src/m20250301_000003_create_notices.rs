use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建活动表，class_id 为空表示全校活动
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::SearchKey).string().not_null())
                    .col(ColumnDef::new(Events::Description).text().not_null())
                    .col(ColumnDef::new(Events::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Events::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Events::ClassId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Events::Table, Events::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建公告表
        manager
            .create_table(
                Table::create()
                    .table(Announcements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcements::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Announcements::Title).string().not_null())
                    .col(ColumnDef::new(Announcements::SearchKey).string().not_null())
                    .col(ColumnDef::new(Announcements::Description).text().not_null())
                    .col(ColumnDef::new(Announcements::Date).big_integer().not_null())
                    .col(ColumnDef::new(Announcements::ClassId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Announcements::Table, Announcements::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_start_time")
                    .table(Events::Table)
                    .col(Events::StartTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Announcements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Events {
    #[sea_orm(iden = "events")]
    Table,
    Id,
    Title,
    Description,
    StartTime,
    EndTime,
    ClassId,
    SearchKey,
}

#[derive(DeriveIden)]
enum Announcements {
    #[sea_orm(iden = "announcements")]
    Table,
    Id,
    Title,
    Description,
    Date,
    ClassId,
    SearchKey,
}
