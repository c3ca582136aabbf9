use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建管理员表
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Admins::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教师表
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teachers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Teachers::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::Name).string().not_null())
                    .col(ColumnDef::new(Teachers::Surname).string().not_null())
                    .col(ColumnDef::new(Teachers::SearchKey).string().not_null())
                    .col(ColumnDef::new(Teachers::Email).string().null().unique_key())
                    .col(ColumnDef::new(Teachers::Phone).string().null().unique_key())
                    .col(ColumnDef::new(Teachers::Address).string().not_null())
                    .col(ColumnDef::new(Teachers::Img).string().null())
                    .col(ColumnDef::new(Teachers::BloodType).string().not_null())
                    .col(ColumnDef::new(Teachers::Sex).string().not_null())
                    .col(ColumnDef::new(Teachers::Birthday).big_integer().not_null())
                    .col(ColumnDef::new(Teachers::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建家长表
        manager
            .create_table(
                Table::create()
                    .table(Parents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Parents::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Parents::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Parents::Name).string().not_null())
                    .col(ColumnDef::new(Parents::Surname).string().not_null())
                    .col(ColumnDef::new(Parents::SearchKey).string().not_null())
                    .col(ColumnDef::new(Parents::Email).string().null().unique_key())
                    .col(ColumnDef::new(Parents::Phone).string().null().unique_key())
                    .col(ColumnDef::new(Parents::Address).string().not_null())
                    .col(ColumnDef::new(Parents::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 教师表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teachers_name")
                    .table(Teachers::Table)
                    .col(Teachers::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Admins {
    #[sea_orm(iden = "admins")]
    Table,
    Id,
    Username,
}

#[derive(DeriveIden)]
enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
    Username,
    Name,
    Surname,
    SearchKey,
    Email,
    Phone,
    Address,
    Img,
    BloodType,
    Sex,
    Birthday,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Parents {
    #[sea_orm(iden = "parents")]
    Table,
    Id,
    Username,
    Name,
    Surname,
    SearchKey,
    Email,
    Phone,
    Address,
    CreatedAt,
}
