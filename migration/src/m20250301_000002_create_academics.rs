use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建年级表
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Grades::Level)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建科目表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subjects::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Subjects::SearchKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 教师-科目关联表
        manager
            .create_table(
                Table::create()
                    .table(TeacherSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherSubjects::TeacherId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherSubjects::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(TeacherSubjects::TeacherId)
                            .col(TeacherSubjects::SubjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherSubjects::Table, TeacherSubjects::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherSubjects::Table, TeacherSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Classes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Classes::SearchKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Classes::Capacity).integer().not_null())
                    .col(ColumnDef::new(Classes::SupervisorId).string().null())
                    .col(ColumnDef::new(Classes::GradeId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::SupervisorId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::GradeId)
                            .to(Grades::Table, Grades::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::Surname).string().not_null())
                    .col(ColumnDef::new(Students::SearchKey).string().not_null())
                    .col(ColumnDef::new(Students::Email).string().null().unique_key())
                    .col(ColumnDef::new(Students::Phone).string().null().unique_key())
                    .col(ColumnDef::new(Students::Address).string().not_null())
                    .col(ColumnDef::new(Students::Img).string().null())
                    .col(ColumnDef::new(Students::BloodType).string().not_null())
                    .col(ColumnDef::new(Students::Sex).string().not_null())
                    .col(ColumnDef::new(Students::Birthday).big_integer().not_null())
                    .col(ColumnDef::new(Students::ParentId).string().not_null())
                    .col(ColumnDef::new(Students::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Students::GradeId).big_integer().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ParentId)
                            .to(Parents::Table, Parents::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::GradeId)
                            .to(Grades::Table, Grades::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程表
        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lessons::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lessons::Name).string().not_null())
                    .col(ColumnDef::new(Lessons::SearchKey).string().not_null())
                    .col(ColumnDef::new(Lessons::Day).string().not_null())
                    .col(ColumnDef::new(Lessons::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Lessons::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Lessons::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Lessons::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Lessons::TeacherId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lessons::Table, Lessons::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lessons::Table, Lessons::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lessons::Table, Lessons::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考试表
        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exams::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exams::Title).string().not_null())
                    .col(ColumnDef::new(Exams::SearchKey).string().not_null())
                    .col(ColumnDef::new(Exams::StartTime).big_integer().not_null())
                    .col(ColumnDef::new(Exams::EndTime).big_integer().not_null())
                    .col(ColumnDef::new(Exams::LessonId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exams::Table, Exams::LessonId)
                            .to(Lessons::Table, Lessons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::SearchKey).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::StartDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::DueDate).big_integer().not_null())
                    .col(
                        ColumnDef::new(Assignments::LessonId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::LessonId)
                            .to(Lessons::Table, Lessons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩表
        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Results::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Results::Score).integer().not_null())
                    .col(ColumnDef::new(Results::ExamId).big_integer().null())
                    .col(ColumnDef::new(Results::AssignmentId).big_integer().null())
                    .col(ColumnDef::new(Results::StudentId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考勤表
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendances::Date).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::Present).boolean().not_null())
                    .col(ColumnDef::new(Attendances::StudentId).string().not_null())
                    .col(ColumnDef::new(Attendances::LessonId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::LessonId)
                            .to(Lessons::Table, Lessons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 常用查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_class_id")
                    .table(Students::Table)
                    .col(Students::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_parent_id")
                    .table(Students::Table)
                    .col(Students::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lessons_teacher_id")
                    .table(Lessons::Table)
                    .col(Lessons::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lessons_class_id")
                    .table(Lessons::Table)
                    .col(Lessons::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_results_student_id")
                    .table(Results::Table)
                    .col(Results::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendances_date")
                    .table(Attendances::Table)
                    .col(Attendances::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherSubjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Parents {
    #[sea_orm(iden = "parents")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    Level,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    SearchKey,
}

#[derive(DeriveIden)]
enum TeacherSubjects {
    #[sea_orm(iden = "teacher_subjects")]
    Table,
    TeacherId,
    SubjectId,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    Name,
    Capacity,
    SupervisorId,
    GradeId,
    SearchKey,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Username,
    Name,
    Surname,
    Email,
    Phone,
    Address,
    Img,
    BloodType,
    Sex,
    Birthday,
    ParentId,
    ClassId,
    GradeId,
    CreatedAt,
    SearchKey,
}

#[derive(DeriveIden)]
enum Lessons {
    #[sea_orm(iden = "lessons")]
    Table,
    Id,
    Name,
    Day,
    StartTime,
    EndTime,
    SubjectId,
    ClassId,
    TeacherId,
    SearchKey,
}

#[derive(DeriveIden)]
enum Exams {
    #[sea_orm(iden = "exams")]
    Table,
    Id,
    Title,
    StartTime,
    EndTime,
    LessonId,
    SearchKey,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    Title,
    StartDate,
    DueDate,
    LessonId,
    SearchKey,
}

#[derive(DeriveIden)]
enum Results {
    #[sea_orm(iden = "results")]
    Table,
    Id,
    Score,
    ExamId,
    AssignmentId,
    StudentId,
}

#[derive(DeriveIden)]
enum Attendances {
    #[sea_orm(iden = "attendances")]
    Table,
    Id,
    Date,
    Present,
    StudentId,
    LessonId,
}
