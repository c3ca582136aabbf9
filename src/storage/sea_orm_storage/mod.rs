//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod admins;
mod announcements;
mod assignments;
mod attendance;
mod classes;
mod dashboard;
mod events;
mod exams;
mod grades;
mod lessons;
mod listing;
mod parents;
mod results;
mod students;
mod subjects;
mod teachers;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolError};
use migration::{Migrator, MigratorTrait};
use sea_orm::sea_query::{Expr, ExprTrait, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    /// 使用已有连接创建存储实例并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 判断满足主键条件的行是否也满足可见范围条件
    pub(crate) async fn row_in_scope<E: EntityTrait>(
        &self,
        key: SimpleExpr,
        scope: Condition,
        what: &str,
    ) -> Result<bool>
    where
        E::Model: Sync,
    {
        let count = E::find()
            .filter(key)
            .filter(scope)
            .count(&self.db)
            .await
            .map_err(|e| read_err(&format!("查询{what}失败"), e))?;
        Ok(count > 0)
    }
}

/// 读操作错误统一归为数据库操作错误
pub(crate) fn read_err(context: &str, err: DbErr) -> SchoolError {
    SchoolError::database_operation(format!("{context}: {err}"))
}

/// 写操作错误保留唯一约束与外键约束的分类，其余附加上下文
pub(crate) fn write_err(context: &str, err: DbErr) -> SchoolError {
    match SchoolError::from(err) {
        SchoolError::DatabaseOperation(msg) => {
            SchoolError::database_operation(format!("{context}: {msg}"))
        }
        classified => classified,
    }
}

/// 不区分大小写的等值比较 `LOWER(col) = lower(value)`
pub(crate) fn eq_ci<C: ColumnTrait>(column: C, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column.as_column_ref()))).eq(value.trim().to_lowercase())
}

pub(crate) fn to_timestamp(value: chrono::DateTime<chrono::Utc>) -> i64 {
    value.timestamp()
}

pub(crate) fn from_timestamp(value: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(value, 0).unwrap_or_default()
}

/// 人员表中参与唯一性检查的列
pub(crate) struct PersonKeys<C> {
    pub id: C,
    pub username: C,
    pub email: C,
    pub phone: C,
}

/// 检查 ID、用户名、邮箱与电话是否已被同表中的其他人使用
///
/// 用户名与邮箱只含 ASCII，按 `LOWER` 比较；电话按规范化后的原值比较。
pub(crate) async fn person_conflict<E: EntityTrait>(
    db: &DatabaseConnection,
    keys: PersonKeys<E::Column>,
    claim: PersonClaim<'_>,
    exclude_id: Option<&str>,
) -> Result<Option<UniqueField>>
where
    E::Model: Sync,
{
    let mut others = Condition::all();
    if let Some(id) = exclude_id {
        others = others.add(keys.id.ne(id));
    }

    let mut checks = Vec::with_capacity(4);
    if let Some(id) = claim.id {
        checks.push((UniqueField::Id, keys.id.eq(id), "检查 ID 唯一性失败"));
    }
    checks.push((
        UniqueField::Username,
        eq_ci(keys.username, claim.username),
        "检查用户名唯一性失败",
    ));
    if let Some(email) = claim.email {
        checks.push((UniqueField::Email, eq_ci(keys.email, email), "检查邮箱唯一性失败"));
    }
    if let Some(phone) = claim.phone {
        checks.push((UniqueField::Phone, keys.phone.eq(phone), "检查电话唯一性失败"));
    }

    for (field, expr, context) in checks {
        let taken = E::find()
            .filter(others.clone())
            .filter(expr)
            .count(db)
            .await
            .map_err(|e| read_err(context, e))?;
        if taken > 0 {
            return Ok(Some(field));
        }
    }

    Ok(None)
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    announcements::{entities::Announcement, requests::AnnouncementInput, responses::AnnouncementRow},
    assignments::{entities::Assignment, requests::AssignmentInput, responses::AssignmentRow},
    attendance::{entities::Attendance, requests::AttendanceInput, responses::AttendanceRow},
    classes::{entities::Class, requests::ClassInput, responses::ClassRow},
    dashboard::responses::{AttendanceDay, SexCounts, UserCounts},
    events::{entities::Event, requests::EventInput, responses::EventRow},
    exams::{entities::Exam, requests::ExamInput, responses::ExamRow},
    grades::{entities::Grade, requests::GradeInput},
    lessons::{
        entities::Lesson,
        requests::LessonInput,
        responses::{LessonRow, ScheduleEntry},
    },
    parents::{entities::Parent, requests::ParentInput, responses::ParentRow},
    results::{entities::ExamResult, requests::ResultInput, responses::ResultRow},
    students::{
        entities::Student,
        requests::StudentInput,
        responses::{StudentDetail, StudentRow},
    },
    subjects::{entities::Subject, requests::SubjectInput, responses::SubjectRow},
    teachers::{
        entities::Teacher,
        requests::TeacherInput,
        responses::{TeacherDetail, TeacherRow},
    },
    users::entities::NamedRef,
};
use crate::storage::{PersonClaim, Storage, UniqueField};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 教师模块
    async fn list_teachers(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<TeacherRow>> {
        listing::list_page::<teachers::TeacherListing>(&self.db, cond, page, page_size).await
    }

    async fn get_teacher_detail(
        &self,
        id: &str,
        scope: Condition,
    ) -> Result<Option<TeacherDetail>> {
        self.get_teacher_detail_impl(id, scope).await
    }

    async fn list_teacher_names(&self) -> Result<Vec<NamedRef<String>>> {
        self.list_teacher_names_impl().await
    }

    async fn find_teacher_conflict(
        &self,
        claim: PersonClaim<'_>,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>> {
        self.find_teacher_conflict_impl(claim, exclude_id).await
    }

    async fn teachers_exist(&self, ids: &[String]) -> Result<bool> {
        self.teachers_exist_impl(ids).await
    }

    async fn create_teacher(&self, id: String, input: TeacherInput) -> Result<Teacher> {
        self.create_teacher_impl(id, input).await
    }

    async fn update_teacher(&self, id: &str, input: TeacherInput) -> Result<Option<Teacher>> {
        self.update_teacher_impl(id, input).await
    }

    async fn delete_teacher(&self, id: &str) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    // 学生模块
    async fn list_students(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<StudentRow>> {
        listing::list_page::<students::StudentListing>(&self.db, cond, page, page_size).await
    }

    async fn get_student_detail(
        &self,
        id: &str,
        scope: Condition,
    ) -> Result<Option<StudentDetail>> {
        self.get_student_detail_impl(id, scope).await
    }

    async fn find_student_conflict(
        &self,
        claim: PersonClaim<'_>,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>> {
        self.find_student_conflict_impl(claim, exclude_id).await
    }

    async fn student_in_scope(&self, id: &str, scope: Condition) -> Result<bool> {
        self.row_in_scope::<crate::entity::students::Entity>(
            crate::entity::students::Column::Id.eq(id),
            scope,
            "学生",
        )
        .await
    }

    async fn create_student(&self, id: String, input: StudentInput) -> Result<Student> {
        self.create_student_impl(id, input).await
    }

    async fn update_student(&self, id: &str, input: StudentInput) -> Result<Option<Student>> {
        self.update_student_impl(id, input).await
    }

    async fn delete_student(&self, id: &str) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    // 家长模块
    async fn list_parents(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<ParentRow>> {
        listing::list_page::<parents::ParentListing>(&self.db, cond, page, page_size).await
    }

    async fn find_parent_conflict(
        &self,
        claim: PersonClaim<'_>,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>> {
        self.find_parent_conflict_impl(claim, exclude_id).await
    }

    async fn parent_exists(&self, id: &str) -> Result<bool> {
        self.row_in_scope::<crate::entity::parents::Entity>(
            crate::entity::parents::Column::Id.eq(id),
            Condition::all(),
            "家长",
        )
        .await
    }

    async fn create_parent(&self, id: String, input: ParentInput) -> Result<Parent> {
        self.create_parent_impl(id, input).await
    }

    async fn update_parent(&self, id: &str, input: ParentInput) -> Result<Option<Parent>> {
        self.update_parent_impl(id, input).await
    }

    async fn delete_parent(&self, id: &str) -> Result<bool> {
        self.delete_parent_impl(id).await
    }

    // 年级模块
    async fn list_grades(&self) -> Result<Vec<Grade>> {
        self.list_grades_impl().await
    }

    async fn grade_exists(&self, id: i64) -> Result<bool> {
        self.row_in_scope::<crate::entity::grades::Entity>(
            crate::entity::grades::Column::Id.eq(id),
            Condition::all(),
            "年级",
        )
        .await
    }

    async fn grade_level_taken(&self, level: i32) -> Result<bool> {
        self.row_in_scope::<crate::entity::grades::Entity>(
            crate::entity::grades::Column::Level.eq(level),
            Condition::all(),
            "年级",
        )
        .await
    }

    async fn create_grade(&self, input: GradeInput) -> Result<Grade> {
        self.create_grade_impl(input).await
    }

    // 班级模块
    async fn list_classes(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<ClassRow>> {
        listing::list_page::<classes::ClassListing>(&self.db, cond, page, page_size).await
    }

    async fn class_exists(&self, id: i64) -> Result<bool> {
        self.row_in_scope::<crate::entity::classes::Entity>(
            crate::entity::classes::Column::Id.eq(id),
            Condition::all(),
            "班级",
        )
        .await
    }

    async fn class_name_taken(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        self.class_name_taken_impl(name, exclude_id).await
    }

    async fn class_is_full(&self, id: i64, exclude_student: Option<&str>) -> Result<bool> {
        self.class_is_full_impl(id, exclude_student).await
    }

    async fn create_class(&self, input: ClassInput) -> Result<Class> {
        self.create_class_impl(input).await
    }

    async fn update_class(&self, id: i64, input: ClassInput) -> Result<Option<Class>> {
        self.update_class_impl(id, input).await
    }

    async fn delete_class(&self, id: i64) -> Result<bool> {
        self.delete_class_impl(id).await
    }

    // 科目模块
    async fn list_subjects(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<SubjectRow>> {
        listing::list_page::<subjects::SubjectListing>(&self.db, cond, page, page_size).await
    }

    async fn list_subject_names(&self) -> Result<Vec<NamedRef<i64>>> {
        self.list_subject_names_impl().await
    }

    async fn subject_exists(&self, id: i64) -> Result<bool> {
        self.row_in_scope::<crate::entity::subjects::Entity>(
            crate::entity::subjects::Column::Id.eq(id),
            Condition::all(),
            "科目",
        )
        .await
    }

    async fn subjects_exist(&self, ids: &[i64]) -> Result<bool> {
        self.subjects_exist_impl(ids).await
    }

    async fn subject_name_taken(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        self.subject_name_taken_impl(name, exclude_id).await
    }

    async fn create_subject(&self, input: SubjectInput) -> Result<Subject> {
        self.create_subject_impl(input).await
    }

    async fn update_subject(&self, id: i64, input: SubjectInput) -> Result<Option<Subject>> {
        self.update_subject_impl(id, input).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 课程模块
    async fn list_lessons(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<LessonRow>> {
        listing::list_page::<lessons::LessonListing>(&self.db, cond, page, page_size).await
    }

    async fn list_schedule(&self, cond: Condition) -> Result<Vec<ScheduleEntry>> {
        self.list_schedule_impl(cond).await
    }

    async fn lesson_in_scope(&self, id: i64, scope: Condition) -> Result<bool> {
        self.row_in_scope::<crate::entity::lessons::Entity>(
            crate::entity::lessons::Column::Id.eq(id),
            scope,
            "课程",
        )
        .await
    }

    async fn create_lesson(&self, input: LessonInput) -> Result<Lesson> {
        self.create_lesson_impl(input).await
    }

    async fn update_lesson(&self, id: i64, input: LessonInput) -> Result<Option<Lesson>> {
        self.update_lesson_impl(id, input).await
    }

    async fn delete_lesson(&self, id: i64) -> Result<bool> {
        self.delete_lesson_impl(id).await
    }

    // 考试模块
    async fn list_exams(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<ExamRow>> {
        listing::list_page::<exams::ExamListing>(&self.db, cond, page, page_size).await
    }

    async fn exam_in_scope(&self, id: i64, scope: Condition) -> Result<bool> {
        self.row_in_scope::<crate::entity::exams::Entity>(
            crate::entity::exams::Column::Id.eq(id),
            scope,
            "考试",
        )
        .await
    }

    async fn create_exam(&self, input: ExamInput) -> Result<Exam> {
        self.create_exam_impl(input).await
    }

    async fn update_exam(&self, id: i64, input: ExamInput) -> Result<Option<Exam>> {
        self.update_exam_impl(id, input).await
    }

    async fn delete_exam(&self, id: i64) -> Result<bool> {
        self.delete_exam_impl(id).await
    }

    // 作业模块
    async fn list_assignments(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<AssignmentRow>> {
        listing::list_page::<assignments::AssignmentListing>(&self.db, cond, page, page_size)
            .await
    }

    async fn assignment_in_scope(&self, id: i64, scope: Condition) -> Result<bool> {
        self.row_in_scope::<crate::entity::assignments::Entity>(
            crate::entity::assignments::Column::Id.eq(id),
            scope,
            "作业",
        )
        .await
    }

    async fn create_assignment(&self, input: AssignmentInput) -> Result<Assignment> {
        self.create_assignment_impl(input).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        input: AssignmentInput,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, input).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    // 成绩模块
    async fn list_results(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<ResultRow>> {
        listing::list_page::<results::ResultListing>(&self.db, cond, page, page_size).await
    }

    async fn result_in_scope(&self, id: i64, scope: Condition) -> Result<bool> {
        self.row_in_scope::<crate::entity::results::Entity>(
            crate::entity::results::Column::Id.eq(id),
            scope,
            "成绩",
        )
        .await
    }

    async fn create_result(&self, input: ResultInput) -> Result<ExamResult> {
        self.create_result_impl(input).await
    }

    async fn update_result(&self, id: i64, input: ResultInput) -> Result<Option<ExamResult>> {
        self.update_result_impl(id, input).await
    }

    async fn delete_result(&self, id: i64) -> Result<bool> {
        self.delete_result_impl(id).await
    }

    // 考勤模块
    async fn list_attendance(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<AttendanceRow>> {
        listing::list_page::<attendance::AttendanceListing>(&self.db, cond, page, page_size)
            .await
    }

    async fn attendance_in_scope(&self, id: i64, scope: Condition) -> Result<bool> {
        self.row_in_scope::<crate::entity::attendances::Entity>(
            crate::entity::attendances::Column::Id.eq(id),
            scope,
            "考勤",
        )
        .await
    }

    async fn create_attendance(&self, input: AttendanceInput) -> Result<Attendance> {
        self.create_attendance_impl(input).await
    }

    async fn update_attendance(
        &self,
        id: i64,
        input: AttendanceInput,
    ) -> Result<Option<Attendance>> {
        self.update_attendance_impl(id, input).await
    }

    async fn delete_attendance(&self, id: i64) -> Result<bool> {
        self.delete_attendance_impl(id).await
    }

    // 活动模块
    async fn list_events(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<EventRow>> {
        listing::list_page::<events::EventListing>(&self.db, cond, page, page_size).await
    }

    async fn list_events_between(
        &self,
        cond: Condition,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<EventRow>> {
        self.list_events_between_impl(cond, from, to).await
    }

    async fn create_event(&self, input: EventInput) -> Result<Event> {
        self.create_event_impl(input).await
    }

    async fn update_event(&self, id: i64, input: EventInput) -> Result<Option<Event>> {
        self.update_event_impl(id, input).await
    }

    async fn delete_event(&self, id: i64) -> Result<bool> {
        self.delete_event_impl(id).await
    }

    // 公告模块
    async fn list_announcements(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<AnnouncementRow>> {
        listing::list_page::<announcements::AnnouncementListing>(&self.db, cond, page, page_size)
            .await
    }

    async fn create_announcement(&self, input: AnnouncementInput) -> Result<Announcement> {
        self.create_announcement_impl(input).await
    }

    async fn update_announcement(
        &self,
        id: i64,
        input: AnnouncementInput,
    ) -> Result<Option<Announcement>> {
        self.update_announcement_impl(id, input).await
    }

    async fn delete_announcement(&self, id: i64) -> Result<bool> {
        self.delete_announcement_impl(id).await
    }

    // 仪表盘
    async fn count_users(&self) -> Result<UserCounts> {
        self.count_users_impl().await
    }

    async fn count_students_by_sex(&self) -> Result<SexCounts> {
        self.count_students_by_sex_impl().await
    }

    async fn attendance_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<AttendanceDay>> {
        self.attendance_since_impl(since).await
    }

    async fn ensure_admin(&self, id: &str, username: &str) -> Result<bool> {
        self.ensure_admin_impl(id, username).await
    }
}
