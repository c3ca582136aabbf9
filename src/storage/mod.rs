use std::sync::Arc;

use sea_orm::Condition;

use crate::errors::Result;
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

pub mod sea_orm_storage;

/// 与现有记录冲突的唯一字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Id,
    Username,
    Email,
    Phone,
}

/// 参与唯一性检查的人员字段
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonClaim<'a> {
    /// 创建时由认证服务提供的 ID，更新时为 `None`
    pub id: Option<&'a str>,
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
}

/// 数据访问层
///
/// 列表方法接收 `filters` 模块构造的条件，在同一个只读事务中读取当前页与总数。
/// 更新方法在目标不存在时返回 `Ok(None)`，删除方法返回是否删除了行。
/// `*_in_scope` 方法判断某条记录是否满足给定的可见范围条件。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 教师
    async fn list_teachers(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<TeacherRow>>;
    async fn get_teacher_detail(&self, id: &str, scope: Condition)
    -> Result<Option<TeacherDetail>>;
    async fn list_teacher_names(&self) -> Result<Vec<NamedRef<String>>>;
    async fn find_teacher_conflict(
        &self,
        claim: PersonClaim<'_>,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>>;
    async fn teachers_exist(&self, ids: &[String]) -> Result<bool>;
    async fn create_teacher(&self, id: String, input: TeacherInput) -> Result<Teacher>;
    async fn update_teacher(&self, id: &str, input: TeacherInput) -> Result<Option<Teacher>>;
    async fn delete_teacher(&self, id: &str) -> Result<bool>;

    /// 学生
    async fn list_students(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<StudentRow>>;
    async fn get_student_detail(&self, id: &str, scope: Condition)
    -> Result<Option<StudentDetail>>;
    async fn find_student_conflict(
        &self,
        claim: PersonClaim<'_>,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>>;
    async fn student_in_scope(&self, id: &str, scope: Condition) -> Result<bool>;
    async fn create_student(&self, id: String, input: StudentInput) -> Result<Student>;
    async fn update_student(&self, id: &str, input: StudentInput) -> Result<Option<Student>>;
    async fn delete_student(&self, id: &str) -> Result<bool>;

    /// 家长
    async fn list_parents(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<ParentRow>>;
    async fn find_parent_conflict(
        &self,
        claim: PersonClaim<'_>,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>>;
    async fn parent_exists(&self, id: &str) -> Result<bool>;
    async fn create_parent(&self, id: String, input: ParentInput) -> Result<Parent>;
    async fn update_parent(&self, id: &str, input: ParentInput) -> Result<Option<Parent>>;
    async fn delete_parent(&self, id: &str) -> Result<bool>;

    /// 年级
    async fn list_grades(&self) -> Result<Vec<Grade>>;
    async fn grade_exists(&self, id: i64) -> Result<bool>;
    async fn grade_level_taken(&self, level: i32) -> Result<bool>;
    async fn create_grade(&self, input: GradeInput) -> Result<Grade>;

    /// 班级
    async fn list_classes(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<ClassRow>>;
    async fn class_exists(&self, id: i64) -> Result<bool>;
    async fn class_name_taken(&self, name: &str, exclude_id: Option<i64>) -> Result<bool>;
    async fn class_is_full(&self, id: i64, exclude_student: Option<&str>) -> Result<bool>;
    async fn create_class(&self, input: ClassInput) -> Result<Class>;
    async fn update_class(&self, id: i64, input: ClassInput) -> Result<Option<Class>>;
    async fn delete_class(&self, id: i64) -> Result<bool>;

    /// 科目
    async fn list_subjects(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<SubjectRow>>;
    async fn list_subject_names(&self) -> Result<Vec<NamedRef<i64>>>;
    async fn subject_exists(&self, id: i64) -> Result<bool>;
    async fn subjects_exist(&self, ids: &[i64]) -> Result<bool>;
    async fn subject_name_taken(&self, name: &str, exclude_id: Option<i64>) -> Result<bool>;
    async fn create_subject(&self, input: SubjectInput) -> Result<Subject>;
    async fn update_subject(&self, id: i64, input: SubjectInput) -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 课程
    async fn list_lessons(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<LessonRow>>;
    async fn list_schedule(&self, cond: Condition) -> Result<Vec<ScheduleEntry>>;
    async fn lesson_in_scope(&self, id: i64, scope: Condition) -> Result<bool>;
    async fn create_lesson(&self, input: LessonInput) -> Result<Lesson>;
    async fn update_lesson(&self, id: i64, input: LessonInput) -> Result<Option<Lesson>>;
    async fn delete_lesson(&self, id: i64) -> Result<bool>;

    /// 考试
    async fn list_exams(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<ExamRow>>;
    async fn exam_in_scope(&self, id: i64, scope: Condition) -> Result<bool>;
    async fn create_exam(&self, input: ExamInput) -> Result<Exam>;
    async fn update_exam(&self, id: i64, input: ExamInput) -> Result<Option<Exam>>;
    async fn delete_exam(&self, id: i64) -> Result<bool>;

    /// 作业
    async fn list_assignments(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<AssignmentRow>>;
    async fn assignment_in_scope(&self, id: i64, scope: Condition) -> Result<bool>;
    async fn create_assignment(&self, input: AssignmentInput) -> Result<Assignment>;
    async fn update_assignment(
        &self,
        id: i64,
        input: AssignmentInput,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;

    /// 成绩
    async fn list_results(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<ResultRow>>;
    async fn result_in_scope(&self, id: i64, scope: Condition) -> Result<bool>;
    async fn create_result(&self, input: ResultInput) -> Result<ExamResult>;
    async fn update_result(&self, id: i64, input: ResultInput) -> Result<Option<ExamResult>>;
    async fn delete_result(&self, id: i64) -> Result<bool>;

    /// 考勤
    async fn list_attendance(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<AttendanceRow>>;
    async fn attendance_in_scope(&self, id: i64, scope: Condition) -> Result<bool>;
    async fn create_attendance(&self, input: AttendanceInput) -> Result<Attendance>;
    async fn update_attendance(
        &self,
        id: i64,
        input: AttendanceInput,
    ) -> Result<Option<Attendance>>;
    async fn delete_attendance(&self, id: i64) -> Result<bool>;

    /// 活动
    async fn list_events(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<EventRow>>;
    async fn list_events_between(
        &self,
        cond: Condition,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<EventRow>>;
    async fn create_event(&self, input: EventInput) -> Result<Event>;
    async fn update_event(&self, id: i64, input: EventInput) -> Result<Option<Event>>;
    async fn delete_event(&self, id: i64) -> Result<bool>;

    /// 公告
    async fn list_announcements(
        &self,
        cond: Condition,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<AnnouncementRow>>;
    async fn create_announcement(&self, input: AnnouncementInput) -> Result<Announcement>;
    async fn update_announcement(
        &self,
        id: i64,
        input: AnnouncementInput,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;

    /// 仪表盘统计
    async fn count_users(&self) -> Result<UserCounts>;
    async fn count_students_by_sex(&self) -> Result<SexCounts>;
    async fn attendance_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<AttendanceDay>>;

    /// 管理员
    async fn ensure_admin(&self, id: &str, username: &str) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
