//! 按角色构造列表查询条件
//!
//! 每个函数都是 `(访问者, 查询参数) -> Condition` 的纯函数：
//! 参数过滤条件与角色可见范围以 AND 组合；管理员只受参数过滤约束。
//! 条件通过子查询沿关系图定位访问者可见的行，不依赖请求上下文或数据库连接。

pub mod academics;
pub mod notices;
pub mod people;

pub use academics::{
    assignment_condition, attendance_condition, class_condition, exam_condition,
    lesson_condition, result_condition, subject_condition,
};
pub use notices::{announcement_condition, event_condition};
pub use people::{parent_condition, student_condition, teacher_condition};

use sea_orm::sea_query::{Expr, ExprTrait, LikeExpr, SelectStatement, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, QueryTrait};

use crate::entity::{lessons, students, teachers};
use crate::utils::like_pattern;
use crate::utils::sql::LIKE_ESCAPE;

/// `search_key LIKE pattern ESCAPE '!'`，检索键与搜索词都已在写入或解析时折叠
pub(crate) fn key_contains<C: ColumnTrait>(key_column: C, pattern: &str) -> SimpleExpr {
    Expr::col(key_column.as_column_ref()).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// 规范化搜索参数，空白视为未提供
pub(crate) fn search_pattern(search: &Option<String>) -> Option<String> {
    search.as_deref().and_then(like_pattern)
}

/// 姓名匹配的教师 ID
pub(crate) fn teachers_named(pattern: &str) -> SelectStatement {
    teachers::Entity::find()
        .select_only()
        .column(teachers::Column::Id)
        .filter(key_contains(teachers::Column::SearchKey, pattern))
        .into_query()
}

/// 姓名匹配的学生 ID
pub(crate) fn students_named(pattern: &str) -> SelectStatement {
    students::Entity::find()
        .select_only()
        .column(students::Column::Id)
        .filter(key_contains(students::Column::SearchKey, pattern))
        .into_query()
}

/// 满足条件的课程 ID
pub(crate) fn lesson_ids(cond: impl Into<Condition>) -> SelectStatement {
    lessons::Entity::find()
        .select_only()
        .column(lessons::Column::Id)
        .filter(cond.into())
        .into_query()
}

/// 该教师任课的课程 ID
pub(crate) fn lessons_taught_by(teacher_id: &str) -> SelectStatement {
    lesson_ids(Condition::all().add(lessons::Column::TeacherId.eq(teacher_id)))
}

/// 该教师任课的班级 ID
pub(crate) fn classes_taught_by(teacher_id: &str) -> SelectStatement {
    lessons::Entity::find()
        .select_only()
        .column(lessons::Column::ClassId)
        .filter(lessons::Column::TeacherId.eq(teacher_id))
        .into_query()
}

/// 该学生所在班级 ID
pub(crate) fn class_of_student(student_id: &str) -> SelectStatement {
    students::Entity::find()
        .select_only()
        .column(students::Column::ClassId)
        .filter(students::Column::Id.eq(student_id))
        .into_query()
}

/// 该家长子女所在班级 ID
pub(crate) fn classes_of_children(parent_id: &str) -> SelectStatement {
    students::Entity::find()
        .select_only()
        .column(students::Column::ClassId)
        .filter(students::Column::ParentId.eq(parent_id))
        .into_query()
}

/// 该家长的子女 ID
pub(crate) fn children_of(parent_id: &str) -> SelectStatement {
    students::Entity::find()
        .select_only()
        .column(students::Column::Id)
        .filter(students::Column::ParentId.eq(parent_id))
        .into_query()
}
