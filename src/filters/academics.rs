use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, QueryTrait};

use super::{
    children_of, class_of_student, classes_of_children, classes_taught_by, key_contains,
    lesson_ids, lessons_taught_by, search_pattern, students_named, teachers_named,
};
use crate::entity::{assignments, attendances, classes, exams, lessons, results, subjects};
use crate::models::assignments::requests::AssignmentListParams;
use crate::models::attendance::requests::AttendanceListParams;
use crate::models::classes::requests::ClassListParams;
use crate::models::exams::requests::ExamListParams;
use crate::models::lessons::requests::LessonListParams;
use crate::models::results::requests::ResultListParams;
use crate::models::subjects::requests::SubjectListParams;
use crate::models::users::entities::{UserRole, Viewer};

/// 科目列表条件，科目目录对所有角色开放
pub fn subject_condition(_viewer: &Viewer, params: &SubjectListParams) -> Condition {
    match search_pattern(&params.search) {
        Some(pattern) => Condition::all().add(key_contains(subjects::Column::SearchKey, &pattern)),
        None => Condition::all(),
    }
}

/// 班级列表条件
pub fn class_condition(viewer: &Viewer, params: &ClassListParams) -> Condition {
    let mut cond = Condition::all();

    if let Some(supervisor_id) = params.supervisor_id.as_deref() {
        cond = cond.add(classes::Column::SupervisorId.eq(supervisor_id));
    }
    if let Some(pattern) = search_pattern(&params.search) {
        cond = cond.add(key_contains(classes::Column::SearchKey, &pattern));
    }

    let uid = viewer.user_id.as_str();
    match viewer.role {
        UserRole::Admin => cond,
        UserRole::Teacher => cond.add(
            Condition::any()
                .add(classes::Column::SupervisorId.eq(uid))
                .add(classes::Column::Id.in_subquery(classes_taught_by(uid))),
        ),
        UserRole::Student => cond.add(classes::Column::Id.in_subquery(class_of_student(uid))),
        UserRole::Parent => cond.add(classes::Column::Id.in_subquery(classes_of_children(uid))),
    }
}

/// 课程本身的可见范围（课程、考试、作业共用）
fn lesson_scope(viewer: &Viewer) -> Option<Condition> {
    let uid = viewer.user_id.as_str();
    match viewer.role {
        UserRole::Admin => None,
        UserRole::Teacher => Some(Condition::all().add(lessons::Column::TeacherId.eq(uid))),
        UserRole::Student => {
            Some(Condition::all().add(lessons::Column::ClassId.in_subquery(class_of_student(uid))))
        }
        UserRole::Parent => Some(
            Condition::all().add(lessons::Column::ClassId.in_subquery(classes_of_children(uid))),
        ),
    }
}

/// 课程列表条件；teacherId 与 classId 同时生效
pub fn lesson_condition(viewer: &Viewer, params: &LessonListParams) -> Condition {
    let mut cond = Condition::all();

    if let Some(teacher_id) = params.teacher_id.as_deref() {
        cond = cond.add(lessons::Column::TeacherId.eq(teacher_id));
    }
    if let Some(class_id) = params.class_id {
        cond = cond.add(lessons::Column::ClassId.eq(class_id));
    }
    if let Some(pattern) = search_pattern(&params.search) {
        cond = cond.add(
            Condition::any()
                .add(key_contains(lessons::Column::SearchKey, &pattern))
                .add(lessons::Column::TeacherId.in_subquery(teachers_named(&pattern))),
        );
    }

    match lesson_scope(viewer) {
        Some(scope) => cond.add(scope),
        None => cond,
    }
}

/// 通过所属课程过滤的条件（考试与作业）
///
/// 搜索匹配科目名或任课教师姓名。
fn via_lesson<C: ColumnTrait>(
    lesson_column: C,
    viewer: &Viewer,
    search: &Option<String>,
    teacher_id: Option<&str>,
    class_id: Option<i64>,
) -> Condition {
    let mut cond = Condition::all();

    if let Some(teacher_id) = teacher_id {
        cond = cond.add(
            lesson_column
                .in_subquery(lesson_ids(Condition::all().add(lessons::Column::TeacherId.eq(teacher_id)))),
        );
    }
    if let Some(class_id) = class_id {
        cond = cond.add(
            lesson_column
                .in_subquery(lesson_ids(Condition::all().add(lessons::Column::ClassId.eq(class_id)))),
        );
    }
    if let Some(pattern) = search_pattern(search) {
        let subjects_named = subjects::Entity::find()
            .select_only()
            .column(subjects::Column::Id)
            .filter(key_contains(subjects::Column::SearchKey, &pattern))
            .into_query();
        cond = cond.add(
            lesson_column.in_subquery(lesson_ids(
                Condition::any()
                    .add(lessons::Column::SubjectId.in_subquery(subjects_named))
                    .add(lessons::Column::TeacherId.in_subquery(teachers_named(&pattern))),
            )),
        );
    }

    match lesson_scope(viewer) {
        Some(scope) => cond.add(lesson_column.in_subquery(lesson_ids(scope))),
        None => cond,
    }
}

/// 考试列表条件
pub fn exam_condition(viewer: &Viewer, params: &ExamListParams) -> Condition {
    via_lesson(
        exams::Column::LessonId,
        viewer,
        &params.search,
        params.teacher_id.as_deref(),
        params.class_id,
    )
}

/// 作业列表条件
pub fn assignment_condition(viewer: &Viewer, params: &AssignmentListParams) -> Condition {
    via_lesson(
        assignments::Column::LessonId,
        viewer,
        &params.search,
        params.teacher_id.as_deref(),
        params.class_id,
    )
}

/// 成绩列表条件
///
/// 教师可见自己课程下考试或作业的成绩；学生只看自己的；家长看子女的。
pub fn result_condition(viewer: &Viewer, params: &ResultListParams) -> Condition {
    let mut cond = Condition::all();

    if let Some(student_id) = params.student_id.as_deref() {
        cond = cond.add(results::Column::StudentId.eq(student_id));
    }
    if let Some(pattern) = search_pattern(&params.search) {
        let exams_titled = exams::Entity::find()
            .select_only()
            .column(exams::Column::Id)
            .filter(key_contains(exams::Column::SearchKey, &pattern))
            .into_query();
        let assignments_titled = assignments::Entity::find()
            .select_only()
            .column(assignments::Column::Id)
            .filter(key_contains(assignments::Column::SearchKey, &pattern))
            .into_query();
        cond = cond.add(
            Condition::any()
                .add(results::Column::ExamId.in_subquery(exams_titled))
                .add(results::Column::AssignmentId.in_subquery(assignments_titled))
                .add(results::Column::StudentId.in_subquery(students_named(&pattern))),
        );
    }

    let uid = viewer.user_id.as_str();
    match viewer.role {
        UserRole::Admin => cond,
        UserRole::Teacher => {
            let own_exams = exams::Entity::find()
                .select_only()
                .column(exams::Column::Id)
                .filter(exams::Column::LessonId.in_subquery(lessons_taught_by(uid)))
                .into_query();
            let own_assignments = assignments::Entity::find()
                .select_only()
                .column(assignments::Column::Id)
                .filter(assignments::Column::LessonId.in_subquery(lessons_taught_by(uid)))
                .into_query();
            cond.add(
                Condition::any()
                    .add(results::Column::ExamId.in_subquery(own_exams))
                    .add(results::Column::AssignmentId.in_subquery(own_assignments)),
            )
        }
        UserRole::Student => cond.add(results::Column::StudentId.eq(uid)),
        UserRole::Parent => cond.add(results::Column::StudentId.in_subquery(children_of(uid))),
    }
}

/// 考勤列表条件
pub fn attendance_condition(viewer: &Viewer, params: &AttendanceListParams) -> Condition {
    let mut cond = Condition::all();

    if let Some(student_id) = params.student_id.as_deref() {
        cond = cond.add(attendances::Column::StudentId.eq(student_id));
    }
    if let Some(lesson_id) = params.lesson_id {
        cond = cond.add(attendances::Column::LessonId.eq(lesson_id));
    }
    if let Some(pattern) = search_pattern(&params.search) {
        cond = cond.add(attendances::Column::StudentId.in_subquery(students_named(&pattern)));
    }

    let uid = viewer.user_id.as_str();
    match viewer.role {
        UserRole::Admin => cond,
        UserRole::Teacher => cond.add(attendances::Column::LessonId.in_subquery(lessons_taught_by(uid))),
        UserRole::Student => cond.add(attendances::Column::StudentId.eq(uid)),
        UserRole::Parent => cond.add(attendances::Column::StudentId.in_subquery(children_of(uid))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::*;

    #[test]
    fn test_subject_search_is_case_insensitive() {
        let params = SubjectListParams {
            search: Some("MATH".to_string()),
            ..Default::default()
        };
        let sql = sql::<subjects::Entity>(subject_condition(&student(), &params));
        assert!(sql.contains(r#""search_key" LIKE '%math%'"#), "{sql}");
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let params = SubjectListParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let sql = sql::<subjects::Entity>(subject_condition(&admin(), &params));
        assert!(!sql.contains("LIKE"), "{sql}");
    }

    #[test]
    fn test_class_scope_for_teacher_includes_supervision() {
        let sql = sql::<classes::Entity>(class_condition(&teacher(), &ClassListParams::default()));
        assert!(sql.contains(r#""supervisor_id" = 'teacher_1'"#), "{sql}");
        assert!(sql.contains(r#""teacher_id" = 'teacher_1'"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn test_lesson_teacher_and_class_apply_together() {
        let params = LessonListParams {
            teacher_id: Some("teacher_7".to_string()),
            class_id: Some(2),
            ..Default::default()
        };
        let sql = sql::<lessons::Entity>(lesson_condition(&admin(), &params));
        assert!(sql.contains(r#""teacher_id" = 'teacher_7'"#), "{sql}");
        assert!(sql.contains(r#""class_id" = 2"#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn test_exam_teacher_and_class_apply_together() {
        let params = ExamListParams {
            teacher_id: Some("teacher_7".to_string()),
            class_id: Some(2),
            ..Default::default()
        };
        let sql = sql::<exams::Entity>(exam_condition(&admin(), &params));
        assert!(sql.contains("'teacher_7'"), "{sql}");
        assert!(sql.contains(r#""class_id" = 2"#), "{sql}");
    }

    #[test]
    fn test_assignment_scope_for_parent() {
        let sql = sql::<assignments::Entity>(assignment_condition(
            &parent(),
            &AssignmentListParams::default(),
        ));
        assert!(sql.contains(r#""parent_id" = 'parent_1'"#), "{sql}");
    }

    #[test]
    fn test_result_scope_per_role() {
        let params = ResultListParams::default();

        let sql_t = sql::<results::Entity>(result_condition(&teacher(), &params));
        assert!(sql_t.contains(r#""exam_id" IN"#), "{sql_t}");
        assert!(sql_t.contains(r#""assignment_id" IN"#), "{sql_t}");
        assert!(sql_t.contains("'teacher_1'"), "{sql_t}");

        let sql_s = sql::<results::Entity>(result_condition(&student(), &params));
        assert!(sql_s.contains(r#""student_id" = 'student_1'"#), "{sql_s}");

        let sql_p = sql::<results::Entity>(result_condition(&parent(), &params));
        assert!(sql_p.contains(r#""parent_id" = 'parent_1'"#), "{sql_p}");
    }

    #[test]
    fn test_attendance_filters() {
        let params = AttendanceListParams {
            student_id: Some("student_5".to_string()),
            lesson_id: Some(11),
            ..Default::default()
        };
        let sql = sql::<attendances::Entity>(attendance_condition(&teacher(), &params));
        assert!(sql.contains("'student_5'"), "{sql}");
        assert!(sql.contains(r#""lesson_id" = 11"#), "{sql}");
        assert!(sql.contains("'teacher_1'"), "{sql}");
    }
}
