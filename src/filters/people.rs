use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, QueryTrait};

use super::{class_of_student, classes_taught_by, key_contains, search_pattern};
use crate::entity::{lessons, students, teachers};
use crate::models::parents::requests::ParentListParams;
use crate::models::students::requests::StudentListParams;
use crate::models::teachers::requests::TeacherListParams;
use crate::models::users::entities::{UserRole, Viewer};

/// 教师列表条件
///
/// 教师名录对所有角色开放，只应用参数过滤。
pub fn teacher_condition(_viewer: &Viewer, params: &TeacherListParams) -> Condition {
    let mut cond = Condition::all();

    if let Some(class_id) = params.class_id {
        let teaching = lessons::Entity::find()
            .select_only()
            .column(lessons::Column::TeacherId)
            .filter(lessons::Column::ClassId.eq(class_id))
            .into_query();
        cond = cond.add(teachers::Column::Id.in_subquery(teaching));
    }

    if let Some(pattern) = search_pattern(&params.search) {
        cond = cond.add(key_contains(teachers::Column::SearchKey, &pattern));
    }

    cond
}

/// 学生列表条件
pub fn student_condition(viewer: &Viewer, params: &StudentListParams) -> Condition {
    let mut cond = Condition::all();

    if let Some(teacher_id) = params.teacher_id.as_deref() {
        cond = cond.add(students::Column::ClassId.in_subquery(classes_taught_by(teacher_id)));
    }
    if let Some(class_id) = params.class_id {
        cond = cond.add(students::Column::ClassId.eq(class_id));
    }
    if let Some(pattern) = search_pattern(&params.search) {
        cond = cond.add(key_contains(students::Column::SearchKey, &pattern));
    }

    let uid = viewer.user_id.as_str();
    match viewer.role {
        UserRole::Admin => cond,
        UserRole::Teacher => cond.add(students::Column::ClassId.in_subquery(classes_taught_by(uid))),
        UserRole::Student => cond.add(students::Column::ClassId.in_subquery(class_of_student(uid))),
        UserRole::Parent => cond.add(students::Column::ParentId.eq(uid)),
    }
}

/// 家长列表条件
pub fn parent_condition(viewer: &Viewer, params: &ParentListParams) -> Condition {
    use crate::entity::parents;

    let mut cond = Condition::all();

    if let Some(pattern) = search_pattern(&params.search) {
        cond = cond.add(key_contains(parents::Column::SearchKey, &pattern));
    }

    let uid = viewer.user_id.as_str();
    let parents_of = |students_cond: Condition| {
        students::Entity::find()
            .select_only()
            .column(students::Column::ParentId)
            .filter(students_cond)
            .into_query()
    };

    match viewer.role {
        UserRole::Admin => cond,
        UserRole::Teacher => cond.add(parents::Column::Id.in_subquery(parents_of(
            Condition::all().add(students::Column::ClassId.in_subquery(classes_taught_by(uid))),
        ))),
        UserRole::Student => cond.add(parents::Column::Id.in_subquery(parents_of(
            Condition::all().add(students::Column::Id.eq(uid)),
        ))),
        UserRole::Parent => cond.add(parents::Column::Id.eq(uid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::parents;
    use crate::filters::test_support::*;

    #[test]
    fn test_teacher_directory_is_unscoped() {
        let params = TeacherListParams::default();
        for viewer in [admin(), teacher(), student(), parent()] {
            let sql = sql::<teachers::Entity>(teacher_condition(&viewer, &params));
            assert!(!sql.contains(&viewer.user_id), "{sql}");
        }
    }

    #[test]
    fn test_teacher_search_and_class() {
        let params = TeacherListParams {
            search: Some("Jo_".to_string()),
            class_id: Some(3),
            ..Default::default()
        };
        let sql = sql::<teachers::Entity>(teacher_condition(&admin(), &params));
        assert!(sql.contains(r#""search_key" LIKE '%jo!_%' ESCAPE '!'"#), "{sql}");
        assert!(sql.contains(r#""class_id" = 3"#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn test_student_scope_per_role() {
        let params = StudentListParams::default();

        let sql_t = sql::<students::Entity>(student_condition(&teacher(), &params));
        assert!(sql_t.contains(r#""teacher_id" = 'teacher_1'"#), "{sql_t}");

        let sql_s = sql::<students::Entity>(student_condition(&student(), &params));
        assert!(sql_s.contains(r#""id" = 'student_1'"#), "{sql_s}");

        let sql_p = sql::<students::Entity>(student_condition(&parent(), &params));
        assert!(sql_p.contains(r#""parent_id" = 'parent_1'"#), "{sql_p}");

        let sql_a = sql::<students::Entity>(student_condition(&admin(), &params));
        assert!(!sql_a.contains("admin_1"), "{sql_a}");
    }

    #[test]
    fn test_student_params_combine_with_scope() {
        let params = StudentListParams {
            teacher_id: Some("teacher_9".to_string()),
            class_id: Some(4),
            ..Default::default()
        };
        let sql = sql::<students::Entity>(student_condition(&parent(), &params));
        assert!(sql.contains("'teacher_9'"), "{sql}");
        assert!(sql.contains(r#""class_id" = 4"#), "{sql}");
        assert!(sql.contains("'parent_1'"), "{sql}");
    }

    #[test]
    fn test_parent_scope() {
        let params = ParentListParams::default();
        let sql_p = sql::<parents::Entity>(parent_condition(&parent(), &params));
        assert!(sql_p.contains(r#""id" = 'parent_1'"#), "{sql_p}");

        let sql_s = sql::<parents::Entity>(parent_condition(&student(), &params));
        assert!(sql_s.contains("'student_1'"), "{sql_s}");
    }
}
