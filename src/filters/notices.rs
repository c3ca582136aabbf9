use sea_orm::{ColumnTrait, Condition};

use super::{class_of_student, classes_of_children, classes_taught_by, key_contains, search_pattern};
use crate::entity::{announcements, events};
use crate::models::announcements::requests::AnnouncementListParams;
use crate::models::events::requests::EventListParams;
use crate::models::users::entities::{UserRole, Viewer};

/// 活动与公告共用：全校条目（class_id 为空）或访问者相关班级的条目
fn class_notice<C: ColumnTrait>(
    class_column: C,
    key_column: C,
    viewer: &Viewer,
    search: &Option<String>,
    class_id: Option<i64>,
) -> Condition {
    let mut cond = Condition::all();

    if let Some(class_id) = class_id {
        cond = cond.add(class_column.eq(class_id));
    }
    if let Some(pattern) = search_pattern(search) {
        cond = cond.add(key_contains(key_column, &pattern));
    }

    let uid = viewer.user_id.as_str();
    let classes = match viewer.role {
        UserRole::Admin => return cond,
        UserRole::Teacher => classes_taught_by(uid),
        UserRole::Student => class_of_student(uid),
        UserRole::Parent => classes_of_children(uid),
    };

    cond.add(
        Condition::any()
            .add(class_column.is_null())
            .add(class_column.in_subquery(classes)),
    )
}

/// 活动列表条件
pub fn event_condition(viewer: &Viewer, params: &EventListParams) -> Condition {
    class_notice(
        events::Column::ClassId,
        events::Column::SearchKey,
        viewer,
        &params.search,
        params.class_id,
    )
}

/// 公告列表条件
pub fn announcement_condition(viewer: &Viewer, params: &AnnouncementListParams) -> Condition {
    class_notice(
        announcements::Column::ClassId,
        announcements::Column::SearchKey,
        viewer,
        &params.search,
        params.class_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::*;

    #[test]
    fn test_global_events_visible_to_student() {
        let sql = sql::<events::Entity>(event_condition(&student(), &EventListParams::default()));
        assert!(sql.contains(r#""class_id" IS NULL"#), "{sql}");
        assert!(sql.contains("'student_1'"), "{sql}");
    }

    #[test]
    fn test_admin_sees_everything() {
        let sql = sql::<announcements::Entity>(announcement_condition(
            &admin(),
            &AnnouncementListParams::default(),
        ));
        assert!(!sql.contains("IS NULL"), "{sql}");
    }

    #[test]
    fn test_title_search() {
        let params = AnnouncementListParams {
            search: Some("Trip".to_string()),
            class_id: Some(1),
            ..Default::default()
        };
        let sql = sql::<announcements::Entity>(announcement_condition(&parent(), &params));
        assert!(sql.contains("'%trip%'"), "{sql}");
        assert!(sql.contains(r#""class_id" = 1"#), "{sql}");
        assert!(sql.contains("'parent_1'"), "{sql}");
    }
}
