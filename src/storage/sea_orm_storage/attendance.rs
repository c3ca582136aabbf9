//! 考勤存储操作

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, QueryOrder, Select, Set};

use super::lessons::lessons_by_id;
use super::listing::{Listing, index_by};
use super::{SeaOrmStorage, from_timestamp, read_err, to_timestamp, write_err};
use crate::entity::prelude::*;
use crate::entity::{attendances, students};
use crate::errors::Result;
use crate::models::attendance::{
    entities::Attendance, requests::AttendanceInput, responses::AttendanceRow,
};

pub(crate) struct AttendanceListing;

#[async_trait]
impl Listing for AttendanceListing {
    type Entity = Attendances;
    type Row = AttendanceRow;
    const WHAT: &'static str = "考勤";

    fn order(select: Select<Attendances>) -> Select<Attendances> {
        select
            .order_by_desc(attendances::Column::Date)
            .order_by_asc(attendances::Column::Id)
    }

    async fn project(
        txn: &DatabaseTransaction,
        models: Vec<AttendanceModel>,
    ) -> Result<Vec<AttendanceRow>> {
        let student_ids = models.iter().map(|m| m.student_id.clone()).collect();
        let students =
            index_by::<Students, _, _, _>(txn, students::Column::Id, student_ids, |s| s.id.clone())
                .await?;
        let lessons = lessons_by_id(txn, models.iter().map(|m| m.lesson_id).collect()).await?;

        Ok(models
            .into_iter()
            .map(|m| AttendanceRow {
                student_name: students
                    .get(&m.student_id)
                    .map(|s| s.full_name())
                    .unwrap_or_default(),
                lesson_name: lessons
                    .get(&m.lesson_id)
                    .map(|l| l.name.clone())
                    .unwrap_or_default(),
                id: m.id,
                student_id: m.student_id,
                date: from_timestamp(m.date),
                present: m.present,
            })
            .collect())
    }
}

impl SeaOrmStorage {
    pub async fn create_attendance_impl(&self, input: AttendanceInput) -> Result<Attendance> {
        let model = AttendanceActiveModel {
            date: Set(to_timestamp(input.date)),
            present: Set(input.present),
            student_id: Set(input.student_id.trim().to_string()),
            lesson_id: Set(input.lesson_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err("创建考勤失败", e))?;

        Ok(model.into_attendance())
    }

    pub async fn update_attendance_impl(
        &self,
        id: i64,
        input: AttendanceInput,
    ) -> Result<Option<Attendance>> {
        let Some(existing) = Attendances::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询考勤失败", e))?
        else {
            return Ok(None);
        };

        let mut model: AttendanceActiveModel = existing.into();
        model.date = Set(to_timestamp(input.date));
        model.present = Set(input.present);
        model.student_id = Set(input.student_id.trim().to_string());
        model.lesson_id = Set(input.lesson_id);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新考勤失败", e))?;
        Ok(Some(updated.into_attendance()))
    }

    pub async fn delete_attendance_impl(&self, id: i64) -> Result<bool> {
        let result = Attendances::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除考勤失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{MONDAY_8AM, memory_storage, seed_school};
    use crate::filters::{
        self,
        test_support::{admin, parent, student, teacher},
    };
    use crate::models::attendance::requests::{AttendanceInput, AttendanceListParams};
    use crate::models::users::entities::Viewer;
    use crate::storage::Storage;

    async fn student_ids(storage: &super::SeaOrmStorage, viewer: &Viewer, params: &AttendanceListParams) -> Vec<String> {
        storage
            .list_attendance(filters::attendance_condition(viewer, params), 1, 50)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|a| a.student_id)
            .collect()
    }

    #[tokio::test]
    async fn test_role_scope() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;
        let all = AttendanceListParams::default();

        assert_eq!(student_ids(&storage, &admin(), &all).await.len(), 2);
        for viewer in [teacher(), student(), parent()] {
            assert_eq!(student_ids(&storage, &viewer, &all).await, vec!["student_1"]);
        }
    }

    #[tokio::test]
    async fn test_lesson_filter_and_projection() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let params = AttendanceListParams {
            lesson_id: Some(school.lesson_b),
            ..Default::default()
        };
        let page = storage
            .list_attendance(filters::attendance_condition(&admin(), &params), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].lesson_name, "Art 2B");
        assert_eq!(page.items[0].student_name, "Sue Student");
        assert!(!page.items[0].present);
    }

    #[tokio::test]
    async fn test_mutations_and_scope_check() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;
        let scope = || filters::attendance_condition(&teacher(), &AttendanceListParams::default());

        assert!(storage.attendance_in_scope(school.attendance_a, scope()).await.unwrap());
        assert!(!storage.attendance_in_scope(school.attendance_b, scope()).await.unwrap());

        let input = AttendanceInput {
            date: chrono::DateTime::from_timestamp(MONDAY_8AM, 0).unwrap(),
            present: false,
            student_id: "student_1".to_string(),
            lesson_id: school.lesson_a,
        };
        let created = storage.create_attendance(input.clone()).await.unwrap();
        assert!(!created.present);

        let corrected = AttendanceInput { present: true, ..input };
        let updated = storage.update_attendance(created.id, corrected).await.unwrap().unwrap();
        assert!(updated.present);

        assert!(storage.delete_attendance(created.id).await.unwrap());
        assert!(!storage.delete_attendance(created.id).await.unwrap());
    }
}
