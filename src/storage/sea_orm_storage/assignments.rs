//! 作业存储操作

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, QueryOrder, Select, Set};

use super::lessons::{LessonNames, lessons_by_id};
use super::listing::Listing;
use super::{SeaOrmStorage, from_timestamp, read_err, to_timestamp, write_err};
use crate::entity::assignments;
use crate::entity::prelude::*;
use crate::errors::Result;
use crate::utils::search_key;
use crate::models::assignments::{
    entities::Assignment, requests::AssignmentInput, responses::AssignmentRow,
};

pub(crate) struct AssignmentListing;

#[async_trait]
impl Listing for AssignmentListing {
    type Entity = Assignments;
    type Row = AssignmentRow;
    const WHAT: &'static str = "作业";

    fn order(select: Select<Assignments>) -> Select<Assignments> {
        select
            .order_by_asc(assignments::Column::DueDate)
            .order_by_asc(assignments::Column::Id)
    }

    async fn project(
        txn: &DatabaseTransaction,
        models: Vec<AssignmentModel>,
    ) -> Result<Vec<AssignmentRow>> {
        let lessons = lessons_by_id(txn, models.iter().map(|m| m.lesson_id).collect()).await?;
        let lesson_models: Vec<LessonModel> = lessons.values().cloned().collect();
        let names = LessonNames::load(txn, &lesson_models).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let lesson = lessons.get(&m.lesson_id);
                AssignmentRow {
                    subject_name: lesson.map(|l| names.subject(l)).unwrap_or_default(),
                    class_name: lesson.map(|l| names.class(l)).unwrap_or_default(),
                    teacher_name: lesson.map(|l| names.teacher(l)).unwrap_or_default(),
                    id: m.id,
                    title: m.title,
                    due_date: from_timestamp(m.due_date),
                }
            })
            .collect())
    }
}

impl SeaOrmStorage {
    pub async fn create_assignment_impl(&self, input: AssignmentInput) -> Result<Assignment> {
        let model = AssignmentActiveModel {
            title: Set(input.title.trim().to_string()),
            search_key: Set(search_key(&[input.title.as_str()])),
            start_date: Set(to_timestamp(input.start_date)),
            due_date: Set(to_timestamp(input.due_date)),
            lesson_id: Set(input.lesson_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err("创建作业失败", e))?;

        Ok(model.into_assignment())
    }

    pub async fn update_assignment_impl(
        &self,
        id: i64,
        input: AssignmentInput,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询作业失败", e))?
        else {
            return Ok(None);
        };

        let mut model: AssignmentActiveModel = existing.into();
        model.title = Set(input.title.trim().to_string());
        model.search_key = Set(search_key(&[input.title.as_str()]));
        model.start_date = Set(to_timestamp(input.start_date));
        model.due_date = Set(to_timestamp(input.due_date));
        model.lesson_id = Set(input.lesson_id);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新作业失败", e))?;
        Ok(Some(updated.into_assignment()))
    }

    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除作业失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{DAY, MONDAY_8AM, memory_storage, seed_school};
    use crate::filters::{
        self,
        test_support::{admin, parent, student, teacher},
    };
    use crate::models::assignments::requests::{AssignmentInput, AssignmentListParams};
    use crate::models::users::entities::Viewer;
    use crate::storage::Storage;

    async fn titles(storage: &super::SeaOrmStorage, viewer: &Viewer) -> Vec<String> {
        let cond = filters::assignment_condition(viewer, &AssignmentListParams::default());
        storage
            .list_assignments(cond, 1, 50)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|a| a.title)
            .collect()
    }

    #[tokio::test]
    async fn test_role_scope() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        assert_eq!(titles(&storage, &admin()).await.len(), 2);
        assert_eq!(titles(&storage, &teacher()).await, vec!["Fractions sheet"]);
        assert_eq!(titles(&storage, &student()).await, vec!["Fractions sheet"]);
        assert_eq!(titles(&storage, &parent()).await, vec!["Fractions sheet"]);
    }

    #[tokio::test]
    async fn test_mutations_and_scope_check() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;
        let scope = || filters::assignment_condition(&teacher(), &AssignmentListParams::default());

        assert!(storage.assignment_in_scope(school.assignment_a, scope()).await.unwrap());
        assert!(!storage.assignment_in_scope(school.assignment_b, scope()).await.unwrap());

        let input = AssignmentInput {
            title: "Essay".to_string(),
            start_date: chrono::DateTime::from_timestamp(MONDAY_8AM, 0).unwrap(),
            due_date: chrono::DateTime::from_timestamp(MONDAY_8AM + 3 * DAY, 0).unwrap(),
            lesson_id: school.lesson_b,
        };
        let created = storage.create_assignment(input.clone()).await.unwrap();
        assert_eq!(created.lesson_id, school.lesson_b);

        let page = storage
            .list_assignments(filters::assignment_condition(&admin(), &AssignmentListParams::default()), 1, 10)
            .await
            .unwrap();
        // 按截止日期排序，新作业最早到期
        assert_eq!(page.items[0].title, "Essay");
        assert_eq!(page.items[0].subject_name, "Art");

        assert!(storage.update_assignment(created.id, input).await.unwrap().is_some());
        assert!(storage.delete_assignment(created.id).await.unwrap());
        assert!(!storage.delete_assignment(created.id).await.unwrap());
    }
}
