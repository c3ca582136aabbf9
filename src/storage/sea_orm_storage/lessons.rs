//! 课程存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Select,
    Set,
};

use super::listing::{Listing, index_by};
use super::{SeaOrmStorage, from_timestamp, read_err, to_timestamp, write_err};
use crate::entity::prelude::*;
use crate::entity::{classes, lessons, subjects, teachers};
use crate::errors::Result;
use crate::utils::search_key;
use crate::models::lessons::{
    entities::Lesson,
    requests::LessonInput,
    responses::{LessonRow, ScheduleEntry},
};

/// 课程行附带的科目、班级、教师名称
pub(crate) struct LessonNames {
    pub subjects: std::collections::HashMap<i64, SubjectModel>,
    pub classes: std::collections::HashMap<i64, ClassModel>,
    pub teachers: std::collections::HashMap<String, TeacherModel>,
}

impl LessonNames {
    /// 批量读取一组课程涉及的关联记录
    pub(crate) async fn load(txn: &DatabaseTransaction, lessons: &[LessonModel]) -> Result<Self> {
        let subject_ids = lessons.iter().map(|l| l.subject_id).collect();
        let class_ids = lessons.iter().map(|l| l.class_id).collect();
        let teacher_ids = lessons.iter().map(|l| l.teacher_id.clone()).collect();

        Ok(Self {
            subjects: index_by::<Subjects, _, _, _>(txn, subjects::Column::Id, subject_ids, |s| s.id)
                .await?,
            classes: index_by::<Classes, _, _, _>(txn, classes::Column::Id, class_ids, |c| c.id)
                .await?,
            teachers: index_by::<Teachers, _, _, _>(txn, teachers::Column::Id, teacher_ids, |t| {
                t.id.clone()
            })
            .await?,
        })
    }

    pub(crate) fn subject(&self, lesson: &LessonModel) -> String {
        self.subjects
            .get(&lesson.subject_id)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    pub(crate) fn class(&self, lesson: &LessonModel) -> String {
        self.classes
            .get(&lesson.class_id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    pub(crate) fn teacher(&self, lesson: &LessonModel) -> String {
        self.teachers
            .get(&lesson.teacher_id)
            .map(|t| t.full_name())
            .unwrap_or_default()
    }
}

/// 读取考试、作业等记录所属的课程
pub(crate) async fn lessons_by_id(
    txn: &DatabaseTransaction,
    ids: Vec<i64>,
) -> Result<std::collections::HashMap<i64, LessonModel>> {
    index_by::<Lessons, _, _, _>(txn, lessons::Column::Id, ids, |l| l.id).await
}

pub(crate) struct LessonListing;

#[async_trait]
impl Listing for LessonListing {
    type Entity = Lessons;
    type Row = LessonRow;
    const WHAT: &'static str = "课程";

    fn order(select: Select<Lessons>) -> Select<Lessons> {
        select
            .order_by_asc(lessons::Column::Name)
            .order_by_asc(lessons::Column::Id)
    }

    async fn project(txn: &DatabaseTransaction, models: Vec<LessonModel>) -> Result<Vec<LessonRow>> {
        let names = LessonNames::load(txn, &models).await?;

        Ok(models
            .into_iter()
            .map(|m| LessonRow {
                subject_name: names.subject(&m),
                class_name: names.class(&m),
                teacher_name: names.teacher(&m),
                id: m.id,
                day: m.day.parse().unwrap_or_default(),
                start_time: from_timestamp(m.start_time),
                end_time: from_timestamp(m.end_time),
                name: m.name,
            })
            .collect())
    }
}

fn apply_input(model: &mut LessonActiveModel, input: LessonInput) {
    model.name = Set(input.name.trim().to_string());
    model.search_key = Set(search_key(&[input.name.as_str()]));
    model.day = Set(input.day.to_string());
    model.start_time = Set(to_timestamp(input.start_time));
    model.end_time = Set(to_timestamp(input.end_time));
    model.subject_id = Set(input.subject_id);
    model.class_id = Set(input.class_id);
    model.teacher_id = Set(input.teacher_id.trim().to_string());
}

impl SeaOrmStorage {
    /// 日程视图：按开始时间排列的课程
    pub async fn list_schedule_impl(&self, cond: Condition) -> Result<Vec<ScheduleEntry>> {
        let models = Lessons::find()
            .filter(cond)
            .order_by_asc(lessons::Column::StartTime)
            .order_by_asc(lessons::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| read_err("查询课程表失败", e))?;

        Ok(models
            .into_iter()
            .map(|m| ScheduleEntry {
                id: m.id,
                title: m.name,
                start: from_timestamp(m.start_time),
                end: from_timestamp(m.end_time),
            })
            .collect())
    }

    pub async fn create_lesson_impl(&self, input: LessonInput) -> Result<Lesson> {
        let mut model = <LessonActiveModel as ActiveModelTrait>::default();
        apply_input(&mut model, input);

        let created = model
            .insert(&self.db)
            .await
            .map_err(|e| write_err("创建课程失败", e))?;
        Ok(created.into_lesson())
    }

    pub async fn update_lesson_impl(&self, id: i64, input: LessonInput) -> Result<Option<Lesson>> {
        let Some(existing) = Lessons::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询课程失败", e))?
        else {
            return Ok(None);
        };

        let mut model: LessonActiveModel = existing.into();
        apply_input(&mut model, input);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新课程失败", e))?;
        Ok(Some(updated.into_lesson()))
    }

    /// 删除课程，其考试、作业和考勤级联删除
    pub async fn delete_lesson_impl(&self, id: i64) -> Result<bool> {
        let result = Lessons::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除课程失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{MONDAY_8AM, insert_lesson, memory_storage, seed_school};
    use crate::filters::{
        self,
        test_support::{admin, parent, student, teacher},
    };
    use crate::models::lessons::entities::Day;
    use crate::models::lessons::requests::{LessonInput, LessonListParams, ScheduleParams};
    use crate::models::users::entities::Viewer;
    use crate::storage::Storage;

    async fn visible(storage: &super::SeaOrmStorage, viewer: &Viewer, params: &LessonListParams) -> Vec<String> {
        storage
            .list_lessons(filters::lesson_condition(viewer, params), 1, 50)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|l| l.name)
            .collect()
    }

    #[tokio::test]
    async fn test_role_scope() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;
        let all = LessonListParams::default();

        assert_eq!(visible(&storage, &admin(), &all).await, vec!["Art 2B", "Math 1A"]);
        assert_eq!(visible(&storage, &teacher(), &all).await, vec!["Math 1A"]);
        assert_eq!(visible(&storage, &student(), &all).await, vec!["Math 1A"]);
        assert_eq!(visible(&storage, &parent(), &all).await, vec!["Math 1A"]);
    }

    #[tokio::test]
    async fn test_teacher_and_class_filters_combine() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;
        // teacher_1 在 2B 也有一节课
        insert_lesson(&storage.db, "Math 2B", school.math, school.class_b, "teacher_1", MONDAY_8AM).await;

        let both = LessonListParams {
            teacher_id: Some("teacher_1".to_string()),
            class_id: Some(school.class_b),
            ..Default::default()
        };
        assert_eq!(visible(&storage, &admin(), &both).await, vec!["Math 2B"]);
    }

    #[tokio::test]
    async fn test_search_by_teacher_name() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let params = LessonListParams {
            search: Some("marley".to_string()),
            ..Default::default()
        };
        assert_eq!(visible(&storage, &admin(), &params).await, vec!["Art 2B"]);
    }

    #[tokio::test]
    async fn test_row_projection() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let page = storage
            .list_lessons(filters::lesson_condition(&teacher(), &LessonListParams::default()), 1, 10)
            .await
            .unwrap();
        let row = &page.items[0];
        assert_eq!(row.subject_name, "Math");
        assert_eq!(row.class_name, "1A");
        assert_eq!(row.teacher_name, "Ada Lovelace");
        assert_eq!(row.day, Day::Monday);
    }

    #[tokio::test]
    async fn test_schedule_sorted_by_start() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let cond = filters::lesson_condition(&admin(), &ScheduleParams::default().into());
        let entries = storage.list_schedule(cond).await.unwrap();
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Math 1A", "Art 2B"]);
        assert!(entries[0].end > entries[0].start);
    }

    #[tokio::test]
    async fn test_create_update_delete_cascades() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let input = |name: &str| LessonInput {
            name: name.to_string(),
            day: Day::Wednesday,
            start_time: chrono::DateTime::from_timestamp(MONDAY_8AM, 0).unwrap(),
            end_time: chrono::DateTime::from_timestamp(MONDAY_8AM + 1_800, 0).unwrap(),
            subject_id: school.art,
            class_id: school.class_a,
            teacher_id: "teacher_2".to_string(),
        };

        let created = storage.create_lesson(input("Art 1A")).await.unwrap();
        assert_eq!(created.day, Day::Wednesday);
        let updated = storage.update_lesson(created.id, input("Art 1A (2)")).await.unwrap().unwrap();
        assert_eq!(updated.name, "Art 1A (2)");
        assert!(storage.delete_lesson(created.id).await.unwrap());
        assert!(storage.update_lesson(created.id, input("x")).await.unwrap().is_none());

        // 课程删除后其考试一并删除
        assert!(storage.delete_lesson(school.lesson_a).await.unwrap());
        assert!(!storage.exam_in_scope(school.exam_a, sea_orm::Condition::all()).await.unwrap());
    }
}
