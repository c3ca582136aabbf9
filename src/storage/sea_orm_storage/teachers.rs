//! 教师存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};

use super::listing::{Listing, group_names};
use super::{PersonKeys, SeaOrmStorage, person_conflict, read_err, to_timestamp, write_err};
use crate::entity::prelude::*;
use crate::entity::{classes, lessons, subjects, teacher_subjects, teachers};
use crate::errors::Result;
use crate::models::{
    teachers::{
        entities::Teacher,
        requests::TeacherInput,
        responses::{TeacherDetail, TeacherRow},
    },
    users::entities::NamedRef,
};
use crate::storage::{PersonClaim, UniqueField};

pub(crate) struct TeacherListing;

#[async_trait]
impl Listing for TeacherListing {
    type Entity = Teachers;
    type Row = TeacherRow;
    const WHAT: &'static str = "教师";

    fn order(select: Select<Teachers>) -> Select<Teachers> {
        select
            .order_by_asc(teachers::Column::Name)
            .order_by_asc(teachers::Column::Id)
    }

    async fn project(txn: &DatabaseTransaction, models: Vec<TeacherModel>) -> Result<Vec<TeacherRow>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();

        let links = TeacherSubjects::find()
            .filter(teacher_subjects::Column::TeacherId.is_in(ids.clone()))
            .find_also_related(Subjects)
            .order_by_asc(subjects::Column::Name)
            .all(txn)
            .await
            .map_err(|e| read_err("查询教师科目失败", e))?;
        let mut subject_names = group_names(
            links
                .into_iter()
                .filter_map(|(link, subject)| subject.map(|s| (link.teacher_id, s.name))),
        );

        // 列表中展示的是教师担任班主任的班级
        let supervised = Classes::find()
            .filter(classes::Column::SupervisorId.is_in(ids))
            .order_by_asc(classes::Column::Name)
            .all(txn)
            .await
            .map_err(|e| read_err("查询教师班级失败", e))?;
        let mut class_names = group_names(
            supervised
                .into_iter()
                .filter_map(|c| c.supervisor_id.map(|id| (id, c.name))),
        );

        Ok(models
            .into_iter()
            .map(|m| TeacherRow {
                subjects: subject_names.remove(&m.id).unwrap_or_default(),
                classes: class_names.remove(&m.id).unwrap_or_default(),
                id: m.id,
                username: m.username,
                name: m.name,
                surname: m.surname,
                email: m.email,
                phone: m.phone,
                address: m.address,
                img: m.img,
            })
            .collect())
    }
}

fn teacher_keys() -> PersonKeys<teachers::Column> {
    PersonKeys {
        id: teachers::Column::Id,
        username: teachers::Column::Username,
        email: teachers::Column::Email,
        phone: teachers::Column::Phone,
    }
}

fn dedup_subjects(mut subjects: Vec<i64>) -> Vec<i64> {
    subjects.sort_unstable();
    subjects.dedup();
    subjects
}

async fn replace_subjects(txn: &DatabaseTransaction, teacher_id: &str, subjects: Vec<i64>) -> Result<()> {
    TeacherSubjects::delete_many()
        .filter(teacher_subjects::Column::TeacherId.eq(teacher_id))
        .exec(txn)
        .await
        .map_err(|e| write_err("清除教师科目失败", e))?;

    let links: Vec<TeacherSubjectActiveModel> = dedup_subjects(subjects)
        .into_iter()
        .map(|subject_id| TeacherSubjectActiveModel {
            teacher_id: Set(teacher_id.to_string()),
            subject_id: Set(subject_id),
        })
        .collect();
    if links.is_empty() {
        return Ok(());
    }

    TeacherSubjects::insert_many(links)
        .exec_without_returning(txn)
        .await
        .map_err(|e| write_err("保存教师科目失败", e))?;
    Ok(())
}

impl SeaOrmStorage {
    /// 教师详情（附科目、课程、班级数量）
    pub async fn get_teacher_detail_impl(
        &self,
        id: &str,
        scope: Condition,
    ) -> Result<Option<TeacherDetail>> {
        let Some(model) = Teachers::find_by_id(id)
            .filter(scope)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询教师失败", e))?
        else {
            return Ok(None);
        };

        let subject_count = TeacherSubjects::find()
            .filter(teacher_subjects::Column::TeacherId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| read_err("统计教师科目失败", e))?;
        let lesson_count = Lessons::find()
            .filter(lessons::Column::TeacherId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| read_err("统计教师课程失败", e))?;
        let class_count = Classes::find()
            .filter(classes::Column::SupervisorId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| read_err("统计教师班级失败", e))?;

        Ok(Some(TeacherDetail {
            teacher: model.into_teacher(),
            subject_count: subject_count as i64,
            lesson_count: lesson_count as i64,
            class_count: class_count as i64,
        }))
    }

    /// 按姓名排序的教师名单
    pub async fn list_teacher_names_impl(&self) -> Result<Vec<NamedRef<String>>> {
        let models = TeacherListing::order(Teachers::find())
            .all(&self.db)
            .await
            .map_err(|e| read_err("查询教师名单失败", e))?;

        Ok(models
            .into_iter()
            .map(|m| NamedRef {
                name: m.full_name(),
                id: m.id,
            })
            .collect())
    }

    pub async fn find_teacher_conflict_impl(
        &self,
        claim: PersonClaim<'_>,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>> {
        person_conflict::<Teachers>(&self.db, teacher_keys(), claim, exclude_id).await
    }

    /// 所有 id 都对应已存在的教师
    pub async fn teachers_exist_impl(&self, ids: &[String]) -> Result<bool> {
        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();
        if unique.is_empty() {
            return Ok(true);
        }

        let found = Teachers::find()
            .filter(teachers::Column::Id.is_in(unique.clone()))
            .count(&self.db)
            .await
            .map_err(|e| read_err("查询教师失败", e))?;
        Ok(found == unique.len() as u64)
    }

    /// 创建教师并关联科目
    pub async fn create_teacher_impl(&self, id: String, input: TeacherInput) -> Result<Teacher> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| write_err("开启事务失败", e))?;

        let model = TeacherActiveModel {
            id: Set(id.clone()),
            username: Set(input.profile.username()),
            name: Set(input.profile.name.trim().to_string()),
            surname: Set(input.profile.surname.trim().to_string()),
            search_key: Set(input.profile.search_key()),
            email: Set(input.profile.email()),
            phone: Set(input.profile.phone()),
            address: Set(input.profile.address.trim().to_string()),
            img: Set(input.img.clone()),
            blood_type: Set(input.blood_type.trim().to_string()),
            sex: Set(input.sex.to_string()),
            birthday: Set(to_timestamp(input.birthday)),
            created_at: Set(chrono::Utc::now().timestamp()),
        }
        .insert(&txn)
        .await
        .map_err(|e| write_err("创建教师失败", e))?;

        replace_subjects(&txn, &id, input.subjects).await?;

        txn.commit()
            .await
            .map_err(|e| write_err("提交事务失败", e))?;
        Ok(model.into_teacher())
    }

    /// 更新教师资料并整体替换其科目
    pub async fn update_teacher_impl(
        &self,
        id: &str,
        input: TeacherInput,
    ) -> Result<Option<Teacher>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| write_err("开启事务失败", e))?;

        let Some(existing) = Teachers::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| read_err("查询教师失败", e))?
        else {
            return Ok(None);
        };

        let mut model: TeacherActiveModel = existing.into();
        model.username = Set(input.profile.username());
        model.name = Set(input.profile.name.trim().to_string());
        model.surname = Set(input.profile.surname.trim().to_string());
        model.search_key = Set(input.profile.search_key());
        model.email = Set(input.profile.email());
        model.phone = Set(input.profile.phone());
        model.address = Set(input.profile.address.trim().to_string());
        model.img = Set(input.img.clone());
        model.blood_type = Set(input.blood_type.trim().to_string());
        model.sex = Set(input.sex.to_string());
        model.birthday = Set(to_timestamp(input.birthday));

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| write_err("更新教师失败", e))?;

        replace_subjects(&txn, id, input.subjects).await?;

        txn.commit()
            .await
            .map_err(|e| write_err("提交事务失败", e))?;
        Ok(Some(updated.into_teacher()))
    }

    /// 删除教师
    pub async fn delete_teacher_impl(&self, id: &str) -> Result<bool> {
        let result = Teachers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除教师失败", e))?;

        Ok(result.rows_affected > 0)
    }
}
