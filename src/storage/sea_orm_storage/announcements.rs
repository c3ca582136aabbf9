//! 公告存储操作

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, QueryOrder, Select, Set};

use super::listing::{Listing, index_by};
use super::{SeaOrmStorage, from_timestamp, read_err, to_timestamp, write_err};
use crate::entity::prelude::*;
use crate::entity::{announcements, classes};
use crate::errors::Result;
use crate::utils::search_key;
use crate::models::announcements::{
    entities::Announcement, requests::AnnouncementInput, responses::AnnouncementRow,
};

pub(crate) struct AnnouncementListing;

#[async_trait]
impl Listing for AnnouncementListing {
    type Entity = Announcements;
    type Row = AnnouncementRow;
    const WHAT: &'static str = "公告";

    // 最新的公告在前
    fn order(select: Select<Announcements>) -> Select<Announcements> {
        select
            .order_by_desc(announcements::Column::Date)
            .order_by_asc(announcements::Column::Id)
    }

    async fn project(
        txn: &DatabaseTransaction,
        models: Vec<AnnouncementModel>,
    ) -> Result<Vec<AnnouncementRow>> {
        let class_ids = models.iter().filter_map(|m| m.class_id).collect();
        let classes = index_by::<Classes, _, _, _>(txn, classes::Column::Id, class_ids, |c| c.id).await?;

        Ok(models
            .into_iter()
            .map(|m| AnnouncementRow {
                class_name: m
                    .class_id
                    .and_then(|id| classes.get(&id))
                    .map(|c| c.name.clone()),
                id: m.id,
                title: m.title,
                description: m.description,
                date: from_timestamp(m.date),
            })
            .collect())
    }
}

fn apply_input(model: &mut AnnouncementActiveModel, input: AnnouncementInput) {
    model.title = Set(input.title.trim().to_string());
    model.search_key = Set(search_key(&[input.title.as_str()]));
    model.description = Set(input.description.trim().to_string());
    model.date = Set(to_timestamp(input.date));
    model.class_id = Set(input.class_id);
}

impl SeaOrmStorage {
    pub async fn create_announcement_impl(&self, input: AnnouncementInput) -> Result<Announcement> {
        let mut model = <AnnouncementActiveModel as ActiveModelTrait>::default();
        apply_input(&mut model, input);

        let created = model
            .insert(&self.db)
            .await
            .map_err(|e| write_err("创建公告失败", e))?;
        Ok(created.into_announcement())
    }

    pub async fn update_announcement_impl(
        &self,
        id: i64,
        input: AnnouncementInput,
    ) -> Result<Option<Announcement>> {
        let Some(existing) = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询公告失败", e))?
        else {
            return Ok(None);
        };

        let mut model: AnnouncementActiveModel = existing.into();
        apply_input(&mut model, input);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新公告失败", e))?;
        Ok(Some(updated.into_announcement()))
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除公告失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{MONDAY_8AM, memory_storage, seed_school};
    use crate::filters::{
        self,
        test_support::{admin, parent, teacher},
    };
    use crate::models::announcements::requests::{AnnouncementInput, AnnouncementListParams};
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_scope_and_class_names() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let all = storage
            .list_announcements(filters::announcement_condition(&admin(), &AnnouncementListParams::default()), 1, 10)
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 3);

        for viewer in [teacher(), parent()] {
            let page = storage
                .list_announcements(
                    filters::announcement_condition(&viewer, &AnnouncementListParams::default()),
                    1,
                    10,
                )
                .await
                .unwrap();
            let mut classes: Vec<_> = page.items.iter().map(|a| a.class_name.clone()).collect();
            classes.sort();
            assert_eq!(classes, vec![None, Some("1A".to_string())]);
        }
    }

    #[tokio::test]
    async fn test_search_by_title() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let params = AnnouncementListParams {
            search: Some("NEWS".to_string()),
            ..Default::default()
        };
        let page = storage
            .list_announcements(filters::announcement_condition(&admin(), &params), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_mutations() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let input = AnnouncementInput {
            title: "Exam week".to_string(),
            description: "Exams start Monday".to_string(),
            date: chrono::DateTime::from_timestamp(MONDAY_8AM, 0).unwrap(),
            class_id: None,
        };
        let created = storage.create_announcement(input.clone()).await.unwrap();
        let updated = storage
            .update_announcement(created.id, AnnouncementInput { title: "Exam weeks".to_string(), ..input })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Exam weeks");
        assert!(storage.delete_announcement(created.id).await.unwrap());
        assert!(!storage.delete_announcement(created.id).await.unwrap());
    }
}
