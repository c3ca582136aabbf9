//! 家长存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    Select, Set,
};

use super::listing::{Listing, group_names};
use super::{PersonKeys, SeaOrmStorage, person_conflict, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{parents, students};
use crate::errors::Result;
use crate::models::parents::{entities::Parent, requests::ParentInput, responses::ParentRow};
use crate::storage::{PersonClaim, UniqueField};

pub(crate) struct ParentListing;

#[async_trait]
impl Listing for ParentListing {
    type Entity = Parents;
    type Row = ParentRow;
    const WHAT: &'static str = "家长";

    fn order(select: Select<Parents>) -> Select<Parents> {
        select
            .order_by_asc(parents::Column::Name)
            .order_by_asc(parents::Column::Id)
    }

    async fn project(txn: &DatabaseTransaction, models: Vec<ParentModel>) -> Result<Vec<ParentRow>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();

        let children = Students::find()
            .filter(students::Column::ParentId.is_in(ids))
            .order_by_asc(students::Column::Name)
            .all(txn)
            .await
            .map_err(|e| read_err("查询家长的孩子失败", e))?;
        let mut names = group_names(children.into_iter().map(|s| {
            let name = s.full_name();
            (s.parent_id, name)
        }));

        Ok(models
            .into_iter()
            .map(|m| ParentRow {
                students: names.remove(&m.id).unwrap_or_default(),
                id: m.id,
                username: m.username,
                name: m.name,
                surname: m.surname,
                email: m.email,
                phone: m.phone,
                address: m.address,
            })
            .collect())
    }
}

impl SeaOrmStorage {
    pub async fn find_parent_conflict_impl(
        &self,
        claim: PersonClaim<'_>,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>> {
        let keys = PersonKeys {
            id: parents::Column::Id,
            username: parents::Column::Username,
            email: parents::Column::Email,
            phone: parents::Column::Phone,
        };
        person_conflict::<Parents>(&self.db, keys, claim, exclude_id).await
    }

    /// 创建家长
    pub async fn create_parent_impl(&self, id: String, input: ParentInput) -> Result<Parent> {
        let model = ParentActiveModel {
            id: Set(id),
            username: Set(input.profile.username()),
            name: Set(input.profile.name.trim().to_string()),
            surname: Set(input.profile.surname.trim().to_string()),
            search_key: Set(input.profile.search_key()),
            email: Set(input.profile.email()),
            phone: Set(input.profile.phone()),
            address: Set(input.profile.address.trim().to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err("创建家长失败", e))?;

        Ok(model.into_parent())
    }

    /// 更新家长
    pub async fn update_parent_impl(&self, id: &str, input: ParentInput) -> Result<Option<Parent>> {
        let Some(existing) = Parents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询家长失败", e))?
        else {
            return Ok(None);
        };

        let mut model: ParentActiveModel = existing.into();
        model.username = Set(input.profile.username());
        model.name = Set(input.profile.name.trim().to_string());
        model.surname = Set(input.profile.surname.trim().to_string());
        model.search_key = Set(input.profile.search_key());
        model.email = Set(input.profile.email());
        model.phone = Set(input.profile.phone());
        model.address = Set(input.profile.address.trim().to_string());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新家长失败", e))?;

        Ok(Some(updated.into_parent()))
    }

    /// 删除家长；仍有孩子在读时被外键拒绝
    pub async fn delete_parent_impl(&self, id: &str) -> Result<bool> {
        let result = Parents::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除家长失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{insert_parent, memory_storage, seed_school};
    use crate::filters::{
        self,
        test_support::{admin, parent, student, teacher},
    };
    use crate::models::parents::requests::{ParentInput, ParentListParams};
    use crate::models::users::entities::Viewer;
    use crate::models::users::requests::ProfileInput;
    use crate::storage::{PersonClaim, Storage, UniqueField};

    async fn visible_ids(storage: &super::SeaOrmStorage, viewer: &Viewer) -> Vec<String> {
        let cond = filters::parent_condition(viewer, &ParentListParams::default());
        storage
            .list_parents(cond, 1, 50)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|p| p.id)
            .collect()
    }

    #[tokio::test]
    async fn test_role_scope() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;
        insert_parent(&storage.db, "parent_3", "Quinn").await;

        assert_eq!(visible_ids(&storage, &admin()).await.len(), 3);
        assert_eq!(visible_ids(&storage, &teacher()).await, vec!["parent_1"]);
        assert_eq!(visible_ids(&storage, &student()).await, vec!["parent_1"]);
        assert_eq!(visible_ids(&storage, &parent()).await, vec!["parent_1"]);
    }

    #[tokio::test]
    async fn test_row_lists_children() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let page = storage
            .list_parents(filters::parent_condition(&parent(), &ParentListParams::default()), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.items[0].students, vec!["Sam Student"]);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let input = |username: &str| ParentInput {
            id: None,
            profile: ProfileInput {
                username: username.to_string(),
                name: "Rita".to_string(),
                surname: "Moreno".to_string(),
                email: Some("rita@home.net".to_string()),
                phone: Some("+1 555 0100".to_string()),
                address: "5 Oak Ave".to_string(),
            },
        };

        storage.create_parent("p_new".to_string(), input("rita")).await.unwrap();
        assert!(storage.parent_exists("p_new").await.unwrap());
        assert_eq!(
            storage
                .find_parent_conflict(PersonClaim { username: "RITA", ..Default::default() }, None)
                .await
                .unwrap(),
            Some(UniqueField::Username)
        );
        let claim = PersonClaim {
            username: "someone",
            phone: Some("+1 555 0100"),
            ..Default::default()
        };
        assert_eq!(
            storage.find_parent_conflict(claim, None).await.unwrap(),
            Some(UniqueField::Phone)
        );

        let updated = storage.update_parent("p_new", input("rita_m")).await.unwrap().unwrap();
        assert_eq!(updated.username, "rita_m");
        assert!(storage.update_parent("ghost", input("ghost")).await.unwrap().is_none());

        assert!(storage.delete_parent("p_new").await.unwrap());
        assert!(!storage.parent_exists("p_new").await.unwrap());
    }

    #[tokio::test]
    async fn test_parent_with_children_cannot_be_deleted() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        assert!(storage.delete_parent("parent_1").await.is_err());
        assert!(storage.parent_exists("parent_1").await.unwrap());
    }
}
