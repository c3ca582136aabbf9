//! 管理员存储操作

use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::admins::{ActiveModel, Entity as Admins};
use crate::errors::Result;

impl SeaOrmStorage {
    /// 确保管理员记录存在，新建时返回 true
    pub async fn ensure_admin_impl(&self, id: &str, username: &str) -> Result<bool> {
        let existing = Admins::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询管理员失败", e))?;
        if existing.is_some() {
            return Ok(false);
        }

        ActiveModel {
            id: Set(id.to_string()),
            username: Set(username.to_string()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err("创建管理员失败", e))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let storage = memory_storage().await;

        assert!(storage.ensure_admin("admin_1", "admin").await.unwrap());
        assert!(!storage.ensure_admin("admin_1", "admin").await.unwrap());
        assert_eq!(storage.count_users().await.unwrap().admins, 1);
    }
}
