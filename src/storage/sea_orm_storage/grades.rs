//! 年级存储操作

use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::Result;
use crate::models::grades::{entities::Grade, requests::GradeInput};

impl SeaOrmStorage {
    /// 按级别升序列出全部年级
    pub async fn list_grades_impl(&self) -> Result<Vec<Grade>> {
        let models = Grades::find()
            .order_by_asc(Column::Level)
            .all(&self.db)
            .await
            .map_err(|e| read_err("查询年级失败", e))?;

        Ok(models.into_iter().map(|m| m.into_grade()).collect())
    }

    pub async fn create_grade_impl(&self, input: GradeInput) -> Result<Grade> {
        let model = ActiveModel {
            level: Set(input.level),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err("创建年级失败", e))?;

        Ok(model.into_grade())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::grades::requests::GradeInput;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_grades_sorted_and_unique() {
        let storage = memory_storage().await;
        for level in [3, 1, 2] {
            storage.create_grade(GradeInput { level }).await.unwrap();
        }

        let levels: Vec<_> = storage.list_grades().await.unwrap().iter().map(|g| g.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);

        assert!(storage.grade_level_taken(2).await.unwrap());
        assert!(!storage.grade_level_taken(4).await.unwrap());
        assert!(storage.create_grade(GradeInput { level: 2 }).await.is_err());
    }
}
