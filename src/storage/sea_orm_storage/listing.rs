//! 通用分页列表
//!
//! 每个实体实现 [`Listing`] 描述排序和行投影，[`list_page`] 负责在同一个只读事务中
//! 读取总数、当前页数据以及关联名称。

use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, Select,
    TransactionTrait,
};
use ts_rs::TS;

use super::read_err;
use crate::errors::Result;
use crate::models::PaginatedResponse;

pub(crate) type ModelOf<L> = <<L as Listing>::Entity as EntityTrait>::Model;

/// 分页列表的实体描述
#[async_trait]
pub(crate) trait Listing {
    type Entity: EntityTrait;
    type Row: TS + Send;

    /// 用于错误信息的实体名称
    const WHAT: &'static str;

    /// 确定性排序，保证同一行不会出现在两页上
    fn order(select: Select<Self::Entity>) -> Select<Self::Entity>;

    /// 把当前页的模型投影为列表行（在同一事务内补齐关联名称）
    async fn project(txn: &DatabaseTransaction, models: Vec<ModelOf<Self>>)
    -> Result<Vec<Self::Row>>;
}

/// 读取一页数据及匹配总数
pub(crate) async fn list_page<L: Listing>(
    db: &DatabaseConnection,
    cond: Condition,
    page: u64,
    page_size: u64,
) -> Result<PaginatedResponse<L::Row>>
where
    ModelOf<L>: Sync,
{
    let page = page.max(1);
    let page_size = page_size.max(1);

    // SQLite 的事务本身就是快照读
    let txn = match db.get_database_backend() {
        DbBackend::Sqlite => db.begin().await,
        _ => {
            db.begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
        }
    }
    .map_err(|e| read_err("开启只读事务失败", e))?;

    let paginator = L::order(L::Entity::find().filter(cond)).paginate(&txn, page_size);

    let total = paginator
        .num_items()
        .await
        .map_err(|e| read_err(&format!("查询{}总数失败", L::WHAT), e))?;

    // 偏移溢出或超出总数的页码直接返回空页
    let models = match (page - 1).checked_mul(page_size) {
        Some(offset) if offset < total => paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| read_err(&format!("查询{}列表失败", L::WHAT), e))?,
        _ => Vec::new(),
    };

    let rows = L::project(&txn, models).await?;

    txn.commit()
        .await
        .map_err(|e| read_err("提交只读事务失败", e))?;

    Ok(PaginatedResponse::new(rows, page, page_size, total))
}

/// 按主键批量读取并建立 id -> 模型 的映射
pub(crate) async fn index_by<E, C, K, F>(
    conn: &C,
    column: E::Column,
    ids: Vec<K>,
    key: F,
) -> Result<HashMap<K, E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
    K: Eq + Hash + Clone + Into<sea_orm::Value>,
    F: Fn(&E::Model) -> K,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let models = E::find()
        .filter(column.is_in(dedup(ids)))
        .all(conn)
        .await
        .map_err(|e| read_err("查询关联数据失败", e))?;

    Ok(models.into_iter().map(|m| (key(&m), m)).collect())
}

fn dedup<K: Eq + Hash + Clone>(ids: Vec<K>) -> Vec<K> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// 按 key 分组收集名称，保持读取顺序
pub(crate) fn group_names<K, I>(pairs: I) -> HashMap<K, Vec<String>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, String)>,
{
    let mut grouped: HashMap<K, Vec<String>> = HashMap::new();
    for (key, name) in pairs {
        grouped.entry(key).or_default().push(name);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_names() {
        let grouped = group_names(vec![
            (1, "Math".to_string()),
            (2, "Art".to_string()),
            (1, "Physics".to_string()),
        ]);
        assert_eq!(grouped[&1], vec!["Math", "Physics"]);
        assert_eq!(grouped[&2], vec!["Art"]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        assert_eq!(dedup(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
