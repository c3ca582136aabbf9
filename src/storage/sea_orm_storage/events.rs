//! 活动存储操作

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::listing::{Listing, index_by};
use super::{SeaOrmStorage, from_timestamp, read_err, to_timestamp, write_err};
use crate::entity::prelude::*;
use crate::entity::{classes, events};
use crate::errors::Result;
use crate::utils::search_key;
use crate::models::events::{entities::Event, requests::EventInput, responses::EventRow};

pub(crate) struct EventListing;

#[async_trait]
impl Listing for EventListing {
    type Entity = Events;
    type Row = EventRow;
    const WHAT: &'static str = "活动";

    fn order(select: Select<Events>) -> Select<Events> {
        select
            .order_by_asc(events::Column::StartTime)
            .order_by_asc(events::Column::Id)
    }

    async fn project(txn: &DatabaseTransaction, models: Vec<EventModel>) -> Result<Vec<EventRow>> {
        let class_ids = models.iter().filter_map(|m| m.class_id).collect();
        let classes = index_by::<Classes, _, _, _>(txn, classes::Column::Id, class_ids, |c| c.id).await?;

        Ok(models
            .into_iter()
            .map(|m| EventRow {
                class_name: m
                    .class_id
                    .and_then(|id| classes.get(&id))
                    .map(|c| c.name.clone()),
                id: m.id,
                title: m.title,
                description: m.description,
                start_time: from_timestamp(m.start_time),
                end_time: from_timestamp(m.end_time),
            })
            .collect())
    }
}

fn apply_input(model: &mut EventActiveModel, input: EventInput) {
    model.title = Set(input.title.trim().to_string());
    model.search_key = Set(search_key(&[input.title.as_str()]));
    model.description = Set(input.description.trim().to_string());
    model.start_time = Set(to_timestamp(input.start_time));
    model.end_time = Set(to_timestamp(input.end_time));
    model.class_id = Set(input.class_id);
}

impl SeaOrmStorage {
    /// 在 [from, to) 区间内开始的活动
    pub async fn list_events_between_impl(
        &self,
        cond: Condition,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EventRow>> {
        let models = EventListing::order(Events::find())
            .filter(cond)
            .filter(events::Column::StartTime.gte(to_timestamp(from)))
            .filter(events::Column::StartTime.lt(to_timestamp(to)))
            .all(&self.db)
            .await
            .map_err(|e| read_err("查询当日活动失败", e))?;

        let class_ids: Vec<i64> = models.iter().filter_map(|m| m.class_id).collect();
        let classes = index_by::<Classes, _, _, _>(&self.db, classes::Column::Id, class_ids, |c| c.id)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| EventRow {
                class_name: m
                    .class_id
                    .and_then(|id| classes.get(&id))
                    .map(|c| c.name.clone()),
                id: m.id,
                title: m.title,
                description: m.description,
                start_time: from_timestamp(m.start_time),
                end_time: from_timestamp(m.end_time),
            })
            .collect())
    }

    pub async fn create_event_impl(&self, input: EventInput) -> Result<Event> {
        let mut model = <EventActiveModel as ActiveModelTrait>::default();
        apply_input(&mut model, input);

        let created = model
            .insert(&self.db)
            .await
            .map_err(|e| write_err("创建活动失败", e))?;
        Ok(created.into_event())
    }

    pub async fn update_event_impl(&self, id: i64, input: EventInput) -> Result<Option<Event>> {
        let Some(existing) = Events::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询活动失败", e))?
        else {
            return Ok(None);
        };

        let mut model: EventActiveModel = existing.into();
        apply_input(&mut model, input);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新活动失败", e))?;
        Ok(Some(updated.into_event()))
    }

    pub async fn delete_event_impl(&self, id: i64) -> Result<bool> {
        let result = Events::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除活动失败", e))?;

        Ok(result.rows_affected > 0)
    }
}
