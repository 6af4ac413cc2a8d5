use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entities::feed_event,
    error::{AppError, AppResult},
    models::{EventType, FeedEvent, Operation},
};

/// Appends one event to the activity feed. Entries are never updated or
/// deleted afterwards.
pub async fn record<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    entity_id: i32,
    event_type: EventType,
    operation: Operation,
) -> AppResult<()> {
    let model = feed_event::ActiveModel {
        event_id: Default::default(),
        user_id: Set(user_id),
        entity_id: Set(entity_id),
        event_type: Set(event_type.as_str().to_string()),
        operation: Set(operation.as_str().to_string()),
        timestamp: Set(now_ms()),
    };
    feed_event::Entity::insert(model).exec_without_returning(db).await?;
    Ok(())
}

/// Events recorded for one actor, oldest first. Insertion order breaks
/// timestamp ties.
pub async fn find_for_user<C: ConnectionTrait>(db: &C, user_id: i32) -> AppResult<Vec<FeedEvent>> {
    let rows = feed_event::Entity::find()
        .filter(feed_event::Column::UserId.eq(user_id))
        .order_by_asc(feed_event::Column::Timestamp)
        .order_by_asc(feed_event::Column::EventId)
        .all(db)
        .await?;

    rows.into_iter().map(to_model).collect()
}

fn to_model(row: feed_event::Model) -> AppResult<FeedEvent> {
    let event_type = EventType::parse(&row.event_type)
        .ok_or_else(|| AppError::invalid("eventType", &row.event_type))?;
    let operation = Operation::parse(&row.operation)
        .ok_or_else(|| AppError::invalid("operation", &row.operation))?;
    Ok(FeedEvent {
        event_id: row.event_id,
        user_id: row.user_id,
        entity_id: row.entity_id,
        event_type,
        operation,
        timestamp: row.timestamp,
    })
}

fn now_ms() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}
