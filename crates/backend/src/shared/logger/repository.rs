use chrono::Utc;
use contracts::shared::logger::{LogEntry, LogSource};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "system_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: String,
    pub source: String,
    pub category: String,
    pub message: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LogEntry {
    fn from(m: Model) -> Self {
        LogEntry {
            id: m.id,
            timestamp: m.timestamp,
            source: LogSource::from_stored(&m.source),
            category: m.category,
            message: m.message,
        }
    }
}

/// Добавить запись в лог (внутренняя функция, без ожидания)
///
/// Пропускается, если база или runtime ещё не инициализированы
pub fn log_event_internal(source: LogSource, category: &str, message: &str) {
    let Ok(db) = get_connection() else {
        return;
    };
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        return;
    };

    let category = category.to_string();
    let message = message.to_string();

    handle.spawn(async move {
        if let Err(e) = log_event(db, source, &category, &message).await {
            tracing::warn!("Failed to log event: {}", e);
        }
    });
}

/// Добавить запись в лог
pub async fn log_event(
    db: &DatabaseConnection,
    source: LogSource,
    category: &str,
    message: &str,
) -> anyhow::Result<()> {
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();

    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        timestamp: Set(now),
        source: Set(source.as_str().to_string()),
        category: Set(category.to_string()),
        message: Set(message.to_string()),
    };

    active.insert(db).await?;
    Ok(())
}

/// Получить все записи лога (новые сверху)
pub async fn get_all_logs(db: &DatabaseConnection) -> anyhow::Result<Vec<LogEntry>> {
    let logs: Vec<LogEntry> = Entity::find()
        .order_by_desc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(logs)
}

/// Очистить все записи лога
pub async fn clear_all_logs(db: &DatabaseConnection) -> anyhow::Result<()> {
    Entity::delete_many().exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_database;

    #[tokio::test]
    async fn test_log_round_trip_newest_first() {
        let db = memory_database().await;
        log_event(&db, LogSource::Server, "leads", "first").await.unwrap();
        log_event(&db, LogSource::Client, "leads", "second").await.unwrap();

        let logs = get_all_logs(&db).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "second");
        assert_eq!(logs[0].source, LogSource::Client);

        clear_all_logs(&db).await.unwrap();
        assert!(get_all_logs(&db).await.unwrap().is_empty());
    }
}
