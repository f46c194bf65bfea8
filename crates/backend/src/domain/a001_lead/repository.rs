use contracts::domain::a001_lead::aggregate::RawSubmission;
use contracts::shared::timestamp::now_iso;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "form_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub form_type: Option<String>,
    /// JSON object text
    pub form_data: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for RawSubmission {
    fn from(m: Model) -> Self {
        let form_data = m.form_data.as_deref().and_then(|text| {
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Some(map),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("form_submissions row {}: form_data is not JSON: {}", m.id, e);
                    None
                }
            }
        });

        RawSubmission {
            id: m.id,
            form_type: m.form_type,
            form_data,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

/// Newest submissions first, capped at `limit` rows
pub async fn list_recent(db: &DatabaseConnection, limit: u64) -> anyhow::Result<Vec<RawSubmission>> {
    let rows = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(rows)
}

#[cfg(test)]
pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> anyhow::Result<Option<RawSubmission>> {
    let result = Entity::find_by_id(id).one(db).await?;
    Ok(result.map(Into::into))
}

/// Returns false when no row has this id
pub async fn update_status(db: &DatabaseConnection, id: i64, status: &str) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(status.to_string()))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Store a new submission with status `new`
pub async fn insert(
    db: &DatabaseConnection,
    form_type: &str,
    form_data: &Map<String, Value>,
) -> anyhow::Result<i64> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        form_type: Set(Some(form_type.to_string())),
        form_data: Set(Some(serde_json::to_string(form_data)?)),
        status: Set(Some("new".to_string())),
        created_at: Set(Some(now_iso())),
    };
    let model = active.insert(db).await?;
    Ok(model.id)
}

/// Insert a row verbatim, for seeding legacy-shaped rows
#[cfg(test)]
pub async fn insert_raw(db: &DatabaseConnection, row: Model) -> anyhow::Result<i64> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        form_type: Set(row.form_type),
        form_data: Set(row.form_data),
        status: Set(row.status),
        created_at: Set(row.created_at),
    };
    let model = active.insert(db).await?;
    Ok(model.id)
}
