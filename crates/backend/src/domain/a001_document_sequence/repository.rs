use chrono::Utc;
use contracts::domain::a001_document_sequence::aggregate::{DocumentSequence, DocumentSequenceId};
use contracts::shared::sequence::{ResetPeriod, Sequence};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, Order, PaginatorTrait, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_document_sequence")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub document_type: String,
    pub description: String,
    pub pattern: String,
    pub current_counter: i64,
    pub reset_period: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for DocumentSequence {
    type Error = DbErr;

    /// Строка с битым id или отрицательным счётчиком - ошибка, а не новый агрегат
    fn try_from(m: Model) -> Result<Self, DbErr> {
        let uuid = Uuid::parse_str(&m.id).map_err(|e| {
            tracing::error!("Corrupt document sequence row '{}': {}", m.id, e);
            DbErr::Custom(format!("Invalid document sequence id '{}': {}", m.id, e))
        })?;
        let current_counter = u64::try_from(m.current_counter).map_err(|_| {
            tracing::error!(
                "Corrupt document sequence row '{}': counter {}",
                m.id,
                m.current_counter
            );
            DbErr::Custom(format!(
                "Invalid counter {} in document sequence '{}'",
                m.current_counter, m.id
            ))
        })?;

        Ok(DocumentSequence {
            id: DocumentSequenceId(uuid),
            document_type: m.document_type,
            description: m.description,
            sequence: Sequence {
                pattern: m.pattern,
                current_counter,
                reset_period: ResetPeriod::parse(&m.reset_period),
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at,
            },
            is_deleted: m.is_deleted,
            version: m.version,
        })
    }
}

fn counter_value(counter: u64) -> i64 {
    i64::try_from(counter).unwrap_or(i64::MAX)
}

/// Параметры выборки страницы
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub limit: u64,
    pub offset: u64,
    pub search: Option<String>,
    pub sort_by: String,
    pub sort_desc: bool,
}

fn sort_column(sort_by: &str) -> Column {
    match sort_by {
        "description" => Column::Description,
        "pattern" => Column::Pattern,
        "current_counter" => Column::CurrentCounter,
        "reset_period" => Column::ResetPeriod,
        "created_at" => Column::CreatedAt,
        "updated_at" => Column::UpdatedAt,
        // По умолчанию сортировка по типу документа
        _ => Column::DocumentType,
    }
}

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<DocumentSequence>, DbErr> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::DocumentType)
        .all(conn)
        .await?
        .into_iter()
        .map(DocumentSequence::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub async fn list_paginated<C: ConnectionTrait>(
    conn: &C,
    params: &ListQuery,
) -> Result<(Vec<DocumentSequence>, u64), DbErr> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));

    if let Some(search) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(Column::DocumentType.contains(search))
                .add(Column::Description.contains(search))
                .add(Column::Pattern.contains(search)),
        );
    }

    // Подсчет общего количества
    let total = query.clone().count(conn).await?;

    let order = if params.sort_desc { Order::Desc } else { Order::Asc };
    let items = query
        .order_by(sort_column(&params.sort_by), order)
        .order_by_asc(Column::Id)
        .limit(params.limit)
        .offset(params.offset)
        .all(conn)
        .await?
        .into_iter()
        .map(DocumentSequence::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((items, total))
}

pub async fn get_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<DocumentSequence>, DbErr> {
    let result = Entity::find_by_id(id.to_string()).one(conn).await?;
    result.map(DocumentSequence::try_from).transpose()
}

pub async fn get_by_document_type<C: ConnectionTrait>(
    conn: &C,
    document_type: &str,
) -> Result<Option<DocumentSequence>, DbErr> {
    let result = Entity::find()
        .filter(Column::DocumentType.eq(document_type))
        .filter(Column::IsDeleted.eq(false))
        .one(conn)
        .await?;
    result.map(DocumentSequence::try_from).transpose()
}

pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    aggregate: &DocumentSequence,
) -> Result<Uuid, DbErr> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        document_type: Set(aggregate.document_type.clone()),
        description: Set(aggregate.description.clone()),
        pattern: Set(aggregate.sequence.pattern.clone()),
        current_counter: Set(counter_value(aggregate.sequence.current_counter)),
        reset_period: Set(aggregate.sequence.reset_period.as_str().to_string()),
        is_deleted: Set(aggregate.is_deleted),
        created_at: Set(Some(aggregate.sequence.created_at)),
        updated_at: Set(aggregate.sequence.updated_at),
        version: Set(aggregate.version),
    };
    active.insert(conn).await?;
    Ok(uuid)
}

/// Записать агрегат, если версия в БД не изменилась с момента чтения.
///
/// `false` - запись изменена кем-то другим (или удалена), ничего не записано.
/// В БД версия увеличивается на единицу.
pub async fn update_if_version<C: ConnectionTrait>(
    conn: &C,
    aggregate: &DocumentSequence,
) -> Result<bool, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::DocumentType, Expr::value(aggregate.document_type.clone()))
        .col_expr(Column::Description, Expr::value(aggregate.description.clone()))
        .col_expr(Column::Pattern, Expr::value(aggregate.sequence.pattern.clone()))
        .col_expr(
            Column::CurrentCounter,
            Expr::value(counter_value(aggregate.sequence.current_counter)),
        )
        .col_expr(
            Column::ResetPeriod,
            Expr::value(aggregate.sequence.reset_period.as_str()),
        )
        .col_expr(Column::UpdatedAt, Expr::value(aggregate.sequence.updated_at))
        .col_expr(Column::Version, Expr::value(aggregate.version + 1))
        .filter(Column::Id.eq(aggregate.to_string_id()))
        .filter(Column::Version.eq(aggregate.version))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn soft_delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;

    fn sample(document_type: &str, description: &str) -> DocumentSequence {
        DocumentSequence::new_for_insert(
            document_type.into(),
            description.into(),
            "{DOCTYPE}-{COUNTER:4}".into(),
            ResetPeriod::Monthly,
        )
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let conn = test_connection().await;
        let seq = sample("invoice", "Invoices");
        let id = insert(&conn, &seq).await.unwrap();

        let loaded = get_by_id(&conn, id).await.unwrap().unwrap();
        assert_eq!(loaded.document_type, "invoice");
        assert_eq!(loaded.sequence.reset_period, ResetPeriod::Monthly);
        assert_eq!(loaded.version, 0);

        let by_type = get_by_document_type(&conn, "invoice").await.unwrap();
        assert_eq!(by_type.map(|s| s.id), Some(seq.id));
    }

    #[tokio::test]
    async fn test_corrupt_row_is_an_error() {
        let conn = test_connection().await;
        let broken = ActiveModel {
            id: Set("broken".into()),
            document_type: Set("payment".into()),
            description: Set(String::new()),
            pattern: Set("{COUNTER:3}".into()),
            current_counter: Set(4),
            reset_period: Set("never".into()),
            is_deleted: Set(false),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(None),
            version: Set(0),
        };
        broken.insert(&conn).await.unwrap();

        let err = get_by_document_type(&conn, "payment").await.unwrap_err();
        assert!(err.to_string().contains("broken"));
        assert!(list_all(&conn).await.is_err());
    }

    #[tokio::test]
    async fn test_stale_version_is_rejected() {
        let conn = test_connection().await;
        let mut seq = sample("order", "Orders");
        insert(&conn, &seq).await.unwrap();

        seq.sequence.current_counter = 5;
        assert!(update_if_version(&conn, &seq).await.unwrap());

        // same version again: the row is already at version 1
        seq.sequence.current_counter = 6;
        assert!(!update_if_version(&conn, &seq).await.unwrap());

        let loaded = get_by_id(&conn, seq.id.value()).await.unwrap().unwrap();
        assert_eq!(loaded.sequence.current_counter, 5);
        assert_eq!(loaded.version, 1);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_row() {
        let conn = test_connection().await;
        let seq = sample("quote", "Quotes");
        insert(&conn, &seq).await.unwrap();

        assert!(soft_delete(&conn, seq.id.value()).await.unwrap());
        assert!(!soft_delete(&conn, seq.id.value()).await.unwrap());
        assert!(list_all(&conn).await.unwrap().is_empty());
        assert!(get_by_document_type(&conn, "quote").await.unwrap().is_none());

        // the type can be configured again after deletion
        insert(&conn, &sample("quote", "Quotes v2")).await.unwrap();
        assert_eq!(list_all(&conn).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_document_type_fails() {
        let conn = test_connection().await;
        insert(&conn, &sample("payment", "A")).await.unwrap();
        assert!(insert(&conn, &sample("payment", "B")).await.is_err());
    }

    #[tokio::test]
    async fn test_paginated_search_and_sort() {
        let conn = test_connection().await;
        for (t, d) in [
            ("invoice", "Sales invoices"),
            ("quote", "Quotes"),
            ("order", "Sales orders"),
            ("payment", "Payments"),
        ] {
            insert(&conn, &sample(t, d)).await.unwrap();
        }

        let params = ListQuery {
            limit: 10,
            offset: 0,
            search: Some("sales".into()),
            sort_by: "document_type".into(),
            sort_desc: true,
        };
        let (items, total) = list_paginated(&conn, &params).await.unwrap();
        assert_eq!(total, 2);
        let types: Vec<_> = items.iter().map(|s| s.document_type.as_str()).collect();
        assert_eq!(types, vec!["order", "invoice"]);

        let params = ListQuery {
            limit: 3,
            offset: 3,
            search: None,
            sort_by: "unknown".into(),
            sort_desc: false,
        };
        let (items, total) = list_paginated(&conn, &params).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].document_type, "quote");
    }
}
