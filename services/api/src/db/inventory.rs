//! Inventory store.

use sqlx::PgPool;
use sos_id::ItemId;

use crate::domain::ItemName;

use super::DbError;

/// Row from the inventory table.
#[derive(Debug, Clone)]
pub struct ItemRow {
    pub id: ItemId,
    pub item_name: String,
    pub quantity: i32,
    pub center_location: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ItemRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: ItemId::new(row.try_get("id")?),
            item_name: row.try_get("item_name")?,
            quantity: row.try_get("quantity")?,
            center_location: row.try_get("center_location")?,
        })
    }
}

/// Store for inventory records.
pub struct InventoryStore {
    pool: PgPool,
}

impl InventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        item_name: ItemName,
        quantity: i32,
        center_location: &str,
    ) -> Result<ItemRow, DbError> {
        sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO inventory (item_name, quantity, center_location)
            VALUES ($1, $2, $3)
            RETURNING id, item_name, quantity, center_location
            "#,
        )
        .bind(item_name.as_str())
        .bind(quantity)
        .bind(center_location)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    pub async fn find_by_id(&self, id: ItemId) -> Result<Option<ItemRow>, DbError> {
        sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, item_name, quantity, center_location
            FROM inventory
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// All items grouped by center, then by item name.
    pub async fn list_all(&self) -> Result<Vec<ItemRow>, DbError> {
        sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, item_name, quantity, center_location
            FROM inventory
            ORDER BY center_location ASC, item_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// Sets the absolute quantity. Returns the updated row, or `None` when no
    /// item has the given id. Quantity must already be validated as >= 0.
    pub async fn set_quantity(
        &self,
        id: ItemId,
        quantity: i32,
    ) -> Result<Option<ItemRow>, DbError> {
        sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE inventory
            SET quantity = $2
            WHERE id = $1
            RETURNING id, item_name, quantity, center_location
            "#,
        )
        .bind(id.value())
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}
