use crate::error::AppError;
use crate::model::item::ITEM_COLUMNS;
use crate::model::{Association, Item, ItemPatch, NewItem};
use crate::sql::UpdateBuilder;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

pub struct ItemService;

impl ItemService {
    pub async fn list(pool: &PgPool) -> Result<Vec<Item>, AppError> {
        let sql = format!("SELECT {} FROM items ORDER BY id", ITEM_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let items = sqlx::query_as(&sql).fetch_all(pool).await?;
        Ok(items)
    }

    pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Item>, AppError> {
        let mut conn = pool.acquire().await?;
        Self::find_in(&mut conn, id, false).await
    }

    pub async fn insert(pool: &PgPool, new: &NewItem) -> Result<Item, AppError> {
        let sql = format!(
            "INSERT INTO items (name, price, description, image_link, merchant_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ITEM_COLUMNS
        );
        tracing::debug!(sql = %sql, merchant_id = ?new.merchant_id, "insert");
        let mut tx = pool.begin().await?;
        let item: Item = sqlx::query_as(&sql)
            .bind(&new.name)
            .bind(new.price)
            .bind(&new.description)
            .bind(&new.image_link)
            .bind(new.merchant_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(item)
    }

    /// Apply the supplied fields. `None` when no item has this id.
    pub async fn update(pool: &PgPool, id: i32, patch: &ItemPatch) -> Result<Option<Item>, AppError> {
        let mut tx = pool.begin().await?;
        let item = if patch.is_empty() {
            Self::find_in(&mut tx, id, false).await?
        } else {
            let mut b = UpdateBuilder::new("items");
            b.set_opt("name", patch.name.clone())
                .set_opt("price", patch.price)
                .set_opt("merchant_id", patch.merchant_id)
                .set_opt("description", patch.description.clone())
                .set_opt("image_link", patch.image_link.clone());
            let mut qb = b.finish(id, ITEM_COLUMNS);
            tracing::debug!(sql = %qb.sql(), id, "update");
            qb.build_query_as::<Item>().fetch_optional(&mut *tx).await?
        };
        tx.commit().await?;
        Ok(item)
    }

    /// Remove the item and its customer associations. Returns the item as it was.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Item>, AppError> {
        let mut tx = pool.begin().await?;
        let Some(item) = Self::find_in(&mut tx, id, true).await? else {
            return Ok(None);
        };
        for assoc in Association::ALL {
            let sql = format!("DELETE FROM {} WHERE item_id = $1", assoc.table());
            sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        }
        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::debug!(id, "item deleted");
        Ok(Some(item))
    }

    pub(crate) async fn find_in(
        conn: &mut PgConnection,
        id: i32,
        for_update: bool,
    ) -> Result<Option<Item>, AppError> {
        let lock = if for_update { " FOR UPDATE" } else { "" };
        let sql = format!("SELECT {} FROM items WHERE id = $1{}", ITEM_COLUMNS, lock);
        tracing::debug!(sql = %sql, id, "query");
        let item = sqlx::query_as(&sql).bind(id).fetch_optional(conn).await?;
        Ok(item)
    }

    /// Items of several merchants in one query, grouped by merchant id.
    pub(crate) async fn by_merchants(
        conn: &mut PgConnection,
        merchant_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<Item>>, AppError> {
        let mut grouped: HashMap<i32, Vec<Item>> = HashMap::new();
        if merchant_ids.is_empty() {
            return Ok(grouped);
        }
        let sql = format!(
            "SELECT {} FROM items WHERE merchant_id = ANY($1) ORDER BY id",
            ITEM_COLUMNS
        );
        tracing::debug!(sql = %sql, merchants = merchant_ids.len(), "query");
        let items: Vec<Item> = sqlx::query_as(&sql).bind(merchant_ids).fetch_all(conn).await?;
        for item in items {
            grouped.entry(item.merchant_id).or_default().push(item);
        }
        Ok(grouped)
    }
}
