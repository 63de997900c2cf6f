use super::ItemService;
use crate::error::AppError;
use crate::model::merchant::MERCHANT_COLUMNS;
use crate::model::{Association, Merchant, MerchantPatch, NewMerchant};
use crate::sql::UpdateBuilder;
use sqlx::{PgConnection, PgPool};

pub struct MerchantService;

impl MerchantService {
    /// All merchants ordered by id, each with its items.
    pub async fn list(pool: &PgPool) -> Result<Vec<Merchant>, AppError> {
        let mut conn = pool.acquire().await?;
        let sql = format!("SELECT {} FROM merchants ORDER BY id", MERCHANT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let mut merchants: Vec<Merchant> = sqlx::query_as(&sql).fetch_all(&mut *conn).await?;
        attach_items(&mut conn, &mut merchants).await?;
        Ok(merchants)
    }

    pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Merchant>, AppError> {
        let mut conn = pool.acquire().await?;
        Self::find_in(&mut conn, id, false).await
    }

    pub async fn insert(pool: &PgPool, new: &NewMerchant) -> Result<Merchant, AppError> {
        let sql = format!(
            "INSERT INTO merchants \
             (name, city, state, phone, email, fb_link, insta_link, image_link, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            MERCHANT_COLUMNS
        );
        tracing::debug!(sql = %sql, "insert");
        let mut tx = pool.begin().await?;
        let merchant: Merchant = sqlx::query_as(&sql)
            .bind(&new.name)
            .bind(&new.city)
            .bind(&new.state)
            .bind(&new.phone)
            .bind(&new.email)
            .bind(&new.fb_link)
            .bind(&new.insta_link)
            .bind(&new.image_link)
            .bind(&new.description)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(merchant)
    }

    /// Apply the supplied fields. `None` when no merchant has this id.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        patch: &MerchantPatch,
    ) -> Result<Option<Merchant>, AppError> {
        let mut tx = pool.begin().await?;
        if patch.is_empty() {
            let merchant = Self::find_in(&mut tx, id, false).await?;
            tx.commit().await?;
            return Ok(merchant);
        }

        let mut b = UpdateBuilder::new("merchants");
        b.set_opt("name", patch.name.clone())
            .set_opt("city", patch.city.clone())
            .set_opt("state", patch.state.clone())
            .set_opt("phone", patch.phone.clone())
            .set_opt("email", patch.email.clone())
            .set_opt("fb_link", patch.fb_link.clone())
            .set_opt("insta_link", patch.insta_link.clone())
            .set_opt("image_link", patch.image_link.clone())
            .set_opt("description", patch.description.clone());
        let mut qb = b.finish(id, MERCHANT_COLUMNS);
        tracing::debug!(sql = %qb.sql(), id, "update");
        let updated: Option<Merchant> = qb.build_query_as().fetch_optional(&mut *tx).await?;
        let Some(mut merchant) = updated else {
            return Ok(None);
        };
        attach_items(&mut tx, std::slice::from_mut(&mut merchant)).await?;
        tx.commit().await?;
        Ok(Some(merchant))
    }

    /// Delete the merchant and everything hanging off it, in one transaction:
    /// customer associations of its items, then the items, then the merchant.
    /// Returns the merchant (with items) as it was before removal.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Merchant>, AppError> {
        let mut tx = pool.begin().await?;
        let Some(merchant) = Self::find_in(&mut tx, id, true).await? else {
            return Ok(None);
        };
        // Pending favorite or purchase inserts on these items must finish before the
        // join rows are cleared; later ones wait and then fail their own foreign key.
        let locked: Vec<(i32,)> = sqlx::query_as("SELECT id FROM items WHERE merchant_id = $1 FOR UPDATE")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        for assoc in Association::ALL {
            let sql = format!(
                "DELETE FROM {} WHERE item_id IN (SELECT id FROM items WHERE merchant_id = $1)",
                assoc.table()
            );
            sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        }
        sqlx::query("DELETE FROM items WHERE merchant_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM merchants WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::debug!(id, items = locked.len(), "merchant deleted with its items");
        Ok(Some(merchant))
    }

    async fn find_in(
        conn: &mut PgConnection,
        id: i32,
        for_update: bool,
    ) -> Result<Option<Merchant>, AppError> {
        let lock = if for_update { " FOR UPDATE" } else { "" };
        let sql = format!("SELECT {} FROM merchants WHERE id = $1{}", MERCHANT_COLUMNS, lock);
        tracing::debug!(sql = %sql, id, "query");
        let found: Option<Merchant> = sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?;
        let Some(mut merchant) = found else {
            return Ok(None);
        };
        attach_items(conn, std::slice::from_mut(&mut merchant)).await?;
        Ok(Some(merchant))
    }
}

async fn attach_items(conn: &mut PgConnection, merchants: &mut [Merchant]) -> Result<(), AppError> {
    let ids: Vec<i32> = merchants.iter().map(|m| m.id).collect();
    let mut grouped = ItemService::by_merchants(conn, &ids).await?;
    for m in merchants.iter_mut() {
        m.items = grouped.remove(&m.id).unwrap_or_default();
    }
    Ok(())
}
