use crate::error::AppError;
use crate::model::customer::CUSTOMER_COLUMNS;
use crate::model::item::ITEM_COLUMNS;
use crate::model::{Association, Customer, CustomerPatch, Item, NewCustomer};
use crate::sql::UpdateBuilder;
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::HashMap;

pub struct CustomerService;

/// One join-table row resolved to its item.
#[derive(FromRow)]
struct AssociatedItem {
    customer_id: i32,
    #[sqlx(flatten)]
    item: Item,
}

impl CustomerService {
    /// All customers ordered by id, each with favorites and purchases.
    pub async fn list(pool: &PgPool) -> Result<Vec<Customer>, AppError> {
        let mut conn = pool.acquire().await?;
        let sql = format!("SELECT {} FROM customers ORDER BY id", CUSTOMER_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let mut customers: Vec<Customer> = sqlx::query_as(&sql).fetch_all(&mut *conn).await?;
        attach_associations(&mut conn, &mut customers).await?;
        Ok(customers)
    }

    pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Customer>, AppError> {
        let mut conn = pool.acquire().await?;
        Self::find_in(&mut conn, id, false).await
    }

    pub async fn insert(pool: &PgPool, new: &NewCustomer) -> Result<Customer, AppError> {
        let sql = format!(
            "INSERT INTO customers (name, email) VALUES ($1, $2) RETURNING {}",
            CUSTOMER_COLUMNS
        );
        tracing::debug!(sql = %sql, "insert");
        let mut tx = pool.begin().await?;
        let customer: Customer = sqlx::query_as(&sql)
            .bind(&new.name)
            .bind(&new.email)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(customer)
    }

    /// Apply the supplied fields. `None` when no customer has this id.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        patch: &CustomerPatch,
    ) -> Result<Option<Customer>, AppError> {
        let mut tx = pool.begin().await?;
        if patch.is_empty() {
            let customer = Self::find_in(&mut tx, id, false).await?;
            tx.commit().await?;
            return Ok(customer);
        }

        let mut b = UpdateBuilder::new("customers");
        b.set_opt("name", patch.name.clone())
            .set_opt("email", patch.email.clone());
        let mut qb = b.finish(id, CUSTOMER_COLUMNS);
        tracing::debug!(sql = %qb.sql(), id, "update");
        let updated: Option<Customer> = qb.build_query_as().fetch_optional(&mut *tx).await?;
        let Some(mut customer) = updated else {
            return Ok(None);
        };
        attach_associations(&mut tx, std::slice::from_mut(&mut customer)).await?;
        tx.commit().await?;
        Ok(Some(customer))
    }

    /// Remove the customer's associations, then the customer. Returns the customer as it was.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Customer>, AppError> {
        let mut tx = pool.begin().await?;
        let Some(customer) = Self::find_in(&mut tx, id, true).await? else {
            return Ok(None);
        };
        for assoc in Association::ALL {
            let sql = format!("DELETE FROM {} WHERE customer_id = $1", assoc.table());
            sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        }
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::debug!(id, "customer deleted");
        Ok(Some(customer))
    }

    pub async fn add_favorite(pool: &PgPool, id: i32, item_id: i32) -> Result<Option<Customer>, AppError> {
        Self::associate(pool, Association::Favorites, id, item_id).await
    }

    pub async fn remove_favorite(pool: &PgPool, id: i32, item_id: i32) -> Result<Option<Customer>, AppError> {
        Self::dissociate(pool, Association::Favorites, id, item_id).await
    }

    pub async fn add_purchase(pool: &PgPool, id: i32, item_id: i32) -> Result<Option<Customer>, AppError> {
        Self::associate(pool, Association::Purchases, id, item_id).await
    }

    pub async fn remove_purchase(pool: &PgPool, id: i32, item_id: i32) -> Result<Option<Customer>, AppError> {
        Self::dissociate(pool, Association::Purchases, id, item_id).await
    }

    /// Insert the (customer, item) pair. `None` when the customer does not exist;
    /// a duplicate pair or an unknown item is a constraint violation.
    async fn associate(
        pool: &PgPool,
        assoc: Association,
        id: i32,
        item_id: i32,
    ) -> Result<Option<Customer>, AppError> {
        let mut tx = pool.begin().await?;
        if !Self::lock(&mut tx, id).await? {
            return Ok(None);
        }
        let sql = format!(
            "INSERT INTO {} (customer_id, item_id) VALUES ($1, $2)",
            assoc.table()
        );
        tracing::debug!(sql = %sql, id, item_id, "associate");
        sqlx::query(&sql).bind(id).bind(item_id).execute(&mut *tx).await?;
        let customer = Self::find_in(&mut tx, id, false).await?;
        tx.commit().await?;
        Ok(customer)
    }

    /// Delete the (customer, item) pair. `None` when the customer does not exist;
    /// a missing pair is `NotFound`.
    async fn dissociate(
        pool: &PgPool,
        assoc: Association,
        id: i32,
        item_id: i32,
    ) -> Result<Option<Customer>, AppError> {
        let mut tx = pool.begin().await?;
        if !Self::lock(&mut tx, id).await? {
            return Ok(None);
        }
        let sql = format!(
            "DELETE FROM {} WHERE customer_id = $1 AND item_id = $2",
            assoc.table()
        );
        tracing::debug!(sql = %sql, id, item_id, "dissociate");
        let removed = sqlx::query(&sql)
            .bind(id)
            .bind(item_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            return Err(AppError::NotFound(format!(
                "item {} is not a {} of customer {}",
                item_id,
                assoc.label(),
                id
            )));
        }
        let customer = Self::find_in(&mut tx, id, false).await?;
        tx.commit().await?;
        Ok(customer)
    }

    /// Lock the customer row for the rest of the transaction; false when absent.
    async fn lock(conn: &mut PgConnection, id: i32) -> Result<bool, AppError> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM customers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.is_some())
    }

    async fn find_in(
        conn: &mut PgConnection,
        id: i32,
        for_update: bool,
    ) -> Result<Option<Customer>, AppError> {
        let lock = if for_update { " FOR UPDATE" } else { "" };
        let sql = format!("SELECT {} FROM customers WHERE id = $1{}", CUSTOMER_COLUMNS, lock);
        tracing::debug!(sql = %sql, id, "query");
        let found: Option<Customer> = sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?;
        let Some(mut customer) = found else {
            return Ok(None);
        };
        attach_associations(conn, std::slice::from_mut(&mut customer)).await?;
        Ok(Some(customer))
    }
}

async fn associated_items(
    conn: &mut PgConnection,
    assoc: Association,
    customer_ids: &[i32],
) -> Result<HashMap<i32, Vec<Item>>, AppError> {
    let item_columns = ITEM_COLUMNS
        .split(", ")
        .map(|c| format!("i.{}", c))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT a.customer_id, {} FROM {} a JOIN items i ON i.id = a.item_id \
         WHERE a.customer_id = ANY($1) ORDER BY i.id",
        item_columns,
        assoc.table()
    );
    tracing::debug!(sql = %sql, customers = customer_ids.len(), "query");
    let rows: Vec<AssociatedItem> = sqlx::query_as(&sql).bind(customer_ids).fetch_all(conn).await?;
    let mut grouped: HashMap<i32, Vec<Item>> = HashMap::new();
    for row in rows {
        grouped.entry(row.customer_id).or_default().push(row.item);
    }
    Ok(grouped)
}

async fn attach_associations(conn: &mut PgConnection, customers: &mut [Customer]) -> Result<(), AppError> {
    if customers.is_empty() {
        return Ok(());
    }
    let ids: Vec<i32> = customers.iter().map(|c| c.id).collect();
    let mut favorites = associated_items(conn, Association::Favorites, &ids).await?;
    let mut purchases = associated_items(conn, Association::Purchases, &ids).await?;
    for c in customers.iter_mut() {
        c.favorites = favorites.remove(&c.id).unwrap_or_default();
        c.purchases = purchases.remove(&c.id).unwrap_or_default();
    }
    Ok(())
}
