//! Sweet inventory.
//!
//! Stock changes are a single conditional `UPDATE ... RETURNING`. When no row
//! comes back a follow-up read decides whether the sweet is missing or the
//! condition failed; the stock itself is never read-then-written.

use crate::error::StoreError;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use sweetshop_core::api_types::SearchParams;
use sweetshop_core::{NewSweet, Price, Sweet, SweetId, SweetPatch};

const SELECT_SWEETS: &str = "SELECT id, name, category, price_cents, quantity FROM sweets";

#[derive(Debug, FromRow)]
struct SweetRow {
    id: i64,
    name: String,
    category: String,
    price_cents: i64,
    quantity: i64,
}

impl TryFrom<SweetRow> for Sweet {
    type Error = StoreError;

    fn try_from(row: SweetRow) -> Result<Self, Self::Error> {
        let price = Price::from_cents(row.price_cents)
            .map_err(|e| StoreError::CorruptRow(format!("sweet {} price: {e}", row.id)))?;
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            StoreError::CorruptRow(format!("sweet {} quantity {}", row.id, row.quantity))
        })?;
        Ok(Sweet {
            id: row.id,
            name: row.name,
            category: row.category,
            price,
            quantity,
        })
    }
}

fn into_sweets(rows: Vec<SweetRow>) -> Result<Vec<Sweet>, StoreError> {
    rows.into_iter().map(Sweet::try_from).collect()
}

/// Repository over the `sweets` table.
#[derive(Debug, Clone)]
pub struct SweetStore {
    pool: SqlitePool,
}

impl SweetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every sweet, in insertion order.
    pub async fn list(&self) -> Result<Vec<Sweet>, StoreError> {
        let rows = sqlx::query_as::<_, SweetRow>(&format!("{SELECT_SWEETS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        into_sweets(rows)
    }

    /// Sweets matching every supplied filter. An empty filter set lists
    /// everything; bounds are inclusive.
    ///
    /// The name filter runs after the query: SQLite's `LOWER` only folds
    /// ASCII, so both sides are folded with Unicode case rules here instead.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Sweet>, StoreError> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_SWEETS);
        query.push(" WHERE 1 = 1");

        if let Some(category) = &params.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(min) = params.min_price {
            query.push(" AND price_cents >= ").push_bind(min.cents());
        }
        if let Some(max) = params.max_price {
            query.push(" AND price_cents <= ").push_bind(max.cents());
        }
        query.push(" ORDER BY id");

        let mut rows = query
            .build_query_as::<SweetRow>()
            .fetch_all(&self.pool)
            .await?;
        if let Some(name) = &params.name {
            let needle = name.to_lowercase();
            rows.retain(|row| row.name.to_lowercase().contains(&needle));
        }
        tracing::debug!(matches = rows.len(), "searched sweets");
        into_sweets(rows)
    }

    pub async fn get(&self, id: SweetId) -> Result<Sweet, StoreError> {
        sqlx::query_as::<_, SweetRow>(&format!("{SELECT_SWEETS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::SweetNotFound(id))?
            .try_into()
    }

    pub async fn create(&self, sweet: &NewSweet) -> Result<Sweet, StoreError> {
        let row = sqlx::query_as::<_, SweetRow>(
            "INSERT INTO sweets (name, category, price_cents, quantity) VALUES (?, ?, ?, ?) \
             RETURNING id, name, category, price_cents, quantity",
        )
        .bind(&sweet.name)
        .bind(&sweet.category)
        .bind(sweet.price.cents())
        .bind(i64::from(sweet.quantity))
        .fetch_one(&self.pool)
        .await?;

        let created = Sweet::try_from(row)?;
        tracing::info!(id = created.id, name = %created.name, "created sweet");
        Ok(created)
    }

    /// Merge the supplied fields into the stored sweet.
    pub async fn update(&self, id: SweetId, patch: &SweetPatch) -> Result<Sweet, StoreError> {
        let row = sqlx::query_as::<_, SweetRow>(
            "UPDATE sweets SET \
                name = COALESCE(?, name), \
                category = COALESCE(?, category), \
                price_cents = COALESCE(?, price_cents), \
                quantity = COALESCE(?, quantity) \
             WHERE id = ? \
             RETURNING id, name, category, price_cents, quantity",
        )
        .bind(patch.name.as_deref())
        .bind(patch.category.as_deref())
        .bind(patch.price.map(Price::cents))
        .bind(patch.quantity.map(i64::from))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::SweetNotFound(id))?;

        tracing::info!(id, "updated sweet");
        row.try_into()
    }

    pub async fn delete(&self, id: SweetId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM sweets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::SweetNotFound(id));
        }
        tracing::info!(id, "deleted sweet");
        Ok(())
    }

    /// Take `quantity` units out of stock. Nothing changes when fewer are on
    /// hand.
    pub async fn purchase(&self, id: SweetId, quantity: u32) -> Result<Sweet, StoreError> {
        let requested = i64::from(quantity);
        let row = sqlx::query_as::<_, SweetRow>(
            "UPDATE sweets SET quantity = quantity - ? \
             WHERE id = ? AND quantity >= ? \
             RETURNING id, name, category, price_cents, quantity",
        )
        .bind(requested)
        .bind(id)
        .bind(requested)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let sweet = Sweet::try_from(row)?;
                tracing::info!(id, quantity, remaining = sweet.quantity, "purchased sweet");
                Ok(sweet)
            }
            None => {
                let available = self.get(id).await?.quantity;
                tracing::debug!(id, quantity, available, "purchase refused");
                Err(StoreError::InsufficientStock {
                    id,
                    requested: quantity,
                    available,
                })
            }
        }
    }

    /// Add `quantity` units to stock.
    pub async fn restock(&self, id: SweetId, quantity: u32) -> Result<Sweet, StoreError> {
        let ceiling = i64::from(u32::MAX - quantity);
        let row = sqlx::query_as::<_, SweetRow>(
            "UPDATE sweets SET quantity = quantity + ? \
             WHERE id = ? AND quantity <= ? \
             RETURNING id, name, category, price_cents, quantity",
        )
        .bind(i64::from(quantity))
        .bind(id)
        .bind(ceiling)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let sweet = Sweet::try_from(row)?;
                tracing::info!(id, quantity, stock = sweet.quantity, "restocked sweet");
                Ok(sweet)
            }
            None => {
                let available = self.get(id).await?.quantity;
                Err(StoreError::StockOverflow {
                    id,
                    requested: quantity,
                    available,
                })
            }
        }
    }
}
