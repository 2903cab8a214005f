//! Postgres-backed record stores.
//!
//! Tables:
//! - `products`: one row per inventory record, nullable columns so that
//!   incomplete rows surface as schema errors in the pipeline, not here.
//! - `sales_history`: one row per sales observation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use shelfwise_core::ProductId;
use shelfwise_inventory::{InventoryDocument, NewProduct};
use shelfwise_sales::SalesDocument;

use super::{InventoryStore, SalesHistoryStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id UUID PRIMARY KEY,
    product_name TEXT,
    current_stock BIGINT,
    marked_price NUMERIC,
    expiry_date DATE,
    manufacturing_date DATE,
    date_received TIMESTAMPTZ,
    inventory_turnover_rate NUMERIC,
    sales_volume NUMERIC
);
CREATE TABLE IF NOT EXISTS sales_history (
    id BIGSERIAL PRIMARY KEY,
    product_name TEXT,
    date DATE,
    quantity_sold DOUBLE PRECISION
);
"#;

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

/// Create both tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await.map_err(db_err)?;
    Ok(())
}

pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<InventoryDocument>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                product_name,
                current_stock,
                marked_price,
                expiry_date,
                manufacturing_date,
                date_received,
                inventory_turnover_rate,
                sales_volume
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            let current_stock = row
                .try_get::<Option<i64>, _>("current_stock")
                .map_err(db_err)?
                .map(|v| {
                    u64::try_from(v)
                        .map_err(|_| StoreError::Corrupt(format!("negative current_stock {v}")))
                })
                .transpose()?;
            docs.push(InventoryDocument {
                product_name: row.try_get::<Option<String>, _>("product_name").map_err(db_err)?,
                current_stock,
                marked_price: row.try_get::<Option<Decimal>, _>("marked_price").map_err(db_err)?,
                expiry_date: row.try_get::<Option<NaiveDate>, _>("expiry_date").map_err(db_err)?,
                manufacturing_date: row
                    .try_get::<Option<NaiveDate>, _>("manufacturing_date")
                    .map_err(db_err)?,
                date_received: row
                    .try_get::<Option<DateTime<Utc>>, _>("date_received")
                    .map_err(db_err)?,
                inventory_turnover_rate: row
                    .try_get::<Option<Decimal>, _>("inventory_turnover_rate")
                    .map_err(db_err)?,
                sales_volume: row.try_get::<Option<Decimal>, _>("sales_volume").map_err(db_err)?,
            });
        }
        debug!(rows = docs.len(), "loaded inventory");
        Ok(docs)
    }

    #[instrument(skip(self, product), fields(product = %product.product_name))]
    async fn insert(
        &self,
        product: NewProduct,
        received_at: DateTime<Utc>,
    ) -> Result<ProductId, StoreError> {
        let id = ProductId::new();
        let doc = product.into_document(received_at);
        let stock = doc
            .current_stock
            .map(i64::try_from)
            .transpose()
            .map_err(|_| StoreError::Corrupt("current_stock exceeds BIGINT".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, product_name, current_stock, marked_price, expiry_date,
                manufacturing_date, date_received, inventory_turnover_rate, sales_volume
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id.as_uuid())
        .bind(doc.product_name)
        .bind(stock)
        .bind(doc.marked_price)
        .bind(doc.expiry_date)
        .bind(doc.manufacturing_date)
        .bind(doc.date_received)
        .bind(doc.inventory_turnover_rate)
        .bind(doc.sales_volume)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(id)
    }
}

pub struct PostgresSalesHistoryStore {
    pool: PgPool,
}

impl PostgresSalesHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SalesHistoryStore for PostgresSalesHistoryStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<SalesDocument>, StoreError> {
        let rows = sqlx::query(
            "SELECT product_name, date, quantity_sold FROM sales_history ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                Ok(SalesDocument {
                    product_name: row.try_get::<Option<String>, _>("product_name").map_err(db_err)?,
                    date: row.try_get::<Option<NaiveDate>, _>("date").map_err(db_err)?,
                    quantity_sold: row.try_get::<Option<f64>, _>("quantity_sold").map_err(db_err)?,
                })
            })
            .collect()
    }

    #[instrument(skip(self, docs), fields(count = docs.len()))]
    async fn append(&self, docs: Vec<SalesDocument>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let n = docs.len();
        for doc in docs {
            sqlx::query(
                "INSERT INTO sales_history (product_name, date, quantity_sold) VALUES ($1, $2, $3)",
            )
            .bind(doc.product_name)
            .bind(doc.date)
            .bind(doc.quantity_sold)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)?;
        Ok(n)
    }
}
