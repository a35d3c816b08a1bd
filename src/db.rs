use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, Executor, Pool, Postgres, Row};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{entities::PaymentIntentRecord, error::Error};

/// Append-only log of created payment intents. Display only; the payment
/// processor remains the system of record.
#[async_trait]
pub trait PaymentHistoryStore: Send + Sync {
    async fn append(&self, record: &PaymentIntentRecord) -> Result<(), Error>;

    /// Snapshot of every record, most recent first.
    async fn list(&self) -> Result<Vec<PaymentIntentRecord>, Error>;
}

/// Maps application users to processor customers.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_customer(&self, user_id: &str) -> Result<Option<String>, Error>;
    async fn save_customer(&self, user_id: &str, customer_id: &str) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS payment_history (seq BIGSERIAL PRIMARY KEY, id VARCHAR NOT NULL, data JSONB NOT NULL)")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS customers (user_id VARCHAR PRIMARY KEY, customer_id VARCHAR NOT NULL)")
            .await?;

        tracing::info!("database ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl PaymentHistoryStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn append(&self, record: &PaymentIntentRecord) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO payment_history (id, data) VALUES ($1, $2)")
                .bind(&record.id)
                .bind(Json(record)),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<PaymentIntentRecord>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query(
                "SELECT data FROM payment_history ORDER BY seq DESC",
            ))
            .await?;

        rows.iter()
            .map(|row| -> Result<PaymentIntentRecord, Error> {
                let Json(record): Json<PaymentIntentRecord> = row.try_get("data")?;
                Ok(record)
            })
            .collect()
    }
}

#[async_trait]
impl CustomerStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn find_customer(&self, user_id: &str) -> Result<Option<String>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_row = conn
            .fetch_optional(
                sqlx::query("SELECT customer_id FROM customers WHERE user_id = $1").bind(user_id),
            )
            .await?;

        match maybe_row {
            Some(row) => Ok(Some(row.try_get("customer_id")?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn save_customer(&self, user_id: &str, customer_id: &str) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query("INSERT INTO customers (user_id, customer_id) VALUES ($1, $2) ON CONFLICT (user_id) DO UPDATE SET customer_id = EXCLUDED.customer_id")
                .bind(user_id)
                .bind(customer_id),
        )
        .await?;

        Ok(())
    }
}

/// Volatile store, lost on restart. Used when no database is configured
/// and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    history: RwLock<Vec<PaymentIntentRecord>>,
    customers: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentHistoryStore for MemoryStore {
    async fn append(&self, record: &PaymentIntentRecord) -> Result<(), Error> {
        self.history.write().await.push(record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PaymentIntentRecord>, Error> {
        let history = self.history.read().await;
        Ok(history.iter().rev().cloned().collect())
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn find_customer(&self, user_id: &str) -> Result<Option<String>, Error> {
        Ok(self.customers.read().await.get(user_id).cloned())
    }

    async fn save_customer(&self, user_id: &str, customer_id: &str) -> Result<(), Error> {
        self.customers
            .write()
            .await
            .insert(user_id.into(), customer_id.into());
        Ok(())
    }
}
