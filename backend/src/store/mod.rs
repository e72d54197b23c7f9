use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Optional database handle held for the lifetime of the process.
///
/// Opened at startup when `DATABASE_URL` is set and closed on shutdown. The
/// performance endpoints do not read from or write to it.
pub struct Store {
    pool: Option<PgPool>,
}

impl Store {
    pub fn disconnected() -> Self {
        Self { pool: None }
    }

    pub async fn connect(database_url: Option<&str>, max_connections: u32) -> Result<Self, sqlx::Error> {
        let Some(url) = database_url else {
            info!("DATABASE_URL not set, running without a database");
            return Ok(Self::disconnected());
        };

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        info!("🗄️ Database connection established");
        Ok(Self { pool: Some(pool) })
    }

    pub fn is_connected(&self) -> bool {
        self.pool.as_ref().is_some_and(|p| !p.is_closed())
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("Database connection closed");
        }
    }
}
