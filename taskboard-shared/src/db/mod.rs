/// Database layer for Taskboard
///
/// # Modules
///
/// - `store`: the storage seam (`Store` / `StoreConn`) and its error type
/// - `postgres`: sqlx-backed store
/// - `memory`: in-process store with the same semantics
/// - `pool`: PostgreSQL pool construction and health checks
/// - `migrations`: embedded schema migrations
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::{
///     pool::{create_pool, PoolConfig},
///     postgres::PgStore,
///     store::Store,
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(PoolConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     })
///     .await?;
///
///     let store = PgStore::new(pool);
///     store.ping().await?;
///     Ok(())
/// }
/// ```

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod store;
