use std::sync::Arc;

use routebook::config::Config;
use routebook::db::PgPool;
use routebook::engine::Engine;
use routebook::error::Error;
use routebook::server::serve;
use routebook::store::PgRecordStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let PgPool(pool) = PgPool::new(&config.database_url, config.max_connections).await?;
    let store = PgRecordStore::new(pool).await?;

    let engine = Engine::new(config.admin, Arc::new(store))?;

    serve(engine, config.listen_addr).await
}
