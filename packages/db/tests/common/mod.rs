use std::sync::LazyLock;

use tokio::sync::{Mutex, MutexGuard};

use db::{DbConfig, DbError};

static TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn setup_db() -> Result<MutexGuard<'static, ()>, DbError> {
    let guard = TEST_LOCK.lock().await;
    db::init(DbConfig::memory()).await?;
    reset_db().await?;
    Ok(guard)
}

pub async fn reset_db() -> Result<(), DbError> {
    let db_conn = db::get_db()?;
    db_conn
        .query("DELETE appointment; DELETE queue_status;")
        .await?
        .check()?;
    Ok(())
}
