use anyhow::{Context, Result};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use std::env;
use std::path::PathBuf;
use tokio_postgres::NoTls;

pub fn get_pg_pool() -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(env::var("PG_HOST").context("PG_HOST not set")?);
    cfg.user = Some(env::var("PG_USER").context("PG_USER not set")?);
    cfg.password = env::var("PG_PASS").ok();
    cfg.dbname = Some(env::var("PG_DB").context("PG_DB not set")?);

    if cfg.pool.is_none() {
        cfg.pool = Some(PoolConfig::default());
    }
    if let Some(ref mut pool_cfg) = cfg.pool {
        pool_cfg.max_size = 16;
    }

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}

pub fn access_secret() -> String {
    env::var("ACCESS_SECRET_KEY").unwrap_or_else(|_| "Access secret".to_string())
}

pub fn refresh_secret() -> String {
    env::var("REFRESH_SECRET_KEY").unwrap_or_else(|_| "Refresh secret".to_string())
}

/// Root directory for stored images; post and profile subtrees live below it.
pub fn upload_dir() -> PathBuf {
    PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()))
}
