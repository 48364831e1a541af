use std::collections::BTreeSet;

use ::redis::{Client, Commands, Connection, RedisResult};
use async_trait::async_trait;
use r2d2::Pool;
use tracing::debug;

use super::{Store, StoreResult};

pub type RedisPool = Pool<Client>;

const POOL_SIZE: u32 = 16;
const SCAN_BATCH: usize = 100;

/// Link records kept in Redis under `<prefix><code>`.
///
/// The pooled connections are synchronous, so every command is moved onto the
/// blocking thread pool instead of stalling the async workers.
#[derive(Debug, Clone)]
pub struct RedisStore {
    pool: RedisPool,
    prefix: String,
}

impl RedisStore {
    pub fn connect(redis_url: &str, prefix: impl Into<String>) -> StoreResult<Self> {
        let client = Client::open(redis_url)?;
        let pool = Pool::builder().max_size(POOL_SIZE).build(client)?;
        Ok(Self::new(pool, prefix))
    }

    pub fn new(pool: RedisPool, prefix: impl Into<String>) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
        }
    }

    fn key(&self, code: &str) -> String {
        format!("{}{}", self.prefix, code)
    }

    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> RedisResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<T> {
            let mut conn = pool.get()?;
            Ok(op(&mut *conn)?)
        })
        .await?
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let key = self.key(key);
        self.run(move |conn| conn.get::<_, Option<String>>(&key))
            .await
    }

    async fn put(&self, key: &str, value: String) -> StoreResult<()> {
        let key = self.key(key);
        self.run(move |conn| conn.set::<_, _, ()>(&key, value))
            .await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let key = self.key(key);
        self.run(move |conn| conn.del::<_, ()>(&key)).await
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        let prefix = self.prefix.clone();
        let pattern = format!("{}*", escape_glob(&prefix));
        let keys = self
            .run(move |conn| {
                drain_scan(&prefix, |cursor| {
                    ::redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query(&mut *conn)
                })
            })
            .await?;
        debug!(count = keys.len(), "Scanned link keys");
        Ok(keys)
    }
}

/// Follows the SCAN cursor until it wraps back to 0. SCAN may report a key
/// more than once across pages, so keys are de-duplicated.
fn drain_scan<F>(prefix: &str, mut fetch_page: F) -> RedisResult<Vec<String>>
where
    F: FnMut(u64) -> RedisResult<(u64, Vec<String>)>,
{
    let mut keys = BTreeSet::new();
    let mut cursor: u64 = 0;
    loop {
        let (next, batch) = fetch_page(cursor)?;
        keys.extend(batch.iter().filter_map(|key| strip_key(prefix, key)));
        if next == 0 {
            break;
        }
        cursor = next;
    }
    Ok(keys.into_iter().collect())
}

fn strip_key(prefix: &str, key: &str) -> Option<String> {
    key.strip_prefix(prefix).map(str::to_string)
}

fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
