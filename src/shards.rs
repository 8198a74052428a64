use std::collections::HashSet;
use std::convert::TryFrom;
use std::fmt;
use std::hash::Hash;

use actix_web::web;
use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use futures::future::join_all;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::api::models::error::APIError;
use crate::settings;
use crate::{Conn, DbPool};

/// The four logical databases left behind by historical migrations. The
/// primary shard owns all writes, the others are read during admin views.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum ShardId {
    #[serde(alias = "PRIMARY")]
    Primary,
    #[serde(alias = "OLD")]
    Old,
    #[serde(alias = "NEW")]
    New,
    #[serde(alias = "BOLT")]
    Bolt,
}

const PRIMARY: &'static str = "primary";
const OLD: &'static str = "old";
const NEW: &'static str = "new";
const BOLT: &'static str = "bolt";

impl TryFrom<&str> for ShardId {
    type Error = APIError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            PRIMARY => Ok(ShardId::Primary),
            OLD => Ok(ShardId::Old),
            NEW => Ok(ShardId::New),
            BOLT => Ok(ShardId::Bolt),
            _ => Err(APIError::InvalidValue {
                description: format!("unknown database source {}", value),
            }),
        }
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShardId::Primary => write!(f, "{}", PRIMARY),
            ShardId::Old => write!(f, "{}", OLD),
            ShardId::New => write!(f, "{}", NEW),
            ShardId::Bolt => write!(f, "{}", BOLT),
        }
    }
}

/// A shard is either backed by a connection pool or degraded. The decision is
/// made once at process start, a degraded shard contributes zero rows to
/// merged reads and answers targeted requests with 503.
#[derive(Clone)]
pub struct Shard {
    pub id: ShardId,
    pub pool: Option<DbPool>,
}

impl Shard {
    pub fn new(id: ShardId, database: Option<&settings::Database>) -> Shard {
        let database = match database {
            Some(database) => database,
            None => {
                warn!("{} database is not configured, shard runs degraded", id);
                return Shard { id, pool: None };
            }
        };

        let manager = ConnectionManager::<PgConnection>::new(database.url());
        match r2d2::Pool::builder().build(manager) {
            Ok(pool) => Shard {
                id,
                pool: Some(pool),
            },
            Err(error) => {
                warn!("{} database is unreachable, shard runs degraded: {}", id, error);
                Shard { id, pool: None }
            }
        }
    }

    pub fn degraded(id: ShardId) -> Shard {
        Shard { id, pool: None }
    }
}

/// Process wide registry of the logical databases, injected into handlers as
/// app data. Shards are ordered by the configured merge priority, the first
/// shard containing a key wins conflicts during merged reads.
#[derive(Clone)]
pub struct ShardSet {
    primary: DbPool,
    shards: Vec<Shard>,
}

impl ShardSet {
    pub fn new(primary: DbPool, settings: &settings::Shards) -> ShardSet {
        let configured: Vec<ShardId> = vec![
            (ShardId::Old, settings.old.is_some()),
            (ShardId::New, settings.new.is_some()),
            (ShardId::Bolt, settings.bolt.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(id, _)| id)
        .collect();

        let order = merge_order(&settings.merge_priority, &configured);

        let shards = order
            .iter()
            .map(|id| match id {
                ShardId::Primary => Shard {
                    id: *id,
                    pool: Some(primary.clone()),
                },
                ShardId::Old => Shard::new(*id, settings.old.as_ref()),
                ShardId::New => Shard::new(*id, settings.new.as_ref()),
                ShardId::Bolt => Shard::new(*id, settings.bolt.as_ref()),
            })
            .collect();

        ShardSet { primary, shards }
    }

    #[cfg(test)]
    pub fn from_shards(primary: DbPool, shards: Vec<Shard>) -> ShardSet {
        ShardSet { primary, shards }
    }

    pub fn primary(&self) -> &DbPool {
        &self.primary
    }

    /// Resolves the pool for a targeted request, degraded shards answer
    /// with 503.
    pub fn get(&self, id: ShardId) -> Result<DbPool, APIError> {
        if id == ShardId::Primary {
            return Ok(self.primary.clone());
        }

        self.shards
            .iter()
            .find(|shard| shard.id == id)
            .and_then(|shard| shard.pool.clone())
            .ok_or(APIError::ShardUnavailable { shard: id })
    }

    /// Runs the same query on every shard concurrently and merges the results
    /// by natural key. A failing shard is logged and contributes zero rows,
    /// merged reads prefer availability over completeness.
    pub async fn collect_merged<T, K, Q, F>(&self, query: Q, key_fn: F) -> Vec<T>
    where
        T: Send + 'static,
        K: Eq + Hash,
        Q: Fn(&Conn) -> Result<Vec<T>, diesel::result::Error> + Send + Clone + 'static,
        F: Fn(&T) -> K,
    {
        let tasks = self.shards.iter().map(|shard| {
            let id = shard.id;
            let pool = shard.pool.clone();
            let query = query.clone();
            async move {
                let pool = match pool {
                    Some(pool) => pool,
                    None => return Vec::new(),
                };
                let result = web::block::<_, _, APIError>(move || {
                    let conn = pool.get()?;
                    Ok(query(&conn)?)
                })
                .await;
                match result {
                    Ok(rows) => rows,
                    Err(error) => {
                        let error: APIError = error.into();
                        warn!("query on {} shard failed: {}", id, error);
                        Vec::new()
                    }
                }
            }
        });

        let sources = join_all(tasks).await;

        merge_by_key(sources, key_fn)
    }
}

/// Every configured shard takes part in merged reads even when the priority
/// list forgets it, forgotten shards rank after the listed ones.
fn merge_order(priority: &[ShardId], configured: &[ShardId]) -> Vec<ShardId> {
    let mut order: Vec<ShardId> = Vec::new();
    if !priority.contains(&ShardId::Primary) {
        order.push(ShardId::Primary);
    }
    order.extend_from_slice(priority);

    for id in configured {
        if !order.contains(id) {
            warn!(
                "{} database is configured but missing from merge_priority, merging it last",
                id
            );
            order.push(*id);
        }
    }

    order
}

/// Deduplicates rows gathered from multiple shards. Sources arrive in
/// descending precedence, the first occurrence of a key wins and the output
/// keeps first seen order.
pub fn merge_by_key<T, K, F>(sources: Vec<Vec<T>>, key_fn: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for rows in sources {
        for row in rows {
            if seen.insert(key_fn(&row)) {
                merged.push(row);
            }
        }
    }

    merged
}

#[cfg(test)]
mod test {
    use super::*;
    use std::convert::TryInto;

    fn unreachable_pool() -> DbPool {
        let manager =
            ConnectionManager::<PgConnection>::new("postgres://nobody@localhost:1/nowhere");
        r2d2::Pool::builder()
            .connection_timeout(std::time::Duration::from_millis(100))
            .build_unchecked(manager)
    }

    #[test]
    fn test_merge_prefers_earlier_sources() -> () {
        let primary = vec![("acc-1", "primary"), ("acc-2", "primary")];
        let bolt = vec![("acc-2", "bolt"), ("acc-3", "bolt")];

        let merged = merge_by_key(vec![primary, bolt], |row| row.0);

        assert_eq!(
            merged,
            vec![
                ("acc-1", "primary"),
                ("acc-2", "primary"),
                ("acc-3", "bolt"),
            ]
        );
    }

    #[test]
    fn test_merge_keeps_first_seen_order() -> () {
        let first = vec![(3, "a"), (1, "a")];
        let second = vec![(2, "b"), (3, "b")];

        let merged = merge_by_key(vec![first, second], |row| row.0);

        assert_eq!(merged, vec![(3, "a"), (1, "a"), (2, "b")]);
    }

    #[test]
    fn test_merge_with_empty_sources() -> () {
        let merged: Vec<(i32, &str)> = merge_by_key(vec![Vec::new(), Vec::new()], |row| row.0);

        assert_eq!(merged.is_empty(), true);
    }

    #[test]
    fn test_shard_id_accepts_uppercase_names() -> () {
        let id: ShardId = "BOLT".try_into().expect("shard id parses");
        assert_eq!(id, ShardId::Bolt);

        let id: ShardId = "primary".try_into().expect("shard id parses");
        assert_eq!(id, ShardId::Primary);

        let result: Result<ShardId, APIError> = "sideways".try_into();
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn test_merge_order_keeps_configured_shards_not_listed_in_priority() -> () {
        let order = merge_order(
            &[ShardId::Primary, ShardId::New],
            &[ShardId::New, ShardId::Bolt],
        );
        assert_eq!(order, vec![ShardId::Primary, ShardId::New, ShardId::Bolt]);

        let order = merge_order(&[ShardId::New], &[ShardId::Old]);
        assert_eq!(order, vec![ShardId::Primary, ShardId::New, ShardId::Old]);
    }

    #[test]
    fn test_degraded_shard_answers_targeted_requests_with_503() -> () {
        let set = ShardSet::from_shards(
            unreachable_pool(),
            vec![Shard::degraded(ShardId::Bolt)],
        );

        match set.get(ShardId::Bolt) {
            Err(APIError::ShardUnavailable { shard }) => assert_eq!(shard, ShardId::Bolt),
            _ => panic!("expected shard unavailable"),
        }

        match set.get(ShardId::Old) {
            Err(APIError::ShardUnavailable { shard }) => assert_eq!(shard, ShardId::Old),
            _ => panic!("expected shard unavailable"),
        }
    }

    #[actix_rt::test]
    async fn test_fully_degraded_set_merges_to_empty() -> () {
        let set = ShardSet::from_shards(
            unreachable_pool(),
            vec![
                Shard {
                    id: ShardId::Primary,
                    pool: Some(unreachable_pool()),
                },
                Shard::degraded(ShardId::New),
                Shard::degraded(ShardId::Bolt),
            ],
        );

        let merged: Vec<(i32, String)> = set
            .collect_merged(|_conn| Ok(Vec::new()), |row: &(i32, String)| row.0)
            .await;

        assert_eq!(merged.is_empty(), true);
    }
}
