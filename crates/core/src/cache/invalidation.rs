//! The cross-entity invalidation fabric.
//!
//! One declarative mapping from "entity class E changed for user U" to the
//! cache keys that could now be stale. Every mutating service method reports
//! its changes through [`CacheInvalidator::purge`]; none of them hand-rolls
//! key deletions, so coverage cannot drift between call sites.
//!
//! Invalidation runs after the authoritative write has committed. If purging
//! fails the mutation is still reported as successful: the stale window is
//! bounded by the entry TTLs.

use std::sync::Arc;

use log::warn;

use super::keys;
use super::traits::Cache;

/// A change to one entity class belonging to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityChange {
    /// Any jar mutation (create/update/delete/deposit/withdraw).
    Jars,
    /// Any goal mutation; carries the goal id when a single-goal cache entry
    /// exists for it.
    Goals { goal_id: Option<String> },
    /// Any upcoming-charge mutation, including the overdue sweep.
    Charges,
    /// Any transaction mutation, or a side-effect that created/deleted one
    /// (jar deposit/withdraw, charge mark-paid/not-paid, recurring sync).
    Transactions,
    /// Any user-profile mutation.
    Profile,
}

/// A single purge operation against the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeOp {
    /// Delete one exact key.
    Key(String),
    /// Delete every key matching a glob pattern.
    Pattern(String),
}

/// The invalidation table: which keys a change makes stale.
pub fn purge_ops(owner: &str, change: &EntityChange) -> Vec<PurgeOp> {
    match change {
        EntityChange::Jars => vec![
            PurgeOp::Key(keys::jars_key(owner)),
            PurgeOp::Key(keys::insights_key(owner)),
        ],
        EntityChange::Goals { goal_id } => {
            let mut ops = vec![PurgeOp::Key(keys::goals_key(owner))];
            if let Some(id) = goal_id {
                ops.push(PurgeOp::Key(keys::goal_key(id)));
            }
            ops.push(PurgeOp::Key(keys::insights_key(owner)));
            ops
        }
        EntityChange::Charges => vec![
            PurgeOp::Pattern(keys::charges_pattern(owner)),
            PurgeOp::Key(keys::insights_key(owner)),
        ],
        EntityChange::Transactions => vec![
            PurgeOp::Pattern(keys::transactions_pattern(owner)),
            PurgeOp::Pattern(keys::summary_pattern(owner)),
            PurgeOp::Key(keys::insights_key(owner)),
        ],
        EntityChange::Profile => vec![
            PurgeOp::Key(keys::profile_key(owner)),
            PurgeOp::Key(keys::goals_key(owner)),
        ],
    }
}

/// Applies the invalidation table to a cache backend.
#[derive(Clone)]
pub struct CacheInvalidator {
    cache: Arc<dyn Cache>,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Purges every key made stale by `changes` for `owner`.
    ///
    /// Failures are logged and swallowed: the authoritative write has already
    /// committed, and the TTL bounds how long a stale entry can survive.
    pub async fn purge(&self, owner: &str, changes: &[EntityChange]) {
        for change in changes {
            for op in purge_ops(owner, change) {
                let result = match &op {
                    PurgeOp::Key(key) => self.cache.delete(key).await,
                    PurgeOp::Pattern(pattern) => self.cache.delete_pattern(pattern).await,
                };
                if let Err(e) = result {
                    warn!("cache invalidation failed for {:?} ({:?}): {}", op, change, e);
                }
            }
        }
    }
}
