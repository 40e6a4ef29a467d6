use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::StatsResult;
use crate::models::{Hit, NewHit, StatsQuery, ViewStats};

/// Repository trait for hit persistence and aggregation
///
/// `aggregate` treats `[start, end]` as inclusive and accepts `start == end`.
/// Rows come back ordered by count descending; equal counts keep the order
/// in which their `(app, uri)` pair was first seen.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HitRepository: Send + Sync {
    /// Append a hit, assigning its id
    async fn create(&self, input: NewHit) -> StatsResult<Hit>;

    /// Count matching hits per `(app, uri)`
    async fn aggregate(&self, query: &StatsQuery) -> StatsResult<Vec<ViewStats>>;
}

/// In-memory implementation of HitRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryHitRepository {
    hits: Arc<RwLock<Vec<Hit>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryHitRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

struct Group<'a> {
    first_id: i64,
    total: u64,
    ips: HashSet<&'a str>,
}

#[async_trait]
impl HitRepository for InMemoryHitRepository {
    async fn create(&self, input: NewHit) -> StatsResult<Hit> {
        let mut hits = self.hits.write().await;

        // Assigned under the write lock so the log stays in id order
        let hit = Hit {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            app: input.app,
            uri: input.uri,
            ip: input.ip,
            timestamp: input.timestamp,
        };
        hits.push(hit.clone());

        tracing::debug!(hit_id = hit.id, app = %hit.app, uri = %hit.uri, "Recorded hit");
        Ok(hit)
    }

    async fn aggregate(&self, query: &StatsQuery) -> StatsResult<Vec<ViewStats>> {
        let hits = self.hits.read().await;

        let mut groups: HashMap<(&str, &str), Group> = HashMap::new();
        for hit in hits.iter().filter(|h| query.matches(h)) {
            let group = groups
                .entry((hit.app.as_str(), hit.uri.as_str()))
                .or_insert_with(|| Group {
                    first_id: hit.id,
                    total: 0,
                    ips: HashSet::new(),
                });
            group.first_id = group.first_id.min(hit.id);
            group.total += 1;
            group.ips.insert(hit.ip.as_str());
        }

        let mut rows: Vec<(i64, ViewStats)> = groups
            .into_iter()
            .map(|((app, uri), group)| {
                let hits = if query.unique {
                    group.ips.len() as u64
                } else {
                    group.total
                };
                (group.first_id, ViewStats::new(app, uri, hits))
            })
            .collect();

        rows.sort_by(|(a_first, a), (b_first, b)| {
            b.hits.cmp(&a.hits).then_with(|| a_first.cmp(b_first))
        });

        Ok(rows.into_iter().map(|(_, stats)| stats).collect())
    }
}
