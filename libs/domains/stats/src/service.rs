use observability::StatsMetrics;
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;

use crate::error::{StatsError, StatsResult};
use crate::models::{Hit, NewHit, StatsQuery, ViewStats};
use crate::repository::HitRepository;

/// Service layer for recording hits and serving aggregated stats
#[derive(Clone)]
pub struct StatsService<R: HitRepository> {
    repository: Arc<R>,
}

impl<R: HitRepository> StatsService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate and append a hit
    pub async fn record_hit(&self, input: NewHit) -> StatsResult<Hit> {
        input
            .validate()
            .map_err(|e| StatsError::Validation(e.to_string()))?;

        let hit = self.repository.create(input).await?;
        StatsMetrics::record_hit(&hit.app);

        Ok(hit)
    }

    /// Aggregate hits in `[start, end]`.
    ///
    /// `start` must be strictly before `end`. Blank entries in `uris` are
    /// dropped. A filter made only of blank URIs matches nothing, since no
    /// stored hit has a blank URI; an absent or empty filter counts every URI.
    pub async fn get_stats(&self, mut query: StatsQuery) -> StatsResult<Vec<ViewStats>> {
        if query.start >= query.end {
            return Err(StatsError::InvalidRange {
                start: query.start,
                end: query.end,
            });
        }

        let filtered = !query.uris.is_empty();
        query.uris.retain(|uri| !uri.trim().is_empty());
        if filtered && query.uris.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let stats = self.repository.aggregate(&query).await?;
        StatsMetrics::record_query(query.unique, stats.len(), started.elapsed());

        Ok(stats)
    }
}
