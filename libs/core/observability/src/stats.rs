//! Hit and query metrics.

use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::time::Duration;

pub const HITS_RECORDED: &str = "stats_hits_recorded_total";
pub const QUERIES: &str = "stats_queries_total";
pub const QUERY_ROWS: &str = "stats_query_rows";
pub const QUERY_DURATION: &str = "stats_query_duration_seconds";

/// `app` label for hits from applications outside the known set
pub const OTHER_APP: &str = "other";

static KNOWN_APPS: OnceCell<HashSet<String>> = OnceCell::new();

/// Stats metrics recorder
pub struct StatsMetrics;

impl StatsMetrics {
    /// Applications that get their own `app` label on the hit counter.
    ///
    /// `app` comes from request bodies, so anything not listed here is
    /// counted under [`OTHER_APP`]. Only the first call takes effect.
    pub fn set_known_apps<I, S>(apps: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let apps: HashSet<String> = apps.into_iter().map(Into::into).collect();
        if KNOWN_APPS.set(apps).is_err() {
            tracing::warn!("Known metric apps already set; ignoring");
        }
    }

    pub fn record_hit(app: &str) {
        counter!(HITS_RECORDED, "app" => app_label(app)).increment(1);
    }

    /// Record one aggregation: its flavour, result size and latency.
    pub fn record_query(unique: bool, rows: usize, elapsed: Duration) {
        let unique = if unique { "true" } else { "false" };

        counter!(QUERIES, "unique" => unique).increment(1);
        histogram!(QUERY_ROWS, "unique" => unique).record(rows as f64);
        histogram!(QUERY_DURATION, "unique" => unique).record(elapsed.as_secs_f64());

        tracing::debug!(
            unique = unique,
            rows = rows,
            elapsed_ms = elapsed.as_millis() as u64,
            "Stats query served"
        );
    }
}

fn app_label(app: &str) -> String {
    match KNOWN_APPS.get() {
        Some(known) if known.contains(app) => app.to_string(),
        _ => OTHER_APP.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    fn series(rendered: &str, name: &str) -> Vec<String> {
        rendered
            .lines()
            .filter(|line| line.starts_with(name) && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_unknown_apps_share_one_series() {
        StatsMetrics::set_known_apps(["ewm-main-service"]);
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            for n in 0..500 {
                StatsMetrics::record_hit(&format!("caller-{n}"));
            }
            StatsMetrics::record_hit("ewm-main-service");
        });

        let hits = series(&handle.render(), HITS_RECORDED);
        assert_eq!(hits.len(), 2, "unexpected series: {hits:?}");
        assert!(hits.iter().any(|l| l.contains("app=\"other\"") && l.ends_with(" 500")));
        assert!(hits.iter().any(|l| l.contains("app=\"ewm-main-service\"")));
    }
}
