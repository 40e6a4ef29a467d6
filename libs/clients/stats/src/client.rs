use chrono::NaiveDateTime;
use domain_stats::{Hit, NewHit, TIMESTAMP_FORMAT, ViewStats};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::config::StatsClientConfig;
use crate::error::{ClientError, ClientResult};

/// Client for the stats service HTTP API
#[derive(Clone, Debug)]
pub struct StatsClient {
    client: reqwest::Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(config: StatsClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Record a hit for `uri`
    #[instrument(skip(self, ip))]
    pub async fn add_hit(
        &self,
        app: &str,
        uri: &str,
        ip: &str,
        timestamp: NaiveDateTime,
    ) -> ClientResult<Hit> {
        let body = NewHit::new(app, uri, ip, timestamp);

        let response = self
            .client
            .post(format!("{}/hit", self.base_url))
            .json(&body)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Counts per `(app, uri)` in `[start, end]`, most viewed first.
    ///
    /// An empty `uris` slice asks for every URI.
    #[instrument(skip(self, uris), fields(uris = uris.len()))]
    pub async fn get_stats(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        uris: &[String],
        unique: bool,
    ) -> ClientResult<Vec<ViewStats>> {
        let mut params: Vec<(&str, String)> = vec![
            ("start", start.format(TIMESTAMP_FORMAT).to_string()),
            ("end", end.format(TIMESTAMP_FORMAT).to_string()),
            ("unique", unique.to_string()),
        ];
        params.extend(uris.iter().map(|uri| ("uris", uri.clone())));

        let response = self
            .client
            .get(format!("{}/stats", self.base_url))
            .query(&params)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let stats: Vec<ViewStats> = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        debug!(rows = stats.len(), "Fetched stats");
        Ok(stats)
    }

    /// View counts for entities exposed at `{prefix}/{id}`, keyed by id.
    ///
    /// Rows are matched back through the exact URI built for each id and
    /// only rows reported by `app` count. Ids without hits map to 0.
    #[instrument(skip(self, ids), fields(entities = ids.len()))]
    pub async fn entity_views(
        &self,
        app: &str,
        prefix: &str,
        ids: &[i64],
        start: NaiveDateTime,
        end: NaiveDateTime,
        unique: bool,
    ) -> ClientResult<HashMap<i64, u64>> {
        let mut views: HashMap<i64, u64> = ids.iter().map(|id| (*id, 0)).collect();
        if ids.is_empty() {
            return Ok(views);
        }

        let prefix = prefix.trim_end_matches('/');
        let by_uri: HashMap<String, i64> = ids
            .iter()
            .map(|id| (format!("{}/{}", prefix, id), *id))
            .collect();
        let uris: Vec<String> = by_uri.keys().cloned().collect();

        let stats = self.get_stats(start, end, &uris, unique).await?;

        for row in stats.into_iter().filter(|row| row.app == app) {
            if let Some(id) = by_uri.get(&row.uri) {
                *views.entry(*id).or_default() += row.hits;
            }
        }

        Ok(views)
    }

    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Stats service request failed");
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
