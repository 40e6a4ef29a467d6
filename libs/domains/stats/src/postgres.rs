use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, Value,
};

use crate::{
    entity,
    error::StatsResult,
    models::{Hit, NewHit, StatsQuery, ViewStats},
    repository::HitRepository,
};

pub struct PgHitRepository {
    db: DatabaseConnection,
}

impl PgHitRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct ViewStatsRow {
    app: String,
    uri: String,
    hits: i64,
}

impl From<ViewStatsRow> for ViewStats {
    fn from(row: ViewStatsRow) -> Self {
        Self {
            app: row.app,
            uri: row.uri,
            hits: row.hits.max(0) as u64,
        }
    }
}

/// Single `GROUP BY` over the hit log. `$1`/`$2` are the range bounds,
/// any further placeholders are the URI filter.
fn aggregate_statement(query: &StatsQuery) -> Statement {
    let count = if query.unique {
        "COUNT(DISTINCT ip)"
    } else {
        "COUNT(*)"
    };

    let mut values: Vec<Value> = vec![query.start.into(), query.end.into()];
    let mut sql = format!(
        "SELECT app, uri, {} AS hits FROM hits WHERE created BETWEEN $1 AND $2",
        count
    );

    if !query.uris.is_empty() {
        let placeholders: Vec<String> = (0..query.uris.len())
            .map(|i| format!("${}", i + 3))
            .collect();
        sql.push_str(&format!(" AND uri IN ({})", placeholders.join(", ")));
        values.extend(query.uris.iter().cloned().map(Value::from));
    }

    sql.push_str(" GROUP BY app, uri ORDER BY hits DESC, MIN(id) ASC");

    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

#[async_trait]
impl HitRepository for PgHitRepository {
    async fn create(&self, input: NewHit) -> StatsResult<Hit> {
        let active_model: entity::ActiveModel = input.into();

        let model = active_model.insert(&self.db).await?;

        tracing::debug!(hit_id = model.id, app = %model.app, uri = %model.uri, "Recorded hit");
        Ok(model.into())
    }

    async fn aggregate(&self, query: &StatsQuery) -> StatsResult<Vec<ViewStats>> {
        let rows = ViewStatsRow::find_by_statement(aggregate_statement(query))
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query() -> StatsQuery {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        StatsQuery::new(
            day.and_hms_opt(9, 0, 0).unwrap(),
            day.and_hms_opt(11, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_total_statement_without_filter() {
        let stmt = aggregate_statement(&query());

        assert_eq!(
            stmt.sql,
            "SELECT app, uri, COUNT(*) AS hits FROM hits WHERE created BETWEEN $1 AND $2 \
             GROUP BY app, uri ORDER BY hits DESC, MIN(id) ASC"
        );
        assert_eq!(stmt.values.map(|v| v.0.len()), Some(2));
    }

    #[test]
    fn test_unique_statement_with_uri_filter() {
        let stmt = aggregate_statement(&query().unique(true).with_uris(["/events/1", "/events/2"]));

        assert!(stmt.sql.contains("COUNT(DISTINCT ip) AS hits"));
        assert!(stmt.sql.contains("AND uri IN ($3, $4)"));
        assert_eq!(stmt.values.map(|v| v.0.len()), Some(4));
    }

    #[tokio::test]
    async fn test_aggregate_maps_rows_with_mock_database() {
        use sea_orm::{DatabaseBackend, MockDatabase};
        use std::collections::BTreeMap;

        let row = |app: &str, uri: &str, hits: i64| {
            BTreeMap::from([
                ("app", Value::from(app)),
                ("uri", Value::from(uri)),
                ("hits", Value::from(hits)),
            ])
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("svc", "/events/1", 3), row("svc", "/events/2", 1)]])
            .into_connection();

        let stats = PgHitRepository::new(db).aggregate(&query()).await.unwrap();

        assert_eq!(
            stats,
            vec![
                ViewStats::new("svc", "/events/1", 3),
                ViewStats::new("svc", "/events/2", 1),
            ]
        );
    }
}
