//! Execute list and export queries against the database.

use sqlx::Row;
use tracing::{info_span, Instrument};

use query_engine_sql::sql;
use query_engine_translation::translation::plan::{ListPlan, COUNT_COLUMN, ROWS_COLUMN};

use crate::error::Error;
use crate::metrics;

/// One page of rows, together with the number of rows matching the filter
/// regardless of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult {
    pub total: u64,
    pub rows: Vec<serde_json::Value>,
}

/// Run the count and page queries of a list plan concurrently.
pub async fn execute_list(
    pool: &sqlx::PgPool,
    metrics: &metrics::Metrics,
    plan: &ListPlan,
) -> Result<ListResult, Error> {
    let count_query = plan.count_sql();
    let rows_query = plan.rows_sql();

    let (total, rows) = tokio::try_join!(
        fetch_count(pool, metrics, &count_query).instrument(info_span!("Count rows")),
        fetch_rows(pool, metrics, &rows_query).instrument(info_span!("Fetch rows")),
    )?;

    Ok(ListResult { total, rows })
}

/// Run a single select returning its rows as a json array, such as an export.
pub async fn execute_rows(
    pool: &sqlx::PgPool,
    metrics: &metrics::Metrics,
    select: &sql::ast::Select,
) -> Result<Vec<serde_json::Value>, Error> {
    let query = sql::convert::select_to_sql(select);
    fetch_rows(pool, metrics, &query)
        .instrument(info_span!("Fetch rows"))
        .await
}

async fn fetch_count(
    pool: &sqlx::PgPool,
    metrics: &metrics::Metrics,
    query: &sql::string::SQL,
) -> Result<u64, Error> {
    let row = fetch_one(pool, metrics, query).await?;
    let count: i64 = row.try_get(COUNT_COLUMN)?;
    Ok(u64::try_from(count).unwrap_or(0))
}

async fn fetch_rows(
    pool: &sqlx::PgPool,
    metrics: &metrics::Metrics,
    query: &sql::string::SQL,
) -> Result<Vec<serde_json::Value>, Error> {
    let row = fetch_one(pool, metrics, query).await?;
    let sqlx::types::Json(rows): sqlx::types::Json<Vec<serde_json::Value>> =
        row.try_get(ROWS_COLUMN)?;
    Ok(rows)
}

/// Both of our queries aggregate to exactly one row.
async fn fetch_one(
    pool: &sqlx::PgPool,
    metrics: &metrics::Metrics,
    query: &sql::string::SQL,
) -> Result<sqlx::postgres::PgRow, Error> {
    tracing::debug!(
        generated_sql = %query.sql,
        params = ?&query.params,
        "executing query"
    );

    let timer = metrics.time_query_execution();
    let result = build_query_with_params(query).fetch_one(pool).await;
    timer.observe_duration();

    match result {
        Ok(row) => {
            metrics.record_successful_query();
            Ok(row)
        }
        Err(err) => {
            metrics.record_failed_query();
            tracing::error!(error = %err, generated_sql = %query.sql, "query failed");
            Err(Error::DB(err))
        }
    }
}

/// Create a SQLx query based on our SQL query and bind our parameters to it.
fn build_query_with_params(
    query: &sql::string::SQL,
) -> sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .params
        .iter()
        .fold(sqlx::query(query.sql.as_str()), |sqlx_query, param| match param {
            sql::string::Param::String(s) => sqlx_query.bind(s.as_str()),
            sql::string::Param::Int8(i) => sqlx_query.bind(*i),
            sql::string::Param::Float8(f) => sqlx_query.bind(*f),
            sql::string::Param::Timestamp(t) => sqlx_query.bind(*t),
        })
}
