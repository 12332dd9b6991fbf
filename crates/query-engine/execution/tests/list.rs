//! These tests need a running PostgreSQL database, reachable through
//! `SIMPLE_REST_DATABASE_URL`. Run them with `cargo test -- --ignored`.

use serde_json::json;
use similar_asserts::assert_eq;

use query_engine_execution::{metrics::Metrics, query};
use query_engine_metadata::metadata::{
    FieldSpec, FilterOperator, QueryConfiguration, SortDirection, ValueType,
};
use query_engine_translation::translation::plan::{translate_export, translate_list, TableTarget};
use query_engine_translation::translation::query::{parse, QueryParams};

fn configuration() -> QueryConfiguration {
    QueryConfiguration::empty()
        .with_field(
            "id",
            FieldSpec::new("id", ValueType::Number)
                .sortable()
                .filterable(&[FilterOperator::Eq]),
        )
        .with_field(
            "name",
            FieldSpec::new("name", ValueType::String)
                .sortable()
                .filterable(&[FilterOperator::Like]),
        )
        .with_field(
            "price",
            FieldSpec::new("price", ValueType::Number)
                .sortable()
                .filterable(&[FilterOperator::Gte, FilterOperator::Lte]),
        )
        .with_default_sort("id", SortDirection::Asc)
}

/// A pool of one connection, so the temporary table is visible to every query.
async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let url = std::env::var("SIMPLE_REST_DATABASE_URL")?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await?;

    sqlx::query("CREATE TEMPORARY TABLE products (id bigint PRIMARY KEY, name text NOT NULL, price integer NOT NULL)")
        .execute(&pool)
        .await?;
    sqlx::query(
        "INSERT INTO products (id, name, price) VALUES \
         (1, 'Office Chair', 120), (2, 'Desk', 300), (3, 'Chair Mat', 40), (4, 'Lamp', 25)",
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

fn target() -> TableTarget {
    TableTarget::new("pg_temp", "products")
}

#[tokio::test]
#[ignore = "requires SIMPLE_REST_DATABASE_URL"]
async fn it_counts_every_match_and_returns_one_page() -> anyhow::Result<()> {
    let pool = connect().await?;
    let metrics = Metrics::initialize(&mut prometheus::Registry::new())?;

    let request = parse(
        &QueryParams::parse("name_like=chair&_sort=price&_order=desc&_limit=1"),
        &configuration(),
        vec![],
    );
    let result = query::execute_list(&pool, &metrics, &translate_list(&target(), &request)).await?;

    assert_eq!(result.total, 2);
    assert_eq!(
        result.rows,
        vec![json!({"id": 1, "name": "Office Chair", "price": 120})]
    );
    Ok(())
}

#[tokio::test]
#[ignore = "requires SIMPLE_REST_DATABASE_URL"]
async fn it_returns_an_empty_page_past_the_end() -> anyhow::Result<()> {
    let pool = connect().await?;
    let metrics = Metrics::initialize(&mut prometheus::Registry::new())?;

    let request = parse(
        &QueryParams::parse("_page=5&_limit=10"),
        &configuration(),
        vec![],
    );
    let result = query::execute_list(&pool, &metrics, &translate_list(&target(), &request)).await?;

    assert_eq!(result.total, 4);
    assert!(result.rows.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "requires SIMPLE_REST_DATABASE_URL"]
async fn it_exports_filtered_rows_in_key_order() -> anyhow::Result<()> {
    let pool = connect().await?;
    let metrics = Metrics::initialize(&mut prometheus::Registry::new())?;

    let request = parse(
        &QueryParams::parse("price_lte=150&_sort=name&_limit=1"),
        &configuration(),
        vec![],
    );
    let rows =
        query::execute_rows(&pool, &metrics, &translate_export(&target(), &request, "id", 1000))
            .await?;

    let ids: Vec<_> = rows.iter().map(|row| row["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(3), json!(4)]);
    Ok(())
}
