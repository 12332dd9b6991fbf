mod common;

use chrono::{TimeZone, Utc};
use similar_asserts::assert_eq;

use query_engine_sql::sql::string::Param;
use query_engine_translation::translation::plan::{translate_export, translate_list, TableTarget};
use query_engine_translation::translation::query::{ComparisonOperator, Predicate, Value};

fn products() -> TableTarget {
    TableTarget::new("public", "products")
}

#[test]
fn it_plans_an_unfiltered_list() {
    let plan = translate_list(&products(), &common::parse_products(""));

    insta::assert_snapshot!(
        plan.count_sql().sql,
        @r#"SELECT COUNT(*) AS "count" FROM "public"."products" AS "products""#
    );
    insta::assert_snapshot!(
        plan.rows_sql().sql,
        @r#"SELECT coalesce(json_agg(row_to_json("rows")), '[]') AS "rows" FROM (SELECT * FROM "public"."products" AS "products" ORDER BY "products"."id" ASC LIMIT 50 OFFSET 0) AS "rows""#
    );
    assert!(plan.rows_sql().params.is_empty());
}

#[test]
fn it_plans_a_filtered_sorted_page() {
    let request = common::parse_products(
        "price_gte=10&name_like=chair&_sort=price,name&_order=desc,asc&_page=2&_limit=20",
    );
    let plan = translate_list(&products(), &request);

    let count = plan.count_sql();
    insta::assert_snapshot!(
        count.sql,
        @r#"SELECT COUNT(*) AS "count" FROM "public"."products" AS "products" WHERE (("products"."price" >= $1) AND (CAST("products"."name" AS "text") ILIKE $2))"#
    );
    assert_eq!(
        count.params,
        vec![Param::Int8(10), Param::String("%chair%".to_string())]
    );

    let rows = plan.rows_sql();
    insta::assert_snapshot!(
        rows.sql,
        @r#"SELECT coalesce(json_agg(row_to_json("rows")), '[]') AS "rows" FROM (SELECT * FROM "public"."products" AS "products" WHERE (("products"."price" >= $1) AND (CAST("products"."name" AS "text") ILIKE $2)) ORDER BY "products"."price" DESC, "products"."name" ASC LIMIT 20 OFFSET 20) AS "rows""#
    );
    assert_eq!(rows.params, count.params);
}

#[test]
fn it_casts_parameters_to_the_column_type() {
    let plan = translate_list(&products(), &common::parse_products("status=active"));

    let count = plan.count_sql();
    insta::assert_snapshot!(
        count.sql,
        @r#"SELECT COUNT(*) AS "count" FROM "public"."products" AS "products" WHERE ("products"."status" = CAST($1 AS "product_status"))"#
    );
    assert_eq!(count.params, vec![Param::String("active".to_string())]);
}

#[test]
fn it_matches_patterns_against_the_text_of_a_typed_column() {
    let plan = translate_list(&products(), &common::parse_products("status_like=act"));

    insta::assert_snapshot!(
        plan.count_sql().sql,
        @r#"SELECT COUNT(*) AS "count" FROM "public"."products" AS "products" WHERE (CAST("products"."status" AS "text") ILIKE $1)"#
    );
}

#[test]
fn it_casts_uuid_parameters() {
    let owner = Predicate::comparison(
        "owner_id",
        ComparisonOperator::Equal,
        Value::Uuid("0b8a5c36-2f7e-4a55-9f55-0d7b1b1f2a11".to_string()),
    );
    let request = common::parse_products_with("ownerId_ne=1d4b0f7a-98a6-4f7e-b2a4-1a2b3c4d5e6f", vec![owner]);
    let plan = translate_list(&products(), &request);

    let count = plan.count_sql();
    insta::assert_snapshot!(
        count.sql,
        @r#"SELECT COUNT(*) AS "count" FROM "public"."products" AS "products" WHERE (("products"."owner_id" = CAST($1 AS "uuid")) AND ("products"."owner_id" <> CAST($2 AS "uuid")))"#
    );
    assert_eq!(
        count.params,
        vec![
            Param::String("0b8a5c36-2f7e-4a55-9f55-0d7b1b1f2a11".to_string()),
            Param::String("1d4b0f7a-98a6-4f7e-b2a4-1a2b3c4d5e6f".to_string()),
        ]
    );
}

#[test]
fn it_renders_booleans_inline_and_binds_timestamps() {
    let plan = translate_list(
        &products(),
        &common::parse_products("isActive=false&availableAt_lte=2024-06-30T12:00:00Z"),
    );

    let count = plan.count_sql();
    insta::assert_snapshot!(
        count.sql,
        @r#"SELECT COUNT(*) AS "count" FROM "public"."products" AS "products" WHERE (("products"."is_active" = false) AND ("products"."available_at" <= $1))"#
    );
    assert_eq!(
        count.params,
        vec![Param::Timestamp(
            Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
        )]
    );
}

#[test]
fn it_plans_an_export_by_key_ignoring_the_page() {
    let request =
        common::parse_products("price_lte=99.5&_sort=price&_order=desc&_start=100&_end=110");
    let select = translate_export(&products(), &request, "id", 1000);

    let sql = query_engine_sql::sql::convert::select_to_sql(&select);
    insta::assert_snapshot!(
        sql.sql,
        @r#"SELECT coalesce(json_agg(row_to_json("rows")), '[]') AS "rows" FROM (SELECT * FROM "public"."products" AS "products" WHERE ("products"."price" <= $1) ORDER BY "products"."id" ASC LIMIT 1000) AS "rows""#
    );
    assert_eq!(sql.params, vec![Param::Float8(99.5)]);
}

#[test]
fn it_quotes_unusual_identifiers() {
    let target = TableTarget::new("sales \"eu\"", "order lines");
    let plan = translate_list(&target, &common::parse_products("_limit=1"));

    insta::assert_snapshot!(
        plan.count_sql().sql,
        @r#"SELECT COUNT(*) AS "count" FROM "sales ""eu"""."order lines" AS "order lines""#
    );
}
