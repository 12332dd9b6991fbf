//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

// Empty clauses //

/// An empty `WHERE` clause.
pub fn empty_where() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// An empty `ORDER BY` clause.
pub fn empty_order_by() -> OrderBy {
    OrderBy { elements: vec![] }
}

/// Empty `LIMIT` and `OFFSET` clauses.
pub fn empty_limit() -> Limit {
    Limit {
        limit: None,
        offset: None,
    }
}

/// A `true` expression.
pub fn true_expr() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// Combine expressions with `AND`. No expressions at all is `true`.
pub fn and_all(expressions: impl IntoIterator<Item = Expression>) -> Expression {
    expressions
        .into_iter()
        .reduce(|left, right| Expression::And {
            left: Box::new(left),
            right: Box::new(right),
        })
        .unwrap_or_else(true_expr)
}

// Aliasing //

/// Create column aliases using this function so we build everything in one place.
pub fn make_column_alias(name: String) -> ColumnAlias {
    ColumnAlias { name }
}

/// Create table aliases using this function so we build everything in one place.
pub fn make_table_alias(name: String) -> TableAlias {
    TableAlias { name }
}

/// Generate a column expression refering to a specific table.
pub fn make_column(table: TableReference, name: ColumnName) -> Expression {
    Expression::ColumnReference(ColumnReference { table, name })
}

// SELECTs //

/// Build a simple select with a select list and the rest are empty.
pub fn simple_select(select_list: Vec<(ColumnAlias, Expression)>) -> Select {
    Select {
        select_list: SelectList::SelectList(select_list),
        from: None,
        where_: Where(empty_where()),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Build a simple select *
pub fn star_select(from: From) -> Select {
    Select {
        select_list: SelectList::SelectStar,
        from: Some(from),
        where_: Where(empty_where()),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Build a `SELECT COUNT(*)` over a relation, filtered by an expression.
pub fn count_select(output_column_alias: ColumnAlias, from: From, where_: Where) -> Select {
    let mut select = simple_select(vec![(
        output_column_alias,
        Expression::Count(CountType::Star),
    )]);
    select.from = Some(from);
    select.where_ = where_;
    select
}

/// Wrap a select so that it returns a single json array of its rows,
/// or an empty array when there are none:
///
/// > SELECT coalesce(json_agg(row_to_json("rows")), '[]') AS "rows"
/// > FROM (<row_select>) AS "rows"
pub fn select_rows_as_json(
    output_column_alias: ColumnAlias,
    row_table_alias: TableAlias,
    row_select: Select,
) -> Select {
    let json_rows = Expression::FunctionCall {
        function: Function::Coalesce,
        args: vec![
            Expression::FunctionCall {
                function: Function::JsonAgg,
                args: vec![Expression::RowToJson(TableReference::AliasedTable(
                    row_table_alias.clone(),
                ))],
            },
            Expression::Value(Value::EmptyJsonArray),
        ],
    };

    let mut final_select = simple_select(vec![(output_column_alias, json_rows)]);
    final_select.from = Some(From::Select {
        select: Box::new(row_select),
        alias: row_table_alias,
    });
    final_select
}
