//! Translate a parsed list request into the SQL statements that serve it.

use super::query::{ComparisonOperator, ParsedRequest, Predicate, Value};
use query_engine_metadata::metadata::SortDirection;
use query_engine_sql::sql;

/// Column holding the total number of matching rows in the count query.
pub const COUNT_COLUMN: &str = "count";
/// Column holding the json array of rows in the rows query.
pub const ROWS_COLUMN: &str = "rows";

const TEXT_TYPE: &str = "text";
const UUID_TYPE: &str = "uuid";

/// The table a request is run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTarget {
    pub schema: String,
    pub table: String,
}

impl TableTarget {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        TableTarget {
            schema: schema.into(),
            table: table.into(),
        }
    }

    fn reference(&self) -> sql::ast::TableReference {
        sql::ast::TableReference::DBTable {
            schema: sql::ast::SchemaName(self.schema.clone()),
            table: sql::ast::TableName(self.table.clone()),
        }
    }

    fn alias(&self) -> sql::ast::TableAlias {
        sql::helpers::make_table_alias(self.table.clone())
    }

    fn from(&self) -> sql::ast::From {
        sql::ast::From::Table {
            reference: self.reference(),
            alias: self.alias(),
        }
    }
}

/// The two statements a list endpoint needs. Both share the same filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPlan {
    /// A single row with the total number of matching rows.
    pub count: sql::ast::Select,
    /// A single row with the requested page as a json array.
    pub rows: sql::ast::Select,
}

impl ListPlan {
    pub fn count_sql(&self) -> sql::string::SQL {
        sql::convert::select_to_sql(&self.count)
    }

    pub fn rows_sql(&self) -> sql::string::SQL {
        sql::convert::select_to_sql(&self.rows)
    }
}

/// Build the count and page queries for a list request.
///
/// Rows are read from the target table alone. Related rows, such as a
/// product's category, are not joined in or embedded.
pub fn translate_list(target: &TableTarget, request: &ParsedRequest) -> ListPlan {
    let table = sql::ast::TableReference::AliasedTable(target.alias());
    let where_ = translate_where(&table, request.predicate.as_ref());

    let count = sql::helpers::count_select(
        sql::helpers::make_column_alias(COUNT_COLUMN.to_string()),
        target.from(),
        where_.clone(),
    );

    let mut page = sql::helpers::star_select(target.from());
    page.where_ = where_;
    page.order_by = sql::ast::OrderBy {
        elements: request
            .sort_order
            .iter()
            .map(|entry| sql::ast::OrderByElement {
                target: sql::helpers::make_column(
                    table.clone(),
                    sql::ast::ColumnName(entry.column.clone()),
                ),
                direction: translate_direction(entry.direction),
            })
            .collect(),
    };
    page.limit = sql::ast::Limit {
        limit: Some(request.limit),
        offset: Some(request.offset),
    };

    tracing::debug!(?page, "SQL AST");

    ListPlan {
        count,
        rows: wrap_rows(page),
    }
}

/// Build the export query: the request's filter only, ordered by the
/// key column and capped at `max_rows`.
pub fn translate_export(
    target: &TableTarget,
    request: &ParsedRequest,
    key_column: &str,
    max_rows: u64,
) -> sql::ast::Select {
    let table = sql::ast::TableReference::AliasedTable(target.alias());

    let mut select = sql::helpers::star_select(target.from());
    select.where_ = translate_where(&table, request.predicate.as_ref());
    select.order_by = sql::ast::OrderBy {
        elements: vec![sql::ast::OrderByElement {
            target: sql::helpers::make_column(table, sql::ast::ColumnName(key_column.to_string())),
            direction: sql::ast::OrderByDirection::Asc,
        }],
    };
    select.limit = sql::ast::Limit {
        limit: Some(max_rows),
        offset: None,
    };

    wrap_rows(select)
}

fn wrap_rows(select: sql::ast::Select) -> sql::ast::Select {
    sql::helpers::select_rows_as_json(
        sql::helpers::make_column_alias(ROWS_COLUMN.to_string()),
        sql::helpers::make_table_alias(ROWS_COLUMN.to_string()),
        select,
    )
}

fn translate_where(
    table: &sql::ast::TableReference,
    predicate: Option<&Predicate>,
) -> sql::ast::Where {
    sql::ast::Where(predicate.map_or_else(sql::helpers::empty_where, |predicate| {
        translate_predicate(table, predicate)
    }))
}

fn translate_predicate(table: &sql::ast::TableReference, predicate: &Predicate) -> sql::ast::Expression {
    match predicate {
        Predicate::And(predicates) => sql::helpers::and_all(
            predicates
                .iter()
                .map(|predicate| translate_predicate(table, predicate)),
        ),
        Predicate::Comparison {
            column,
            column_type,
            operator,
            value,
        } => {
            let column =
                sql::helpers::make_column(table.clone(), sql::ast::ColumnName(column.clone()));
            let is_uuid = matches!(value, Value::Uuid(_));
            let value = sql::ast::Expression::Value(translate_value(value));

            match operator {
                // pattern matching happens on the textual form of any column.
                ComparisonOperator::ContainsInsensitive => sql::ast::Expression::BinaryOperation {
                    left: Box::new(cast(column, TEXT_TYPE)),
                    operator: sql::ast::BinaryOperator::CaseInsensitiveLike,
                    right: Box::new(value),
                },
                ComparisonOperator::Equal
                | ComparisonOperator::NotEqual
                | ComparisonOperator::GreaterThanOrEqual
                | ComparisonOperator::LessThanOrEqual => {
                    let value = match column_type {
                        Some(column_type) => cast(value, column_type),
                        None if is_uuid => cast(value, UUID_TYPE),
                        None => value,
                    };
                    sql::ast::Expression::BinaryOperation {
                        left: Box::new(column),
                        operator: translate_operator(*operator),
                        right: Box::new(value),
                    }
                }
            }
        }
    }
}

fn translate_operator(operator: ComparisonOperator) -> sql::ast::BinaryOperator {
    match operator {
        ComparisonOperator::Equal => sql::ast::BinaryOperator::Equals,
        ComparisonOperator::NotEqual => sql::ast::BinaryOperator::NotEquals,
        ComparisonOperator::GreaterThanOrEqual => sql::ast::BinaryOperator::GreaterThanOrEqualTo,
        ComparisonOperator::LessThanOrEqual => sql::ast::BinaryOperator::LessThanOrEqualTo,
        ComparisonOperator::ContainsInsensitive => sql::ast::BinaryOperator::CaseInsensitiveLike,
    }
}

fn translate_direction(direction: SortDirection) -> sql::ast::OrderByDirection {
    match direction {
        SortDirection::Asc => sql::ast::OrderByDirection::Asc,
        SortDirection::Desc => sql::ast::OrderByDirection::Desc,
    }
}

/// Convert a typed request value into a SQL value.
fn translate_value(value: &Value) -> sql::ast::Value {
    match value {
        Value::String(s) | Value::Uuid(s) => sql::ast::Value::String(s.clone()),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => sql::ast::Value::Int8(integer),
            None => sql::ast::Value::Float8(number.as_f64().unwrap_or_default()),
        },
        Value::Boolean(b) => sql::ast::Value::Bool(*b),
        Value::Timestamp(t) => sql::ast::Value::Timestamp(*t),
    }
}

fn cast(expression: sql::ast::Expression, scalar_type: &str) -> sql::ast::Expression {
    sql::ast::Expression::Cast {
        expression: Box::new(expression),
        r#type: sql::ast::ScalarTypeName(scalar_type.to_string()),
    }
}
