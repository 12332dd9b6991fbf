//! Type definitions of a SQL AST representation.

use chrono::{DateTime, Utc};

/// A SELECT clause
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub select_list: SelectList,
    pub from: Option<From>,
    pub where_: Where,
    pub order_by: OrderBy,
    pub limit: Limit,
}

/// A select list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectList {
    SelectList(Vec<(ColumnAlias, Expression)>),
    SelectStar,
}

/// A FROM clause
#[derive(Debug, Clone, PartialEq)]
pub enum From {
    /// Select from a table reference
    Table {
        reference: TableReference,
        alias: TableAlias,
    },
    /// Select from a subquery
    Select {
        select: Box<Select>,
        alias: TableAlias,
    },
}

/// A WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct Where(pub Expression);

/// An ORDER BY clause
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub elements: Vec<OrderByElement>,
}

/// A single element in an ORDER BY clause
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByElement {
    pub target: Expression,
    pub direction: OrderByDirection,
}

/// A direction for a single ORDER BY element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderByDirection {
    Asc,
    Desc,
}

/// LIMIT and OFFSET clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limit {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// A scalar expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// AND clause
    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// A binary operation on two scalar expression
    BinaryOperation {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    /// A scalar function call
    FunctionCall {
        function: Function,
        args: Vec<Expression>,
    },
    /// A row_to_json function call
    RowToJson(TableReference),
    /// A column reference
    ColumnReference(ColumnReference),
    /// An irreducible value
    Value(Value),
    Cast {
        expression: Box<Expression>,
        r#type: ScalarTypeName,
    },
    /// A COUNT clause
    Count(CountType),
}

/// A binary comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
    CaseInsensitiveLike,
}

/// A scalar function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Function {
    Coalesce,
    JsonAgg,
}

/// COUNT clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountType {
    Star,
}

/// Value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i64),
    Float8(f64),
    Bool(bool),
    String(String),
    Timestamp(DateTime<Utc>),
    EmptyJsonArray,
}

/// Scalar type name. This will always be output as a quoted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarTypeName(pub String);

/// A database schema name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaName(pub String);

/// A database table name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(pub String);

/// A reference to a table. Used when we want to query it,
/// for example in a FROM clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableReference {
    /// refers to a db table object name
    DBTable {
        schema: SchemaName,
        table: TableName,
    },
    /// refers to an alias we created
    AliasedTable(TableAlias),
}

/// A database table's column name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName(pub String);

/// A reference to a column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnReference {
    pub table: TableReference,
    pub name: ColumnName,
}

/// aliases that we give to relations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableAlias {
    pub name: String,
}

/// aliases that we give to columns
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnAlias {
    pub name: String,
}
