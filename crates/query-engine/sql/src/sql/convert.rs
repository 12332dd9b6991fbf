//! Convert a SQL AST to a low-level SQL string.

use super::ast::*;
use super::helpers;
use super::string::*;

/// Render a select statement to parameterised SQL.
pub fn select_to_sql(select: &Select) -> SQL {
    let mut sql = SQL::new();
    select.to_sql(&mut sql);
    sql
}

// Convert to SQL strings

impl SelectList {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            SelectList::SelectList(select_list) => {
                for (index, (col, expr)) in select_list.iter().enumerate() {
                    if index > 0 {
                        sql.append_syntax(", ");
                    }
                    expr.to_sql(sql);
                    sql.append_syntax(" AS ");
                    col.to_sql(sql);
                }
            }
            SelectList::SelectStar => {
                sql.append_syntax("*");
            }
        }
    }
}

impl Select {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("SELECT ");

        self.select_list.to_sql(sql);

        if let Some(from) = &self.from {
            sql.append_syntax(" ");
            from.to_sql(sql);
        }

        self.where_.to_sql(sql);

        self.order_by.to_sql(sql);

        self.limit.to_sql(sql);
    }
}

impl From {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("FROM ");
        match &self {
            From::Table { reference, alias } => {
                reference.to_sql(sql);
                sql.append_syntax(" AS ");
                alias.to_sql(sql);
            }
            From::Select { select, alias } => {
                sql.append_syntax("(");
                select.to_sql(sql);
                sql.append_syntax(")");
                sql.append_syntax(" AS ");
                alias.to_sql(sql);
            }
        }
    }
}

impl Where {
    pub fn to_sql(&self, sql: &mut SQL) {
        let Where(expression) = self;
        if *expression != helpers::true_expr() {
            sql.append_syntax(" WHERE ");
            expression.to_sql(sql);
        }
    }
}

// scalars
impl Expression {
    pub fn to_sql(&self, sql: &mut SQL) {
        match &self {
            Expression::ColumnReference(column_reference) => column_reference.to_sql(sql),
            Expression::Value(value) => value.to_sql(sql),
            Expression::And { left, right } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                sql.append_syntax(" AND ");
                right.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::BinaryOperation {
                left,
                operator,
                right,
            } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                operator.to_sql(sql);
                right.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::FunctionCall { function, args } => {
                function.to_sql(sql);
                sql.append_syntax("(");
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        sql.append_syntax(", ");
                    }
                    arg.to_sql(sql);
                }
                sql.append_syntax(")");
            }
            Expression::RowToJson(table) => {
                sql.append_syntax("row_to_json");
                sql.append_syntax("(");
                table.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Cast { expression, r#type } => {
                sql.append_syntax("CAST(");
                expression.to_sql(sql);
                sql.append_syntax(" AS ");
                r#type.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Count(count_type) => {
                sql.append_syntax("COUNT");
                sql.append_syntax("(");
                count_type.to_sql(sql);
                sql.append_syntax(")");
            }
        }
    }
}

impl BinaryOperator {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            BinaryOperator::Equals => sql.append_syntax(" = "),
            BinaryOperator::NotEquals => sql.append_syntax(" <> "),
            BinaryOperator::GreaterThanOrEqualTo => sql.append_syntax(" >= "),
            BinaryOperator::LessThanOrEqualTo => sql.append_syntax(" <= "),
            BinaryOperator::CaseInsensitiveLike => sql.append_syntax(" ILIKE "),
        }
    }
}

impl Function {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Function::Coalesce => sql.append_syntax("coalesce"),
            Function::JsonAgg => sql.append_syntax("json_agg"),
        }
    }
}

impl CountType {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            CountType::Star => sql.append_syntax("*"),
        }
    }
}

impl Value {
    pub fn to_sql(&self, sql: &mut SQL) {
        match &self {
            Value::EmptyJsonArray => sql.append_syntax("'[]'"),
            Value::Bool(true) => sql.append_syntax("true"),
            Value::Bool(false) => sql.append_syntax("false"),
            Value::Int8(i) => sql.append_param(Param::Int8(*i)),
            Value::Float8(f) => sql.append_param(Param::Float8(*f)),
            Value::String(s) => sql.append_param(Param::String(s.clone())),
            Value::Timestamp(t) => sql.append_param(Param::Timestamp(*t)),
        }
    }
}

impl ScalarTypeName {
    pub fn to_sql(&self, sql: &mut SQL) {
        let ScalarTypeName(name) = self;
        sql.append_identifier(name);
    }
}

impl Limit {
    pub fn to_sql(&self, sql: &mut SQL) {
        if let Some(limit) = self.limit {
            sql.append_syntax(" LIMIT ");
            sql.append_syntax(format!("{limit}").as_str());
        }
        if let Some(offset) = self.offset {
            sql.append_syntax(" OFFSET ");
            sql.append_syntax(format!("{offset}").as_str());
        }
    }
}

// names
impl TableReference {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            TableReference::DBTable { schema, table } => {
                schema.to_sql(sql);
                sql.append_syntax(".");
                table.to_sql(sql);
            }
            TableReference::AliasedTable(alias) => alias.to_sql(sql),
        };
    }
}

impl SchemaName {
    pub fn to_sql(&self, sql: &mut SQL) {
        let SchemaName(name) = self;
        sql.append_identifier(name);
    }
}

impl TableName {
    pub fn to_sql(&self, sql: &mut SQL) {
        let TableName(name) = self;
        sql.append_identifier(name);
    }
}

impl TableAlias {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.name);
    }
}

impl ColumnName {
    pub fn to_sql(&self, sql: &mut SQL) {
        let ColumnName(name) = self;
        sql.append_identifier(name);
    }
}

impl ColumnReference {
    pub fn to_sql(&self, sql: &mut SQL) {
        self.table.to_sql(sql);
        sql.append_syntax(".");
        self.name.to_sql(sql);
    }
}

impl ColumnAlias {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.name);
    }
}

impl OrderBy {
    pub fn to_sql(&self, sql: &mut SQL) {
        if !self.elements.is_empty() {
            sql.append_syntax(" ORDER BY ");
            for (index, order_by_item) in self.elements.iter().enumerate() {
                if index > 0 {
                    sql.append_syntax(", ");
                }
                order_by_item.to_sql(sql);
            }
        }
    }
}

impl OrderByElement {
    pub fn to_sql(&self, sql: &mut SQL) {
        self.target.to_sql(sql);
        self.direction.to_sql(sql);
    }
}

impl OrderByDirection {
    pub fn to_sql(self, sql: &mut SQL) {
        match self {
            OrderByDirection::Asc => sql.append_syntax(" ASC"),
            OrderByDirection::Desc => sql.append_syntax(" DESC"),
        }
    }
}
