//! Type definitions of a low-level SQL string representation.

use chrono::{DateTime, Utc};

/// A parameterised SQL query: text with `$n` placeholders and the values to bind.
#[derive(Debug, Clone, PartialEq)]
pub struct SQL {
    pub sql: String,
    pub params: Vec<Param>,
}

impl Default for SQL {
    fn default() -> Self {
        Self::new()
    }
}

/// A parameter for a parameterized query.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// A literal string
    String(String),
    Int8(i64),
    Float8(f64),
    Timestamp(DateTime<Utc>),
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: vec![],
        }
    }
    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
    /// Append a double-quoted identifier. Embedded quotes are doubled.
    pub fn append_identifier(&mut self, sql: &str) {
        self.sql.push('"');
        self.sql.push_str(&sql.replace('"', "\"\""));
        self.sql.push('"');
    }
    pub fn append_param(&mut self, param: Param) {
        self.params.push(param);
        self.sql.push_str(format!("${}", self.params.len()).as_str());
    }
}
