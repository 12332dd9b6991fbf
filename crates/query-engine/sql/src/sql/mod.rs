//! SQL AST, helpers for building it, and conversion to parameterised SQL text.

pub mod ast;
pub mod convert;
pub mod helpers;
pub mod string;
