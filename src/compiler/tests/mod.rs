//! Compiler test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT rendering, wrapping, bindings and result shape
//! - `conditions`: WHERE / HAVING condition forms
//! - `dialects`: identifier quoting, literals and date parts per engine
//! - `limits`: LIMIT / OFFSET and SQL Server pagination modes
//! - `cte`: WITH prologue ordering and bindings
//! - `aggregate`: COUNT / SUM / ... rewrites
//! - `dml`: INSERT, UPDATE and DELETE

mod core;
mod limits;
